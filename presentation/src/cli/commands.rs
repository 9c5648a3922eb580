//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for ragdesk
#[derive(Parser, Debug)]
#[command(name = "ragdesk")]
#[command(author, version, about = "Terminal client for a retrieval-augmented chat backend")]
#[command(long_about = r#"
ragdesk talks to a RAG chat backend: it provisions a per-session workspace,
uploads your documents into it, and answers questions either from that
workspace or from the global corpus, using a local or cloud LLM.

Without a subcommand an interactive chat session starts.

Configuration files are loaded from (in priority order):
1. RAGDESK_* environment variables (e.g. RAGDESK_API__BASE_URL)
2. --config <path>     Explicit config file
3. ./ragdesk.toml      Project-level config
4. ~/.config/ragdesk/config.toml   Global config

Example:
  ragdesk
  ragdesk --api http://rag.internal:8000/api
  ragdesk sessions --filter alice
  ragdesk messages 3f2a9c1e-...
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Backend base URL (overrides [api] base_url)
    #[arg(long, value_name = "URL", global = true)]
    pub api: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write diagnostic logs to a file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append conversation events as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Keep session state in memory only (nothing is written to disk)
    #[arg(long)]
    pub ephemeral: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

/// Non-interactive subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an interactive chat session (default)
    Chat,

    /// List server-side chat sessions
    Sessions {
        /// Only show sessions whose id, date or email contain this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Maximum number of sessions to fetch
        #[arg(long, default_value_t = 500)]
        limit: usize,
    },

    /// Print the stored transcript of a session
    Messages {
        /// Session identifier
        session_id: String,

        /// Maximum number of messages to fetch
        #[arg(long, default_value_t = 2000)]
        limit: usize,
    },

    /// Show corpus and usage statistics
    Stats,

    /// Rebuild the global index
    Reindex,

    /// Delete the global index artifacts
    Flush {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
