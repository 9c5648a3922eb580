//! Slash command parsing for the chat REPL

use ragdesk_domain::{ProviderKind, SourceMode};
use std::path::PathBuf;

/// A parsed REPL input line
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Plain text: a question
    Ask(String),
    Help,
    Quit,
    Status,
    Upload(Vec<PathBuf>),
    Rebuild,
    EnsureWorkspace,
    Source(SourceMode),
    Provider(ProviderKind),
    NewChat,
    History,
    Open(usize),
    Delete(usize),
    ClearHistory,
    End { wipe: bool },
    Login { email: String, password: String },
    Signup { email: String, password: String },
    Logout,
    WhoAmI,
    Sessions(Option<String>),
    Messages(String),
    Load(String),
    Stats,
    Reindex,
    Flush,
    /// A command that could not be parsed; the message explains why
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ChatCommand::Ask(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = parts.collect();

        match name.as_str() {
            "help" | "h" | "?" => ChatCommand::Help,
            "quit" | "exit" | "q" => ChatCommand::Quit,
            "status" => ChatCommand::Status,
            "upload" | "up" => {
                if args.is_empty() {
                    ChatCommand::Invalid("Usage: /upload <file> [file...]".to_string())
                } else {
                    ChatCommand::Upload(args.iter().map(|a| expand_home(a)).collect())
                }
            }
            "rebuild" => ChatCommand::Rebuild,
            "workspace" | "ws" => ChatCommand::EnsureWorkspace,
            "source" => match args.first().map(|a| a.parse::<SourceMode>()) {
                Some(Ok(mode)) => ChatCommand::Source(mode),
                _ => ChatCommand::Invalid("Usage: /source <workspace|global>".to_string()),
            },
            "provider" | "llm" => match args.first().map(|a| a.parse::<ProviderKind>()) {
                Some(Ok(kind)) => ChatCommand::Provider(kind),
                _ => ChatCommand::Invalid("Usage: /provider <local|cloud>".to_string()),
            },
            "new" => ChatCommand::NewChat,
            "history" => ChatCommand::History,
            "open" => index_arg(&args, "/open <n>").map_or_else(ChatCommand::Invalid, ChatCommand::Open),
            "delete" => {
                index_arg(&args, "/delete <n>").map_or_else(ChatCommand::Invalid, ChatCommand::Delete)
            }
            "clear-history" => ChatCommand::ClearHistory,
            "end" => ChatCommand::End {
                wipe: args.contains(&"--wipe"),
            },
            "login" | "signup" => match args.as_slice() {
                [email, password] => {
                    let (email, password) = (email.to_string(), password.to_string());
                    if name == "login" {
                        ChatCommand::Login { email, password }
                    } else {
                        ChatCommand::Signup { email, password }
                    }
                }
                _ => ChatCommand::Invalid(format!("Usage: /{} <email> <password>", name)),
            },
            "logout" => ChatCommand::Logout,
            "whoami" => ChatCommand::WhoAmI,
            "sessions" => ChatCommand::Sessions(args.first().map(|a| a.to_string())),
            "messages" => match args.first() {
                Some(id) => ChatCommand::Messages(id.to_string()),
                None => ChatCommand::Invalid("Usage: /messages <session-id>".to_string()),
            },
            "load" => match args.first() {
                Some(id) => ChatCommand::Load(id.to_string()),
                None => ChatCommand::Invalid("Usage: /load <session-id>".to_string()),
            },
            "stats" => ChatCommand::Stats,
            "reindex" => ChatCommand::Reindex,
            "flush" => ChatCommand::Flush,
            _ => ChatCommand::Invalid(format!(
                "Unknown command: {}\nType /help for available commands",
                line
            )),
        }
    }
}

/// 1-based list position from the first argument
fn index_arg(args: &[&str], usage: &str) -> Result<usize, String> {
    args.first()
        .and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .ok_or_else(|| format!("Usage: {}", usage))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
