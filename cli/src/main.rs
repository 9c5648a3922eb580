//! CLI entrypoint for ragdesk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ragdesk_application::{
    AdminConsole, ConversationLogger, HistoryBrowser, InMemoryStore, LocalStore,
    SessionController,
};
use ragdesk_infrastructure::{
    ConfigLoader, FileConfig, FileLocalStore, HttpApiGateway, HttpSettings,
    JsonlConversationLogger,
};
use ragdesk_presentation::{ChatRepl, Cli, Command, ConsoleFormatter, ReplConfig, Spinner};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging so [logging] file can take effect
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| *e)?
    };
    if let Some(api) = &cli.api {
        config.api.base_url = api.clone();
    }

    let log_file = cli.log_file.clone().or_else(|| config.logging.file_path());
    let _guard = init_logging(cli.verbose, log_file.as_deref())?;

    info!("Starting ragdesk");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let chat_config = config
        .to_chat_config()
        .context("Invalid configuration")?;

    // === Dependency Injection ===
    let gateway = Arc::new(
        HttpApiGateway::new(&HttpSettings::from(&config.api)).context("Invalid [api] settings")?,
    );
    let show_progress = config.repl.show_progress && !cli.quiet;

    match cli.command.clone().unwrap_or(Command::Chat) {
        Command::Chat => {
            let store: Arc<dyn LocalStore> = if cli.ephemeral {
                Arc::new(InMemoryStore::new())
            } else {
                let path = config.storage.resolved_path();
                info!(path = %path.display(), "Using local state file");
                Arc::new(FileLocalStore::open(path))
            };

            let (tx, rx) = mpsc::unbounded_channel();
            let mut controller = SessionController::new(gateway.clone(), store, chat_config, tx);
            if let Some(logger) = conversation_logger(&cli, &config) {
                controller = controller.with_conversation_logger(logger);
            }

            let repl_config = ReplConfig {
                show_progress,
                show_hits: config.repl.show_hits,
                history_file: config.repl.history_file.clone(),
            };
            let mut repl = ChatRepl::new(gateway, controller, rx).with_config(repl_config);
            repl.run().await?;
        }
        Command::Sessions { filter, limit } => {
            let browser = HistoryBrowser::new(gateway);
            let spinner = Spinner::start("Loading sessions…", show_progress);
            let sessions = browser.list_sessions(limit).await;
            spinner.finish();
            let sessions = sessions?;
            let shown = HistoryBrowser::<HttpApiGateway>::filter_sessions(
                &sessions,
                filter.as_deref().unwrap_or(""),
            );
            println!("{}", ConsoleFormatter::format_sessions(&shown));
        }
        Command::Messages { session_id, limit } => {
            let browser = HistoryBrowser::new(gateway);
            let spinner = Spinner::start("Loading messages…", show_progress);
            let messages = browser.messages(&session_id, limit).await;
            spinner.finish();
            print!("{}", ConsoleFormatter::format_messages(&messages?));
        }
        Command::Stats => {
            let admin = AdminConsole::new(gateway);
            let spinner = Spinner::start("Loading statistics…", show_progress);
            let stats = admin.stats().await;
            spinner.finish();
            println!("{}", ConsoleFormatter::format_stats(&stats?));
        }
        Command::Reindex => {
            let admin = AdminConsole::new(gateway);
            let spinner = Spinner::start("Reindexing…", show_progress);
            let outcome = admin.reindex().await;
            spinner.finish();
            let outcome = outcome?;
            println!("{}", ConsoleFormatter::format_stats(&outcome.ack));
            println!();
            println!("{}", ConsoleFormatter::format_stats(&outcome.stats));
        }
        Command::Flush { yes } => {
            if !yes && !confirm("This empties the whole index. Type 'yes' to continue: ")? {
                bail!("Flush cancelled");
            }
            let admin = AdminConsole::new(gateway);
            let spinner = Spinner::start("Flushing the index…", show_progress);
            let outcome = admin.flush_index().await;
            spinner.finish();
            let outcome = outcome?;
            println!("{}", ConsoleFormatter::format_stats(&outcome.ack));
            println!();
            println!("{}", ConsoleFormatter::format_stats(&outcome.stats));
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr, or to `log_file` through a non-blocking writer whose
/// guard must live until exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn conversation_logger(cli: &Cli, config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log_path())?;
    match JsonlConversationLogger::open(&path) {
        Some(logger) => {
            info!(path = %path.display(), "Writing conversation log");
            Some(Arc::new(logger))
        }
        None => {
            warn!(path = %path.display(), "Could not open conversation log");
            None
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
