//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::command::ChatCommand;
use crate::chat::presenter::ChatPresenter;
use crate::{ConsoleFormatter, ReplConfig, Spinner};
use colored::Colorize;
use ragdesk_application::{
    Account, AccountError, AdminConsole, AdminGateway, AuthGateway, DEFAULT_MESSAGE_LIMIT,
    DEFAULT_SESSION_LIMIT, HistoryBrowser, RagGateway, SessionController, UiEvent,
};
use ragdesk_domain::{PendingUpload, UserProfile};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Interactive chat REPL
pub struct ChatRepl<G: RagGateway + AdminGateway + AuthGateway + 'static> {
    controller: SessionController<G>,
    account: Account<G>,
    browser: HistoryBrowser<G>,
    admin: AdminConsole<G>,
    rx: mpsc::UnboundedReceiver<UiEvent>,
    presenter: ChatPresenter,
    config: ReplConfig,
    /// Signed-in user, if any
    user: Option<UserProfile>,
}

impl<G: RagGateway + AdminGateway + AuthGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl around a controller and the receiver of its events
    pub fn new(
        gateway: Arc<G>,
        controller: SessionController<G>,
        rx: mpsc::UnboundedReceiver<UiEvent>,
    ) -> Self {
        Self {
            controller,
            account: Account::new(gateway.clone()),
            browser: HistoryBrowser::new(gateway.clone()),
            admin: AdminConsole::new(gateway),
            rx,
            presenter: ChatPresenter::new(),
            config: ReplConfig::default(),
            user: None,
        }
    }

    /// Set the REPL configuration
    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.presenter = ChatPresenter::new().with_hits(config.show_hits);
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        self.start().await;

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    let command = ChatCommand::parse(line);
                    // Credentials stay out of the history file
                    if !matches!(
                        command,
                        ChatCommand::Login { .. } | ChatCommand::Signup { .. }
                    ) {
                        let _ = rl.add_history_entry(line);
                    }

                    if command == ChatCommand::Quit {
                        println!("Bye!");
                        break;
                    }
                    if command == ChatCommand::Flush && !confirm(&mut rl) {
                        println!("{}", "Flush cancelled.".dimmed());
                        continue;
                    }

                    self.dispatch(command).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Bootstrap the session and pick up an existing login
    async fn start(&mut self) {
        let spinner = Spinner::start("Connecting…", self.config.show_progress);
        match self.account.current_user().await {
            Ok(Some(user)) => {
                debug!(email = %user.email, "Resuming signed-in user");
                self.controller.set_user(Some(user.id.clone()));
                self.user = Some(user);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not resolve current user: {}", e),
        }
        self.controller.bootstrap().await;
        spinner.finish();

        for turn in self.controller.transcript() {
            println!("{}", ConsoleFormatter::format_turn(turn, self.config.show_hits));
            println!();
        }
        // The transcript was just printed in full
        while let Ok(event) = self.rx.try_recv() {
            if !event.is_transcript() {
                self.presenter.render(&event);
            }
        }
        self.print_status();
    }

    async fn dispatch(&mut self, command: ChatCommand) {
        let progress = self.config.show_progress;
        match command {
            ChatCommand::Ask(question) => {
                let spinner = Spinner::start("Thinking…", progress);
                self.controller.send(&question).await;
                spinner.finish();
            }
            ChatCommand::Help => self.print_help(),
            ChatCommand::Quit => {}
            ChatCommand::Status => self.print_status(),
            ChatCommand::Upload(paths) => {
                let spinner = Spinner::start("Uploading…", progress);
                let files = paths.into_iter().map(PendingUpload::new).collect();
                self.controller.upload_documents(files).await;
                spinner.finish();
            }
            ChatCommand::Rebuild => {
                let spinner = Spinner::start("Rebuilding the workspace index…", progress);
                self.controller.rebuild_workspace_index().await;
                spinner.finish();
            }
            ChatCommand::EnsureWorkspace => {
                let spinner = Spinner::start("Preparing workspace…", progress);
                self.controller.request_workspace().await;
                spinner.finish();
            }
            ChatCommand::Source(mode) => self.controller.set_source_mode(mode),
            ChatCommand::Provider(kind) => {
                let spinner = Spinner::start("Selecting provider…", progress);
                self.controller.change_provider(kind).await;
                spinner.finish();
            }
            ChatCommand::NewChat => self.controller.start_new_conversation(),
            ChatCommand::History => {
                print!("{}", ConsoleFormatter::format_snapshots(self.controller.snapshots()));
                println!();
            }
            ChatCommand::Open(n) => match self.controller.snapshots().get(n - 1).cloned() {
                Some(snapshot) => self.controller.restore_conversation(&snapshot),
                None => println!("{}", format!("No history entry {}.", n).yellow()),
            },
            ChatCommand::Delete(n) => {
                match self.controller.snapshots().get(n - 1).map(|s| s.id.clone()) {
                    Some(id) => {
                        self.controller.delete_snapshot(&id);
                        println!("{}", format!("Deleted entry {}.", n).dimmed());
                    }
                    None => println!("{}", format!("No history entry {}.", n).yellow()),
                }
            }
            ChatCommand::ClearHistory => {
                self.controller.clear_history();
                println!("{}", "History cleared.".dimmed());
            }
            ChatCommand::End { wipe } => {
                let wipe = wipe || self.controller.config().wipe_messages_on_end;
                let spinner = Spinner::start("Ending session…", progress);
                self.controller.end_session(wipe).await;
                spinner.finish();
            }
            ChatCommand::Login { email, password } => {
                let result = self.account.sign_in(&email, &password).await;
                self.apply_sign_in(result);
            }
            ChatCommand::Signup { email, password } => {
                let result = self.account.sign_up(&email, &password).await;
                self.apply_sign_in(result);
            }
            ChatCommand::Logout => match self.account.sign_out().await {
                Ok(()) => {
                    self.user = None;
                    self.controller.set_user(None);
                    println!("{}", "Signed out.".dimmed());
                }
                Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
            },
            ChatCommand::WhoAmI => match &self.user {
                Some(user) => println!(
                    "{} {}",
                    user.email.bold(),
                    user.role.as_deref().unwrap_or("user").dimmed()
                ),
                None => println!("{}", "anonymous".dimmed()),
            },
            ChatCommand::Sessions(filter) => {
                let spinner = Spinner::start("Loading sessions…", progress);
                let result = self.browser.list_sessions(DEFAULT_SESSION_LIMIT).await;
                spinner.finish();
                match result {
                    Ok(sessions) => {
                        let shown = HistoryBrowser::<G>::filter_sessions(
                            &sessions,
                            filter.as_deref().unwrap_or(""),
                        );
                        println!("{}", ConsoleFormatter::format_sessions(&shown));
                    }
                    Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
                }
            }
            ChatCommand::Messages(session_id) => {
                let spinner = Spinner::start("Loading messages…", progress);
                let result = self.browser.messages(&session_id, DEFAULT_MESSAGE_LIMIT).await;
                spinner.finish();
                match result {
                    Ok(messages) => print!("{}", ConsoleFormatter::format_messages(&messages)),
                    Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
                }
            }
            ChatCommand::Load(session_id) => {
                let spinner = Spinner::start("Loading messages…", progress);
                let result = self.browser.messages(&session_id, DEFAULT_MESSAGE_LIMIT).await;
                spinner.finish();
                match result {
                    Ok(messages) if messages.is_empty() => {
                        println!("{}", "No messages.".dimmed());
                    }
                    Ok(messages) => self
                        .controller
                        .replace_transcript(HistoryBrowser::<G>::to_turns(messages)),
                    Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
                }
            }
            ChatCommand::Stats => {
                let spinner = Spinner::start("Loading statistics…", progress);
                let result = self.admin.stats().await;
                spinner.finish();
                match result {
                    Ok(stats) => println!("{}", ConsoleFormatter::format_stats(&stats)),
                    Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
                }
            }
            ChatCommand::Reindex => self.admin_action(true).await,
            ChatCommand::Flush => self.admin_action(false).await,
            ChatCommand::Invalid(message) => println!("{}", message),
        }

        self.drain_events();
    }

    /// Reindex or flush, then show the acknowledgement and fresh statistics
    async fn admin_action(&self, reindex: bool) {
        let message = if reindex { "Reindexing…" } else { "Flushing the index…" };
        let spinner = Spinner::start(message, self.config.show_progress);
        let result = if reindex {
            self.admin.reindex().await
        } else {
            self.admin.flush_index().await
        };
        spinner.finish();
        match result {
            Ok(outcome) => {
                println!("{}", ConsoleFormatter::format_stats(&outcome.ack));
                println!();
                println!("{}", ConsoleFormatter::format_stats(&outcome.stats));
            }
            Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
        }
    }

    fn apply_sign_in(&mut self, result: Result<UserProfile, AccountError>) {
        match result {
            Ok(user) => {
                println!("{} {}", "Signed in as".dimmed(), user.email.bold());
                self.controller.set_user(Some(user.id.clone()));
                self.user = Some(user);
            }
            Err(e) => println!("{} {}", "❌".red(), e.to_string().red()),
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.presenter.render(&event);
        }
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.controller.session().source_mode().as_str())
    }

    fn print_status(&self) {
        println!(
            "{}",
            ConsoleFormatter::format_status(
                self.controller.session(),
                &self.controller.config().providers,
                self.user.as_ref().map(|u| u.email.as_str()),
            )
        );
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              ragdesk - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Type a question, or /help for commands.");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Conversation:");
        println!("  <text>                   - Ask a question");
        println!("  /source <workspace|global> - Choose where answers come from");
        println!("  /provider <local|cloud>  - Choose the LLM provider");
        println!("  /new                     - Archive this chat and start another");
        println!("  /history                 - List saved chats");
        println!("  /open <n>, /delete <n>   - Restore or delete a saved chat");
        println!("  /clear-history           - Delete all saved chats");
        println!();
        println!("Workspace:");
        println!("  /workspace               - Ensure the workspace exists");
        println!("  /upload <file...>        - Import documents");
        println!("  /rebuild                 - Rebuild the workspace index");
        println!("  /end [--wipe]            - End the session (optionally wiping messages)");
        println!();
        println!("Account:");
        println!("  /login <email> <password>, /signup <email> <password>");
        println!("  /logout, /whoami, /status");
        println!();
        println!("Administration:");
        println!("  /sessions [filter]       - List server-side sessions");
        println!("  /messages <id>           - Show a stored transcript");
        println!("  /load <id>               - Open a stored transcript in this chat");
        println!("  /stats, /reindex, /flush - Index statistics and maintenance");
        println!();
        println!("  /quit, /exit, /q         - Exit chat");
        println!();
    }
}

/// Ask for explicit confirmation of a destructive action
fn confirm(rl: &mut DefaultEditor) -> bool {
    match rl.readline("This empties the whole index. Type 'yes' to continue: ") {
        Ok(answer) => answer.trim().eq_ignore_ascii_case("yes"),
        Err(_) => false,
    }
}
