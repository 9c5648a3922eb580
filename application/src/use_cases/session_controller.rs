//! Session Controller
//!
//! Owns the conversation state machine of one chat front end: client session
//! identity, workspace binding, provider selection, the transcript and the
//! local history. Composes calls to the [`RagGateway`] and the
//! [`LocalStore`], and emits [`UiEvent`]s for the presentation layer.
//!
//! All backend failures are caught here and turned into either an
//! error-flagged assistant turn or a transient notice; nothing propagates to
//! the caller.

use crate::config::ChatConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::local_store::{LocalStore, PROVIDER_KEY, SESSION_ID_KEY};
use crate::ports::rag_gateway::{GatewayError, RagGateway};
use crate::ports::ui_event::UiEvent;
use crate::use_cases::history_store::HistoryStore;
use chrono::Local;
use ragdesk_domain::util::truncate_chars;
use ragdesk_domain::{
    ClientSession, ConversationSnapshot, ConversationTurn, PendingUpload, ProviderKind,
    QueryScope, Question, Readiness, SessionPhase, SourceMode,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Backend error text that means the workspace has no index yet
static INDEX_MISSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)workspace index missing").expect("index-missing pattern is valid")
});

const INITIAL_GREETING: &str = "Hello 👋 Choose the source (workspace/global) and the LLM provider \
     (local/cloud), then ask your question.";

const WORKSPACE_REQUIRED: &str = "Create or ensure a workspace first (or switch to global mode).";

/// Session controller managing the chat state machine
///
/// Methods take `&mut self` and are awaited one at a time by the front end;
/// every backend call is a suspension point, local state changes never are.
pub struct SessionController<G: RagGateway + 'static> {
    gateway: Arc<G>,
    store: Arc<dyn LocalStore>,
    history: HistoryStore,
    config: ChatConfig,
    session: ClientSession,
    /// Active transcript, append-only between resets
    transcript: Vec<ConversationTurn>,
    /// Local history for `user_id`, most recent last
    snapshots: Vec<ConversationSnapshot>,
    /// Signed-in user keying the local history (`None` = anonymous)
    user_id: Option<String>,
    /// Guards the one-time workspace announcement
    workspace_announced: bool,
    busy: bool,
    /// Channel sender for UI events
    tx: mpsc::UnboundedSender<UiEvent>,
    /// Conversation logger for structured event logging
    conversation_logger: Arc<dyn ConversationLogger>,
    /// Fires when the front end tears the controller down
    cancellation_token: CancellationToken,
}

impl<G: RagGateway + 'static> SessionController<G> {
    /// Create a new SessionController for an anonymous user
    pub fn new(
        gateway: Arc<G>,
        store: Arc<dyn LocalStore>,
        config: ChatConfig,
        tx: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        let history = HistoryStore::new(store.clone());
        let snapshots = history.load(None);
        let provider = remembered_provider(store.as_ref()).unwrap_or(config.fallback_provider);
        let session = ClientSession::new(config.default_source, provider);

        Self {
            gateway,
            store,
            history,
            config,
            session,
            transcript: vec![ConversationTurn::assistant(INITIAL_GREETING)],
            snapshots,
            user_id: None,
            workspace_announced: false,
            busy: false,
            tx,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Set a conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set the cancellation token signalling teardown
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Key the local history by a signed-in user
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.set_user(user_id);
        self
    }

    /// Switch the user keying the local history and reload it
    pub fn set_user(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
        self.snapshots = self.history.load(self.user_id.as_deref());
        self.emit(UiEvent::HistoryChanged {
            entries: self.snapshots.len(),
        });
    }

    // ==================== Accessors ====================

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn snapshots(&self) -> &[ConversationSnapshot] {
        &self.snapshots
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether a request is outstanding; front ends use it to disable actions
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Token that tears the controller down when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    // ==================== Bootstrap ====================

    /// Resolve identity, provision the workspace and establish the provider.
    ///
    /// The workspace and provider sub-sequences run concurrently. Failures of
    /// either degrade functionality without blocking composition. Results
    /// arriving after teardown are discarded.
    pub async fn bootstrap(&mut self) {
        self.session.begin_bootstrap();
        self.emit_session();

        let session_id = self.resolve_session_id();
        let preferred =
            remembered_provider(self.store.as_ref()).unwrap_or(self.config.fallback_provider);
        info!(session_id = %session_id, provider = %preferred, "Bootstrapping session");

        // A workspace bound earlier in this controller's lifetime is reused as is
        let bound_workspace = self.session.workspace_id().map(str::to_string);
        let token = self.cancellation_token.clone();
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            results = async {
                tokio::join!(
                    async {
                        match bound_workspace {
                            Some(workspace_id) => Ok(workspace_id),
                            None => self.gateway.ensure_workspace(&session_id).await,
                        }
                    },
                    self.probe_provider(preferred),
                )
            } => Some(results),
        };

        let Some((workspace, provider)) = outcome else {
            debug!("Controller torn down during bootstrap; discarding results");
            self.session.clear_identity();
            return;
        };

        match workspace {
            Ok(workspace_id) => self.bind_workspace(workspace_id),
            Err(e) => {
                warn!("Workspace bootstrap failed: {}", e);
                self.notify("Workspace unavailable; global mode still works.");
            }
        }

        match provider {
            Ok((kind, ready)) => {
                self.session.set_provider(kind, Readiness::from(ready));
                self.persist(PROVIDER_KEY, kind.as_str());
                if !ready {
                    self.push_assistant(format!(
                        "ℹ️ Provider **{}** is not ready. {}",
                        self.config.providers.label(kind),
                        kind.not_ready_hint()
                    ));
                }
            }
            Err(e) => {
                warn!("Provider bootstrap failed: {}", e);
                let fallback = self.config.fallback_provider;
                self.session.set_provider(fallback, Readiness::NotReady);
                self.push_assistant(format!(
                    "⚠️ Could not select the LLM provider at startup. Staying on {}.",
                    self.config.providers.label(fallback)
                ));
            }
        }

        self.session.mark_ready();
        self.emit_session();
    }

    /// Current provider, selecting `preferred` when none is active server-side.
    ///
    /// Returns the resolved provider and its readiness.
    async fn probe_provider(
        &self,
        preferred: ProviderKind,
    ) -> Result<(ProviderKind, bool), GatewayError> {
        let status = self.gateway.provider_status().await?;
        if let Some(active) = status.active_provider.filter(|p| !p.trim().is_empty()) {
            let kind = self.config.providers.from_wire(&active).unwrap_or(preferred);
            return Ok((kind, status.ready));
        }

        let selection = self
            .gateway
            .select_provider(self.config.providers.to_wire(preferred))
            .await?;
        let kind = self
            .config
            .providers
            .from_wire(&selection.provider)
            .unwrap_or(preferred);
        Ok((kind, selection.ready))
    }

    // ==================== Workspace ====================

    /// Make sure a workspace is bound, provisioning it if needed.
    ///
    /// Idempotent: once bound, no network call is made unless `force` is set.
    /// The backend keys workspaces on the session id, so forcing never
    /// creates a duplicate.
    pub async fn ensure_workspace(&mut self, force: bool) -> Result<String, GatewayError> {
        if !force && let Some(workspace_id) = self.session.workspace_id() {
            return Ok(workspace_id.to_string());
        }

        self.resume_if_ended();
        let session_id = self.resolve_session_id();
        let workspace_id = self.gateway.ensure_workspace(&session_id).await?;
        self.bind_workspace(workspace_id.clone());
        Ok(workspace_id)
    }

    /// Explicit "ensure workspace" user action
    pub async fn request_workspace(&mut self) {
        self.set_busy(true);
        match self.ensure_workspace(true).await {
            Ok(workspace_id) => self.notify(format!("Workspace ready: {}", workspace_id)),
            Err(e) => self.push_error(format!("Could not ensure the workspace: {}", e)),
        }
        self.set_busy(false);
    }

    /// Rebuild the workspace index and report the resulting corpus statistics
    pub async fn rebuild_workspace_index(&mut self) {
        let Some(workspace_id) = self.session.workspace_id().map(str::to_string) else {
            self.notify("Create or ensure a workspace first.");
            return;
        };

        self.set_busy(true);
        info!(workspace_id = %workspace_id, "Rebuilding workspace index");
        match self.gateway.build_workspace(&workspace_id, true).await {
            Ok(stats) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "workspace_rebuilt",
                    serde_json::json!({
                        "workspace_id": workspace_id,
                        "total_chunks": stats.total_chunks,
                        "total_vectors": stats.total_vectors,
                    }),
                ));
                self.notify("Index rebuilt.");
                self.push_assistant(format!(
                    "🔧 Index rebuilt for **{}**: chunks: {}, vectors: {}.",
                    workspace_id,
                    stats.chunks_display(),
                    stats.vectors_display()
                ));
            }
            Err(e) => {
                warn!("Workspace rebuild failed: {}", e);
                self.push_error(e.to_string());
            }
        }
        self.set_busy(false);
    }

    /// Ingest files into the workspace, strictly one after another.
    ///
    /// A failed file never stops the following ones.
    pub async fn upload_documents(&mut self, files: Vec<PendingUpload>) {
        if files.is_empty() {
            return;
        }

        self.set_busy(true);
        let workspace_id = match self.ensure_workspace(false).await {
            Ok(workspace_id) => workspace_id,
            Err(e) => {
                warn!("Could not prepare workspace for upload: {}", e);
                self.push_error(format!("Could not prepare the workspace: {}", e));
                self.set_busy(false);
                return;
            }
        };

        let auto_build = self.config.auto_build_on_upload;
        for file in &files {
            let name = file.display_name().to_string();
            self.push_assistant(format!("📄 Importing {}…", name));

            match self
                .gateway
                .upload_document(&workspace_id, file, auto_build)
                .await
            {
                Ok(receipt) => {
                    debug!(filename = %receipt.filename, status = ?receipt.status, "Upload accepted");
                    self.conversation_logger.log(ConversationEvent::new(
                        "upload",
                        serde_json::json!({ "workspace_id": workspace_id, "file": name }),
                    ));
                    self.push_assistant(format!(
                        "✅ {} imported. The workspace index will be updated.",
                        name
                    ));
                }
                Err(e) => {
                    warn!("Upload of {} failed: {}", name, e);
                    self.push_error(format!("Import of {} failed: {}", name, e));
                }
            }
        }
        self.set_busy(false);
    }

    // ==================== Conversation ====================

    /// Send a question.
    ///
    /// The user turn is appended before the request goes out. In workspace
    /// mode without a bound workspace the send is refused with a notice and
    /// no request is made.
    pub async fn send(&mut self, text: &str) {
        let Some(question) = Question::try_new(text) else {
            return;
        };
        let scope = match self.session.query_scope() {
            Ok(scope) => scope,
            Err(_) => {
                self.notify(WORKSPACE_REQUIRED);
                return;
            }
        };

        self.resume_if_ended();
        self.push_turn(ConversationTurn::user(question.content()));
        self.set_busy(true);

        let options = self.config.query;
        info!(
            scope = ?scope,
            "Sending question: {}",
            truncate_chars(question.content(), 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "query",
            serde_json::json!({
                "source": self.session.source_mode().as_str(),
                "text": question.content(),
                "k": options.top_k,
                "min_score": options.min_score,
            }),
        ));

        let result = match &scope {
            QueryScope::Workspace { workspace_id } => {
                self.gateway
                    .query_workspace(workspace_id, &question, &options)
                    .await
            }
            QueryScope::Global { session_id } => {
                self.gateway
                    .query_global(&question, &options, session_id.as_deref())
                    .await
            }
        };

        match result {
            Ok(answer) => {
                if matches!(scope, QueryScope::Global { .. })
                    && self.session.session_id().is_none()
                    && let Some(session_id) = answer.session_id.clone()
                {
                    info!(session_id = %session_id, "Adopting session id minted by backend");
                    self.persist(SESSION_ID_KEY, &session_id);
                    self.session.bind_session(session_id);
                    self.emit_session();
                }
                self.conversation_logger.log(ConversationEvent::new(
                    "answer",
                    serde_json::json!({
                        "bytes": answer.answer.len(),
                        "hits": answer.hits.len(),
                        "text": answer.answer,
                    }),
                ));
                self.push_turn(answer.into_turn());
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.conversation_logger.log(ConversationEvent::new(
                    "query_error",
                    serde_json::json!({ "error": e.to_string() }),
                ));
                self.push_error(describe_query_error(&e));
            }
        }
        self.set_busy(false);
    }

    /// Select another LLM provider.
    ///
    /// Refused while a request is outstanding; the front end is expected to
    /// disable the action on [`UiEvent::BusyChanged`].
    pub async fn change_provider(&mut self, next: ProviderKind) {
        if self.busy {
            self.notify("A request is in progress; try again when it finishes.");
            return;
        }

        self.set_busy(true);
        match self
            .gateway
            .select_provider(self.config.providers.to_wire(next))
            .await
        {
            Ok(selection) => {
                let kind = self
                    .config
                    .providers
                    .from_wire(&selection.provider)
                    .unwrap_or(next);
                let readiness = Readiness::from(selection.ready);
                self.session.set_provider(kind, readiness);
                self.persist(PROVIDER_KEY, kind.as_str());
                self.conversation_logger.log(ConversationEvent::new(
                    "provider_selected",
                    serde_json::json!({ "provider": selection.provider, "ready": selection.ready }),
                ));

                let label = self.config.providers.label(kind);
                self.notify(format!("Provider: {} ({})", label, readiness));
                self.push_assistant(format!(
                    "🧠 LLM selected: **{}** · status: **{}**",
                    label, readiness
                ));
                self.emit_session();
            }
            Err(e) => {
                warn!("Provider selection failed: {}", e);
                self.push_error(e.to_string());
            }
        }
        self.set_busy(false);
    }

    /// Switch between workspace and global sources.
    ///
    /// Switching to workspace mode is refused while no workspace is bound.
    pub fn set_source_mode(&mut self, mode: SourceMode) {
        match self.session.set_source_mode(mode) {
            Ok(()) => {
                self.notify(format!("Source: {}", mode));
                self.emit_session();
            }
            Err(_) => self.notify("Create or ensure a workspace first."),
        }
    }

    /// Archive the transcript into local history and start over with a greeting
    pub fn start_new_conversation(&mut self) {
        let snapshot = ConversationSnapshot::archive(
            &self.transcript,
            self.config.title_max_chars,
            Local::now(),
        );
        info!(title = %snapshot.title, turns = snapshot.turn_count(), "Archiving conversation");

        self.snapshots.push(snapshot);
        self.history.save(self.user_id.as_deref(), &self.snapshots);
        self.emit(UiEvent::HistoryChanged {
            entries: self.snapshots.len(),
        });

        let greeting = ConversationTurn::assistant(format!(
            "New chat. Workspace: **{}**. Source: **{}**. LLM: **{}**",
            self.session.workspace_id().unwrap_or("—"),
            self.session.source_mode(),
            self.config.providers.label(self.session.provider())
        ));
        self.replace_transcript(vec![greeting]);
    }

    /// Replace the transcript with an archived snapshot; history is untouched
    pub fn restore_conversation(&mut self, snapshot: &ConversationSnapshot) {
        debug!(id = %snapshot.id, "Restoring conversation");
        self.replace_transcript(snapshot.snapshot.clone());
    }

    /// Replace the transcript wholesale (e.g. a server-side transcript opened in chat)
    pub fn replace_transcript(&mut self, turns: Vec<ConversationTurn>) {
        self.transcript = turns;
        self.emit(UiEvent::TranscriptReplaced(self.transcript.clone()));
    }

    /// Delete one history entry. Returns whether it existed.
    pub fn delete_snapshot(&mut self, id: &str) -> bool {
        let before = self.snapshots.len();
        self.snapshots.retain(|s| s.id != id);
        if self.snapshots.len() == before {
            return false;
        }
        self.history.save(self.user_id.as_deref(), &self.snapshots);
        self.emit(UiEvent::HistoryChanged {
            entries: self.snapshots.len(),
        });
        true
    }

    /// Empty the local history of the current user; the transcript is untouched
    pub fn clear_history(&mut self) {
        self.snapshots.clear();
        self.history.clear(self.user_id.as_deref());
        self.emit(UiEvent::HistoryChanged { entries: 0 });
    }

    // ==================== Teardown ====================

    /// Destroy the session server-side, then forget it locally.
    ///
    /// Local identifiers are only cleared once the backend confirmed the
    /// cleanup, so a failure never orphans server-side resources.
    pub async fn end_session(&mut self, wipe_messages: bool) {
        let Some(session_id) = self.session.session_id().map(str::to_string) else {
            self.notify("No active session to end.");
            return;
        };

        self.set_busy(true);
        match self.gateway.cleanup_session(&session_id, wipe_messages).await {
            Ok(()) => {
                info!(session_id = %session_id, wipe_messages, "Session ended");
                self.conversation_logger.log(ConversationEvent::new(
                    "session_ended",
                    serde_json::json!({ "session_id": session_id, "wipe_messages": wipe_messages }),
                ));
                self.session.clear_identity();
                self.workspace_announced = false;
                if let Err(e) = self.store.remove(SESSION_ID_KEY) {
                    warn!("Could not forget persisted session id: {}", e);
                }
                self.notify("Session ended.");
                self.emit_session();
            }
            Err(e) => {
                warn!("Session cleanup failed: {}", e);
                self.push_error(format!("Could not end the session: {}", e));
            }
        }
        self.set_busy(false);
    }

    // ==================== Internals ====================

    /// Re-enter `Ready` when an operation is served outside `bootstrap`,
    /// e.g. after `end_session` returned the session to `Uninitialized`.
    fn resume_if_ended(&mut self) {
        if self.session.phase() != SessionPhase::Uninitialized {
            return;
        }
        debug!("Re-establishing session outside bootstrap");
        self.session.begin_bootstrap();
        self.session.mark_ready();
        self.emit_session();
    }

    /// Bound session id, else the persisted one, else a fresh one (persisted)
    fn resolve_session_id(&mut self) -> String {
        if let Some(session_id) = self.session.session_id() {
            return session_id.to_string();
        }

        let stored = match self.store.get(SESSION_ID_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!("Could not read persisted session id: {}", e);
                None
            }
        };
        let session_id = match stored {
            Some(session_id) => session_id,
            None => {
                let session_id = uuid::Uuid::new_v4().to_string();
                debug!(session_id = %session_id, "Generated client session id");
                self.persist(SESSION_ID_KEY, &session_id);
                session_id
            }
        };
        self.session.bind_session(session_id.clone());
        session_id
    }

    fn bind_workspace(&mut self, workspace_id: String) {
        self.session.bind_workspace(workspace_id.clone());
        if !self.workspace_announced {
            self.workspace_announced = true;
            self.push_assistant(format!(
                "✨ Workspace ready: **{}**. Upload your documents, then ask in **workspace** mode.",
                workspace_id
            ));
        }
        self.emit_session();
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Could not persist {}: {}", key, e);
        }
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }

    fn emit_session(&self) {
        self.emit(UiEvent::SessionChanged(self.session.clone()));
    }

    fn notify(&self, message: impl Into<String>) {
        self.emit(UiEvent::Notice(message.into()));
    }

    fn push_turn(&mut self, turn: ConversationTurn) {
        self.transcript.push(turn.clone());
        self.emit(UiEvent::TurnAppended(turn));
    }

    fn push_assistant(&mut self, content: impl Into<String>) {
        self.push_turn(ConversationTurn::assistant(content));
    }

    fn push_error(&mut self, content: impl Into<String>) {
        self.push_turn(ConversationTurn::error(content));
    }

    fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            self.busy = busy;
            self.emit(UiEvent::BusyChanged(busy));
        }
    }
}

/// Provider remembered from a previous run, if readable
fn remembered_provider(store: &dyn LocalStore) -> Option<ProviderKind> {
    store
        .get(PROVIDER_KEY)
        .ok()
        .flatten()
        .and_then(|name| name.parse().ok())
}

/// User-facing text for a failed query; a missing index becomes rebuild guidance
fn describe_query_error(error: &GatewayError) -> String {
    let message = error.to_string();
    if INDEX_MISSING.is_match(&message) {
        "Workspace index missing. Rebuild the workspace index, then try again.".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::local_store::{InMemoryStore, history_key};
    use async_trait::async_trait;
    use ragdesk_domain::{
        Hit, IndexStats, ProviderSelection, ProviderStatus, QueryAnswer, QueryOptions,
        UploadReceipt,
    };
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    // === Mock implementations ===

    struct MockGateway {
        calls: Mutex<Vec<String>>,
        workspace: Result<String, GatewayError>,
        build: Result<IndexStats, GatewayError>,
        failing_uploads: HashSet<String>,
        answers: Mutex<VecDeque<Result<QueryAnswer, GatewayError>>>,
        status: Result<ProviderStatus, GatewayError>,
        select_ready: Result<bool, GatewayError>,
        cleanup: Result<(), GatewayError>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                workspace: Ok("sess-123".to_string()),
                build: Ok(IndexStats {
                    total_chunks: Some(12),
                    total_vectors: Some(12),
                }),
                failing_uploads: HashSet::new(),
                answers: Mutex::new(VecDeque::new()),
                status: Ok(ProviderStatus {
                    active_provider: Some("ollama".to_string()),
                    ready: true,
                }),
                select_ready: Ok(true),
                cleanup: Ok(()),
            }
        }

        fn with_answers(self, answers: Vec<Result<QueryAnswer, GatewayError>>) -> Self {
            *self.answers.lock().unwrap() = answers.into();
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn answer(text: &str) -> QueryAnswer {
        QueryAnswer {
            answer: text.to_string(),
            hits: vec![Hit {
                subject: Some("X".to_string()),
                source: Some("docs/doc.pdf".to_string()),
                content: "X is ...".to_string(),
                score: Some(0.71),
            }],
            context: Some("context blob".to_string()),
            session_id: None,
        }
    }

    #[async_trait]
    impl RagGateway for MockGateway {
        async fn ensure_workspace(&self, session_id: &str) -> Result<String, GatewayError> {
            self.record(format!("ensure_workspace:{}", session_id));
            self.workspace.clone()
        }

        async fn build_workspace(
            &self,
            workspace_id: &str,
            force: bool,
        ) -> Result<IndexStats, GatewayError> {
            self.record(format!("build:{}:{}", workspace_id, force));
            self.build.clone()
        }

        async fn upload_document(
            &self,
            workspace_id: &str,
            upload: &PendingUpload,
            auto_build: bool,
        ) -> Result<UploadReceipt, GatewayError> {
            let name = upload.display_name().to_string();
            self.record(format!("upload:{}:{}:{}", workspace_id, name, auto_build));
            if self.failing_uploads.contains(&name) {
                return Err(GatewayError::Status {
                    status: 415,
                    message: "unsupported file".to_string(),
                });
            }
            Ok(UploadReceipt {
                filename: name,
                status: Some("indexed".to_string()),
            })
        }

        async fn query_workspace(
            &self,
            workspace_id: &str,
            question: &Question,
            options: &QueryOptions,
        ) -> Result<QueryAnswer, GatewayError> {
            self.record(format!(
                "query_workspace:{}:{}:{}",
                workspace_id,
                options.top_k,
                question.content()
            ));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(answer(&format!("answer to {}", question))))
        }

        async fn query_global(
            &self,
            question: &Question,
            _options: &QueryOptions,
            session_id: Option<&str>,
        ) -> Result<QueryAnswer, GatewayError> {
            self.record(format!(
                "query_global:{}:{}",
                session_id.unwrap_or("-"),
                question.content()
            ));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(answer(&format!("answer to {}", question))))
        }

        async fn select_provider(
            &self,
            provider: &str,
        ) -> Result<ProviderSelection, GatewayError> {
            self.record(format!("select:{}", provider));
            self.select_ready.clone().map(|ready| ProviderSelection {
                provider: provider.to_string(),
                ready,
            })
        }

        async fn provider_status(&self) -> Result<ProviderStatus, GatewayError> {
            self.record("status".to_string());
            self.status.clone()
        }

        async fn cleanup_session(
            &self,
            session_id: &str,
            wipe_messages: bool,
        ) -> Result<(), GatewayError> {
            self.record(format!("cleanup:{}:{}", session_id, wipe_messages));
            self.cleanup.clone()
        }
    }

    fn refused() -> GatewayError {
        GatewayError::ConnectionError("connection refused".to_string())
    }

    fn create_controller(
        gateway: MockGateway,
        store: Arc<InMemoryStore>,
        config: ChatConfig,
    ) -> (
        SessionController<MockGateway>,
        Arc<MockGateway>,
        mpsc::UnboundedReceiver<UiEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gateway = Arc::new(gateway);
        let controller = SessionController::new(gateway.clone(), store, config, tx);
        (controller, gateway, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn appended(events: &[UiEvent]) -> Vec<ConversationTurn> {
        events
            .iter()
            .filter_map(|e| match e {
                UiEvent::TurnAppended(turn) => Some(turn.clone()),
                _ => None,
            })
            .collect()
    }

    fn notices(events: &[UiEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notice(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn global_config() -> ChatConfig {
        ChatConfig::default().with_default_source(SourceMode::Global)
    }

    // === Bootstrap ===

    #[tokio::test]
    async fn test_bootstrap_binds_workspace_and_announces_once() {
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, mut rx) =
            create_controller(MockGateway::new(), store.clone(), ChatConfig::default());

        controller.bootstrap().await;
        let first = controller.ensure_workspace(true).await.unwrap();
        let second = controller.ensure_workspace(true).await.unwrap();

        assert_eq!(first, "sess-123");
        assert_eq!(second, "sess-123");
        assert_eq!(controller.session().workspace_id(), Some("sess-123"));
        assert_eq!(controller.session().phase(), SessionPhase::Ready);

        let announcements = appended(&drain(&mut rx))
            .into_iter()
            .filter(|t| t.content.contains("Workspace ready"))
            .count();
        assert_eq!(announcements, 1);

        let session_id = store.get(SESSION_ID_KEY).unwrap().unwrap();
        assert_eq!(controller.session().session_id(), Some(session_id.as_str()));
        let ensures = gateway
            .calls()
            .iter()
            .filter(|c| c.starts_with("ensure_workspace"))
            .count();
        assert_eq!(ensures, 3);
    }

    #[tokio::test]
    async fn test_ensure_workspace_short_circuits_once_bound() {
        let (mut controller, gateway, _rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.ensure_workspace(false).await.unwrap();
        controller.ensure_workspace(false).await.unwrap();

        let ensures = gateway
            .calls()
            .iter()
            .filter(|c| c.starts_with("ensure_workspace"))
            .count();
        assert_eq!(ensures, 1);
    }

    #[tokio::test]
    async fn test_repeated_bootstrap_keeps_bound_workspace() {
        let (mut controller, gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.bootstrap().await;
        controller.bootstrap().await;

        let ensures = gateway
            .calls()
            .iter()
            .filter(|c| c.starts_with("ensure_workspace"))
            .count();
        assert_eq!(ensures, 1);
        assert_eq!(controller.session().workspace_id(), Some("sess-123"));
        assert_eq!(controller.session().phase(), SessionPhase::Ready);
        let announcements = appended(&drain(&mut rx))
            .into_iter()
            .filter(|t| t.content.contains("Workspace ready"))
            .count();
        assert_eq!(announcements, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_reuses_persisted_session_id() {
        let store = Arc::new(InMemoryStore::with_entries([(SESSION_ID_KEY, "persisted-1")]));
        let (mut controller, gateway, _rx) =
            create_controller(MockGateway::new(), store, ChatConfig::default());

        controller.bootstrap().await;

        assert_eq!(controller.session().session_id(), Some("persisted-1"));
        assert!(gateway
            .calls()
            .contains(&"ensure_workspace:persisted-1".to_string()));
    }

    #[tokio::test]
    async fn test_workspace_bootstrap_failure_degrades_to_global() {
        let gateway = MockGateway {
            workspace: Err(refused()),
            ..MockGateway::new()
        };
        let (mut controller, _gateway, mut rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), ChatConfig::default());

        controller.bootstrap().await;
        let events = drain(&mut rx);

        assert!(controller.session().workspace_id().is_none());
        assert_eq!(controller.session().phase(), SessionPhase::Ready);
        assert!(appended(&events).iter().all(|t| !t.is_error));
        assert_eq!(notices(&events).len(), 1);

        controller.set_source_mode(SourceMode::Global);
        controller.send("Still there?").await;
        assert_eq!(controller.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_provider_bootstrap_uses_active_provider() {
        let gateway = MockGateway {
            status: Ok(ProviderStatus {
                active_provider: Some("groq".to_string()),
                ready: true,
            }),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, mut rx) =
            create_controller(gateway, store.clone(), ChatConfig::default());

        controller.bootstrap().await;

        assert_eq!(controller.session().provider(), ProviderKind::Cloud);
        assert_eq!(controller.session().readiness(), Readiness::Ready);
        assert_eq!(store.get(PROVIDER_KEY).unwrap().as_deref(), Some("cloud"));
        assert!(!gateway.calls().iter().any(|c| c.starts_with("select")));
        // Only the workspace announcement; no provider advisory when ready
        assert_eq!(appended(&drain(&mut rx)).len(), 1);
    }

    #[tokio::test]
    async fn test_provider_bootstrap_selects_remembered_provider() {
        let gateway = MockGateway {
            status: Ok(ProviderStatus::default()),
            select_ready: Ok(false),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::with_entries([(PROVIDER_KEY, "cloud")]));
        let (mut controller, gateway, mut rx) =
            create_controller(gateway, store, ChatConfig::default());

        controller.bootstrap().await;

        assert!(gateway.calls().contains(&"select:groq".to_string()));
        assert_eq!(controller.session().provider(), ProviderKind::Cloud);
        assert_eq!(controller.session().readiness(), Readiness::NotReady);
        let turns = appended(&drain(&mut rx));
        let advisory = turns.last().unwrap();
        assert!(advisory.content.contains("not ready"));
        assert!(advisory.content.contains(ProviderKind::Cloud.not_ready_hint()));
    }

    #[tokio::test]
    async fn test_provider_bootstrap_failure_falls_back() {
        let gateway = MockGateway {
            status: Err(refused()),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::with_entries([(PROVIDER_KEY, "cloud")]));
        let (mut controller, _gateway, mut rx) =
            create_controller(gateway, store, ChatConfig::default());

        controller.bootstrap().await;

        assert_eq!(controller.session().provider(), ProviderKind::Local);
        assert_eq!(controller.session().readiness(), Readiness::NotReady);
        let turns = appended(&drain(&mut rx));
        assert!(turns.iter().any(|t| t.content.contains("Could not select")));
    }

    #[tokio::test]
    async fn test_bootstrap_results_discarded_after_teardown() {
        let (mut controller, _gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.cancellation_token().cancel();
        controller.bootstrap().await;

        assert!(controller.session().workspace_id().is_none());
        assert_eq!(controller.session().phase(), SessionPhase::Uninitialized);
        assert!(appended(&drain(&mut rx)).is_empty());
    }

    // === Send ===

    #[tokio::test]
    async fn test_send_in_workspace_mode_without_workspace_is_refused_locally() {
        let (mut controller, gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.send("What is X?").await;
        let events = drain(&mut rx);

        assert!(gateway.calls().is_empty());
        assert_eq!(notices(&events).len(), 1);
        assert!(appended(&events).is_empty());
        assert_eq!(controller.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_send_ignores_blank_text() {
        let (mut controller, gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            global_config(),
        );

        controller.send("   ").await;

        assert!(gateway.calls().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_sequential_sends_alternate_user_and_assistant() {
        let (mut controller, _gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            global_config(),
        );

        for question in ["one", "two", "three"] {
            controller.send(question).await;
        }

        let turns = &controller.transcript()[1..];
        assert_eq!(turns.len(), 6);
        for (i, pair) in turns.chunks(2).enumerate() {
            assert!(pair[0].is_user());
            assert!(!pair[1].is_user());
            assert!(pair[1].content.ends_with(["one", "two", "three"][i]));
        }

        // The user turn is published before the request starts
        let events = drain(&mut rx);
        assert!(matches!(events[0], UiEvent::TurnAppended(ref t) if t.is_user()));
        assert!(matches!(events[1], UiEvent::BusyChanged(true)));
    }

    #[tokio::test]
    async fn test_workspace_send_scopes_query_to_workspace() {
        let (mut controller, gateway, _rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );
        controller.ensure_workspace(false).await.unwrap();

        controller.send("  What is X?  ").await;

        assert!(gateway
            .calls()
            .contains(&"query_workspace:sess-123:6:What is X?".to_string()));
        let last = controller.transcript().last().unwrap();
        assert_eq!(last.hits.len(), 1);
        assert_eq!(last.context.as_deref(), Some("context blob"));
    }

    #[tokio::test]
    async fn test_index_missing_error_becomes_rebuild_guidance() {
        let gateway = MockGateway::new().with_answers(vec![Err(GatewayError::Status {
            status: 409,
            message: "WORKSPACE INDEX MISSING for sess-123".to_string(),
        })]);
        let (mut controller, _gateway, _rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), ChatConfig::default());
        controller.ensure_workspace(false).await.unwrap();

        controller.send("What is X?").await;

        let last = controller.transcript().last().unwrap();
        assert!(last.is_error);
        assert!(last.content.contains("Rebuild the workspace index"));
        assert!(!last.content.contains("WORKSPACE INDEX MISSING"));
    }

    #[tokio::test]
    async fn test_other_errors_surface_raw_message() {
        let gateway = MockGateway::new().with_answers(vec![Err(refused())]);
        let (mut controller, _gateway, _rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), global_config());

        controller.send("What is X?").await;

        let last = controller.transcript().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.content, "Connection error: connection refused");
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_global_send_adopts_minted_session_id() {
        let minted = QueryAnswer {
            session_id: Some("srv-1".to_string()),
            ..answer("hi")
        };
        let gateway = MockGateway::new().with_answers(vec![Ok(minted), Ok(QueryAnswer {
            session_id: Some("srv-2".to_string()),
            ..answer("again")
        })]);
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, _rx) =
            create_controller(gateway, store.clone(), global_config());

        controller.send("first").await;
        controller.send("second").await;

        assert_eq!(controller.session().session_id(), Some("srv-1"));
        assert_eq!(store.get(SESSION_ID_KEY).unwrap().as_deref(), Some("srv-1"));
        assert_eq!(
            gateway.calls(),
            vec!["query_global:-:first".to_string(), "query_global:srv-1:second".to_string()]
        );
    }

    // === Uploads ===

    #[tokio::test]
    async fn test_uploads_are_sequential_and_failures_do_not_abort() {
        let gateway = MockGateway {
            failing_uploads: HashSet::from(["b.txt".to_string()]),
            ..MockGateway::new()
        };
        let (mut controller, gateway, mut rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), ChatConfig::default());

        controller
            .upload_documents(vec![
                PendingUpload::new("a.pdf"),
                PendingUpload::new("b.txt"),
                PendingUpload::new("c.md"),
            ])
            .await;

        let contents: Vec<String> = appended(&drain(&mut rx))
            .into_iter()
            .map(|t| t.content)
            .collect();
        let position = |needle: &str| {
            contents
                .iter()
                .position(|c| c.contains(needle))
                .unwrap_or_else(|| panic!("missing advisory: {}", needle))
        };

        assert!(position("a.pdf imported") < position("Importing b.txt"));
        assert!(position("Import of b.txt failed") < position("Importing c.md"));
        assert!(position("c.md imported") > position("Importing c.md"));

        let uploads: Vec<String> = gateway
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("upload"))
            .collect();
        assert_eq!(
            uploads,
            vec![
                "upload:sess-123:a.pdf:true",
                "upload:sess-123:b.txt:true",
                "upload:sess-123:c.md:true"
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_stops_when_workspace_cannot_be_prepared() {
        let gateway = MockGateway {
            workspace: Err(refused()),
            ..MockGateway::new()
        };
        let (mut controller, gateway, _rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), ChatConfig::default());

        controller
            .upload_documents(vec![PendingUpload::new("a.pdf")])
            .await;

        assert!(!gateway.calls().iter().any(|c| c.starts_with("upload")));
        let last = controller.transcript().last().unwrap();
        assert!(last.is_error);
        assert!(!controller.is_busy());
    }

    // === Workspace actions ===

    #[tokio::test]
    async fn test_rebuild_requires_workspace() {
        let (mut controller, gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.rebuild_workspace_index().await;

        assert!(gateway.calls().is_empty());
        assert_eq!(notices(&drain(&mut rx)).len(), 1);
    }

    #[tokio::test]
    async fn test_rebuild_reports_stats_verbatim() {
        let gateway = MockGateway {
            build: Ok(IndexStats {
                total_chunks: Some(128),
                total_vectors: None,
            }),
            ..MockGateway::new()
        };
        let (mut controller, gateway, _rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), ChatConfig::default());
        controller.ensure_workspace(false).await.unwrap();

        controller.rebuild_workspace_index().await;

        assert!(gateway.calls().contains(&"build:sess-123:true".to_string()));
        let last = controller.transcript().last().unwrap();
        assert!(last.content.contains("chunks: 128, vectors: ?"));
    }

    // === Provider ===

    #[tokio::test]
    async fn test_change_provider_updates_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, mut rx) =
            create_controller(MockGateway::new(), store.clone(), ChatConfig::default());

        controller.change_provider(ProviderKind::Cloud).await;

        assert!(gateway.calls().contains(&"select:groq".to_string()));
        assert_eq!(controller.session().provider(), ProviderKind::Cloud);
        assert_eq!(controller.session().readiness(), Readiness::Ready);
        assert_eq!(store.get(PROVIDER_KEY).unwrap().as_deref(), Some("cloud"));

        let events = drain(&mut rx);
        assert_eq!(notices(&events).len(), 1);
        assert!(appended(&events)[0].content.contains("LLM selected"));
    }

    #[tokio::test]
    async fn test_change_provider_failure_keeps_state() {
        let gateway = MockGateway {
            select_ready: Err(refused()),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, _gateway, _rx) =
            create_controller(gateway, store.clone(), ChatConfig::default());

        controller.change_provider(ProviderKind::Cloud).await;

        assert_eq!(controller.session().provider(), ProviderKind::Local);
        assert!(store.get(PROVIDER_KEY).unwrap().is_none());
        assert!(controller.transcript().last().unwrap().is_error);
    }

    #[tokio::test]
    async fn test_source_mode_switch_requires_workspace() {
        let (mut controller, _gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            global_config(),
        );

        controller.set_source_mode(SourceMode::Workspace);
        assert_eq!(controller.session().source_mode(), SourceMode::Global);
        assert_eq!(notices(&drain(&mut rx)).len(), 1);

        controller.ensure_workspace(false).await.unwrap();
        controller.set_source_mode(SourceMode::Workspace);
        assert_eq!(controller.session().source_mode(), SourceMode::Workspace);
    }

    // === History ===

    #[tokio::test]
    async fn test_new_conversation_archives_transcript() {
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, _gateway, mut rx) =
            create_controller(MockGateway::new(), store.clone(), global_config());
        controller.replace_transcript(vec![
            ConversationTurn::assistant("greeting"),
            ConversationTurn::user("Hello"),
            ConversationTurn::assistant("Hi"),
        ]);

        controller.start_new_conversation();

        assert_eq!(controller.snapshots().len(), 1);
        let snapshot = &controller.snapshots()[0];
        assert_eq!(snapshot.title, "Hello");
        assert_eq!(snapshot.snapshot.len(), 3);

        assert_eq!(controller.transcript().len(), 1);
        let greeting = &controller.transcript()[0];
        assert!(greeting.content.starts_with("New chat."));
        assert!(greeting.content.contains("global"));

        let persisted = store.get(&history_key(None)).unwrap().unwrap();
        let parsed: Vec<ConversationSnapshot> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(parsed[0].id, snapshot.id);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::HistoryChanged { entries: 1 })));
    }

    #[tokio::test]
    async fn test_history_is_appended_most_recent_last() {
        let (mut controller, _gateway, _rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            global_config(),
        );

        controller.send("first topic").await;
        controller.start_new_conversation();
        controller.send("second topic").await;
        controller.start_new_conversation();

        let titles: Vec<&str> = controller
            .snapshots()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first topic", "second topic"]);
    }

    #[tokio::test]
    async fn test_restore_and_clear_history() {
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, _gateway, _rx) =
            create_controller(MockGateway::new(), store.clone(), global_config());
        controller.send("Hello").await;
        controller.start_new_conversation();

        let snapshot = controller.snapshots()[0].clone();
        controller.restore_conversation(&snapshot);
        assert_eq!(controller.transcript(), snapshot.snapshot.as_slice());
        assert_eq!(controller.snapshots().len(), 1);

        controller.clear_history();
        assert!(controller.snapshots().is_empty());
        assert_eq!(controller.transcript(), snapshot.snapshot.as_slice());
        assert!(store.get(&history_key(None)).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_single_snapshot() {
        let (mut controller, _gateway, _rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            global_config(),
        );
        controller.start_new_conversation();
        controller.start_new_conversation();
        let id = controller.snapshots()[0].id.clone();

        assert!(controller.delete_snapshot(&id));
        assert!(!controller.delete_snapshot(&id));
        assert_eq!(controller.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_keyed_per_user() {
        let store = Arc::new(InMemoryStore::new());
        let (controller, _gateway, _rx) =
            create_controller(MockGateway::new(), store.clone(), global_config());
        let mut controller = controller.with_user(Some("alice".to_string()));

        controller.start_new_conversation();
        assert!(store.get(&history_key(Some("alice"))).unwrap().is_some());
        assert!(store.get(&history_key(None)).unwrap().is_none());

        controller.set_user(None);
        assert!(controller.snapshots().is_empty());
    }

    // === End session ===

    #[tokio::test]
    async fn test_end_session_failure_keeps_identifiers() {
        let gateway = MockGateway {
            cleanup: Err(refused()),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, _gateway, _rx) =
            create_controller(gateway, store.clone(), ChatConfig::default());
        controller.bootstrap().await;

        controller.end_session(false).await;

        assert!(controller.session().session_id().is_some());
        assert_eq!(controller.session().workspace_id(), Some("sess-123"));
        assert!(store.get(SESSION_ID_KEY).unwrap().is_some());
        assert!(controller.transcript().last().unwrap().is_error);
    }

    #[tokio::test]
    async fn test_end_session_success_clears_identity() {
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, _rx) =
            create_controller(MockGateway::new(), store.clone(), ChatConfig::default());
        controller.bootstrap().await;
        let session_id = controller.session().session_id().unwrap().to_string();

        controller.end_session(true).await;

        assert!(gateway
            .calls()
            .contains(&format!("cleanup:{}:true", session_id)));
        assert!(controller.session().session_id().is_none());
        assert!(controller.session().workspace_id().is_none());
        assert_eq!(controller.session().phase(), SessionPhase::Uninitialized);
        assert!(store.get(SESSION_ID_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_is_ready_again_after_end() {
        let gateway = MockGateway::new().with_answers(vec![Ok(answer("Welcome back."))]);
        let (mut controller, gateway, _rx) = create_controller(
            gateway,
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );
        controller.bootstrap().await;
        controller.end_session(false).await;
        assert_eq!(controller.session().phase(), SessionPhase::Uninitialized);

        controller.request_workspace().await;
        assert_eq!(controller.session().phase(), SessionPhase::Ready);
        assert_eq!(controller.session().workspace_id(), Some("sess-123"));

        controller.send("hi").await;

        assert_eq!(controller.session().phase(), SessionPhase::Ready);
        assert_eq!(controller.transcript().last().unwrap().content, "Welcome back.");
        assert!(gateway.calls().iter().any(|c| c.starts_with("query_workspace")));
    }

    #[tokio::test]
    async fn test_global_send_after_end_is_served_ready() {
        let gateway = MockGateway::new().with_answers(vec![Ok(answer("Global answer."))]);
        let (mut controller, _gateway, _rx) =
            create_controller(gateway, Arc::new(InMemoryStore::new()), global_config());
        controller.bootstrap().await;
        controller.end_session(false).await;

        controller.send("hi").await;

        assert_eq!(controller.session().phase(), SessionPhase::Ready);
        assert_eq!(controller.transcript().last().unwrap().content, "Global answer.");
    }

    #[tokio::test]
    async fn test_end_session_without_session_is_refused() {
        let (mut controller, gateway, mut rx) = create_controller(
            MockGateway::new(),
            Arc::new(InMemoryStore::new()),
            ChatConfig::default(),
        );

        controller.end_session(false).await;

        assert!(gateway.calls().is_empty());
        assert_eq!(notices(&drain(&mut rx)).len(), 1);
    }

    // === End to end ===

    #[tokio::test]
    async fn test_fresh_profile_end_to_end() {
        let gateway = MockGateway {
            status: Ok(ProviderStatus {
                active_provider: None,
                ready: false,
            }),
            select_ready: Ok(false),
            ..MockGateway::new()
        };
        let store = Arc::new(InMemoryStore::new());
        let (mut controller, gateway, mut rx) =
            create_controller(gateway, store, global_config());

        controller.bootstrap().await;
        assert_eq!(controller.session().workspace_id(), Some("sess-123"));
        assert_eq!(controller.session().provider(), ProviderKind::Local);
        assert_eq!(controller.session().readiness(), Readiness::NotReady);

        controller
            .upload_documents(vec![PendingUpload::new("/tmp/doc.pdf")])
            .await;
        controller.set_source_mode(SourceMode::Workspace);
        controller.send("What is X?").await;

        assert!(gateway.calls().contains(&"select:ollama".to_string()));
        assert!(gateway
            .calls()
            .contains(&"query_workspace:sess-123:6:What is X?".to_string()));

        let turns = appended(&drain(&mut rx));
        assert!(turns.iter().any(|t| t.content.contains("is not ready")));
        assert!(turns.iter().any(|t| t.content.contains("doc.pdf imported")));
        let last = turns.last().unwrap();
        assert_eq!(last.content, "answer to What is X?");
        assert_eq!(last.hits.len(), 1);
    }
}
