//! HTTP gateway to the RAG backend
//!
//! One [`reqwest::Client`] with a cookie store serves every call, so the
//! session cookie set by `/auth/login` rides along on all later requests.

use super::error::{ApiError, Result};
use super::wire::{
    AskRequest, BuildRequest, BuildResponse, CleanupRequest, Credentials,
    EnsureWorkspaceRequest, EnsureWorkspaceResponse, Listing, SelectProviderRequest,
    UserEnvelope,
};
use crate::config::FileApiConfig;
use async_trait::async_trait;
use ragdesk_application::{AdminGateway, AuthGateway, GatewayError, RagGateway};
use ragdesk_domain::{
    IndexStats, PendingUpload, ProviderSelection, ProviderStatus, QueryAnswer, QueryOptions,
    Question, SessionSummary, StoredMessage, UploadReceipt, UserProfile,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, multipart};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings of the HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl From<&FileApiConfig> for HttpSettings {
    fn from(config: &FileApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
        }
    }
}

/// Backend gateway implementing the RAG, admin and auth ports over HTTP
pub struct HttpApiGateway {
    client: Client,
    base_url: Url,
}

impl HttpApiGateway {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let base_url = Url::parse(settings.base_url.trim()).map_err(|e| ApiError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(concat!("ragdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint; segments are percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "Backend request");
        Ok(self.client.request(method, url))
    }

    /// Send a request, mapping transport failures and non-success statuses
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ApiError::from_request)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Backend returned an error");
        Err(ApiError::from_status(status, &body))
    }

    /// Send a request and decode its JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let raw = response.text().await.map_err(ApiError::from_request)?;
        serde_json::from_str(&raw).map_err(|e| ApiError::Decode {
            error: e.to_string(),
            raw,
        })
    }

    async fn upload_form(&self, workspace_id: &str, upload: &PendingUpload) -> Result<multipart::Form> {
        let path = upload.path();
        let data = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        debug!(file = %path.display(), bytes = data.len(), "Uploading document");

        let part = multipart::Part::bytes(data).file_name(upload.display_name().to_string());
        Ok(multipart::Form::new()
            .text("ws_id", workspace_id.to_string())
            .part("file", part))
    }
}

#[async_trait]
impl RagGateway for HttpApiGateway {
    async fn ensure_workspace(&self, session_id: &str) -> std::result::Result<String, GatewayError> {
        let request = self
            .request(Method::POST, &["workspaces"])?
            .json(&EnsureWorkspaceRequest { session_id });
        let response: EnsureWorkspaceResponse = self.send_json(request).await?;
        Ok(response.ws_id)
    }

    async fn build_workspace(
        &self,
        workspace_id: &str,
        force: bool,
    ) -> std::result::Result<IndexStats, GatewayError> {
        let request = self
            .request(Method::POST, &["workspaces", workspace_id, "build"])?
            .json(&BuildRequest {
                ws_id: workspace_id,
                force,
            });
        let response: BuildResponse = self.send_json(request).await?;
        Ok(response.into_stats())
    }

    async fn upload_document(
        &self,
        workspace_id: &str,
        upload: &PendingUpload,
        auto_build: bool,
    ) -> std::result::Result<UploadReceipt, GatewayError> {
        let form = self.upload_form(workspace_id, upload).await?;
        let request = self
            .request(Method::POST, &["workspaces", workspace_id, "documents"])?
            .query(&[("auto_build", auto_build)])
            .multipart(form);
        let mut receipt: UploadReceipt = self.send_json(request).await?;
        if receipt.filename.is_empty() {
            receipt.filename = upload.display_name().to_string();
        }
        Ok(receipt)
    }

    async fn query_workspace(
        &self,
        workspace_id: &str,
        question: &Question,
        options: &QueryOptions,
    ) -> std::result::Result<QueryAnswer, GatewayError> {
        // The workspace id doubles as the session id for workspace queries
        let request = self
            .request(Method::POST, &["workspaces", workspace_id, "ask"])?
            .json(&AskRequest::new(question.content(), options, Some(workspace_id)));
        Ok(self.send_json(request).await?)
    }

    async fn query_global(
        &self,
        question: &Question,
        options: &QueryOptions,
        session_id: Option<&str>,
    ) -> std::result::Result<QueryAnswer, GatewayError> {
        let request = self
            .request(Method::POST, &["ask"])?
            .json(&AskRequest::new(question.content(), options, session_id));
        Ok(self.send_json(request).await?)
    }

    async fn select_provider(
        &self,
        provider: &str,
    ) -> std::result::Result<ProviderSelection, GatewayError> {
        let request = self
            .request(Method::POST, &["llm", "select"])?
            .json(&SelectProviderRequest { provider });
        let mut selection: ProviderSelection = self.send_json(request).await?;
        if selection.provider.is_empty() {
            selection.provider = provider.to_string();
        }
        Ok(selection)
    }

    async fn provider_status(&self) -> std::result::Result<ProviderStatus, GatewayError> {
        let request = self.request(Method::GET, &["llm", "status"])?;
        Ok(self.send_json(request).await?)
    }

    async fn cleanup_session(
        &self,
        session_id: &str,
        wipe_messages: bool,
    ) -> std::result::Result<(), GatewayError> {
        let request = self
            .request(Method::POST, &["sessions", "cleanup"])?
            .json(&CleanupRequest {
                session_id,
                wipe_messages,
            });
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl AdminGateway for HttpApiGateway {
    async fn list_sessions(
        &self,
        limit: usize,
        offset: usize,
    ) -> std::result::Result<Vec<SessionSummary>, GatewayError> {
        let request = self
            .request(Method::GET, &["history", "sessions"])?
            .query(&[("limit", limit), ("offset", offset)]);
        let listing: Listing<SessionSummary> = self.send_json(request).await?;
        Ok(listing.into_vec())
    }

    async fn session_messages(
        &self,
        session_id: &str,
        limit: usize,
        offset: usize,
    ) -> std::result::Result<Vec<StoredMessage>, GatewayError> {
        let request = self
            .request(Method::GET, &["history", "sessions", session_id, "messages"])?
            .query(&[("limit", limit), ("offset", offset)]);
        let listing: Listing<StoredMessage> = self.send_json(request).await?;
        Ok(listing.into_vec())
    }

    async fn stats(&self) -> std::result::Result<Value, GatewayError> {
        let request = self.request(Method::GET, &["admin", "stats"])?;
        Ok(self.send_json(request).await?)
    }

    async fn reindex(&self) -> std::result::Result<Value, GatewayError> {
        let request = self.request(Method::POST, &["admin", "reindex"])?;
        Ok(self.send_json(request).await?)
    }

    async fn flush_index(&self) -> std::result::Result<Value, GatewayError> {
        let request = self.request(Method::POST, &["admin", "flush-index"])?;
        Ok(self.send_json(request).await?)
    }
}

#[async_trait]
impl AuthGateway for HttpApiGateway {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<UserProfile, GatewayError> {
        let request = self
            .request(Method::POST, &["auth", "login"])?
            .json(&Credentials { email, password });
        let envelope: UserEnvelope = self.send_json(request).await?;
        Ok(envelope.into())
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<UserProfile, GatewayError> {
        let request = self
            .request(Method::POST, &["auth", "signup"])?
            .json(&Credentials { email, password });
        let envelope: UserEnvelope = self.send_json(request).await?;
        Ok(envelope.into())
    }

    async fn logout(&self) -> std::result::Result<(), GatewayError> {
        let request = self.request(Method::POST, &["auth", "logout"])?;
        self.send(request).await?;
        Ok(())
    }

    async fn me(&self) -> std::result::Result<Option<UserProfile>, GatewayError> {
        let request = self.request(Method::GET, &["auth", "me"])?;
        match self.send_json::<UserEnvelope>(request).await {
            Ok(envelope) => Ok(Some(envelope.into())),
            Err(ApiError::Unauthorized) => Ok(None),
            Err(ApiError::Status { status, .. }) if status == StatusCode::FORBIDDEN.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
