//! Account use case.
//!
//! Thin orchestration over the [`AuthGateway`]: credentials are validated
//! locally for emptiness, everything else is the backend's business.

use crate::ports::admin_gateway::AuthGateway;
use crate::ports::rag_gateway::GatewayError;
use ragdesk_domain::UserProfile;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccountError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct Account<A: AuthGateway + 'static> {
    gateway: Arc<A>,
}

impl<A: AuthGateway + 'static> Account<A> {
    pub fn new(gateway: Arc<A>) -> Self {
        Self { gateway }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        let email = require_credentials(email, password)?;
        let user = self.gateway.login(email, password).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        let email = require_credentials(email, password)?;
        let user = self.gateway.signup(email, password).await?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), AccountError> {
        self.gateway.logout().await?;
        debug!("Signed out");
        Ok(())
    }

    /// The signed-in user; `None` when anonymous.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, AccountError> {
        Ok(self.gateway.me().await?)
    }
}

fn require_credentials<'a>(email: &'a str, password: &str) -> Result<&'a str, AccountError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AccountError::MissingCredentials);
    }
    Ok(email)
}
