//! Admin console use case.
//!
//! Dashboard actions over the global index. Destructive actions refetch the
//! statistics afterwards so the caller always renders the post-action state;
//! confirming them is the front end's job.

use crate::ports::admin_gateway::AdminGateway;
use crate::ports::rag_gateway::GatewayError;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Outcome of a destructive admin action
#[derive(Debug, Clone, PartialEq)]
pub struct AdminActionOutcome {
    /// Backend acknowledgement of the action
    pub ack: Value,
    /// Statistics fetched after the action completed
    pub stats: Value,
}

pub struct AdminConsole<A: AdminGateway + 'static> {
    gateway: Arc<A>,
}

impl<A: AdminGateway + 'static> AdminConsole<A> {
    pub fn new(gateway: Arc<A>) -> Self {
        Self { gateway }
    }

    pub async fn stats(&self) -> Result<Value, GatewayError> {
        self.gateway.stats().await
    }

    /// Rebuild the global index, then refetch statistics.
    pub async fn reindex(&self) -> Result<AdminActionOutcome, GatewayError> {
        info!("Rebuilding global index");
        let ack = self.gateway.reindex().await?;
        let stats = self.gateway.stats().await?;
        Ok(AdminActionOutcome { ack, stats })
    }

    /// Delete the global index artifacts, then refetch statistics.
    pub async fn flush_index(&self) -> Result<AdminActionOutcome, GatewayError> {
        info!("Flushing global index");
        let ack = self.gateway.flush_index().await?;
        let stats = self.gateway.stats().await?;
        Ok(AdminActionOutcome { ack, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragdesk_domain::{SessionSummary, StoredMessage};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockAdmin {
        calls: Mutex<Vec<&'static str>>,
        fail_flush: bool,
    }

    #[async_trait]
    impl AdminGateway for MockAdmin {
        async fn list_sessions(
            &self,
            _limit: usize,
            _offset: usize,
        ) -> Result<Vec<SessionSummary>, GatewayError> {
            Ok(Vec::new())
        }

        async fn session_messages(
            &self,
            _session_id: &str,
            _limit: usize,
            _offset: usize,
        ) -> Result<Vec<StoredMessage>, GatewayError> {
            Ok(Vec::new())
        }

        async fn stats(&self) -> Result<Value, GatewayError> {
            self.calls.lock().unwrap().push("stats");
            Ok(json!({ "total_chunks": 42 }))
        }

        async fn reindex(&self) -> Result<Value, GatewayError> {
            self.calls.lock().unwrap().push("reindex");
            Ok(json!({ "ok": true }))
        }

        async fn flush_index(&self) -> Result<Value, GatewayError> {
            self.calls.lock().unwrap().push("flush");
            if self.fail_flush {
                return Err(GatewayError::Unauthorized);
            }
            Ok(json!({ "ok": true }))
        }
    }

    #[tokio::test]
    async fn test_reindex_refetches_stats() {
        let gateway = Arc::new(MockAdmin::default());
        let console = AdminConsole::new(gateway.clone());

        let outcome = console.reindex().await.unwrap();

        assert_eq!(outcome.ack, json!({ "ok": true }));
        assert_eq!(outcome.stats["total_chunks"], 42);
        assert_eq!(*gateway.calls.lock().unwrap(), vec!["reindex", "stats"]);
    }

    #[tokio::test]
    async fn test_failed_flush_skips_refetch() {
        let gateway = Arc::new(MockAdmin {
            fail_flush: true,
            ..MockAdmin::default()
        });
        let console = AdminConsole::new(gateway.clone());

        let err = console.flush_index().await.unwrap_err();

        assert_eq!(err, GatewayError::Unauthorized);
        assert_eq!(*gateway.calls.lock().unwrap(), vec!["flush"]);
    }
}
