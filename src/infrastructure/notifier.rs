use crate::domain::ports::Notifier;
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Writes notifications to the tracing log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        tracing::info!(destination, message, "notification sent");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub destination: String,
    pub message: String,
}

/// Keeps every accepted notification in memory.
///
/// Built with [`OutboxNotifier::failing`] it rejects every message instead,
/// which is how delivery outages are reproduced.
#[derive(Debug, Default, Clone)]
pub struct OutboxNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    failure: Option<String>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(OrchestratorError::Notification(reason.clone()));
        }
        self.sent.lock().await.push(Notification {
            destination: destination.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
