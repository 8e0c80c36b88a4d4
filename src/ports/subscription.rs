//! Log subscription port
//!
//! A live `logsSubscribe` stream for one account, surfaced as a bounded
//! channel of `LogEvent`s. The receiver yields events until the process shuts
//! down; it is not restartable.

use async_trait::async_trait;
use solana_sdk::commitment_config::CommitmentLevel;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::LogEvent;

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),
    #[error("logsSubscribe rejected: {0}")]
    SubscriptionRejected(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

#[async_trait]
pub trait LogSubscriptionPort: Send + Sync {
    async fn subscribe(
        &self,
        address: &str,
        commitment: CommitmentLevel,
    ) -> Result<mpsc::Receiver<LogEvent>, SubscribeError>;
}
