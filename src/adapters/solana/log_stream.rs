//! Ledger Log Subscriber
//!
//! Live `logsSubscribe` stream for one account over the RPC websocket.
//! A background task forwards every notification into a bounded channel and
//! reconnects with exponential backoff if the socket drops after start-up.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::rpc_config::{RpcTransactionLogsConfig, RpcTransactionLogsFilter};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::LogEvent;
use crate::ports::subscription::{LogSubscriptionPort, SubscribeError};

/// Reconnection delay base (exponential backoff)
const RECONNECT_BASE_DELAY_MS: u64 = 1000;
/// Maximum reconnection delay
const MAX_RECONNECT_DELAY_MS: u64 = 30000;

/// Configuration for LogStreamSubscriber
#[derive(Debug, Clone)]
pub struct LogStreamConfig {
    /// WebSocket URL of the RPC node
    pub ws_url: String,
    /// Event channel buffer size
    pub channel_buffer_size: usize,
    /// Reconnect after the socket drops
    pub auto_reconnect: bool,
}

impl LogStreamConfig {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            channel_buffer_size: 1000,
            auto_reconnect: true,
        }
    }
}

/// `LogSubscriptionPort` backed by the Solana pubsub websocket
#[derive(Debug, Clone)]
pub struct LogStreamSubscriber {
    config: LogStreamConfig,
}

impl LogStreamSubscriber {
    pub fn new(config: LogStreamConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LogSubscriptionPort for LogStreamSubscriber {
    async fn subscribe(
        &self,
        address: &str,
        commitment: CommitmentLevel,
    ) -> Result<mpsc::Receiver<LogEvent>, SubscribeError> {
        Pubkey::from_str(address)
            .map_err(|e| SubscribeError::InvalidAddress(format!("{}: {}", address, e)))?;

        info!("Connecting to {}", self.config.ws_url);
        let client = PubsubClient::new(&self.config.ws_url)
            .await
            .map_err(|e| SubscribeError::ConnectionFailed(e.to_string()))?;

        let (event_tx, event_rx) = mpsc::channel(self.config.channel_buffer_size);
        let (ready_tx, ready_rx) = oneshot::channel();

        let task = StreamTask {
            ws_url: self.config.ws_url.clone(),
            address: address.to_string(),
            commitment,
            auto_reconnect: self.config.auto_reconnect,
            event_tx,
        };
        tokio::spawn(task.run(client, ready_tx));

        match ready_rx.await {
            Ok(Ok(())) => Ok(event_rx),
            Ok(Err(e)) => Err(SubscribeError::SubscriptionRejected(e)),
            Err(_) => Err(SubscribeError::SubscriptionRejected(
                "subscription task exited before confirming".into(),
            )),
        }
    }
}

/// How a subscribed stream came to an end
enum StreamEnd {
    /// The socket closed; worth reconnecting
    Disconnected,
    /// Nobody is listening anymore
    ReceiverDropped,
}

struct StreamTask {
    ws_url: String,
    address: String,
    commitment: CommitmentLevel,
    auto_reconnect: bool,
    event_tx: mpsc::Sender<LogEvent>,
}

impl StreamTask {
    async fn run(self, client: PubsubClient, ready: oneshot::Sender<Result<(), String>>) {
        let mut ready = Some(ready);
        let mut client = Some(client);
        let mut reconnect_attempts = 0u32;

        loop {
            let pubsub = match client.take() {
                Some(c) => Some(c),
                None => match PubsubClient::new(&self.ws_url).await {
                    Ok(c) => Some(c),
                    Err(e) => {
                        warn!("WebSocket reconnect failed: {}", e);
                        None
                    }
                },
            };

            if let Some(pubsub) = pubsub {
                match self.stream_logs(&pubsub, &mut ready).await {
                    Ok(StreamEnd::ReceiverDropped) => {
                        debug!("Log receiver dropped, closing subscription");
                        return;
                    }
                    Ok(StreamEnd::Disconnected) => {
                        warn!("Log subscription for {} disconnected", self.address);
                        reconnect_attempts = 0;
                    }
                    Err(e) => {
                        // The very first subscription reports back to `subscribe`
                        if let Some(tx) = ready.take() {
                            let _ = tx.send(Err(e));
                            return;
                        }
                        warn!("logsSubscribe failed: {}", e);
                    }
                }
                pubsub.shutdown().await.ok();
            }

            if !self.auto_reconnect || self.event_tx.is_closed() {
                return;
            }

            reconnect_attempts += 1;
            let delay_ms = std::cmp::min(
                RECONNECT_BASE_DELAY_MS * 2u64.pow(reconnect_attempts.min(10) - 1),
                MAX_RECONNECT_DELAY_MS,
            );
            warn!("Reconnecting in {}ms (attempt {})", delay_ms, reconnect_attempts);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    async fn stream_logs(
        &self,
        pubsub: &PubsubClient,
        ready: &mut Option<oneshot::Sender<Result<(), String>>>,
    ) -> Result<StreamEnd, String> {
        let filter = RpcTransactionLogsFilter::Mentions(vec![self.address.clone()]);
        let config = RpcTransactionLogsConfig {
            commitment: Some(CommitmentConfig {
                commitment: self.commitment,
            }),
        };

        let (mut stream, unsubscribe) = pubsub
            .logs_subscribe(filter, config)
            .await
            .map_err(|e| e.to_string())?;

        if let Some(tx) = ready.take() {
            let _ = tx.send(Ok(()));
        }
        info!("Subscribed to logs for {} ({:?})", self.address, self.commitment);

        let mut end = StreamEnd::Disconnected;
        while let Some(response) = stream.next().await {
            let logs = response.value;
            let mut event = LogEvent::new(logs.signature, logs.logs);
            if let Some(err) = logs.err {
                event = event.with_error(format!("{:?}", err));
            }

            if self.event_tx.send(event).await.is_err() {
                end = StreamEnd::ReceiverDropped;
                break;
            }
        }

        drop(stream);
        unsubscribe().await;
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LogStreamConfig::new("wss://api.mainnet-beta.solana.com");
        assert_eq!(config.channel_buffer_size, 1000);
        assert!(config.auto_reconnect);
    }

    #[tokio::test]
    async fn test_invalid_address_rejected_before_connecting() {
        let subscriber = LogStreamSubscriber::new(LogStreamConfig::new("ws://127.0.0.1:1"));
        let result = subscriber.subscribe("not a pubkey", CommitmentLevel::Confirmed).await;
        assert!(matches!(result, Err(SubscribeError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_failure() {
        let subscriber = LogStreamSubscriber::new(LogStreamConfig::new("ws://127.0.0.1:1"));
        let result = subscriber
            .subscribe("4hfqqgqBrXeW67v7P79BRDYS3LmRuDNBBKqPycHBeqVs", CommitmentLevel::Confirmed)
            .await;
        assert!(matches!(result, Err(SubscribeError::ConnectionFailed(_))));
    }
}
