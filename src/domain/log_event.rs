//! Ledger Log Events
//!
//! A batch of program log lines emitted by one transaction that mentions the
//! watched account, as delivered by the `logsSubscribe` stream.

use serde::{Deserialize, Serialize};

/// One notification from the log subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Transaction signature (base58)
    pub signature: String,
    /// Program log lines in emission order
    pub lines: Vec<String>,
    /// On-chain error reported for the transaction, if it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl LogEvent {
    pub fn new(signature: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            signature: signature.into(),
            lines,
            err: None,
        }
    }

    /// Attach the transaction error reported by the node
    pub fn with_error(mut self, err: impl Into<String>) -> Self {
        self.err = Some(err.into());
        self
    }
}

/// Transaction detail fetched for a signature classified as a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_new() {
        let event = LogEvent::new("sig1", vec!["Program log: hello".to_string()]);
        assert_eq!(event.signature, "sig1");
        assert_eq!(event.lines.len(), 1);
        assert!(event.err.is_none());
    }

    #[test]
    fn test_log_event_with_error() {
        let event = LogEvent::new("sig1", vec![]).with_error("InstructionError");
        assert_eq!(event.err.as_deref(), Some("InstructionError"));
    }

    #[test]
    fn test_log_event_serialization_skips_missing_error() {
        let event = LogEvent::new("sig1", vec!["a".to_string()]);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["signature"], "sig1");
        assert!(json.get("err").is_none());
    }
}
