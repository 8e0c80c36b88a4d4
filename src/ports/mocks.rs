use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use solana_sdk::commitment_config::CommitmentLevel;
use tokio::sync::mpsc;

use crate::domain::{LogEvent, ParsedTokenAccount, SwapRequest, SwapResult, TransactionDetails};
use super::execution::{ExecutionError, SwapExecutionPort};
use super::ledger::{LedgerError, LedgerPort};
use super::subscription::{LogSubscriptionPort, SubscribeError};

/// Mock ledger that records calls and serves canned responses
#[derive(Debug, Default, Clone)]
pub struct MockLedger {
    transaction_calls: Arc<Mutex<Vec<String>>>,
    account_info_calls: Arc<Mutex<Vec<String>>>,
    known_transactions: Arc<Mutex<HashSet<String>>>,
    token_accounts: Arc<Mutex<Option<Vec<String>>>>,
    parsed_accounts: Arc<Mutex<HashMap<String, ParsedTokenAccount>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            token_accounts: Arc::new(Mutex::new(Some(Vec::new()))),
            ..Self::default()
        }
    }

    /// Builder method to make `get_transaction` return details for a signature
    pub fn with_transaction(self, signature: &str) -> Self {
        self.known_transactions.lock().unwrap().insert(signature.to_string());
        self
    }

    /// Builder method to add a token account and its parsed contents
    pub fn with_token_account(self, account: &str, parsed: ParsedTokenAccount) -> Self {
        if let Some(accounts) = self.token_accounts.lock().unwrap().as_mut() {
            accounts.push(account.to_string());
        }
        self.parsed_accounts.lock().unwrap().insert(account.to_string(), parsed);
        self
    }

    /// Builder method to make `get_token_accounts_by_owner` fail
    pub fn with_failing_account_listing(self) -> Self {
        *self.token_accounts.lock().unwrap() = None;
        self
    }

    /// Signatures passed to `get_transaction`, in call order
    pub fn transaction_calls(&self) -> Vec<String> {
        self.transaction_calls.lock().unwrap().clone()
    }

    /// Accounts passed to `get_parsed_token_account`, in call order
    pub fn account_info_calls(&self) -> Vec<String> {
        self.account_info_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerPort for MockLedger {
    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionDetails>, LedgerError> {
        self.transaction_calls.lock().unwrap().push(signature.to_string());
        let known = self.known_transactions.lock().unwrap().contains(signature);
        Ok(known.then(|| TransactionDetails {
            signature: signature.to_string(),
            slot: 1,
            block_time: None,
        }))
    }

    async fn get_token_accounts_by_owner(&self, owner: &str) -> Result<Vec<String>, LedgerError> {
        self.token_accounts
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LedgerError::RpcError(format!("listing failed for {}", owner)))
    }

    async fn get_parsed_token_account(
        &self,
        account: &str,
    ) -> Result<Option<ParsedTokenAccount>, LedgerError> {
        self.account_info_calls.lock().unwrap().push(account.to_string());
        Ok(self.parsed_accounts.lock().unwrap().get(account).cloned())
    }
}

/// Mock executor that records requests; fails for configured input mints
#[derive(Debug, Default, Clone)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<SwapRequest>>>,
    failing_inputs: Arc<Mutex<HashSet<String>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to make swaps from `input_mint` fail
    pub fn failing_for(self, input_mint: &str) -> Self {
        self.failing_inputs.lock().unwrap().insert(input_mint.to_string());
        self
    }

    /// Get all recorded requests
    pub fn get_calls(&self) -> Vec<SwapRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SwapExecutionPort for MockExecutor {
    async fn execute(&self, request: &SwapRequest) -> Result<SwapResult, ExecutionError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };

        if self.failing_inputs.lock().unwrap().contains(request.input_mint()) {
            return Err(ExecutionError::no_route(request));
        }
        Ok(SwapResult::new(format!("mock-sig-{}", call_index)))
    }
}

/// Mock subscriber handing out a pre-built event channel once
#[derive(Debug, Default)]
pub struct MockSubscriber {
    receiver: Mutex<Option<mpsc::Receiver<LogEvent>>>,
    subscriptions: Mutex<Vec<(String, CommitmentLevel)>>,
}

impl MockSubscriber {
    /// Returns the subscriber and the sender used to push events into it
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<LogEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        let subscriber = Self {
            receiver: Mutex::new(Some(rx)),
            subscriptions: Mutex::new(Vec::new()),
        };
        (subscriber, tx)
    }

    /// A subscriber whose `subscribe` always fails
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn subscriptions(&self) -> Vec<(String, CommitmentLevel)> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogSubscriptionPort for MockSubscriber {
    async fn subscribe(
        &self,
        address: &str,
        commitment: CommitmentLevel,
    ) -> Result<mpsc::Receiver<LogEvent>, SubscribeError> {
        self.subscriptions
            .lock()
            .unwrap()
            .push((address.to_string(), commitment));
        self.receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| SubscribeError::ConnectionFailed("mock endpoint unavailable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_ledger_transactions() {
        let ledger = MockLedger::new().with_transaction("known");

        assert!(ledger.get_transaction("known").await.unwrap().is_some());
        assert!(ledger.get_transaction("unknown").await.unwrap().is_none());
        assert_eq!(ledger.transaction_calls(), vec!["known", "unknown"]);
    }

    #[tokio::test]
    async fn test_mock_ledger_failing_listing() {
        let ledger = MockLedger::new().with_failing_account_listing();
        assert!(ledger.get_token_accounts_by_owner("owner").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_executor() {
        let executor = MockExecutor::new().failing_for("Bad");
        let good = SwapRequest::new("Good", "Out", dec!(1), 6, 50).unwrap();
        let bad = SwapRequest::new("Bad", "Out", dec!(1), 6, 50).unwrap();

        assert_eq!(executor.execute(&good).await.unwrap().signature, "mock-sig-1");
        assert!(executor.execute(&bad).await.is_err());
        assert_eq!(executor.get_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_subscriber_single_use() {
        let (subscriber, _tx) = MockSubscriber::new(4);
        assert!(subscriber.subscribe("addr", CommitmentLevel::Confirmed).await.is_ok());
        assert!(subscriber.subscribe("addr", CommitmentLevel::Confirmed).await.is_err());
        assert_eq!(subscriber.subscriptions().len(), 2);
    }
}
