//! Ledger RPC port
//!
//! Read access to the Solana node used by the copy path (transaction lookup)
//! and by the liquidation sweep (token account enumeration). Callers acquire
//! the shared `Throttler` before every call.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ParsedTokenAccount, TransactionDetails};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// Fetch a transaction by signature; `None` when the node does not have it
    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionDetails>, LedgerError>;

    /// Addresses of all SPL token accounts owned by `owner`
    async fn get_token_accounts_by_owner(&self, owner: &str) -> Result<Vec<String>, LedgerError>;

    /// jsonParsed view of one token account; `None` when the account does not exist
    async fn get_parsed_token_account(
        &self,
        account: &str,
    ) -> Result<Option<ParsedTokenAccount>, LedgerError>;
}
