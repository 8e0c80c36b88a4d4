use async_trait::async_trait;
use solana_client::client_error::ClientErrorKind;
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use solana_transaction_status::UiTransactionEncoding;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::{ParsedTokenAccount, Throttler, TransactionDetails};
use crate::ports::ledger::{LedgerError, LedgerPort};
use super::parsed_account::TokenAccountReader;

/// Delay between confirmation polls
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of one `getSignatureStatuses` poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SignatureState {
    Pending,
    Confirmed,
    Failed(String),
}

/// The two calls a confirmation loop polls
#[async_trait]
pub(crate) trait ConfirmationSource: Send + Sync {
    async fn signature_state(&self, signature: &Signature) -> Result<SignatureState, LedgerError>;
    async fn blockhash_valid(&self, blockhash: &Hash) -> Result<bool, LedgerError>;
}

/// Poll until `signature` lands or its blockhash expires.
///
/// Every poll takes a throttler slot first.
pub(crate) async fn confirm_signature(
    source: &dyn ConfirmationSource,
    throttler: &Throttler,
    signature: &Signature,
    blockhash: &Hash,
    poll_interval: Duration,
) -> Result<(), LedgerError> {
    loop {
        throttler.acquire().await;
        match source.signature_state(signature).await? {
            SignatureState::Confirmed => return Ok(()),
            SignatureState::Failed(err) => {
                return Err(LedgerError::RpcError(format!("Transaction {} failed: {}", signature, err)))
            }
            SignatureState::Pending => {}
        }

        throttler.acquire().await;
        if !source.blockhash_valid(blockhash).await? {
            return Err(LedgerError::RpcError(format!(
                "Transaction {} expired before confirmation (blockhash {})",
                signature, blockhash
            )));
        }

        debug!("Waiting for confirmation of {}", signature);
        tokio::time::sleep(poll_interval).await;
    }
}

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
    accounts: TokenAccountReader,
}

impl SolanaClient {
    /// Create a new Solana RPC client
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let accounts = TokenAccountReader::new(rpc_url.clone(), commitment);
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self {
            client,
            commitment,
            accounts,
        }
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Get SOL balance for a public key
    pub async fn get_balance(&self, pubkey: &str) -> Result<u64, LedgerError> {
        let pubkey = parse_pubkey(pubkey)?;

        // Spawn blocking to make sync RPC call async-compatible
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_balance(&pubkey)
                .map_err(|e| LedgerError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))?
    }

    /// Send a signed transaction and wait for confirmation.
    ///
    /// The send and every status poll each take a slot from `throttler`.
    pub async fn send_and_confirm_transaction(
        &self,
        transaction: VersionedTransaction,
        throttler: &Throttler,
    ) -> Result<String, LedgerError> {
        let blockhash = *transaction.message.recent_blockhash();
        let client = Arc::clone(&self.client);

        throttler.acquire().await;
        let signature = tokio::task::spawn_blocking(move || {
            client
                .send_transaction(&transaction)
                .map_err(|e| LedgerError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))??;

        confirm_signature(self, throttler, &signature, &blockhash, CONFIRM_POLL_INTERVAL).await?;
        Ok(signature.to_string())
    }
}

#[async_trait]
impl ConfirmationSource for SolanaClient {
    async fn signature_state(&self, signature: &Signature) -> Result<SignatureState, LedgerError> {
        let client = Arc::clone(&self.client);
        let signature = *signature;
        let status = tokio::task::spawn_blocking(move || client.get_signature_status(&signature))
            .await
            .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))?
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        Ok(match status {
            None => SignatureState::Pending,
            Some(Ok(())) => SignatureState::Confirmed,
            Some(Err(e)) => SignatureState::Failed(e.to_string()),
        })
    }

    async fn blockhash_valid(&self, blockhash: &Hash) -> Result<bool, LedgerError> {
        let client = Arc::clone(&self.client);
        let blockhash = *blockhash;
        tokio::task::spawn_blocking(move || {
            client
                .is_blockhash_valid(&blockhash, CommitmentConfig::processed())
                .map_err(|e| LedgerError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl LedgerPort for SolanaClient {
    async fn get_transaction(
        &self,
        signature_str: &str,
    ) -> Result<Option<TransactionDetails>, LedgerError> {
        let signature = Signature::from_str(signature_str)
            .map_err(|e| LedgerError::InvalidSignature(e.to_string()))?;

        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };

        let client = Arc::clone(&self.client);
        let fetched = tokio::task::spawn_blocking(move || {
            client.get_transaction_with_config(&signature, config)
        })
        .await
        .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))?;

        let tx = match fetched {
            Ok(tx) => tx,
            // The node answers `null` for unknown signatures, which fails deserialization
            Err(e) if matches!(e.kind(), ClientErrorKind::SerdeJson(_)) => return Ok(None),
            Err(e) => return Err(LedgerError::RpcError(e.to_string())),
        };

        Ok(Some(TransactionDetails {
            signature: signature_str.to_string(),
            slot: tx.slot,
            block_time: tx.block_time,
        }))
    }

    async fn get_token_accounts_by_owner(&self, owner: &str) -> Result<Vec<String>, LedgerError> {
        let owner = parse_pubkey(owner)?;

        let client = Arc::clone(&self.client);
        let accounts = tokio::task::spawn_blocking(move || {
            client
                .get_token_accounts_by_owner(&owner, TokenAccountsFilter::ProgramId(spl_token::id()))
                .map_err(|e| LedgerError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| LedgerError::RpcError(format!("Task join error: {}", e)))??;

        Ok(accounts.into_iter().map(|keyed| keyed.pubkey).collect())
    }

    async fn get_parsed_token_account(
        &self,
        account: &str,
    ) -> Result<Option<ParsedTokenAccount>, LedgerError> {
        parse_pubkey(account)?;
        self.accounts.get_token_account(account).await
    }
}

fn parse_pubkey(value: &str) -> Result<Pubkey, LedgerError> {
    Pubkey::from_str(value).map_err(|e| LedgerError::InvalidPublicKey(format!("{}: {}", value, e)))
}
