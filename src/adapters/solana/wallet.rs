use solana_sdk::{
    message::VersionedMessage,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to load keypair from file: {0}")]
    LoadError(String),
    #[error("Failed to sign transaction: {0}")]
    SigningError(String),
    #[error("Invalid keypair bytes: {0}")]
    InvalidKeypair(String),
}

/// Signing handle for the operator account.
///
/// Cheap to clone; every clone shares the same keypair.
#[derive(Clone)]
pub struct OperatorWallet {
    keypair: Arc<Keypair>,
}

impl OperatorWallet {
    /// Load keypair from a file path (JSON array format, as written by `solana-keygen`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::LoadError(format!("Failed to read file: {}", e)))?;

        let bytes: Vec<u8> = serde_json::from_str(&contents)
            .map_err(|e| WalletError::LoadError(format!("Invalid JSON format: {}", e)))?;

        Self::from_bytes(&bytes)
    }

    /// Load keypair from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let keypair = Keypair::try_from(bytes)
            .map_err(|e| WalletError::InvalidKeypair(e.to_string()))?;

        Ok(Self {
            keypair: Arc::new(keypair),
        })
    }

    /// Create a new random keypair (paper mode and tests)
    pub fn new_random() -> Self {
        Self {
            keypair: Arc::new(Keypair::new()),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Base58 public key
    pub fn public_key(&self) -> String {
        self.pubkey().to_string()
    }

    /// Re-sign a transaction built by the routing service with the operator key
    pub fn sign_versioned(&self, message: VersionedMessage) -> Result<VersionedTransaction, WalletError> {
        VersionedTransaction::try_new(message, &[self.keypair.as_ref()])
            .map_err(|e| WalletError::SigningError(e.to_string()))
    }
}

impl std::fmt::Debug for OperatorWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorWallet")
            .field("pubkey", &self.public_key())
            .finish()
    }
}
