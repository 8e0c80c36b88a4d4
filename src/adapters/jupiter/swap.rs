//! Jupiter Swap Types
//!
//! Request and response structures for the Jupiter `/swap` endpoint, which
//! turns a quote into an unsigned versioned transaction.

use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_sdk::transaction::VersionedTransaction;

use crate::ports::execution::ExecutionError;

/// Request body for building a swap transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionRequest {
    /// Operator public key; pays fees and signs
    pub user_public_key: String,
    /// The full quote response from `/quote`
    pub quote_response: serde_json::Value,
    /// Wrap SOL into WSOL and back as needed
    pub wrap_and_unwrap_sol: bool,
    pub dynamic_compute_unit_limit: bool,
}

impl SwapTransactionRequest {
    pub fn new(user_public_key: String, quote_response: serde_json::Value) -> Self {
        Self {
            user_public_key,
            quote_response,
            wrap_and_unwrap_sol: true,
            dynamic_compute_unit_limit: true,
        }
    }
}

/// Response from Jupiter swap API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionResponse {
    /// Base64 encoded serialized transaction
    pub swap_transaction: String,
    /// Last valid block height for this transaction
    pub last_valid_block_height: u64,
    #[serde(default)]
    pub prioritization_fee_lamports: u64,
}

impl SwapTransactionResponse {
    /// Decode the wire transaction
    pub fn transaction(&self) -> Result<VersionedTransaction, ExecutionError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.swap_transaction)
            .map_err(|e| ExecutionError::InvalidParameters(format!("Invalid base64 transaction: {}", e)))?;

        bincode::deserialize(&bytes)
            .map_err(|e| ExecutionError::InvalidParameters(format!("Invalid transaction bytes: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        hash::Hash,
        message::{v0, VersionedMessage},
        pubkey::Pubkey,
        signature::{Keypair, Signer},
        system_instruction,
    };

    #[test]
    fn test_swap_request_serialization() {
        let quote = serde_json::json!({"inAmount": "1"});
        let req = SwapTransactionRequest::new("wallet123".to_string(), quote);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userPublicKey"], "wallet123");
        assert_eq!(json["wrapAndUnwrapSol"], true);
        assert_eq!(json["dynamicComputeUnitLimit"], true);
        assert_eq!(json["quoteResponse"]["inAmount"], "1");
    }

    #[test]
    fn test_transaction_decodes() {
        let payer = Keypair::new();
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1);
        let message = v0::Message::try_compile(&payer.pubkey(), &[ix], &[], Hash::default()).unwrap();
        let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[&payer]).unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(bincode::serialize(&tx).unwrap());

        let response = SwapTransactionResponse {
            swap_transaction: encoded,
            last_valid_block_height: 1000,
            prioritization_fee_lamports: 0,
        };

        let decoded = response.transaction().unwrap();
        assert_eq!(decoded.message.static_account_keys()[0], payer.pubkey());
    }

    #[test]
    fn test_garbage_transaction_rejected() {
        let response = SwapTransactionResponse {
            swap_transaction: "%%%".to_string(),
            last_valid_block_height: 0,
            prioritization_fee_lamports: 0,
        };
        assert!(matches!(response.transaction(), Err(ExecutionError::InvalidParameters(_))));
    }

    #[test]
    fn test_swap_response_parsing() {
        let json = r#"{
            "swapTransaction": "AQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "lastValidBlockHeight": 123456789,
            "prioritizationFeeLamports": 5000
        }"#;

        let response: SwapTransactionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.last_valid_block_height, 123456789);
        assert_eq!(response.prioritization_fee_lamports, 5000);
    }
}
