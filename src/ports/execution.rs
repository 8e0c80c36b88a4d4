use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SwapRequest, SwapResult};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("API request failed: {0}")]
    ApiError(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("No route found for {input_mint} -> {output_mint}")]
    NoRoute {
        input_mint: String,
        output_mint: String,
    },
    #[error("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[error("Transaction signing failed: {0}")]
    SigningError(String),
    #[error("Transaction execution failed: {0}")]
    ExecutionError(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl ExecutionError {
    pub fn no_route(request: &SwapRequest) -> Self {
        ExecutionError::NoRoute {
            input_mint: request.input_mint().to_string(),
            output_mint: request.output_mint().to_string(),
        }
    }
}

/// Executes one swap through the routing service.
///
/// A single attempt: failures are returned to the caller, never retried here.
/// Success means an irreversible balance transfer in the operator account.
#[async_trait]
pub trait SwapExecutionPort: Send + Sync {
    async fn execute(&self, request: &SwapRequest) -> Result<SwapResult, ExecutionError>;
}
