//! Jupiter Swap Executor
//!
//! Live `SwapExecutionPort`: quote, build, sign with the operator key, submit
//! and wait for confirmation. One attempt per request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::adapters::solana::{OperatorWallet, SolanaClient};
use crate::domain::{SwapRequest, SwapResult, Throttler};
use crate::ports::execution::{ExecutionError, SwapExecutionPort};
use super::client::JupiterClient;
use super::quote::{QuoteRequest, QuoteResponse};
use super::swap::SwapTransactionRequest;

pub struct JupiterSwapExecutor {
    jupiter: JupiterClient,
    solana: SolanaClient,
    wallet: OperatorWallet,
    throttler: Arc<Throttler>,
}

impl JupiterSwapExecutor {
    pub fn new(
        jupiter: JupiterClient,
        solana: SolanaClient,
        wallet: OperatorWallet,
        throttler: Arc<Throttler>,
    ) -> Self {
        Self {
            jupiter,
            solana,
            wallet,
            throttler,
        }
    }
}

/// Quote a request, rejecting amounts that vanish in base units and empty routes
pub(crate) async fn fetch_quote(
    jupiter: &JupiterClient,
    request: &SwapRequest,
) -> Result<QuoteResponse, ExecutionError> {
    let amount = request
        .base_units()
        .map_err(|e| ExecutionError::InvalidParameters(e.to_string()))?;
    if amount == 0 {
        return Err(ExecutionError::InvalidParameters(format!(
            "{} rounds to zero base units with {} decimals",
            request.amount(),
            request.input_decimals()
        )));
    }

    let quote_request = QuoteRequest::new(
        request.input_mint().to_string(),
        request.output_mint().to_string(),
        amount,
        request.slippage_bps(),
    );

    let quote = jupiter.get_quote(&quote_request).await?;
    if quote.route_plan.is_empty() {
        return Err(ExecutionError::no_route(request));
    }

    debug!(
        "Quote {} -> {}: in={} out={} via {:?}",
        request.input_mint(),
        request.output_mint(),
        quote.in_amount,
        quote.out_amount,
        quote.route_labels()
    );
    Ok(quote)
}

fn classify_send_error(message: String) -> ExecutionError {
    if message.contains("SlippageToleranceExceeded") || message.contains("0x1771") {
        ExecutionError::SlippageExceeded
    } else {
        ExecutionError::ExecutionError(message)
    }
}

#[async_trait]
impl SwapExecutionPort for JupiterSwapExecutor {
    async fn execute(&self, request: &SwapRequest) -> Result<SwapResult, ExecutionError> {
        let quote = fetch_quote(&self.jupiter, request).await?;

        let quote_value = serde_json::to_value(&quote)
            .map_err(|e| ExecutionError::InvalidParameters(format!("Failed to encode quote: {}", e)))?;
        let swap = self
            .jupiter
            .get_swap_transaction(&SwapTransactionRequest::new(self.wallet.public_key(), quote_value))
            .await?;

        let unsigned = swap.transaction()?;
        let signed = self
            .wallet
            .sign_versioned(unsigned.message)
            .map_err(|e| ExecutionError::SigningError(e.to_string()))?;

        let signature = self
            .solana
            .send_and_confirm_transaction(signed, &self.throttler)
            .await
            .map_err(|e| classify_send_error(e.to_string()))?;

        info!(
            "Swap confirmed: {} {} -> {} ({})",
            request.amount(),
            request.input_mint(),
            request.output_mint(),
            signature
        );
        Ok(SwapResult::new(signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::jupiter::client::JupiterConfig;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_send_error_classification() {
        assert!(matches!(
            classify_send_error("custom program error: 0x1771".into()),
            ExecutionError::SlippageExceeded
        ));
        assert!(matches!(
            classify_send_error("blockhash not found".into()),
            ExecutionError::ExecutionError(_)
        ));
    }

    #[tokio::test]
    async fn test_dust_amount_rejected_before_quoting() {
        let jupiter = JupiterClient::with_config(JupiterConfig {
            api_base_url: "http://127.0.0.1:1".into(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        let request = SwapRequest::new("MintA", "MintB", dec!(0.0000001), 6, 50).unwrap();

        let result = fetch_quote(&jupiter, &request).await;
        assert!(matches!(result, Err(ExecutionError::InvalidParameters(_))));
    }
}
