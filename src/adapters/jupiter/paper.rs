//! Paper-mode executor: quotes real routes, never signs or submits.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::domain::{SwapRequest, SwapResult};
use crate::ports::execution::{ExecutionError, SwapExecutionPort};
use super::client::JupiterClient;
use super::executor::fetch_quote;

pub struct PaperSwapExecutor {
    jupiter: JupiterClient,
    counter: AtomicU64,
}

impl PaperSwapExecutor {
    pub fn new(jupiter: JupiterClient) -> Self {
        Self {
            jupiter,
            counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl SwapExecutionPort for PaperSwapExecutor {
    async fn execute(&self, request: &SwapRequest) -> Result<SwapResult, ExecutionError> {
        let quote = fetch_quote(&self.jupiter, request).await?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            "[PAPER] Would swap {} {} -> {} (expected out {} base units)",
            request.amount(),
            request.input_mint(),
            request.output_mint(),
            quote.out_amount
        );
        Ok(SwapResult::new(format!("paper-{}", n)))
    }
}
