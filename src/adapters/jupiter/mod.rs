//! Jupiter Adapter
//!
//! Swap execution through the Jupiter aggregator: quote fetching, swap
//! transaction building, and the live and paper `SwapExecutionPort`s.

mod client;
mod quote;
mod swap;
mod executor;
mod paper;

pub use client::{JupiterClient, JupiterConfig, DEFAULT_API_URL};
pub use quote::{QuoteRequest, QuoteResponse};
pub use swap::{SwapTransactionRequest, SwapTransactionResponse};
pub use executor::JupiterSwapExecutor;
pub use paper::PaperSwapExecutor;
