//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Solana: RPC client, parsed token accounts, log subscription, operator wallet
//! - Jupiter: quote/swap API client and swap executors
//! - CLI: Command-line interface

pub mod jupiter;
pub mod solana;
pub mod cli;

pub use jupiter::{JupiterClient, JupiterSwapExecutor, PaperSwapExecutor};
pub use solana::{LogStreamSubscriber, OperatorWallet, SolanaClient};
pub use cli::CliApp;
