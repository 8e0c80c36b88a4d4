//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Ledger reads (transactions, token accounts)
//! - The ledger log subscription
//! - Swap execution through the routing service

pub mod ledger;
pub mod subscription;
pub mod execution;
pub mod mocks;

pub use ledger::{LedgerError, LedgerPort};
pub use subscription::{LogSubscriptionPort, SubscribeError};
pub use execution::{ExecutionError, SwapExecutionPort};
