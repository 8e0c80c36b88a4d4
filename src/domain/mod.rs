//! Domain Layer - Core copy-trading logic
//!
//! Pure types and logic with no network access:
//! - `log_event`: log batches delivered by the ledger subscription
//! - `swap_detector`: classifies log batches as DEX swaps
//! - `throttle`: the shared RPC rate-limit gate
//! - `swap`: validated swap requests and results
//! - `holding`: strict parsing of operator token balances
//! - `known_programs`: default program ids and mints

pub mod log_event;
pub mod swap_detector;
pub mod throttle;
pub mod swap;
pub mod holding;
pub mod known_programs;

pub use log_event::{LogEvent, TransactionDetails};
pub use swap_detector::{is_swap, matching_program, SwapProgramSet};
pub use throttle::Throttler;
pub use swap::{to_base_units, SwapRequest, SwapRequestError, SwapResult};
pub use holding::{ParsedTokenAccount, SkipReason, TokenHolding};
pub use known_programs::{DEFAULT_SWAP_PROGRAMS, SOL_DECIMALS, WSOL_MINT};
