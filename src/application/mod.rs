//! Application Layer
//!
//! - `copy_trader`: subscription dispatch loop and per-event copy pipeline
//! - `liquidator`: sweep of operator holdings into the base asset

pub mod copy_trader;
pub mod liquidator;

pub use copy_trader::{CopySettings, CopyTrader, EventOutcome, HandlerError, StartupError};
pub use liquidator::{
    EntryOutcome, LiquidationEntry, LiquidationError, LiquidationItemError, LiquidationReport,
    PortfolioLiquidator,
};
