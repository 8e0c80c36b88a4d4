//! CLI Adapter
//!
//! Command-line interface for the copy trader.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{init_logging, log_directive, CliApp, Command, LiquidateCmd, RunCmd, StatusCmd};
