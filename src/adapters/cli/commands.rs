//! CLI Command Definitions
//!
//! Argument parsing for the copy trader binary.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Jupiter Copy Trader - mirror a Solana wallet's DEX swaps
#[derive(Parser, Debug)]
#[command(
    name = "jupiter-copy-trader",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Mirrors a watched Solana wallet's DEX swaps through Jupiter",
    long_about = "Watches an account's transaction logs, and for every swap it makes \
                  buys a fixed amount of the quote token through Jupiter. The liquidate \
                  command sells every token held by the operator wallet back to SOL."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the configured account and copy its swaps until Ctrl+C
    Run(RunCmd),

    /// Sell every operator token holding for the base asset, then exit
    Liquidate(LiquidateCmd),

    /// Show the operator wallet and its balances
    Status(StatusCmd),
}

impl Command {
    pub fn config_path(&self) -> &Path {
        match self {
            Command::Run(cmd) => &cmd.config,
            Command::Liquidate(cmd) => &cmd.config,
            Command::Status(cmd) => &cmd.config,
        }
    }
}

/// Start the copy loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/mainnet.toml")]
    pub config: PathBuf,

    /// Quote copies without signing or sending anything
    #[arg(short, long)]
    pub paper: bool,
}

/// One-shot liquidation sweep
#[derive(Parser, Debug)]
pub struct LiquidateCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/mainnet.toml")]
    pub config: PathBuf,

    /// Quote the sweep without signing or sending anything
    #[arg(short, long)]
    pub paper: bool,
}

/// Operator wallet status
#[derive(Parser, Debug)]
pub struct StatusCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/mainnet.toml")]
    pub config: PathBuf,
}

/// Filter directive: `--debug`, `--verbose`, then `RUST_LOG`, then the configured level
pub fn log_directive(verbose: bool, debug: bool, configured: Option<&str>) -> String {
    if debug {
        "debug".to_string()
    } else if verbose {
        "info".to_string()
    } else if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        env
    } else {
        configured.unwrap_or("info").to_string()
    }
}

/// Initialize logging system
pub fn init_logging(verbose: bool, debug: bool, configured: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;

    let directive = log_directive(verbose, debug, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
