//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, CopySection, JupiterSection, LiquidationSection, LoggingSection,
    SolanaSection, TokensSection, WatchSection, load_config, parse_commitment, ws_url_from_rpc,
};
