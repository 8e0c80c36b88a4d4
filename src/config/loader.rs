//! Configuration Loader
//!
//! Loads and validates the copy trader's TOML configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::application::CopySettings;
use crate::domain::{SwapProgramSet, DEFAULT_SWAP_PROGRAMS};

/// Main configuration structure matching config/mainnet.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub watch: WatchSection,
    pub solana: SolanaSection,
    pub tokens: TokensSection,
    pub copy: CopySection,
    #[serde(default)]
    pub jupiter: JupiterSection,
    #[serde(default)]
    pub liquidation: LiquidationSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// The account being copied
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Base58 address of the watched account
    pub address: String,
    /// Programs whose appearance in a log batch marks it as a swap
    #[serde(default = "default_swap_program_ids")]
    pub swap_program_ids: Vec<String>,
    /// Commitment level: "processed", "confirmed", "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

fn default_swap_program_ids() -> Vec<String> {
    DEFAULT_SWAP_PROGRAMS.iter().map(|s| s.to_string()).collect()
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

impl WatchSection {
    pub fn program_set(&self) -> SwapProgramSet {
        SwapProgramSet::new(self.swap_program_ids.iter().cloned())
    }

    pub fn commitment_level(&self) -> Result<CommitmentLevel, ConfigError> {
        parse_commitment(&self.commitment)
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SolanaSection {
    /// HTTP RPC endpoint
    pub rpc_url: String,
    /// WebSocket endpoint; derived from rpc_url when absent
    #[serde(default)]
    pub ws_url: Option<String>,
    /// Wallet keypair path (NEVER commit this file!)
    pub keypair_path: String,
    /// Ceiling on outbound RPC calls
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_requests_per_second() -> u32 {
    10
}

impl SolanaSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }

    /// WebSocket URL: SOLANA_WS_URL, then `ws_url`, then the RPC URL with a ws scheme
    pub fn get_ws_url(&self) -> String {
        if let Ok(url) = std::env::var("SOLANA_WS_URL") {
            return url;
        }
        match self.ws_url {
            Some(ref url) if !url.is_empty() => url.clone(),
            _ => ws_url_from_rpc(&self.get_rpc_url()),
        }
    }

    /// Get keypair path with environment variable override, `~` expanded
    pub fn get_keypair_path(&self) -> PathBuf {
        let raw = std::env::var("SOLANA_KEYPAIR_PATH").unwrap_or_else(|_| self.keypair_path.clone());
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

/// Map an HTTP(S) RPC URL onto its websocket counterpart
pub fn ws_url_from_rpc(rpc_url: &str) -> String {
    if let Some(rest) = rpc_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = rpc_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        rpc_url.to_string()
    }
}

/// The fixed copy-trade pair
#[derive(Debug, Clone, Deserialize)]
pub struct TokensSection {
    /// Asset spent on every copy and received on liquidation (wrapped SOL)
    pub base_mint: String,
    #[serde(default = "default_base_decimals")]
    pub base_decimals: u8,
    /// Asset bought on every copy
    pub quote_mint: String,
}

fn default_base_decimals() -> u8 {
    crate::domain::SOL_DECIMALS
}

/// Copy trade sizing
#[derive(Debug, Clone, Deserialize)]
pub struct CopySection {
    /// Fixed amount of the base asset per copy, in display units
    pub amount: Decimal,
    /// Slippage tolerance in basis points (0.5% = 50 bps)
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    /// Skip new copies while one is still executing
    #[serde(default)]
    pub skip_while_in_flight: bool,
}

fn default_slippage_bps() -> u16 {
    50
}

/// Jupiter API configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct JupiterSection {
    #[serde(default = "default_jupiter_url")]
    pub api_url: String,
    /// Optional API key for higher rate limits (get from jup.ag)
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_jupiter_url() -> String {
    crate::adapters::jupiter::DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for JupiterSection {
    fn default() -> Self {
        Self {
            api_url: default_jupiter_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl JupiterSection {
    /// Get API key with environment variable fallback
    /// Checks JUPITER_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("JUPITER_API_KEY").ok().filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Liquidation sweep settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiquidationSection {
    /// Slippage for sweep swaps; defaults to `copy.slippage_bps`
    #[serde(default)]
    pub slippage_bps: Option<u16>,
    /// Run a sweep every N seconds while the copy loop is up
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level or EnvFilter directive: "info", "jupiter_copy_trader=debug", ...
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn parse_commitment(value: &str) -> Result<CommitmentLevel, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentLevel::Processed),
        "confirmed" => Ok(CommitmentLevel::Confirmed),
        "finalized" => Ok(CommitmentLevel::Finalized),
        other => Err(ConfigError::ValidationError(format!(
            "commitment must be processed, confirmed or finalized, got '{}'",
            other
        ))),
    }
}

fn require_pubkey(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::ValidationError(format!("{} cannot be empty", field)));
    }
    Pubkey::from_str(value)
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid address: {}", field, e)))
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_pubkey("watch.address", &self.watch.address)?;

        if self.watch.program_set().is_empty() {
            return Err(ConfigError::ValidationError(
                "swap_program_ids cannot be empty".to_string(),
            ));
        }

        self.watch.commitment_level()?;

        if self.solana.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if self.solana.keypair_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "keypair_path cannot be empty".to_string(),
            ));
        }

        if self.solana.requests_per_second == 0 {
            return Err(ConfigError::ValidationError(
                "requests_per_second must be > 0".to_string(),
            ));
        }

        require_pubkey("tokens.base_mint", &self.tokens.base_mint)?;
        require_pubkey("tokens.quote_mint", &self.tokens.quote_mint)?;
        if self.tokens.base_mint == self.tokens.quote_mint {
            return Err(ConfigError::ValidationError(
                "base_mint and quote_mint must differ".to_string(),
            ));
        }

        if self.copy.amount <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "copy.amount must be > 0, got {}",
                self.copy.amount
            )));
        }

        if self.copy.slippage_bps > 10_000 {
            return Err(ConfigError::ValidationError(format!(
                "slippage_bps must be <= 10000, got {}",
                self.copy.slippage_bps
            )));
        }

        if let Some(bps) = self.liquidation.slippage_bps {
            if bps > 10_000 {
                return Err(ConfigError::ValidationError(format!(
                    "liquidation.slippage_bps must be <= 10000, got {}",
                    bps
                )));
            }
        }

        if self.liquidation.interval_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "liquidation.interval_secs must be > 0 when set".to_string(),
            ));
        }

        if self.jupiter.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_url cannot be empty".to_string(),
            ));
        }

        if self.jupiter.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "jupiter.timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Slippage used by the liquidation sweep
    pub fn liquidation_slippage_bps(&self) -> u16 {
        self.liquidation.slippage_bps.unwrap_or(self.copy.slippage_bps)
    }

    /// Runtime settings for the copy trader acting on behalf of `operator`
    pub fn copy_settings(&self, operator: String) -> Result<CopySettings, ConfigError> {
        Ok(CopySettings {
            watched_address: self.watch.address.clone(),
            commitment: self.watch.commitment_level()?,
            operator,
            base_mint: self.tokens.base_mint.clone(),
            base_decimals: self.tokens.base_decimals,
            quote_mint: self.tokens.quote_mint.clone(),
            copy_amount: self.copy.amount,
            slippage_bps: self.copy.slippage_bps,
            liquidation_slippage_bps: self.liquidation_slippage_bps(),
            skip_while_in_flight: self.copy.skip_while_in_flight,
            liquidation_interval: self.liquidation.interval_secs.map(Duration::from_secs),
        })
    }
}
