//! Token Holdings
//!
//! Strict conversion of a loosely typed `jsonParsed` SPL token account into a
//! typed `TokenHolding`. Anything that does not parse cleanly becomes a
//! `SkipReason`; garbage is never silently treated as a zero balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

/// Token account fields as reported by `getAccountInfo` (jsonParsed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTokenAccount {
    pub mint: Option<String>,
    pub owner: Option<String>,
    /// Raw amount in base units
    pub amount: Option<String>,
    pub decimals: Option<u8>,
    /// Display amount, e.g. "123.45"
    pub ui_amount_string: Option<String>,
}

/// A positive balance of one asset held by the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenHolding {
    /// Token account address
    pub account: String,
    pub mint: String,
    pub owner: String,
    /// Balance in display units
    pub balance: Decimal,
    /// Balance in base units, when the node reported it
    pub raw_amount: Option<u64>,
    pub decimals: u8,
}

/// Why a token account was left out of a liquidation sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AccountNotFound,
    MissingMint,
    InvalidMint(String),
    MissingBalance,
    InvalidBalance(String),
    MissingDecimals,
    ZeroBalance,
    BaseAsset,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AccountNotFound => write!(f, "account not found"),
            SkipReason::MissingMint => write!(f, "missing mint"),
            SkipReason::InvalidMint(m) => write!(f, "invalid mint '{}'", m),
            SkipReason::MissingBalance => write!(f, "missing uiAmountString"),
            SkipReason::InvalidBalance(b) => write!(f, "unparsable balance '{}'", b),
            SkipReason::MissingDecimals => write!(f, "missing decimals"),
            SkipReason::ZeroBalance => write!(f, "zero balance"),
            SkipReason::BaseAsset => write!(f, "already the base asset"),
        }
    }
}

impl TokenHolding {
    /// Parse a token account, returning a holding only for a positive, well-formed balance
    pub fn parse(account: &str, parsed: &ParsedTokenAccount) -> Result<Self, SkipReason> {
        let mint = parsed.mint.as_deref().ok_or(SkipReason::MissingMint)?;
        Pubkey::from_str(mint).map_err(|_| SkipReason::InvalidMint(mint.to_string()))?;

        let ui_amount = parsed
            .ui_amount_string
            .as_deref()
            .ok_or(SkipReason::MissingBalance)?;
        let balance = Decimal::from_str(ui_amount.trim())
            .map_err(|_| SkipReason::InvalidBalance(ui_amount.to_string()))?;
        if balance < Decimal::ZERO {
            return Err(SkipReason::InvalidBalance(ui_amount.to_string()));
        }
        if balance.is_zero() {
            return Err(SkipReason::ZeroBalance);
        }

        let decimals = parsed.decimals.ok_or(SkipReason::MissingDecimals)?;

        let raw_amount = match parsed.amount.as_deref() {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| SkipReason::InvalidBalance(raw.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            account: account.to_string(),
            mint: mint.to_string(),
            owner: parsed.owner.clone().unwrap_or_default(),
            balance,
            raw_amount,
            decimals,
        })
    }

    /// Exact amount to sell in display units.
    ///
    /// Built from the base-unit amount when the node reported one, since
    /// `uiAmountString` may be rounded for high-decimal mints.
    pub fn sell_amount(&self) -> Decimal {
        match self.raw_amount {
            Some(raw) if self.decimals <= 28 => {
                let mut exact = Decimal::from(raw);
                match exact.set_scale(self.decimals as u32) {
                    Ok(()) => exact,
                    Err(_) => self.balance,
                }
            }
            _ => self.balance,
        }
    }
}
