//! Swap Request and Result
//!
//! A swap intent expressed in display units of the input asset. Construction
//! rejects non-positive amounts so an invalid request can never reach an
//! executor.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapRequestError {
    #[error("Swap amount must be > 0, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Input and output mint are the same: {0}")]
    SameMint(String),
    #[error("Amount {amount} with {decimals} decimals does not fit in u64 base units")]
    Overflow { amount: Decimal, decimals: u8 },
}

/// A validated swap intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapRequest {
    input_mint: String,
    output_mint: String,
    /// Amount of the input asset in display units (e.g. 0.1 SOL)
    amount: Decimal,
    /// Decimals of the input mint, used to convert to base units
    input_decimals: u8,
    /// Slippage tolerance in basis points (1 = 0.01%)
    slippage_bps: u16,
}

impl SwapRequest {
    pub fn new(
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: Decimal,
        input_decimals: u8,
        slippage_bps: u16,
    ) -> Result<Self, SwapRequestError> {
        if amount <= Decimal::ZERO {
            return Err(SwapRequestError::NonPositiveAmount(amount));
        }

        let input_mint = input_mint.into();
        let output_mint = output_mint.into();
        if input_mint == output_mint {
            return Err(SwapRequestError::SameMint(input_mint));
        }

        Ok(Self {
            input_mint,
            output_mint,
            amount,
            input_decimals,
            slippage_bps,
        })
    }

    pub fn input_mint(&self) -> &str {
        &self.input_mint
    }

    pub fn output_mint(&self) -> &str {
        &self.output_mint
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn input_decimals(&self) -> u8 {
        self.input_decimals
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps
    }

    /// Amount in the input mint's smallest unit, truncating sub-unit dust
    pub fn base_units(&self) -> Result<u64, SwapRequestError> {
        to_base_units(self.amount, self.input_decimals)
    }
}

/// Convert a display amount into base units (e.g. SOL -> lamports)
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, SwapRequestError> {
    let overflow = || SwapRequestError::Overflow { amount, decimals };
    if decimals > 28 {
        return Err(overflow());
    }

    let scale = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
    amount
        .checked_mul(scale)
        .map(|v| v.trunc())
        .and_then(|v| v.to_u64())
        .ok_or_else(overflow)
}

/// Settlement of a successful swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Transaction signature of the settled swap
    pub signature: String,
}

impl SwapResult {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}
