//! Portfolio Liquidator
//!
//! Sweeps every SPL token balance of the operator account back into the base
//! asset. Accounts are processed one at a time; a failure on one holding is
//! recorded and the sweep moves on.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{SkipReason, SwapRequest, SwapRequestError, SwapResult, Throttler, TokenHolding};
use crate::ports::execution::{ExecutionError, SwapExecutionPort};
use crate::ports::ledger::{LedgerError, LedgerPort};

/// The sweep could not start
#[derive(Debug, Error)]
pub enum LiquidationError {
    #[error("Failed to list token accounts for {owner}: {source}")]
    AccountListing {
        owner: String,
        #[source]
        source: LedgerError,
    },
}

/// One holding could not be converted
#[derive(Debug, Error)]
pub enum LiquidationItemError {
    #[error("Failed to read token account: {0}")]
    Fetch(#[from] LedgerError),
    #[error("Invalid swap request: {0}")]
    InvalidRequest(#[from] SwapRequestError),
    #[error("Swap failed: {0}")]
    Execution(#[from] ExecutionError),
}

/// What happened to one token account
#[derive(Debug)]
pub enum EntryOutcome {
    Swapped(SwapResult),
    Failed(LiquidationItemError),
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct LiquidationEntry {
    /// Token account address
    pub account: String,
    /// Mint, when the account could be read
    pub mint: Option<String>,
    /// Balance sent to the executor, for attempted swaps
    pub balance: Option<Decimal>,
    pub outcome: EntryOutcome,
}

/// Per-account results of one sweep, in processing order
#[derive(Debug, Default)]
pub struct LiquidationReport {
    pub entries: Vec<LiquidationEntry>,
}

impl LiquidationReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn swapped(&self) -> impl Iterator<Item = &LiquidationEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Swapped(_)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &LiquidationEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &LiquidationEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Skipped(_)))
    }
}

pub struct PortfolioLiquidator {
    ledger: Arc<dyn LedgerPort>,
    executor: Arc<dyn SwapExecutionPort>,
    throttler: Arc<Throttler>,
    base_mint: String,
    slippage_bps: u16,
}

impl PortfolioLiquidator {
    pub fn new(
        ledger: Arc<dyn LedgerPort>,
        executor: Arc<dyn SwapExecutionPort>,
        throttler: Arc<Throttler>,
        base_mint: String,
        slippage_bps: u16,
    ) -> Self {
        Self {
            ledger,
            executor,
            throttler,
            base_mint,
            slippage_bps,
        }
    }

    /// Convert every positive token balance of `owner` into the base asset
    pub async fn liquidate_all(&self, owner: &str) -> Result<LiquidationReport, LiquidationError> {
        let mut report = LiquidationReport::default();

        self.throttler.acquire().await;
        let accounts = self
            .ledger
            .get_token_accounts_by_owner(owner)
            .await
            .map_err(|source| LiquidationError::AccountListing {
                owner: owner.to_string(),
                source,
            })?;

        if accounts.is_empty() {
            info!("No token accounts for {}, nothing to liquidate", owner);
            return Ok(report);
        }

        info!("Liquidating {} token accounts into {}", accounts.len(), self.base_mint);

        for account in accounts {
            let entry = self.liquidate_account(&account).await;
            let mint = entry.mint.as_deref().unwrap_or("?");
            match &entry.outcome {
                EntryOutcome::Swapped(result) => {
                    info!("Sold {} ({}): {}", mint, account, result.signature)
                }
                EntryOutcome::Failed(e) => error!("Failed to sell {} ({}): {}", mint, account, e),
                EntryOutcome::Skipped(reason) => warn!("Skipping {} ({}): {}", account, mint, reason),
            }
            report.entries.push(entry);
        }

        info!(
            "Liquidation finished: {} sold, {} failed, {} skipped",
            report.swapped().count(),
            report.failed().count(),
            report.skipped().count()
        );
        Ok(report)
    }

    async fn liquidate_account(&self, account: &str) -> LiquidationEntry {
        let entry = |mint: Option<String>, balance: Option<Decimal>, outcome| LiquidationEntry {
            account: account.to_string(),
            mint,
            balance,
            outcome,
        };

        self.throttler.acquire().await;
        let parsed = match self.ledger.get_parsed_token_account(account).await {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return entry(None, None, EntryOutcome::Skipped(SkipReason::AccountNotFound)),
            Err(e) => return entry(None, None, EntryOutcome::Failed(e.into())),
        };

        let holding = match TokenHolding::parse(account, &parsed) {
            Ok(holding) => holding,
            Err(reason) => return entry(parsed.mint.clone(), None, EntryOutcome::Skipped(reason)),
        };

        let mint = Some(holding.mint.clone());
        if holding.mint == self.base_mint {
            return entry(mint, None, EntryOutcome::Skipped(SkipReason::BaseAsset));
        }

        let request = match SwapRequest::new(
            holding.mint.clone(),
            self.base_mint.clone(),
            holding.sell_amount(),
            holding.decimals,
            self.slippage_bps,
        ) {
            Ok(request) => request,
            Err(e) => return entry(mint, Some(holding.balance), EntryOutcome::Failed(e.into())),
        };

        self.throttler.acquire().await;
        let outcome = match self.executor.execute(&request).await {
            Ok(result) => EntryOutcome::Swapped(result),
            Err(e) => EntryOutcome::Failed(e.into()),
        };
        entry(mint, Some(holding.balance), outcome)
    }
}
