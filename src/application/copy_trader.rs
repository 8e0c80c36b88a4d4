//! Copy Trader
//!
//! Wires the log subscription to swap detection and execution. Each log event
//! is handled on its own task, so a slow or failing copy never holds up the
//! stream. The liquidation sweep is available on demand and, optionally, on a
//! fixed schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use solana_sdk::commitment_config::CommitmentLevel;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::{
    matching_program, LogEvent, SwapProgramSet, SwapRequest, SwapRequestError, SwapResult,
    Throttler,
};
use crate::ports::execution::{ExecutionError, SwapExecutionPort};
use crate::ports::ledger::LedgerPort;
use crate::ports::subscription::{LogSubscriptionPort, SubscribeError};
use super::liquidator::{LiquidationError, LiquidationReport, PortfolioLiquidator};

/// The copy loop could not start
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to subscribe to logs for {address}: {source}")]
    Subscribe {
        address: String,
        #[source]
        source: SubscribeError,
    },
}

/// Failure while handling one log event
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Transaction {signature} unavailable: {reason}")]
    Fetch { signature: String, reason: String },
    #[error("Invalid copy request: {0}")]
    InvalidRequest(#[from] SwapRequestError),
    #[error("Copy swap failed: {0}")]
    Execution(#[from] ExecutionError),
    #[error("Event handler panicked: {0}")]
    Panicked(String),
}

/// What a handled event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No known swap program in the logs
    NotSwap,
    /// Another copy was still executing
    SkippedInFlight,
    Copied(SwapResult),
}

#[derive(Debug, Clone)]
pub struct CopySettings {
    /// Account whose swaps are copied
    pub watched_address: String,
    pub commitment: CommitmentLevel,
    /// Operator account; owner of the holdings swept by liquidation
    pub operator: String,
    pub base_mint: String,
    pub base_decimals: u8,
    pub quote_mint: String,
    /// Base asset spent per copy, in display units
    pub copy_amount: Decimal,
    pub slippage_bps: u16,
    pub liquidation_slippage_bps: u16,
    pub skip_while_in_flight: bool,
    pub liquidation_interval: Option<Duration>,
}

/// Clears an in-flight flag when dropped
struct FlagGuard<'a>(&'a AtomicBool);

impl<'a> FlagGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlagGuard(flag))
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CopyTrader {
    settings: CopySettings,
    programs: SwapProgramSet,
    ledger: Arc<dyn LedgerPort>,
    executor: Arc<dyn SwapExecutionPort>,
    throttler: Arc<Throttler>,
    liquidator: PortfolioLiquidator,
    copy_in_flight: AtomicBool,
    sweep_in_flight: AtomicBool,
}

impl CopyTrader {
    pub fn new(
        settings: CopySettings,
        programs: SwapProgramSet,
        ledger: Arc<dyn LedgerPort>,
        executor: Arc<dyn SwapExecutionPort>,
        throttler: Arc<Throttler>,
    ) -> Self {
        let liquidator = PortfolioLiquidator::new(
            Arc::clone(&ledger),
            Arc::clone(&executor),
            Arc::clone(&throttler),
            settings.base_mint.clone(),
            settings.liquidation_slippage_bps,
        );

        Self {
            settings,
            programs,
            ledger,
            executor,
            throttler,
            liquidator,
            copy_in_flight: AtomicBool::new(false),
            sweep_in_flight: AtomicBool::new(false),
        }
    }

    /// Subscribe and dispatch events until the stream ends.
    ///
    /// Only a failed subscription is an error; handler failures are logged.
    pub async fn run(self: Arc<Self>, subscriber: &dyn LogSubscriptionPort) -> Result<(), StartupError> {
        let address = self.settings.watched_address.clone();
        let mut events = subscriber
            .subscribe(&address, self.settings.commitment)
            .await
            .map_err(|source| StartupError::Subscribe {
                address: address.clone(),
                source,
            })?;

        info!(
            "Watching {} for swaps through {} programs, copying {} {} -> {}",
            address,
            self.programs.len(),
            self.settings.copy_amount,
            self.settings.base_mint,
            self.settings.quote_mint
        );

        let mut tasks: JoinSet<()> = JoinSet::new();
        let mut sweep = self.settings.liquidation_interval.map(|period| {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                next = events.recv() => match next {
                    Some(event) => {
                        let trader = Arc::clone(&self);
                        tasks.spawn(async move { trader.dispatch(event).await });
                    }
                    None => {
                        warn!("Log stream for {} closed", address);
                        break;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => reap(joined),
                _ = next_tick(&mut sweep) => {
                    let trader = Arc::clone(&self);
                    tasks.spawn(async move { trader.scheduled_sweep().await });
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }
        Ok(())
    }

    /// Classify one event and copy it if it is a swap
    pub async fn handle_event(&self, event: &LogEvent) -> Result<EventOutcome, HandlerError> {
        debug!("Logs for {}: {} lines", event.signature, event.lines.len());

        let Some(program) = matching_program(&self.programs, &event.lines) else {
            return Ok(EventOutcome::NotSwap);
        };
        info!("Swap detected in {} (program {})", event.signature, program);
        if let Some(ref err) = event.err {
            debug!("{} failed on chain ({}), copying anyway", event.signature, err);
        }

        let _in_flight = if self.settings.skip_while_in_flight {
            match FlagGuard::try_acquire(&self.copy_in_flight) {
                Some(guard) => Some(guard),
                None => {
                    info!("Copy already in flight, skipping {}", event.signature);
                    return Ok(EventOutcome::SkippedInFlight);
                }
            }
        } else {
            None
        };

        self.throttler.acquire().await;
        let details = self
            .ledger
            .get_transaction(&event.signature)
            .await
            .map_err(|e| HandlerError::Fetch {
                signature: event.signature.clone(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| HandlerError::Fetch {
                signature: event.signature.clone(),
                reason: "transaction not found".to_string(),
            })?;
        let block_time = details
            .block_time
            .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());
        debug!("Fetched {} (slot {}, block time {})", details.signature, details.slot, block_time);

        let request = SwapRequest::new(
            self.settings.base_mint.clone(),
            self.settings.quote_mint.clone(),
            self.settings.copy_amount,
            self.settings.base_decimals,
            self.settings.slippage_bps,
        )?;

        self.throttler.acquire().await;
        let result = self.executor.execute(&request).await?;
        info!("Copied swap {} -> {}", event.signature, result.signature);
        Ok(EventOutcome::Copied(result))
    }

    /// Sweep all operator holdings into the base asset
    pub async fn liquidate_all(&self) -> Result<LiquidationReport, LiquidationError> {
        self.liquidator.liquidate_all(&self.settings.operator).await
    }

    async fn dispatch(&self, event: LogEvent) {
        if let Err(e) = self.handle_event(&event).await {
            error!("Handler for {} failed: {}", event.signature, e);
        }
    }

    async fn scheduled_sweep(&self) {
        let Some(_guard) = FlagGuard::try_acquire(&self.sweep_in_flight) else {
            warn!("Previous liquidation sweep still running, skipping this one");
            return;
        };
        info!("Starting scheduled liquidation sweep");
        if let Err(e) = self.liquidate_all().await {
            error!("Scheduled liquidation failed: {}", e);
        }
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!("{}", HandlerError::Panicked(e.to_string()));
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
