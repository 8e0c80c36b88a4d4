//! Copy Pipeline Integration Tests
//!
//! Drives the public API end to end with the recording mocks:
//! 1. Config file -> CopySettings -> CopyTrader wiring
//! 2. Log stream -> detection -> fetch -> execution
//! 3. Liquidation sweep over a mixed portfolio
//!
//! All tests are deterministic (no real network calls).

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jupiter_copy_trader::application::{CopyTrader, EntryOutcome};
use jupiter_copy_trader::config::load_config;
use jupiter_copy_trader::domain::{LogEvent, ParsedTokenAccount, SkipReason, Throttler, WSOL_MINT};
use jupiter_copy_trader::ports::mocks::{MockExecutor, MockLedger, MockSubscriber};
use rust_decimal_macros::dec;
use solana_sdk::commitment_config::CommitmentLevel;
use tempfile::NamedTempFile;

// ============================================================================
// Test Fixtures
// ============================================================================

const WATCHED: &str = "4hfqqgqBrXeW67v7P79BRDYS3LmRuDNBBKqPycHBeqVs";
const OPERATOR: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
const RAYDIUM: &str = "amm2nQDp4c9bBSNTSeJgvDZoXQAJCUAwnkMdmgz7VRus";
const SERUM: &str = "9xQeWvG816bUx9EPf7BcNsEcN2ppv1Y1nR3jZ2Y3fZbp";

fn config_toml(requests_per_second: u32) -> String {
    format!(
        r#"
[watch]
address = "{WATCHED}"
swap_program_ids = ["{RAYDIUM}", "{SERUM}"]
commitment = "finalized"

[solana]
rpc_url = "http://127.0.0.1:8899"
keypair_path = "id.json"
requests_per_second = {requests_per_second}

[tokens]
base_mint = "{WSOL_MINT}"
quote_mint = "{USDC}"

[copy]
amount = "0.1"
slippage_bps = 50

[liquidation]
slippage_bps = 200
"#
    )
}

/// Build a CopyTrader from a real config file and mock ports
fn trader_from_config(rps: u32, ledger: &MockLedger, executor: &MockExecutor) -> CopyTrader {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_toml(rps).as_bytes()).unwrap();
    let config = load_config(file.path()).unwrap();

    CopyTrader::new(
        config.copy_settings(OPERATOR.to_string()).unwrap(),
        config.watch.program_set(),
        Arc::new(ledger.clone()),
        Arc::new(executor.clone()),
        Arc::new(Throttler::per_second(config.solana.requests_per_second)),
    )
}

fn swap_logs(signature: &str, program: &str) -> LogEvent {
    LogEvent::new(
        signature,
        vec![
            "Program ComputeBudget111111111111111111111111111111 invoke [1]".to_string(),
            format!("Program {} invoke [1]", program),
            format!("Program {} success", program),
        ],
    )
}

fn transfer_logs(signature: &str) -> LogEvent {
    LogEvent::new(
        signature,
        vec![
            "Program 11111111111111111111111111111111 invoke [1]".to_string(),
            "Program 11111111111111111111111111111111 success".to_string(),
        ],
    )
}

fn token_account(mint: &str, ui_amount: &str, decimals: u8) -> ParsedTokenAccount {
    ParsedTokenAccount {
        mint: Some(mint.to_string()),
        owner: Some(OPERATOR.to_string()),
        amount: None,
        decimals: Some(decimals),
        ui_amount_string: Some(ui_amount.to_string()),
    }
}

// ============================================================================
// Shipped configuration
// ============================================================================

#[test]
fn test_shipped_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/mainnet.toml");
    let config = load_config(&path).unwrap();

    assert_eq!(config.watch.address, WATCHED);
    assert!(config.copy_settings(OPERATOR.to_string()).is_ok());
}

// ============================================================================
// Copy path
// ============================================================================

#[tokio::test]
async fn test_stream_copies_only_swaps() {
    let ledger = MockLedger::new()
        .with_transaction("swap-1")
        .with_transaction("transfer-1")
        .with_transaction("swap-2");
    let executor = MockExecutor::new();
    let trader = Arc::new(trader_from_config(1000, &ledger, &executor));
    let (subscriber, tx) = MockSubscriber::new(16);

    tx.send(swap_logs("swap-1", RAYDIUM)).await.unwrap();
    tx.send(transfer_logs("transfer-1")).await.unwrap();
    tx.send(swap_logs("swap-2", SERUM)).await.unwrap();
    drop(tx);

    trader.run(&subscriber).await.unwrap();

    assert_eq!(
        subscriber.subscriptions(),
        vec![(WATCHED.to_string(), CommitmentLevel::Finalized)]
    );

    let mut fetched = ledger.transaction_calls();
    fetched.sort();
    assert_eq!(fetched, vec!["swap-1", "swap-2"]);

    let calls = executor.get_calls();
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(call.input_mint(), WSOL_MINT);
        assert_eq!(call.output_mint(), USDC);
        assert_eq!(call.amount(), dec!(0.1));
        assert_eq!(call.input_decimals(), 9);
        assert_eq!(call.slippage_bps(), 50);
        assert_eq!(call.base_units().unwrap(), 100_000_000);
    }
}

#[tokio::test]
async fn test_unfetchable_transaction_does_not_block_later_events() {
    let ledger = MockLedger::new().with_transaction("later");
    let executor = MockExecutor::new();
    let trader = Arc::new(trader_from_config(1000, &ledger, &executor));
    let (subscriber, tx) = MockSubscriber::new(16);

    tx.send(swap_logs("pruned", RAYDIUM)).await.unwrap();
    tx.send(swap_logs("later", RAYDIUM)).await.unwrap();
    drop(tx);

    trader.run(&subscriber).await.unwrap();

    assert_eq!(ledger.transaction_calls().len(), 2);
    assert_eq!(executor.get_calls().len(), 1);
}

#[tokio::test]
async fn test_failed_copy_does_not_stop_stream() {
    let ledger = MockLedger::new().with_transaction("a").with_transaction("b");
    let executor = MockExecutor::new().failing_for(WSOL_MINT);
    let trader = Arc::new(trader_from_config(1000, &ledger, &executor));
    let (subscriber, tx) = MockSubscriber::new(16);

    tx.send(swap_logs("a", RAYDIUM)).await.unwrap();
    tx.send(swap_logs("b", RAYDIUM)).await.unwrap();
    drop(tx);

    trader.run(&subscriber).await.unwrap();
    assert_eq!(executor.get_calls().len(), 2);
}

#[tokio::test]
async fn test_rpc_calls_are_spaced_by_throttle() {
    // 20 rps -> 50ms between ledger calls; two copies make four gated calls
    let ledger = MockLedger::new().with_transaction("a").with_transaction("b");
    let executor = MockExecutor::new();
    let trader = Arc::new(trader_from_config(20, &ledger, &executor));
    let (subscriber, tx) = MockSubscriber::new(16);

    tx.send(swap_logs("a", RAYDIUM)).await.unwrap();
    tx.send(swap_logs("b", RAYDIUM)).await.unwrap();
    drop(tx);

    let start = Instant::now();
    trader.run(&subscriber).await.unwrap();

    assert_eq!(executor.get_calls().len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(150));
}

// ============================================================================
// Liquidation
// ============================================================================

#[tokio::test]
async fn test_liquidation_over_mixed_portfolio() {
    let ledger = MockLedger::new()
        .with_token_account("acc-empty", token_account(USDC, "0", 6))
        .with_token_account("acc-bonk", token_account(BONK, "250000.5", 5))
        .with_token_account("acc-wsol", token_account(WSOL_MINT, "1.5", 9))
        .with_token_account("acc-usdc", token_account(USDC, "42", 6));
    let executor = MockExecutor::new().failing_for(BONK);
    let trader = trader_from_config(1000, &ledger, &executor);

    let report = trader.liquidate_all().await.unwrap();

    let calls = executor.get_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].input_mint(), BONK);
    assert_eq!(calls[0].amount(), dec!(250000.5));
    assert_eq!(calls[1].input_mint(), USDC);
    assert_eq!(calls[1].amount(), dec!(42));
    assert!(calls.iter().all(|c| c.output_mint() == WSOL_MINT && c.slippage_bps() == 200));

    assert_eq!(report.entries.len(), 4);
    assert!(matches!(report.entries[0].outcome, EntryOutcome::Skipped(SkipReason::ZeroBalance)));
    assert!(matches!(report.entries[1].outcome, EntryOutcome::Failed(_)));
    assert!(matches!(report.entries[2].outcome, EntryOutcome::Skipped(SkipReason::BaseAsset)));
    assert!(matches!(report.entries[3].outcome, EntryOutcome::Swapped(_)));
}

#[tokio::test]
async fn test_liquidation_of_empty_wallet_is_noop() {
    let ledger = MockLedger::new();
    let executor = MockExecutor::new();
    let trader = trader_from_config(1000, &ledger, &executor);

    let report = trader.liquidate_all().await.unwrap();

    assert!(report.is_empty());
    assert!(executor.get_calls().is_empty());
}
