//! Jupiter Copy Trader
//!
//! Mirrors a watched Solana wallet's DEX swaps through the Jupiter aggregator.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_sdk::commitment_config::CommitmentConfig;

use jupiter_copy_trader::adapters::cli::{init_logging, CliApp, Command, LiquidateCmd, RunCmd, StatusCmd};
use jupiter_copy_trader::adapters::jupiter::{
    JupiterClient, JupiterConfig, JupiterSwapExecutor, PaperSwapExecutor,
};
use jupiter_copy_trader::adapters::solana::{
    LogStreamConfig, LogStreamSubscriber, OperatorWallet, SolanaClient,
};
use jupiter_copy_trader::application::{CopyTrader, EntryOutcome};
use jupiter_copy_trader::config::{load_config, Config};
use jupiter_copy_trader::domain::Throttler;
use jupiter_copy_trader::ports::{LedgerPort, SwapExecutionPort};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config_path = app.command.config_path().to_path_buf();
    let config = load_config(&config_path);

    let configured_level = config.as_ref().ok().map(|c| c.logging.level.clone());
    init_logging(app.verbose, app.debug, configured_level.as_deref())?;

    let config = config
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    match app.command {
        Command::Run(cmd) => run_command(cmd, config).await,
        Command::Liquidate(cmd) => liquidate_command(cmd, config).await,
        Command::Status(cmd) => status_command(cmd, config).await,
    }
}

/// Everything the copy trader and the sweep share
struct Components {
    solana: SolanaClient,
    wallet: OperatorWallet,
    throttler: Arc<Throttler>,
    trader: Arc<CopyTrader>,
}

fn build_components(config: &Config, paper: bool) -> Result<Components> {
    let commitment = config.watch.commitment_level()?;
    let solana = SolanaClient::new(config.solana.get_rpc_url(), CommitmentConfig { commitment });
    let throttler = Arc::new(Throttler::per_second(config.solana.requests_per_second));

    let jupiter = JupiterClient::with_config(JupiterConfig {
        api_base_url: config.jupiter.api_url.clone(),
        api_key: config.jupiter.get_api_key(),
        timeout: config.jupiter.timeout(),
    })
    .context("Failed to create Jupiter client")?;

    let keypair_path = config.solana.get_keypair_path();
    let wallet = match load_wallet_with_context(&keypair_path) {
        Ok(w) => w,
        Err(e) => {
            if paper {
                tracing::warn!(
                    "Wallet not found at '{}' - using random wallet for paper trading",
                    keypair_path.display()
                );
                OperatorWallet::new_random()
            } else {
                return Err(e);
            }
        }
    };

    let executor: Arc<dyn SwapExecutionPort> = if paper {
        tracing::warn!("PAPER TRADING MODE - no real transactions");
        Arc::new(PaperSwapExecutor::new(jupiter))
    } else {
        Arc::new(JupiterSwapExecutor::new(
            jupiter,
            solana.clone(),
            wallet.clone(),
            Arc::clone(&throttler),
        ))
    };

    let settings = config.copy_settings(wallet.public_key())?;
    let trader = CopyTrader::new(
        settings,
        config.watch.program_set(),
        Arc::new(solana.clone()),
        executor,
        Arc::clone(&throttler),
    );

    Ok(Components {
        solana,
        wallet,
        throttler,
        trader: Arc::new(trader),
    })
}

async fn run_command(cmd: RunCmd, config: Config) -> Result<()> {
    tracing::info!("Starting copy trader...");
    tracing::info!("Config: {}", cmd.config.display());

    let components = build_components(&config, cmd.paper)?;
    tracing::info!("Operator wallet: {}", components.wallet.public_key());

    let subscriber = LogStreamSubscriber::new(LogStreamConfig::new(config.solana.get_ws_url()));

    tokio::select! {
        result = Arc::clone(&components.trader).run(&subscriber) => {
            result.context("Copy trader failed to start")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Copy trader stopped");
    Ok(())
}

async fn liquidate_command(cmd: LiquidateCmd, config: Config) -> Result<()> {
    let components = build_components(&config, cmd.paper)?;
    let report = components
        .trader
        .liquidate_all()
        .await
        .context("Liquidation could not start")?;

    if report.is_empty() {
        println!("No token accounts to liquidate");
        return Ok(());
    }

    for entry in &report.entries {
        let mint = entry.mint.as_deref().unwrap_or("?");
        match &entry.outcome {
            EntryOutcome::Swapped(result) => println!("  SOLD     {} -> {}", mint, result.signature),
            EntryOutcome::Failed(e) => println!("  FAILED   {}: {}", mint, e),
            EntryOutcome::Skipped(reason) => println!("  SKIPPED  {} ({}): {}", entry.account, mint, reason),
        }
    }
    println!(
        "Liquidation: {} sold, {} failed, {} skipped",
        report.swapped().count(),
        report.failed().count(),
        report.skipped().count()
    );

    Ok(())
}

async fn status_command(_cmd: StatusCmd, config: Config) -> Result<()> {
    let components = build_components(&config, false)?;
    let owner = components.wallet.public_key();

    components.throttler.acquire().await;
    let balance = components
        .solana
        .get_balance(&owner)
        .await
        .context("Failed to get balance")?;
    components.throttler.acquire().await;
    let token_accounts = components
        .solana
        .get_token_accounts_by_owner(&owner)
        .await
        .context("Failed to list token accounts")?;

    println!("Wallet: {}", owner);
    println!("Balance: {} lamports ({:.4} SOL)", balance, balance as f64 / 1e9);
    println!("Token accounts: {}", token_accounts.len());
    println!("Watching: {}", config.watch.address);

    Ok(())
}

/// Load wallet with helpful error messages
fn load_wallet_with_context(keypair_path: &Path) -> Result<OperatorWallet> {
    if !keypair_path.exists() {
        bail!(
            "Wallet file not found: {}\n\n\
             To create a new wallet, run:\n  \
             solana-keygen new --outfile {}\n\n\
             Or if you have an existing wallet, update 'keypair_path' in your config",
            keypair_path.display(),
            keypair_path.display()
        );
    }

    OperatorWallet::from_file(keypair_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load wallet from '{}': {}\n\n\
             Expected format: JSON array of bytes (e.g., [1,2,3,...])",
            keypair_path.display(),
            e
        )
    })
}
