//! Jupiter Copy Trader Library
//!
//! Watches a Solana account for DEX swaps and mirrors each one with a fixed
//! size swap through the Jupiter aggregator.
//!
//! # Modules
//!
//! - `domain`: Core logic (log events, swap detection, throttling, holdings)
//! - `ports`: Trait abstractions (LedgerPort, LogSubscriptionPort, SwapExecutionPort)
//! - `adapters`: External implementations (Solana, Jupiter, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Copy trader and portfolio liquidator

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
