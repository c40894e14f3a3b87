//! Ethereum gateway to the DeCleanup contracts
//!
//! This crate implements the `CleanupContracts` trait from
//! `decleanup-contracts-trait` on top of Alloy, for Celo and any other
//! EVM chain the contracts are deployed to.
//!
//! # Features
//!
//! - Typed bindings for the Verification, Impact Product, and Reward Distributor contracts
//! - Chain guard that adds/switches the wallet network before every write
//! - JSON-RPC wallet connector with EIP-1193 error classification
//! - Static registry of known networks for wallet setup instructions
//!
//! # Example
//!
//! ```ignore
//! use decleanup_contracts_ethereum::{EthereumCleanupConfig, EthereumCleanupContracts};
//! use decleanup_contracts_trait::CleanupContracts;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EthereumCleanupConfig::from_file("decleanup.toml")?;
//! let contracts = EthereumCleanupContracts::new(config)?;
//! let submission = contracts.get_submission(42).await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod chain_guard;
pub mod config;
pub mod contract;
pub mod conversions;
pub mod error;
pub mod gateway;
pub mod networks;
pub mod wallet;

pub use chain_guard::{ChainGuard, SwitchTiming};
pub use config::{EthereumCleanupConfig, WrongChainNotice};
pub use contract::ContractClient;
pub use error::{EthereumCleanupError, Result};
pub use gateway::EthereumCleanupContracts;
pub use wallet::RpcWallet;

/// Re-export the CleanupContracts trait for convenience
pub use decleanup_contracts_trait::CleanupContracts;
