//! Contract client holding connection details for the three cleanup contracts
//!
//! Providers are not cached: a new one is created per call, so a changed RPC
//! endpoint or signer is picked up without restarting.

use crate::config::EthereumCleanupConfig;
use crate::error::{EthereumCleanupError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use std::str::FromStr;

/// Parsed addresses, signer, and RPC endpoint of the cleanup contracts
pub struct ContractClient {
    verification: Option<Address>,
    impact_product: Option<Address>,
    reward_distributor: Option<Address>,
    /// Signer built from the configured private key
    signer: Option<PrivateKeySigner>,
    pub config: EthereumCleanupConfig,
}

fn parse_optional_address(field: &str, value: &Option<String>) -> Result<Option<Address>> {
    value
        .as_deref()
        .map(|address| {
            Address::from_str(address).map_err(|e| {
                EthereumCleanupError::Configuration(format!(
                    "Invalid {} '{}': {}",
                    field, address, e
                ))
            })
        })
        .transpose()
}

impl ContractClient {
    /// Parse the contract addresses and the signing key of `config`
    pub fn new(config: EthereumCleanupConfig) -> Result<Self> {
        let verification =
            parse_optional_address("verification_address", &config.verification_address)?;
        let impact_product =
            parse_optional_address("impact_product_address", &config.impact_product_address)?;
        let reward_distributor = parse_optional_address(
            "reward_distributor_address",
            &config.reward_distributor_address,
        )?;

        let signer = config
            .private_key
            .as_deref()
            .filter(|pk| !pk.is_empty())
            .map(|pk| {
                pk.parse::<PrivateKeySigner>()
                    .map_err(|e| EthereumCleanupError::InvalidPrivateKey(e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            verification,
            impact_product,
            reward_distributor,
            signer,
            config,
        })
    }

    /// Verification (Submission) contract address
    pub fn verification_address(&self) -> Result<Address> {
        self.verification
            .ok_or(EthereumCleanupError::ContractNotConfigured("Verification"))
    }

    /// Impact Product NFT contract address
    pub fn impact_product_address(&self) -> Result<Address> {
        self.impact_product
            .ok_or(EthereumCleanupError::ContractNotConfigured("Impact Product"))
    }

    /// Reward Distributor contract address
    pub fn reward_distributor_address(&self) -> Result<Address> {
        self.reward_distributor
            .ok_or(EthereumCleanupError::ContractNotConfigured("Reward Distributor"))
    }

    /// Chain every write must go to
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn has_wallet(&self) -> bool {
        self.signer.is_some()
    }

    /// Account that signs write transactions, if any
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    pub fn rpc_url(&self) -> &str {
        &self.config.rpc_url
    }

    fn parsed_rpc_url(&self) -> Result<Url> {
        self.config
            .rpc_url
            .parse()
            .map_err(|e| EthereumCleanupError::ProviderError(format!("Invalid RPC URL: {}", e)))
    }

    /// Read-only provider
    pub fn create_provider(&self) -> Result<impl Provider> {
        Ok(ProviderBuilder::new().connect_http(self.parsed_rpc_url()?))
    }

    /// Provider that signs with the configured key
    pub fn create_provider_with_signer(&self) -> Result<impl Provider> {
        let signer = self
            .signer
            .clone()
            .ok_or(EthereumCleanupError::NoPrivateKey)?;

        Ok(ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.parsed_rpc_url()?))
    }
}
