//! Configuration types for the Ethereum cleanup gateway

use crate::chain_guard::SwitchTiming;
use crate::networks;
use decleanup_contracts_trait::{NativeCurrency, NetworkDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A chain id users commonly end up on by mistake, with a tailored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongChainNotice {
    pub chain_id: u64,
    /// Name shown to the user, e.g. "Ethereum Mainnet"
    pub name: String,
    /// Extra hint appended to the message
    #[serde(default)]
    pub hint: Option<String>,
}

/// Configuration for the Ethereum cleanup gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumCleanupConfig {
    /// RPC URL for reads and for sending signed transactions
    /// Example: "https://forno.celo.org"
    pub rpc_url: String,

    /// JSON-RPC endpoint of the user's wallet (optional)
    /// Used for `wallet_addEthereumChain` / `wallet_switchEthereumChain`.
    /// When absent, the chain id is read from `rpc_url` and add/switch are unsupported.
    pub wallet_rpc_url: Option<String>,

    /// File where the wallet connector persists its session (e.g. a WalletConnect pairing)
    /// Deleted when the session goes stale or the user disconnects.
    pub wallet_session_file: Option<String>,

    /// Display name of the wallet connector, e.g. "WalletConnect"
    pub wallet_name: Option<String>,

    /// Chain id every write must happen on (42220 = Celo, 11142220 = Celo Sepolia)
    pub chain_id: u64,

    /// Registry key of the required network (see `networks::list_networks`)
    /// Falls back to a lookup by `chain_id` when not set
    pub network: Option<String>,

    /// Verification (Submission) contract address
    pub verification_address: Option<String>,

    /// Impact Product NFT contract address
    pub impact_product_address: Option<String>,

    /// Reward Distributor contract address
    pub reward_distributor_address: Option<String>,

    /// Private key for signing transactions (optional for read-only operations)
    /// Format: 0x-prefixed hex string (64 hex chars + 0x prefix = 66 chars)
    pub private_key: Option<String>,

    /// IPFS CID of the static level metadata directory (`level<N>.json`)
    pub metadata_cid: Option<String>,

    /// Number of confirmations to wait for (default 1)
    pub confirmation_blocks: u64,

    /// Give up waiting for a receipt after this many seconds
    pub receipt_timeout_secs: u64,

    /// Chains that get a tailored "wrong network" error instead of a switch attempt
    pub wrong_chain_notices: Vec<WrongChainNotice>,

    /// Delays and retry counts of the add/switch procedure
    pub switch_timing: SwitchTiming,
}

impl Default for EthereumCleanupConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://forno.celo.org".to_string(),
            wallet_rpc_url: None,
            wallet_session_file: None,
            wallet_name: None,
            chain_id: 42220,
            network: Some("celo".to_string()),
            verification_address: None,
            impact_product_address: None,
            reward_distributor_address: None,
            private_key: None,
            metadata_cid: None,
            confirmation_blocks: 1,
            receipt_timeout_secs: 120,
            wrong_chain_notices: default_wrong_chain_notices(),
            switch_timing: SwitchTiming::default(),
        }
    }
}

/// Mainnet Ethereum and the retired Alfajores testnet
pub fn default_wrong_chain_notices() -> Vec<WrongChainNotice> {
    vec![
        WrongChainNotice {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            hint: None,
        },
        WrongChainNotice {
            chain_id: 44787,
            name: "Celo Alfajores Testnet".to_string(),
            hint: Some("Alfajores is retired, use the current network instead.".to_string()),
        },
    ]
}

/// `0x` followed by exactly `digits` hex characters
fn validate_hex(field: &str, value: &str, digits: usize) -> Result<(), String> {
    let hex = value
        .strip_prefix("0x")
        .ok_or_else(|| format!("{} must be 0x-prefixed", field))?;
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!(
            "{} must hold {} hex digits after 0x, got '{}'",
            field, digits, hex
        ));
    }
    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }

    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{} must start with http:// or https://", field));
    }

    Ok(())
}

impl EthereumCleanupConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, anyhow::Error> {
        let config: Self = toml::from_str(toml)?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Contract addresses are optional; operations on an unset contract fail
    /// with a "not configured" error at call time.
    pub fn validate(&self) -> Result<(), String> {
        validate_http_url("rpc_url", &self.rpc_url)?;

        if let Some(ref url) = self.wallet_rpc_url {
            validate_http_url("wallet_rpc_url", url)?;
        }

        if self.chain_id == 0 {
            return Err("chain_id must be > 0".to_string());
        }

        if let Some(ref name) = self.network {
            let network = networks::get_network(name)
                .ok_or_else(|| format!("unknown network '{}'", name))?;
            if network.chain_id != self.chain_id {
                return Err(format!(
                    "network '{}' has chain id {}, but chain_id is {}",
                    name, network.chain_id, self.chain_id
                ));
            }
        }

        for (field, value) in [
            ("verification_address", &self.verification_address),
            ("impact_product_address", &self.impact_product_address),
            ("reward_distributor_address", &self.reward_distributor_address),
        ] {
            if let Some(address) = value {
                validate_hex(field, address, 40)?;
            }
        }

        match self.private_key.as_deref() {
            Some(pk) if !pk.is_empty() => validate_hex("private_key", pk, 64)?,
            _ => {}
        }

        if !(1..=100).contains(&self.confirmation_blocks) {
            return Err(format!(
                "confirmation_blocks must be between 1 and 100, got {}",
                self.confirmation_blocks
            ));
        }

        if self.receipt_timeout_secs == 0 {
            return Err("receipt_timeout_secs must be > 0".to_string());
        }

        if self
            .wrong_chain_notices
            .iter()
            .any(|notice| notice.chain_id == self.chain_id)
        {
            return Err("wrong_chain_notices must not contain the required chain_id".to_string());
        }

        self.switch_timing.validate()?;

        Ok(())
    }

    /// Check if configuration supports write operations (has private key)
    pub fn can_write(&self) -> bool {
        self.private_key.as_deref().is_some_and(|pk| !pk.is_empty())
    }

    /// Definition of the required network, used when asking a wallet to add it
    pub fn required_network(&self) -> NetworkDefinition {
        self.network
            .as_deref()
            .and_then(networks::get_network)
            .or_else(|| networks::get_network_by_chain_id(self.chain_id))
            .cloned()
            .unwrap_or_else(|| NetworkDefinition {
                name: format!("Chain {}", self.chain_id),
                chain_id: self.chain_id,
                rpc_endpoints: vec![self.rpc_url.clone()],
                explorer: None,
                native_currency: NativeCurrency {
                    name: "Ether".to_string(),
                    symbol: "ETH".to_string(),
                    decimals: 18,
                },
                testnet: false,
            })
    }

    /// Notice for a chain id known to be a common mistake
    pub fn wrong_chain_notice(&self, chain_id: u64) -> Option<&WrongChainNotice> {
        self.wrong_chain_notices
            .iter()
            .find(|notice| notice.chain_id == chain_id)
    }
}
