//! Client configuration

use decleanup_contracts_ethereum::EthereumCleanupConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reverse-scan settings of the status resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How many ids below the counter are scanned
    pub scan_window: u64,
    /// First id the contract ever assigns
    pub lowest_submission_id: u64,
    /// Impact Product level a verified submission unlocks
    pub submission_level: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            scan_window: 50,
            lowest_submission_id: 1,
            submission_level: 1,
        }
    }
}

/// IPFS gateways used to read impact reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsConfig {
    /// Gateway prefixes, tried in order; each ends with `/ipfs/`
    pub gateways: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            gateways: vec![
                "https://gateway.pinata.cloud/ipfs/".to_string(),
                "https://ipfs.io/ipfs/".to_string(),
                "https://cloudflare-ipfs.com/ipfs/".to_string(),
                "https://dweb.link/ipfs/".to_string(),
            ],
            timeout_secs: 15,
        }
    }
}

/// Where the pointer cache lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON store file; the cache is kept in memory when unset
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(".decleanup/store.json")),
        }
    }
}

/// Top-level configuration file (`decleanup.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub ethereum: EthereumCleanupConfig,
    pub resolver: ResolverConfig,
    pub ipfs: IpfsConfig,
    pub cache: CacheConfig,
}

impl ClientConfig {
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
    pub fn validate(&self) -> Result<(), String> {
        self.ethereum.validate()?;

        if self.resolver.scan_window == 0 {
            return Err("resolver.scan_window must be > 0".to_string());
        }

        if self.resolver.scan_window > 1000 {
            return Err("resolver.scan_window too large (max 1000)".to_string());
        }

        if self.resolver.submission_level == 0 {
            return Err("resolver.submission_level must be > 0".to_string());
        }

        if self.ipfs.gateways.is_empty() {
            return Err("ipfs.gateways cannot be empty".to_string());
        }

        for gateway in &self.ipfs.gateways {
            if !gateway.starts_with("http://") && !gateway.starts_with("https://") {
                return Err(format!("ipfs gateway '{}' must be an http(s) URL", gateway));
            }
        }

        if self.ipfs.timeout_secs == 0 {
            return Err("ipfs.timeout_secs must be > 0".to_string());
        }

        Ok(())
    }
}
