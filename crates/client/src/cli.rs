pub mod read;
pub mod write;

use crate::config::ClientConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "decleanup")]
#[command(about = "DeCleanup rewards client", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = "DECLEANUP_CONFIG", default_value = "decleanup.toml")]
    pub config: PathBuf,

    /// Override the RPC URL from the configuration file
    #[arg(long, global = true, env = "DECLEANUP_RPC_URL")]
    pub rpc_url: Option<String>,

    /// JSON-RPC endpoint of the wallet used for network add/switch requests
    #[arg(long, global = true, env = "DECLEANUP_WALLET_RPC_URL")]
    pub wallet_rpc_url: Option<String>,

    /// Private key for signing transactions
    #[arg(long, global = true, env = "DECLEANUP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the configuration file, falling back to defaults when it is
    /// missing, and apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = if self.config.exists() {
            ClientConfig::from_file(&self.config)?
        } else {
            warn!(
                "Configuration file {} not found, using defaults",
                self.config.display()
            );
            ClientConfig::default()
        };

        if let Some(ref rpc_url) = self.rpc_url {
            config.ethereum.rpc_url = rpc_url.clone();
        }
        if let Some(ref wallet_rpc_url) = self.wallet_rpc_url {
            config.ethereum.wallet_rpc_url = Some(wallet_rpc_url.clone());
        }
        if let Some(ref private_key) = self.private_key {
            config.ethereum.private_key = Some(private_key.clone());
        }

        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the cleanup status of an address (pending, claimable, rejected)
    Status {
        /// Account address
        address: String,
    },

    /// Resolve the latest submission of an address
    Latest {
        /// Account address
        address: String,
    },

    /// Check whether the Impact Product level can be claimed
    Eligibility {
        /// Account address
        address: String,

        /// Check this submission instead of the latest one
        #[arg(long)]
        cleanup_id: Option<u64>,
    },

    /// Fetch and display a submission by id
    Submission {
        /// The submission id
        id: u64,
    },

    /// Display the current submission fee
    Fee,

    /// Display the Impact Product level of an address
    Level {
        /// Account address
        address: String,
    },

    /// Display the cDCU balance and claimable rewards of an address
    Balance {
        /// Account address
        address: String,
    },

    /// Check hypercert eligibility and prepare hypercert metadata
    Hypercert {
        /// Account address
        address: String,

        /// Hypercert number to prepare (defaults to the latest milestone reached)
        #[arg(long)]
        number: Option<u64>,
    },

    /// Submit a cleanup
    Submit {
        /// IPFS hash of the before photo
        #[arg(long)]
        before_photo: String,

        /// IPFS hash of the after photo
        #[arg(long)]
        after_photo: String,

        /// URI of the submission data
        #[arg(long, default_value = "")]
        data_uri: String,

        /// IPFS hash of the impact report
        #[arg(long)]
        impact_report: Option<String>,

        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// Referrer address
        #[arg(long)]
        referrer: Option<String>,
    },

    /// Approve a submission (verifier only)
    Approve {
        /// The submission id
        id: u64,
    },

    /// Reject a submission (verifier only)
    Reject {
        /// The submission id
        id: u64,
    },

    /// Claim accumulated cleanup rewards
    Claim,

    /// Attach recyclables evidence to a submission
    AttachRecyclables {
        /// The submission id
        id: u64,

        /// IPFS hash of the recyclables photo
        #[arg(long)]
        photo: String,

        /// IPFS hash of the recycling receipt
        #[arg(long)]
        receipt: Option<String>,
    },

    /// Claim the reward for a minted hypercert
    ClaimHypercertReward {
        /// Hypercert number (1, 2, 3...)
        number: u64,
    },

    /// Make sure the wallet is on the required network, adding or switching it if needed
    EnsureChain,

    /// Forget the wallet connection and remove the persisted connector session
    Disconnect,
}
