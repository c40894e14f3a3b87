//! Wiring of the gateway, cache, resolver, and wallet session

use crate::cache::PointerCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::hypercert::IpfsGateways;
use crate::resolver::StatusResolver;
use crate::session::WalletSession;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use decleanup_contracts_ethereum::EthereumCleanupContracts;
use decleanup_contracts_trait::{CleanupContracts, CleanupError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct App {
    pub config: ClientConfig,
    pub contracts: Arc<EthereumCleanupContracts>,
    pub resolver: StatusResolver,
    pub session: WalletSession,
    pub reports: IpfsGateways,
}

impl App {
    pub async fn new(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(ClientError::Config)?;

        let contracts = Arc::new(
            EthereumCleanupContracts::new(config.ethereum.clone()).map_err(CleanupError::from)?,
        );

        let store: Arc<dyn KeyValueStore> = match config.cache.path {
            Some(ref path) => {
                debug!("Using pointer cache at {}", path.display());
                Arc::new(FileStore::open(path).await?)
            }
            None => Arc::new(MemoryStore::new()),
        };

        let resolver = StatusResolver::new(
            contracts.clone() as Arc<dyn CleanupContracts>,
            PointerCache::new(store),
            config.resolver.clone(),
        );
        let session = WalletSession::new(contracts.chain_guard().clone());
        let reports = IpfsGateways::new(&config.ipfs)?;

        info!(
            "DeCleanup client ready on chain {} ({})",
            config.ethereum.chain_id,
            contracts.chain_guard().required_network().name
        );

        Ok(Self {
            config,
            contracts,
            resolver,
            session,
            reports,
        })
    }

    /// Connect the session with the configured signer
    pub async fn connect_signer(&self) -> Result<()> {
        let address = self
            .contracts
            .contract_client()
            .signer_address()
            .ok_or_else(|| {
                ClientError::Config("write commands require ethereum.private_key".to_string())
            })?;
        self.session.connect(address).await;
        Ok(())
    }
}
