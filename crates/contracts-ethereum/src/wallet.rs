//! JSON-RPC wallet connector
//!
//! Talks to a wallet that exposes the EIP-1193 request methods over HTTP
//! (a local signer daemon, a browser bridge, or a dev node). When no wallet
//! endpoint is configured the connector is read-only: it reports the chain
//! id of the plain RPC node and refuses add/switch requests.

use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use decleanup_contracts_trait::{
    NetworkDefinition, WalletConnector, WalletError, WalletErrorKind, WalletResult,
};
use serde_json::json;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, info};

/// Wallet connector backed by a JSON-RPC endpoint
pub struct RpcWallet {
    url: String,
    name: String,
    wallet_methods: bool,
    /// File holding the persisted connector session, removed on `clear_session`
    session_file: Option<PathBuf>,
}

impl RpcWallet {
    /// Connector for a wallet endpoint that supports `wallet_*` methods
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            wallet_methods: true,
            session_file: None,
        }
    }

    /// Connector that can only read the chain id of a plain RPC node
    pub fn read_only(rpc_url: impl Into<String>) -> Self {
        Self {
            url: rpc_url.into(),
            name: "rpc".to_string(),
            wallet_methods: false,
            session_file: None,
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    fn provider(&self) -> WalletResult<impl Provider> {
        let url = self.url.parse().map_err(|e| {
            WalletError::new(WalletErrorKind::Other, format!("Invalid wallet URL: {}", e))
        })?;
        Ok(ProviderBuilder::new().connect_http(url))
    }

    fn require_wallet_methods(&self, method: &str) -> WalletResult<()> {
        if self.wallet_methods {
            Ok(())
        } else {
            Err(WalletError::new(
                WalletErrorKind::Unsupported,
                format!("{} not supported by a read-only connector", method),
            ))
        }
    }
}

/// Translate a transport error into a classified wallet error
pub fn wallet_error_from_rpc(err: RpcError<TransportErrorKind>) -> WalletError {
    match err {
        RpcError::ErrorResp(payload) => {
            WalletError::from_rpc(Some(payload.code), payload.message.to_string())
        }
        other => WalletError::from_rpc(None, other.to_string()),
    }
}

#[async_trait]
impl WalletConnector for RpcWallet {
    async fn chain_id(&self) -> WalletResult<u64> {
        let provider = self.provider()?;
        provider.get_chain_id().await.map_err(wallet_error_from_rpc)
    }

    async fn add_chain(&self, network: &NetworkDefinition) -> WalletResult<bool> {
        self.require_wallet_methods("wallet_addEthereumChain")?;
        debug!("Requesting wallet_addEthereumChain for {}", network.chain_id_hex());

        let provider = self.provider()?;
        let _: serde_json::Value = provider
            .raw_request(
                Cow::Borrowed("wallet_addEthereumChain"),
                [network.to_add_chain_params()],
            )
            .await
            .map_err(wallet_error_from_rpc)?;

        info!("Wallet accepted network {}", network.name);
        Ok(true)
    }

    async fn switch_chain(&self, chain_id: u64) -> WalletResult<()> {
        self.require_wallet_methods("wallet_switchEthereumChain")?;
        debug!("Requesting wallet_switchEthereumChain to {}", chain_id);

        let provider = self.provider()?;
        let _: serde_json::Value = provider
            .raw_request(
                Cow::Borrowed("wallet_switchEthereumChain"),
                [json!({ "chainId": format!("0x{:x}", chain_id) })],
            )
            .await
            .map_err(wallet_error_from_rpc)?;
        Ok(())
    }

    async fn clear_session(&self) -> WalletResult<()> {
        let Some(ref path) = self.session_file else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                info!("Removed wallet session file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WalletError::new(WalletErrorKind::Other, e.to_string())),
        }
    }

    fn connector_name(&self) -> &str {
        &self.name
    }
}
