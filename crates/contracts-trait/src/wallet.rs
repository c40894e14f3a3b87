//! Wallet connector abstraction
//!
//! The wallet itself (browser extension, WalletConnect relay, local signer
//! daemon) is external. Adapters implement [`WalletConnector`] and translate
//! whatever their transport reports into a [`WalletErrorKind`] exactly once,
//! so the chain guard never has to inspect error strings.

use crate::types::NetworkDefinition;
use async_trait::async_trait;
use thiserror::Error;

/// JSON-RPC error code for a user rejecting a request (EIP-1193)
pub const CODE_USER_REJECTED: i64 = 4001;
/// JSON-RPC error code for an unrecognized chain (EIP-3326)
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC error code for an unsupported method
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

/// Classification of a wallet failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletErrorKind {
    /// The user declined the prompt
    UserRejected,
    /// The wallet does not know the requested chain
    ChainNotAdded,
    /// The connector session is gone (e.g. a WalletConnect topic expired)
    StaleSession,
    /// The connector cannot perform this request at all
    Unsupported,
    Other,
}

/// Error reported by a wallet connector
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct WalletError {
    pub kind: WalletErrorKind,
    pub message: String,
}

impl WalletError {
    pub fn new(kind: WalletErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build an error from a JSON-RPC error code and message
    pub fn from_rpc(code: Option<i64>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: WalletErrorKind::classify(code, &message),
            message,
        }
    }

    pub fn is_user_rejected(&self) -> bool {
        self.kind == WalletErrorKind::UserRejected
    }
}

impl WalletErrorKind {
    /// Classify a wallet failure from its JSON-RPC code and message
    pub fn classify(code: Option<i64>, message: &str) -> Self {
        match code {
            Some(CODE_USER_REJECTED) => return Self::UserRejected,
            Some(CODE_UNRECOGNIZED_CHAIN) => return Self::ChainNotAdded,
            Some(CODE_METHOD_NOT_FOUND) => return Self::Unsupported,
            _ => {}
        }

        let lower = message.to_lowercase();
        if lower.contains("session topic") || lower.contains("no matching key") {
            Self::StaleSession
        } else if lower.contains("rejected") || lower.contains("denied") {
            Self::UserRejected
        } else if lower.contains("unrecognized chain") || lower.contains("not configured") {
            Self::ChainNotAdded
        } else if lower.contains("is not a function") || lower.contains("not supported") {
            Self::Unsupported
        } else {
            Self::Other
        }
    }
}

/// Connection to the user's wallet
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Chain id the wallet is currently on
    async fn chain_id(&self) -> WalletResult<u64>;

    /// Ask the wallet to register a network. Returns `true` when the wallet
    /// accepted the request.
    async fn add_chain(&self, network: &NetworkDefinition) -> WalletResult<bool>;

    /// Ask the wallet to switch to a chain
    async fn switch_chain(&self, chain_id: u64) -> WalletResult<()>;

    /// Drop any persisted connector session so the user must reconnect
    async fn clear_session(&self) -> WalletResult<()>;

    /// Human-readable connector name used in logs and instructions
    fn connector_name(&self) -> &str;

    /// Whether the connector is a WalletConnect relay
    fn is_walletconnect(&self) -> bool {
        self.connector_name().to_lowercase().contains("walletconnect")
    }
}
