//! Error types for cleanup contract operations

use std::fmt;
use thiserror::Error;

/// Result type for cleanup contract operations
pub type CleanupResult<T> = Result<T, CleanupError>;

/// Coarse classification of a [`CleanupError`], used by callers to decide
/// whether to retry, re-prompt, stay silent, or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required contract address or setting is missing. Not retryable.
    NotConfigured,
    /// The wallet is on the wrong network. Recoverable through add/switch.
    WrongChain,
    /// The wallet connector session is no longer valid. The user must reconnect.
    StaleSession,
    /// The user declined a wallet prompt. Nothing should be surfaced.
    UserRejected,
    /// A transient RPC or HTTP failure.
    TransientNetwork,
    /// The requested submission does not exist.
    DoesNotExist,
    /// Anything else (reverted transaction, bad input, storage failure).
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "NotConfigured"),
            Self::WrongChain => write!(f, "WrongChain"),
            Self::StaleSession => write!(f, "StaleSession"),
            Self::UserRejected => write!(f, "UserRejected"),
            Self::TransientNetwork => write!(f, "TransientNetwork"),
            Self::DoesNotExist => write!(f, "DoesNotExist"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for cleanup contract operations
#[derive(Error, Debug)]
pub enum CleanupError {
    /// A contract address (or other required setting) is not configured
    #[error("{contract} contract address not set")]
    NotConfigured { contract: String },

    /// The wallet is connected to a different chain than the one required
    #[error("{message}")]
    WrongChain {
        /// Chain id reported by the wallet, if it could be read
        detected: Option<u64>,
        /// Chain id the application requires
        required: u64,
        /// User-facing explanation, including setup instructions when relevant
        message: String,
    },

    /// Wallet connector session expired or was revoked
    #[error("Wallet session expired. Please reconnect your wallet and try again.")]
    StaleSession,

    /// The user rejected a wallet request
    #[error("Request rejected in wallet")]
    UserRejected,

    /// RPC or HTTP failure that may succeed on retry
    #[error("Network error: {0}")]
    TransientNetwork(String),

    /// Submission id has no on-chain record
    #[error("Cleanup {0} does not exist")]
    DoesNotExist(u64),

    /// Transaction was sent but failed or reverted
    #[error("Transaction failed: {message}")]
    Transaction {
        message: String,
        tx_hash: Option<String>,
    },

    /// Invalid input parameters
    #[error("Invalid {parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Operation not supported by this backend
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Local store read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Wrapper for other error types
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CleanupError {
    /// Create a not configured error for the named contract
    pub fn not_configured(contract: impl Into<String>) -> Self {
        Self::NotConfigured {
            contract: contract.into(),
        }
    }

    /// Create a wrong chain error
    pub fn wrong_chain(detected: Option<u64>, required: u64, message: impl Into<String>) -> Self {
        Self::WrongChain {
            detected,
            required,
            message: message.into(),
        }
    }

    /// Create a transient network error
    pub fn network(message: impl fmt::Display) -> Self {
        Self::TransientNetwork(message.to_string())
    }

    /// Create a transaction error
    pub fn transaction(message: impl Into<String>, tx_hash: Option<String>) -> Self {
        Self::Transaction {
            message: message.into(),
            tx_hash,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured { .. } => ErrorKind::NotConfigured,
            Self::WrongChain { .. } => ErrorKind::WrongChain,
            Self::StaleSession => ErrorKind::StaleSession,
            Self::UserRejected => ErrorKind::UserRejected,
            Self::TransientNetwork(_) => ErrorKind::TransientNetwork,
            Self::DoesNotExist(_) => ErrorKind::DoesNotExist,
            Self::Transaction { .. }
            | Self::InvalidParameter { .. }
            | Self::NotSupported(_)
            | Self::Storage(_)
            | Self::Other(_) => ErrorKind::Fatal,
        }
    }

    /// Check if the operation may succeed when retried without user action
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransientNetwork)
    }

    /// Check if this error should not be surfaced to the user
    pub fn is_silent(&self) -> bool {
        matches!(self.kind(), ErrorKind::UserRejected)
    }

    /// Check if this error means the submission is absent
    pub fn is_does_not_exist(&self) -> bool {
        matches!(self.kind(), ErrorKind::DoesNotExist)
    }
}
