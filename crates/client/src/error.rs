//! Error types for the rewards client

use decleanup_contracts_trait::{CleanupError, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by the client crate
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failure reported by the contract gateway
    #[error(transparent)]
    Contracts(#[from] CleanupError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Impact report could not be fetched from any gateway
    #[error("Impact report {hash} unavailable: {message}")]
    ReportUnavailable { hash: String, message: String },

    #[error("No verified cleanups found in range {from}..={to}. Please ensure all cleanups are verified before minting.")]
    NoVerifiedCleanups { from: u64, to: u64 },

    #[error("Invalid hypercert number: {0}")]
    InvalidHypercertNumber(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Taxonomy kind of the underlying gateway error, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Contracts(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Errors the user caused by declining a prompt are not reported
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Contracts(e) if e.is_silent())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::HttpRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_passthrough() {
        let err: ClientError = CleanupError::DoesNotExist(3).into();
        assert_eq!(err.kind(), Some(ErrorKind::DoesNotExist));
        assert_eq!(err.to_string(), "Cleanup 3 does not exist");

        let err = ClientError::Config("bad".to_string());
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_user_rejection_is_silent() {
        let err: ClientError = CleanupError::UserRejected.into();
        assert!(err.is_silent());
        assert!(!ClientError::InvalidHypercertNumber(0).is_silent());
    }
}
