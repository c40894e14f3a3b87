//! Failures raised inside the Ethereum gateway before they are mapped onto
//! [`CleanupError`]

use decleanup_contracts_trait::CleanupError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EthereumCleanupError>;

#[derive(Debug, Error)]
pub enum EthereumCleanupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Address of the named contract is missing from the configuration
    #[error("{0} contract address not set")]
    ContractNotConfigured(&'static str),

    /// Read call or transport failure
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// The node rejected the call with a revert reason
    #[error("Contract call reverted: {0}")]
    Reverted(String),

    /// Mined with status 0
    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: String },

    /// Contract returned a value outside the domain type
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("No private key configured; write commands need ethereum.private_key")]
    NoPrivateKey,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl EthereumCleanupError {
    /// Transport level failures that may succeed on a later attempt
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::ContractCall(_) | Self::ProviderError(_))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::ContractNotConfigured(_)
                | Self::NoPrivateKey
                | Self::InvalidPrivateKey(_)
        )
    }
}

impl From<EthereumCleanupError> for CleanupError {
    fn from(err: EthereumCleanupError) -> Self {
        match err {
            EthereumCleanupError::ContractNotConfigured(contract) => {
                CleanupError::not_configured(contract)
            }
            EthereumCleanupError::TransactionReverted { tx_hash } => {
                CleanupError::transaction("transaction reverted", Some(tx_hash))
            }
            EthereumCleanupError::Reverted(reason) => CleanupError::transaction(reason, None),
            e if e.is_configuration_error() => CleanupError::NotConfigured {
                contract: e.to_string(),
            },
            e if e.is_retriable() => CleanupError::network(e),
            e => CleanupError::Other(anyhow::Error::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decleanup_contracts_trait::ErrorKind;

    #[test]
    fn test_retriable_and_configuration_kinds() {
        assert!(EthereumCleanupError::ContractCall("timeout".to_string()).is_retriable());
        assert!(EthereumCleanupError::ProviderError("refused".to_string()).is_retriable());
        assert!(!EthereumCleanupError::Reverted("boom".to_string()).is_retriable());

        assert!(EthereumCleanupError::NoPrivateKey.is_configuration_error());
        assert!(EthereumCleanupError::ContractNotConfigured("Verification").is_configuration_error());
        assert!(!EthereumCleanupError::Conversion("status 9".to_string()).is_configuration_error());
    }

    #[test]
    fn test_conversion_into_cleanup_error() {
        let err: CleanupError = EthereumCleanupError::ContractNotConfigured("Verification").into();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
        assert_eq!(err.to_string(), "Verification contract address not set");

        let err: CleanupError = EthereumCleanupError::ContractCall("503".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::TransientNetwork);

        let err: CleanupError = EthereumCleanupError::TransactionReverted {
            tx_hash: "0xabc".to_string(),
        }
        .into();
        match err {
            CleanupError::Transaction { tx_hash, .. } => assert_eq!(tx_hash.as_deref(), Some("0xabc")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err: CleanupError = EthereumCleanupError::NoPrivateKey.into();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
    }
}
