//! Wallet session tracking
//!
//! Holds the connected account and the last chain id the wallet reported.
//! Resolver results computed for one address are checked with
//! [`WalletSession::is_current`] before they are shown, since the user may
//! have switched accounts while the scan was running.

use alloy_primitives::Address;
use decleanup_contracts_ethereum::ChainGuard;
use decleanup_contracts_trait::{CleanupError, CleanupResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected {
        address: Address,
        /// Last chain id the wallet reported, if known
        chain_id: Option<u64>,
    },
}

pub struct WalletSession {
    state: RwLock<SessionState>,
    guard: Arc<ChainGuard>,
}

impl WalletSession {
    pub fn new(guard: Arc<ChainGuard>) -> Self {
        Self {
            state: RwLock::new(SessionState::Disconnected),
            guard,
        }
    }

    pub fn guard(&self) -> &ChainGuard {
        &self.guard
    }

    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Connect an account, reading the wallet's current chain
    pub async fn connect(&self, address: Address) -> SessionState {
        let chain_id = match self.guard.wallet().chain_id().await {
            Ok(chain_id) => Some(chain_id),
            Err(e) => {
                debug!("Wallet did not report a chain on connect: {}", e);
                None
            }
        };

        let state = SessionState::Connected { address, chain_id };
        info!("Connected {} on chain {:?}", address, chain_id);
        *self.state.write().await = state;
        state
    }

    /// Disconnect and clear the connector's persisted session
    pub async fn disconnect(&self) {
        *self.state.write().await = SessionState::Disconnected;
        if let Err(e) = self.guard.wallet().clear_session().await {
            warn!("Failed to clear wallet session on disconnect: {}", e);
        }
        info!("Wallet disconnected");
    }

    /// The wallet reported a chain change
    pub async fn on_chain_changed(&self, chain_id: u64) {
        let mut state = self.state.write().await;
        if let SessionState::Connected { address, .. } = *state {
            debug!("Chain changed to {} for {}", chain_id, address);
            *state = SessionState::Connected {
                address,
                chain_id: Some(chain_id),
            };
        }
    }

    /// The wallet reported a new account list; an empty list disconnects
    pub async fn on_account_changed(&self, address: Option<Address>) {
        let mut state = self.state.write().await;
        *state = match (address, *state) {
            (None, _) => SessionState::Disconnected,
            (Some(address), SessionState::Connected { chain_id, .. }) => {
                SessionState::Connected { address, chain_id }
            }
            (Some(address), SessionState::Disconnected) => SessionState::Connected {
                address,
                chain_id: None,
            },
        };
        debug!("Account changed: {:?}", *state);
    }

    pub async fn active_address(&self) -> Option<Address> {
        match *self.state.read().await {
            SessionState::Connected { address, .. } => Some(address),
            SessionState::Disconnected => None,
        }
    }

    pub async fn chain_id(&self) -> Option<u64> {
        match *self.state.read().await {
            SessionState::Connected { chain_id, .. } => chain_id,
            SessionState::Disconnected => None,
        }
    }

    /// Whether `address` is still the active account
    pub async fn is_current(&self, address: &Address) -> bool {
        self.active_address().await.as_ref() == Some(address)
    }

    pub async fn is_on_required_chain(&self) -> bool {
        self.chain_id().await == Some(self.guard.required_chain_id())
    }

    /// Run the chain guard with the session's chain as hint
    ///
    /// On success the session records the required chain. A stale connector
    /// session disconnects.
    pub async fn ensure_required_chain(&self, context: &str) -> CleanupResult<u64> {
        let hint = self.chain_id().await;
        match self.guard.ensure_on_required_chain(context, hint).await {
            Ok(chain_id) => {
                self.on_chain_changed(chain_id).await;
                Ok(chain_id)
            }
            Err(CleanupError::StaleSession) => {
                *self.state.write().await = SessionState::Disconnected;
                Err(CleanupError::StaleSession)
            }
            Err(CleanupError::WrongChain {
                detected: Some(detected),
                required,
                message,
            }) => {
                self.on_chain_changed(detected).await;
                Err(CleanupError::wrong_chain(Some(detected), required, message))
            }
            Err(e) => Err(e),
        }
    }
}
