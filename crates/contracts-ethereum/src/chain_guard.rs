//! Chain guard: make sure the wallet is on the required chain before a write
//!
//! The procedure tolerates wallets that cannot report their chain id, wallets
//! that do not know the required network yet, and expired connector sessions.
//! Every delay comes from [`SwitchTiming`] so tests can drive it with a paused
//! tokio clock.

use crate::config::{EthereumCleanupConfig, WrongChainNotice};
use decleanup_contracts_trait::{
    CleanupError, CleanupResult, NetworkDefinition, WalletConnector, WalletError, WalletErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Delays and retry counts used while adding/switching networks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchTiming {
    /// Wait after adding the network when the chain id could not be read
    pub unknown_chain_settle_ms: u64,
    /// Wait after the pre-switch add before re-checking
    pub add_settle_ms: u64,
    /// Number of polls after a switch request
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    /// Add+switch retries after the wallet reports an unknown chain
    pub retry_add_attempts: u32,
    /// Settle time after a retry add is `retry_base_ms + attempt * retry_step_ms`
    pub retry_base_ms: u64,
    pub retry_step_ms: u64,
    /// Wait after a retry switch before re-checking
    pub post_switch_settle_ms: u64,
}

impl Default for SwitchTiming {
    fn default() -> Self {
        Self {
            unknown_chain_settle_ms: 1000,
            add_settle_ms: 1500,
            poll_attempts: 5,
            poll_interval_ms: 1000,
            retry_add_attempts: 2,
            retry_base_ms: 2000,
            retry_step_ms: 1000,
            post_switch_settle_ms: 1500,
        }
    }
}

impl SwitchTiming {
    const MAX_DELAY_MS: u64 = 60_000;

    pub fn validate(&self) -> Result<(), String> {
        if self.poll_attempts == 0 {
            return Err("switch_timing.poll_attempts must be > 0".to_string());
        }

        if self.poll_attempts > 60 || self.retry_add_attempts > 10 {
            return Err("switch_timing retry counts too large".to_string());
        }

        for (field, value) in [
            ("unknown_chain_settle_ms", self.unknown_chain_settle_ms),
            ("add_settle_ms", self.add_settle_ms),
            ("poll_interval_ms", self.poll_interval_ms),
            ("retry_base_ms", self.retry_base_ms),
            ("retry_step_ms", self.retry_step_ms),
            ("post_switch_settle_ms", self.post_switch_settle_ms),
        ] {
            if value > Self::MAX_DELAY_MS {
                return Err(format!(
                    "switch_timing.{} too large (max {} ms)",
                    field,
                    Self::MAX_DELAY_MS
                ));
            }
        }

        Ok(())
    }

    fn retry_settle(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_base_ms + u64::from(attempt) * self.retry_step_ms)
    }
}

/// Guards write operations against being sent on the wrong chain
pub struct ChainGuard {
    wallet: Arc<dyn WalletConnector>,
    required: NetworkDefinition,
    notices: Vec<WrongChainNotice>,
    timing: SwitchTiming,
}

impl ChainGuard {
    pub fn new(
        wallet: Arc<dyn WalletConnector>,
        required: NetworkDefinition,
        notices: Vec<WrongChainNotice>,
        timing: SwitchTiming,
    ) -> Self {
        Self {
            wallet,
            required,
            notices,
            timing,
        }
    }

    /// Build a guard for the network described by the gateway configuration
    pub fn from_config(wallet: Arc<dyn WalletConnector>, config: &EthereumCleanupConfig) -> Self {
        Self::new(
            wallet,
            config.required_network(),
            config.wrong_chain_notices.clone(),
            config.switch_timing.clone(),
        )
    }

    pub fn required_chain_id(&self) -> u64 {
        self.required.chain_id
    }

    pub fn required_network(&self) -> &NetworkDefinition {
        &self.required
    }

    pub fn wallet(&self) -> &Arc<dyn WalletConnector> {
        &self.wallet
    }

    /// Ensure the wallet is on the required chain
    ///
    /// `hint` is a chain id the caller already observed. When it equals the
    /// required chain the wallet is not contacted at all. Returns the chain id
    /// the write will go to; when the wallet cannot report its chain this is
    /// the required id and the wallet is left to validate the transaction.
    pub async fn ensure_on_required_chain(
        &self,
        context: &str,
        hint: Option<u64>,
    ) -> CleanupResult<u64> {
        let required = self.required.chain_id;

        if hint == Some(required) {
            debug!("[{}] Already on chain {} (caller supplied)", context, required);
            return Ok(required);
        }

        let current = self.current_chain_id(context).await;
        debug!(
            "[{}] Current chain id: {:?}, required: {}",
            context, current, required
        );

        let Some(current) = current else {
            return Ok(self.proceed_on_unknown_chain(context).await);
        };

        if current == required {
            debug!("[{}] Already on chain {}", context, required);
            return Ok(required);
        }

        if let Some(notice) = self.notices.iter().find(|n| n.chain_id == current) {
            warn!("[{}] Wallet is on known wrong chain {}", context, current);
            return Err(CleanupError::wrong_chain(
                Some(current),
                required,
                self.wrong_chain_message(notice),
            ));
        }

        info!(
            "[{}] Wrong chain ({}), attempting to switch to {} ({})",
            context, current, self.required.name, required
        );

        if self.try_add_chain(context).await {
            tokio::time::sleep(Duration::from_millis(self.timing.add_settle_ms)).await;
            if self.current_chain_id(context).await == Some(required) {
                info!("[{}] Chain added and switched automatically", context);
                return Ok(required);
            }
        }

        match self.switch_and_poll(context).await {
            Ok(true) => Ok(required),
            Ok(false) => Err(CleanupError::wrong_chain(
                Some(current),
                required,
                format!(
                    "Failed to switch network. Please manually switch to {} in your wallet.",
                    self.required.name
                ),
            )),
            Err(err) => self.recover_from_switch_error(context, current, err).await,
        }
    }

    /// Clear the connector session and report it as stale
    pub async fn handle_stale_session(&self, context: &str) -> CleanupError {
        warn!(
            "[{}] {} session is stale, clearing it",
            context,
            self.wallet.connector_name()
        );
        if let Err(e) = self.wallet.clear_session().await {
            warn!("[{}] Failed to clear wallet session: {}", context, e);
        }
        CleanupError::StaleSession
    }

    async fn current_chain_id(&self, context: &str) -> Option<u64> {
        match self.wallet.chain_id().await {
            Ok(chain_id) => Some(chain_id),
            Err(e) => {
                debug!("[{}] Could not read wallet chain id: {}", context, e);
                None
            }
        }
    }

    async fn try_add_chain(&self, context: &str) -> bool {
        match self.wallet.add_chain(&self.required).await {
            Ok(added) => added,
            Err(e) => {
                warn!("[{}] Add chain attempt failed (may not be needed): {}", context, e);
                false
            }
        }
    }

    async fn proceed_on_unknown_chain(&self, context: &str) -> u64 {
        info!("[{}] Chain id unknown, attempting to add the required chain", context);
        if self.try_add_chain(context).await {
            tokio::time::sleep(Duration::from_millis(self.timing.unknown_chain_settle_ms)).await;
            if self.current_chain_id(context).await == Some(self.required.chain_id) {
                info!("[{}] Chain added and switched successfully", context);
                return self.required.chain_id;
            }
        }
        warn!(
            "[{}] Could not determine chain id, proceeding; the wallet will validate the transaction",
            context
        );
        self.required.chain_id
    }

    /// Request a switch, then poll. `Ok(false)` means the wallet accepted the
    /// request but never reported the required chain.
    async fn switch_and_poll(&self, context: &str) -> Result<bool, WalletError> {
        let required = self.required.chain_id;
        self.wallet.switch_chain(required).await?;

        for _ in 0..self.timing.poll_attempts {
            tokio::time::sleep(Duration::from_millis(self.timing.poll_interval_ms)).await;
            if self.current_chain_id(context).await == Some(required) {
                info!("[{}] Switched to {}", context, self.required.name);
                return Ok(true);
            }
        }

        let confirmed = self.current_chain_id(context).await == Some(required);
        if confirmed {
            info!("[{}] Chain switch confirmed", context);
        }
        Ok(confirmed)
    }

    async fn recover_from_switch_error(
        &self,
        context: &str,
        current: u64,
        err: WalletError,
    ) -> CleanupResult<u64> {
        error!("[{}] Switch failed: {}", context, err);
        let required = self.required.chain_id;

        match err.kind {
            WalletErrorKind::StaleSession => Err(self.handle_stale_session(context).await),
            WalletErrorKind::UserRejected => Err(CleanupError::UserRejected),
            WalletErrorKind::ChainNotAdded => {
                info!("[{}] Chain missing, adding it after switch failure", context);
                for attempt in 0..self.timing.retry_add_attempts {
                    if !self.try_add_chain(context).await {
                        warn!("[{}] Add chain attempt {} failed", context, attempt + 1);
                        continue;
                    }
                    tokio::time::sleep(self.timing.retry_settle(attempt)).await;

                    match self.wallet.switch_chain(required).await {
                        Ok(()) => {
                            tokio::time::sleep(Duration::from_millis(
                                self.timing.post_switch_settle_ms,
                            ))
                            .await;
                            if self.current_chain_id(context).await == Some(required) {
                                info!("[{}] Chain added and switched successfully", context);
                                return Ok(required);
                            }
                        }
                        Err(retry) if retry.kind == WalletErrorKind::UserRejected => {
                            return Err(CleanupError::UserRejected);
                        }
                        Err(retry) if retry.kind == WalletErrorKind::StaleSession => {
                            return Err(self.handle_stale_session(context).await);
                        }
                        Err(retry) => {
                            warn!(
                                "[{}] Retry switch after add failed (attempt {}): {}",
                                context,
                                attempt + 1,
                                retry
                            );
                        }
                    }
                }
                Err(CleanupError::wrong_chain(
                    Some(current),
                    required,
                    self.chain_not_added_message(),
                ))
            }
            WalletErrorKind::Unsupported | WalletErrorKind::Other => {
                Err(CleanupError::wrong_chain(
                    Some(current),
                    required,
                    format!(
                        "Please switch to {} (Chain ID: {}) to continue.",
                        self.required.name, required
                    ),
                ))
            }
        }
    }

    fn wrong_chain_message(&self, notice: &WrongChainNotice) -> String {
        let mut message = format!(
            "{} detected (Chain ID: {}). This app requires {} (Chain ID: {}).",
            notice.name, notice.chain_id, self.required.name, self.required.chain_id
        );
        if let Some(ref hint) = notice.hint {
            message.push(' ');
            message.push_str(hint);
        }
        message.push_str(&format!(
            "\n\nPlease switch to {} in your wallet and try again.",
            self.required.name
        ));
        message
    }

    fn chain_not_added_message(&self) -> String {
        let instructions = if self.wallet.is_walletconnect() {
            format!(
                "\n\nFor WalletConnect users:\n\
                 1. Open your wallet app\n\
                 2. Go to Settings > Networks > Add Network\n\
                 3. Add {} with the details below\n\
                 4. Return to this app and try again",
                self.required.name
            )
        } else {
            "\n\nPlease add the network in your wallet and try again.".to_string()
        };

        format!(
            "{} (Chain ID: {}) is not configured in your wallet.{}\n\n{}",
            self.required.name,
            self.required.chain_id,
            instructions,
            self.required.setup_message()
        )
    }
}
