//! Ethereum implementation of the `CleanupContracts` trait
//!
//! Every write runs the [`ChainGuard`] first, then sends the transaction and
//! waits for its receipt. Reads that only feed display values degrade to
//! neutral defaults instead of failing.

use async_trait::async_trait;
use decleanup_contracts_trait::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    abi::*,
    chain_guard::ChainGuard,
    config::EthereumCleanupConfig,
    contract::ContractClient,
    conversions::*,
    error::{EthereumCleanupError, Result},
    wallet::RpcWallet,
};

use alloy::network::Ethereum;
use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::providers::PendingTransactionBuilder;

/// Role name whose holders may approve or reject submissions
const VERIFIER_ROLE: &str = "ADMIN_ROLE";

/// Ethereum gateway to the verification, impact product, and reward contracts
///
/// # Example
///
/// ```ignore
/// use decleanup_contracts_ethereum::{EthereumCleanupConfig, EthereumCleanupContracts};
/// use decleanup_contracts_trait::CleanupContracts;
///
/// let config = EthereumCleanupConfig {
///     verification_address: Some("0xYourVerificationContract".to_string()),
///     ..Default::default()
/// };
///
/// let contracts = EthereumCleanupContracts::new(config)?;
/// let count = contracts.submission_count().await?;
/// ```
pub struct EthereumCleanupContracts {
    /// Contract client with connection details
    contract: Arc<ContractClient>,

    /// Guard run before every write; shared with the wallet session
    guard: Arc<ChainGuard>,
}

impl EthereumCleanupContracts {
    /// Create a gateway whose wallet connector is derived from the configuration
    ///
    /// Uses `wallet_rpc_url` when set, otherwise a read-only connector on `rpc_url`.
    /// `wallet_session_file` is removed whenever the session is cleared.
    pub fn new(config: EthereumCleanupConfig) -> Result<Self> {
        let mut wallet = match config.wallet_rpc_url {
            Some(ref url) => RpcWallet::new(
                url.clone(),
                config.wallet_name.as_deref().unwrap_or("json-rpc wallet"),
            ),
            None => RpcWallet::read_only(config.rpc_url.clone()),
        };
        if let Some(ref path) = config.wallet_session_file {
            wallet = wallet.with_session_file(path);
        }
        Self::with_wallet(config, Arc::new(wallet))
    }

    /// Create a gateway with an explicit wallet connector
    pub fn with_wallet(
        config: EthereumCleanupConfig,
        wallet: Arc<dyn WalletConnector>,
    ) -> Result<Self> {
        info!(
            "Initializing cleanup contracts gateway for chain {}",
            config.chain_id
        );

        config
            .validate()
            .map_err(EthereumCleanupError::Configuration)?;

        let guard = Arc::new(ChainGuard::from_config(wallet, &config));
        let contract = Arc::new(ContractClient::new(config)?);

        Ok(Self { contract, guard })
    }

    pub fn contract_client(&self) -> &ContractClient {
        &self.contract
    }

    pub fn chain_guard(&self) -> &Arc<ChainGuard> {
        &self.guard
    }

    // ===== Raw reads =====

    async fn read_submission_count(&self) -> Result<u64> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        let count = contract
            .submissionCount()
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(u256_to_u64(count))
    }

    async fn read_submission(&self, id: u64) -> Result<Option<Submission>> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        let details = contract
            .getSubmissionDetails(U256::from(id))
            .call()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.to_lowercase().contains("revert") {
                    EthereumCleanupError::Reverted(message)
                } else {
                    EthereumCleanupError::ContractCall(message)
                }
            })?;

        convert_submission(details)
    }

    async fn read_fee(&self) -> Result<FeeInfo> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        let fee = contract
            .submissionFee()
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;
        let enabled = contract
            .feeEnabled()
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(FeeInfo { fee, enabled })
    }

    async fn read_claimable(&self, user: Address) -> Result<U256> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        contract
            .getClaimableRewards(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))
    }

    async fn read_has_verifier_role(&self, account: Address) -> Result<bool> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        contract
            .hasRole(verifier_role(), account)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))
    }

    async fn read_hypercert_eligibility(&self, user: Address) -> Result<HypercertEligibility> {
        let provider = self.contract.create_provider()?;
        let contract =
            SubmissionContract::new(self.contract.verification_address()?, &provider);

        let result = contract
            .getHypercertEligibility(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(HypercertEligibility {
            cleanup_count: u256_to_u64(result.cleanupCount),
            hypercert_count: u256_to_u64(result.hypercertCount),
            is_eligible: result.isEligible,
        })
    }

    async fn read_level_uri(&self, level: u8) -> Result<String> {
        let provider = self.contract.create_provider()?;
        let contract =
            ImpactProductNFT::new(self.contract.impact_product_address()?, &provider);

        contract
            .getTokenURIForLevel(level)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))
    }

    async fn read_dcu_balance(&self, user: Address) -> Result<DcuBalance> {
        let provider = self.contract.create_provider()?;
        let contract =
            RewardDistributor::new(self.contract.reward_distributor_address()?, &provider);

        let result = contract
            .getDCUBalance(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(DcuBalance {
            amount: units_to_f64(result.balance, 18),
            is_token_balance: result.isTokenBalance,
        })
    }

    async fn read_points_balance(&self, user: Address) -> Result<DcuBalance> {
        let provider = self.contract.create_provider()?;
        let contract =
            RewardDistributor::new(self.contract.reward_distributor_address()?, &provider);

        let points = contract
            .getPointsBalance(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(DcuBalance {
            amount: units_to_f64(points, 18),
            is_token_balance: false,
        })
    }

    // ===== Write helpers =====

    /// Translate a failed send, clearing the wallet session when it went stale
    async fn send_failure(&self, context: &str, message: String) -> CleanupError {
        match WalletErrorKind::classify(None, &message) {
            WalletErrorKind::StaleSession => self.guard.handle_stale_session(context).await,
            WalletErrorKind::UserRejected => CleanupError::UserRejected,
            _ => CleanupError::transaction(message, None),
        }
    }

    /// Wait for a receipt and fail on a reverted transaction
    async fn confirm(
        &self,
        context: &str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> CleanupResult<TxHash> {
        let tx_hash = b256_to_string(*pending.tx_hash());
        debug!("[{}] Transaction submitted: {}", context, tx_hash);

        let receipt = pending
            .with_required_confirmations(self.contract.config.confirmation_blocks)
            .with_timeout(Some(Duration::from_secs(
                self.contract.config.receipt_timeout_secs,
            )))
            .get_receipt()
            .await
            .map_err(|e| CleanupError::transaction(e.to_string(), Some(tx_hash.clone())))?;

        if !receipt.status() {
            warn!("[{}] Transaction {} reverted", context, tx_hash);
            return Err(EthereumCleanupError::TransactionReverted { tx_hash }.into());
        }

        info!("[{}] Transaction confirmed: {}", context, tx_hash);
        Ok(tx_hash)
    }
}

fn verifier_role() -> B256 {
    keccak256(VERIFIER_ROLE.as_bytes())
}

fn b256_to_string(hash: B256) -> String {
    format!("0x{:x}", hash)
}

fn is_revert(err: &EthereumCleanupError) -> bool {
    matches!(err, EthereumCleanupError::Reverted(_))
}

#[async_trait]
impl CleanupContracts for EthereumCleanupContracts {
    // ===== Verification contract - Read Operations =====

    async fn submission_count(&self) -> CleanupResult<u64> {
        debug!("Fetching submission count");
        Ok(self.read_submission_count().await?)
    }

    async fn get_submission(&self, id: u64) -> CleanupResult<Submission> {
        debug!("Fetching submission {}", id);
        match self.read_submission(id).await {
            Ok(Some(submission)) => Ok(submission),
            Ok(None) => Err(CleanupError::DoesNotExist(id)),
            Err(e) if is_revert(&e) => {
                debug!("Submission {} reverted: {}", id, e);
                Err(CleanupError::DoesNotExist(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn submission_fee(&self) -> CleanupResult<FeeInfo> {
        debug!("Fetching submission fee");
        match self.read_fee().await {
            Ok(fee) => Ok(fee),
            Err(e) => {
                warn!("Failed to read submission fee, assuming none: {}", e);
                Ok(FeeInfo::default())
            }
        }
    }

    async fn claimable_rewards(&self, user: Address) -> CleanupResult<U256> {
        debug!("Fetching claimable rewards for {}", user);
        match self.read_claimable(user).await {
            Ok(amount) => Ok(amount),
            Err(e) if e.is_configuration_error() => Err(e.into()),
            Err(e) => {
                warn!("Failed to read claimable rewards: {}", e);
                Ok(U256::ZERO)
            }
        }
    }

    async fn is_verifier(&self, account: Address) -> CleanupResult<bool> {
        debug!("Checking verifier role for {}", account);
        match self.read_has_verifier_role(account).await {
            Ok(has_role) => Ok(has_role),
            Err(e) => {
                warn!("Failed to check verifier role: {}", e);
                Ok(false)
            }
        }
    }

    async fn hypercert_eligibility(&self, user: Address) -> CleanupResult<HypercertEligibility> {
        debug!("Fetching hypercert eligibility for {}", user);
        match self.read_hypercert_eligibility(user).await {
            Ok(eligibility) => Ok(eligibility),
            Err(e) => {
                warn!("Failed to read hypercert eligibility: {}", e);
                Ok(HypercertEligibility::default())
            }
        }
    }

    // ===== Verification contract - Write Operations =====

    async fn create_submission(
        &self,
        submission: &NewSubmission,
        chain_hint: Option<u64>,
    ) -> CleanupResult<Option<u64>> {
        const CONTEXT: &str = "createSubmission";
        debug!("Creating submission {:?}", submission);

        if submission.before_photo_hash.is_empty() || submission.after_photo_hash.is_empty() {
            return Err(CleanupError::invalid_parameter(
                "photo hash",
                "before and after photo hashes are required",
            ));
        }

        let verification = self.contract.verification_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = SubmissionContract::new(verification, &provider);

        let (latitude, longitude) = submission.scaled_coordinates();
        let call = contract
            .createSubmission(
                submission.data_uri.clone(),
                submission.before_photo_hash.clone(),
                submission.after_photo_hash.clone(),
                submission.impact_report_hash.clone().unwrap_or_default(),
                i64_to_i256(latitude),
                i64_to_i256(longitude),
                submission.referrer_or_zero(),
            )
            .value(submission.fee);

        let simulated_id = match call.call().await {
            Ok(id) => {
                debug!("Simulated submission id: {}", id);
                Some(u256_to_u64(id))
            }
            Err(e) => {
                warn!("Could not simulate createSubmission, will use counter: {}", e);
                None
            }
        };

        let pending = match call.send().await {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await?;

        if simulated_id.is_some() {
            return Ok(simulated_id);
        }

        match self.read_submission_count().await {
            Ok(count) => Ok(count.checked_sub(1)),
            Err(e) => {
                warn!("Submission confirmed but its id is unknown: {}", e);
                Ok(None)
            }
        }
    }

    async fn approve_submission(&self, id: u64, chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        const CONTEXT: &str = "approveSubmission";
        debug!("Approving submission {}", id);

        let verification = self.contract.verification_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = SubmissionContract::new(verification, &provider);

        let pending = match contract.approveSubmission(U256::from(id)).send().await {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await
    }

    async fn reject_submission(&self, id: u64, chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        const CONTEXT: &str = "rejectSubmission";
        debug!("Rejecting submission {}", id);

        let verification = self.contract.verification_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = SubmissionContract::new(verification, &provider);

        let pending = match contract.rejectSubmission(U256::from(id)).send().await {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await
    }

    async fn claim_rewards(&self, chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        const CONTEXT: &str = "claimRewards";
        debug!("Claiming rewards");

        let verification = self.contract.verification_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = SubmissionContract::new(verification, &provider);

        let pending = match contract.claimRewards().send().await {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await
    }

    async fn attach_recyclables(
        &self,
        id: u64,
        photo_hash: &str,
        receipt_hash: Option<&str>,
        chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash> {
        const CONTEXT: &str = "attachRecyclables";
        debug!("Attaching recyclables to submission {}", id);

        if photo_hash.is_empty() {
            return Err(CleanupError::invalid_parameter(
                "photo hash",
                "recyclables photo hash is required",
            ));
        }

        let verification = self.contract.verification_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = SubmissionContract::new(verification, &provider);

        let pending = match contract
            .attachRecyclables(
                U256::from(id),
                photo_hash.to_string(),
                receipt_hash.unwrap_or_default().to_string(),
            )
            .send()
            .await
        {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await
    }

    // ===== Impact Product NFT =====

    async fn user_level(&self, user: Address) -> CleanupResult<u8> {
        debug!("Fetching impact product level for {}", user);
        let provider = self.contract.create_provider()?;
        let contract =
            ImpactProductNFT::new(self.contract.impact_product_address()?, &provider);

        let level = contract
            .userCurrentLevel(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(level)
    }

    async fn user_token_id(&self, user: Address) -> CleanupResult<u64> {
        debug!("Fetching impact product token id for {}", user);
        let provider = self.contract.create_provider()?;
        let contract =
            ImpactProductNFT::new(self.contract.impact_product_address()?, &provider);

        let token_id = contract
            .getUserTokenId(user)
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(u256_to_u64(token_id))
    }

    async fn token_uri(&self, token_id: u64) -> CleanupResult<String> {
        debug!("Fetching token URI for {}", token_id);
        let provider = self.contract.create_provider()?;
        let contract =
            ImpactProductNFT::new(self.contract.impact_product_address()?, &provider);

        let uri = contract
            .tokenURI(U256::from(token_id))
            .call()
            .await
            .map_err(|e| EthereumCleanupError::ContractCall(e.to_string()))?;

        Ok(uri)
    }

    async fn token_uri_for_level(&self, level: u8) -> CleanupResult<String> {
        debug!("Fetching metadata URI for level {}", level);
        let fallback = self
            .contract
            .config
            .metadata_cid
            .as_deref()
            .filter(|cid| !cid.is_empty())
            .map(|cid| format!("ipfs://{}/level{}.json", cid, level));

        match self.read_level_uri(level).await {
            Ok(uri) if !uri.is_empty() => Ok(uri),
            Ok(_) => fallback.ok_or_else(|| {
                CleanupError::not_configured("Impact Product metadata CID")
            }),
            Err(e) => match fallback {
                Some(uri) => {
                    warn!("Failed to read level URI, using metadata CID: {}", e);
                    Ok(uri)
                }
                None => Err(e.into()),
            },
        }
    }

    // ===== Reward Distributor =====

    async fn points_balance(&self, user: Address) -> CleanupResult<DcuBalance> {
        debug!("Fetching cDCU balance for {}", user);
        match self.read_dcu_balance(user).await {
            Ok(balance) => Ok(balance),
            Err(e) if e.is_configuration_error() => Err(e.into()),
            Err(e) => {
                debug!("getDCUBalance unavailable, falling back to points: {}", e);
                Ok(self.read_points_balance(user).await?)
            }
        }
    }

    async fn claim_hypercert_reward(
        &self,
        hypercert_number: u64,
        chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash> {
        const CONTEXT: &str = "claimHypercertReward";
        debug!("Claiming reward for hypercert {}", hypercert_number);

        if hypercert_number == 0 {
            return Err(CleanupError::invalid_parameter(
                "hypercert number",
                "must be at least 1",
            ));
        }

        let distributor = self.contract.reward_distributor_address()?;
        self.guard.ensure_on_required_chain(CONTEXT, chain_hint).await?;

        let provider = self.contract.create_provider_with_signer()?;
        let contract = RewardDistributor::new(distributor, &provider);

        let pending = match contract
            .claimHypercertReward(U256::from(hypercert_number))
            .send()
            .await
        {
            Ok(pending) => pending,
            Err(e) => return Err(self.send_failure(CONTEXT, e.to_string()).await),
        };
        self.confirm(CONTEXT, pending).await
    }
}
