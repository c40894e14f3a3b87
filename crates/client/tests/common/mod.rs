//! In-memory doubles for the client integration tests

#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use decleanup_client::hypercert::{ImpactReport, ReportSource};
use decleanup_client::{ClientError, MemoryStore, PointerCache, ResolverConfig, StatusResolver};
use decleanup_contracts_trait::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn user() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn other_user() -> Address {
    Address::repeat_byte(0x22)
}

pub fn submission(id: u64, submitter: Address, status: SubmissionStatus) -> Submission {
    Submission {
        id,
        submitter,
        data_uri: String::new(),
        before_photo_hash: format!("QmBefore{}", id),
        after_photo_hash: format!("QmAfter{}", id),
        impact_report_hash: None,
        latitude_e6: 52_520_000,
        longitude_e6: 13_405_000,
        created_at: 1_700_000_000 + id * 86_400,
        status,
        approver: None,
        processed_at: None,
        reward_paid: false,
        fee_paid: U256::ZERO,
        fee_refunded: false,
        has_impact_form: false,
    }
}

#[derive(Default)]
struct State {
    submissions: HashMap<u64, Submission>,
    /// `None` makes `submission_count` fail
    count: Option<u64>,
    failing_ids: HashSet<u64>,
    levels: HashMap<Address, u8>,
    level_error: bool,
}

/// Scripted contracts with call counters
#[derive(Default)]
pub struct MockContracts {
    state: Mutex<State>,
    fetched: Mutex<Vec<u64>>,
    count_calls: AtomicUsize,
    level_calls: AtomicUsize,
}

impl MockContracts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add submissions and set the counter to one past the highest id
    pub fn with_submissions(self, submissions: Vec<Submission>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for submission in submissions {
                state.submissions.insert(submission.id, submission);
            }
            let next = state.submissions.keys().max().map_or(1, |max| max + 1);
            state.count = Some(next);
        }
        self
    }

    pub fn with_count(self, count: Option<u64>) -> Self {
        self.state.lock().unwrap().count = count;
        self
    }

    pub fn with_failing_id(self, id: u64) -> Self {
        self.state.lock().unwrap().failing_ids.insert(id);
        self
    }

    pub fn with_level(self, user: Address, level: u8) -> Self {
        self.state.lock().unwrap().levels.insert(user, level);
        self
    }

    pub fn with_level_error(self) -> Self {
        self.state.lock().unwrap().level_error = true;
        self
    }

    /// Make a previously failing id readable again
    pub fn recover_id(&self, id: u64) {
        self.state.lock().unwrap().failing_ids.remove(&id);
    }

    pub fn set_status(&self, id: u64, status: SubmissionStatus) {
        if let Some(submission) = self.state.lock().unwrap().submissions.get_mut(&id) {
            submission.status = status;
        }
    }

    pub fn set_level(&self, user: Address, level: u8) {
        self.state.lock().unwrap().levels.insert(user, level);
    }

    /// Ids passed to `get_submission`, in call order
    pub fn fetched(&self) -> Vec<u64> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.fetched.lock().unwrap().clear();
        self.count_calls.store(0, Ordering::SeqCst);
        self.level_calls.store(0, Ordering::SeqCst);
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn level_calls(&self) -> usize {
        self.level_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CleanupContracts for MockContracts {
    async fn submission_count(&self) -> CleanupResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .count
            .ok_or_else(|| CleanupError::network("submissionCount unavailable"))
    }

    async fn get_submission(&self, id: u64) -> CleanupResult<Submission> {
        self.fetched.lock().unwrap().push(id);
        let state = self.state.lock().unwrap();
        if state.failing_ids.contains(&id) {
            return Err(CleanupError::network(format!("timeout reading {}", id)));
        }
        state
            .submissions
            .get(&id)
            .cloned()
            .ok_or(CleanupError::DoesNotExist(id))
    }

    async fn submission_fee(&self) -> CleanupResult<FeeInfo> {
        Ok(FeeInfo::default())
    }

    async fn claimable_rewards(&self, _user: Address) -> CleanupResult<U256> {
        Ok(U256::ZERO)
    }

    async fn is_verifier(&self, _account: Address) -> CleanupResult<bool> {
        Ok(false)
    }

    async fn hypercert_eligibility(&self, _user: Address) -> CleanupResult<HypercertEligibility> {
        Ok(HypercertEligibility::default())
    }

    async fn create_submission(
        &self,
        _submission: &NewSubmission,
        _chain_hint: Option<u64>,
    ) -> CleanupResult<Option<u64>> {
        Err(CleanupError::NotSupported("create_submission".to_string()))
    }

    async fn approve_submission(&self, _id: u64, _chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        Err(CleanupError::NotSupported("approve_submission".to_string()))
    }

    async fn reject_submission(&self, _id: u64, _chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        Err(CleanupError::NotSupported("reject_submission".to_string()))
    }

    async fn claim_rewards(&self, _chain_hint: Option<u64>) -> CleanupResult<TxHash> {
        Err(CleanupError::NotSupported("claim_rewards".to_string()))
    }

    async fn attach_recyclables(
        &self,
        _id: u64,
        _photo_hash: &str,
        _receipt_hash: Option<&str>,
        _chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash> {
        Err(CleanupError::NotSupported("attach_recyclables".to_string()))
    }

    async fn user_level(&self, user: Address) -> CleanupResult<u8> {
        self.level_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.level_error {
            return Err(CleanupError::network("userCurrentLevel unavailable"));
        }
        Ok(state.levels.get(&user).copied().unwrap_or(0))
    }

    async fn user_token_id(&self, _user: Address) -> CleanupResult<u64> {
        Ok(0)
    }

    async fn token_uri(&self, token_id: u64) -> CleanupResult<String> {
        Ok(format!("ipfs://token/{}", token_id))
    }

    async fn token_uri_for_level(&self, level: u8) -> CleanupResult<String> {
        Ok(format!("ipfs://levels/level{}.json", level))
    }

    async fn points_balance(&self, _user: Address) -> CleanupResult<DcuBalance> {
        Ok(DcuBalance::default())
    }

    async fn claim_hypercert_reward(
        &self,
        _hypercert_number: u64,
        _chain_hint: Option<u64>,
    ) -> CleanupResult<TxHash> {
        Err(CleanupError::NotSupported("claim_hypercert_reward".to_string()))
    }
}

/// Resolver over `contracts` with a fresh in-memory store
pub fn build_resolver(contracts: Arc<MockContracts>) -> (StatusResolver, MemoryStore) {
    let store = MemoryStore::new();
    let resolver = StatusResolver::new(
        contracts,
        PointerCache::new(Arc::new(store.clone())),
        ResolverConfig::default(),
    );
    (resolver, store)
}

/// Report source keyed by hash; unknown hashes fail like an unreachable gateway
#[derive(Default)]
pub struct MockReports {
    reports: HashMap<String, ImpactReport>,
    calls: AtomicUsize,
}

impl MockReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, hash: &str, report: ImpactReport) -> Self {
        self.reports.insert(hash.to_string(), report);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportSource for MockReports {
    async fn fetch_report(&self, hash: &str) -> Result<ImpactReport, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reports
            .get(hash)
            .cloned()
            .ok_or_else(|| ClientError::ReportUnavailable {
                hash: hash.to_string(),
                message: "all gateways failed".to_string(),
            })
    }
}
