//! DeCleanup rewards client
//!
//! Resolves a user's latest cleanup submission and its claim status from the
//! chain, tracks the wallet session, and aggregates verified cleanups into
//! hypercert metadata. Contract access goes through the
//! [`CleanupContracts`](decleanup_contracts_trait::CleanupContracts) trait.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod hypercert;
pub mod resolver;
pub mod session;
pub mod store;

pub use app::App;
pub use cache::{PendingLocation, PointerCache};
pub use config::{CacheConfig, ClientConfig, IpfsConfig, ResolverConfig};
pub use eligibility::{compute_claim_eligibility, ClaimEligibility};
pub use error::{ClientError, Result};
pub use resolver::{Resolution, StatusResolver, UserCleanupStatus, VerificationStatus};
pub use session::{SessionState, WalletSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
