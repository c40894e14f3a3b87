//! Pointer cache: the per-user "latest submission id" hint
//!
//! This module is the only place that knows the cache key layout. The
//! pointer is never authoritative; the resolver checks it against the chain.

use crate::store::KeyValueStore;
use alloy_primitives::Address;
use decleanup_contracts_trait::CleanupResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const ID_KEY_PREFIX: &str = "pending_cleanup_id_";
const LOCATION_KEY_PREFIX: &str = "pending_cleanup_location_";

/// Keys written by older clients without a per-user suffix
pub const LEGACY_KEYS: [&str; 2] = ["pending_cleanup_id", "pending_cleanup_location"];

/// Geolocation recorded alongside a freshly created submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingLocation {
    pub latitude: f64,
    pub longitude: f64,
}

fn lower_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

pub fn id_key(address: &Address) -> String {
    format!("{}{}", ID_KEY_PREFIX, lower_address(address))
}

pub fn location_key(address: &Address) -> String {
    format!("{}{}", LOCATION_KEY_PREFIX, lower_address(address))
}

/// Cached pointer access over a [`KeyValueStore`]
#[derive(Clone)]
pub struct PointerCache {
    store: Arc<dyn KeyValueStore>,
}

impl PointerCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached submission id for a user
    ///
    /// An unparseable value is removed and reported as absent.
    pub async fn pending_id(&self, address: &Address) -> CleanupResult<Option<u64>> {
        let key = id_key(address);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match raw.trim().parse::<u64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                warn!("Discarding unparseable cached id '{}' for {}", raw, key);
                self.invalidate(address).await?;
                Ok(None)
            }
        }
    }

    /// Record the user's latest submission id, and its location when known
    pub async fn remember(
        &self,
        address: &Address,
        id: u64,
        location: Option<PendingLocation>,
    ) -> CleanupResult<()> {
        debug!("Caching submission {} for {}", id, lower_address(address));
        self.store.set(&id_key(address), id.to_string()).await?;
        if let Some(location) = location {
            let value = serde_json::to_string(&location)
                .map_err(decleanup_contracts_trait::CleanupError::storage)?;
            self.store.set(&location_key(address), value).await?;
        }
        Ok(())
    }

    /// Remove the pointer and its companion location
    pub async fn invalidate(&self, address: &Address) -> CleanupResult<()> {
        debug!("Invalidating cached submission for {}", lower_address(address));
        self.store.remove(&id_key(address)).await?;
        self.store.remove(&location_key(address)).await
    }

    pub async fn pending_location(&self, address: &Address) -> CleanupResult<Option<PendingLocation>> {
        let Some(raw) = self.store.get(&location_key(address)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(location) => Ok(Some(location)),
            Err(e) => {
                warn!("Ignoring malformed cached location: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove the global keys older clients wrote
    pub async fn clear_legacy(&self) -> CleanupResult<()> {
        for key in LEGACY_KEYS {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}
