//! Impact report retrieval over public IPFS gateways

use crate::config::IpfsConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Impact report JSON as uploaded by the submission form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactReport {
    pub location_type: Option<String>,
    pub area: Option<f64>,
    pub area_unit: Option<String>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub bags: Option<f64>,
    pub hours: Option<f64>,
    pub minutes: Option<f64>,
    pub waste_types: Vec<String>,
    pub contributors: Vec<String>,
    pub scope_of_work: Option<String>,
    pub rights_assignment: Option<String>,
    pub environmental_challenges: Option<String>,
    pub prevention_ideas: Option<String>,
    pub additional_notes: Option<String>,
    pub timestamp: Option<String>,
    pub user_address: Option<String>,
}

/// Source of impact reports keyed by IPFS hash
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, hash: &str) -> Result<ImpactReport>;
}

/// Strip an `ipfs://` scheme and surrounding whitespace
pub fn clean_hash(hash: &str) -> &str {
    let hash = hash.trim();
    hash.strip_prefix("ipfs://").unwrap_or(hash).trim()
}

/// Reads reports through a list of HTTP gateways, first success wins
pub struct IpfsGateways {
    client: Client,
    gateways: Vec<String>,
}

impl IpfsGateways {
    pub fn new(config: &IpfsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            gateways: config.gateways.clone(),
        })
    }

    /// Candidate URLs for a hash, in gateway order
    pub fn urls(&self, hash: &str) -> Vec<String> {
        let hash = clean_hash(hash);
        self.gateways
            .iter()
            .map(|gateway| format!("{}{}", gateway, hash))
            .collect()
    }

    async fn fetch_from(&self, url: &str) -> Result<ImpactReport> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpRequest(format!(
                "{} returned {}",
                url, status
            )));
        }

        Ok(response.json::<ImpactReport>().await?)
    }
}

#[async_trait]
impl ReportSource for IpfsGateways {
    async fn fetch_report(&self, hash: &str) -> Result<ImpactReport> {
        let cleaned = clean_hash(hash);
        if cleaned.is_empty() {
            return Err(ClientError::ReportUnavailable {
                hash: hash.to_string(),
                message: "empty hash".to_string(),
            });
        }

        let mut last_error = None;
        for url in self.urls(cleaned) {
            debug!("Fetching impact report from {}", url);
            match self.fetch_from(&url).await {
                Ok(report) => {
                    debug!("Fetched impact report from {}", url);
                    return Ok(report);
                }
                Err(e) => {
                    warn!("Failed to fetch from {}: {}", url, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        error!("Failed to fetch impact report from all gateways for hash: {}", cleaned);
        Err(ClientError::ReportUnavailable {
            hash: cleaned.to_string(),
            message: last_error.unwrap_or_else(|| "no gateways configured".to_string()),
        })
    }
}
