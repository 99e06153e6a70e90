// crates/slipway-store/src/docdb.rs
// ============================================================================
// Module: Release Metadata Client
// Description: HTTP client for the release metadata service.
// Purpose: Insert asset records keyed by quality channel and commit.
// Dependencies: reqwest, slipway-core, url
// ============================================================================

//! ## Overview
//! Asset records live in a document database fronted by an HTTP service. The
//! client only ever inserts: records are immutable once stored, and the
//! publisher's idempotency check guarantees an existing artifact never
//! reaches this code path twice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use slipway_core::AssetRecord;
use slipway_core::ReleaseRecordStore;
use slipway_core::StoreError;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Request timeout for metadata service calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings for the release metadata service.
///
/// # Invariants
/// - `key` must be non-empty; it authenticates every request.
#[derive(Debug, Clone)]
pub struct ReleaseDbConfig {
    /// Base endpoint of the metadata service.
    pub endpoint: Url,
    /// Service access key.
    pub key: String,
}

impl ReleaseDbConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the access key is empty.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.key.trim().is_empty() {
            return Err(StoreError::Invalid("metadata service key must be set".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Store Implementation
// ============================================================================

/// HTTP-backed [`ReleaseRecordStore`].
#[derive(Debug, Clone)]
pub struct HttpReleaseStore {
    /// Service configuration.
    config: ReleaseDbConfig,
    /// HTTP client for outbound requests.
    client: reqwest::Client,
}

impl HttpReleaseStore {
    /// Creates a client for the metadata service.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ReleaseDbConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }
}

#[async_trait]
impl ReleaseRecordStore for HttpReleaseStore {
    async fn create_asset(
        &self,
        quality: &str,
        commit: &str,
        record: &AssetRecord,
    ) -> Result<(), StoreError> {
        let url = asset_collection_url(&self.config.endpoint, quality, commit);
        tracing::debug!(%url, platform = %record.platform, "inserting asset record");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.key)
            .json(record)
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend(format!(
                "release metadata service returned {status}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: URL Derivation
// ============================================================================

/// Builds the asset collection URL for a quality channel and commit.
fn asset_collection_url(endpoint: &Url, quality: &str, commit: &str) -> String {
    format!(
        "{}/quality/{quality}/commits/{commit}/assets",
        endpoint.as_str().trim_end_matches('/')
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
