// crates/slipway-core/src/interfaces/mod.rs
// ============================================================================
// Module: Storage Interfaces
// Description: Backend-agnostic object store and release metadata interfaces.
// Purpose: Keep the publisher runtime independent of concrete SDK clients.
// Dependencies: async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! The publisher talks to two object stores and one release metadata service.
//! Both are modeled as narrow async traits so the runtime can be exercised
//! against in-memory fakes and the concrete SDK clients live in a separate
//! backend crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid configuration or request input.
    #[error("store request invalid: {0}")]
    Invalid(String),
    /// Local I/O failure while reading the artifact.
    #[error("store io error: {0}")]
    Io(String),
    /// The backend rejected or failed the call.
    #[error("store backend error: {0}")]
    Backend(String),
}

// ============================================================================
// SECTION: Asset Record
// ============================================================================

/// Persisted metadata describing one published build artifact.
///
/// # Invariants
/// - Records are insert-only; republishing an existing artifact is a no-op
///   detected before any record is written.
/// - `supports_fast_update` is present only for Windows platform keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Canonical platform key.
    pub platform: String,
    /// Canonicalized artifact type.
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Primary download URL.
    pub url: String,
    /// Sovereign-cloud mirror URL, when replicated.
    #[serde(rename = "mirrorUrl", default, skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,
    /// Lowercase hex SHA-1 digest.
    #[serde(rename = "hash")]
    pub sha1_hash: String,
    /// Lowercase hex SHA-256 digest.
    #[serde(rename = "sha256hash")]
    pub sha256_hash: String,
    /// Artifact size in bytes.
    pub size: u64,
    /// Whether the platform's update client can apply fast updates.
    #[serde(
        rename = "supportsFastUpdate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supports_fast_update: Option<bool>,
}

// ============================================================================
// SECTION: Object Store
// ============================================================================

/// Minimal object-store abstraction used by the publisher.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns whether an object with the given name already exists.
    async fn exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Uploads a local file under the given object name.
    async fn upload(&self, name: &str, source: &Path) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Release Record Store
// ============================================================================

/// Release metadata service abstraction.
#[async_trait]
pub trait ReleaseRecordStore: Send + Sync {
    /// Inserts one asset record under the given quality channel and commit.
    async fn create_asset(
        &self,
        quality: &str,
        commit: &str,
        record: &AssetRecord,
    ) -> Result<(), StoreError>;
}
