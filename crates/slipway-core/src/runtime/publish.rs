// crates/slipway-core/src/runtime/publish.rs
// ============================================================================
// Module: Asset Publisher Runtime
// Description: Idempotent artifact publishing across redundant stores.
// Purpose: Hash, replicate, and record one build artifact per invocation.
// Dependencies: crate::core, crate::interfaces, tokio, tracing
// ============================================================================

//! ## Overview
//! Publishing an artifact is a four-step batch: derive the canonical platform
//! key, short-circuit when the blob already exists in the primary store, hash
//! and upload to both stores concurrently, then insert one metadata record.
//! The existence check stays outside the retry policy; a failing read must
//! surface immediately instead of being masked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::core::hashing::digest_file;
use crate::core::platform::PlatformError;
use crate::core::platform::platform_key;
use crate::core::platform::real_type;
use crate::core::platform::supports_fast_update;
use crate::core::retry::RetryPolicy;
use crate::core::retry::retry;
use crate::interfaces::AssetRecord;
use crate::interfaces::ObjectStore;
use crate::interfaces::ReleaseRecordStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while publishing an artifact.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The build coordinates are outside the platform taxonomy.
    #[error(transparent)]
    Platform(#[from] PlatformError),
    /// The artifact file could not be read.
    #[error("failed to read artifact {path}: {message}")]
    Io {
        /// Path of the unreadable artifact.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// A storage backend failed after the retry policy was exhausted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// One artifact to publish.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Product flavor (for example, `client` or `server`).
    pub product: String,
    /// Operating system of the build.
    pub os: String,
    /// Architecture of the build.
    pub arch: String,
    /// Artifact subtype (for example, `setup` or `deb-package`).
    pub kind: String,
    /// Published file name.
    pub file_name: String,
    /// Local path of the built artifact.
    pub source: PathBuf,
}

/// Storage backends used by one publish invocation.
pub struct PublishStores<'a> {
    /// Primary object store (also used for the idempotency check).
    pub primary: &'a dyn ObjectStore,
    /// Sovereign-cloud mirror store.
    pub mirror: &'a dyn ObjectStore,
    /// Release metadata service.
    pub records: &'a dyn ReleaseRecordStore,
}

/// Result of a publish invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The blob already existed; nothing was uploaded or recorded.
    AlreadyPublished {
        /// Name of the existing blob.
        blob_name: String,
    },
    /// The artifact was replicated and its record inserted.
    Published {
        /// The inserted asset record.
        record: AssetRecord,
    },
}

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Publisher for one quality channel and commit.
#[derive(Debug, Clone)]
pub struct Publisher {
    /// Release quality channel (for example, `stable` or `insiders`).
    pub quality: String,
    /// Commit identifier the artifacts were built from.
    pub commit: String,
    /// CDN base URL fronting the primary store.
    pub primary_base_url: String,
    /// CDN base URL fronting the mirror store.
    pub mirror_base_url: String,
    /// Retry policy for uploads and the metadata insert.
    pub retry: RetryPolicy,
}

impl Publisher {
    /// Publishes one artifact, skipping work already done.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] on an unmapped platform, an unreadable
    /// artifact, a failed existence check, or a backend failure that
    /// survives the retry policy.
    pub async fn publish(
        &self,
        stores: &PublishStores<'_>,
        request: &PublishRequest,
    ) -> Result<PublishOutcome, PublishError> {
        let platform = platform_key(&request.product, &request.os, &request.arch, &request.kind)?;
        let asset_type = real_type(&request.kind);
        let blob_name = format!("{}/{}", self.commit, request.file_name);

        tracing::info!(%platform, asset_type, blob = %blob_name, "publishing artifact");

        if stores.primary.exists(&blob_name).await? {
            tracing::info!(blob = %blob_name, "blob already exists; skipping publish");
            return Ok(PublishOutcome::AlreadyPublished {
                blob_name,
            });
        }

        let digests = digest_file(&request.source).await.map_err(|err| PublishError::Io {
            path: request.source.clone(),
            message: err.to_string(),
        })?;

        retry(self.retry, "artifact upload", || async {
            tokio::try_join!(
                stores.primary.upload(&blob_name, &request.source),
                stores.mirror.upload(&blob_name, &request.source),
            )
            .map(|_| ())
        })
        .await?;

        let record = AssetRecord {
            platform: platform.clone(),
            asset_type: asset_type.to_string(),
            url: format!("{}/{blob_name}", self.primary_base_url.trim_end_matches('/')),
            mirror_url: Some(format!(
                "{}/{blob_name}",
                self.mirror_base_url.trim_end_matches('/')
            )),
            sha1_hash: digests.sha1,
            sha256_hash: digests.sha256,
            size: digests.size,
            supports_fast_update: supports_fast_update(&platform).then_some(true),
        };

        retry(self.retry, "asset record insert", || async {
            stores.records.create_asset(&self.quality, &self.commit, &record).await
        })
        .await?;

        tracing::info!(%platform, blob = %blob_name, size = record.size, "artifact published");
        Ok(PublishOutcome::Published {
            record,
        })
    }
}
