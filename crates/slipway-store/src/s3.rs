// crates/slipway-store/src/s3.rs
// ============================================================================
// Module: S3 Object Store
// Description: S3-backed implementation of the publisher's object store.
// Purpose: Replicate release blobs with explicit per-store credentials.
// Dependencies: aws-config, aws-sdk-s3, slipway-core
// ============================================================================

//! ## Overview
//! Each configured store (primary and sovereign-cloud mirror) gets its own
//! client with its own credentials, region, and optional endpoint override.
//! Existence checks map a missing object to `false`; every other backend
//! failure surfaces as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use slipway_core::ObjectStore;
use slipway_core::StoreError;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings for one S3-compatible object store.
///
/// # Invariants
/// - `bucket`, `access_key_id`, and `secret_access_key` must be non-empty.
#[derive(Debug, Clone)]
pub struct S3StoreConfig {
    /// Bucket receiving release blobs.
    pub bucket: String,
    /// Region of the bucket, when not implied by the endpoint.
    pub region: Option<String>,
    /// Endpoint override for S3-compatible services.
    pub endpoint: Option<String>,
    /// Access key id for this store.
    pub access_key_id: String,
    /// Secret access key for this store.
    pub secret_access_key: String,
    /// Use path-style addressing (required by some compatible services).
    pub force_path_style: bool,
}

impl S3StoreConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when a required field is empty.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.bucket.trim().is_empty() {
            return Err(StoreError::Invalid("bucket must be set".to_string()));
        }
        if self.access_key_id.trim().is_empty() {
            return Err(StoreError::Invalid("access key id must be set".to_string()));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(StoreError::Invalid("secret access key must be set".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Store Implementation
// ============================================================================

/// S3-backed [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    /// Underlying S3 client.
    client: Client,
    /// Bucket receiving release blobs.
    bucket: String,
}

impl S3ObjectStore {
    /// Connects a store client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the configuration is incomplete.
    pub async fn connect(config: &S3StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "slipway",
        );
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).credentials_provider(credentials);
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint) = config.endpoint.clone() {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        match self.client.head_object().bucket(&self.bucket).key(name).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                if let SdkError::ServiceError(service_err) = &err {
                    if service_err.err().is_not_found() {
                        return Ok(false);
                    }
                }
                Err(StoreError::Backend(err.to_string()))
            }
        }
    }

    async fn upload(&self, name: &str, source: &Path) -> Result<(), StoreError> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|err| StoreError::Io(err.to_string()))?;
        tracing::debug!(bucket = %self.bucket, blob = name, "uploading blob");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(body)
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
