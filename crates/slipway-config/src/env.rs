// crates/slipway-config/src/env.rs
// ============================================================================
// Module: Publisher Environment
// Description: Resolves publisher settings from environment variables.
// Purpose: Turn ambient build environment into one explicit settings struct.
// Dependencies: slipway-core, url
// ============================================================================

//! ## Overview
//! Publishing runs inside a build agent whose credentials and release
//! coordinates arrive through the environment. All of them are resolved once
//! at startup into [`PublishEnv`]; any missing required variable is a fatal
//! configuration error before any remote call is made.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;

use slipway_core::RetryPolicy;
use url::Url;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Release quality channel.
pub const QUALITY_ENV: &str = "SLIPWAY_QUALITY";
/// Commit the artifacts were built from.
pub const COMMIT_ENV: &str = "SLIPWAY_COMMIT";
/// Primary store access key id.
pub const PRIMARY_KEY_ID_ENV: &str = "SLIPWAY_STORE_PRIMARY_KEY_ID";
/// Primary store secret access key.
pub const PRIMARY_KEY_ENV: &str = "SLIPWAY_STORE_PRIMARY_KEY";
/// Mirror store access key id.
pub const MIRROR_KEY_ID_ENV: &str = "SLIPWAY_STORE_MIRROR_KEY_ID";
/// Mirror store secret access key.
pub const MIRROR_KEY_ENV: &str = "SLIPWAY_STORE_MIRROR_KEY";
/// CDN base URL fronting the primary store.
pub const CDN_PRIMARY_ENV: &str = "SLIPWAY_CDN_PRIMARY_URL";
/// CDN base URL fronting the mirror store.
pub const CDN_MIRROR_ENV: &str = "SLIPWAY_CDN_MIRROR_URL";
/// Release metadata service endpoint.
pub const RELEASE_DB_ENDPOINT_ENV: &str = "SLIPWAY_RELEASE_DB_ENDPOINT";
/// Release metadata service access key.
pub const RELEASE_DB_KEY_ENV: &str = "SLIPWAY_RELEASE_DB_KEY";

/// Primary store bucket override.
pub const PRIMARY_BUCKET_ENV: &str = "SLIPWAY_STORE_PRIMARY_BUCKET";
/// Mirror store bucket override.
pub const MIRROR_BUCKET_ENV: &str = "SLIPWAY_STORE_MIRROR_BUCKET";
/// Primary store region override.
pub const PRIMARY_REGION_ENV: &str = "SLIPWAY_STORE_PRIMARY_REGION";
/// Mirror store region override.
pub const MIRROR_REGION_ENV: &str = "SLIPWAY_STORE_MIRROR_REGION";
/// Primary store endpoint override.
pub const PRIMARY_ENDPOINT_ENV: &str = "SLIPWAY_STORE_PRIMARY_ENDPOINT";
/// Mirror store endpoint override.
pub const MIRROR_ENDPOINT_ENV: &str = "SLIPWAY_STORE_MIRROR_ENDPOINT";

/// Retry attempt override for remote calls.
pub const RETRY_ATTEMPTS_ENV: &str = "SLIPWAY_RETRY_ATTEMPTS";
/// Retry delay override, in milliseconds.
pub const RETRY_DELAY_ENV: &str = "SLIPWAY_RETRY_DELAY_MS";

/// Default primary bucket name.
const DEFAULT_PRIMARY_BUCKET: &str = "slipway-releases";
/// Default mirror bucket name.
const DEFAULT_MIRROR_BUCKET: &str = "slipway-releases-mirror";

// ============================================================================
// SECTION: Settings Model
// ============================================================================

/// Resolved settings for one object store.
#[derive(Debug, Clone)]
pub struct StoreEnv {
    /// Bucket receiving release blobs.
    pub bucket: String,
    /// Region of the bucket, when not implied by the endpoint.
    pub region: Option<String>,
    /// Endpoint override for S3-compatible services.
    pub endpoint: Option<String>,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

/// Resolved publisher settings.
#[derive(Debug, Clone)]
pub struct PublishEnv {
    /// Release quality channel.
    pub quality: String,
    /// Commit the artifacts were built from.
    pub commit: String,
    /// Primary object store settings.
    pub primary: StoreEnv,
    /// Mirror object store settings.
    pub mirror: StoreEnv,
    /// CDN base URL fronting the primary store.
    pub cdn_primary_url: String,
    /// CDN base URL fronting the mirror store.
    pub cdn_mirror_url: String,
    /// Release metadata service endpoint.
    pub release_db_endpoint: Url,
    /// Release metadata service access key.
    pub release_db_key: String,
    /// Retry policy for uploads and the metadata insert.
    pub retry: RetryPolicy,
}

impl PublishEnv {
    /// Resolves publisher settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] for any absent or empty required
    /// variable, or [`ConfigError::Invalid`] when a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let variables: BTreeMap<String, String> = env::vars().collect();
        Self::from_lookup(&variables)
    }

    /// Resolves publisher settings from an explicit variable map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] for any absent or empty required
    /// variable, or [`ConfigError::Invalid`] when a value fails to parse.
    pub fn from_lookup(variables: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let endpoint_text = required(variables, RELEASE_DB_ENDPOINT_ENV)?;
        let release_db_endpoint = Url::parse(&endpoint_text).map_err(|err| {
            ConfigError::Invalid(format!("{RELEASE_DB_ENDPOINT_ENV} is not a valid url: {err}"))
        })?;
        Ok(Self {
            quality: required(variables, QUALITY_ENV)?,
            commit: required(variables, COMMIT_ENV)?,
            primary: StoreEnv {
                bucket: optional(variables, PRIMARY_BUCKET_ENV)
                    .unwrap_or_else(|| DEFAULT_PRIMARY_BUCKET.to_string()),
                region: optional(variables, PRIMARY_REGION_ENV),
                endpoint: optional(variables, PRIMARY_ENDPOINT_ENV),
                access_key_id: required(variables, PRIMARY_KEY_ID_ENV)?,
                secret_access_key: required(variables, PRIMARY_KEY_ENV)?,
            },
            mirror: StoreEnv {
                bucket: optional(variables, MIRROR_BUCKET_ENV)
                    .unwrap_or_else(|| DEFAULT_MIRROR_BUCKET.to_string()),
                region: optional(variables, MIRROR_REGION_ENV),
                endpoint: optional(variables, MIRROR_ENDPOINT_ENV),
                access_key_id: required(variables, MIRROR_KEY_ID_ENV)?,
                secret_access_key: required(variables, MIRROR_KEY_ENV)?,
            },
            cdn_primary_url: required(variables, CDN_PRIMARY_ENV)?,
            cdn_mirror_url: required(variables, CDN_MIRROR_ENV)?,
            release_db_endpoint,
            release_db_key: required(variables, RELEASE_DB_KEY_ENV)?,
            retry: retry_policy(variables)?,
        })
    }
}

/// Builds the retry policy from optional overrides.
fn retry_policy(variables: &BTreeMap<String, String>) -> Result<RetryPolicy, ConfigError> {
    let mut policy = RetryPolicy::default();
    if let Some(attempts) = optional(variables, RETRY_ATTEMPTS_ENV) {
        policy.attempts = attempts.parse().map_err(|_| {
            ConfigError::Invalid(format!("{RETRY_ATTEMPTS_ENV} must be a positive integer"))
        })?;
    }
    if let Some(delay) = optional(variables, RETRY_DELAY_ENV) {
        policy.delay_ms = delay.parse().map_err(|_| {
            ConfigError::Invalid(format!("{RETRY_DELAY_ENV} must be a duration in milliseconds"))
        })?;
    }
    Ok(policy)
}

// ============================================================================
// SECTION: Lookup Helpers
// ============================================================================

/// Reads a required variable, rejecting absent or blank values.
fn required(
    variables: &BTreeMap<String, String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match variables.get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingEnv {
            name,
        }),
    }
}

/// Reads an optional variable, treating blank values as absent.
fn optional(variables: &BTreeMap<String, String>, name: &'static str) -> Option<String> {
    variables.get(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
