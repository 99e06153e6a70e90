// crates/slipway-config/src/config.rs
// ============================================================================
// Module: Synchronizer Configuration
// Description: Loading and validation for slipway.toml.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, slipway-core, thiserror, toml
// ============================================================================

//! ## Overview
//! Synchronizer configuration is loaded from a TOML file with a hard size
//! limit and strict field checking. Missing or contradictory configuration
//! fails closed before any filesystem mutation happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use slipway_core::Branding;
use slipway_core::LanguageId;
use slipway_core::SyncOptions;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "slipway.toml";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// The config file exceeds the size limit.
    #[error("config file {path} exceeds {limit} bytes")]
    TooLarge {
        /// Path of the config file.
        path: PathBuf,
        /// Maximum allowed size in bytes.
        limit: u64,
    },
    /// The config file is not valid TOML for the expected model.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// The config model is contradictory or incomplete.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {name}")]
    MissingEnv {
        /// Name of the absent variable.
        name: &'static str,
    },
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration model for `slipway.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlipwayConfig {
    /// Synchronizer settings.
    pub sync: SyncSection,
}

/// Synchronizer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Root directory holding one XLIFF tree per language.
    pub xliff_root: PathBuf,
    /// Root directory holding the language package directories.
    pub packages_root: PathBuf,
    /// Canonical package directory/name prefix.
    pub package_prefix: String,
    /// Differently-branded sibling prefix migrated into place, if any.
    #[serde(default)]
    pub foreign_prefix: Option<String>,
    /// Reserved core resource marker.
    pub core_resource: String,
    /// Languages to synchronize.
    pub languages: Vec<String>,
    /// Extensions retained during provenance migration.
    #[serde(default)]
    pub extension_allowlist: BTreeSet<String>,
    /// Product identity written into descriptors.
    pub branding: Branding,
}

impl SlipwayConfig {
    /// Loads and validates configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized,
    /// unparseable, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let config: Self =
            toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on contradictory or incomplete
    /// settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sync = &self.sync;
        if sync.package_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("sync.package_prefix must be set".to_string()));
        }
        if sync.core_resource.trim().is_empty() {
            return Err(ConfigError::Invalid("sync.core_resource must be set".to_string()));
        }
        if sync.core_resource.contains('/') {
            return Err(ConfigError::Invalid(
                "sync.core_resource must be a single path segment".to_string(),
            ));
        }
        if sync.languages.is_empty() {
            return Err(ConfigError::Invalid(
                "sync.languages must list at least one language".to_string(),
            ));
        }
        if sync.languages.iter().any(|language| language.trim().is_empty()) {
            return Err(ConfigError::Invalid("sync.languages entries must be non-empty".to_string()));
        }
        if let Some(foreign) = &sync.foreign_prefix {
            if foreign.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "sync.foreign_prefix must be non-empty when set".to_string(),
                ));
            }
            if foreign == &sync.package_prefix {
                return Err(ConfigError::Invalid(
                    "sync.foreign_prefix must differ from sync.package_prefix".to_string(),
                ));
            }
        }
        if sync.branding.name_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("sync.branding.name_prefix must be set".to_string()));
        }
        if sync.branding.publisher.trim().is_empty() {
            return Err(ConfigError::Invalid("sync.branding.publisher must be set".to_string()));
        }
        Ok(())
    }

    /// Builds synchronizer options, normalizing every configured language.
    #[must_use]
    pub fn sync_options(&self, pseudo: bool) -> SyncOptions {
        let sync = &self.sync;
        SyncOptions {
            xliff_root: sync.xliff_root.clone(),
            packages_root: sync.packages_root.clone(),
            package_prefix: sync.package_prefix.clone(),
            foreign_prefix: sync.foreign_prefix.clone(),
            core_resource: sync.core_resource.clone(),
            languages: sync.languages.iter().map(|raw| LanguageId::new(raw)).collect(),
            extension_allowlist: sync.extension_allowlist.clone(),
            branding: sync.branding.clone(),
            pseudo,
        }
    }
}
