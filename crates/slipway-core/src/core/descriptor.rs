// crates/slipway-core/src/core/descriptor.rs
// ============================================================================
// Module: Package Descriptors
// Description: Typed language-package manifest model and reconciliation rules.
// Purpose: Rewrite product identity and translation references losslessly.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each language package carries a manifest declaring product identity,
//! localization contributions, and translation-file references. Only the
//! fields the synchronizer rewrites are typed; everything else passes through
//! an untyped bag so reserialization never drops unknown manifest content.
//!
//! ## Invariants
//! - Translation path entries are unique by `path`; reconciliation updates in
//!   place on a path match and appends otherwise.
//! - A manifest must declare at least one localization contribution with
//!   `languageId`, `languageName`, and `localizedLanguageName`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::language::LanguageId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while reading, validating, or writing a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The manifest JSON could not be parsed.
    #[error("failed to parse package descriptor: {0}")]
    Parse(String),
    /// The manifest could not be serialized.
    #[error("failed to serialize package descriptor: {0}")]
    Serialize(String),
    /// The manifest declares no localization contribution.
    #[error("package descriptor declares no localization contribution")]
    MissingLocalization,
    /// A localization contribution is missing a required field.
    #[error("localization contribution is missing required field {field}")]
    IncompleteLocalization {
        /// Name of the absent field.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Translation Paths
// ============================================================================

/// One translation reference declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPathEntry {
    /// Catalog kind identifier (core marker or extension id).
    pub id: String,
    /// Relative path to the catalog file.
    pub path: String,
}

/// Ephemeral output of the merge step, prior to descriptor folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPathRecord {
    /// Catalog kind identifier (core marker or extension id).
    pub id: String,
    /// Catalog file name relative to the package's translations directory.
    pub resource_name: String,
}

impl TranslationPathRecord {
    /// Returns the manifest-relative path this record folds into.
    #[must_use]
    pub fn descriptor_path(&self) -> String {
        format!("./translations/{}", self.resource_name)
    }
}

// ============================================================================
// SECTION: Localization Contribution
// ============================================================================

/// A manifest's localization contribution entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationContribution {
    /// Language identifier declared by the package.
    #[serde(rename = "languageId")]
    pub language_id: String,
    /// English language name.
    #[serde(rename = "languageName", default)]
    pub language_name: String,
    /// Language name in the language itself.
    #[serde(rename = "localizedLanguageName", default)]
    pub localized_language_name: String,
    /// Optional translation-platform project identifier.
    #[serde(rename = "transifexId", default, skip_serializing_if = "Option::is_none")]
    pub transifex_id: Option<String>,
    /// Ordered translation references, unique by path.
    #[serde(default)]
    pub translations: Vec<TranslationPathEntry>,
    /// Unknown contribution fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalizationContribution {
    /// Upserts a translation record: a path match overwrites the entry's id
    /// in place (preserving array position); a novel path is appended.
    pub fn upsert_translation(&mut self, record: &TranslationPathRecord) {
        let path = record.descriptor_path();
        if let Some(entry) = self.translations.iter_mut().find(|entry| entry.path == path) {
            entry.id = record.id.clone();
            return;
        }
        self.translations.push(TranslationPathEntry {
            id: record.id.clone(),
            path,
        });
    }
}

/// Contribution block of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contributions {
    /// Localization contributions declared by the package.
    #[serde(default)]
    pub localizations: Vec<LocalizationContribution>,
    /// Unknown contribution kinds, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// SECTION: Branding
// ============================================================================

/// Fixed textual mapping applied to product-identity manifest fields.
///
/// # Invariants
/// - `display_name` may contain a `{language}` placeholder, replaced with the
///   contribution's English language name (or the language id as fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Package name prefix; the language id is appended.
    pub name_prefix: String,
    /// Display name template.
    pub display_name: String,
    /// Publisher identifier.
    pub publisher: String,
    /// License identifier.
    pub license: String,
    /// Repository URL.
    pub repository: String,
    /// Engine-version constraints keyed by engine name.
    pub engines: std::collections::BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Package Descriptor
// ============================================================================

/// Typed view of a language package manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name.
    pub name: String,
    /// Human-readable display name.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Publisher identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// License identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Repository reference (string or structured form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,
    /// Engine-version constraints keyed by engine name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<std::collections::BTreeMap<String, String>>,
    /// Contribution block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributes: Option<Contributions>,
    /// Unknown manifest fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageDescriptor {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Parse`] when the text is not a manifest.
    pub fn from_json(text: &str) -> Result<Self, DescriptorError> {
        serde_json::from_str(text).map_err(|err| DescriptorError::Parse(err.to_string()))
    }

    /// Serializes the manifest as pretty-printed, tab-indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Serialize`] when JSON rendering fails.
    pub fn to_json_string(&self) -> Result<String, DescriptorError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|err| DescriptorError::Serialize(err.to_string()))?;
        String::from_utf8(buffer).map_err(|err| DescriptorError::Serialize(err.to_string()))
    }

    /// Rewrites product-identity fields from the branding table.
    ///
    /// Purely declarative: every value comes from the table, none from the
    /// previous manifest contents.
    pub fn apply_branding(&mut self, branding: &Branding, language: &LanguageId) {
        let language_label = self
            .contributes
            .as_ref()
            .and_then(|contributes| contributes.localizations.first())
            .map_or_else(|| language.to_string(), |loc| loc.language_name.clone());
        self.name = format!("{}-{}", branding.name_prefix, language);
        self.display_name = Some(branding.display_name.replace("{language}", &language_label));
        self.publisher = Some(branding.publisher.clone());
        self.license = Some(branding.license.clone());
        self.repository = Some(Value::String(branding.repository.clone()));
        self.engines = Some(branding.engines.clone());
    }

    /// Validates the manifest declares a complete localization contribution
    /// and returns a mutable handle to the primary one.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::MissingLocalization`] when no contribution
    /// exists, or [`DescriptorError::IncompleteLocalization`] when a required
    /// field is empty.
    pub fn primary_localization(
        &mut self,
    ) -> Result<&mut LocalizationContribution, DescriptorError> {
        let contribution = self
            .contributes
            .as_mut()
            .and_then(|contributes| contributes.localizations.first_mut())
            .ok_or(DescriptorError::MissingLocalization)?;
        if contribution.language_id.is_empty() {
            return Err(DescriptorError::IncompleteLocalization {
                field: "languageId",
            });
        }
        if contribution.language_name.is_empty() {
            return Err(DescriptorError::IncompleteLocalization {
                field: "languageName",
            });
        }
        if contribution.localized_language_name.is_empty() {
            return Err(DescriptorError::IncompleteLocalization {
                field: "localizedLanguageName",
            });
        }
        Ok(contribution)
    }
}
