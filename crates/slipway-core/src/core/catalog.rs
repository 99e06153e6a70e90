// crates/slipway-core/src/core/catalog.rs
// ============================================================================
// Module: Translation Catalogs
// Description: JSON translation catalog model, routing, and merge rules.
// Purpose: Turn resolved XLIFF messages into deterministic catalog files.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A translation catalog maps resource keys (slash-delimited logical paths)
//! to maps of string id and translated text. The *main* catalog accumulates
//! core product strings and must preserve unrelated legacy keys across syncs;
//! per-extension catalogs are regenerated from scratch on every run.
//!
//! ## Invariants
//! - A resource key belongs to exactly one catalog kind, decided by whether
//!   its originating resource name equals the reserved core marker.
//! - Serialized catalogs carry the header annotation block under the
//!   empty-string key and the fixed schema version tag.
//! - Serialization is deterministic: keys are sorted and indentation is tabs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema version tag written into every catalog file.
pub const CATALOG_SCHEMA_VERSION: &str = "1.0.0";

/// Header annotation block stored under the catalog's empty-string key.
const CATALOG_HEADER: [&str; 5] = [
    "--------------------------------------------------------------------------------------------",
    "Copyright (c) 2026 Michael Campbell. All rights reserved.",
    "Licensed under the MIT License. See License.txt in the project root for license information.",
    "--------------------------------------------------------------------------------------------",
    "Do not edit this file. It is machine generated.",
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while reading or writing catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The on-disk catalog JSON could not be parsed.
    #[error("failed to parse catalog json: {0}")]
    Parse(String),
    /// The catalog could not be serialized.
    #[error("failed to serialize catalog: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Catalog Model
// ============================================================================

/// An in-memory translation catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationCatalog {
    /// Resource key to message map.
    contents: BTreeMap<String, BTreeMap<String, String>>,
}

/// On-disk catalog representation.
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    /// Header annotation lines stored under the empty-string key.
    #[serde(rename = "", default)]
    header: Vec<String>,
    /// Catalog schema version tag.
    #[serde(default)]
    version: String,
    /// Resource key to message map.
    contents: BTreeMap<String, BTreeMap<String, String>>,
}

impl TranslationCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) the message map for a resource key.
    pub fn insert_resource(&mut self, key: impl Into<String>, messages: BTreeMap<String, String>) {
        self.contents.insert(key.into(), messages);
    }

    /// Returns the message map for a resource key, if present.
    #[must_use]
    pub fn resource(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.contents.get(key)
    }

    /// Returns true when the catalog holds a map for the resource key.
    #[must_use]
    pub fn contains_resource(&self, key: &str) -> bool {
        self.contents.contains_key(key)
    }

    /// Returns true when the catalog holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Iterates resource keys in sorted order.
    pub fn resource_keys(&self) -> impl Iterator<Item = &str> {
        self.contents.keys().map(String::as_str)
    }

    /// Parses a catalog from its on-disk JSON form.
    ///
    /// The header block and version tag are accepted and discarded; only the
    /// contents matter for merging.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the text is not a catalog file.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Ok(Self {
            contents: file.contents,
        })
    }

    /// Serializes the catalog with header block, version tag, and tab indent,
    /// using the platform's newline convention (CRLF on Windows).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Serialize`] when JSON rendering fails.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        self.to_json_string_with(cfg!(windows))
    }

    /// Serializes the catalog, selecting the newline convention explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Serialize`] when JSON rendering fails.
    pub fn to_json_string_with(&self, crlf: bool) -> Result<String, CatalogError> {
        let file = CatalogFile {
            header: CATALOG_HEADER.iter().map(ToString::to_string).collect(),
            version: CATALOG_SCHEMA_VERSION.to_string(),
            contents: self.contents.clone(),
        };
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        file.serialize(&mut serializer)
            .map_err(|err| CatalogError::Serialize(err.to_string()))?;
        let text =
            String::from_utf8(buffer).map_err(|err| CatalogError::Serialize(err.to_string()))?;
        if crlf {
            return Ok(text.replace('\n', "\r\n"));
        }
        Ok(text)
    }

    /// Merges freshly parsed core messages into an existing main catalog.
    ///
    /// Existing keys under the core prefix that have no counterpart in the
    /// incoming set are pruned (strings removed from the product since the
    /// last sync). Incoming keys replace existing ones; keys outside the core
    /// prefix are preserved unchanged.
    #[must_use]
    pub fn merge_main(existing: &Self, incoming: &Self, core_resource: &str) -> Self {
        let reserved = format!("{core_resource}/");
        let mut merged = BTreeMap::new();
        for (key, messages) in &existing.contents {
            if key.starts_with(&reserved) && !incoming.contains_resource(key) {
                continue;
            }
            merged.insert(key.clone(), messages.clone());
        }
        for (key, messages) in &incoming.contents {
            merged.insert(key.clone(), messages.clone());
        }
        Self {
            contents: merged,
        }
    }
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Placement of one resolved message file within the catalog set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRoute {
    /// The map belongs to the main catalog under the given resource key.
    Main {
        /// Catalog resource key (original path with one segment stripped).
        key: String,
    },
    /// The map belongs to an extension catalog under the given resource key.
    Extension {
        /// Extension identifier owning the catalog.
        extension: String,
        /// Catalog resource key (original path with two segments stripped).
        key: String,
    },
}

/// Decides catalog placement for a resolved message file.
///
/// Core resources keep their own marker segment visible in the key (only the
/// domain-root segment is stripped); extension catalogs do not repeat their
/// extension id, so two leading segments are stripped.
#[must_use]
pub fn route_resource(resource: &str, original_path: &str, core_resource: &str) -> CatalogRoute {
    if resource == core_resource {
        return CatalogRoute::Main {
            key: strip_leading_segments(original_path, 1).to_string(),
        };
    }
    CatalogRoute::Extension {
        extension: resource.to_string(),
        key: strip_leading_segments(original_path, 2).to_string(),
    }
}

/// Strips up to `count` leading slash-delimited segments from a path.
///
/// A path with fewer separators than requested is returned from the last
/// separator found, matching the tolerant substring behavior of the
/// localization exports this feeds on.
fn strip_leading_segments(path: &str, count: usize) -> &str {
    let mut remainder = path;
    for _ in 0 .. count {
        match remainder.split_once('/') {
            Some((_, rest)) => remainder = rest,
            None => break,
        }
    }
    remainder
}

// ============================================================================
// SECTION: Tests
// ============================================================================
