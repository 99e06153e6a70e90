// crates/slipway-core/src/core/language.rs
// ============================================================================
// Module: Language Identifiers
// Description: Normalized language identifiers for localization packages.
// Purpose: Canonicalize locale codes once so every pipeline agrees on them.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Language identifiers arrive from directory names, XLIFF file names, and
//! package manifests. All of them are normalized through [`LanguageId`] so the
//! Chinese region codes collapse to their script-based forms and casing never
//! causes two spellings of one language to diverge.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Language Identifier
// ============================================================================

/// Normalized language identifier.
///
/// # Invariants
/// - Stored lowercase with surrounding whitespace removed.
/// - `zh-cn` and `zh-tw` are canonicalized to `zh-hans` and `zh-hant`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(String);

impl LanguageId {
    /// Creates a normalized language identifier from a raw locale code.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let canonical = match lowered.as_str() {
            "zh-cn" => "zh-hans".to_string(),
            "zh-tw" => "zh-hant".to_string(),
            _ => lowered,
        };
        Self(canonical)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for LanguageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use super::LanguageId;

    #[test]
    fn chinese_region_codes_canonicalize_to_script_codes() {
        assert_eq!(LanguageId::new("zh-cn").as_str(), "zh-hans");
        assert_eq!(LanguageId::new("zh-tw").as_str(), "zh-hant");
        assert_eq!(LanguageId::new("ZH-CN").as_str(), "zh-hans");
    }

    #[test]
    fn other_codes_pass_through_lowercased() {
        assert_eq!(LanguageId::new("DE").as_str(), "de");
        assert_eq!(LanguageId::new(" pt-br ").as_str(), "pt-br");
        assert_eq!(LanguageId::new("zh-hans").as_str(), "zh-hans");
    }
}
