// crates/slipway-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Verifies strict slipway.toml loading and validation.
// ============================================================================
//! ## Overview
//! Ensures well-formed configuration loads, contradictory settings fail
//! closed, and unknown fields are rejected rather than silently ignored.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::PathBuf;

use slipway_config::ConfigError;
use slipway_config::SlipwayConfig;

/// A complete, valid configuration document.
const VALID: &str = r#"
[sync]
xliff_root = "resources/xlf"
packages_root = "i18n"
package_prefix = "slipway-langpack"
foreign_prefix = "upstream-langpack"
core_resource = "core"
languages = ["de", "fr", "zh-cn"]
extension_allowlist = ["search", "theme-dark"]

[sync.branding]
name_prefix = "slipway-langpack"
display_name = "Slipway Language Pack ({language})"
publisher = "slipway"
license = "MIT"
repository = "https://example.com/slipway/langpacks"

[sync.branding.engines]
host = "*"
"#;

/// Writes a config document into a temp dir and loads it.
fn load(text: &str) -> Result<SlipwayConfig, ConfigError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("slipway.toml");
    fs::write(&path, text).expect("write config");
    SlipwayConfig::load(&path)
}

#[test]
fn valid_config_loads_and_normalizes_languages() {
    let config = load(VALID).expect("load");
    assert_eq!(config.sync.languages.len(), 3);

    let options = config.sync_options(false);
    let languages: Vec<&str> =
        options.languages.iter().map(slipway_core::LanguageId::as_str).collect();
    assert_eq!(languages, vec!["de", "fr", "zh-hans"]);
    assert_eq!(options.core_resource, "core");
    assert_eq!(options.foreign_prefix.as_deref(), Some("upstream-langpack"));
    assert!(!options.pseudo);
}

#[test]
fn missing_config_file_fails_with_read_error() {
    let err = SlipwayConfig::load(&PathBuf::from("/nonexistent/slipway.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = load(&format!("{VALID}\n[surprise]\nkey = 1\n")).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn empty_language_list_fails_validation() {
    let text = VALID.replace(r#"languages = ["de", "fr", "zh-cn"]"#, "languages = []");
    let err = load(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn core_resource_must_be_a_single_segment() {
    let text = VALID.replace(r#"core_resource = "core""#, r#"core_resource = "src/core""#);
    let err = load(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn foreign_prefix_must_differ_from_package_prefix() {
    let text = VALID.replace(
        r#"foreign_prefix = "upstream-langpack""#,
        r#"foreign_prefix = "slipway-langpack""#,
    );
    let err = load(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
