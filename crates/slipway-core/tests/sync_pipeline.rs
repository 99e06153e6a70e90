// crates/slipway-core/tests/sync_pipeline.rs
// ============================================================================
// Module: Langpack Synchronizer Pipeline Tests
// Description: End-to-end synchronization against a temporary filesystem.
// ============================================================================
//! ## Overview
//! Builds a miniature XLIFF tree and language package on disk and drives the
//! full pipeline: routing, main-catalog pruning, idempotent re-runs, batch
//! failure isolation, descriptor reconciliation, and provenance migration.

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

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use slipway_core::Branding;
use slipway_core::LanguageId;
use slipway_core::PackageDescriptor;
use slipway_core::SyncError;
use slipway_core::SyncOptions;
use slipway_core::Synchronizer;
use slipway_core::TranslationCatalog;

/// Renders a minimal XLIFF document with one `<file>` element.
fn xlf_document(original: &str, units: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (id, target) in units {
        body.push_str(&format!(
            "      <trans-unit id=\"{id}\">\n        <source>{id}</source>\n        \
             <target>{target}</target>\n      </trans-unit>\n"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<xliff version=\"1.2\">\n  <file \
         original=\"{original}\" source-language=\"en\" target-language=\"de\">\n    \
         <body>\n{body}    </body>\n  </file>\n</xliff>\n"
    )
}

/// A manifest with one complete localization contribution.
fn manifest(translations: &str) -> String {
    format!(
        r#"{{
    "name": "legacy-langpack-de",
    "displayName": "Legacy",
    "publisher": "legacy",
    "contributes": {{
        "localizations": [{{
            "languageId": "de",
            "languageName": "German",
            "localizedLanguageName": "Deutsch",
            "translations": [{translations}]
        }}]
    }}
}}"#
    )
}

/// Filesystem fixture for one synchronization run.
struct Fixture {
    /// Owning temporary directory.
    _dir: tempfile::TempDir,
    /// XLIFF root (per-language trees).
    xliff_root: PathBuf,
    /// Packages root (per-language package directories).
    packages_root: PathBuf,
}

impl Fixture {
    /// Creates the directory skeleton for one language.
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let xliff_root = dir.path().join("xlf");
        let packages_root = dir.path().join("packages");
        fs::create_dir_all(xliff_root.join("de")).expect("mkdir");
        fs::create_dir_all(packages_root.join("slipway-langpack-de")).expect("mkdir");
        Self {
            _dir: dir,
            xliff_root,
            packages_root,
        }
    }

    /// Writes an XLIFF document into the language tree.
    fn write_xlf(&self, name: &str, content: &str) {
        fs::write(self.xliff_root.join("de").join(name), content).expect("write xlf");
    }

    /// Writes the canonical package manifest.
    fn write_manifest(&self, content: &str) {
        fs::write(self.package_dir().join("package.json"), content).expect("write manifest");
    }

    /// Returns the canonical package directory.
    fn package_dir(&self) -> PathBuf {
        self.packages_root.join("slipway-langpack-de")
    }

    /// Returns the synchronizer options for this fixture.
    fn options(&self) -> SyncOptions {
        SyncOptions {
            xliff_root: self.xliff_root.clone(),
            packages_root: self.packages_root.clone(),
            package_prefix: "slipway-langpack".to_string(),
            foreign_prefix: None,
            core_resource: "core".to_string(),
            languages: vec![LanguageId::new("de")],
            extension_allowlist: BTreeSet::new(),
            branding: Branding {
                name_prefix: "slipway-langpack".to_string(),
                display_name: "Slipway Language Pack ({language})".to_string(),
                publisher: "slipway".to_string(),
                license: "MIT".to_string(),
                repository: "https://example.com/slipway/langpacks".to_string(),
                engines: BTreeMap::from([("host".to_string(), "*".to_string())]),
            },
            pseudo: false,
        }
    }
}

/// Reads a file to a string, panicking with its path on failure.
fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

#[tokio::test]
async fn core_and_extension_resources_route_into_their_catalogs() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_xlf(
        "git.de.xlf",
        &xlf_document("extensions/git/src/commands", &[("git.commit", "Committen")]),
    );
    fixture.write_manifest(&manifest(""));

    let summary = Synchronizer::new(fixture.options()).run().await.expect("run");
    assert_eq!(summary.reports.len(), 1);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.reports[0].catalogs_written, 2);

    let main = TranslationCatalog::from_json(&read(
        &fixture.package_dir().join("translations/main.i18n.json"),
    ))
    .expect("main catalog");
    assert!(main.contains_resource("core/workbench/editor"));

    let git = TranslationCatalog::from_json(&read(
        &fixture.package_dir().join("translations/extensions/git.i18n.json"),
    ))
    .expect("git catalog");
    assert!(git.contains_resource("src/commands"));
    assert_eq!(
        git.resource("src/commands").and_then(|messages| messages.get("git.commit")),
        Some(&"Committen".to_string())
    );
}

#[tokio::test]
async fn rerunning_with_identical_inputs_is_byte_identical() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_manifest(&manifest(""));

    let synchronizer = Synchronizer::new(fixture.options());
    synchronizer.run().await.expect("first run");
    let main_path = fixture.package_dir().join("translations/main.i18n.json");
    let manifest_path = fixture.package_dir().join("package.json");
    let first_main = read(&main_path);
    let first_manifest = read(&manifest_path);

    synchronizer.run().await.expect("second run");
    assert_eq!(read(&main_path), first_main);
    assert_eq!(read(&manifest_path), first_manifest);
}

#[tokio::test]
async fn stale_core_keys_are_pruned_and_foreign_keys_preserved() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_manifest(&manifest(""));

    let mut seeded = TranslationCatalog::new();
    seeded.insert_resource(
        "core/removed/view",
        BTreeMap::from([("gone".to_string(), "alt".to_string())]),
    );
    seeded.insert_resource(
        "base/editor",
        BTreeMap::from([("kept".to_string(), "upstream".to_string())]),
    );
    let translations_dir = fixture.package_dir().join("translations");
    fs::create_dir_all(&translations_dir).expect("mkdir");
    fs::write(
        translations_dir.join("main.i18n.json"),
        seeded.to_json_string_with(false).expect("serialize"),
    )
    .expect("seed main catalog");

    Synchronizer::new(fixture.options()).run().await.expect("run");

    let main = TranslationCatalog::from_json(&read(&translations_dir.join("main.i18n.json")))
        .expect("main catalog");
    assert!(!main.contains_resource("core/removed/view"));
    assert!(main.contains_resource("base/editor"));
    assert!(main.contains_resource("core/workbench/editor"));
}

#[tokio::test]
async fn descriptor_gains_branding_and_translation_paths() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_xlf(
        "git.de.xlf",
        &xlf_document("extensions/git/src/commands", &[("git.commit", "Committen")]),
    );
    fixture.write_manifest(&manifest(
        r#"{ "id": "old", "path": "./translations/main.i18n.json" },
           { "id": "stale", "path": "./translations/extensions/removed.i18n.json" }"#,
    ));

    Synchronizer::new(fixture.options()).run().await.expect("run");

    let descriptor =
        PackageDescriptor::from_json(&read(&fixture.package_dir().join("package.json")))
            .expect("descriptor");
    assert_eq!(descriptor.name, "slipway-langpack-de");
    assert_eq!(descriptor.display_name.as_deref(), Some("Slipway Language Pack (German)"));
    assert_eq!(descriptor.publisher.as_deref(), Some("slipway"));

    let contribution = &descriptor.contributes.as_ref().expect("contributes").localizations[0];
    let paths: Vec<(&str, &str)> = contribution
        .translations
        .iter()
        .map(|entry| (entry.id.as_str(), entry.path.as_str()))
        .collect();
    // The stale entry is pruned; the existing main entry keeps its array
    // position with its id overwritten; the extension entry is appended.
    assert_eq!(
        paths,
        vec![
            ("core", "./translations/main.i18n.json"),
            ("git", "./translations/extensions/git.i18n.json"),
        ]
    );
}

#[tokio::test]
async fn parse_failures_block_all_writes_for_the_language() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_xlf("broken.de.xlf", "<xliff><file original=\"a/b\">");
    let original_manifest = manifest("");
    fixture.write_manifest(&original_manifest);

    let summary = Synchronizer::new(fixture.options()).run().await.expect("run");
    assert!(summary.reports.is_empty());
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(summary.failures[0].error, SyncError::ParseBatch { .. }));

    // Nothing was written: no catalogs, untouched manifest.
    assert!(!fixture.package_dir().join("translations/main.i18n.json").exists());
    assert_eq!(read(&fixture.package_dir().join("package.json")), original_manifest);
}

#[tokio::test]
async fn missing_localization_contribution_aborts_the_run() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_manifest(r#"{ "name": "legacy-langpack-de", "contributes": {} }"#);

    let err = Synchronizer::new(fixture.options()).run().await.unwrap_err();
    assert!(matches!(err, SyncError::Descriptor(_)));
}

#[tokio::test]
async fn branded_sibling_is_migrated_into_place() {
    let fixture = Fixture::new();
    fixture.write_xlf(
        "core.de.xlf",
        &xlf_document("src/core/workbench/editor", &[("editor.title", "Bearbeiter")]),
    );
    fixture.write_xlf(
        "git.de.xlf",
        &xlf_document("extensions/git/src/commands", &[("git.commit", "Committen")]),
    );

    // Canonical package: manifest plus a doc file that must be carried over.
    fixture.write_manifest(&manifest(""));
    fs::write(fixture.package_dir().join("README.md"), "# canonical docs\n").expect("write");

    // Foreign sibling: its own manifest, a stray archive, and extension
    // translations with and without retention grounds.
    let foreign_dir = fixture.packages_root.join("upstream-langpack-de");
    let foreign_extensions = foreign_dir.join("translations/extensions");
    fs::create_dir_all(&foreign_extensions).expect("mkdir");
    fs::write(foreign_dir.join("package.json"), manifest("")).expect("write");
    fs::write(foreign_dir.join("upstream-langpack-de.zip"), b"archive").expect("write");
    fs::write(foreign_extensions.join("git.i18n.json"), "{}").expect("write");
    fs::write(foreign_extensions.join("allowed.i18n.json"), "{}").expect("write");
    fs::write(foreign_extensions.join("orphan.i18n.json"), "{}").expect("write");

    let mut options = fixture.options();
    options.foreign_prefix = Some("upstream-langpack".to_string());
    options.extension_allowlist = BTreeSet::from(["allowed".to_string()]);

    Synchronizer::new(options).run().await.expect("run");

    let package_dir = fixture.package_dir();
    assert!(!fixture.packages_root.join("upstream-langpack-de").exists());
    assert!(package_dir.is_dir());
    // Docs carried over; archive dropped; retention rules applied.
    assert_eq!(read(&package_dir.join("README.md")), "# canonical docs\n");
    assert!(!package_dir.join("upstream-langpack-de.zip").exists());
    assert!(package_dir.join("translations/extensions/git.i18n.json").exists());
    assert!(package_dir.join("translations/extensions/allowed.i18n.json").exists());
    assert!(!package_dir.join("translations/extensions/orphan.i18n.json").exists());
}
