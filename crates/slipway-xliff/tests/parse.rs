// crates/slipway-xliff/tests/parse.rs
// ============================================================================
// Module: XLIFF Parsing Tests
// Description: Verifies resolution of XLIFF 1.2 documents into message maps.
// ============================================================================
//! ## Overview
//! Ensures XLIFF ingestion resolves file paths and message maps, fails closed
//! on untranslated units, and derives pseudo-localized targets on demand.

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

use slipway_xliff::ParseMode;
use slipway_xliff::XliffError;
use slipway_xliff::parse;
use slipway_xliff::pseudo_localize;
use slipway_xliff::split_file_name;

/// A two-file document covering core and extension resources.
const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="src/core/workbench/editor" source-language="en" target-language="de" datatype="plaintext">
    <body>
      <trans-unit id="editor.title">
        <source xml:lang="en">Editor</source>
        <target>Bearbeiter</target>
      </trans-unit>
      <trans-unit id="editor.close">
        <source xml:lang="en">Close &amp; Save</source>
        <target>Schlie&#223;en &amp; Speichern</target>
      </trans-unit>
    </body>
  </file>
  <file original="extensions/git/src/commands" source-language="en" target-language="de" datatype="plaintext">
    <body>
      <trans-unit id="git.commit">
        <source xml:lang="en">Commit</source>
        <target>Committen</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

#[test]
fn parse_resolves_each_file_element() {
    let files = parse(SAMPLE, ParseMode::Translated).expect("parse");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].original_path, "src/core/workbench/editor");
    assert_eq!(files[1].original_path, "extensions/git/src/commands");
}

#[test]
fn parse_collects_messages_by_unit_id() {
    let files = parse(SAMPLE, ParseMode::Translated).expect("parse");
    assert_eq!(files[0].messages.get("editor.title").map(String::as_str), Some("Bearbeiter"));
    assert_eq!(files[1].messages.get("git.commit").map(String::as_str), Some("Committen"));
}

#[test]
fn parse_unescapes_entities_in_targets() {
    let files = parse(SAMPLE, ParseMode::Translated).expect("parse");
    assert_eq!(
        files[0].messages.get("editor.close").map(String::as_str),
        Some("Schließen & Speichern")
    );
}

#[test]
fn parse_rejects_untranslated_unit() {
    let missing = r#"<xliff version="1.2">
  <file original="src/core/common/labels" source-language="en" target-language="fr">
    <body>
      <trans-unit id="label.ok"><source>OK</source></trans-unit>
    </body>
  </file>
</xliff>"#;
    let err = parse(missing, ParseMode::Translated).unwrap_err();
    assert!(matches!(err, XliffError::MissingTarget { id } if id == "label.ok"));
}

#[test]
fn parse_rejects_empty_target() {
    let empty = r#"<xliff version="1.2">
  <file original="src/core/common/labels" source-language="en" target-language="fr">
    <body>
      <trans-unit id="label.ok"><source>OK</source><target></target></trans-unit>
    </body>
  </file>
</xliff>"#;
    let err = parse(empty, ParseMode::Translated).unwrap_err();
    assert!(matches!(err, XliffError::MissingTarget { .. }));
}

#[test]
fn parse_rejects_file_without_original() {
    let nameless = r#"<xliff version="1.2">
  <file source-language="en" target-language="fr"><body></body></file>
</xliff>"#;
    let err = parse(nameless, ParseMode::Translated).unwrap_err();
    assert!(matches!(
        err,
        XliffError::MissingAttribute {
            element: "file",
            attribute: "original",
        }
    ));
}

#[test]
fn parse_rejects_malformed_xml() {
    let err = parse("<xliff><file original=\"a/b\">", ParseMode::Translated).unwrap_err();
    assert!(matches!(err, XliffError::Xml(_)));
}

#[test]
fn pseudo_mode_derives_targets_from_sources() {
    let missing_targets = r#"<xliff version="1.2">
  <file original="src/core/common/labels" source-language="en">
    <body>
      <trans-unit id="label.open"><source>Open File</source></trans-unit>
    </body>
  </file>
</xliff>"#;
    let files = parse(missing_targets, ParseMode::Pseudo).expect("parse");
    assert_eq!(
        files[0].messages.get("label.open").map(String::as_str),
        Some("\u{ff3b}Opeen Fiilee\u{ff3d}")
    );
}

#[test]
fn pseudo_localize_doubles_vowels_and_brackets() {
    assert_eq!(pseudo_localize("abc"), "\u{ff3b}aabc\u{ff3d}");
    assert_eq!(pseudo_localize(""), "\u{ff3b}\u{ff3d}");
}

#[test]
fn split_file_name_handles_dotted_resources() {
    assert_eq!(split_file_name("core.de.xlf"), Some(("core", "de")));
    assert_eq!(split_file_name("vendor.theme-dark.zh-hans.xlf"), Some(("vendor.theme-dark", "zh-hans")));
    assert_eq!(split_file_name("core.xlf"), None);
    assert_eq!(split_file_name("core.de.json"), None);
    assert_eq!(split_file_name(".de.xlf"), None);
}
