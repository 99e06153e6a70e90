// crates/slipway-xliff/src/lib.rs
// ============================================================================
// Module: Slipway XLIFF Ingestion
// Description: Event-driven parser for XLIFF 1.2 translation bundles.
// Purpose: Resolve per-resource message maps from localized XLIFF documents.
// Dependencies: quick-xml, thiserror
// ============================================================================

//! ## Overview
//! Slipway ingests translations as XLIFF 1.2 documents, one document per
//! resource and locale (`<resource>.<locale>.xlf`). Each `<file>` element in a
//! document resolves to an original source path and a map from string id to
//! translated text. Parsing is strict: malformed XML, missing mandatory
//! attributes, and untranslated units fail the document rather than silently
//! dropping strings.
//!
//! ## Invariants
//! - A resolved file's `original_path` is taken verbatim from the `original`
//!   attribute of its `<file>` element.
//! - In normal mode every `<trans-unit>` must carry a non-empty `<target>`.
//! - In pseudo mode targets are derived from sources and never read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing an XLIFF document.
#[derive(Debug, Error)]
pub enum XliffError {
    /// The XML stream was malformed.
    #[error("malformed xliff document: {0}")]
    Xml(String),
    /// A mandatory attribute was absent from an element.
    #[error("xliff element <{element}> is missing the {attribute} attribute")]
    MissingAttribute {
        /// Element that was missing the attribute.
        element: &'static str,
        /// Attribute name that was expected.
        attribute: &'static str,
    },
    /// A translation unit carried no target text.
    #[error("translation unit {id} has no target text")]
    MissingTarget {
        /// Identifier of the untranslated unit.
        id: String,
    },
    /// A translation unit appeared outside a `<file>` element.
    #[error("translation unit {id} appeared outside a file element")]
    OrphanUnit {
        /// Identifier of the misplaced unit.
        id: String,
    },
}

// ============================================================================
// SECTION: Resolved Output
// ============================================================================

/// One `<file>` element resolved into a message map.
///
/// # Invariants
/// - `original_path` encodes `<domain>/<relative-resource-path>`.
/// - `messages` is ordered by string id for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Original source path recorded by the localization export.
    pub original_path: String,
    /// Map from string id to translated text.
    pub messages: BTreeMap<String, String>,
}

/// Parse mode selecting real or pseudo-localized targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Read `<target>` elements; untranslated units are an error.
    Translated,
    /// Derive targets from `<source>` text with pseudo-localization markers.
    Pseudo,
}

// ============================================================================
// SECTION: File Name Helpers
// ============================================================================

/// Splits an XLIFF file name into its resource and locale parts.
///
/// File names follow `<resource>.<locale>.xlf`; the resource part may itself
/// contain dots, so the locale is the last dot-separated segment before the
/// extension. Returns `None` when the name does not match the convention.
#[must_use]
pub fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name.strip_suffix(".xlf")?;
    let (resource, locale) = stem.rsplit_once('.')?;
    if resource.is_empty() || locale.is_empty() {
        return None;
    }
    Some((resource, locale))
}

// ============================================================================
// SECTION: Parser State
// ============================================================================

/// Accumulator for the `<file>` element currently being parsed.
struct FileFrame {
    /// Value of the element's `original` attribute.
    original_path: String,
    /// Messages resolved so far for this file.
    messages: BTreeMap<String, String>,
}

/// Accumulator for the `<trans-unit>` element currently being parsed.
struct UnitFrame {
    /// Value of the unit's `id` attribute.
    id: String,
    /// Collected `<source>` text.
    source: String,
    /// Collected `<target>` text, if any was present.
    target: Option<String>,
}

/// Which text-bearing child element is currently open.
enum Capture {
    /// No text capture in progress.
    None,
    /// Inside a `<source>` element.
    Source,
    /// Inside a `<target>` element.
    Target,
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses an XLIFF 1.2 document into resolved message files.
///
/// # Errors
///
/// Returns [`XliffError`] when the document is malformed, a `<file>` lacks an
/// `original` attribute, a `<trans-unit>` lacks an `id`, or (in
/// [`ParseMode::Translated`]) a unit carries no target text.
pub fn parse(content: &str, mode: ParseMode) -> Result<Vec<ResolvedFile>, XliffError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut resolved = Vec::new();
    let mut file: Option<FileFrame> = None;
    let mut unit: Option<UnitFrame> = None;
    let mut capture = Capture::None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"file" => {
                    let original_path = required_attribute(&element, "file", "original")?;
                    file = Some(FileFrame {
                        original_path,
                        messages: BTreeMap::new(),
                    });
                }
                b"trans-unit" => {
                    let id = required_attribute(&element, "trans-unit", "id")?;
                    if file.is_none() {
                        return Err(XliffError::OrphanUnit {
                            id,
                        });
                    }
                    unit = Some(UnitFrame {
                        id,
                        source: String::new(),
                        target: None,
                    });
                }
                b"source" if unit.is_some() => capture = Capture::Source,
                b"target" if unit.is_some() => {
                    capture = Capture::Target;
                    if let Some(active) = unit.as_mut() {
                        active.target.get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                let value = text.unescape().map_err(|err| XliffError::Xml(err.to_string()))?;
                if let Some(active) = unit.as_mut() {
                    match capture {
                        Capture::Source => active.source.push_str(&value),
                        Capture::Target => {
                            if let Some(target) = active.target.as_mut() {
                                target.push_str(&value);
                            }
                        }
                        Capture::None => {}
                    }
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"source" | b"target" => capture = Capture::None,
                b"trans-unit" => {
                    if let (Some(finished), Some(frame)) = (unit.take(), file.as_mut()) {
                        let message = resolve_target(finished, mode)?;
                        frame.messages.insert(message.0, message.1);
                    }
                }
                b"file" => {
                    if let Some(frame) = file.take() {
                        resolved.push(ResolvedFile {
                            original_path: frame.original_path,
                            messages: frame.messages,
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => {
                if unit.is_some() || file.is_some() {
                    return Err(XliffError::Xml("unexpected end of document".to_string()));
                }
                break;
            }
            Ok(_) => {}
            Err(err) => return Err(XliffError::Xml(err.to_string())),
        }
    }

    Ok(resolved)
}

/// Resolves the final message text for a completed unit.
fn resolve_target(unit: UnitFrame, mode: ParseMode) -> Result<(String, String), XliffError> {
    match mode {
        ParseMode::Pseudo => Ok((unit.id, pseudo_localize(&unit.source))),
        ParseMode::Translated => match unit.target {
            Some(target) if !target.is_empty() => Ok((unit.id, target)),
            _ => Err(XliffError::MissingTarget {
                id: unit.id,
            }),
        },
    }
}

/// Reads a mandatory attribute from an element.
fn required_attribute(
    element: &BytesStart<'_>,
    element_name: &'static str,
    attribute: &'static str,
) -> Result<String, XliffError> {
    for candidate in element.attributes().with_checks(false).flatten() {
        if candidate.key.as_ref() == attribute.as_bytes() {
            let value = candidate
                .unescape_value()
                .map_err(|err| XliffError::Xml(err.to_string()))?;
            return Ok(value.into_owned());
        }
    }
    Err(XliffError::MissingAttribute {
        element: element_name,
        attribute,
    })
}

// ============================================================================
// SECTION: Pseudo-Localization
// ============================================================================

/// Derives a pseudo-localized target from source text.
///
/// Vowels are doubled to stretch the string and the result is wrapped in
/// fullwidth brackets so untranslated output is visually unmistakable while
/// remaining readable.
#[must_use]
pub fn pseudo_localize(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 2);
    out.push('\u{ff3b}');
    for ch in source.chars() {
        out.push(ch);
        if matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u') {
            out.push(ch);
        }
    }
    out.push('\u{ff3d}');
    out
}
