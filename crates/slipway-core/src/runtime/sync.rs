// crates/slipway-core/src/runtime/sync.rs
// ============================================================================
// Module: Langpack Synchronizer Runtime
// Description: Batch reconciliation of XLIFF bundles into language packages.
// Purpose: Parse, route, merge, and persist catalogs, then fix descriptors.
// Dependencies: crate::core, slipway-xliff, tokio, tracing, walkdir
// ============================================================================

//! ## Overview
//! One synchronization run processes every configured language: XLIFF
//! documents parse concurrently with full error aggregation, resolved message
//! maps route into the main or per-extension catalogs, catalogs are written,
//! and the package descriptor folds in the resulting translation paths. A
//! language whose parse batch fails writes nothing and leaves its descriptor
//! untouched; other languages still proceed.
//!
//! ## Invariants
//! - No catalog or descriptor is written for a language whose batch recorded
//!   at least one parse failure.
//! - Re-running with identical inputs produces byte-identical catalogs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use slipway_xliff::ParseMode;
use slipway_xliff::ResolvedFile;
use slipway_xliff::parse;
use slipway_xliff::split_file_name;
use thiserror::Error;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::core::catalog::CatalogError;
use crate::core::catalog::CatalogRoute;
use crate::core::catalog::TranslationCatalog;
use crate::core::catalog::route_resource;
use crate::core::descriptor::Branding;
use crate::core::descriptor::DescriptorError;
use crate::core::descriptor::TranslationPathRecord;
use crate::core::language::LanguageId;
use crate::runtime::migrate::migrate_branded_package;
use crate::runtime::reconcile::reconcile_descriptor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the main translation catalog within a package.
const MAIN_CATALOG_NAME: &str = "main.i18n.json";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// One XLIFF document that failed to parse.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    /// Path of the failing document.
    pub path: PathBuf,
    /// Failure description.
    pub message: String,
}

/// Errors raised during a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Filesystem access failed.
    #[error("io error at {path}: {message}")]
    Io {
        /// Path of the failing operation.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// A parse task could not be joined.
    #[error("xliff parse task failed: {0}")]
    Task(String),
    /// One or more XLIFF documents in a language batch failed to parse.
    #[error("language {language}: {} xliff documents failed to parse", .failures.len())]
    ParseBatch {
        /// Language whose batch failed.
        language: LanguageId,
        /// Accumulated per-document failures.
        failures: Vec<ParseFailure>,
    },
    /// Catalog parsing or serialization failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Descriptor parsing, validation, or serialization failed.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Builds a [`SyncError::Io`] from a path and error.
pub(crate) fn io_error(path: &Path, err: &io::Error) -> SyncError {
    SyncError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

// ============================================================================
// SECTION: Options & Reports
// ============================================================================

/// Configuration for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Root directory holding one XLIFF tree per language.
    pub xliff_root: PathBuf,
    /// Root directory holding the language package directories.
    pub packages_root: PathBuf,
    /// Canonical package directory/name prefix (language id is appended).
    pub package_prefix: String,
    /// Differently-branded sibling package prefix migrated into place, if any.
    pub foreign_prefix: Option<String>,
    /// Reserved core resource marker.
    pub core_resource: String,
    /// Languages to synchronize.
    pub languages: Vec<LanguageId>,
    /// Extensions retained during provenance migration.
    pub extension_allowlist: BTreeSet<String>,
    /// Product identity written into descriptors.
    pub branding: Branding,
    /// Parse XLIFF sources in pseudo-localization mode.
    pub pseudo: bool,
}

/// Outcome of the catalog merge stage for one language.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Translation-path records to fold into the descriptor.
    pub records: Vec<TranslationPathRecord>,
    /// Number of catalog files written.
    pub catalogs_written: usize,
}

/// Report for one successfully synchronized language.
#[derive(Debug, Clone)]
pub struct LanguageReport {
    /// Language that was synchronized.
    pub language: LanguageId,
    /// Translation-path records folded into the descriptor.
    pub records: Vec<TranslationPathRecord>,
    /// Number of catalog files written.
    pub catalogs_written: usize,
}

/// Failure of one language batch within an otherwise continuing run.
#[derive(Debug)]
pub struct LanguageFailure {
    /// Language whose batch failed.
    pub language: LanguageId,
    /// The batch error.
    pub error: SyncError,
}

/// Summary of a full synchronization run.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Per-language reports for successful batches.
    pub reports: Vec<LanguageReport>,
    /// Per-language failures for batches that parsed with errors.
    pub failures: Vec<LanguageFailure>,
}

// ============================================================================
// SECTION: Synchronizer
// ============================================================================

/// The langpack synchronization pipeline.
#[derive(Debug)]
pub struct Synchronizer {
    /// Run configuration.
    options: SyncOptions,
}

impl Synchronizer {
    /// Creates a synchronizer for the given options.
    #[must_use]
    pub const fn new(options: SyncOptions) -> Self {
        Self {
            options,
        }
    }

    /// Runs the full pipeline: provenance migration first, then one batch per
    /// configured language.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on fatal failures (I/O, catalog corruption,
    /// descriptor validation). Per-language parse failures do not abort the
    /// run; they are collected in the summary.
    pub async fn run(&self) -> Result<SyncSummary, SyncError> {
        if let Some(foreign_prefix) = self.options.foreign_prefix.clone() {
            for language in &self.options.languages {
                migrate_branded_package(&self.options, &foreign_prefix, language)?;
            }
        }

        let mut summary = SyncSummary::default();
        for language in &self.options.languages {
            match self.sync_language(language).await {
                Ok(report) => summary.reports.push(report),
                Err(error @ SyncError::ParseBatch { .. }) => {
                    tracing::warn!(
                        language = %language,
                        %error,
                        "language batch failed; catalogs and descriptor left untouched"
                    );
                    summary.failures.push(LanguageFailure {
                        language: language.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(summary)
    }

    /// Synchronizes a single language: ingest, merge, reconcile.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ParseBatch`] when any document in the language's
    /// batch failed to parse (nothing is written in that case), or another
    /// [`SyncError`] on fatal failures.
    pub async fn sync_language(&self, language: &LanguageId) -> Result<LanguageReport, SyncError> {
        tracing::info!(language = %language, "synchronizing language package");
        let parsed = self.ingest(language).await?;
        if parsed.is_empty() {
            tracing::warn!(language = %language, "no xliff documents found; nothing to do");
            return Ok(LanguageReport {
                language: language.clone(),
                records: Vec::new(),
                catalogs_written: 0,
            });
        }

        let outcome = self.merge_catalogs(language, &parsed)?;
        reconcile_descriptor(
            &self.package_dir(language),
            language,
            &self.options.branding,
            &outcome.records,
        )?;
        tracing::info!(
            language = %language,
            catalogs = outcome.catalogs_written,
            "language package synchronized"
        );
        Ok(LanguageReport {
            language: language.clone(),
            records: outcome.records,
            catalogs_written: outcome.catalogs_written,
        })
    }

    /// Returns the canonical package directory for a language.
    #[must_use]
    pub fn package_dir(&self, language: &LanguageId) -> PathBuf {
        self.options.packages_root.join(format!("{}-{}", self.options.package_prefix, language))
    }

    /// Parses every XLIFF document for a language concurrently, aggregating
    /// failures instead of short-circuiting on the first.
    async fn ingest(
        &self,
        language: &LanguageId,
    ) -> Result<Vec<(String, ResolvedFile)>, SyncError> {
        let language_dir = self.options.xliff_root.join(language.as_str());
        if !language_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut documents: Vec<PathBuf> = WalkDir::new(&language_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "xlf")
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        documents.sort();

        let mode = if self.options.pseudo { ParseMode::Pseudo } else { ParseMode::Translated };
        let mut tasks = JoinSet::new();
        for path in documents {
            tasks.spawn_blocking(move || parse_document(&path, mode));
        }

        let mut parsed = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(mut resolved)) => parsed.append(&mut resolved),
                Ok(Err(failure)) => failures.push(failure),
                Err(err) => return Err(SyncError::Task(err.to_string())),
            }
        }

        if !failures.is_empty() {
            failures.sort_by(|a, b| a.path.cmp(&b.path));
            return Err(SyncError::ParseBatch {
                language: language.clone(),
                failures,
            });
        }

        parsed.sort_by(|a, b| (&a.0, &a.1.original_path).cmp(&(&b.0, &b.1.original_path)));
        Ok(parsed)
    }

    /// Routes resolved files into catalogs and writes them to the package.
    fn merge_catalogs(
        &self,
        language: &LanguageId,
        parsed: &[(String, ResolvedFile)],
    ) -> Result<MergeOutcome, SyncError> {
        let translations_dir = self.package_dir(language).join("translations");

        let mut main_incoming = TranslationCatalog::new();
        let mut extension_packs: BTreeMap<String, TranslationCatalog> = BTreeMap::new();
        for (resource, file) in parsed {
            match route_resource(resource, &file.original_path, &self.options.core_resource) {
                CatalogRoute::Main {
                    key,
                } => main_incoming.insert_resource(key, file.messages.clone()),
                CatalogRoute::Extension {
                    extension,
                    key,
                } => {
                    extension_packs
                        .entry(extension)
                        .or_default()
                        .insert_resource(key, file.messages.clone());
                }
            }
        }

        let mut records = Vec::new();
        let mut catalogs_written = 0usize;

        let main_path = translations_dir.join(MAIN_CATALOG_NAME);
        let existing = if main_path.is_file() {
            let text = fs::read_to_string(&main_path).map_err(|err| io_error(&main_path, &err))?;
            TranslationCatalog::from_json(&text)?
        } else {
            TranslationCatalog::new()
        };
        let merged =
            TranslationCatalog::merge_main(&existing, &main_incoming, &self.options.core_resource);
        write_text(&main_path, &merged.to_json_string()?)?;
        catalogs_written += 1;
        records.push(TranslationPathRecord {
            id: self.options.core_resource.clone(),
            resource_name: MAIN_CATALOG_NAME.to_string(),
        });

        for (extension, catalog) in &extension_packs {
            let resource_name = format!("extensions/{extension}.i18n.json");
            write_text(&translations_dir.join(&resource_name), &catalog.to_json_string()?)?;
            catalogs_written += 1;
            records.push(TranslationPathRecord {
                id: extension.clone(),
                resource_name,
            });
        }

        Ok(MergeOutcome {
            records,
            catalogs_written,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses one XLIFF document, tagging each resolved file with its resource.
fn parse_document(
    path: &Path,
    mode: ParseMode,
) -> Result<Vec<(String, ResolvedFile)>, ParseFailure> {
    let failure = |message: String| ParseFailure {
        path: path.to_path_buf(),
        message,
    };
    let file_name = path
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| failure("file name is not valid utf-8".to_string()))?;
    let (resource, _locale) = split_file_name(file_name).ok_or_else(|| {
        failure("file name does not match <resource>.<locale>.xlf".to_string())
    })?;
    let content = fs::read_to_string(path).map_err(|err| failure(err.to_string()))?;
    let resolved = parse(&content, mode).map_err(|err| failure(err.to_string()))?;
    Ok(resolved.into_iter().map(|file| (resource.to_string(), file)).collect())
}

/// Writes text to a path, creating parent directories as needed.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error(parent, &err))?;
    }
    fs::write(path, text).map_err(|err| io_error(path, &err))
}
