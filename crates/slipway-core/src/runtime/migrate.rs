// crates/slipway-core/src/runtime/migrate.rs
// ============================================================================
// Module: Provenance Migration
// Description: Migrates differently-branded sibling packages into place.
// Purpose: Adopt an upstream-branded package as the canonical language pack.
// Dependencies: crate::core, slipway-xliff, tracing
// ============================================================================

//! ## Overview
//! When a sibling package for the same language exists under a different
//! product branding, it is adopted wholesale: stray packaging archives are
//! deleted, per-extension translation files outside the retention rules are
//! pruned, documentation and lock files are carried over from the canonical
//! package, and the sibling directory is renamed into the canonical location.
//! The sequence is destructive and non-transactional; it assumes a single
//! operator and is not safely re-runnable after partial execution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use slipway_xliff::split_file_name;

use crate::core::language::LanguageId;
use crate::runtime::sync::SyncError;
use crate::runtime::sync::SyncOptions;
use crate::runtime::sync::io_error;

// ============================================================================
// SECTION: Migration
// ============================================================================

/// Migrates one language's branded sibling package, if present.
///
/// Returns `true` when a sibling existed and was migrated.
///
/// # Errors
///
/// Returns [`SyncError::Io`] on any filesystem failure; partial progress is
/// left in place.
pub(crate) fn migrate_branded_package(
    options: &SyncOptions,
    foreign_prefix: &str,
    language: &LanguageId,
) -> Result<bool, SyncError> {
    let foreign_dir = options.packages_root.join(format!("{foreign_prefix}-{language}"));
    let canonical_dir =
        options.packages_root.join(format!("{}-{}", options.package_prefix, language));
    if !foreign_dir.is_dir() {
        return Ok(false);
    }

    tracing::info!(language = %language, from = %foreign_dir.display(), "migrating branded sibling package");

    remove_archives(&foreign_dir)?;
    prune_foreign_extensions(options, &foreign_dir, language)?;
    copy_support_files(&canonical_dir, &foreign_dir)?;

    if canonical_dir.exists() {
        fs::remove_dir_all(&canonical_dir).map_err(|err| io_error(&canonical_dir, &err))?;
    }
    fs::rename(&foreign_dir, &canonical_dir).map_err(|err| io_error(&foreign_dir, &err))?;
    Ok(true)
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Deletes stray packaging archives from the sibling directory.
fn remove_archives(dir: &Path) -> Result<(), SyncError> {
    for entry in fs::read_dir(dir).map_err(|err| io_error(dir, &err))? {
        let entry = entry.map_err(|err| io_error(dir, &err))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".zip") || name.ends_with(".tgz") || name.ends_with(".tar.gz") {
            let path = entry.path();
            fs::remove_file(&path).map_err(|err| io_error(&path, &err))?;
            tracing::debug!(path = %path.display(), "removed stray archive");
        }
    }
    Ok(())
}

/// Prunes per-extension translation files outside the retention rules.
///
/// A file is kept when its extension is on the allow-list or when a source
/// XLIFF document for it exists in the current language tree.
fn prune_foreign_extensions(
    options: &SyncOptions,
    foreign_dir: &Path,
    language: &LanguageId,
) -> Result<(), SyncError> {
    let extensions_dir = foreign_dir.join("translations").join("extensions");
    if !extensions_dir.is_dir() {
        return Ok(());
    }

    let sources = xliff_resources(&options.xliff_root.join(language.as_str()));
    for entry in fs::read_dir(&extensions_dir).map_err(|err| io_error(&extensions_dir, &err))? {
        let entry = entry.map_err(|err| io_error(&extensions_dir, &err))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(extension) = name.strip_suffix(".i18n.json") else {
            continue;
        };
        if options.extension_allowlist.contains(extension) || sources.contains(extension) {
            continue;
        }
        let path = entry.path();
        fs::remove_file(&path).map_err(|err| io_error(&path, &err))?;
        tracing::debug!(extension, "pruned translation file without source or allow-list entry");
    }
    Ok(())
}

/// Collects the resource names present in a language's XLIFF tree.
fn xliff_resources(language_dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = fs::read_dir(language_dir) else {
        return BTreeSet::new();
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().to_str().map(ToString::to_string))
        .filter_map(|name| split_file_name(&name).map(|(resource, _)| resource.to_string()))
        .collect()
}

/// Copies documentation and lock files from the canonical package into the
/// sibling. Best effort: a missing canonical directory copies nothing.
fn copy_support_files(canonical_dir: &Path, foreign_dir: &Path) -> Result<(), SyncError> {
    if !canonical_dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(canonical_dir).map_err(|err| io_error(canonical_dir, &err))? {
        let entry = entry.map_err(|err| io_error(canonical_dir, &err))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".md") || name == "package-lock.json" {
            let from = entry.path();
            let to = foreign_dir.join(name);
            fs::copy(&from, &to).map_err(|err| io_error(&from, &err))?;
        }
    }
    Ok(())
}
