// crates/slipway-core/src/runtime/reconcile.rs
// ============================================================================
// Module: Descriptor Reconciliation
// Description: Folds merge results into a language package's manifest.
// Purpose: Keep descriptor translation references consistent with disk state.
// Dependencies: crate::core, tracing
// ============================================================================

//! ## Overview
//! Reconciliation runs only after a successful catalog merge: product
//! identity is rewritten from the branding table, the localization
//! contribution is validated and its language id normalized, stale
//! translation references are pruned, and the new translation-path records
//! are upserted before the manifest is persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use crate::core::descriptor::Branding;
use crate::core::descriptor::PackageDescriptor;
use crate::core::descriptor::TranslationPathRecord;
use crate::core::language::LanguageId;
use crate::runtime::sync::SyncError;
use crate::runtime::sync::io_error;

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Reconciles a package descriptor against the merge results.
///
/// # Errors
///
/// Returns [`SyncError`] when the manifest cannot be read, parsed, validated,
/// or written back.
pub(crate) fn reconcile_descriptor(
    package_dir: &Path,
    language: &LanguageId,
    branding: &Branding,
    records: &[TranslationPathRecord],
) -> Result<(), SyncError> {
    let manifest_path = package_dir.join("package.json");
    let text = fs::read_to_string(&manifest_path).map_err(|err| io_error(&manifest_path, &err))?;
    let mut descriptor = PackageDescriptor::from_json(&text)?;

    descriptor.apply_branding(branding, language);

    let contribution = descriptor.primary_localization()?;
    contribution.language_id = LanguageId::new(&contribution.language_id).to_string();

    let before = contribution.translations.len();
    contribution.translations.retain(|entry| package_dir.join(&entry.path).is_file());
    let pruned = before - contribution.translations.len();
    if pruned > 0 {
        tracing::debug!(language = %language, pruned, "removed stale translation references");
    }

    for record in records {
        contribution.upsert_translation(record);
    }

    let rendered = descriptor.to_json_string()?;
    fs::write(&manifest_path, rendered).map_err(|err| io_error(&manifest_path, &err))?;
    tracing::debug!(language = %language, records = records.len(), "descriptor reconciled");
    Ok(())
}
