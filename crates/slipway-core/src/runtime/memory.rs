// crates/slipway-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Store Fakes
// Description: Deterministic object-store and record-store implementations.
// Purpose: Exercise the publisher runtime without network backends.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! These fakes keep uploaded blob names and inserted records in memory and can
//! inject a bounded number of failures, which is enough to verify the
//! idempotency short-circuit and the retry policy end to end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::interfaces::AssetRecord;
use crate::interfaces::ObjectStore;
use crate::interfaces::ReleaseRecordStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Object Store Fake
// ============================================================================

/// In-memory [`ObjectStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    /// Blob name to source path of uploaded objects.
    objects: Mutex<BTreeMap<String, PathBuf>>,
    /// Number of upload calls observed.
    upload_calls: AtomicU32,
    /// Number of upcoming upload calls that fail.
    failures_remaining: AtomicU32,
}

impl InMemoryObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing blob, as if a previous run uploaded it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the internal lock is poisoned.
    pub fn seed(&self, name: &str) -> Result<(), StoreError> {
        self.objects
            .lock()
            .map_err(|_| StoreError::Io("object store lock poisoned".to_string()))?
            .insert(name.to_string(), PathBuf::new());
        Ok(())
    }

    /// Makes the next `count` upload calls fail with a backend error.
    pub fn fail_next_uploads(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Returns the number of upload calls observed so far.
    #[must_use]
    pub fn upload_calls(&self) -> u32 {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// Returns the names of all stored blobs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the internal lock is poisoned.
    pub fn blob_names(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| StoreError::Io("object store lock poisoned".to_string()))?
            .keys()
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| StoreError::Io("object store lock poisoned".to_string()))?
            .contains_key(name))
    }

    async fn upload(&self, name: &str, source: &Path) -> Result<(), StoreError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if failing {
            return Err(StoreError::Backend("injected upload failure".to_string()));
        }
        self.objects
            .lock()
            .map_err(|_| StoreError::Io("object store lock poisoned".to_string()))?
            .insert(name.to_string(), source.to_path_buf());
        Ok(())
    }
}

// ============================================================================
// SECTION: Release Record Store Fake
// ============================================================================

/// In-memory [`ReleaseRecordStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryReleaseStore {
    /// Inserted records with their quality channel and commit.
    records: Mutex<Vec<(String, String, AssetRecord)>>,
    /// Number of upcoming insert calls that fail.
    failures_remaining: AtomicU32,
}

impl InMemoryReleaseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` insert calls fail with a backend error.
    pub fn fail_next_inserts(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Returns all inserted records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the internal lock is poisoned.
    pub fn inserted(&self) -> Result<Vec<(String, String, AssetRecord)>, StoreError> {
        Ok(self
            .records
            .lock()
            .map_err(|_| StoreError::Io("record store lock poisoned".to_string()))?
            .clone())
    }
}

#[async_trait]
impl ReleaseRecordStore for InMemoryReleaseStore {
    async fn create_asset(
        &self,
        quality: &str,
        commit: &str,
        record: &AssetRecord,
    ) -> Result<(), StoreError> {
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if failing {
            return Err(StoreError::Backend("injected insert failure".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| StoreError::Io("record store lock poisoned".to_string()))?
            .push((quality.to_string(), commit.to_string(), record.clone()));
        Ok(())
    }
}
