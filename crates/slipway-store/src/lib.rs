// crates/slipway-store/src/lib.rs
// ============================================================================
// Module: Slipway Store Library
// Description: Concrete storage backends for the asset publisher.
// Purpose: Provide S3 object stores and the HTTP release metadata client.
// Dependencies: crate::{docdb, s3}
// ============================================================================

//! ## Overview
//! `slipway-store` implements the publisher's storage interfaces against real
//! backends: S3-compatible object storage for blob replication and an HTTP
//! release metadata service for asset records. The publisher runtime itself
//! never sees these types except through the `slipway-core` traits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod docdb;
pub mod s3;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use docdb::HttpReleaseStore;
pub use docdb::ReleaseDbConfig;
pub use s3::S3ObjectStore;
pub use s3::S3StoreConfig;
