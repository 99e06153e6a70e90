// crates/slipway-core/src/core/hashing.rs
// ============================================================================
// Module: Artifact Hashing
// Description: Single-read dual hashing of build artifacts.
// Purpose: Produce SHA-1 and SHA-256 digests plus size in one streamed pass.
// Dependencies: sha1, sha2, tokio
// ============================================================================

//! ## Overview
//! Release artifacts can be large, so the publisher reads each one exactly
//! once: every chunk of the stream feeds both hash accumulators before the
//! next chunk is read. The SHA-1 digest exists for compatibility with older
//! update clients; SHA-256 is the integrity hash of record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::Path;

use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use tokio::io::AsyncReadExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Read chunk size for streamed hashing.
const HASH_CHUNK_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Digest Pair
// ============================================================================

/// Hex-encoded digests and byte size of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDigests {
    /// Lowercase hex SHA-1 digest.
    pub sha1: String,
    /// Lowercase hex SHA-256 digest.
    pub sha256: String,
    /// Total bytes hashed.
    pub size: u64,
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Hashes an in-memory byte sequence with both algorithms.
#[must_use]
pub fn digest_bytes(bytes: &[u8]) -> ArtifactDigests {
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    sha1.update(bytes);
    sha256.update(bytes);
    ArtifactDigests {
        sha1: hex_encode(&sha1.finalize()),
        sha256: hex_encode(&sha256.finalize()),
        size: bytes.len() as u64,
    }
}

/// Hashes a file with both algorithms over a single streamed read.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be opened or read.
pub async fn digest_file(path: &Path) -> Result<ArtifactDigests, io::Error> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut size = 0u64;
    let mut chunk = vec![0u8; HASH_CHUNK_BYTES];
    loop {
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        sha1.update(&chunk[.. read]);
        sha256.update(&chunk[.. read]);
        size += read as u64;
    }
    Ok(ArtifactDigests {
        sha1: hex_encode(&sha1.finalize()),
        sha256: hex_encode(&sha256.finalize()),
        size,
    })
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
