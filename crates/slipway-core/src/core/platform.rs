// crates/slipway-core/src/core/platform.rs
// ============================================================================
// Module: Platform Key Derivation
// Description: Canonical platform keys and artifact type canonicalization.
// Purpose: Map build coordinates onto the fixed release platform taxonomy.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every published artifact is addressed by a canonical platform key derived
//! from its product flavor, operating system, architecture, and artifact
//! type. The mapping is a closed decision table: a combination outside the
//! table is a configuration error and the build must not proceed with it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while deriving a platform key.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The combination is not part of the release taxonomy.
    #[error("unmapped platform combination: product={product} os={os} arch={arch} type={kind}")]
    Unmapped {
        /// Product flavor supplied by the build.
        product: String,
        /// Operating system supplied by the build.
        os: String,
        /// Architecture supplied by the build.
        arch: String,
        /// Artifact type supplied by the build.
        kind: String,
    },
}

/// Builds the unmapped-combination error for the given coordinates.
fn unmapped(product: &str, os: &str, arch: &str, kind: &str) -> PlatformError {
    PlatformError::Unmapped {
        product: product.to_string(),
        os: os.to_string(),
        arch: arch.to_string(),
        kind: kind.to_string(),
    }
}

// ============================================================================
// SECTION: Platform Decision Table
// ============================================================================

/// Derives the canonical platform key for a build artifact.
///
/// # Errors
///
/// Returns [`PlatformError::Unmapped`] for any combination outside the fixed
/// decision table.
pub fn platform_key(
    product: &str,
    os: &str,
    arch: &str,
    kind: &str,
) -> Result<String, PlatformError> {
    match os {
        "win32" => win32_key(product, arch, kind).ok_or_else(|| unmapped(product, os, arch, kind)),
        "linux" => linux_key(product, arch, kind).ok_or_else(|| unmapped(product, os, arch, kind)),
        "darwin" => {
            darwin_key(product, arch, kind).ok_or_else(|| unmapped(product, os, arch, kind))
        }
        _ => Err(unmapped(product, os, arch, kind)),
    }
}

/// Windows client installers keep the bare architecture key for the 32-bit
/// default; other architectures carry an explicit suffix.
fn win32_key(product: &str, arch: &str, kind: &str) -> Option<String> {
    match product {
        "client" => {
            let base = if arch == "ia32" { "win32".to_string() } else { format!("win32-{arch}") };
            match kind {
                "archive" => Some(format!("{base}-archive")),
                "setup" => Some(base),
                "user-setup" => Some(format!("{base}-user")),
                _ => None,
            }
        }
        "server" => {
            if arch == "arm64" {
                return None;
            }
            if arch == "ia32" {
                return Some("server-win32".to_string());
            }
            Some(format!("server-win32-{arch}"))
        }
        "web" => {
            if arch == "arm64" {
                return None;
            }
            if arch == "ia32" {
                return Some("server-win32-web".to_string());
            }
            Some(format!("server-win32-{arch}-web"))
        }
        _ => None,
    }
}

/// Linux keys are driven by artifact type first, product second.
fn linux_key(product: &str, arch: &str, kind: &str) -> Option<String> {
    match kind {
        "snap" => Some(format!("linux-snap-{arch}")),
        "deb-package" => Some(format!("linux-deb-{arch}")),
        "rpm-package" => Some(format!("linux-rpm-{arch}")),
        "archive-unsigned" => match product {
            "client" => Some(format!("linux-{arch}")),
            "server" => Some(format!("server-linux-{arch}")),
            "web" => {
                if arch == "standalone" {
                    return Some("web-standalone".to_string());
                }
                Some(format!("server-linux-{arch}-web"))
            }
            _ => None,
        },
        _ => None,
    }
}

/// macOS clients keep the bare `darwin` key for the x64 default.
fn darwin_key(product: &str, arch: &str, _kind: &str) -> Option<String> {
    match product {
        "client" => {
            if arch == "x64" {
                return Some("darwin".to_string());
            }
            Some(format!("darwin-{arch}"))
        }
        "server" => {
            if arch == "x64" {
                return Some("server-darwin".to_string());
            }
            Some(format!("server-darwin-{arch}"))
        }
        "web" => {
            if arch == "x64" {
                return Some("server-darwin-web".to_string());
            }
            None
        }
        _ => None,
    }
}

// ============================================================================
// SECTION: Type Canonicalization
// ============================================================================

/// Collapses artifact subtypes into the smaller reporting taxonomy.
///
/// Unrecognized subtypes pass through unchanged.
#[must_use]
pub fn real_type(kind: &str) -> &str {
    match kind {
        "user-setup" => "setup",
        "deb-package" | "rpm-package" => "package",
        _ => kind,
    }
}

/// Returns whether artifacts on the platform support fast in-place updates.
///
/// Only Windows platform keys qualify.
#[must_use]
pub fn supports_fast_update(platform: &str) -> bool {
    platform.contains("win32")
}
