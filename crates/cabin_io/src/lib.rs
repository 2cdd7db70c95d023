//! crates/cabin_io/src/lib.rs
//! Local, offline I/O for the cabin draw.
//!
//! - `loader`: draw file (participants, periods, apartments, wishes) → `LoadedDraw`
//! - `manifest`: draw manifest (input path, seed, executed_by, outputs)
//! - `canonical_json`: sorted-key compact JSON + atomic writes
//! - `hasher`: SHA-256 digests and content-derived execution ids
//!
//! No network I/O. One shared error type across modules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for cabin_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Reading an input file failed.
    #[error("read error: {0}")]
    Read(String),

    /// Writing an artifact failed.
    #[error("write error: {0}")]
    Write(String),

    /// JSON parse/serialize error with a pointer-like location hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Manifest shape or offline policy violated.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Draw file is well-formed JSON but semantically invalid.
    #[error("invalid draw file: {0}")]
    Validate(String),

    /// Filesystem / path errors (create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    #[error("hash error: {0}")]
    Hash(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; report the root and the line/column.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod manifest;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    let t = s.trim();
    t.contains("://") || t.starts_with("http:") || t.starts_with("https:")
}
