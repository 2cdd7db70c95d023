//! crates/cabin_io/src/hasher.rs
//!
//! SHA-256 digests and content-derived ids.
//! - `sha256_canonical` hashes the canonical JSON of a value (sorted keys).
//! - `sha256_hex` / `sha256_file` hash raw bytes.
//! - Hex digests are lowercase.

#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// Prefix of execution ids.
pub const EXECUTION_ID_PREFIX: &str = "EXE:";

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value).map_err(|e| IoError::Hash(e.to_string()))?;
    Ok(sha256_hex(&bytes))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::Hash(format!("{}: {e}", path.display())))?;
    Ok(sha256_hex(&bytes))
}

/// `EXE:<hex>`: id of an execution record derived from its canonical bytes.
pub fn execution_id_from_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let hex = sha256_canonical(value)?;
    Ok(format!("{EXECUTION_ID_PREFIX}{hex}"))
}

/// True for `EXE:` followed by 64 lowercase hex characters.
pub fn is_execution_id(s: &str) -> bool {
    s.strip_prefix(EXECUTION_ID_PREFIX).is_some_and(|h| {
        h.len() == 64 && h.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}
