//! crates/km_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: UTF-8, **sorted object keys**, array order preserved.
//! - `RES:` ids derive from canonical bytes of the result body.
//! - Hex digests are **lowercase**.
//!
//! Use `sha256_canonical(..)` for JSON **values/structs** (goes through
//! canonical_json) and `sha256_hex(..)` / `sha256_file(..)` for **raw bytes/files**.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use km_core::ids::ResultId;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical_json::{to_canonical_bytes, to_canonical_json_bytes};
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// SHA-256 over a **canonical JSON Value** (already parsed).
pub fn sha256_canonical_value(v: &Value) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_json_bytes(v)?))
}

/// SHA-256 over a reader stream (raw, not canonicalized).
pub fn sha256_stream<R: Read>(reader: &mut R) -> IoResult<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    sha256_stream(&mut BufReader::new(f))
}

/// `RES:<hex>` derived from **canonical** bytes of `value`.
pub fn res_id_from_canonical<T: Serialize>(value: &T) -> IoResult<ResultId> {
    let hex = sha256_canonical(value)?;
    ResultId::from_digest(&hex).map_err(|e| IoError::Hash(e.to_string()))
}
