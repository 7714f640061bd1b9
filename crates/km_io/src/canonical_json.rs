//! Canonical JSON: compact, object keys in byte order, arrays untouched, no
//! trailing newline. Result ids hash exactly these bytes, so every artifact
//! goes through here.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::{IoError, IoResult};

/// Canonical bytes of an already-parsed JSON value.
pub fn to_canonical_json_bytes(v: &Value) -> IoResult<Vec<u8>> {
    Ok(serde_json::to_vec(&sorted(v))?)
}

/// Canonical bytes of any serializable value.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    to_canonical_json_bytes(&serde_json::to_value(value)?)
}

/// Canonical JSON written atomically to `path`.
pub fn write_canonical_file<T: Serialize>(path: &Path, value: &T) -> IoResult<()> {
    let bytes = to_canonical_bytes(value)?;
    write_atomic(path, &bytes).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))
}

/// Replace `path` with `bytes` via a sibling temp file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = sibling_tmp(dir, path);
    let written = write_synced(&tmp, bytes, true).and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        // Rename can fail across devices; fall back to an in-place write.
        let _ = fs::remove_file(&tmp);
        write_synced(path, bytes, false)?;
    }
    sync_dir(dir);
    Ok(())
}

/// Recursively rebuild `v` with object keys in byte order.
fn sorted(v: &Value) -> Value {
    match v {
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        Value::Object(map) => {
            let ordered: BTreeMap<&String, Value> = map.iter().map(|(k, x)| (k, sorted(x))).collect();
            Value::Object(ordered.into_iter().map(|(k, x)| (k.clone(), x)).collect())
        }
        other => other.clone(),
    }
}

fn write_synced(path: &Path, bytes: &[u8], fresh: bool) -> io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if fresh {
        opts.create_new(true);
    } else {
        opts.create(true).truncate(true);
    }
    let mut f = opts.open(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

/// `<dir>/.<name>.<pid>.<seq>.tmp`; the counter keeps concurrent writers apart.
fn sibling_tmp(dir: &Path, target: &Path) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("out");
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(d) = fs::File::open(dir) {
        let _ = d.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_are_sorted_arrays_preserved() {
        let v = json!({
            "order": [ {"rank":1,"alternative":"B"}, 3, "z" ],
            "method": "classic",
            "cost": { "total": 144, "matrix": [] }
        });
        let s = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(
            s,
            r#"{"cost":{"matrix":[],"total":144},"method":"classic","order":[{"alternative":"B","rank":1},3,"z"]}"#
        );
    }

    #[test]
    fn strings_are_escaped_and_no_trailing_newline() {
        let v = json!({"title":"a \"quoted\"\nline"});
        let bytes = to_canonical_json_bytes(&v).unwrap();
        assert_eq!(bytes, br#"{"title":"a \"quoted\"\nline"}"#.to_vec());
        assert!(!bytes.ends_with(b"\n"));
    }
}
