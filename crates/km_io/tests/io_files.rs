//! File-level tests: fixture loading, params files, atomic canonical writes.

use std::path::PathBuf;

use assert_json_diff::assert_json_eq;
use km_io::canonical_json::write_canonical_file;
use km_io::hasher::{sha256_file, sha256_hex};
use km_io::loader::load_dataset;
use km_io::params::load_params;
use km_io::IoError;
use serde_json::{json, Value};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/profile_example.json")
}

#[test]
fn loads_reference_fixture() {
    let ds = load_dataset(&fixture()).unwrap();
    assert_eq!(ds.profile.alternative_count(), 3);
    assert_eq!(ds.profile.len(), 5);
    assert_eq!(ds.profile.total_voters(), 60);
    assert_eq!(ds.title.as_deref(), Some("Reference profile: 3 alternatives, 60 voters"));
    assert_eq!(ds.input_sha256, sha256_file(&fixture()).unwrap());
}

#[test]
fn missing_file_is_path_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, IoError::Path(_)));
}

#[test]
fn params_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("params.json");
    std::fs::write(&p, br#"{"method":"position_weighted","weighting":"exponential","alpha":1.25}"#).unwrap();
    let params = load_params(&p).unwrap();
    assert_eq!(params.method.as_str(), "position_weighted");
    assert_eq!(params.alpha, 1.25);
    assert_eq!(params.top_k, 3);
}

#[test]
fn canonical_write_is_sorted_and_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("result.json");
    let doc = json!({
        "total_cost": 144.0,
        "method": "classic",
        "order": [{"alternative": "A", "rank": 1}]
    });
    write_canonical_file(&out, &doc).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(r#"{"method":"classic","order":"#));
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_json_eq!(back, doc);

    // Overwrite in place; no temp files left behind.
    write_canonical_file(&out, &json!({"b": 2, "a": 1})).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), br#"{"a":1,"b":2}"#.to_vec());
    let leftovers: Vec<_> = std::fs::read_dir(out.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert_eq!(sha256_hex(br#"{"a":1,"b":2}"#), sha256_file(&out).unwrap());
}
