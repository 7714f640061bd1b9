//! End-to-end pipeline runs from dataset files.

use std::path::PathBuf;

use km_core::{AdaptiveMode, Method, Params, WeightScheme};
use km_pipeline::{run_from_path, PipelineError};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/profile_example.json")
}

#[test]
fn reference_fixture_classic() {
    let out = run_from_path(fixture(), Params::default()).unwrap();
    let body = &out.result.body;
    assert_eq!(body.method, "classic");
    assert_eq!(body.total_cost, Some(144.0));
    assert_eq!(body.order.iter().map(|o| o.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(body.dataset.title.as_deref(), Some("Reference profile: 3 alternatives, 60 voters"));
    assert!(out.validation.pass);
}

#[test]
fn unanimous_dataset_adaptive_matches_classic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unanimous.json");
    std::fs::write(
        &path,
        br#"{"alternatives":["P","Q","R","S"],"rankings":[
            {"order":["R","P","S","Q"],"voters":7},
            {"order":["R","P","S","Q"],"voters":2}]}"#,
    )
    .unwrap();

    let classic = run_from_path(&path, Params::default()).unwrap().result.body;
    for mode in [AdaptiveMode::ConflictFocus, AdaptiveMode::ConsensusFocus] {
        let params = Params { method: Method::Adaptive, adaptive_mode: mode, ..Params::default() };
        let adaptive = run_from_path(&path, params).unwrap().result.body;
        assert_eq!(adaptive.order, classic.order);
        assert_eq!(adaptive.total_cost, classic.total_cost);
        assert_eq!(adaptive.weighting, "uniform");
        assert!(adaptive.entropy.as_ref().unwrap().degenerate);
    }
}

#[test]
fn invalid_params_stop_before_solving() {
    let params = Params {
        method: Method::PositionWeighted,
        weighting: WeightScheme::Exponential,
        alpha: f64::NAN,
        ..Params::default()
    };
    match run_from_path(fixture(), params) {
        Err(PipelineError::Validate(msg)) => assert!(msg.contains("alpha")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn missing_dataset_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_from_path(dir.path().join("missing.json"), Params::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}
