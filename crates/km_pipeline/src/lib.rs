//! km_pipeline: deterministic pipeline surface (load → validate → solve → build result).
//! This crate stays free of direct file formats and delegates JSON/hashing to
//! `km_io` and the math to `km_algo`.

use std::fmt;
use std::path::Path;

use km_core::Params;
use km_io::loader::{self, LoadedDataset};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod validate;
pub mod solve;
pub mod build_result;
pub mod compare;

pub use build_result::build_result;
pub use compare::{compare_methods, ComparisonDoc, ComparisonRow};
pub use solve::{solve, SolveOutcome};
pub use validate::{validate, Severity, ValidationIssue, ValidationReport};

/// Engine identifiers echoed into every result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Pipeline context: the dataset is already loaded and validated by km_io.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub dataset: LoadedDataset,
    pub params: Params,
    pub engine_meta: EngineMeta,
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub result: ResultDoc,
    pub validation: ValidationReport,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Validate(String),
    Solve(String),
    Build(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Solve(m) => write!(f, "solve: {m}"),
            PipelineError::Build(m) => write!(f, "build: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<km_io::IoError> for PipelineError {
    fn from(e: km_io::IoError) -> Self {
        use km_io::IoError;
        match e {
            IoError::Path(m) => PipelineError::Io(format!("path: {m}")),
            IoError::Json { pointer, msg } => PipelineError::Validate(format!("json {pointer}: {msg}")),
            IoError::Invalid(m) => PipelineError::Validate(m),
            IoError::Hash(m) => PipelineError::Build(format!("hash: {m}")),
        }
    }
}

impl From<km_algo::KemenyError> for PipelineError {
    fn from(e: km_algo::KemenyError) -> Self {
        PipelineError::Solve(e.to_string())
    }
}

// ---------------------------------- Result document ----------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDoc {
    pub id: String, // "RES:<hex64>"
    #[serde(flatten)]
    pub body: ResultBody,
}

/// Everything in the result except its id; the id is the hash of this body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBody {
    pub engine: EngineMeta,
    pub method: String,
    pub weighting: String,
    pub sort_order: String,
    pub order: Vec<OrderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniform_weights: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_weights: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_matrix: Option<Vec<CostRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<EntropyBlock>,
    pub pareto: ParetoBlock,
    pub dataset: DatasetBlock,
}

/// One alternative in the consensus order (best first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub alternative: String,
    pub rank: u32,
    /// Kemeny: the rank itself. Rank-sum: Σ voters · rank.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub alternative: String,
    pub costs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyBlock {
    pub mode: String,
    pub positions: Vec<EntropyPosition>,
    pub max_entropy: f64,
    pub theoretical_max: f64,
    /// All positions unanimous; weights fell back to uniform.
    pub degenerate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyPosition {
    pub position: u32,
    pub entropy: f64,
    pub normalized: f64,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParetoBlock {
    pub optimal: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub input_sha256: String,
    pub alternatives: Vec<String>,
    pub entries: usize,
    pub total_voters: u64,
}

// -------------------------------------- Public API --------------------------------------

/// Orchestrate validate → solve → build with a preloaded context.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    info!(method = %ctx.params.method, "pipeline: validate");
    let validation = validate::validate(&ctx.dataset.profile, &ctx.params);
    for issue in validation.issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!(code = issue.code, "{}", issue.message);
    }
    if !validation.pass {
        return Err(PipelineError::Validate(validation.first_error_message()));
    }

    info!(m = ctx.dataset.profile.alternative_count(), "pipeline: solve");
    let outcome = solve::solve(&ctx.dataset.profile, &ctx.params)?;

    info!("pipeline: build result");
    let result = build_result::build_result(&ctx.dataset, &ctx.params, &ctx.engine_meta, &outcome)?;

    Ok(PipelineOutputs { result, validation })
}

/// Convenience entry: load the dataset from `path`, then run the pipeline.
pub fn run_from_path<P: AsRef<Path>>(path: P, params: Params) -> Result<PipelineOutputs, PipelineError> {
    let dataset = loader::load_dataset(path.as_ref())?;
    run_with_ctx(PipelineCtx { dataset, params, engine_meta: engine_identifiers() })
}

/// Engine identifiers for use in result documents.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "km".to_string(),
        name: "kemeny_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "dev".to_string(),
    }
}
