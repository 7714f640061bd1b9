//! km_report: report model and renderers.
//!
//! The model is built from canonical artifacts (`result.json`,
//! `comparison.json`) only. No recomputation: every field is echoed from the
//! artifact, with numbers pre-formatted so renderers never disagree.

#![deny(unsafe_code)]

use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_text")]
pub mod render_text;

#[cfg(feature = "render_json")]
pub use render_json::{render_comparison_json, render_report_json};
#[cfg(feature = "render_text")]
pub use render_text::{render_comparison_text, render_report_text};

/* ---------------------------------- Errors ---------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Required field missing at the given JSON pointer.
    Missing(String),
    /// Field present but of the wrong JSON type.
    WrongType(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Missing(p) => write!(f, "missing field {p}"),
            ReportError::WrongType(p) => write!(f, "unexpected type at {p}"),
        }
    }
}

impl std::error::Error for ReportError {}

pub type ReportResult<T> = Result<T, ReportError>;

/* ---------------------------------- Model ---------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub cover: CoverBlock,
    pub outcome: OutcomeBlock,
    pub weights: Option<Vec<WeightLine>>,
    pub cost_matrix: Option<Vec<CostLine>>,
    pub entropy: Option<EntropySection>,
    pub pareto: ParetoSection,
    pub footer: FooterIntegrity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverBlock {
    pub title: Option<String>,
    pub source: Option<String>,
    pub method: String,
    pub weighting: String,
    pub alternatives: Vec<String>,
    pub entries: u64,
    pub total_voters: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeBlock {
    pub sort_order: String,
    pub lines: Vec<OrderLine>,
    pub total_cost: Option<String>,
    pub uniform_weights: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub rank: u64,
    pub alternative: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightLine {
    pub position: u64,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub alternative: String,
    pub costs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropySection {
    pub mode: String,
    pub degenerate: bool,
    pub max_entropy: String,
    pub theoretical_max: String,
    pub positions: Vec<EntropyLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyLine {
    pub position: u64,
    pub entropy: String,
    pub normalized: String,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoSection {
    pub optimal: Vec<String>,
    pub dominating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterIntegrity {
    pub result_id: String,
    pub input_sha256: String,
    pub engine: String,
}

/// Side-by-side view of `comparison.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonModel {
    pub title: Option<String>,
    pub rows: Vec<ComparisonLine>,
    pub kemeny_orders_agree: bool,
    pub footer: FooterIntegrity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonLine {
    pub method: String,
    pub weighting: String,
    /// Alternatives joined with `" > "`, best first.
    pub order: String,
    pub total_cost: Option<String>,
}

/* ------------------------------ JSON accessors ------------------------------ */

fn at<'a>(v: &'a Value, ptr: &str) -> ReportResult<&'a Value> {
    match v.pointer(ptr) {
        Some(Value::Null) | None => Err(ReportError::Missing(ptr.to_string())),
        Some(x) => Ok(x),
    }
}

fn j_str(v: &Value, ptr: &str) -> ReportResult<String> {
    at(v, ptr)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ReportError::WrongType(ptr.to_string()))
}

fn j_opt_str(v: &Value, ptr: &str) -> Option<String> {
    v.pointer(ptr).and_then(Value::as_str).map(str::to_string)
}

fn j_u64(v: &Value, ptr: &str) -> ReportResult<u64> {
    at(v, ptr)?.as_u64().ok_or_else(|| ReportError::WrongType(ptr.to_string()))
}

fn j_f64(v: &Value, ptr: &str) -> ReportResult<f64> {
    at(v, ptr)?.as_f64().ok_or_else(|| ReportError::WrongType(ptr.to_string()))
}

fn j_bool(v: &Value, ptr: &str) -> ReportResult<bool> {
    at(v, ptr)?.as_bool().ok_or_else(|| ReportError::WrongType(ptr.to_string()))
}

fn j_arr<'a>(v: &'a Value, ptr: &str) -> ReportResult<&'a Vec<Value>> {
    at(v, ptr)?.as_array().ok_or_else(|| ReportError::WrongType(ptr.to_string()))
}

fn j_str_list(v: &Value, ptr: &str) -> ReportResult<Vec<String>> {
    j_arr(v, ptr)?
        .iter()
        .enumerate()
        .map(|(i, x)| {
            x.as_str()
                .map(str::to_string)
                .ok_or_else(|| ReportError::WrongType(format!("{ptr}/{i}")))
        })
        .collect()
}

/* -------------------------------- Formatting -------------------------------- */

/// Locale-neutral number formatting: integers without decimals, everything
/// else with four. Non-finite values render as `"-"`.
pub fn fmt_num(x: f64) -> String {
    if !x.is_finite() {
        return "-".to_string();
    }
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        format!("{x:.4}")
    }
}

/* --------------------------------- Mappers --------------------------------- */

fn map_cover(r: &Value) -> ReportResult<CoverBlock> {
    Ok(CoverBlock {
        title: j_opt_str(r, "/dataset/title"),
        source: j_opt_str(r, "/dataset/source"),
        method: j_str(r, "/method")?,
        weighting: j_str(r, "/weighting")?,
        alternatives: j_str_list(r, "/dataset/alternatives")?,
        entries: j_u64(r, "/dataset/entries")?,
        total_voters: j_u64(r, "/dataset/total_voters")?,
    })
}

fn map_order_lines(r: &Value, ptr: &str) -> ReportResult<Vec<OrderLine>> {
    let mut out = Vec::new();
    for (i, entry) in j_arr(r, ptr)?.iter().enumerate() {
        let base = format!("{ptr}/{i}");
        out.push(OrderLine {
            rank: j_u64(entry, "/rank").map_err(|_| ReportError::Missing(format!("{base}/rank")))?,
            alternative: j_str(entry, "/alternative")
                .map_err(|_| ReportError::Missing(format!("{base}/alternative")))?,
            score: fmt_num(
                j_f64(entry, "/score").map_err(|_| ReportError::Missing(format!("{base}/score")))?,
            ),
        });
    }
    Ok(out)
}

fn map_outcome(r: &Value) -> ReportResult<OutcomeBlock> {
    Ok(OutcomeBlock {
        sort_order: j_str(r, "/sort_order")?,
        lines: map_order_lines(r, "/order")?,
        total_cost: r.pointer("/total_cost").and_then(Value::as_f64).map(fmt_num),
        uniform_weights: r.pointer("/uniform_weights").and_then(Value::as_bool),
    })
}

fn map_weights(r: &Value) -> Option<Vec<WeightLine>> {
    let ws = r.pointer("/position_weights")?.as_array()?;
    Some(
        ws.iter()
            .enumerate()
            .map(|(i, w)| WeightLine {
                position: i as u64 + 1,
                weight: w.as_f64().map(fmt_num).unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    )
}

fn map_cost_matrix(r: &Value) -> ReportResult<Option<Vec<CostLine>>> {
    let Some(rows) = r.pointer("/cost_matrix").and_then(Value::as_array) else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let base = format!("/cost_matrix/{i}");
        let alternative =
            j_str(row, "/alternative").map_err(|_| ReportError::Missing(format!("{base}/alternative")))?;
        let costs = j_arr(row, "/costs")
            .map_err(|_| ReportError::Missing(format!("{base}/costs")))?
            .iter()
            .map(|c| c.as_f64().map(fmt_num).unwrap_or_else(|| "-".to_string()))
            .collect();
        out.push(CostLine { alternative, costs });
    }
    Ok(Some(out))
}

fn map_entropy(r: &Value) -> ReportResult<Option<EntropySection>> {
    let Some(e) = r.pointer("/entropy").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let mut positions = Vec::new();
    for (i, p) in j_arr(e, "/positions")?.iter().enumerate() {
        let base = format!("/entropy/positions/{i}");
        let miss = |f: &str| ReportError::Missing(format!("{base}/{f}"));
        positions.push(EntropyLine {
            position: j_u64(p, "/position").map_err(|_| miss("position"))?,
            entropy: fmt_num(j_f64(p, "/entropy").map_err(|_| miss("entropy"))?),
            normalized: fmt_num(j_f64(p, "/normalized").map_err(|_| miss("normalized"))?),
            level: j_str(p, "/level").map_err(|_| miss("level"))?,
        });
    }
    Ok(Some(EntropySection {
        mode: j_str(e, "/mode")?,
        degenerate: j_bool(e, "/degenerate")?,
        max_entropy: fmt_num(j_f64(e, "/max_entropy")?),
        theoretical_max: fmt_num(j_f64(e, "/theoretical_max")?),
        positions,
    }))
}

fn map_pareto(r: &Value) -> ReportResult<ParetoSection> {
    Ok(ParetoSection {
        optimal: j_str_list(r, "/pareto/optimal")?,
        dominating: j_opt_str(r, "/pareto/dominating"),
    })
}

fn map_footer(r: &Value) -> ReportResult<FooterIntegrity> {
    Ok(FooterIntegrity {
        result_id: j_str(r, "/id")?,
        input_sha256: j_str(r, "/dataset/input_sha256")?,
        engine: format!("{} {}", j_str(r, "/engine/name")?, j_str(r, "/engine/version")?),
    })
}

/* ------------------------------- Entry points ------------------------------- */

/// Build the `ReportModel` from a parsed `result.json`.
pub fn build_report_model(result_json: &Value) -> ReportResult<ReportModel> {
    Ok(ReportModel {
        cover: map_cover(result_json)?,
        outcome: map_outcome(result_json)?,
        weights: map_weights(result_json),
        cost_matrix: map_cost_matrix(result_json)?,
        entropy: map_entropy(result_json)?,
        pareto: map_pareto(result_json)?,
        footer: map_footer(result_json)?,
    })
}

/// Build the `ComparisonModel` from a parsed `comparison.json`.
pub fn build_comparison_model(doc: &Value) -> ReportResult<ComparisonModel> {
    let mut rows = Vec::new();
    for (i, row) in j_arr(doc, "/rows")?.iter().enumerate() {
        let base = format!("/rows/{i}");
        let order = map_order_lines(row, "/order")
            .map_err(|_| ReportError::Missing(format!("{base}/order")))?
            .into_iter()
            .map(|l| l.alternative)
            .collect::<Vec<_>>()
            .join(" > ");
        rows.push(ComparisonLine {
            method: j_str(row, "/method").map_err(|_| ReportError::Missing(format!("{base}/method")))?,
            weighting: j_str(row, "/weighting")
                .map_err(|_| ReportError::Missing(format!("{base}/weighting")))?,
            order,
            total_cost: row.pointer("/total_cost").and_then(Value::as_f64).map(fmt_num),
        });
    }
    Ok(ComparisonModel {
        title: j_opt_str(doc, "/dataset/title"),
        rows,
        kemeny_orders_agree: j_bool(doc, "/kemeny_orders_agree")?,
        footer: map_footer(doc)?,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn classic_result() -> Value {
        json!({
            "id": "RES:00ff",
            "engine": {"vendor": "km", "name": "kemeny_engine", "version": "0.1.0", "build": "dev"},
            "method": "classic",
            "weighting": "uniform",
            "sort_order": "ascending",
            "order": [
                {"alternative": "A", "rank": 1, "score": 1.0},
                {"alternative": "B", "rank": 2, "score": 2.0},
                {"alternative": "C", "rank": 3, "score": 3.0}
            ],
            "total_cost": 144.0,
            "uniform_weights": true,
            "position_weights": [1.0, 1.0, 1.0],
            "cost_matrix": [
                {"alternative": "A", "costs": [62.0, 48.0, 58.0]},
                {"alternative": "B", "costs": [51.0, 29.0, 69.0]},
                {"alternative": "C", "costs": [67.0, 43.0, 53.0]}
            ],
            "pareto": {"optimal": ["A", "B", "C"]},
            "dataset": {
                "title": "reference",
                "input_sha256": "ab12",
                "alternatives": ["A", "B", "C"],
                "entries": 5,
                "total_voters": 60
            }
        })
    }

    pub fn adaptive_result() -> Value {
        let mut v = classic_result();
        v["method"] = json!("adaptive");
        v["weighting"] = json!("entropy_table");
        v["uniform_weights"] = json!(false);
        v["position_weights"] = json!([0.3, 0.3333333, 0.3666667]);
        v["entropy"] = json!({
            "mode": "conflict_focus",
            "positions": [
                {"position": 1, "entropy": 1.5, "normalized": 0.9, "level": "high_disagreement"},
                {"position": 2, "entropy": 1.4, "normalized": 0.84, "level": "high_disagreement"},
                {"position": 3, "entropy": 1.58, "normalized": 1.0, "level": "high_disagreement"}
            ],
            "max_entropy": 1.58,
            "theoretical_max": 1.584962500721156,
            "degenerate": false
        });
        v
    }

    pub fn comparison() -> Value {
        json!({
            "id": "RES:cafe",
            "engine": {"vendor": "km", "name": "kemeny_engine", "version": "0.1.0", "build": "dev"},
            "rows": [
                {"method": "classic", "weighting": "uniform", "total_cost": 144.0,
                 "order": [{"alternative": "A", "rank": 1, "score": 1.0},
                           {"alternative": "B", "rank": 2, "score": 2.0}]},
                {"method": "rank_sum", "weighting": "rank_sum",
                 "order": [{"alternative": "B", "rank": 1, "score": 111.0},
                           {"alternative": "A", "rank": 2, "score": 122.0}]}
            ],
            "dataset": {"input_sha256": "ab12", "alternatives": ["A", "B"], "entries": 2, "total_voters": 9},
            "kemeny_orders_agree": true
        })
    }
}
