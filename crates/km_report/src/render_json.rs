//! render_json.rs: report JSON renderer.
//! Section by section (cover → outcome → weights → cost_matrix → entropy →
//! pareto → footer). Optional sections are omitted, never emitted as null.
//! Keys are written through `km_io`'s canonical writer, which sorts them.

use serde_json::{Map as JsonMap, Value};

use crate::{
    ComparisonModel, CostLine, CoverBlock, EntropySection, FooterIntegrity, OutcomeBlock,
    ParetoSection, ReportModel, WeightLine,
};

pub fn render_report_json(m: &ReportModel) -> Value {
    let mut root = obj();
    root.insert("cover".into(), cover_json(&m.cover));
    root.insert("outcome".into(), outcome_json(&m.outcome));
    if let Some(ws) = &m.weights {
        root.insert("weights".into(), weights_json(ws));
    }
    if let Some(rows) = &m.cost_matrix {
        root.insert("cost_matrix".into(), cost_matrix_json(rows));
    }
    if let Some(e) = &m.entropy {
        root.insert("entropy".into(), entropy_json(e));
    }
    root.insert("pareto".into(), pareto_json(&m.pareto));
    root.insert("footer".into(), footer_json(&m.footer));
    Value::Object(root)
}

pub fn render_comparison_json(m: &ComparisonModel) -> Value {
    let mut root = obj();
    if let Some(t) = &m.title {
        root.insert("title".into(), Value::String(t.clone()));
    }
    let rows = m
        .rows
        .iter()
        .map(|r| {
            let mut o = obj();
            o.insert("method".into(), Value::String(r.method.clone()));
            o.insert("weighting".into(), Value::String(r.weighting.clone()));
            o.insert("order".into(), Value::String(r.order.clone()));
            if let Some(c) = &r.total_cost {
                o.insert("total_cost".into(), Value::String(c.clone()));
            }
            Value::Object(o)
        })
        .collect();
    root.insert("rows".into(), Value::Array(rows));
    root.insert("kemeny_orders_agree".into(), Value::Bool(m.kemeny_orders_agree));
    root.insert("footer".into(), footer_json(&m.footer));
    Value::Object(root)
}

/* ------------------------------- sections ------------------------------- */

fn cover_json(c: &CoverBlock) -> Value {
    let mut o = obj();
    if let Some(t) = c.title.as_ref().filter(|s| !s.is_empty()) {
        o.insert("title".into(), Value::String(t.clone()));
    }
    if let Some(s) = c.source.as_ref().filter(|s| !s.is_empty()) {
        o.insert("source".into(), Value::String(s.clone()));
    }
    o.insert("method".into(), Value::String(c.method.clone()));
    o.insert("weighting".into(), Value::String(c.weighting.clone()));
    o.insert("alternatives".into(), strings(&c.alternatives));
    o.insert("entries".into(), Value::from(c.entries));
    o.insert("total_voters".into(), Value::from(c.total_voters));
    Value::Object(o)
}

fn outcome_json(b: &OutcomeBlock) -> Value {
    let mut o = obj();
    o.insert("sort_order".into(), Value::String(b.sort_order.clone()));
    let lines = b
        .lines
        .iter()
        .map(|l| {
            let mut x = obj();
            x.insert("rank".into(), Value::from(l.rank));
            x.insert("alternative".into(), Value::String(l.alternative.clone()));
            x.insert("score".into(), Value::String(l.score.clone()));
            Value::Object(x)
        })
        .collect();
    o.insert("order".into(), Value::Array(lines));
    if let Some(c) = &b.total_cost {
        o.insert("total_cost".into(), Value::String(c.clone()));
    }
    if let Some(u) = b.uniform_weights {
        o.insert("uniform_weights".into(), Value::Bool(u));
    }
    Value::Object(o)
}

fn weights_json(ws: &[WeightLine]) -> Value {
    Value::Array(
        ws.iter()
            .map(|w| {
                let mut o = obj();
                o.insert("position".into(), Value::from(w.position));
                o.insert("weight".into(), Value::String(w.weight.clone()));
                Value::Object(o)
            })
            .collect(),
    )
}

fn cost_matrix_json(rows: &[CostLine]) -> Value {
    Value::Array(
        rows.iter()
            .map(|r| {
                let mut o = obj();
                o.insert("alternative".into(), Value::String(r.alternative.clone()));
                o.insert("costs".into(), strings(&r.costs));
                Value::Object(o)
            })
            .collect(),
    )
}

fn entropy_json(e: &EntropySection) -> Value {
    let mut o = obj();
    o.insert("mode".into(), Value::String(e.mode.clone()));
    o.insert("degenerate".into(), Value::Bool(e.degenerate));
    o.insert("max_entropy".into(), Value::String(e.max_entropy.clone()));
    o.insert("theoretical_max".into(), Value::String(e.theoretical_max.clone()));
    let positions = e
        .positions
        .iter()
        .map(|p| {
            let mut x = obj();
            x.insert("position".into(), Value::from(p.position));
            x.insert("entropy".into(), Value::String(p.entropy.clone()));
            x.insert("normalized".into(), Value::String(p.normalized.clone()));
            x.insert("level".into(), Value::String(p.level.clone()));
            Value::Object(x)
        })
        .collect();
    o.insert("positions".into(), Value::Array(positions));
    Value::Object(o)
}

fn pareto_json(p: &ParetoSection) -> Value {
    let mut o = obj();
    o.insert("optimal".into(), strings(&p.optimal));
    if let Some(d) = &p.dominating {
        o.insert("dominating".into(), Value::String(d.clone()));
    }
    Value::Object(o)
}

fn footer_json(f: &FooterIntegrity) -> Value {
    let mut o = obj();
    o.insert("result_id".into(), Value::String(f.result_id.clone()));
    o.insert("input_sha256".into(), Value::String(f.input_sha256.clone()));
    o.insert("engine".into(), Value::String(f.engine.clone()));
    Value::Object(o)
}

/* ------------------------------- helpers ------------------------------- */

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}

fn strings(xs: &[String]) -> Value {
    Value::Array(xs.iter().cloned().map(Value::String).collect())
}
