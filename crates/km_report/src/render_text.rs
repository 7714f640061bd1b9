//! Plain-text renderer. ASCII tables, fixed section order, trailing newline.

use std::fmt::Write as _;

use crate::{ComparisonModel, ReportModel};

pub fn render_report_text(m: &ReportModel) -> String {
    let mut s = String::new();

    let title = m.cover.title.as_deref().unwrap_or("Kemeny consensus report");
    line(&mut s, title);
    line(&mut s, &"=".repeat(title.chars().count()));
    if let Some(src) = &m.cover.source {
        line(&mut s, &format!("Source: {src}"));
    }
    line(
        &mut s,
        &format!(
            "Method: {} (weighting: {})",
            m.cover.method, m.cover.weighting
        ),
    );
    line(
        &mut s,
        &format!(
            "Profile: {} alternatives, {} rankings, {} voters",
            m.cover.alternatives.len(),
            m.cover.entries,
            m.cover.total_voters
        ),
    );
    s.push('\n');

    line(&mut s, &format!("Consensus order ({})", m.outcome.sort_order));
    let width = name_width(m.outcome.lines.iter().map(|l| l.alternative.as_str()));
    for l in &m.outcome.lines {
        line(&mut s, &format!("  {:>3}. {:<width$}  {}", l.rank, l.alternative, l.score));
    }
    if let Some(c) = &m.outcome.total_cost {
        line(&mut s, &format!("Total cost: {c}"));
    }
    if let Some(u) = m.outcome.uniform_weights {
        line(&mut s, &format!("Uniform weights: {}", if u { "yes" } else { "no" }));
    }

    if let Some(ws) = &m.weights {
        s.push('\n');
        line(&mut s, "Position weights");
        for w in ws {
            line(&mut s, &format!("  {:>3}  {}", w.position, w.weight));
        }
    }

    if let Some(rows) = &m.cost_matrix {
        s.push('\n');
        line(&mut s, "Cost matrix (rows: alternatives, columns: positions)");
        let w = name_width(rows.iter().map(|r| r.alternative.as_str()));
        for r in rows {
            let cells: Vec<String> = r.costs.iter().map(|c| format!("{c:>10}")).collect();
            line(&mut s, &format!("  {:<w$} {}", r.alternative, cells.join(" ")));
        }
    }

    if let Some(e) = &m.entropy {
        s.push('\n');
        line(&mut s, &format!("Positional entropy ({})", e.mode));
        for p in &e.positions {
            line(
                &mut s,
                &format!("  {:>3}  H={}  H/Hmax={}  {}", p.position, p.entropy, p.normalized, p.level),
            );
        }
        line(
            &mut s,
            &format!("  max observed: {}  theoretical max: {}", e.max_entropy, e.theoretical_max),
        );
        if e.degenerate {
            line(&mut s, "  all positions unanimous; uniform weights used");
        }
    }

    s.push('\n');
    line(&mut s, &format!("Pareto-optimal: {}", m.pareto.optimal.join(", ")));
    if let Some(d) = &m.pareto.dominating {
        line(&mut s, &format!("Dominating alternative: {d}"));
    }

    s.push('\n');
    line(&mut s, &format!("Result: {}", m.footer.result_id));
    line(&mut s, &format!("Input sha256: {}", m.footer.input_sha256));
    line(&mut s, &format!("Engine: {}", m.footer.engine));
    s
}

pub fn render_comparison_text(m: &ComparisonModel) -> String {
    let mut s = String::new();
    let title = m.title.as_deref().unwrap_or("Method comparison");
    line(&mut s, title);
    line(&mut s, &"=".repeat(title.chars().count()));

    let mw = name_width(m.rows.iter().map(|r| r.method.as_str())).max("method".len());
    let ww = name_width(m.rows.iter().map(|r| r.weighting.as_str())).max("weighting".len());
    line(&mut s, &format!("{:<mw$}  {:<ww$}  {:>10}  order", "method", "weighting", "cost"));
    for r in &m.rows {
        let cost = r.total_cost.as_deref().unwrap_or("-");
        line(&mut s, &format!("{:<mw$}  {:<ww$}  {:>10}  {}", r.method, r.weighting, cost, r.order));
    }
    s.push('\n');
    line(
        &mut s,
        if m.kemeny_orders_agree {
            "All Kemeny variants agree."
        } else {
            "Kemeny variants disagree."
        },
    );
    line(&mut s, &format!("Result: {}", m.footer.result_id));
    s
}

fn line(s: &mut String, text: &str) {
    // Writing into a String cannot fail.
    let _ = writeln!(s, "{text}");
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}
