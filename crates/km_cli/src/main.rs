// crates/km_cli/src/main.rs
//
// Wires exit codes, typed error mapping, logging, CLI parsing, the
// validate-only short-circuit, and the full run path
// (load → params → pipeline → artifacts → optional reports).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const SOLVE: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};

use km_core::Params;
use km_io::{canonical_json, loader, params as params_io, IoError};
use km_pipeline::{
    compare_methods, engine_identifiers, run_with_ctx, validate, ComparisonDoc, PipelineCtx,
    PipelineError, ResultDoc, Severity,
};
use km_report::ReportError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Bad dataset / params shape or domain.
    Validation(String),
    /// Read / write / path failures.
    Io(String),
    /// Solver failures (malformed matrix, invalid weight function).
    Solve(String),
    /// Report model could not be built from the artifact.
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Solve(m) => write!(f, "solve: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("kemeny: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(args.quiet);

    let outcome = if args.validate_only {
        validate_only(&args)
    } else {
        run_once(&args)
    };

    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("kemeny: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// Logs go to stderr; stdout carries only the consensus order.
fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Solve(_) => SOLVE,
        MainError::Render(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Invalid(m) => MainError::Validation(m),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Hash(m) => MainError::Io(format!("hash: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validate(m) => MainError::Validation(m),
        PipelineError::Io(m) => MainError::Io(m),
        PipelineError::Solve(m) => MainError::Solve(m),
        PipelineError::Build(m) => MainError::Io(m),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

/// defaults → --params file → individual flags.
fn effective_params(args: &Args) -> Result<Params, MainError> {
    let base = match &args.params {
        Some(p) => params_io::load_params(p).map_err(map_io_err)?,
        None => Params::default(),
    };
    let params = args.apply_overrides(base);
    debug!(?params, "effective params");
    Ok(params)
}

/// Load + validate only; nothing is written.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let dataset = loader::load_dataset(&args.profile).map_err(map_io_err)?;
    let params = effective_params(args)?;
    let report = validate(&dataset.profile, &params);

    if !args.quiet {
        for issue in &report.issues {
            let tag = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            eprintln!("{tag}: {}: {}", issue.code, issue.message);
        }
    }
    if !report.pass {
        return Err(MainError::Validation(report.first_error_message()));
    }
    if !args.quiet {
        eprintln!("validate-only: inputs OK");
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let dataset = loader::load_dataset(&args.profile).map_err(map_io_err)?;
    let engine_meta = engine_identifiers();

    fs::create_dir_all(&args.out)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", args.out.display())))?;

    if args.compare {
        let doc = compare_methods(&dataset, &engine_meta).map_err(map_pipeline_err)?;
        write_json(&args.out, "comparison.json", &doc)?;
        render_comparison(args, &doc)?;
        if !args.quiet {
            print_comparison(&doc);
        }
    } else {
        let params = effective_params(args)?;
        let outs = run_with_ctx(PipelineCtx { dataset, params, engine_meta })
            .map_err(map_pipeline_err)?;
        write_json(&args.out, "result.json", &outs.result)?;
        render_result(args, &outs.result)?;
        if !args.quiet {
            print_result(&outs.result);
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out_dir: &Path, name: &str, value: &T) -> Result<(), MainError> {
    canonical_json::write_canonical_file(&out_dir.join(name), value)
        .map_err(|e| MainError::Io(format!("write {name}: {e}")))
}

fn write_text(out_dir: &Path, name: &str, text: &str) -> Result<(), MainError> {
    canonical_json::write_atomic(&out_dir.join(name), text.as_bytes())
        .map_err(|e| MainError::Io(format!("write {name}: {e}")))
}

fn render_result(args: &Args, doc: &ResultDoc) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let value = serde_json::to_value(doc).map_err(|e| MainError::Render(format!("result to JSON: {e}")))?;
    let model = km_report::build_report_model(&value).map_err(map_report_err)?;
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => write_json(&args.out, "report.json", &km_report::render_report_json(&model))?,
            "text" => write_text(&args.out, "report.txt", &km_report::render_report_text(&model))?,
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn render_comparison(args: &Args, doc: &ComparisonDoc) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let value =
        serde_json::to_value(doc).map_err(|e| MainError::Render(format!("comparison to JSON: {e}")))?;
    let model = km_report::build_comparison_model(&value).map_err(map_report_err)?;
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => write_json(&args.out, "report.json", &km_report::render_comparison_json(&model))?,
            "text" => write_text(&args.out, "report.txt", &km_report::render_comparison_text(&model))?,
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn print_result(doc: &ResultDoc) {
    let order: Vec<&str> = doc.body.order.iter().map(|o| o.alternative.as_str()).collect();
    println!("{}", order.join(" > "));
    if let Some(c) = doc.body.total_cost {
        println!("total_cost: {}", km_report::fmt_num(c));
    }
    println!("id: {}", doc.id);
}

fn print_comparison(doc: &ComparisonDoc) {
    for row in &doc.rows {
        let order: Vec<&str> = row.order.iter().map(|o| o.alternative.as_str()).collect();
        println!("{:<26} {}", row.method, order.join(" > "));
    }
    println!("id: {}", doc.id);
}
