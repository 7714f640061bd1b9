// crates/km_cli/src/args.rs
//
// Offline CLI argument surface: clap types, path checks, and the params
// override layer (defaults → --params file → individual flags).

use clap::Parser;
use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use km_core::{AdaptiveMode, Method, Params, WeightScheme};
use km_io::looks_like_url_strict;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "kemeny",
    version,
    disable_help_subcommand = true,
    about = "Offline Kemeny consensus ranking (classic, position-weighted, entropy-adaptive)"
)]
pub struct Args {
    /// Preference profile JSON (alternatives + weighted rankings).
    #[arg(long)]
    pub profile: PathBuf,

    /// Params JSON; individual flags below override its fields.
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// classic | position_weighted | adaptive | rank_sum
    #[arg(long, value_parser = parse_token::<Method>)]
    pub method: Option<Method>,

    /// uniform | hyperbolic | linear | exponential | logarithmic | top_k
    #[arg(long, value_parser = parse_token::<WeightScheme>)]
    pub weighting: Option<WeightScheme>,

    /// Decay rate for exponential weighting.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Cutoff for top_k weighting.
    #[arg(long = "top-k")]
    pub top_k: Option<u32>,

    /// conflict_focus | consensus_focus (adaptive method only)
    #[arg(long = "mode", value_parser = parse_token::<AdaptiveMode>)]
    pub adaptive_mode: Option<AdaptiveMode>,

    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Report renderer(s) to emit. Choose up to 2 (json, text).
    #[arg(long, value_parser = ["json", "text"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Run every method on the profile and write comparison.json instead of result.json.
    /// Each method runs with its own defaults, so solver flags are refused here.
    #[arg(
        long,
        conflicts_with_all = [
            "validate_only", "params", "method", "weighting", "alpha", "top_k", "adaptive_mode"
        ]
    )]
    pub compare: bool,

    /// Load and validate inputs only; write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress stdout output and lower log verbosity to errors.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// clap value parser for the engine's snake_case tokens.
pub fn parse_token<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.trim().parse::<T>().map_err(|e| e.to_string())
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate_args(Args::parse())
}

/// Path checks and normalization on already-parsed arguments.
pub fn validate_args(mut args: Args) -> Result<Args, CliError> {
    for p in [Some(args.profile.as_path()), args.params.as_deref(), Some(args.out.as_path())]
        .into_iter()
        .flatten()
    {
        ensure_local_path(p)?;
    }

    ensure_local_exists(&args.profile, "--profile")?;
    if let Some(p) = &args.params {
        ensure_local_exists(p, "--params")?;
    }

    args.profile = normalize_path(&args.profile);
    args.params = args.params.take().map(|p| normalize_path(&p));
    args.out = normalize_path(&args.out);
    Ok(args)
}

impl Args {
    /// Apply flag overrides on top of `base` (defaults or the --params file).
    pub fn apply_overrides(&self, mut base: Params) -> Params {
        if let Some(m) = self.method {
            base.method = m;
        }
        if let Some(w) = self.weighting {
            base.weighting = w;
        }
        if let Some(a) = self.alpha {
            base.alpha = a;
        }
        if let Some(k) = self.top_k {
            base.top_k = k;
        }
        if let Some(mode) = self.adaptive_mode {
            base.adaptive_mode = mode;
        }
        base
    }
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if looks_like_url_strict(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path
/// does not exist yet (e.g. a fresh --out directory).
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
