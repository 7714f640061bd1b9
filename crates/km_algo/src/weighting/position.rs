//! Position weight functions φ(k, m).
//!
//! A weight is the importance of getting rank position `k` (1-based, out of `m`)
//! right. The cost matrix builder realizes φ once per column into a weight
//! vector, so every strategy here is evaluated exactly `m` times per solve.
//!
//! Canonical strategies:
//! - uniform        φ = 1
//! - hyperbolic     φ = 1/k
//! - linear         φ = (m − k + 1)/m
//! - exponential(α) φ = e^{−α(k−1)}
//! - logarithmic    φ = 1/log2(k + 1)
//! - top_k(K)       φ = 1 if k ≤ K else 0
//!
//! Plus an explicit table (used for entropy-derived weights) and a named
//! closure for custom cases.

use std::fmt;
use std::sync::Arc;

use km_core::{Params, WeightScheme};

use crate::error::KemenyError;

/// Tolerance under which a realized weight counts as exactly 1.
pub const UNIFORM_EPS: f64 = 1e-9;

/// Caller-supplied φ(k, m).
///
/// The function must be total over `1..=m` and must not read mutable external
/// state. It is called once per column and the result is cached in the weight
/// vector; a closure whose output changes between calls observes that state
/// once per position and the resulting ranking is undefined.
#[derive(Clone)]
pub struct CustomWeight {
    name: String,
    f: Arc<dyn Fn(u32, u32) -> f64 + Send + Sync>,
}

impl CustomWeight {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(u32, u32) -> f64 + Send + Sync + 'static,
    {
        Self { name: name.into(), f: Arc::new(f) }
    }

    pub fn name(&self) -> &str { &self.name }

    #[inline]
    fn call(&self, k: u32, m: u32) -> f64 { (self.f)(k, m) }
}

impl fmt::Debug for CustomWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomWeight").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum PositionWeight {
    Uniform,
    Hyperbolic,
    Linear,
    Exponential { alpha: f64 },
    Logarithmic,
    TopK { k: u32 },
    /// Precomputed weights; index `k - 1` holds φ(k). Length bounds the valid range.
    Table(Vec<f64>),
    Custom(CustomWeight),
}

impl PositionWeight {
    /// Build the canonical strategy selected by `params.weighting`.
    pub fn from_params(params: &Params) -> Self {
        match params.weighting {
            WeightScheme::Uniform => PositionWeight::Uniform,
            WeightScheme::Hyperbolic => PositionWeight::Hyperbolic,
            WeightScheme::Linear => PositionWeight::Linear,
            WeightScheme::Exponential => PositionWeight::Exponential { alpha: params.alpha },
            WeightScheme::Logarithmic => PositionWeight::Logarithmic,
            WeightScheme::TopK => PositionWeight::TopK { k: params.top_k },
        }
    }

    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(u32, u32) -> f64 + Send + Sync + 'static,
    {
        PositionWeight::Custom(CustomWeight::new(name, f))
    }

    /// φ(k, m). Fails for `k ∉ 1..=m` and for negative or non-finite results.
    pub fn weight(&self, k: u32, m: u32) -> Result<f64, KemenyError> {
        if k == 0 || k > m {
            return Err(KemenyError::OutOfRange { position: k, len: m });
        }
        let kf = k as f64;
        let value = match self {
            PositionWeight::Uniform => 1.0,
            PositionWeight::Hyperbolic => 1.0 / kf,
            PositionWeight::Linear => (m - k + 1) as f64 / m as f64,
            PositionWeight::Exponential { alpha } => (-alpha * (kf - 1.0)).exp(),
            PositionWeight::Logarithmic => 1.0 / (kf + 1.0).log2(),
            PositionWeight::TopK { k: cutoff } => {
                if k <= *cutoff { 1.0 } else { 0.0 }
            }
            PositionWeight::Table(table) => *table
                .get((k - 1) as usize)
                .ok_or(KemenyError::OutOfRange { position: k, len: table.len() as u32 })?,
            PositionWeight::Custom(c) => c.call(k, m),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(KemenyError::InvalidWeightFunction { position: k, value });
        }
        Ok(value)
    }

    /// Weight vector `[φ(1,m), …, φ(m,m)]`.
    pub fn realize(&self, m: u32) -> Result<Vec<f64>, KemenyError> {
        (1..=m).map(|k| self.weight(k, m)).collect()
    }

    /// Stable human-readable label used in result documents.
    pub fn label(&self) -> String {
        match self {
            PositionWeight::Uniform => "uniform".into(),
            PositionWeight::Hyperbolic => "hyperbolic".into(),
            PositionWeight::Linear => "linear".into(),
            PositionWeight::Exponential { alpha } => format!("exponential(alpha={alpha})"),
            PositionWeight::Logarithmic => "logarithmic".into(),
            PositionWeight::TopK { k } => format!("top_k(k={k})"),
            PositionWeight::Table(_) => "entropy_table".into(),
            PositionWeight::Custom(c) => format!("custom:{}", c.name()),
        }
    }
}

impl fmt::Display for PositionWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// True when every realized weight is 1 (classic Kemeny).
pub fn is_uniform(weights: &[f64]) -> bool {
    weights.iter().all(|w| (w - 1.0).abs() < UNIFORM_EPS)
}

/* ---------------------------------- Tests --------------------------------- */
