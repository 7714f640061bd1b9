//! Solver configuration: method / weighting enums with explicit wire tokens,
//! and `Params` with safe defaults plus domain validation.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

// ------------ Macros ------------

/// Define an enum with explicit wire tokens (serde derives remain feature-aware).
macro_rules! token_enum {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

// ------------ Canonical enums (wire tokens explicit) ------------

token_enum!(
    /// Which aggregation the pipeline runs.
    Method => {
        Classic          = "classic",
        PositionWeighted = "position_weighted",
        Adaptive         = "adaptive",
        RankSum          = "rank_sum",
    }
);

token_enum!(
    /// Canonical position weight strategy for `Method::PositionWeighted`.
    WeightScheme => {
        Uniform     = "uniform",
        Hyperbolic  = "hyperbolic",
        Linear      = "linear",
        Exponential = "exponential",
        Logarithmic = "logarithmic",
        TopK        = "top_k",
    }
);

token_enum!(
    /// Which entropy-derived weighting `Method::Adaptive` uses.
    AdaptiveMode => {
        ConflictFocus  = "conflict_focus",
        ConsensusFocus = "consensus_focus",
    }
);

// ------------ Params ------------

pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_TOP_K: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    pub method: Method,
    pub weighting: WeightScheme,
    /// Decay rate for `WeightScheme::Exponential`.
    pub alpha: f64,
    /// Cutoff for `WeightScheme::TopK`.
    pub top_k: u32,
    pub adaptive_mode: AdaptiveMode,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            method: Method::Classic,
            weighting: WeightScheme::Uniform,
            alpha: DEFAULT_ALPHA,
            top_k: DEFAULT_TOP_K,
            adaptive_mode: AdaptiveMode::ConflictFocus,
        }
    }
}

// -------- Validation --------

#[derive(Debug, Clone, PartialEq)]
pub enum VarsError {
    Domain(String),
}

impl fmt::Display for VarsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarsError::Domain(m) => write!(f, "domain: {m}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VarsError {}

pub type VarsResult<T> = Result<T, VarsError>;

impl Params {
    /// Validate numeric domains. Fields that the selected method ignores are
    /// still checked so a params file cannot carry silently-bad values.
    pub fn validate(&self) -> VarsResult<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(VarsError::Domain(alloc::format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        if self.top_k == 0 && self.weighting == WeightScheme::TopK {
            return Err(VarsError::Domain("top_k must be >= 1".into()));
        }
        Ok(())
    }
}

/* ---------------------------------- Tests --------------------------------- */
