//! km_core: Core value types, solver params and ordering helpers.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! engine (`km_algo`, `km_io`, `km_pipeline`, `km_report`, `km_cli`).
//!
//! - Alternatives, strict rankings, weighted ranking entries, preference profiles
//! - Aggregated rankings with an explicit sort direction
//! - Output IDs: `RES:`
//! - Solver configuration domain: `Method`, `WeightScheme`, `AdaptiveMode`, `Params`
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_doc_comments)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for value-type validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        EmptyName,
        EmptyRanking,
        DuplicateAlternative,
        NonPositiveRank,
        RankGap,
        NonPositiveVoters,
        EmptyProfile,
        AlternativeSetMismatch,
        UnknownAlternative,
        EmptyScores,
        InvalidId,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::EmptyName => write!(f, "alternative name must be non-empty"),
                CoreError::EmptyRanking => write!(f, "ranking must contain at least one alternative"),
                CoreError::DuplicateAlternative => write!(f, "duplicate alternative"),
                CoreError::NonPositiveRank => write!(f, "rank values must be positive integers"),
                CoreError::RankGap => write!(f, "ranks must cover 1..m exactly once"),
                CoreError::NonPositiveVoters => write!(f, "number of voters must be positive"),
                CoreError::EmptyProfile => write!(f, "preference profile must have at least one entry and one alternative"),
                CoreError::AlternativeSetMismatch => write!(f, "all rankings must contain the same set of alternatives"),
                CoreError::UnknownAlternative => write!(f, "unknown alternative"),
                CoreError::EmptyScores => write!(f, "aggregated ranking must not be empty"),
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids {
    //! Content-derived output identifiers.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    fn is_lower_hex_len(s: &str, n: usize) -> bool {
        s.len() == n && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// "RES:" + 64-hex (lowercase)
    #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ResultId(String);

    impl ResultId {
        pub fn as_str(&self) -> &str { &self.0 }

        /// Build from a bare 64-hex digest.
        pub fn from_digest(hex64: &str) -> Result<Self, CoreError> {
            if is_lower_hex_len(hex64, 64) {
                let mut s = String::with_capacity(68);
                s.push_str("RES:");
                s.push_str(hex64);
                Ok(Self(s))
            } else {
                Err(CoreError::InvalidId)
            }
        }
    }

    impl fmt::Display for ResultId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl FromStr for ResultId {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let rest = s.strip_prefix("RES:").ok_or(CoreError::InvalidId)?;
            if is_lower_hex_len(rest, 64) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidId) }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn result_id_roundtrip() {
            let hex = "ab".repeat(32);
            let id = ResultId::from_digest(&hex).unwrap();
            assert!(id.as_str().starts_with("RES:"));
            let parsed: ResultId = id.as_str().parse().unwrap();
            assert_eq!(parsed, id);
        }

        #[test]
        fn result_id_rejects_upper_and_short() {
            assert!(ResultId::from_digest(&"AB".repeat(32)).is_err());
            assert!("RES:abc".parse::<ResultId>().is_err());
            assert!(format!("RUN:{}", "a".repeat(64)).parse::<ResultId>().is_err());
        }
    }
}

pub mod entities;
pub mod determinism;
pub mod variables;

pub use entities::{AggregatedRanking, Alternative, PreferenceProfile, Ranking, RankingEntry, SortOrder};
pub use errors::CoreError;
pub use variables::{AdaptiveMode, Method, Params, WeightScheme};
