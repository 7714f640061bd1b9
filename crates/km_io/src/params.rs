//! Params loader: a serialized `km_core::Params` object; missing fields take
//! their defaults, unknown fields are rejected.

use std::path::Path;

use km_core::Params;

use crate::loader::read_limited;
use crate::{IoError, IoResult};

pub fn load_params(path: &Path) -> IoResult<Params> {
    let bytes = read_limited(path)?;
    parse_params(&bytes)
}

pub fn parse_params(bytes: &[u8]) -> IoResult<Params> {
    let params: Params = serde_json::from_slice(bytes)?;
    params
        .validate()
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{AdaptiveMode, Method, WeightScheme};

    #[test]
    fn empty_object_is_defaults() {
        assert_eq!(parse_params(b"{}").unwrap(), Params::default());
    }

    #[test]
    fn reads_wire_tokens() {
        let p = parse_params(
            br#"{"method":"adaptive","adaptive_mode":"consensus_focus","weighting":"top_k","top_k":2}"#,
        )
        .unwrap();
        assert_eq!(p.method, Method::Adaptive);
        assert_eq!(p.adaptive_mode, AdaptiveMode::ConsensusFocus);
        assert_eq!(p.weighting, WeightScheme::TopK);
        assert_eq!(p.top_k, 2);
        assert_eq!(p.alpha, 0.5);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_domains() {
        assert!(parse_params(br#"{"metod":"classic"}"#).is_err());
        assert!(parse_params(br#"{"method":"borda"}"#).is_err());
        assert!(parse_params(br#"{"alpha":-1.0}"#).is_err());
    }
}
