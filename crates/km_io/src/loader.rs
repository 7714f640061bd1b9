//! Loader: read a local preference-profile dataset, validate it, and return a
//! typed `LoadedDataset` for the pipeline. No network I/O.
//!
//! Wire shape:
//! ```json
//! {
//!   "alternatives": ["A", "B", "C"],
//!   "rankings": [ { "order": ["A", "B", "C"], "voters": 23 } ],
//!   "metadata": { "title": "…", "source": "…" }
//! }
//! ```
//! Unknown keys (per-ranking `weights`, `utilityProfiles`, …) are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use km_core::{Alternative, PreferenceProfile, Ranking, RankingEntry};
use serde::Deserialize;

use crate::{hasher, IoError, IoResult};

/// Hard cap on input size (4 MiB).
pub const MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

// ----------------------------- Raw wire types -----------------------------

#[derive(Deserialize)]
struct RawDataset {
    alternatives: Vec<String>,
    rankings: Vec<RawRanking>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Deserialize)]
struct RawRanking {
    order: Vec<String>,
    voters: i64,
}

#[derive(Deserialize, Default)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

// ----------------------------- Public types -----------------------------

/// Validated dataset: profile in declared alternative order plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub profile: PreferenceProfile,
    pub title: Option<String>,
    pub source: Option<String>,
    /// Lowercase hex SHA-256 of the raw input bytes.
    pub input_sha256: String,
}

// ----------------------------- Entry points -----------------------------

pub fn load_dataset(path: &Path) -> IoResult<LoadedDataset> {
    let bytes = read_limited(path)?;
    parse_dataset(&bytes)
}

pub fn parse_dataset(bytes: &[u8]) -> IoResult<LoadedDataset> {
    let raw: RawDataset = serde_json::from_slice(bytes)?;
    let input_sha256 = hasher::sha256_hex(bytes);

    let alternatives = read_alternatives(&raw.alternatives)?;
    let index: BTreeMap<&Alternative, usize> =
        alternatives.iter().enumerate().map(|(i, a)| (a, i)).collect();

    if raw.rankings.is_empty() {
        return Err(json_err("/rankings", "rankings array must not be empty"));
    }
    let mut entries = Vec::with_capacity(raw.rankings.len());
    for (r, node) in raw.rankings.iter().enumerate() {
        let order_ptr = format!("/rankings/{r}/order");
        if node.order.len() != alternatives.len() {
            return Err(json_err(
                &order_ptr,
                &format!(
                    "ranking order must list all {} alternatives, got {}",
                    alternatives.len(),
                    node.order.len()
                ),
            ));
        }
        let mut order = Vec::with_capacity(node.order.len());
        for (k, name) in node.order.iter().enumerate() {
            let alt = Alternative::new(name)
                .map_err(|e| json_err(&format!("{order_ptr}/{k}"), &e.to_string()))?;
            let idx = index
                .get(&alt)
                .ok_or_else(|| json_err(&format!("{order_ptr}/{k}"), &format!("unknown alternative: {name}")))?;
            // Use the declared spelling so display names are consistent.
            order.push(alternatives[*idx].clone());
        }
        let ranking = Ranking::from_order(order).map_err(|e| json_err(&order_ptr, &e.to_string()))?;

        let voters_ptr = format!("/rankings/{r}/voters");
        let voters = u32::try_from(node.voters)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| json_err(&voters_ptr, &format!("voters must be a positive integer, got {}", node.voters)))?;
        entries.push(RankingEntry::new(ranking, voters)?);
    }

    let profile = PreferenceProfile::with_alternatives(alternatives, entries)?;
    let meta = raw.metadata.unwrap_or_default();
    Ok(LoadedDataset { profile, title: meta.title, source: meta.source, input_sha256 })
}

// ----------------------------- Helpers -----------------------------

fn read_alternatives(names: &[String]) -> IoResult<Vec<Alternative>> {
    if names.is_empty() {
        return Err(json_err("/alternatives", "alternatives array must not be empty"));
    }
    let mut out: Vec<Alternative> = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let ptr = format!("/alternatives/{i}");
        let alt = Alternative::new(name).map_err(|e| json_err(&ptr, &e.to_string()))?;
        if out.contains(&alt) {
            return Err(json_err(&ptr, &format!("duplicate alternative: {name}")));
        }
        out.push(alt);
    }
    Ok(out)
}

pub(crate) fn read_limited(path: &Path) -> IoResult<Vec<u8>> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if buf.len() > MAX_INPUT_BYTES {
        return Err(IoError::Invalid(format!(
            "{} exceeds {} bytes",
            path.display(),
            MAX_INPUT_BYTES
        )));
    }
    Ok(buf)
}

fn json_err(pointer: &str, msg: &str) -> IoError {
    IoError::Json { pointer: pointer.to_string(), msg: msg.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_dataset_in_declared_order() {
        let bytes = br#"{
            "alternatives": ["A", "B"],
            "rankings": [ {"order": ["b", "a"], "voters": 3, "weights": {"A": 1}} ],
            "utilityProfiles": []
        }"#;
        let ds = parse_dataset(bytes).unwrap();
        assert_eq!(ds.profile.alternatives()[0].name(), "A");
        assert_eq!(ds.profile.rank_row(0), &[2, 1]);
        assert_eq!(ds.profile.entries()[0].ranking().alternatives()[0].name(), "B");
        assert!(ds.title.is_none());
        assert_eq!(ds.input_sha256.len(), 64);
    }

    #[test]
    fn reports_pointer_for_bad_voters() {
        let bytes = br#"{"alternatives":["A","B"],"rankings":[{"order":["A","B"],"voters":0}]}"#;
        match parse_dataset(bytes).unwrap_err() {
            IoError::Json { pointer, .. } => assert_eq!(pointer, "/rankings/0/voters"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_and_duplicate_alternatives() {
        let unknown = br#"{"alternatives":["A","B"],"rankings":[{"order":["A","X"],"voters":1}]}"#;
        assert!(matches!(
            parse_dataset(unknown).unwrap_err(),
            IoError::Json { ref pointer, .. } if pointer == "/rankings/0/order/1"
        ));

        let dup = br#"{"alternatives":["A","a"],"rankings":[{"order":["A","a"],"voters":1}]}"#;
        assert!(matches!(
            parse_dataset(dup).unwrap_err(),
            IoError::Json { ref pointer, .. } if pointer == "/alternatives/1"
        ));

        let repeat = br#"{"alternatives":["A","B"],"rankings":[{"order":["A","A"],"voters":1}]}"#;
        assert!(matches!(
            parse_dataset(repeat).unwrap_err(),
            IoError::Json { ref pointer, .. } if pointer == "/rankings/0/order"
        ));
    }

    #[test]
    fn rejects_short_order_and_empty_sections() {
        let short = br#"{"alternatives":["A","B","C"],"rankings":[{"order":["A","B"],"voters":1}]}"#;
        assert!(parse_dataset(short).is_err());
        let empty = br#"{"alternatives":[],"rankings":[]}"#;
        assert!(parse_dataset(empty).is_err());
        let no_rankings = br#"{"alternatives":["A"],"rankings":[]}"#;
        assert!(parse_dataset(no_rankings).is_err());
        assert!(parse_dataset(b"not json").is_err());
    }
}
