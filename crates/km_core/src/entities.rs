//! Value types of a preference profile.
//!
//! Invariants enforced at construction (nothing here is mutated afterwards):
//! - `Alternative`: trimmed, non-empty name; identity is the lower-cased name.
//! - `Ranking`: strict total order, positions `1..m` with no gaps or repeats.
//! - `RankingEntry`: voters ≥ 1.
//! - `PreferenceProfile`: ≥ 1 entry, every entry ranks the same alternative set.
//!
//! The profile materializes a flat rank table (entry-major) so the engine can
//! read "rank of alternative `i` in entry `e`" in O(1).

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use crate::determinism::{cmp_alternatives, StableOrd};
use crate::errors::CoreError;

/* -------------------------------------------------------------------------- */
/*                                 Alternative                                */
/* -------------------------------------------------------------------------- */

/// A candidate taking part in the collective choice.
///
/// Equality, ordering and hashing use the case-insensitive key, so `"Alpha"`
/// and `"ALPHA"` are the same alternative; `name()` keeps the original spelling.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct Alternative {
    name: String,
    key: String,
}

impl Alternative {
    pub fn new(name: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self { name: name.to_string(), key: name.to_lowercase() })
    }

    #[inline]
    pub fn name(&self) -> &str { &self.name }

    /// Lower-cased identity key.
    #[inline]
    pub fn key(&self) -> &str { &self.key }
}

impl PartialEq for Alternative {
    fn eq(&self, other: &Self) -> bool { self.key == other.key }
}

impl Eq for Alternative {}

impl Hash for Alternative {
    fn hash<H: Hasher>(&self, state: &mut H) { self.key.hash(state) }
}

impl PartialOrd for Alternative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Alternative {
    fn cmp(&self, other: &Self) -> Ordering { self.key.cmp(&other.key) }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}

impl FromStr for Alternative {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Alternative::new(s) }
}

impl TryFrom<String> for Alternative {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Alternative::new(&s) }
}

impl From<Alternative> for String {
    fn from(a: Alternative) -> Self { a.name }
}

/* -------------------------------------------------------------------------- */
/*                                   Ranking                                  */
/* -------------------------------------------------------------------------- */

/// Strict ranking: `order[k - 1]` occupies position `k` (1 = best).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<Alternative>", try_from = "Vec<Alternative>"))]
pub struct Ranking {
    order: Vec<Alternative>,
}

impl Ranking {
    /// Build from a best-to-worst list; ranks start at 1.
    pub fn from_order(order: Vec<Alternative>) -> Result<Self, CoreError> {
        if order.is_empty() {
            return Err(CoreError::EmptyRanking);
        }
        let mut seen = BTreeSet::new();
        for alt in &order {
            if !seen.insert(alt) {
                return Err(CoreError::DuplicateAlternative);
            }
        }
        Ok(Self { order })
    }

    /// Build from explicit `(alternative, rank)` pairs.
    ///
    /// Ranks must be positive and cover `1..m` exactly once; ties and gaps are
    /// rejected since only strict total orders are supported.
    pub fn from_ranks<I>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (Alternative, u32)>,
    {
        let pairs: Vec<(Alternative, u32)> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return Err(CoreError::EmptyRanking);
        }
        if pairs.iter().any(|(_, r)| *r == 0) {
            return Err(CoreError::NonPositiveRank);
        }
        let m = pairs.len();
        let mut slots: Vec<Option<Alternative>> = alloc::vec![None; m];
        for (alt, rank) in pairs {
            let idx = (rank - 1) as usize;
            if idx >= m || slots[idx].is_some() {
                return Err(CoreError::RankGap);
            }
            slots[idx] = Some(alt);
        }
        let order: Vec<Alternative> = slots.into_iter().flatten().collect();
        Self::from_order(order)
    }

    /// Rank of `alt` (1-based), or `None` if absent. O(m).
    pub fn rank_of(&self, alt: &Alternative) -> Option<u32> {
        self.order.iter().position(|a| a == alt).map(|i| (i + 1) as u32)
    }

    /// Alternative at 1-based `position`. O(1).
    #[inline]
    pub fn occupant(&self, position: u32) -> Option<&Alternative> {
        if position == 0 {
            return None;
        }
        self.order.get((position - 1) as usize)
    }

    /// Alternatives in rank order (best first).
    #[inline]
    pub fn alternatives(&self) -> &[Alternative] { &self.order }

    #[inline]
    pub fn len(&self) -> usize { self.order.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

impl TryFrom<Vec<Alternative>> for Ranking {
    type Error = CoreError;
    fn try_from(order: Vec<Alternative>) -> Result<Self, Self::Error> { Ranking::from_order(order) }
}

impl From<Ranking> for Vec<Alternative> {
    fn from(r: Ranking) -> Self { r.order }
}

/* -------------------------------------------------------------------------- */
/*                                RankingEntry                                */
/* -------------------------------------------------------------------------- */

/// One submitted ranking and the number of voters who submitted it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankingEntry {
    ranking: Ranking,
    voters: u32,
}

impl RankingEntry {
    pub fn new(ranking: Ranking, voters: u32) -> Result<Self, CoreError> {
        if voters == 0 {
            return Err(CoreError::NonPositiveVoters);
        }
        Ok(Self { ranking, voters })
    }

    #[inline]
    pub fn ranking(&self) -> &Ranking { &self.ranking }

    #[inline]
    pub fn voters(&self) -> u32 { self.voters }
}

/* -------------------------------------------------------------------------- */
/*                              PreferenceProfile                             */
/* -------------------------------------------------------------------------- */

/// Immutable collection of ranking entries over one alternative set.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreferenceProfile {
    alternatives: Vec<Alternative>,
    entries: Vec<RankingEntry>,
    /// ranks[e * m + i] = rank of alternatives[i] in entries[e].
    #[cfg_attr(feature = "serde", serde(skip))]
    ranks: Vec<u32>,
}

impl PreferenceProfile {
    /// Canonical alternative order is taken from the first entry's ranking.
    pub fn new(entries: Vec<RankingEntry>) -> Result<Self, CoreError> {
        let first = entries.first().ok_or(CoreError::EmptyProfile)?;
        let alternatives = first.ranking().alternatives().to_vec();
        Self::with_alternatives(alternatives, entries)
    }

    /// Use an explicitly declared canonical alternative order.
    pub fn with_alternatives(
        alternatives: Vec<Alternative>,
        entries: Vec<RankingEntry>,
    ) -> Result<Self, CoreError> {
        if entries.is_empty() || alternatives.is_empty() {
            return Err(CoreError::EmptyProfile);
        }
        let mut seen = BTreeSet::new();
        for alt in &alternatives {
            if !seen.insert(alt) {
                return Err(CoreError::DuplicateAlternative);
            }
        }

        let m = alternatives.len();
        let mut ranks = Vec::with_capacity(entries.len() * m);
        for entry in &entries {
            // Same cardinality + every declared alternative present ⇒ same set.
            if entry.ranking().len() != m {
                return Err(CoreError::AlternativeSetMismatch);
            }
            for alt in &alternatives {
                let r = entry.ranking().rank_of(alt).ok_or(CoreError::AlternativeSetMismatch)?;
                ranks.push(r);
            }
        }

        Ok(Self { alternatives, entries, ranks })
    }

    /// New profile with one more entry appended (same alternative order).
    pub fn with_entry(&self, entry: RankingEntry) -> Result<Self, CoreError> {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self::with_alternatives(self.alternatives.clone(), entries)
    }

    #[inline]
    pub fn entries(&self) -> &[RankingEntry] { &self.entries }

    #[inline]
    pub fn alternatives(&self) -> &[Alternative] { &self.alternatives }

    /// Number of alternatives `m`.
    #[inline]
    pub fn alternative_count(&self) -> usize { self.alternatives.len() }

    /// Number of distinct ranking entries `n`.
    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn total_voters(&self) -> u64 {
        self.entries.iter().map(|e| e.voters() as u64).sum()
    }

    pub fn index_of(&self, alt: &Alternative) -> Option<usize> {
        self.alternatives.iter().position(|a| a == alt)
    }

    /// Rank of `alternatives()[alt_idx]` within `entries()[entry_idx]`.
    ///
    /// Panics if either index is out of bounds (same contract as slice indexing).
    #[inline]
    pub fn rank(&self, entry_idx: usize, alt_idx: usize) -> u32 {
        self.ranks[entry_idx * self.alternatives.len() + alt_idx]
    }

    /// Ranks of all alternatives (canonical order) within one entry.
    #[inline]
    pub fn rank_row(&self, entry_idx: usize) -> &[u32] {
        let m = self.alternatives.len();
        &self.ranks[entry_idx * m..(entry_idx + 1) * m]
    }
}

/* -------------------------------------------------------------------------- */
/*                              AggregatedRanking                             */
/* -------------------------------------------------------------------------- */

/// Direction in which scores should be read: ascending = lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Output of an aggregation: one score per alternative plus a sort direction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregatedRanking {
    scores: Vec<(Alternative, f64)>,
    order: SortOrder,
}

impl AggregatedRanking {
    pub fn new(scores: Vec<(Alternative, f64)>, order: SortOrder) -> Result<Self, CoreError> {
        if scores.is_empty() {
            return Err(CoreError::EmptyScores);
        }
        let mut seen = BTreeSet::new();
        for (alt, _) in &scores {
            if !seen.insert(alt) {
                return Err(CoreError::DuplicateAlternative);
            }
        }
        Ok(Self { scores, order })
    }

    /// Scores in the order they were produced (canonical alternative order).
    #[inline]
    pub fn scores(&self) -> &[(Alternative, f64)] { &self.scores }

    #[inline]
    pub fn order(&self) -> SortOrder { self.order }

    pub fn score_of(&self, alt: &Alternative) -> Option<f64> {
        self.scores.iter().find(|(a, _)| a == alt).map(|(_, s)| *s)
    }

    /// Entries best-first per `order`; equal scores fall back to the stable
    /// alternative order.
    pub fn sorted_entries(&self) -> Vec<(&Alternative, f64)> {
        let mut out: Vec<(&Alternative, f64)> = self.scores.iter().map(|(a, s)| (a, *s)).collect();
        let order = self.order;
        out.sort_by(|(a, sa), (b, sb)| {
            let by_score = match order {
                SortOrder::Ascending => sa.total_cmp(sb),
                SortOrder::Descending => sb.total_cmp(sa),
            };
            by_score.then_with(|| cmp_alternatives(a, b))
        });
        out
    }

    /// Alternatives only, best first.
    pub fn ordered_alternatives(&self) -> Vec<&Alternative> {
        self.sorted_entries().into_iter().map(|(a, _)| a).collect()
    }
}

impl StableOrd for Alternative {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key()).then_with(|| self.name().cmp(other.name()))
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn alt(s: &str) -> Alternative { s.parse().unwrap() }

    fn order(names: &[&str]) -> Ranking {
        Ranking::from_order(names.iter().map(|n| alt(n)).collect()).unwrap()
    }

    #[test]
    fn alternative_is_case_insensitive_and_trimmed() {
        let a = alt("  Alpha ");
        assert_eq!(a.name(), "Alpha");
        assert_eq!(a, alt("ALPHA"));
        assert_eq!(Alternative::new("   ").unwrap_err(), CoreError::EmptyName);
    }

    #[test]
    fn ranking_from_order_assigns_ranks_from_one() {
        let r = order(&["B", "C", "A"]);
        assert_eq!(r.rank_of(&alt("b")), Some(1));
        assert_eq!(r.rank_of(&alt("A")), Some(3));
        assert_eq!(r.occupant(2), Some(&alt("C")));
        assert_eq!(r.occupant(0), None);
        assert_eq!(r.occupant(4), None);
    }

    #[test]
    fn ranking_rejects_duplicates_gaps_and_ties() {
        let dup = Ranking::from_order(vec![alt("A"), alt("a")]);
        assert_eq!(dup.unwrap_err(), CoreError::DuplicateAlternative);

        let gap = Ranking::from_ranks(vec![(alt("A"), 1), (alt("B"), 3)]);
        assert_eq!(gap.unwrap_err(), CoreError::RankGap);

        let tie = Ranking::from_ranks(vec![(alt("A"), 1), (alt("B"), 1)]);
        assert_eq!(tie.unwrap_err(), CoreError::RankGap);

        let zero = Ranking::from_ranks(vec![(alt("A"), 0), (alt("B"), 1)]);
        assert_eq!(zero.unwrap_err(), CoreError::NonPositiveRank);

        let ok = Ranking::from_ranks(vec![(alt("A"), 2), (alt("B"), 1)]).unwrap();
        assert_eq!(ok.alternatives(), &[alt("B"), alt("A")]);
    }

    #[test]
    fn entry_requires_positive_voters() {
        let r = order(&["A", "B"]);
        assert_eq!(RankingEntry::new(r, 0).unwrap_err(), CoreError::NonPositiveVoters);
    }

    #[test]
    fn profile_validates_alternative_set_and_builds_rank_table() {
        let e1 = RankingEntry::new(order(&["A", "B", "C"]), 2).unwrap();
        let e2 = RankingEntry::new(order(&["C", "A", "B"]), 3).unwrap();
        let p = PreferenceProfile::new(vec![e1.clone(), e2]).unwrap();
        assert_eq!(p.total_voters(), 5);
        assert_eq!(p.alternative_count(), 3);
        assert_eq!(p.rank_row(1), &[2, 3, 1]);
        assert_eq!(p.rank(0, 2), 3);

        let other = RankingEntry::new(order(&["A", "B", "D"]), 1).unwrap();
        assert_eq!(
            PreferenceProfile::new(vec![e1.clone(), other]).unwrap_err(),
            CoreError::AlternativeSetMismatch
        );

        let shorter = RankingEntry::new(order(&["A", "B"]), 1).unwrap();
        assert_eq!(
            PreferenceProfile::new(vec![e1, shorter]).unwrap_err(),
            CoreError::AlternativeSetMismatch
        );

        assert_eq!(PreferenceProfile::new(vec![]).unwrap_err(), CoreError::EmptyProfile);
    }

    #[test]
    fn profile_with_declared_order_and_with_entry() {
        let e1 = RankingEntry::new(order(&["B", "A"]), 1).unwrap();
        let p = PreferenceProfile::with_alternatives(vec![alt("A"), alt("B")], vec![e1]).unwrap();
        assert_eq!(p.index_of(&alt("a")), Some(0));
        assert_eq!(p.rank_row(0), &[2, 1]);

        let p2 = p.with_entry(RankingEntry::new(order(&["A", "B"]), 4).unwrap()).unwrap();
        assert_eq!(p2.len(), 2);
        assert_eq!(p2.total_voters(), 5);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn aggregated_ranking_sorts_by_direction_then_name() {
        let agg = AggregatedRanking::new(
            vec![(alt("C"), 2.0), (alt("a"), 1.0), (alt("B"), 1.0)],
            SortOrder::Ascending,
        )
        .unwrap();
        let names: Vec<&str> = agg.sorted_entries().iter().map(|(a, _)| a.name()).collect();
        assert_eq!(names, vec!["a", "B", "C"]);

        let desc = AggregatedRanking::new(agg.scores().to_vec(), SortOrder::Descending).unwrap();
        assert_eq!(desc.ordered_alternatives()[0].name(), "C");
        assert_eq!(desc.score_of(&alt("b")), Some(1.0));
        assert!(AggregatedRanking::new(vec![], SortOrder::Ascending).is_err());
    }
}
