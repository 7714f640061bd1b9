// crates/km_algo/src/lib.rs
#![forbid(unsafe_code)]

// Core value types used throughout the engine
pub use km_core::{
    AggregatedRanking, Alternative, PreferenceProfile, Ranking, RankingEntry, SortOrder,
};

mod error;
pub use error::KemenyError;

// ----------------------------- Weighting (public surface) ----------------------------

pub mod weighting {
    pub mod position;
    pub mod entropy;

    pub use position::{CustomWeight, PositionWeight};
    pub use entropy::{ConsensusLevel, EntropyProfile};
    pub use km_core::variables::AdaptiveMode;
}

pub use weighting::{AdaptiveMode, ConsensusLevel, CustomWeight, EntropyProfile, PositionWeight};

// ----------------------------- Kemeny engine (public surface) ------------------------

pub mod kemeny {
    pub mod cost_matrix;
    pub mod assignment;
    pub mod solver;

    pub use assignment::{solve_assignment, Assignment};
    pub use cost_matrix::{CostMatrix, SquareMatrix};
    pub use solver::{
        solve_adaptive, solve_classic, solve_position_weighted, AdaptiveKemenyResult,
        KemenyResult, WeightedKemenyResult,
    };
}

pub use kemeny::{
    solve_adaptive, solve_assignment, solve_classic, solve_position_weighted,
    AdaptiveKemenyResult, Assignment, CostMatrix, KemenyResult, SquareMatrix, WeightedKemenyResult,
};

// ----------------------------- Simple aggregators ------------------------------------

pub mod aggregation {
    pub mod rank_sum;
    pub mod pareto;

    pub use pareto::{analyze_pareto, ParetoReport};
    pub use rank_sum::aggregate_rank_sum;
}

pub use aggregation::{aggregate_rank_sum, analyze_pareto, ParetoReport};
