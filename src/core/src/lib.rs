pub mod block;
pub mod context;
pub mod r#match;
pub mod standings;
pub mod team;
pub mod tiebreak;

pub mod utils;

// Re-export the call-contract types
pub use block::{Block, BlockResult, compute_blocks};
pub use context::{BlockContext, Phase, PointScheme, Sport};
pub use r#match::{MatchOutcome, MatchRecord, ScoreValue};
pub use standings::{StandingsTable, TeamStanding};
pub use team::Team;

// Tie-breaking exports
pub use tiebreak::{
    CalculationOutcome, HeadToHead, RuleCalculation, RuleError, RuleKind, RuleSet, SportMetrics,
    TieBreakEngine, TieBreakResult, TieBreakRule,
};
