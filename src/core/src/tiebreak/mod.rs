pub mod engine;
pub mod result;
pub mod rules;

pub use engine::TieBreakEngine;
pub use result::{CalculationOutcome, RuleCalculation, TieBreakResult};
pub use rules::{HeadToHead, RuleError, RuleKind, RuleSet, SportMetrics, TieBreakRule};
