use crate::standings::TeamStanding;
use crate::tiebreak::RuleKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationOutcome {
    Resolved,
    Unresolved,
    LotteryRequired,
}

/// One entry of the calculation trace: which rule ran, over which teams,
/// and what it concluded. Every rule application is logged, resolved or
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCalculation {
    pub rule: RuleKind,
    pub team_ids: Vec<u32>,
    pub description: String,
    pub outcome: CalculationOutcome,
}

impl RuleCalculation {
    pub fn new(
        rule: RuleKind,
        team_ids: Vec<u32>,
        description: String,
        outcome: CalculationOutcome,
    ) -> Self {
        RuleCalculation {
            rule,
            team_ids,
            description,
            outcome,
        }
    }
}

/// Final output of one standings computation: the ranked list with
/// positions reassigned, whether any tie-break logic fired, the groups
/// that still need a manual lottery, and the ordered calculation trace.
#[derive(Debug, Clone, Serialize)]
pub struct TieBreakResult {
    pub standings: Vec<TeamStanding>,
    pub tie_break_applied: bool,
    pub lotteries_required: Vec<Vec<u32>>,
    pub calculations: Vec<RuleCalculation>,
}
