use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

/// Raw score of one side of a match. Period-based sports report a list of
/// per-period sub-scores; the total is the sum of all elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Total(u32),
    Periods(Vec<u32>),
}

impl ScoreValue {
    pub fn total(&self) -> u32 {
        match self {
            ScoreValue::Total(total) => *total,
            ScoreValue::Periods(periods) => periods.iter().sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// Confirmed match record within one block. Immutable input: the core never
/// writes these back. Invariant for a confirmed decisive match: exactly one
/// of {draw, walkover, winner set} holds; a drawn match has no winner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub date: NaiveDateTime,

    pub home_team_id: u32,
    pub away_team_id: u32,

    pub home_score: Option<ScoreValue>,
    pub away_score: Option<ScoreValue>,

    pub is_draw: bool,
    pub is_walkover: bool,
    pub winner_id: Option<u32>,

    pub is_confirmed: bool,
}

impl MatchRecord {
    /// A match contributes to aggregation only when it is confirmed and both
    /// scores are present. An absent score means "not yet confirmed" and is
    /// never defaulted to zero.
    pub fn is_countable(&self) -> bool {
        self.is_confirmed && self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn is_between(&self, team_a: u32, team_b: u32) -> bool {
        (self.home_team_id == team_a && self.away_team_id == team_b)
            || (self.home_team_id == team_b && self.away_team_id == team_a)
    }

    /// Goal total scored by the given side, `None` when the side did not play
    /// in this match or its score is absent.
    pub fn total_for(&self, team_id: u32) -> Option<u32> {
        if self.home_team_id == team_id {
            self.home_score.as_ref().map(ScoreValue::total)
        } else if self.away_team_id == team_id {
            self.away_score.as_ref().map(ScoreValue::total)
        } else {
            None
        }
    }

    /// Outcome of a countable match. Walkover wins count identically to
    /// ordinary wins here; the display layer distinguishes them. A record
    /// with no discriminant set is a data inconsistency and is recovered by
    /// comparing totals.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.is_countable() {
            return None;
        }

        if self.is_draw {
            return Some(MatchOutcome::Draw);
        }

        match self.winner_id {
            Some(winner) if winner == self.home_team_id => Some(MatchOutcome::HomeWin),
            Some(winner) if winner == self.away_team_id => Some(MatchOutcome::AwayWin),
            Some(winner) => {
                warn!(
                    "match {}: winner {} is not a participant, deriving outcome from score",
                    self.id, winner
                );
                Some(self.outcome_from_score())
            }
            None => {
                warn!(
                    "match {}: confirmed without draw/walkover/winner flags, deriving outcome from score",
                    self.id
                );
                Some(self.outcome_from_score())
            }
        }
    }

    fn outcome_from_score(&self) -> MatchOutcome {
        let home = self.home_score.as_ref().map(ScoreValue::total).unwrap_or(0);
        let away = self.away_score.as_ref().map(ScoreValue::total).unwrap_or(0);

        if home > away {
            MatchOutcome::HomeWin
        } else if away > home {
            MatchOutcome::AwayWin
        } else {
            MatchOutcome::Draw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn record(home: u32, away: u32) -> MatchRecord {
        MatchRecord {
            id: String::from("m1"),
            date: date(),
            home_team_id: home,
            away_team_id: away,
            home_score: Some(ScoreValue::Total(2)),
            away_score: Some(ScoreValue::Total(1)),
            is_draw: false,
            is_walkover: false,
            winner_id: Some(home),
            is_confirmed: true,
        }
    }

    #[test]
    fn test_period_scores_sum_to_total() {
        let home = ScoreValue::Periods(vec![1, 1, 1, 0]);
        let away = ScoreValue::Periods(vec![0, 1, 0, 0]);

        assert_eq!(home.total(), 3);
        assert_eq!(away.total(), 1);
    }

    #[test]
    fn test_unconfirmed_match_is_not_countable() {
        let mut m = record(1, 2);
        m.is_confirmed = false;

        assert!(!m.is_countable());
        assert_eq!(m.outcome(), None);
    }

    #[test]
    fn test_missing_score_is_not_countable() {
        let mut m = record(1, 2);
        m.home_score = None;

        assert!(!m.is_countable());
    }

    #[test]
    fn test_winner_flag_decides_outcome() {
        let m = record(1, 2);
        assert_eq!(m.outcome(), Some(MatchOutcome::HomeWin));

        let mut away_win = record(1, 2);
        away_win.winner_id = Some(2);
        assert_eq!(away_win.outcome(), Some(MatchOutcome::AwayWin));
    }

    #[test]
    fn test_draw_flag_overrides_scores() {
        let mut m = record(1, 2);
        m.is_draw = true;
        m.winner_id = None;
        m.home_score = Some(ScoreValue::Total(1));
        m.away_score = Some(ScoreValue::Total(1));

        assert_eq!(m.outcome(), Some(MatchOutcome::Draw));
    }

    #[test]
    fn test_missing_flags_fall_back_to_score_comparison() {
        let mut m = record(1, 2);
        m.winner_id = None;
        assert_eq!(m.outcome(), Some(MatchOutcome::HomeWin));

        m.home_score = Some(ScoreValue::Total(1));
        m.away_score = Some(ScoreValue::Total(1));
        assert_eq!(m.outcome(), Some(MatchOutcome::Draw));
    }

    #[test]
    fn test_total_for_sides() {
        let m = record(7, 9);

        assert_eq!(m.total_for(7), Some(2));
        assert_eq!(m.total_for(9), Some(1));
        assert_eq!(m.total_for(11), None);
    }
}
