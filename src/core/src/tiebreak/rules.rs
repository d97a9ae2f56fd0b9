use crate::context::{PointScheme, Sport};
use crate::r#match::{MatchOutcome, MatchRecord};
use crate::standings::TeamStanding;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of tie-break rule kinds. Configuration selects and orders
/// these per tournament phase; dispatch is a plain `match`, one pure
/// key function per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Points,
    HeadToHead,
    GoalDifference,
    GoalsFor,
    WinRate,
    FairPlay,
    BestTime,
    WinCount,
    PodiumCount,
    Lottery,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Points => "points",
            RuleKind::HeadToHead => "head_to_head",
            RuleKind::GoalDifference => "goal_difference",
            RuleKind::GoalsFor => "goals_for",
            RuleKind::WinRate => "win_rate",
            RuleKind::FairPlay => "fair_play",
            RuleKind::BestTime => "best_time",
            RuleKind::WinCount => "win_count",
            RuleKind::PodiumCount => "podium_count",
            RuleKind::Lottery => "lottery",
        }
    }

    /// Whether the rule is meaningful for the given sport. Fair-play
    /// accounting only exists for football-style sports; time-based rules
    /// only for timed sports.
    pub fn is_enabled_for(&self, sport: Sport) -> bool {
        match self {
            RuleKind::FairPlay => sport.has_fair_play(),
            RuleKind::BestTime | RuleKind::WinCount | RuleKind::PodiumCount => sport.is_timed(),
            _ => true,
        }
    }

    /// Rules whose key comes from caller-supplied sport metrics rather than
    /// the aggregated standings row.
    pub fn requires_metrics(&self) -> bool {
        matches!(
            self,
            RuleKind::FairPlay | RuleKind::BestTime | RuleKind::PodiumCount
        )
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured rule: kind plus priority order. Lower order runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreakRule {
    pub kind: RuleKind,
    pub order: u32,
}

impl TieBreakRule {
    pub fn new(kind: RuleKind, order: u32) -> Self {
        TieBreakRule { kind, order }
    }
}

/// Ordered rule chain for one phase and sport. Empty means "initial order
/// only, no tie-breaking".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<TieBreakRule>,
}

impl RuleSet {
    pub fn new(mut rules: Vec<TieBreakRule>) -> Self {
        rules.sort_by_key(|rule| rule.order);
        RuleSet { rules }
    }

    /// Convenience constructor: kinds in the given order, priorities 1..n.
    pub fn from_kinds(kinds: &[RuleKind]) -> Self {
        RuleSet {
            rules: kinds
                .iter()
                .enumerate()
                .map(|(index, kind)| TieBreakRule::new(*kind, index as u32 + 1))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TieBreakRule> {
        self.rules.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Per-team values the aggregator cannot derive from match records,
/// supplied by the caller for sport-specific rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportMetrics {
    /// Accumulated penalty points; fewer is better.
    pub fair_play_points: Option<u32>,
    /// Best result time in seconds; lower is better.
    pub best_time: Option<f64>,
    /// Podium finishes across the block's events.
    pub podiums: Option<u32>,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {0} is not applicable to sport {1:?}")]
    NotApplicable(RuleKind, Sport),
    #[error("no {0} metrics supplied for any of the tied teams {1:?}")]
    MissingMetrics(RuleKind, Vec<u32>),
}

/// Sort key for a keyed rule; higher ranks first. Inverted metrics
/// (fair-play points, best time) are negated; a missing metric value sorts
/// after every present one.
pub(crate) fn keyed_value(
    kind: RuleKind,
    standing: &TeamStanding,
    metrics: Option<&SportMetrics>,
) -> i64 {
    match kind {
        RuleKind::Points => standing.points as i64,
        RuleKind::GoalDifference => standing.goal_difference(),
        RuleKind::GoalsFor => standing.goals_for as i64,
        RuleKind::WinRate => {
            if standing.played == 0 {
                0
            } else {
                // Fixed-point: 10_000 = a 100% win rate
                standing.won as i64 * 10_000 / standing.played as i64
            }
        }
        RuleKind::WinCount => standing.won as i64,
        RuleKind::FairPlay => match metrics.and_then(|m| m.fair_play_points) {
            Some(points) => -(points as i64),
            None => i64::MIN,
        },
        RuleKind::BestTime => match metrics.and_then(|m| m.best_time) {
            Some(seconds) => -((seconds * 1000.0).round() as i64),
            None => i64::MIN,
        },
        RuleKind::PodiumCount => match metrics.and_then(|m| m.podiums) {
            Some(podiums) => podiums as i64,
            None => i64::MIN,
        },
        // Pairwise / terminal kinds never reach the keyed path.
        RuleKind::HeadToHead | RuleKind::Lottery => 0,
    }
}

/// Human-readable value for the calculation log.
pub(crate) fn value_label(
    kind: RuleKind,
    standing: &TeamStanding,
    metrics: Option<&SportMetrics>,
) -> String {
    match kind {
        RuleKind::Points => format!("{}", standing.points),
        RuleKind::GoalDifference => format!("{:+}", standing.goal_difference()),
        RuleKind::GoalsFor => format!("{}", standing.goals_for),
        RuleKind::WinRate => {
            let rate = keyed_value(RuleKind::WinRate, standing, metrics);
            format!("{}.{:02}%", rate / 100, rate % 100)
        }
        RuleKind::WinCount => format!("{}", standing.won),
        RuleKind::FairPlay => match metrics.and_then(|m| m.fair_play_points) {
            Some(points) => format!("{points}"),
            None => String::from("n/a"),
        },
        RuleKind::BestTime => match metrics.and_then(|m| m.best_time) {
            Some(seconds) => format!("{seconds:.2}s"),
            None => String::from("n/a"),
        },
        RuleKind::PodiumCount => match metrics.and_then(|m| m.podiums) {
            Some(podiums) => format!("{podiums}"),
            None => String::from("n/a"),
        },
        RuleKind::HeadToHead | RuleKind::Lottery => String::new(),
    }
}

/// Outcome of the confirmed meetings between two tied teams: points earned
/// and goal differential restricted to just those matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHead {
    pub meetings: u32,
    pub points_a: u32,
    pub points_b: u32,
    pub diff_a: i64,
    pub diff_b: i64,
}

pub(crate) fn head_to_head(
    team_a: u32,
    team_b: u32,
    matches: &[MatchRecord],
    scheme: &PointScheme,
) -> HeadToHead {
    let mut record = HeadToHead::default();

    for meeting in matches
        .iter()
        .filter(|m| m.is_between(team_a, team_b) && m.is_countable())
    {
        let outcome = match meeting.outcome() {
            Some(outcome) => outcome,
            None => continue,
        };

        let goals_a = meeting.total_for(team_a).unwrap_or(0) as i64;
        let goals_b = meeting.total_for(team_b).unwrap_or(0) as i64;

        record.meetings += 1;
        record.diff_a += goals_a - goals_b;
        record.diff_b += goals_b - goals_a;

        let winner = match outcome {
            MatchOutcome::Draw => None,
            MatchOutcome::HomeWin => Some(meeting.home_team_id),
            MatchOutcome::AwayWin => Some(meeting.away_team_id),
        };

        match winner {
            Some(id) if id == team_a => {
                record.points_a += scheme.win;
                record.points_b += scheme.loss;
            }
            Some(_) => {
                record.points_a += scheme.loss;
                record.points_b += scheme.win;
            }
            None => {
                record.points_a += scheme.draw;
                record.points_b += scheme.draw;
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::ScoreValue;
    use crate::team::Team;
    use chrono::NaiveDate;

    fn standing(won: u32, played: u32) -> TeamStanding {
        let mut row = TeamStanding::new(&Team::new(1, "Alfa"));
        row.won = won;
        row.played = played;
        row
    }

    fn meeting(id: &str, home: u32, away: u32, home_goals: u32, away_goals: u32) -> MatchRecord {
        MatchRecord {
            id: String::from(id),
            date: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            home_team_id: home,
            away_team_id: away,
            home_score: Some(ScoreValue::Total(home_goals)),
            away_score: Some(ScoreValue::Total(away_goals)),
            is_draw: home_goals == away_goals,
            is_walkover: false,
            winner_id: if home_goals > away_goals {
                Some(home)
            } else if away_goals > home_goals {
                Some(away)
            } else {
                None
            },
            is_confirmed: true,
        }
    }

    #[test]
    fn test_rule_set_orders_by_priority() {
        let set = RuleSet::new(vec![
            TieBreakRule::new(RuleKind::Lottery, 30),
            TieBreakRule::new(RuleKind::HeadToHead, 10),
            TieBreakRule::new(RuleKind::WinRate, 20),
        ]);

        let kinds: Vec<RuleKind> = set.iter().map(|rule| rule.kind).collect();
        assert_eq!(
            kinds,
            vec![RuleKind::HeadToHead, RuleKind::WinRate, RuleKind::Lottery]
        );
    }

    #[test]
    fn test_sport_gating() {
        assert!(RuleKind::FairPlay.is_enabled_for(Sport::Football));
        assert!(!RuleKind::FairPlay.is_enabled_for(Sport::Athletics));

        assert!(RuleKind::BestTime.is_enabled_for(Sport::Swimming));
        assert!(!RuleKind::BestTime.is_enabled_for(Sport::Football));

        assert!(RuleKind::HeadToHead.is_enabled_for(Sport::Athletics));
        assert!(RuleKind::Lottery.is_enabled_for(Sport::Generic));
    }

    #[test]
    fn test_win_rate_key_handles_zero_played() {
        assert_eq!(keyed_value(RuleKind::WinRate, &standing(0, 0), None), 0);
        assert_eq!(
            keyed_value(RuleKind::WinRate, &standing(1, 2), None),
            5_000
        );
        assert_eq!(
            keyed_value(RuleKind::WinRate, &standing(2, 3), None),
            6_666
        );
    }

    #[test]
    fn test_inverted_metric_keys() {
        let metrics = SportMetrics {
            fair_play_points: Some(4),
            best_time: Some(52.31),
            podiums: Some(2),
        };

        let row = standing(0, 0);

        // Fewer fair-play points rank first.
        assert!(
            keyed_value(RuleKind::FairPlay, &row, Some(&metrics))
                > keyed_value(
                    RuleKind::FairPlay,
                    &row,
                    Some(&SportMetrics {
                        fair_play_points: Some(9),
                        ..SportMetrics::default()
                    })
                )
        );

        // Lower time ranks first; missing time sorts after any present one.
        assert_eq!(
            keyed_value(RuleKind::BestTime, &row, Some(&metrics)),
            -52_310
        );
        assert_eq!(keyed_value(RuleKind::BestTime, &row, None), i64::MIN);

        assert_eq!(keyed_value(RuleKind::PodiumCount, &row, Some(&metrics)), 2);
    }

    #[test]
    fn test_head_to_head_points_and_difference() {
        let matches = vec![
            meeting("m1", 1, 2, 2, 0),
            meeting("m2", 2, 1, 1, 1),
            // A meeting with a third team is ignored.
            meeting("m3", 1, 3, 0, 5),
        ];

        let record = head_to_head(1, 2, &matches, &PointScheme::default());

        assert_eq!(record.meetings, 2);
        assert_eq!(record.points_a, 4);
        assert_eq!(record.points_b, 1);
        assert_eq!(record.diff_a, 2);
        assert_eq!(record.diff_b, -2);
    }

    #[test]
    fn test_head_to_head_ignores_unconfirmed_meetings() {
        let mut pending = meeting("m1", 1, 2, 3, 0);
        pending.is_confirmed = false;

        let record = head_to_head(1, 2, &[pending], &PointScheme::default());
        assert_eq!(record, HeadToHead::default());
    }
}
