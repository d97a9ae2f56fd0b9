use crate::context::PointScheme;
use crate::r#match::{MatchOutcome, MatchRecord};
use crate::team::Team;
use log::warn;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// One row of a block's standings table. Rebuilt from scratch on every
/// aggregation run; no identity persists across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStanding {
    pub team_id: u32,
    pub name: String,
    pub short_name: Option<String>,

    /// 1-based rank. Teams with an identical (points, goal difference,
    /// goals for) triplet share the same number.
    pub position: u32,

    pub points: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamStanding {
    pub fn new(team: &Team) -> Self {
        TeamStanding {
            team_id: team.id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            position: 0,
            points: 0,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    /// Always computed, never stored: a team with zero matches played reads
    /// as 0.
    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    /// The statistical triplet that defines "tied" for grouping and for
    /// shared position numbers.
    pub fn stat_key(&self) -> (u32, i64, u32) {
        (self.points, self.goal_difference(), self.goals_for)
    }

    fn name_sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Initial comparator: points desc, goal difference desc, goals for desc,
/// then display name asc. The name key only produces a stable starting
/// order for the tie-breaking engine; it never assigns a final rank.
pub fn initial_order(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.name_sort_key().cmp(&b.name_sort_key()))
}

/// Reassign 1-based positions over the final list order. Teams share a
/// number only when their statistical triplet is identical; a tie-break
/// rule reordering two statistically-identical teams does not split their
/// displayed rank.
pub fn assign_positions(rows: &mut [TeamStanding]) {
    let mut prev_key = None;
    let mut position = 0;

    for (index, row) in rows.iter_mut().enumerate() {
        let key = row.stat_key();

        if prev_key != Some(key) {
            position = index as u32 + 1;
            prev_key = Some(key);
        }

        row.position = position;
    }
}

/// Standings of one block: one row per roster team, derived from the
/// confirmed match list. A pure function of its inputs.
#[derive(Debug, Clone, Serialize)]
pub struct StandingsTable {
    pub rows: Vec<TeamStanding>,
}

impl StandingsTable {
    pub fn from_matches(teams: &[Team], matches: &[MatchRecord], scheme: &PointScheme) -> Self {
        let roster: HashSet<u32> = teams.iter().map(|team| team.id).collect();

        for record in matches.iter().filter(|m| m.is_confirmed) {
            for side in [record.home_team_id, record.away_team_id] {
                if !roster.contains(&side) {
                    warn!(
                        "match {} references team {} outside the block roster",
                        record.id, side
                    );
                }
            }
        }

        let mut rows: Vec<TeamStanding> = teams
            .iter()
            .map(|team| {
                let mut row = TeamStanding::new(team);

                for record in matches
                    .iter()
                    .filter(|m| m.involves(team.id) && m.is_countable())
                {
                    Self::apply_match(&mut row, record, scheme);
                }

                row
            })
            .collect();

        rows.sort_by(initial_order);
        assign_positions(&mut rows);

        StandingsTable { rows }
    }

    fn apply_match(row: &mut TeamStanding, record: &MatchRecord, scheme: &PointScheme) {
        let outcome = match record.outcome() {
            Some(outcome) => outcome,
            None => return,
        };

        let is_home = record.home_team_id == row.team_id;

        let goals_for = record.total_for(row.team_id).unwrap_or(0);
        let opponent = if is_home {
            record.away_team_id
        } else {
            record.home_team_id
        };
        let goals_against = record.total_for(opponent).unwrap_or(0);

        row.played += 1;
        row.goals_for += goals_for;
        row.goals_against += goals_against;

        let won = matches!(
            (outcome, is_home),
            (MatchOutcome::HomeWin, true) | (MatchOutcome::AwayWin, false)
        );

        if won {
            row.won += 1;
            row.points += scheme.win;
        } else if outcome == MatchOutcome::Draw {
            row.drawn += 1;
            row.points += scheme.draw;
        } else {
            row.lost += 1;
            row.points += scheme.loss;
        }
    }

    pub fn row(&self, team_id: u32) -> Option<&TeamStanding> {
        self.rows.iter().find(|row| row.team_id == team_id)
    }
}
