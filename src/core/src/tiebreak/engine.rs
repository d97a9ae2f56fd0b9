use crate::context::{BlockContext, PointScheme, Sport};
use crate::r#match::MatchRecord;
use crate::standings::{StandingsTable, TeamStanding, assign_positions, initial_order};
use crate::tiebreak::rules::{head_to_head, keyed_value, value_label};
use crate::tiebreak::{
    CalculationOutcome, RuleCalculation, RuleError, RuleKind, RuleSet, SportMetrics,
    TieBreakResult,
};
use itertools::Itertools;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

enum RuleApplication {
    Resolved(String),
    Unresolved(String),
    LotteryRequired(String),
}

/// Resolves ordering inside statistically tied groups by applying the
/// configured rule chain. Constructed fresh per invocation; holds only
/// borrows of the caller's input data.
pub struct TieBreakEngine<'e> {
    sport: Sport,
    scheme: PointScheme,
    rules: &'e RuleSet,
    matches: &'e [MatchRecord],
    metrics: &'e HashMap<u32, SportMetrics>,
}

impl<'e> TieBreakEngine<'e> {
    pub fn new(
        ctx: &'e BlockContext,
        matches: &'e [MatchRecord],
        metrics: &'e HashMap<u32, SportMetrics>,
    ) -> Self {
        TieBreakEngine {
            sport: ctx.sport,
            scheme: ctx.scheme,
            rules: &ctx.rules,
            matches,
            metrics,
        }
    }

    pub fn resolve(&self, table: StandingsTable) -> TieBreakResult {
        let mut rows = table.rows;
        rows.sort_by(initial_order);

        // Phase 1: partition the ordered list into consecutive groups with
        // identical (points, goal difference, goals for).
        let chunks = rows.iter().chunk_by(|row| row.stat_key());
        let group_sizes: Vec<usize> = chunks
            .into_iter()
            .map(|(_, chunk)| chunk.count())
            .collect();

        let mut calculations = Vec::new();
        let mut lotteries_required = Vec::new();

        // Phase 2: per-group resolution. Groups of one keep their slot.
        let mut start = 0;
        for size in group_sizes {
            let end = start + size;

            if size >= 2 {
                let group = &mut rows[start..end];
                let resolved = self.resolve_group(group, &mut calculations);

                if !resolved {
                    lotteries_required.push(group.iter().map(|row| row.team_id).collect());
                }
            }

            start = end;
        }

        // Phase 3: merge happened in place; renumber so that teams with an
        // identical statistical triplet share the displayed position even
        // when a rule resolved their order.
        assign_positions(&mut rows);

        let tie_break_applied = !calculations.is_empty();

        TieBreakResult {
            standings: rows,
            tie_break_applied,
            lotteries_required,
            calculations,
        }
    }

    fn resolve_group(
        &self,
        group: &mut [TeamStanding],
        calculations: &mut Vec<RuleCalculation>,
    ) -> bool {
        debug!(
            "⚖️ tie between {} teams: {}",
            group.len(),
            Self::join_names(group)
        );

        for rule in self.rules.iter() {
            let application = self.apply_rule(rule.kind, group);
            let team_ids: Vec<u32> = group.iter().map(|row| row.team_id).collect();

            match application {
                Ok(RuleApplication::Resolved(description)) => {
                    calculations.push(RuleCalculation::new(
                        rule.kind,
                        team_ids,
                        description,
                        CalculationOutcome::Resolved,
                    ));
                    return true;
                }
                Ok(RuleApplication::Unresolved(description)) => {
                    calculations.push(RuleCalculation::new(
                        rule.kind,
                        team_ids,
                        description,
                        CalculationOutcome::Unresolved,
                    ));
                }
                Ok(RuleApplication::LotteryRequired(description)) => {
                    calculations.push(RuleCalculation::new(
                        rule.kind,
                        team_ids,
                        description,
                        CalculationOutcome::LotteryRequired,
                    ));
                }
                Err(error) => {
                    // One misbehaving rule never aborts the computation:
                    // log it and continue with the next rule.
                    calculations.push(RuleCalculation::new(
                        rule.kind,
                        team_ids,
                        error.to_string(),
                        CalculationOutcome::Unresolved,
                    ));
                }
            }
        }

        false
    }

    fn apply_rule(
        &self,
        kind: RuleKind,
        group: &mut [TeamStanding],
    ) -> Result<RuleApplication, RuleError> {
        if !kind.is_enabled_for(self.sport) {
            return Err(RuleError::NotApplicable(kind, self.sport));
        }

        match kind {
            RuleKind::Lottery => Ok(RuleApplication::LotteryRequired(format!(
                "manual lottery required for {}",
                Self::join_names(group)
            ))),
            RuleKind::HeadToHead => Ok(self.apply_head_to_head(group)),
            _ => self.apply_keyed(kind, group),
        }
    }

    /// Keyed rules re-sort the group stably by their per-team key. The rule
    /// resolves the group only when every key is distinct; a partial
    /// reorder is kept for the next rule either way.
    fn apply_keyed(
        &self,
        kind: RuleKind,
        group: &mut [TeamStanding],
    ) -> Result<RuleApplication, RuleError> {
        if kind.requires_metrics() && !group.iter().any(|row| self.has_metric(kind, row.team_id)) {
            return Err(RuleError::MissingMetrics(
                kind,
                group.iter().map(|row| row.team_id).collect(),
            ));
        }

        group.sort_by_key(|row| {
            std::cmp::Reverse(keyed_value(kind, row, self.metrics.get(&row.team_id)))
        });

        let description = format!(
            "{}: {}",
            kind,
            group
                .iter()
                .map(|row| {
                    format!(
                        "{} {}",
                        row.name,
                        value_label(kind, row, self.metrics.get(&row.team_id))
                    )
                })
                .join(", ")
        );

        let all_distinct = group
            .windows(2)
            .all(|pair| {
                keyed_value(kind, &pair[0], self.metrics.get(&pair[0].team_id))
                    != keyed_value(kind, &pair[1], self.metrics.get(&pair[1].team_id))
            });

        if all_distinct {
            Ok(RuleApplication::Resolved(description))
        } else {
            Ok(RuleApplication::Unresolved(description))
        }
    }

    /// Head-to-head is only implemented for exactly two tied teams: points
    /// earned in the confirmed meetings between the pair, then goal
    /// differential in just those meetings. For larger groups this is a
    /// no-op reported as unresolved.
    fn apply_head_to_head(&self, group: &mut [TeamStanding]) -> RuleApplication {
        if group.len() != 2 {
            return RuleApplication::Unresolved(format!(
                "head_to_head is only defined for two tied teams, {} are tied",
                group.len()
            ));
        }

        let record = head_to_head(
            group[0].team_id,
            group[1].team_id,
            self.matches,
            &self.scheme,
        );

        if record.meetings == 0 {
            return RuleApplication::Unresolved(format!(
                "no confirmed meetings between {} and {}",
                group[0].name, group[1].name
            ));
        }

        let description = format!(
            "head_to_head across {} meeting(s): {} {}pts ({:+}), {} {}pts ({:+})",
            record.meetings,
            group[0].name,
            record.points_a,
            record.diff_a,
            group[1].name,
            record.points_b,
            record.diff_b
        );

        let decision = record
            .points_a
            .cmp(&record.points_b)
            .then(record.diff_a.cmp(&record.diff_b));

        match decision {
            Ordering::Greater => RuleApplication::Resolved(description),
            Ordering::Less => {
                group.swap(0, 1);
                RuleApplication::Resolved(description)
            }
            Ordering::Equal => RuleApplication::Unresolved(description),
        }
    }

    fn has_metric(&self, kind: RuleKind, team_id: u32) -> bool {
        let metrics = match self.metrics.get(&team_id) {
            Some(metrics) => metrics,
            None => return false,
        };

        match kind {
            RuleKind::FairPlay => metrics.fair_play_points.is_some(),
            RuleKind::BestTime => metrics.best_time.is_some(),
            RuleKind::PodiumCount => metrics.podiums.is_some(),
            _ => true,
        }
    }

    fn join_names(group: &[TeamStanding]) -> String {
        group.iter().map(|row| row.name.as_str()).join(", ")
    }
}
