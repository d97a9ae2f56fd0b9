use crate::block::BlockResult;
use crate::context::BlockContext;
use crate::r#match::MatchRecord;
use crate::standings::StandingsTable;
use crate::team::Team;
use crate::tiebreak::{SportMetrics, TieBreakEngine};
use crate::utils::TimeEstimation;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One standings table's worth of input: the roster and confirmed matches
/// of a single grouping (e.g. a preliminary-round pool), plus optional
/// per-team sport metrics for the sport-specific rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub name: String,
    pub teams: Vec<Team>,
    pub matches: Vec<MatchRecord>,
    pub metrics: HashMap<u32, SportMetrics>,
}

impl Block {
    pub fn new(id: u32, name: &str, teams: Vec<Team>, matches: Vec<MatchRecord>) -> Self {
        Block {
            id,
            name: String::from(name),
            teams,
            matches,
            metrics: HashMap::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: HashMap<u32, SportMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Compute the block's final standings: aggregation, then tie-breaking.
    /// A pure function of the block and context; safe to call from any
    /// number of threads at once.
    pub fn compute(&self, ctx: &BlockContext) -> BlockResult {
        info!(
            "🏆 computing standings: {} ({} teams, {} matches)",
            self.name,
            self.teams.len(),
            self.matches.len()
        );

        let (result, estimated) = TimeEstimation::estimate(|| {
            let table = StandingsTable::from_matches(&self.teams, &self.matches, &ctx.scheme);

            TieBreakEngine::new(ctx, &self.matches, &self.metrics).resolve(table)
        });

        debug!("standings for {} computed: {} ms", self.name, estimated);

        if !result.lotteries_required.is_empty() {
            info!(
                "🎲 {}: {} tie group(s) require a manual lottery",
                self.name,
                result.lotteries_required.len()
            );
        }

        BlockResult::new(self.id, result)
    }
}

/// Per-block computations are independent: fan out over all blocks of a
/// tournament phase and collect the results.
pub fn compute_blocks(blocks: &[Block], ctx: &BlockContext) -> Vec<BlockResult> {
    blocks.par_iter().map(|block| block.compute(ctx)).collect()
}
