use crate::tiebreak::TieBreakResult;
use serde::Serialize;

/// Outcome of one block's standings computation, handed back to the
/// reporting layer. The caller owns persistence and rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BlockResult {
    pub block_id: u32,
    pub tie_break: TieBreakResult,
}

impl BlockResult {
    pub fn new(block_id: u32, tie_break: TieBreakResult) -> Self {
        BlockResult {
            block_id,
            tie_break,
        }
    }
}
