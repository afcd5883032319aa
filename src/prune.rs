use std::collections::HashMap;

use log::trace;
use smallvec::SmallVec;

use crate::{words::WordPool, Gap, GapId, Grid, GridCoord, MAX_GAP_LENGTH};

/// For each position in an ordered gap sequence, the later positions whose gaps cross it.
pub type CrossingTable = Vec<SmallVec<[GapId; MAX_GAP_LENGTH]>>;

/// Build the crossing table for an ordered gap sequence. Two gaps cross when they share a cell,
/// which for maximal runs means exactly one across gap and one down gap meeting at one cell.
pub fn crossing_table(gaps: &[Gap]) -> CrossingTable {
    let mut gaps_by_cell: HashMap<GridCoord, SmallVec<[GapId; 2]>> = HashMap::new();

    for (gap_id, gap) in gaps.iter().enumerate() {
        for coord in gap.cells() {
            gaps_by_cell.entry(coord).or_default().push(gap_id);
        }
    }

    let mut table: CrossingTable = Vec::with_capacity(gaps.len());
    for (gap_id, gap) in gaps.iter().enumerate() {
        let mut later: SmallVec<[GapId; MAX_GAP_LENGTH]> = SmallVec::new();

        for coord in gap.cells() {
            for &other_id in &gaps_by_cell[&coord] {
                if other_id > gap_id {
                    later.push(other_id);
                }
            }
        }

        later.sort_unstable();
        table.push(later);
    }

    table
}

/// The search state right after a word has been tentatively written into `gaps[position]`.
pub struct Trial<'a> {
    pub grid: &'a Grid,
    pub pool: &'a WordPool,
    pub gaps: &'a [Gap],
    /// Later positions whose gaps cross the one just filled.
    pub crossings: &'a [GapId],
    pub position: GapId,
}

/// Decides, after each tentative placement, whether the search should descend into it. Pruning
/// may only reject placements that cannot lead to a fill; it changes how fast a fill is found,
/// never which one.
pub trait PruningStrategy {
    fn admits(&self, trial: &Trial<'_>) -> bool;
}

/// Plain backtracking: every placement is explored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPruning;

impl PruningStrategy for NoPruning {
    fn admits(&self, _trial: &Trial<'_>) -> bool {
        true
    }
}

/// Look ahead at every later gap crossing the one just filled. If any of them has no unused word
/// left that fits its updated pattern, the placement is doomed and is rejected before descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardChecking;

impl PruningStrategy for ForwardChecking {
    fn admits(&self, trial: &Trial<'_>) -> bool {
        let placeholder = trial.grid.symbols().placeholder;

        for &other_id in trial.crossings {
            let other = &trial.gaps[other_id];
            let pattern = trial.grid.read_gap(other);

            if !trial.pool.has_candidate(&pattern, placeholder) {
                trace!(
                    "gap {} wipes out gap {} ({:?} at {},{})",
                    trial.position,
                    other_id,
                    other.direction,
                    other.row,
                    other.column,
                );
                return false;
            }
        }

        true
    }
}

/// The built-in pruning strategies, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pruning {
    None,
    #[default]
    ForwardCheck,
}

impl Pruning {
    pub const ALL: [Pruning; 2] = [Pruning::None, Pruning::ForwardCheck];

    pub fn name(&self) -> &'static str {
        match self {
            Pruning::None => "backtracking",
            Pruning::ForwardCheck => "forward-checking",
        }
    }
}

impl PruningStrategy for Pruning {
    fn admits(&self, trial: &Trial<'_>) -> bool {
        match self {
            Pruning::None => NoPruning.admits(trial),
            Pruning::ForwardCheck => ForwardChecking.admits(trial),
        }
    }
}
