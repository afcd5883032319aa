use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bit_set::BitSet;
use instant::{Duration, Instant};
use log::debug;
use thiserror::Error;

use crate::{
    grid::Pattern,
    order::{GapOrder, OrderingStrategy},
    prune::{crossing_table, Pruning, PruningStrategy, Trial},
    words::WordPool,
    extract_gaps, Cell, Gap, Grid, GridCoord, WordId,
};

/// A struct tracking statistics about the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Search nodes entered, i.e. gaps we started looking for a word for.
    pub states: u64,
    /// Words tentatively written into a gap.
    pub placements: u64,
    /// Placements undone after the search below them failed.
    pub backtracks: u64,
    /// Placements rejected by the pruning strategy without descending.
    pub pruned: u64,
    pub duration: Duration,
}

/// A filled grid together with the statistics of the search that produced it.
#[derive(Debug, Clone)]
pub struct Solution {
    pub grid: Grid,
    pub statistics: Statistics,
}

/// Why a solve produced no grid. None of these ever come with a partially filled grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveFailure {
    #[error("no assignment of the words fills every gap")]
    NoSolution,
    #[error("word {0:?} contains a separator or placeholder")]
    InvalidWord(String),
    #[error("open cell at {0:?} is not part of any gap")]
    Uncovered(GridCoord),
    #[error("search was cancelled")]
    Cancelled,
    #[error("search ran past its time limit")]
    TimedOut,
}

/// A flag another thread can raise to stop a running search. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits checked every time the search enters a node.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    pub cancel: Option<CancelToken>,
    pub time_limit: Option<Duration>,
}

impl SearchControl {
    fn interruption(&self, start: Instant) -> Option<SolveFailure> {
        if self.cancel.as_ref().map(CancelToken::is_cancelled).unwrap_or(false) {
            return Some(SolveFailure::Cancelled);
        }
        match self.time_limit {
            Some(limit) if start.elapsed() >= limit => Some(SolveFailure::TimedOut),
            _ => None,
        }
    }
}

/// One level of the search: the gap at the same position in the sequence, what it held before we
/// touched it, and where we are in its candidate list.
struct Frame {
    pattern: Pattern,
    next_word: WordId,
    placed: Option<WordId>,
}

/// Put back the pattern and free the word of every frame that still holds a placement.
fn unwind(grid: &mut Grid, pool: &mut WordPool, gaps: &[Gap], frames: &mut Vec<Frame>) {
    while let Some(frame) = frames.pop() {
        if let Some(word_id) = frame.placed {
            let gap = &gaps[frames.len()];
            grid.write_gap(gap, &frame.pattern);
            pool.release(gap.length, word_id);
        }
    }
}

/// Fill `gaps`, in the given order, with words from `pool`, writing them into `grid`.
///
/// This is a depth-first search driven by an explicit stack of frames rather than native
/// recursion, so the depth is bounded by the heap instead of the thread's stack. Each frame
/// remembers the pattern its gap held on entry; undoing a placement writes that pattern back and
/// releases the word, so sibling branches always see exactly the state their parent committed.
///
/// On success the grid holds the fill and the used words stay claimed. On any failure both `grid`
/// and `pool` are returned to exactly the state they were passed in with.
pub fn search<P: PruningStrategy + ?Sized>(
    grid: &mut Grid,
    pool: &mut WordPool,
    gaps: &[Gap],
    pruning: &P,
    control: &SearchControl,
) -> Result<Statistics, SolveFailure> {
    let start = Instant::now();
    let placeholder = grid.symbols().placeholder;
    let crossings = crossing_table(gaps);

    let mut statistics = Statistics::default();
    let mut frames: Vec<Frame> = Vec::with_capacity(gaps.len());

    'explore: loop {
        if let Some(failure) = control.interruption(start) {
            unwind(grid, pool, gaps, &mut frames);
            return Err(failure);
        }

        // Every gap holds a word and every crossing agrees: done.
        if frames.len() == gaps.len() {
            statistics.duration = start.elapsed();
            return Ok(statistics);
        }

        statistics.states += 1;
        frames.push(Frame {
            pattern: grid.read_gap(&gaps[frames.len()]),
            next_word: 0,
            placed: None,
        });

        // Move the deepest frame on to its next workable word. A frame that runs out is popped,
        // and its parent then has to undo its own placement and try its next word in turn.
        while let Some(position) = frames.len().checked_sub(1) {
            let gap = &gaps[position];
            let frame = &mut frames[position];

            if let Some(word_id) = frame.placed.take() {
                grid.write_gap(gap, &frame.pattern);
                pool.release(gap.length, word_id);
                statistics.backtracks += 1;
            }

            while let Some(word_id) = pool.next_candidate(&frame.pattern, placeholder, frame.next_word) {
                frame.next_word = word_id + 1;

                let letters = pool.claim(gap.length, word_id);
                grid.write_gap(gap, letters);
                statistics.placements += 1;

                let trial = Trial {
                    grid: &*grid,
                    pool: &*pool,
                    gaps,
                    crossings: &crossings[position],
                    position,
                };
                if pruning.admits(&trial) {
                    frame.placed = Some(word_id);
                    continue 'explore;
                }

                statistics.pruned += 1;
                grid.write_gap(gap, &frame.pattern);
                pool.release(gap.length, word_id);
            }

            frames.pop();
        }

        statistics.duration = start.elapsed();
        debug!("search exhausted after {:?}", statistics);
        return Err(SolveFailure::NoSolution);
    }
}

/// A configurable solver: an ordering strategy decides which gap to attempt next, and a pruning
/// strategy decides which tentative placements are worth descending into.
#[derive(Debug, Clone)]
pub struct Solver<O = GapOrder, P = Pruning> {
    ordering: O,
    pruning: P,
    control: SearchControl,
}

impl Solver<GapOrder, Pruning> {
    pub fn new(order: GapOrder, pruning: Pruning) -> Solver {
        Solver::with_strategies(order, pruning)
    }

    pub fn name(&self) -> String {
        format!("{} / {}", self.ordering.name(), self.pruning.name())
    }
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::new(GapOrder::default(), Pruning::default())
    }
}

impl<O: OrderingStrategy, P: PruningStrategy> Solver<O, P> {
    pub fn with_strategies(ordering: O, pruning: P) -> Solver<O, P> {
        Solver {
            ordering,
            pruning,
            control: SearchControl::default(),
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Solver<O, P> {
        self.control.cancel = Some(token);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Solver<O, P> {
        self.control.time_limit = Some(limit);
        self
    }

    /// Fill every gap of `grid` with a distinct entry of `words`. The input grid is left
    /// untouched; the filled copy is handed back on success.
    pub fn solve<S: AsRef<str>>(&self, grid: &Grid, words: &[S]) -> Result<Solution, SolveFailure> {
        if let Some(word) = invalid_word(grid, words) {
            return Err(SolveFailure::InvalidWord(word.to_string()));
        }

        let mut grid = grid.clone();
        let mut pool = WordPool::new(words);
        let gaps = self.ordering.arrange(extract_gaps(&grid));

        if let Some(coord) = uncovered_placeholder(&grid, &gaps) {
            return Err(SolveFailure::Uncovered(coord));
        }

        debug!(
            "solving {}x{} grid: {} gaps, {} words",
            grid.height(),
            grid.width(),
            gaps.len(),
            pool.len(),
        );

        let statistics = search(&mut grid, &mut pool, &gaps, &self.pruning, &self.control)?;
        debug!("solved: {:?}", statistics);

        Ok(Solution { grid, statistics })
    }
}

/// Solve with the default configuration: longest gaps first, with forward checking.
pub fn solve<S: AsRef<str>>(grid: &Grid, words: &[S]) -> Result<Solution, SolveFailure> {
    Solver::default().solve(grid, words)
}

/// A word holding either grid symbol would leave a placeholder behind or reshape the grid.
fn invalid_word<'a, S: AsRef<str>>(grid: &Grid, words: &'a [S]) -> Option<&'a str> {
    let symbols = grid.symbols();

    words
        .iter()
        .map(|word| word.as_ref())
        .find(|word| word.contains(symbols.separator) || word.contains(symbols.placeholder))
}

/// An open cell no gap covers could never receive a letter.
fn uncovered_placeholder(grid: &Grid, gaps: &[Gap]) -> Option<GridCoord> {
    let mut covered = BitSet::with_capacity(grid.width() * grid.height());
    for gap in gaps {
        for (row, col) in gap.cells() {
            covered.insert(row * grid.width() + col);
        }
    }

    (0..grid.height())
        .flat_map(|row| (0..grid.width()).map(move |col| (row, col)))
        .find(|&(row, col)| {
            grid.cell((row, col)) == Cell::Placeholder && !covered.contains(row * grid.width() + col)
        })
}

/// Check a filled grid against a word list: no placeholder is left, every gap spells a word from
/// the list, and no entry of the list is spent on two gaps.
pub fn verify<S: AsRef<str>>(grid: &Grid, words: &[S]) -> bool {
    if !grid.is_complete() {
        return false;
    }

    let mut used = BitSet::with_capacity(words.len());
    extract_gaps(grid).iter().all(|gap| {
        let spelled: String = grid.read_gap(gap).into_iter().collect();

        match (0..words.len()).find(|&idx| !used.contains(idx) && words[idx].as_ref() == spelled) {
            Some(idx) => {
                used.insert(idx);
                true
            }
            None => false,
        }
    })
}
