//! Solver for fill-in ("criss-cross") puzzles: every maximal run of open cells in a grid gets
//! exactly one word from a supplied list, no word is used twice, and crossing runs agree on their
//! shared letters.

pub mod generator;
pub mod grid;
pub mod order;
pub mod prune;
pub mod puzzle_files;
pub mod solver;
pub mod words;

pub use generator::{generate_puzzle, GenerateError, GeneratedPuzzle, GeneratorConfig};
pub use grid::{extract_gaps, Cell, Direction, Gap, Grid, GridError, GridSymbols};
pub use order::{ByLength, Diagonal, GapOrder, Linear, OrderingStrategy};
pub use prune::{ForwardChecking, NoPruning, Pruning, PruningStrategy};
pub use puzzle_files::{PuzzleCase, PuzzleFileError};
pub use solver::{search, solve, verify, CancelToken, SearchControl, Solution, SolveFailure, Solver, Statistics};
pub use words::{WordEntry, WordPool};

/// Character marking a blocked cell unless the caller picks another one.
pub const DEFAULT_SEPARATOR: char = '#';

/// Character marking a cell that still needs a letter unless the caller picks another one.
pub const DEFAULT_PLACEHOLDER: char = '.';

/// The expected maximum length for a single gap. Longer gaps still work, they just spill the
/// inline buffers onto the heap.
pub const MAX_GAP_LENGTH: usize = 21;

/// An identifier for a gap, based on its index in the ordered gap sequence being searched.
pub type GapId = usize;

/// An identifier for a word, based on its index within the pool's bucket for its length.
pub type WordId = usize;

/// Zero-indexed (row, column) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);
