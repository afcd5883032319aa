//! Random fill-in puzzles: scatter separators over a blank grid, fill every open cell with a random
//! letter, and hand out the words that fill spells as the puzzle's word list.

use rand::{
    rngs::StdRng,
    seq::{index, SliceRandom},
    Rng, SeedableRng,
};
use thiserror::Error;

use crate::{extract_gaps, Cell, Grid, GridError, GridSymbols};

/// Largest height or width the generator accepts.
pub const MAX_DIMENSION: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("height must be between 1 and 1000, got {0}")]
    Height(usize),
    #[error("width must be between 1 and 1000, got {0}")]
    Width(usize),
    #[error("sparsity must be between 1 and 99 percent, got {0}")]
    Sparsity(u8),
    #[error("alphabet must be a non-empty ASCII string")]
    Alphabet,
    #[error("grid symbol {0:?} is not a single ASCII character")]
    InvalidSymbol(char),
    #[error("alphabet contains the grid symbol {0:?}")]
    AlphabetContainsSymbol(char),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Settings for one generated puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub height: usize,
    pub width: usize,
    /// Seed for the random generator. Without one every run differs.
    pub seed: Option<u64>,
    /// Percentage of the grid left open for letters.
    pub sparsity: u8,
    pub alphabet: String,
    pub symbols: GridSymbols,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            height: 10,
            width: 10,
            seed: None,
            sparsity: 75,
            alphabet: ('A'..='Z').collect(),
            symbols: GridSymbols::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !(1..=MAX_DIMENSION).contains(&self.height) {
            return Err(GenerateError::Height(self.height));
        }
        if !(1..=MAX_DIMENSION).contains(&self.width) {
            return Err(GenerateError::Width(self.width));
        }
        if !(1..=99).contains(&self.sparsity) {
            return Err(GenerateError::Sparsity(self.sparsity));
        }
        if self.alphabet.is_empty() || !self.alphabet.is_ascii() {
            return Err(GenerateError::Alphabet);
        }

        let GridSymbols { separator, placeholder } = self.symbols;
        for symbol in [separator, placeholder] {
            if !symbol.is_ascii() {
                return Err(GenerateError::InvalidSymbol(symbol));
            }
            if self.alphabet.contains(symbol) {
                return Err(GenerateError::AlphabetContainsSymbol(symbol));
            }
        }
        GridSymbols::new(separator, placeholder)?;

        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A generated puzzle: the empty grid to solve, the fill it was cut from, and the words of that
/// fill sorted by length and then alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    pub grid: Grid,
    pub solution: Grid,
    pub words: Vec<String>,
}

pub fn generate_puzzle(config: &GeneratorConfig) -> Result<GeneratedPuzzle, GenerateError> {
    config.validate()?;

    let mut rng = config.rng();
    let alphabet: Vec<char> = config.alphabet.chars().collect();

    let grid = scatter_separators(config, &mut rng)?;
    let solution = fill_grid(&grid, &alphabet, &mut rng);
    let words = extract_words(&solution);

    Ok(GeneratedPuzzle { grid, solution, words })
}

/// Generate just the empty grid.
pub fn generate_grid(config: &GeneratorConfig) -> Result<Grid, GenerateError> {
    config.validate()?;
    scatter_separators(config, &mut config.rng())
}

fn scatter_separators<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Result<Grid, GenerateError> {
    let GeneratorConfig { height, width, sparsity, symbols, .. } = *config;
    let mut grid = Grid::blank(height, width, symbols)?;

    let cell_count = height * width;
    let separator_count = (100 - sparsity as usize) * cell_count / 100;
    for idx in index::sample(rng, cell_count, separator_count) {
        grid.set((idx / width, idx % width), symbols.separator);
    }

    // An open cell with no open neighbour belongs to no gap, so it could never be filled. Cells
    // closed here count as separators for the cells checked after them.
    for row in 0..height {
        for col in 0..width {
            let is_closed = |coord| grid.cell(coord) == Cell::Separator;

            let isolated = grid.cell((row, col)) == Cell::Placeholder
                && (row == 0 || is_closed((row - 1, col)))
                && (col == 0 || is_closed((row, col - 1)))
                && (row + 1 == height || is_closed((row + 1, col)))
                && (col + 1 == width || is_closed((row, col + 1)));

            if isolated {
                grid.set((row, col), symbols.separator);
            }
        }
    }

    Ok(grid)
}

/// Copy of `grid` with every placeholder replaced by a random letter of `alphabet`.
pub fn fill_grid<R: Rng + ?Sized>(grid: &Grid, alphabet: &[char], rng: &mut R) -> Grid {
    let mut filled = grid.clone();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if grid.cell((row, col)) != Cell::Placeholder {
                continue;
            }
            if let Some(&letter) = alphabet.choose(rng) {
                filled.set((row, col), letter);
            }
        }
    }

    filled
}

/// The words spelled by every gap of a filled grid, sorted from shortest to longest and then
/// alphabetically.
pub fn extract_words(grid: &Grid) -> Vec<String> {
    let mut words: Vec<String> = extract_gaps(grid)
        .iter()
        .map(|gap| grid.read_gap(gap).into_iter().collect())
        .collect();

    words.sort_by(|a, b| (a.chars().count(), a).cmp(&(b.chars().count(), b)));
    words
}
