use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{GridCoord, DEFAULT_PLACEHOLDER, DEFAULT_SEPARATOR, MAX_GAP_LENGTH};

/// The letters currently sitting in a gap's cells, placeholders included.
pub type Pattern = SmallVec<[char; MAX_GAP_LENGTH]>;

/// Precondition violations detected while building a grid. These are raised before any search
/// starts and are never silently repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells but the first row has {expected}")]
    NotRectangular { row: usize, expected: usize, found: usize },
    #[error("separator and placeholder are both {0:?}")]
    SymbolClash(char),
}

/// The two characters with special meaning inside a grid. Anything else is a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSymbols {
    pub separator: char,
    pub placeholder: char,
}

impl Default for GridSymbols {
    fn default() -> GridSymbols {
        GridSymbols {
            separator: DEFAULT_SEPARATOR,
            placeholder: DEFAULT_PLACEHOLDER,
        }
    }
}

impl GridSymbols {
    pub fn new(separator: char, placeholder: char) -> Result<GridSymbols, GridError> {
        if separator == placeholder {
            return Err(GridError::SymbolClash(separator));
        }
        Ok(GridSymbols { separator, placeholder })
    }

    pub fn classify(&self, c: char) -> Cell {
        if c == self.separator {
            Cell::Separator
        } else if c == self.placeholder {
            Cell::Placeholder
        } else {
            Cell::Letter(c)
        }
    }
}

/// What a single grid cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Permanently blocked.
    Separator,
    /// Open, waiting for a letter.
    Placeholder,
    Letter(char),
}

/// A rectangular matrix of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<char>,
    width: usize,
    height: usize,
    symbols: GridSymbols,
}

impl Grid {
    /// Build a grid from one string per row. Every row must have the same number of characters.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], symbols: GridSymbols) -> Result<Grid, GridError> {
        if symbols.separator == symbols.placeholder {
            return Err(GridError::SymbolClash(symbols.separator));
        }

        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let len_before = cells.len();
            cells.extend(row.as_ref().chars());

            let found = cells.len() - len_before;
            if found != width {
                return Err(GridError::NotRectangular { row: row_idx, expected: width, found });
            }
        }

        Ok(Grid {
            cells,
            width,
            height: rows.len(),
            symbols,
        })
    }

    /// A `height` x `width` grid with every cell open.
    pub fn blank(height: usize, width: usize, symbols: GridSymbols) -> Result<Grid, GridError> {
        if symbols.separator == symbols.placeholder {
            return Err(GridError::SymbolClash(symbols.separator));
        }
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        Ok(Grid {
            cells: vec![symbols.placeholder; height * width],
            width,
            height,
            symbols,
        })
    }

    /// Build a grid from a template string with one row per line. Lines are trimmed and blank
    /// lines are skipped, so templates can be indented inside raw string literals.
    pub fn parse(template: &str, symbols: GridSymbols) -> Result<Grid, GridError> {
        let rows: Vec<&str> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Grid::from_rows(rows.as_slice(), symbols)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn symbols(&self) -> GridSymbols {
        self.symbols
    }

    /// Raw character at the given cell. Panics if the coords are out of bounds.
    pub fn get(&self, (row, col): GridCoord) -> char {
        self.cells[row * self.width + col]
    }

    pub fn cell(&self, coord: GridCoord) -> Cell {
        self.symbols.classify(self.get(coord))
    }

    pub(crate) fn set(&mut self, (row, col): GridCoord, c: char) {
        self.cells[row * self.width + col] = c;
    }

    fn is_separator(&self, coord: GridCoord) -> bool {
        self.get(coord) == self.symbols.separator
    }

    /// True once no placeholder is left anywhere in the grid.
    pub fn is_complete(&self) -> bool {
        !self.cells.contains(&self.symbols.placeholder)
    }

    /// The grid rendered as one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Read the current contents of a gap's cells.
    pub fn read_gap(&self, gap: &Gap) -> Pattern {
        gap.cells().map(|coord| self.get(coord)).collect()
    }

    /// Overwrite a gap's cells with the given letters, which must have exactly the gap's length.
    pub fn write_gap(&mut self, gap: &Gap, letters: &[char]) {
        debug_assert_eq!(letters.len(), gap.length);

        for (coord, &c) in gap.cells().zip(letters) {
            self.set(coord, c);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(self.width).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Direction that a gap is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Horizontal, left to right.
    Across,
    /// Vertical, top to bottom.
    Down,
}

/// A maximal run of at least two non-separator cells in one direction; the unit a word is
/// assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gap {
    pub row: usize,
    pub column: usize,
    pub length: usize,
    pub direction: Direction,
}

impl Gap {
    pub fn new(row: usize, column: usize, length: usize, direction: Direction) -> Gap {
        Gap { row, column, length, direction }
    }

    /// Last row (down) or last column (across) covered by this gap.
    pub fn end(&self) -> usize {
        match self.direction {
            Direction::Across => self.column + self.length - 1,
            Direction::Down => self.row + self.length - 1,
        }
    }

    /// Generate the coords for each cell of this gap.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        let Gap { row, column, length, direction } = *self;

        (0..length).map(move |cell_idx| match direction {
            Direction::Across => (row, column + cell_idx),
            Direction::Down => (row + cell_idx, column),
        })
    }

    /// Whether two gaps share a cell. Only an across gap and a down gap can cross.
    pub fn intersects(&self, other: &Gap) -> bool {
        let (down, across) = match (self.direction, other.direction) {
            (Direction::Down, Direction::Across) => (self, other),
            (Direction::Across, Direction::Down) => (other, self),
            _ => return false,
        };

        down.row <= across.row
            && across.row <= down.end()
            && across.column <= down.column
            && down.column <= across.end()
    }
}

/// Find every gap in the grid in one row-major scan. For each start cell the down gap comes
/// before the across gap; runs of a single cell are dropped since nothing constrains them.
pub fn extract_gaps(grid: &Grid) -> Vec<Gap> {
    let mut gaps = vec![];

    for row in 0..grid.height {
        for col in 0..grid.width {
            if grid.is_separator((row, col)) {
                continue;
            }

            if row == 0 || grid.is_separator((row - 1, col)) {
                let length = (row..grid.height)
                    .take_while(|&r| !grid.is_separator((r, col)))
                    .count();
                gaps.push(Gap::new(row, col, length, Direction::Down));
            }

            if col == 0 || grid.is_separator((row, col - 1)) {
                let length = (col..grid.width)
                    .take_while(|&c| !grid.is_separator((row, c)))
                    .count();
                gaps.push(Gap::new(row, col, length, Direction::Across));
            }
        }
    }

    gaps.retain(|gap| gap.length > 1);
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Across, Down};

    fn grid(template: &str) -> Grid {
        Grid::parse(template, GridSymbols::default()).expect("valid grid")
    }

    #[test]
    fn test_parse_template() {
        let g = grid(
            "
            AB#
            C.#
            ",
        );

        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.cell((0, 0)), Cell::Letter('A'));
        assert_eq!(g.cell((1, 1)), Cell::Placeholder);
        assert_eq!(g.cell((1, 2)), Cell::Separator);
        assert_eq!(g.rows(), vec!["AB#".to_string(), "C.#".to_string()]);
        assert_eq!(g.to_string(), "AB#\nC.#");
        assert!(!g.is_complete());
    }

    #[test]
    fn test_non_rectangular_grid_is_rejected() {
        let result = Grid::from_rows(&["...", "..", "..."], GridSymbols::default());

        assert_eq!(
            result,
            Err(GridError::NotRectangular { row: 1, expected: 3, found: 2 })
        );
    }

    #[test]
    fn test_degenerate_grids_are_rejected() {
        let no_rows: [&str; 0] = [];
        assert_eq!(Grid::from_rows(&no_rows, GridSymbols::default()), Err(GridError::Empty));
        assert_eq!(Grid::from_rows(&["", ""], GridSymbols::default()), Err(GridError::Empty));

        let clash = GridSymbols { separator: '#', placeholder: '#' };
        assert_eq!(Grid::from_rows(&["##"], clash), Err(GridError::SymbolClash('#')));
        assert_eq!(GridSymbols::new('*', '*'), Err(GridError::SymbolClash('*')));
    }

    #[test]
    fn test_custom_symbols() {
        let symbols = GridSymbols::new('*', '_').unwrap();
        let g = Grid::from_rows(&["_*", "__"], symbols).unwrap();

        assert_eq!(g.cell((0, 1)), Cell::Separator);
        assert_eq!(g.cell((0, 0)), Cell::Placeholder);
        assert_eq!(extract_gaps(&g), vec![Gap::new(0, 0, 2, Down), Gap::new(1, 0, 2, Across)]);
    }

    #[test]
    fn test_extract_gaps_in_scan_order() {
        let g = grid(
            "
            ..#
            ...
            #..
            ",
        );

        assert_eq!(
            extract_gaps(&g),
            vec![
                Gap::new(0, 0, 2, Down),
                Gap::new(0, 0, 2, Across),
                Gap::new(0, 1, 3, Down),
                Gap::new(1, 0, 3, Across),
                Gap::new(1, 2, 2, Down),
                Gap::new(2, 1, 2, Across),
            ]
        );
    }

    #[test]
    fn test_single_cells_are_not_gaps() {
        let g = grid(
            "
            .#.
            ###
            .#.
            ",
        );
        assert!(extract_gaps(&g).is_empty());

        // The centre separator leaves only the border runs.
        let g = grid(
            "
            ...
            .#.
            ...
            ",
        );
        assert_eq!(
            extract_gaps(&g),
            vec![
                Gap::new(0, 0, 3, Down),
                Gap::new(0, 0, 3, Across),
                Gap::new(0, 2, 3, Down),
                Gap::new(2, 0, 3, Across),
            ]
        );
    }

    #[test]
    fn test_gap_geometry() {
        let across = Gap::new(2, 1, 4, Across);
        let down = Gap::new(0, 3, 3, Down);

        assert_eq!(across.end(), 4);
        assert_eq!(down.end(), 2);
        assert_eq!(across.cells().collect::<Vec<_>>(), vec![(2, 1), (2, 2), (2, 3), (2, 4)]);
        assert_eq!(down.cells().collect::<Vec<_>>(), vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_intersects() {
        let across = Gap::new(2, 1, 4, Across);

        assert!(across.intersects(&Gap::new(0, 3, 3, Down)));
        assert!(Gap::new(0, 3, 3, Down).intersects(&across));
        assert!(across.intersects(&Gap::new(2, 1, 2, Down)));
        assert!(across.intersects(&Gap::new(0, 4, 5, Down)));

        // Misses by one in either axis.
        assert!(!across.intersects(&Gap::new(0, 3, 2, Down)));
        assert!(!across.intersects(&Gap::new(0, 5, 3, Down)));
        assert!(!across.intersects(&Gap::new(3, 0, 2, Down)));

        // Same direction never crosses.
        assert!(!across.intersects(&Gap::new(2, 1, 4, Across)));
        assert!(!Gap::new(0, 0, 3, Down).intersects(&Gap::new(0, 0, 3, Down)));
    }

    #[test]
    fn test_read_and_write_gap() {
        let mut g = grid(
            "
            C..
            .#.
            ...
            ",
        );
        let top = Gap::new(0, 0, 3, Across);
        let left = Gap::new(0, 0, 3, Down);

        assert_eq!(g.read_gap(&top).as_slice(), &['C', '.', '.']);

        g.write_gap(&top, &['C', 'A', 'T']);
        assert_eq!(g.read_gap(&left).as_slice(), &['C', '.', '.']);
        assert_eq!(g.read_gap(&Gap::new(0, 2, 3, Down)).as_slice(), &['T', '.', '.']);

        g.write_gap(&top, &['C', '.', '.']);
        assert_eq!(g, grid("C..\n.#.\n..."));
    }
}
