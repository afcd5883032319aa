//! Plain-text puzzle files. A grid file holds one row per line and a word file one word per line;
//! surrounding whitespace and blank lines are ignored. A numbered case in a directory is the
//! triple `puzzle{i}.txt`, `words{i}.txt` and `solution{i}.txt`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{Grid, GridError, GridSymbols};

#[derive(Error, Debug)]
pub enum PuzzleFileError {
    #[error("cannot access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("bad grid in {}: {source}", .path.display())]
    Grid { path: PathBuf, source: GridError },
}

/// One puzzle with its word list and expected fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleCase {
    pub index: usize,
    pub grid: Grid,
    pub words: Vec<String>,
    pub solution: Grid,
}

pub fn puzzle_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("puzzle{}.txt", index))
}

pub fn words_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("words{}.txt", index))
}

pub fn solution_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("solution{}.txt", index))
}

fn read_to_string(path: &Path) -> Result<String, PuzzleFileError> {
    fs::read_to_string(path).map_err(|source| PuzzleFileError::Io {
        path: path.to_owned(),
        source,
    })
}

fn write(path: &Path, contents: String) -> Result<(), PuzzleFileError> {
    fs::write(path, contents).map_err(|source| PuzzleFileError::Io {
        path: path.to_owned(),
        source,
    })
}

pub fn read_grid(path: &Path, symbols: GridSymbols) -> Result<Grid, PuzzleFileError> {
    let template = read_to_string(path)?;

    Grid::parse(&template, symbols).map_err(|source| PuzzleFileError::Grid {
        path: path.to_owned(),
        source,
    })
}

pub fn read_words(path: &Path) -> Result<Vec<String>, PuzzleFileError> {
    Ok(read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

pub fn read_case(dir: &Path, index: usize, symbols: GridSymbols) -> Result<PuzzleCase, PuzzleFileError> {
    Ok(PuzzleCase {
        index,
        grid: read_grid(&puzzle_path(dir, index), symbols)?,
        words: read_words(&words_path(dir, index))?,
        solution: read_grid(&solution_path(dir, index), symbols)?,
    })
}

/// Write the three files of case `index`, creating `dir` if needed.
pub fn write_case<S: AsRef<str>>(
    dir: &Path,
    index: usize,
    grid: &Grid,
    words: &[S],
    solution: &Grid,
) -> Result<(), PuzzleFileError> {
    fs::create_dir_all(dir).map_err(|source| PuzzleFileError::Io {
        path: dir.to_owned(),
        source,
    })?;

    let mut word_list = String::new();
    for word in words {
        word_list.push_str(word.as_ref());
        word_list.push('\n');
    }

    write(&puzzle_path(dir, index), format!("{}\n", grid))?;
    write(&words_path(dir, index), word_list)?;
    write(&solution_path(dir, index), format!("{}\n", solution))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fillin-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_read_ignores_blank_lines_and_padding() {
        let dir = scratch_dir("padding");
        fs::create_dir_all(&dir).unwrap();

        fs::write(puzzle_path(&dir, 3), "\n  ..#  \n\r\n.##\n\n").unwrap();
        fs::write(words_path(&dir, 3), "AB\n\n  AC \r\n").unwrap();
        fs::write(solution_path(&dir, 3), "AB#\nC##\n").unwrap();

        let case = read_case(&dir, 3, GridSymbols::default()).unwrap();
        assert_eq!(case.index, 3);
        assert_eq!(case.grid.rows(), vec!["..#", ".##"]);
        assert_eq!(case.words, vec!["AB", "AC"]);
        assert_eq!(case.solution.rows(), vec!["AB#", "C##"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_then_read_case() {
        let dir = scratch_dir("write").join("nested");
        let grid = Grid::parse("...\n.#.\n...", GridSymbols::default()).unwrap();
        let solution = Grid::parse("COB\nA#I\nTEN", GridSymbols::default()).unwrap();
        let words = ["BIN", "CAT", "COB", "TEN"];

        write_case(&dir, 0, &grid, &words, &solution).unwrap();
        assert_eq!(fs::read_to_string(words_path(&dir, 0)).unwrap(), "BIN\nCAT\nCOB\nTEN\n");

        let case = read_case(&dir, 0, GridSymbols::default()).unwrap();
        assert_eq!(
            case,
            PuzzleCase {
                index: 0,
                grid,
                words: words.iter().map(|w| w.to_string()).collect(),
                solution,
            }
        );

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_errors_name_the_file() {
        let dir = scratch_dir("errors");
        fs::create_dir_all(&dir).unwrap();

        let missing = read_words(&words_path(&dir, 9)).unwrap_err();
        assert!(matches!(missing, PuzzleFileError::Io { .. }));
        assert!(missing.to_string().contains("words9.txt"));

        fs::write(puzzle_path(&dir, 1), "...\n..\n").unwrap();
        let ragged = read_grid(&puzzle_path(&dir, 1), GridSymbols::default()).unwrap_err();
        assert!(matches!(
            ragged,
            PuzzleFileError::Grid {
                source: GridError::NotRectangular { .. },
                ..
            }
        ));
        assert!(ragged.to_string().contains("puzzle1.txt"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
