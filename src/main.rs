use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use instant::{Duration, Instant};
use log::info;

use fillin::{
    generator::{generate_puzzle, GeneratorConfig},
    puzzle_files::{read_case, read_grid, read_words, write_case},
    GapOrder, Grid, GridSymbols, Pruning, Solver, DEFAULT_PLACEHOLDER, DEFAULT_SEPARATOR,
};

const OUTPUT_WIDTH: usize = 72;

#[derive(Parser, Debug)]
#[command(name = "fillin")]
#[command(about = "Solve and generate fill-in word puzzles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill a grid with words from a word list
    Solve {
        /// Grid file, one row per line
        #[arg(short, long)]
        grid: PathBuf,

        /// Word file, one word per line
        #[arg(short, long)]
        words: PathBuf,

        /// Order in which gaps are attempted
        #[arg(short, long, value_enum, default_value_t = OrderArg::ByLength)]
        order: OrderArg,

        /// Reject placements that leave a crossing gap without candidates
        #[arg(short, long)]
        forward_check: bool,

        #[arg(long, default_value_t = DEFAULT_SEPARATOR)]
        separator: char,

        #[arg(long, default_value_t = DEFAULT_PLACEHOLDER)]
        placeholder: char,

        /// Give up after this many milliseconds
        #[arg(long)]
        time_limit_ms: Option<u64>,
    },

    /// Run every solver configuration on numbered puzzle files and compare with their solutions
    Check {
        /// Directory holding puzzle{i}.txt, words{i}.txt and solution{i}.txt
        #[arg(short, long)]
        dir: PathBuf,

        /// Number of cases, starting from 0
        #[arg(short, long, default_value_t = 6)]
        cases: usize,
    },

    /// Generate a random puzzle together with its word list and solution
    Generate {
        #[arg(long)]
        height: usize,

        #[arg(long)]
        width: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Percentage of cells left open for letters
        #[arg(long, default_value_t = 75)]
        sparsity: u8,

        /// Directory the case files are written to
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(short, long)]
        index: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OrderArg {
    Linear,
    Diagonal,
    ByLength,
}

impl From<OrderArg> for GapOrder {
    fn from(order: OrderArg) -> GapOrder {
        match order {
            OrderArg::Linear => GapOrder::Linear,
            OrderArg::Diagonal => GapOrder::Diagonal,
            OrderArg::ByLength => GapOrder::ByLength,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            grid,
            words,
            order,
            forward_check,
            separator,
            placeholder,
            time_limit_ms,
        } => {
            let symbols = GridSymbols::new(separator, placeholder)?;
            let pruning = if forward_check { Pruning::ForwardCheck } else { Pruning::None };

            let mut solver = Solver::new(order.into(), pruning);
            if let Some(ms) = time_limit_ms {
                solver = solver.with_time_limit(Duration::from_millis(ms));
            }

            let puzzle = read_grid(&grid, symbols).context("reading the grid")?;
            let words = read_words(&words).context("reading the word list")?;
            solve_cmd(&solver, &puzzle, &words)
        }
        Command::Check { dir, cases } => check_cmd(&dir, cases),
        Command::Generate {
            height,
            width,
            seed,
            sparsity,
            dir,
            index,
        } => {
            let config = GeneratorConfig {
                height,
                width,
                seed,
                sparsity,
                ..GeneratorConfig::default()
            };
            let puzzle = generate_puzzle(&config)?;
            write_case(&dir, index, &puzzle.grid, &puzzle.words, &puzzle.solution)
                .with_context(|| format!("writing case {}", index))?;

            println!("{}", puzzle.grid);
            println!("wrote case {} ({} words) to {}", index, puzzle.words.len(), dir.display());
            Ok(())
        }
    }
}

fn solve_cmd(solver: &Solver, grid: &Grid, words: &[String]) -> Result<()> {
    info!("solving with {}", solver.name());

    let solution = solver
        .solve(grid, words)
        .with_context(|| format!("solving with {}", solver.name()))?;

    println!("{:?}", solution.statistics);
    println!("{}", solution.grid);
    Ok(())
}

fn check_cmd(dir: &Path, cases: usize) -> Result<()> {
    let mut failures = 0;

    for index in 0..cases {
        let case = read_case(dir, index, GridSymbols::default())
            .with_context(|| format!("reading case {} from {}", index, dir.display()))?;

        println!("TEST {}", index);
        println!("Crossword size = {}x{}", case.grid.height(), case.grid.width());
        println!("Words to fill = {}", case.words.len());

        for order in GapOrder::ALL {
            for pruning in Pruning::ALL {
                let solver = Solver::new(order, pruning);

                let start = Instant::now();
                let result = solver.solve(&case.grid, &case.words);
                let elapsed = start.elapsed();

                println!("{}", "-".repeat(OUTPUT_WIDTH));
                match result {
                    Ok(solution) if solution.grid == case.solution => {
                        println!("{}: solved correctly in {:?}", solver.name(), elapsed);
                        println!("{:?}", solution.statistics);
                    }
                    Ok(solution) => {
                        failures += 1;
                        println!("{}: solved with errors, fill mismatch in {:?}", solver.name(), elapsed);
                        println!("{}", solution.grid);
                    }
                    Err(failure) => {
                        failures += 1;
                        println!("{}: {} after {:?}", solver.name(), failure, elapsed);
                    }
                }
            }
        }
        println!("{}", "=".repeat(OUTPUT_WIDTH));
    }

    if failures > 0 {
        bail!("{} of {} runs did not reproduce the expected fill", failures, cases * 6);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fillin::SolveFailure;

    #[test]
    fn test_check_reports_missing_case() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("puzzles");

        assert!(check_cmd(&dir, 4).is_ok());

        let err = check_cmd(&dir, 5).unwrap_err();
        assert!(err.to_string().contains("reading case 4"), "{}", err);
    }

    #[test]
    fn test_solve_failure_keeps_its_cause() {
        let puzzle = Grid::parse("..\n..", GridSymbols::default()).unwrap();
        let words = vec!["AB".to_string()];

        let err = solve_cmd(&Solver::default(), &puzzle, &words).unwrap_err();
        assert!(err.to_string().starts_with("solving with by-length"), "{}", err);
        assert_eq!(err.downcast_ref::<SolveFailure>(), Some(&SolveFailure::NoSolution));
    }
}
