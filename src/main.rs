//! Lazor Puzzle Solver
//!
//! Solves laser puzzles: a budget of reflect, opaque, and refract blocks is
//! placed onto a board's open cells so that every target hole is crossed by
//! a beam. The solver reports the first arrangement that works, saves it to
//! disk, and can display it in an interactive 3D viewer.

mod visualization;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lazor::persistence::{self, SavedSolution};
use lazor::{parser, solver, SolveError};

/// Solves Lazor-style laser puzzles described in .bff files.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and save the solution to disk.
    Solve {
        /// Puzzle description file (.bff).
        puzzle: PathBuf,
    },
    /// Display a previously solved puzzle in an interactive 3D viewer.
    Display {
        /// Puzzle description file the solution was saved for.
        puzzle: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Solve { puzzle } => run_solve(&puzzle),
        Command::Display { puzzle } => run_display(&puzzle),
    }
}

fn solution_paths(puzzle: &Path) -> (PathBuf, PathBuf) {
    (
        puzzle.with_extension("solution.txt"),
        puzzle.with_extension("solution.bin"),
    )
}

/// Parses and solves a puzzle file, then saves both solution files.
fn run_solve(path: &Path) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let puzzle = match parser::parse(&text) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let solution = match solver::solve(&puzzle) {
        Ok(solution) => solution,
        Err(SolveError::NoSolution { stats }) => {
            println!(
                "No solution: all {} candidates rejected ({} pruned).",
                stats.trials, stats.pruned
            );
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Solve failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Solved after {} trials ({} pruned, {} anomalies):",
        solution.stats.trials, solution.stats.pruned, solution.stats.anomalies
    );
    print!("{}", solution.board);

    let saved = SavedSolution {
        board: solution.board,
        assignment: solution.assignment,
        origins: puzzle.origins,
        holes: puzzle.holes,
        beams: solution.beams,
    };
    let (text_path, bin_path) = solution_paths(path);
    if let Err(e) = persistence::save(&text_path, &bin_path, &saved) {
        eprintln!("Failed to save solution: {}", e);
        return ExitCode::FAILURE;
    }
    println!(
        "Wrote {} and {}",
        text_path.display(),
        bin_path.display()
    );
    ExitCode::SUCCESS
}

/// Loads a saved solution and opens the viewer.
fn run_display(path: &Path) -> ExitCode {
    let (_, bin_path) = solution_paths(path);
    match persistence::load(&bin_path) {
        Some(saved) => {
            println!("Controls: Left/Right cycle the highlighted beam");
            visualization::display(saved);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!(
                "No saved solution at {}. Run 'lazor solve' first.",
                bin_path.display()
            );
            ExitCode::FAILURE
        }
    }
}
