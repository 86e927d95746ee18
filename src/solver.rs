//! Search loop: generation, embedding, pruning, simulation, acceptance.
//!
//! Accepts the first candidate whose simulated hit-set covers every hole.
//! Exhausting the candidate space is an expected outcome for unsolvable
//! puzzles and is reported as its own error, never as a crash.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::board::{BlockKind, Board, ConfigurationError, Coord};
use crate::generator::{Budget, Candidates};
use crate::prune;
use crate::tracer::{self, Beam, Origin};

/// A validated puzzle: the base board plus the immutable search inputs
/// shared read-only across all trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    pub budget: Budget,
    pub origins: Vec<Origin>,
    pub holes: Vec<Coord>,
}

/// Search counters, reported on success and on exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStats {
    /// Candidates drawn from the generator.
    pub trials: usize,
    /// Candidates rejected by the necessary-condition check alone.
    pub pruned: usize,
    /// Trials abandoned because the simulator hit an anomaly.
    pub anomalies: usize,
}

/// An accepted candidate: everything a renderer needs to draw the solved
/// board and highlight beam paths and holes.
#[derive(Debug, Clone)]
pub struct Solution {
    pub board: Board,
    pub beams: Vec<Beam>,
    pub assignment: Vec<BlockKind>,
    pub stats: SolveStats,
}

/// Why a solve produced no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The puzzle data was internally inconsistent.
    Configuration(ConfigurationError),
    /// Every candidate was tried and rejected; the puzzle has no solution
    /// under the given budget.
    NoSolution { stats: SolveStats },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Configuration(err) => write!(f, "invalid puzzle: {}", err),
            SolveError::NoSolution { stats } => write!(
                f,
                "no solution: exhausted {} candidates ({} pruned, {} anomalies)",
                stats.trials, stats.pruned, stats.anomalies
            ),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<ConfigurationError> for SolveError {
    fn from(err: ConfigurationError) -> SolveError {
        SolveError::Configuration(err)
    }
}

/// Runs the search: every distinct assignment is embedded, pruned, and
/// simulated until one covers all holes.
///
/// Each trial builds its own concrete board and beam set and drops them on
/// rejection; only the base board, origins, and holes are shared. A
/// simulation anomaly rejects that candidate alone and the search goes on.
pub fn solve(puzzle: &Puzzle) -> Result<Solution, SolveError> {
    let open = puzzle.board.open_cells().len();
    let candidates = Candidates::new(open, &puzzle.budget)?;

    let distinct_holes: FxHashSet<Coord> = puzzle.holes.iter().copied().collect();
    let mut stats = SolveStats::default();

    for assignment in candidates {
        stats.trials += 1;
        let board = puzzle.board.embed(&assignment)?;

        if !prune::admissible(&board, &puzzle.origins, &puzzle.holes) {
            stats.pruned += 1;
            continue;
        }

        match tracer::trace(&board, &puzzle.origins, &puzzle.holes) {
            Err(_) => {
                stats.anomalies += 1;
                continue;
            }
            Ok(trace) => {
                if trace.hits.len() == distinct_holes.len() {
                    return Ok(Solution {
                        board,
                        beams: trace.beams,
                        assignment,
                        stats,
                    });
                }
            }
        }
    }

    Err(SolveError::NoSolution { stats })
}

impl Puzzle {
    /// Convenience wrapper around [`solve`].
    pub fn solve(&self) -> Result<Solution, SolveError> {
        solve(self)
    }
}
