//! Lazor Puzzle Solver Library
//!
//! Searches for a placement of reflect, opaque, and refract blocks on a
//! rectangular board so that every target hole is crossed by a simulated
//! laser beam. The search enumerates distinct block arrangements, embeds
//! each into the board, discards hopeless boards cheaply, and simulates the
//! rest; the first arrangement whose beams cover all holes wins.

pub mod board;
pub mod generator;
pub mod parser;
pub mod persistence;
pub mod prune;
pub mod rules;
pub mod solver;
pub mod tracer;

pub use board::{BlockKind, Board, ConfigurationError, Coord};
pub use generator::{Budget, Candidates};
pub use solver::{solve, Puzzle, Solution, SolveError, SolveStats};
pub use tracer::{Beam, Origin, Trace, Waypoint};
