//! Cheap rejection of hopeless boards.
//!
//! Two local necessary conditions checked once per candidate, before
//! simulation. Failing either always means the board cannot be a solution;
//! passing guarantees nothing. Skipping this module entirely would preserve
//! correctness and cost runtime.

use crate::board::{BlockKind, Board, Coord};
use crate::rules::{approach_axis, Axis};
use crate::tracer::Origin;

/// Whether a lattice position stops beams cold. Positions outside the
/// board count as blocking: a beam cannot advance through them anyway.
#[inline]
fn blocking(board: &Board, x: i32, y: i32) -> bool {
    !matches!(
        board.kind_at(x, y),
        Some(BlockKind::Open) | Some(BlockKind::Refract) | Some(BlockKind::Blocked)
    )
}

/// An origin whose governing-axis neighbors are both reflect or opaque;
/// no beam can leave it usefully.
fn origin_boxed(board: &Board, origin: &Origin) -> bool {
    let (x, y) = (origin.x, origin.y);
    match approach_axis(x) {
        Axis::Horizontal => blocking(board, x - 1, y) && blocking(board, x + 1, y),
        Axis::Vertical => blocking(board, x, y - 1) && blocking(board, x, y + 1),
    }
}

/// A hole walled in along either perpendicular axis; no beam can reach it.
fn hole_walled(board: &Board, (x, y): Coord) -> bool {
    (blocking(board, x - 1, y) && blocking(board, x + 1, y))
        || (blocking(board, x, y - 1) && blocking(board, x, y + 1))
}

/// Necessary-condition check for a concrete board.
///
/// Returns `false` when the board provably cannot satisfy the puzzle and
/// full simulation can be skipped.
pub fn admissible(board: &Board, origins: &[Origin], holes: &[Coord]) -> bool {
    if origins.iter().any(|origin| origin_boxed(board, origin)) {
        return false;
    }
    if holes.iter().any(|&hole| hole_walled(board, hole)) {
        return false;
    }
    true
}
