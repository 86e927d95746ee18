//! Block-interaction rules.
//!
//! Classifies the effect of one block kind on one incoming beam. Which of a
//! beam position's two lattice neighbors governs the interaction, and which
//! direction component a reflection flips, are both selected by the
//! position's x-parity; [`approach_axis`] is the single source of that
//! convention and the tracer must use it for both decisions.

use crate::board::BlockKind;

/// A beam direction; both components are -1 or 1 for a live beam.
pub type Direction = (i32, i32);

/// Which neighbor governs an interaction at a beam position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Even x: the cell at (x + dx, y) governs, reflections negate dx.
    Horizontal,
    /// Odd x: the cell at (x, y + dy) governs, reflections negate dy.
    Vertical,
}

/// Selects the governing axis for a beam at x-coordinate `x`.
#[inline]
pub fn approach_axis(x: i32) -> Axis {
    if x & 1 == 0 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Outgoing directions of a beam after meeting a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deflection {
    /// The beam is absorbed; no outgoing direction.
    Halt,
    /// Exactly one outgoing direction.
    Continue(Direction),
    /// Two independent outgoing beams: one continues straight, one bends.
    Split {
        /// Identical to the incoming direction.
        straight: Direction,
        /// The reflection outcome for the same approach axis.
        bent: Direction,
    },
}

/// Flips the axis-selected component of a direction.
#[inline]
fn bend(axis: Axis, (dx, dy): Direction) -> Direction {
    match axis {
        Axis::Horizontal => (-dx, dy),
        Axis::Vertical => (dx, -dy),
    }
}

/// Classifies the effect of `kind` on a beam arriving along `axis` with
/// direction `dir`.
pub fn deflect(kind: BlockKind, axis: Axis, dir: Direction) -> Deflection {
    match kind {
        BlockKind::Opaque => Deflection::Halt,
        BlockKind::Open | BlockKind::Blocked => Deflection::Continue(dir),
        BlockKind::Reflect => Deflection::Continue(bend(axis, dir)),
        BlockKind::Refract => Deflection::Split {
            straight: dir,
            bent: bend(axis, dir),
        },
    }
}
