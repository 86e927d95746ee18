//! Bounded beam-propagation simulator.
//!
//! Runs every beam for a fixed number of rounds over a concrete board and
//! reports which holes were struck. The round bound is a truncation limit
//! carried from the original design, not cycle detection: a beam revisiting
//! a position burns rounds instead of being short-circuited.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::board::{Board, ConfigurationError, Coord};
use crate::rules::{approach_axis, deflect, Axis, Deflection};

/// Propagation rounds per trace. Exceeds the longest path a beam can take
/// on supported board sizes.
pub const MAX_ROUNDS: usize = 30;

/// A laser starting position and initial direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Origin {
    /// Creates an origin, validating that both direction components are
    /// -1 or 1.
    pub fn new(x: i32, y: i32, dx: i32, dy: i32) -> Result<Origin, ConfigurationError> {
        if dx.abs() != 1 || dy.abs() != 1 {
            return Err(ConfigurationError::BadDirection { dx, dy });
        }
        Ok(Origin { x, y, dx, dy })
    }
}

/// One recorded beam state: a position and the direction the beam held
/// when it arrived there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waypoint {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Waypoint {
    /// The lattice position of this waypoint.
    #[inline]
    pub fn pos(&self) -> Coord {
        (self.x, self.y)
    }
}

/// One continuous laser trajectory.
///
/// The first waypoint is the origin (or, for a beam spawned at a refraction
/// point, the first position past it). A halted beam keeps its recorded
/// path but no longer advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beam {
    pub waypoints: Vec<Waypoint>,
    /// Set once the beam is absorbed by an opaque block.
    pub halted: bool,
}

impl Beam {
    fn starting(origin: &Origin) -> Beam {
        Beam {
            waypoints: vec![Waypoint {
                x: origin.x,
                y: origin.y,
                dx: origin.dx,
                dy: origin.dy,
            }],
            halted: false,
        }
    }

    fn spawned(x: i32, y: i32, dx: i32, dy: i32) -> Beam {
        Beam {
            waypoints: vec![Waypoint { x, y, dx, dy }],
            halted: false,
        }
    }
}

/// Result of one simulation run: every beam's full waypoint sequence and
/// the set of holes struck.
#[derive(Debug, Clone)]
pub struct Trace {
    pub beams: Vec<Beam>,
    pub hits: FxHashSet<Coord>,
}

/// A beam consulted a cell the rules cannot classify.
///
/// Unreachable on well-formed boards (the bounds check keeps every
/// governing-neighbor lookup inside the lattice); detected defensively and
/// local to the trial that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationAnomaly {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl fmt::Display for SimulationAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "beam at ({}, {}) heading ({}, {}) consulted a cell outside the board",
            self.x, self.y, self.dx, self.dy
        )
    }
}

impl std::error::Error for SimulationAnomaly {}

/// Simulates all beams on `board` for [`MAX_ROUNDS`] rounds.
///
/// Each round advances every beam that existed at the round's start by one
/// step; beams spawned at refraction points join the following round. A beam
/// whose current or next position lies outside the board is left unadvanced
/// that round (frozen at the boundary, not terminated). Runs the full round
/// count with no early exit; the caller judges the returned hit-set.
pub fn trace(
    board: &Board,
    origins: &[Origin],
    holes: &[Coord],
) -> Result<Trace, SimulationAnomaly> {
    let hole_set: FxHashSet<Coord> = holes.iter().copied().collect();
    let mut hits = FxHashSet::default();
    let mut beams: Vec<Beam> = origins.iter().map(Beam::starting).collect();

    for _ in 0..MAX_ROUNDS {
        // beams spawned below join the next round
        let live = beams.len();
        for k in 0..live {
            if beams[k].halted {
                continue;
            }
            let Waypoint { x, y, dx, dy } = *beams[k].waypoints.last().unwrap();
            if !board.contains(x, y) || !board.contains(x + dx, y + dy) {
                continue;
            }

            let axis = approach_axis(x);
            let (gx, gy) = match axis {
                Axis::Horizontal => (x + dx, y),
                Axis::Vertical => (x, y + dy),
            };
            let kind = board
                .kind_at(gx, gy)
                .ok_or(SimulationAnomaly { x, y, dx, dy })?;

            match deflect(kind, axis, (dx, dy)) {
                Deflection::Halt => {
                    beams[k].halted = true;
                }
                Deflection::Continue((ndx, ndy)) => {
                    let (nx, ny) = (x + ndx, y + ndy);
                    beams[k].waypoints.push(Waypoint {
                        x: nx,
                        y: ny,
                        dx: ndx,
                        dy: ndy,
                    });
                    if hole_set.contains(&(nx, ny)) {
                        hits.insert((nx, ny));
                    }
                }
                Deflection::Split {
                    straight: (sdx, sdy),
                    bent: (bdx, bdy),
                } => {
                    // the straight continuation advances as a new beam;
                    // the current beam bends in place and moves next round
                    let (sx, sy) = (x + sdx, y + sdy);
                    beams.push(Beam::spawned(sx, sy, sdx, sdy));
                    if hole_set.contains(&(sx, sy)) {
                        hits.insert((sx, sy));
                    }
                    beams[k].waypoints.push(Waypoint {
                        x,
                        y,
                        dx: bdx,
                        dy: bdy,
                    });
                }
            }
        }
    }

    Ok(Trace { beams, hits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BlockKind;

    fn board_from_symbols(rows: &[&str]) -> Board {
        let rows: Vec<Vec<BlockKind>> = rows
            .iter()
            .map(|row| {
                row.split_whitespace()
                    .map(|s| BlockKind::from_symbol(s.chars().next().unwrap()).unwrap())
                    .collect()
            })
            .collect();
        Board::from_rows(&rows).unwrap()
    }

    fn waypoints(beam: &Beam) -> Vec<(i32, i32, i32, i32)> {
        beam.waypoints
            .iter()
            .map(|w| (w.x, w.y, w.dx, w.dy))
            .collect()
    }

    #[test]
    fn test_straight_pass_reaches_hole() {
        let board = board_from_symbols(&["o o"]);
        let origin = Origin::new(0, 1, 1, 1).unwrap();
        let trace = trace(&board, &[origin], &[(1, 2)]).unwrap();
        assert!(trace.hits.contains(&(1, 2)));
        // the next step (2, 3) leaves the board, so the beam freezes there
        assert_eq!(
            waypoints(&trace.beams[0]),
            vec![(0, 1, 1, 1), (1, 2, 1, 1)]
        );
    }

    #[test]
    fn test_beam_pointing_off_board_is_frozen() {
        let board = board_from_symbols(&["o"]);
        let origin = Origin::new(0, 1, -1, -1).unwrap();
        let trace = trace(&board, &[origin], &[]).unwrap();
        assert_eq!(trace.beams[0].waypoints.len(), 1);
        assert!(!trace.beams[0].halted);
    }

    #[test]
    fn test_opaque_absorbs_without_advancing() {
        let board = board_from_symbols(&["B"]);
        let origin = Origin::new(0, 1, 1, 1).unwrap();
        let trace = trace(&board, &[origin], &[]).unwrap();
        assert!(trace.beams[0].halted);
        assert_eq!(trace.beams[0].waypoints.len(), 1);
        assert!(trace.hits.is_empty());
    }

    #[test]
    fn test_reflection_can_step_off_the_board() {
        // reflecting at the left edge records one out-of-board waypoint,
        // then the beam freezes there
        let board = board_from_symbols(&["A o"]);
        let origin = Origin::new(0, 1, 1, 1).unwrap();
        let trace = trace(&board, &[origin], &[]).unwrap();
        assert_eq!(
            waypoints(&trace.beams[0]),
            vec![(0, 1, 1, 1), (-1, 2, -1, 1)]
        );
    }

    /// The original project's reference puzzle: a 4x4 open board solved by
    /// two reflect blocks and one refract block. The full waypoint
    /// sequence is known and pinned exactly.
    #[test]
    fn test_solved_reference_board_paths() {
        let board = board_from_symbols(&[
            "o o C o",
            "o o o A",
            "A o o o",
            "o o o o",
        ]);
        let origin = Origin::new(2, 7, 1, -1).unwrap();
        let holes = [(3, 0), (4, 3), (2, 5), (4, 7)];
        let trace = trace(&board, &[origin], &holes).unwrap();

        assert_eq!(trace.beams.len(), 2);
        assert_eq!(
            waypoints(&trace.beams[0]),
            vec![
                (2, 7, 1, -1),
                (3, 6, 1, -1),
                (4, 5, 1, -1),
                (5, 4, 1, -1),
                (6, 3, 1, -1),
                (5, 2, -1, -1),
                (5, 2, -1, 1),
                (4, 3, -1, 1),
                (3, 4, -1, 1),
                (2, 5, -1, 1),
                (3, 6, 1, 1),
                (4, 7, 1, 1),
                (5, 8, 1, 1),
            ]
        );
        assert_eq!(
            waypoints(&trace.beams[1]),
            vec![(4, 1, -1, -1), (3, 0, -1, -1)]
        );

        assert_eq!(trace.hits.len(), holes.len());
        for hole in holes {
            assert!(trace.hits.contains(&hole), "hole {:?} not hit", hole);
        }
    }

    #[test]
    fn test_repeat_hits_are_idempotent() {
        // two origins crossing the same hole record it once
        let board = board_from_symbols(&["o o", "o o"]);
        let origins = [
            Origin::new(0, 1, 1, 1).unwrap(),
            Origin::new(0, 3, 1, -1).unwrap(),
        ];
        let trace = trace(&board, &origins, &[(1, 2)]).unwrap();
        assert_eq!(trace.hits.len(), 1);
        assert!(trace.beams[0].waypoints.iter().any(|w| w.pos() == (1, 2)));
        assert!(trace.beams[1].waypoints.iter().any(|w| w.pos() == (1, 2)));
    }

    #[test]
    fn test_origin_validation() {
        assert!(Origin::new(2, 7, 1, -1).is_ok());
        assert_eq!(
            Origin::new(2, 7, 0, -1),
            Err(ConfigurationError::BadDirection { dx: 0, dy: -1 })
        );
        assert_eq!(
            Origin::new(2, 7, 1, 2),
            Err(ConfigurationError::BadDirection { dx: 1, dy: 2 })
        );
    }
}
