//! Reader for the `.bff` puzzle description format.
//!
//! The format is line oriented:
//!
//! ```text
//! # comment
//! GRID START
//! o o o o
//! o o x o
//! GRID STOP
//! A 2        # reflect-block budget
//! B 0        # opaque-block budget
//! C 1        # refract-block budget
//! L 2 7 1 -1 # laser: x y dx dy
//! P 3 0      # hole: x y
//! ```
//!
//! Grid symbols: `o` open cell, `x` no block allowed, `A`/`B`/`C` a fixed
//! reflect/opaque/refract block. Budget lines default to 0 when absent.
//! Lines that match none of the known forms are ignored, as the original
//! game's files rely on.

use std::fmt;

use crate::board::{BlockKind, Board, ConfigurationError};
use crate::generator::Budget;
use crate::solver::Puzzle;
use crate::tracer::Origin;

/// Errors produced while reading a puzzle description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `GRID START` section was found.
    MissingGrid,
    /// `GRID START` without a matching `GRID STOP`.
    UnterminatedGrid,
    /// A grid row contained something other than `o x A B C`.
    UnknownSymbol { line: usize, token: String },
    /// A budget, laser, or hole line had a malformed number.
    BadNumber { line: usize, token: String },
    /// A laser or hole line had the wrong number of fields.
    BadLine { line: usize },
    /// The file declares no lasers.
    NoOrigins,
    /// The file declares no holes.
    NoHoles,
    /// A laser start point lies outside the doubled grid.
    OriginOutOfBounds { x: i32, y: i32 },
    /// A hole lies outside the doubled grid.
    HoleOutOfBounds { x: i32, y: i32 },
    /// The grid itself was invalid, or a laser direction was not ±1.
    Configuration(ConfigurationError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingGrid => write!(f, "no GRID START section"),
            ParseError::UnterminatedGrid => write!(f, "GRID START without GRID STOP"),
            ParseError::UnknownSymbol { line, token } => {
                write!(f, "line {}: unknown grid symbol '{}'", line, token)
            }
            ParseError::BadNumber { line, token } => {
                write!(f, "line {}: expected a number, found '{}'", line, token)
            }
            ParseError::BadLine { line } => {
                write!(f, "line {}: wrong number of fields", line)
            }
            ParseError::NoOrigins => write!(f, "the puzzle declares no lasers"),
            ParseError::NoHoles => write!(f, "the puzzle declares no holes"),
            ParseError::OriginOutOfBounds { x, y } => {
                write!(f, "laser start ({}, {}) is outside the grid", x, y)
            }
            ParseError::HoleOutOfBounds { x, y } => {
                write!(f, "hole ({}, {}) is outside the grid", x, y)
            }
            ParseError::Configuration(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ConfigurationError> for ParseError {
    fn from(err: ConfigurationError) -> ParseError {
        ParseError::Configuration(err)
    }
}

fn parse_number(token: &str, line: usize) -> Result<i32, ParseError> {
    token.parse().map_err(|_| ParseError::BadNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_count(token: &str, line: usize) -> Result<usize, ParseError> {
    token.parse().map_err(|_| ParseError::BadNumber {
        line,
        token: token.to_string(),
    })
}

/// Parses a `.bff` puzzle description into a validated [`Puzzle`].
pub fn parse(text: &str) -> Result<Puzzle, ParseError> {
    let mut rows: Vec<Vec<BlockKind>> = Vec::new();
    let mut saw_grid = false;
    let mut budget = Budget::default();
    let mut origins: Vec<Origin> = Vec::new();
    let mut holes: Vec<(i32, i32)> = Vec::new();

    let mut lines = text.lines().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if line == "GRID START" {
            saw_grid = true;
            let mut terminated = false;
            for (row_index, raw_row) in lines.by_ref() {
                let row_line = raw_row.split('#').next().unwrap_or("").trim();
                if row_line == "GRID STOP" {
                    terminated = true;
                    break;
                }
                let mut row = Vec::new();
                for token in row_line.split_whitespace() {
                    let mut chars = token.chars();
                    let kind = match (chars.next().and_then(BlockKind::from_symbol), chars.next())
                    {
                        (Some(kind), None) => kind,
                        _ => {
                            return Err(ParseError::UnknownSymbol {
                                line: row_index + 1,
                                token: token.to_string(),
                            })
                        }
                    };
                    row.push(kind);
                }
                if !row.is_empty() {
                    rows.push(row);
                }
            }
            if !terminated {
                return Err(ParseError::UnterminatedGrid);
            }
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match *fields.as_slice() {
            ["A", n] => budget.reflect = parse_count(n, index + 1)?,
            ["B", n] => budget.opaque = parse_count(n, index + 1)?,
            ["C", n] => budget.refract = parse_count(n, index + 1)?,
            ["L", ref rest @ ..] => {
                if rest.len() != 4 {
                    return Err(ParseError::BadLine { line: index + 1 });
                }
                let mut nums = [0i32; 4];
                for (slot, token) in nums.iter_mut().zip(rest.iter().copied()) {
                    *slot = parse_number(token, index + 1)?;
                }
                origins.push(Origin::new(nums[0], nums[1], nums[2], nums[3])?);
            }
            ["P", ref rest @ ..] => {
                if rest.len() != 2 {
                    return Err(ParseError::BadLine { line: index + 1 });
                }
                let x = parse_number(rest[0], index + 1)?;
                let y = parse_number(rest[1], index + 1)?;
                holes.push((x, y));
            }
            // anything else is ignored, matching the original reader
            _ => {}
        }
    }

    if !saw_grid || rows.is_empty() {
        return Err(ParseError::MissingGrid);
    }
    let board = Board::from_rows(&rows)?;

    if origins.is_empty() {
        return Err(ParseError::NoOrigins);
    }
    if holes.is_empty() {
        return Err(ParseError::NoHoles);
    }

    let max_x = (board.width() - 1) as i32;
    let max_y = (board.height() - 1) as i32;
    for origin in &origins {
        if origin.x < 0 || origin.x > max_x || origin.y < 0 || origin.y > max_y {
            return Err(ParseError::OriginOutOfBounds {
                x: origin.x,
                y: origin.y,
            });
        }
    }
    for &(x, y) in &holes {
        if x < 0 || x > max_x || y < 0 || y > max_y {
            return Err(ParseError::HoleOutOfBounds { x, y });
        }
    }

    Ok(Puzzle {
        board,
        budget,
        origins,
        holes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAD_1: &str = "\
# reference puzzle
GRID START
o o o o
o o o o
o o o o
o o o o
GRID STOP

A 2
C 1

L 2 7 1 -1

P 3 0
P 4 3
P 2 5
P 4 7
";

    #[test]
    fn test_parses_the_reference_puzzle() {
        let puzzle = parse(MAD_1).unwrap();
        assert_eq!(puzzle.board.rows(), 4);
        assert_eq!(puzzle.board.cols(), 4);
        assert_eq!(puzzle.board.open_cells().len(), 16);
        assert_eq!(
            puzzle.budget,
            Budget { reflect: 2, opaque: 0, refract: 1 }
        );
        assert_eq!(puzzle.origins, vec![Origin::new(2, 7, 1, -1).unwrap()]);
        assert_eq!(puzzle.holes, vec![(3, 0), (4, 3), (2, 5), (4, 7)]);
    }

    #[test]
    fn test_fixed_blocks_and_blocked_cells_survive_parsing() {
        let text = "\
GRID START
o B x
C o o
GRID STOP
A 1
L 0 1 1 1
P 1 2
";
        let puzzle = parse(text).unwrap();
        assert_eq!(puzzle.board.kind_at(3, 1), Some(BlockKind::Opaque));
        assert_eq!(puzzle.board.kind_at(5, 1), Some(BlockKind::Blocked));
        assert_eq!(puzzle.board.kind_at(1, 3), Some(BlockKind::Refract));
        assert_eq!(puzzle.board.fixed_cells(), &[(3, 1), (1, 3)]);
        assert_eq!(puzzle.board.open_cells(), vec![(1, 1), (3, 3), (5, 3)]);
    }

    #[test]
    fn test_missing_grid_is_an_error() {
        assert_eq!(parse("A 2\nL 0 1 1 1\nP 1 2\n"), Err(ParseError::MissingGrid));
    }

    #[test]
    fn test_unterminated_grid_is_an_error() {
        assert_eq!(
            parse("GRID START\no o\n"),
            Err(ParseError::UnterminatedGrid)
        );
    }

    #[test]
    fn test_unknown_symbol_is_an_error() {
        let text = "GRID START\no q\nGRID STOP\nL 0 1 1 1\nP 1 2\n";
        assert_eq!(
            parse(text),
            Err(ParseError::UnknownSymbol {
                line: 2,
                token: "q".to_string()
            })
        );
    }

    #[test]
    fn test_negative_budget_is_an_error() {
        let text = "GRID START\no\nGRID STOP\nA -2\nL 0 1 1 1\nP 1 2\n";
        assert_eq!(
            parse(text),
            Err(ParseError::BadNumber {
                line: 4,
                token: "-2".to_string()
            })
        );
    }

    #[test]
    fn test_bad_laser_direction_is_an_error() {
        let text = "GRID START\no\nGRID STOP\nL 0 1 2 -1\nP 1 2\n";
        assert_eq!(
            parse(text),
            Err(ParseError::Configuration(
                ConfigurationError::BadDirection { dx: 2, dy: -1 }
            ))
        );
    }

    #[test]
    fn test_out_of_bounds_hole_is_an_error() {
        let text = "GRID START\no\nGRID STOP\nL 0 1 1 1\nP 5 1\n";
        assert_eq!(parse(text), Err(ParseError::HoleOutOfBounds { x: 5, y: 1 }));
    }

    #[test]
    fn test_missing_lasers_and_holes_are_errors() {
        assert_eq!(
            parse("GRID START\no\nGRID STOP\nP 1 0\n"),
            Err(ParseError::NoOrigins)
        );
        assert_eq!(
            parse("GRID START\no\nGRID STOP\nL 0 1 1 1\n"),
            Err(ParseError::NoHoles)
        );
    }

    #[test]
    fn test_comments_and_unknown_lines_are_ignored() {
        let text = "\
junk header line
GRID START
o o # trailing comment
GRID STOP
A 1 # one reflect block
L 0 1 1 1
P 1 2
";
        let puzzle = parse(text).unwrap();
        assert_eq!(puzzle.board.cols(), 2);
        assert_eq!(puzzle.budget.reflect, 1);
    }
}
