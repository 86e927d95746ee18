//! File I/O for saving and loading solved puzzles.
//!
//! Binary format for the `.solution.bin` file (little endian):
//! - u32: content rows, u32: content columns
//! - rows * cols bytes: cell symbols (`o A B C x`), row-major
//! - u32: assignment length, then that many symbol bytes
//! - u32: origin count, then 4 i32 per origin (x, y, dx, dy)
//! - u32: hole count, then 2 i32 per hole
//! - u32: beam count, then per beam: u8 halted flag, u32 waypoint count,
//!   and 4 i32 per waypoint (x, y, dx, dy)

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::board::{BlockKind, Board, Coord};
use crate::tracer::{Beam, Origin, Waypoint};

/// Everything needed to redraw a solved board: the concrete board, the raw
/// accepted assignment, and the puzzle data the beams were traced against.
#[derive(Debug, Clone)]
pub struct SavedSolution {
    pub board: Board,
    pub assignment: Vec<BlockKind>,
    pub origins: Vec<Origin>,
    pub holes: Vec<Coord>,
    pub beams: Vec<Beam>,
}

/// Saves a solution to both a text and a binary file.
pub fn save(text_path: &Path, bin_path: &Path, saved: &SavedSolution) -> std::io::Result<()> {
    save_text(text_path, saved)?;
    save_binary(bin_path, saved)?;
    Ok(())
}

/// Human-readable report: the solved board, each beam's waypoints, and how
/// many holes were crossed.
pub fn solution_text(board: &Board, beams: &[Beam], holes: &[Coord]) -> String {
    let mut output = board.to_string();
    output.push('\n');

    for (i, beam) in beams.iter().enumerate() {
        output.push_str(&format!("beam {}:", i + 1));
        for waypoint in &beam.waypoints {
            output.push_str(&format!(" ({}, {})", waypoint.x, waypoint.y));
        }
        output.push('\n');
    }

    let hit = holes
        .iter()
        .filter(|&&hole| {
            beams
                .iter()
                .any(|beam| beam.waypoints.iter().any(|w| w.pos() == hole))
        })
        .count();
    output.push_str(&format!("\nholes hit: {}/{}\n", hit, holes.len()));
    output
}

fn save_text(path: &Path, saved: &SavedSolution) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write!(
        file,
        "{}",
        solution_text(&saved.board, &saved.beams, &saved.holes)
    )
}

fn save_binary(path: &Path, saved: &SavedSolution) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    file.write_all(&(saved.board.rows() as u32).to_le_bytes())?;
    file.write_all(&(saved.board.cols() as u32).to_le_bytes())?;
    for cy in 0..saved.board.rows() {
        for cx in 0..saved.board.cols() {
            let kind = saved
                .board
                .kind_at((2 * cx + 1) as i32, (2 * cy + 1) as i32)
                .expect("content cell is on the lattice");
            file.write_all(&[kind.symbol() as u8])?;
        }
    }

    file.write_all(&(saved.assignment.len() as u32).to_le_bytes())?;
    for &kind in &saved.assignment {
        file.write_all(&[kind.symbol() as u8])?;
    }

    file.write_all(&(saved.origins.len() as u32).to_le_bytes())?;
    for origin in &saved.origins {
        for value in [origin.x, origin.y, origin.dx, origin.dy] {
            file.write_all(&value.to_le_bytes())?;
        }
    }

    file.write_all(&(saved.holes.len() as u32).to_le_bytes())?;
    for &(x, y) in &saved.holes {
        file.write_all(&x.to_le_bytes())?;
        file.write_all(&y.to_le_bytes())?;
    }

    file.write_all(&(saved.beams.len() as u32).to_le_bytes())?;
    for beam in &saved.beams {
        file.write_all(&[beam.halted as u8])?;
        file.write_all(&(beam.waypoints.len() as u32).to_le_bytes())?;
        for waypoint in &beam.waypoints {
            for value in [waypoint.x, waypoint.y, waypoint.dx, waypoint.dy] {
                file.write_all(&value.to_le_bytes())?;
            }
        }
    }

    Ok(())
}

fn read_u32(file: &mut File) -> Option<u32> {
    let mut buffer = [0u8; 4];
    file.read_exact(&mut buffer).ok()?;
    Some(u32::from_le_bytes(buffer))
}

fn read_i32(file: &mut File) -> Option<i32> {
    let mut buffer = [0u8; 4];
    file.read_exact(&mut buffer).ok()?;
    Some(i32::from_le_bytes(buffer))
}

fn read_u8(file: &mut File) -> Option<u8> {
    let mut buffer = [0u8; 1];
    file.read_exact(&mut buffer).ok()?;
    Some(buffer[0])
}

/// Loads a solution from the binary file, or `None` if the file is missing
/// or malformed.
pub fn load(path: &Path) -> Option<SavedSolution> {
    let mut file = File::open(path).ok()?;

    let rows = read_u32(&mut file)? as usize;
    let cols = read_u32(&mut file)? as usize;
    let mut grid = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for _ in 0..cols {
            row.push(BlockKind::from_symbol(read_u8(&mut file)? as char)?);
        }
        grid.push(row);
    }
    let board = Board::from_rows(&grid).ok()?;

    let assignment_len = read_u32(&mut file)? as usize;
    let mut assignment = Vec::with_capacity(assignment_len);
    for _ in 0..assignment_len {
        assignment.push(BlockKind::from_symbol(read_u8(&mut file)? as char)?);
    }

    let origin_count = read_u32(&mut file)? as usize;
    let mut origins = Vec::with_capacity(origin_count);
    for _ in 0..origin_count {
        let x = read_i32(&mut file)?;
        let y = read_i32(&mut file)?;
        let dx = read_i32(&mut file)?;
        let dy = read_i32(&mut file)?;
        origins.push(Origin::new(x, y, dx, dy).ok()?);
    }

    let hole_count = read_u32(&mut file)? as usize;
    let mut holes = Vec::with_capacity(hole_count);
    for _ in 0..hole_count {
        let x = read_i32(&mut file)?;
        let y = read_i32(&mut file)?;
        holes.push((x, y));
    }

    let beam_count = read_u32(&mut file)? as usize;
    let mut beams = Vec::with_capacity(beam_count);
    for _ in 0..beam_count {
        let halted = read_u8(&mut file)? != 0;
        let waypoint_count = read_u32(&mut file)? as usize;
        let mut waypoints = Vec::with_capacity(waypoint_count);
        for _ in 0..waypoint_count {
            let x = read_i32(&mut file)?;
            let y = read_i32(&mut file)?;
            let dx = read_i32(&mut file)?;
            let dy = read_i32(&mut file)?;
            waypoints.push(Waypoint { x, y, dx, dy });
        }
        beams.push(Beam { waypoints, halted });
    }

    Some(SavedSolution {
        board,
        assignment,
        origins,
        holes,
        beams,
    })
}
