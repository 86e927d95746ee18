//! 3D visualization of solved boards using kiss3d.

use kiss3d::prelude::*;

use lazor::board::{BlockKind, Board};
use lazor::persistence::SavedSolution;

/// Returns the display color for a cell's block kind.
///
/// The mapping follows the original renderer: reflect white, opaque black,
/// refract red, open gray, blocked dark gray.
fn cell_color(kind: BlockKind) -> Color {
    match kind {
        BlockKind::Reflect => Color::new(1.0, 1.0, 1.0, 1.0),
        BlockKind::Opaque => Color::new(0.05, 0.05, 0.05, 1.0),
        BlockKind::Refract => Color::new(1.0, 0.1, 0.1, 1.0),
        BlockKind::Open => Color::new(0.4, 0.4, 0.4, 1.0),
        BlockKind::Blocked => Color::new(0.2, 0.2, 0.2, 1.0),
    }
}

/// Color for a beam's waypoint markers: the highlighted beam is bright,
/// the rest are dimmed.
fn beam_color(highlighted: bool) -> Color {
    if highlighted {
        Color::new(1.0, 0.2, 0.2, 1.0)
    } else {
        Color::new(0.5, 0.15, 0.15, 1.0)
    }
}

/// Maps doubled lattice coordinates onto world coordinates.
///
/// Content cells land on integer positions, beam positions on half steps;
/// the board is centered at the origin and puzzle rows grow downward, so y
/// is flipped.
struct WorldMap {
    cols: f32,
    rows: f32,
    height: f32,
}

impl WorldMap {
    fn new(board: &Board) -> WorldMap {
        WorldMap {
            cols: board.cols() as f32,
            rows: board.rows() as f32,
            height: board.height() as f32,
        }
    }

    fn world_x(&self, x: i32) -> f32 {
        (x as f32 - 1.0) / 2.0 - (self.cols - 1.0) / 2.0
    }

    fn world_y(&self, y: i32) -> f32 {
        ((self.height - 1.0 - y as f32) - 1.0) / 2.0 - (self.rows - 1.0) / 2.0
    }
}

/// Builds the scene: board tiles, origin and hole markers, and one marker
/// per beam waypoint. Returns the waypoint nodes so the event loop can
/// rebuild them when the highlighted beam changes.
fn build_beam_markers(
    scene: &mut SceneNode3d,
    saved: &SavedSolution,
    map: &WorldMap,
    highlight: Option<usize>,
) -> Vec<SceneNode3d> {
    /// Edge length of a waypoint marker cube.
    const MARKER_SIZE: f32 = 0.14;
    /// Height above the board tiles.
    const MARKER_Z: f32 = 0.3;

    let mut markers = Vec::new();
    for (i, beam) in saved.beams.iter().enumerate() {
        let highlighted = highlight.map(|h| h == i).unwrap_or(true);
        for waypoint in &beam.waypoints {
            let node = scene
                .add_cube(MARKER_SIZE, MARKER_SIZE, MARKER_SIZE)
                .set_color(beam_color(highlighted))
                .set_position(Vec3::new(
                    map.world_x(waypoint.x),
                    map.world_y(waypoint.y),
                    MARKER_Z,
                ));
            markers.push(node);
        }
    }
    markers
}

fn build_board(scene: &mut SceneNode3d, saved: &SavedSolution, map: &WorldMap) {
    /// Edge length of a board tile (slightly under 1.0 for visible gaps).
    const TILE_SIZE: f32 = 0.9;
    /// Tile thickness.
    const TILE_DEPTH: f32 = 0.2;

    for cy in 0..saved.board.rows() {
        for cx in 0..saved.board.cols() {
            let x = (2 * cx + 1) as i32;
            let y = (2 * cy + 1) as i32;
            let kind = saved
                .board
                .kind_at(x, y)
                .expect("content cell is on the lattice");
            scene
                .add_cube(TILE_SIZE, TILE_SIZE, TILE_DEPTH)
                .set_color(cell_color(kind))
                .set_position(Vec3::new(map.world_x(x), map.world_y(y), 0.0));
        }
    }

    // holes as white markers, origins as orange ones
    for &(x, y) in &saved.holes {
        scene
            .add_cube(0.3, 0.3, 0.3)
            .set_color(Color::new(1.0, 1.0, 1.0, 1.0))
            .set_position(Vec3::new(map.world_x(x), map.world_y(y), 0.3));
    }
    for origin in &saved.origins {
        scene
            .add_cube(0.3, 0.3, 0.3)
            .set_color(Color::new(1.0, 0.6, 0.1, 1.0))
            .set_position(Vec3::new(map.world_x(origin.x), map.world_y(origin.y), 0.3));
    }
}

/// Displays a solved board in an interactive viewer.
pub fn display(saved: SavedSolution) {
    pollster::block_on(display_async(saved));
}

async fn display_async(saved: SavedSolution) {
    let num_beams = saved.beams.len();
    // None highlights every beam at once
    let mut highlight: Option<usize> = None;

    let mut window = Window::new(&format!(
        "Solved board - {} beams - [Left/Right] highlight beam",
        num_beams
    ))
    .await;

    let map = WorldMap::new(&saved.board);

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(saved.board.rows().max(saved.board.cols()) as f32 * 2.5);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 8.0));

    build_board(&mut scene, &saved, &map);
    let mut beam_markers = build_beam_markers(&mut scene, &saved, &map, highlight);
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press && num_beams > 0 {
                    match key {
                        Key::Right => {
                            highlight = match highlight {
                                None => Some(0),
                                Some(i) if i + 1 < num_beams => Some(i + 1),
                                Some(_) => None,
                            };
                            needs_rebuild = true;
                        }
                        Key::Left => {
                            highlight = match highlight {
                                None => Some(num_beams - 1),
                                Some(0) => None,
                                Some(i) => Some(i - 1),
                            };
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut marker in beam_markers.drain(..) {
                marker.remove();
            }
            beam_markers = build_beam_markers(&mut scene, &saved, &map, highlight);
            let title = match highlight {
                None => format!("Solved board - all {} beams", num_beams),
                Some(i) => format!("Solved board - beam {}/{}", i + 1, num_beams),
            };
            window.set_title(&title);
            needs_rebuild = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
