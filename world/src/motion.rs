//! Axis-separated motion of a circular actor through a tile grid.

use glam::Vec2;
use upside_home_core::{TileGrid, TilePosition};

/// Reports whether a circle overlaps a wall.
///
/// Only the four tiles under the corners of the circle's bounding square are
/// sampled, which is conservative near tile corners.
#[must_use]
pub fn is_wall_at(grid: &TileGrid, center: Vec2, radius: f32) -> bool {
    let min = grid.tile_at(center - Vec2::splat(radius));
    let max = grid.tile_at(center + Vec2::splat(radius));

    [
        TilePosition::new(min.column(), min.row()),
        TilePosition::new(max.column(), min.row()),
        TilePosition::new(min.column(), max.row()),
        TilePosition::new(max.column(), max.row()),
    ]
    .into_iter()
    .any(|tile| grid.is_wall(tile))
}

/// Moves a circle by `direction * distance`, resolving each axis separately.
///
/// The horizontal move is tested first with the vertical coordinate held, then
/// the vertical move is tested from the resolved horizontal coordinate. An axis
/// whose move would overlap a wall keeps its previous coordinate, which lets
/// diagonal input slide along walls.
#[must_use]
pub fn integrate(
    grid: &TileGrid,
    position: Vec2,
    radius: f32,
    direction: Vec2,
    distance: f32,
) -> Vec2 {
    let target = position + direction * distance;
    let mut resolved = position;

    if !is_wall_at(grid, Vec2::new(target.x, resolved.y), radius) {
        resolved.x = target.x;
    }

    if !is_wall_at(grid, Vec2::new(resolved.x, target.y), radius) {
        resolved.y = target.y;
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 4.5;

    fn room() -> TileGrid {
        TileGrid::bordered(5, 5, 10.0).expect("valid grid")
    }

    fn diagonal() -> Vec2 {
        Vec2::new(1.0, 1.0).normalize()
    }

    #[test]
    fn open_floor_moves_freely() {
        let grid = room();
        let moved = integrate(&grid, Vec2::new(25.0, 25.0), RADIUS, Vec2::X, 2.0);

        assert_eq!(moved, Vec2::new(27.0, 25.0));
    }

    #[test]
    fn corner_blocks_diagonal_motion_entirely() {
        let grid = room();
        let start = Vec2::new(35.0, 35.0);
        let moved = integrate(&grid, start, RADIUS, diagonal(), 2.0);

        assert_eq!(moved, start);
    }

    #[test]
    fn single_wall_lets_diagonal_slide_along_open_axis() {
        let grid = room();
        let start = Vec2::new(35.0, 25.0);
        let moved = integrate(&grid, start, RADIUS, diagonal(), 2.0);

        assert_eq!(moved.x, start.x);
        assert!(moved.y > start.y, "expected southward slide, got {moved:?}");
    }

    #[test]
    fn small_steps_approach_wall_until_contact() {
        let grid = room();
        let moved = integrate(&grid, Vec2::new(35.0, 25.0), RADIUS, Vec2::X, 0.4);

        assert!((moved.x - 35.4).abs() < 1e-4);
        assert!(!is_wall_at(&grid, moved, RADIUS));
    }

    #[test]
    fn zero_direction_keeps_position() {
        let grid = room();
        let start = Vec2::new(22.0, 31.0);

        assert_eq!(integrate(&grid, start, RADIUS, Vec2::ZERO, 50.0), start);
    }

    #[test]
    fn leaving_the_grid_counts_as_hitting_a_wall() {
        let grid = TileGrid::from_codes(2, 1, 10.0, &[vec![0, 0]]).expect("valid grid");

        assert!(is_wall_at(&grid, Vec2::new(5.0, 5.0), 6.0));
        assert!(!is_wall_at(&grid, Vec2::new(5.0, 5.0), 4.0));
        assert!(is_wall_at(&grid, Vec2::new(-1.0, 5.0), 0.5));
    }
}
