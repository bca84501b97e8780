//! Breadth-first topology queries that lay out each labyrinth.

use std::collections::VecDeque;

use upside_home_core::{LevelTopology, TileGrid, TilePosition};

/// Tile returned when a grid contains no floor at all.
const FALLBACK_TILE: TilePosition = TilePosition::new(1, 1);

/// Neighbour offsets in visit order: right, left, down, up.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Floor tile with the greatest breadth-first distance from a start tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarthestFloor {
    /// Farthest tile found by the search.
    pub tile: TilePosition,
    /// Number of steps separating the tile from the start.
    pub distance: u32,
}

/// Dense breadth-first distances over floor tiles reachable from a start tile.
///
/// Distances are stored row-major and default to `u32::MAX` for tiles that are
/// walls or unreachable, mirroring the grid's dimensions.
#[derive(Clone, Debug)]
pub struct DistanceField {
    columns: u32,
    distances: Vec<u32>,
    farthest: FarthestFloor,
}

impl DistanceField {
    /// Runs the search from `start` across 4-connected floor tiles.
    ///
    /// The start tile is assumed to be floor. When it lies outside the grid the
    /// field is empty and the start itself is reported as the farthest tile.
    #[must_use]
    pub fn from_start(grid: &TileGrid, start: TilePosition) -> Self {
        let mut field = Self {
            columns: grid.columns(),
            distances: vec![u32::MAX; grid.len()],
            farthest: FarthestFloor {
                tile: start,
                distance: 0,
            },
        };

        let Some(start_index) = grid.index(start) else {
            return field;
        };

        field.distances[start_index] = 0;
        let mut queue = VecDeque::with_capacity(grid.len());
        queue.push_back(start);

        while let Some(tile) = queue.pop_front() {
            let Some(current_index) = grid.index(tile) else {
                continue;
            };
            let current_distance = field.distances[current_index];

            if current_distance > field.farthest.distance {
                field.farthest = FarthestFloor {
                    tile,
                    distance: current_distance,
                };
            }

            let next_distance = current_distance.saturating_add(1);
            for neighbor in neighbors(tile) {
                if !grid.is_floor(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if field.distances[neighbor_index] != u32::MAX {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Distance recorded for the tile, or `None` when it was never reached.
    #[must_use]
    pub fn distance(&self, tile: TilePosition) -> Option<u32> {
        let column = usize::try_from(tile.column()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        if column >= width {
            return None;
        }

        let index = row.checked_mul(width)?.checked_add(column)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Farthest tile, keeping the earliest one reached among equal distances.
    #[must_use]
    pub const fn farthest(&self) -> FarthestFloor {
        self.farthest
    }
}

/// Finds the floor tile reached first by a breadth-first search from `target`.
///
/// The frontier expands through walls as well as floor; among floor tiles at
/// the same number of steps the first one in visit order wins. Targets
/// outside the grid, and grids without floor, fall back to the first floor tile
/// in row-major order or `(1, 1)` when none exists.
#[must_use]
pub fn nearest_floor(grid: &TileGrid, target: TilePosition) -> TilePosition {
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();

    if let Some(index) = grid.index(target) {
        visited[index] = true;
        queue.push_back(target);
    }

    while let Some(tile) = queue.pop_front() {
        if grid.is_floor(tile) {
            return tile;
        }

        for neighbor in neighbors(tile) {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };

            if visited[index] {
                continue;
            }

            visited[index] = true;
            queue.push_back(neighbor);
        }
    }

    grid.first_floor().unwrap_or(FALLBACK_TILE)
}

/// Finds the floor tile with the greatest graph distance from `start`.
#[must_use]
pub fn farthest_floor(grid: &TileGrid, start: TilePosition) -> FarthestFloor {
    DistanceField::from_start(grid, start).farthest()
}

/// Derives entry, exit and key placement for a labyrinth.
///
/// The entry is the floor nearest the top-centre of the second row, the exit
/// the floor nearest the bottom-centre of the second-to-last row, and the key
/// sits on the floor tile farthest from the entry.
#[must_use]
pub fn solve(grid: &TileGrid) -> LevelTopology {
    let center_column = i32::try_from(grid.columns() / 2).unwrap_or(i32::MAX);
    let last_inner_row = i32::try_from(grid.rows())
        .unwrap_or(i32::MAX)
        .saturating_sub(2);

    let entry = nearest_floor(grid, TilePosition::new(center_column, 1));
    let exit = nearest_floor(grid, TilePosition::new(center_column, last_inner_row));
    let key = farthest_floor(grid, entry);

    LevelTopology {
        entry,
        exit,
        key_tile: key.tile,
        key_distance: key.distance,
    }
}

fn neighbors(tile: TilePosition) -> impl Iterator<Item = TilePosition> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .map(move |(columns, rows)| tile.offset(columns, rows))
}
