//! Discrete wall/floor layout shared by the hub and every labyrinth.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single tile expressed as column and row indices.
///
/// Coordinates are signed so that positions derived from continuous world
/// space may fall outside the grid; such tiles are reported as walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: i32,
    row: i32,
}

impl TilePosition {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the tile displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }
}

/// Contents of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable tile.
    Floor,
    /// Solid tile that blocks movement.
    Wall,
}

impl Cell {
    /// Decodes the numeric cell representation used by map files.
    ///
    /// `0` denotes floor and `1` denotes wall; any other value is unknown.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Immutable wall/floor grid with solid boundary semantics.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<Cell>,
}

impl TileGrid {
    /// Creates a grid from row-major cells.
    ///
    /// Returns an error when the dimensions are empty, the tile length is not
    /// a positive finite number, or the cell count does not match the
    /// dimensions.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        cells: Vec<Cell>,
    ) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::EmptyGrid { columns, rows });
        }

        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(GridError::InvalidTileLength { tile_length });
        }

        let expected = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| GridError::EmptyGrid { columns, rows })?;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            cells,
        })
    }

    /// Creates a grid whose outermost ring is wall and whose interior is floor.
    pub fn bordered(columns: u32, rows: u32, tile_length: f32) -> Result<Self, GridError> {
        let mut cells = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let border = column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
                cells.push(if border { Cell::Wall } else { Cell::Floor });
            }
        }
        Self::new(columns, rows, tile_length, cells)
    }

    /// Decodes a grid from nested rows of numeric cell codes.
    pub fn from_codes(
        columns: u32,
        rows: u32,
        tile_length: f32,
        codes: &[Vec<u8>],
    ) -> Result<Self, GridError> {
        let expected_rows = usize::try_from(rows).unwrap_or(usize::MAX);
        if codes.len() != expected_rows {
            return Err(GridError::RowCount {
                expected: rows,
                actual: codes.len(),
            });
        }

        let expected_columns = usize::try_from(columns).unwrap_or(usize::MAX);
        let mut cells = Vec::with_capacity(expected_rows.saturating_mul(expected_columns));
        for (row, line) in codes.iter().enumerate() {
            if line.len() != expected_columns {
                return Err(GridError::RowLength {
                    row,
                    expected: columns,
                    actual: line.len(),
                });
            }

            for (column, &value) in line.iter().enumerate() {
                let cell = Cell::from_code(value).ok_or(GridError::UnknownCell {
                    column,
                    row,
                    value,
                })?;
                cells.push(cell);
            }
        }

        Self::new(columns, rows, tile_length, cells)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Extent of the grid in world units.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Returns the cell stored at the tile, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, tile: TilePosition) -> Option<Cell> {
        self.index(tile)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the tile blocks movement. Tiles outside the grid are walls.
    #[must_use]
    pub fn is_wall(&self, tile: TilePosition) -> bool {
        self.cell(tile).map_or(true, |cell| cell == Cell::Wall)
    }

    /// Reports whether the tile is walkable floor.
    #[must_use]
    pub fn is_floor(&self, tile: TilePosition) -> bool {
        self.cell(tile) == Some(Cell::Floor)
    }

    /// Tile containing the provided world-space point.
    #[must_use]
    pub fn tile_at(&self, point: Vec2) -> TilePosition {
        TilePosition::new(
            (point.x / self.tile_length).floor() as i32,
            (point.y / self.tile_length).floor() as i32,
        )
    }

    /// World-space centre of the provided tile.
    #[must_use]
    pub fn tile_center(&self, tile: TilePosition) -> Vec2 {
        Vec2::new(
            (tile.column() as f32 + 0.5) * self.tile_length,
            (tile.row() as f32 + 0.5) * self.tile_length,
        )
    }

    /// First floor tile in row-major order, if any.
    #[must_use]
    pub fn first_floor(&self) -> Option<TilePosition> {
        let width = usize::try_from(self.columns).ok()?;
        let index = self.cells.iter().position(|cell| *cell == Cell::Floor)?;
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(TilePosition::new(column, row))
    }

    /// Row-major index of the tile within the cell storage.
    #[must_use]
    pub fn index(&self, tile: TilePosition) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Total number of tiles in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid stores no tiles. Always `false` for valid grids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl TryFrom<MapData> for TileGrid {
    type Error = GridError;

    fn try_from(map: MapData) -> Result<Self, Self::Error> {
        TileGrid::from_codes(map.width, map.height, map.tile_size, &map.grid)
    }
}

/// Map description exchanged with the map data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    /// Row-major numeric cells, `0` for floor and `1` for wall.
    pub grid: Vec<Vec<u8>>,
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

/// Reasons map data may be rejected while building a [`TileGrid`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// The grid has no columns or no rows.
    #[error("grid must have at least one column and one row (got {columns}x{rows})")]
    EmptyGrid {
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
    },
    /// Tile length must be a positive finite number.
    #[error("tile size must be positive (got {tile_length})")]
    InvalidTileLength {
        /// Declared tile length.
        tile_length: f32,
    },
    /// The number of rows differs from the declared height.
    #[error("expected {expected} rows, found {actual}")]
    RowCount {
        /// Declared row count.
        expected: u32,
        /// Rows present in the data.
        actual: usize,
    },
    /// A row's length differs from the declared width.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        /// Offending row index.
        row: usize,
        /// Declared column count.
        expected: u32,
        /// Cells present in the row.
        actual: usize,
    },
    /// A cell holds a value other than floor or wall.
    #[error("unknown cell value {value} at ({column}, {row})")]
    UnknownCell {
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
        /// Raw value found in the data.
        value: u8,
    },
    /// The flat cell storage does not match the dimensions.
    #[error("expected {expected} cells, found {actual}")]
    CellCount {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cells provided.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> TileGrid {
        let codes: Vec<Vec<u8>> = rows
            .iter()
            .map(|line| line.bytes().map(|b| u8::from(b == b'#')).collect())
            .collect();
        TileGrid::from_codes(rows[0].len() as u32, rows.len() as u32, 10.0, &codes)
            .expect("valid grid")
    }

    #[test]
    fn out_of_bounds_tiles_are_walls() {
        let grid = grid_from(&["...", "...", "..."]);

        assert!(!grid.is_wall(TilePosition::new(0, 0)));
        assert!(grid.is_wall(TilePosition::new(-1, 0)));
        assert!(grid.is_wall(TilePosition::new(0, -1)));
        assert!(grid.is_wall(TilePosition::new(3, 0)));
        assert!(grid.is_wall(TilePosition::new(0, 3)));
        assert!(grid.is_wall(TilePosition::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn wall_cells_report_as_walls() {
        let grid = grid_from(&["#.", ".#"]);

        assert!(grid.is_wall(TilePosition::new(0, 0)));
        assert!(grid.is_floor(TilePosition::new(1, 0)));
        assert!(grid.is_floor(TilePosition::new(0, 1)));
        assert!(grid.is_wall(TilePosition::new(1, 1)));
    }

    #[test]
    fn tile_at_floors_negative_coordinates() {
        let grid = grid_from(&["..", ".."]);

        assert_eq!(grid.tile_at(Vec2::new(15.0, 9.99)), TilePosition::new(1, 0));
        assert_eq!(grid.tile_at(Vec2::new(-0.1, 0.0)), TilePosition::new(-1, 0));
    }

    #[test]
    fn tile_center_sits_in_the_middle_of_the_tile() {
        let grid = grid_from(&["..", ".."]);

        assert_eq!(grid.tile_center(TilePosition::new(1, 0)), Vec2::new(15.0, 5.0));
    }

    #[test]
    fn first_floor_scans_in_row_major_order() {
        let grid = grid_from(&["###", "#.#", ".##"]);

        assert_eq!(grid.first_floor(), Some(TilePosition::new(1, 1)));
        assert_eq!(grid_from(&["##", "##"]).first_floor(), None);
    }

    #[test]
    fn bordered_grid_has_solid_ring_and_open_interior() {
        let grid = TileGrid::bordered(5, 4, 8.0).expect("valid grid");

        assert!(grid.is_wall(TilePosition::new(0, 2)));
        assert!(grid.is_wall(TilePosition::new(4, 2)));
        assert!(grid.is_wall(TilePosition::new(2, 0)));
        assert!(grid.is_wall(TilePosition::new(2, 3)));
        assert!(grid.is_floor(TilePosition::new(1, 1)));
        assert!(grid.is_floor(TilePosition::new(3, 2)));
    }

    #[test]
    fn map_data_parses_camel_case_json() {
        let json = r#"{ "grid": [[1,1,1],[1,0,1],[1,1,1]], "tileSize": 32, "width": 3, "height": 3 }"#;
        let map: MapData = serde_json::from_str(json).expect("map json");
        let grid = TileGrid::try_from(map).expect("valid grid");

        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.tile_length(), 32.0);
        assert!(grid.is_floor(TilePosition::new(1, 1)));
        assert_eq!(grid.extent(), Vec2::new(96.0, 96.0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = TileGrid::from_codes(3, 2, 16.0, &[vec![0, 0, 0], vec![0, 0]])
            .expect_err("ragged rows must be rejected");

        assert_eq!(
            error,
            GridError::RowLength {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn unknown_cell_values_are_rejected() {
        let error = TileGrid::from_codes(2, 1, 16.0, &[vec![0, 7]])
            .expect_err("unknown cell must be rejected");

        assert_eq!(
            error,
            GridError::UnknownCell {
                column: 1,
                row: 0,
                value: 7
            }
        );
    }

    #[test]
    fn degenerate_dimensions_are_rejected() {
        assert!(matches!(
            TileGrid::bordered(0, 4, 8.0),
            Err(GridError::EmptyGrid { columns: 0, rows: 4 })
        ));
        assert!(matches!(
            TileGrid::bordered(3, 3, 0.0),
            Err(GridError::InvalidTileLength { .. })
        ));
        assert!(matches!(
            TileGrid::from_codes(2, 2, 8.0, &[vec![0, 0]]),
            Err(GridError::RowCount {
                expected: 2,
                actual: 1
            })
        ));
    }
}
