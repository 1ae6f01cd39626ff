use crate::core::prelude::*;
use serde::{Deserialize, Serialize};

pub mod grouping;

/// Which way a tile's collider group extends. Adjacent tiles sharing a
/// direction are merged into a single composite collider at load time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ColliderGroupDirection {
    #[default]
    None,
    Horizontal,
    Vertical,
    Box,
}

/// One cell of the tile map document, as authored by the map pipeline.
/// `texture_name` is opaque to the core; the rendering collaborator resolves
/// it to visuals.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TileColumnData {
    pub texture_name: String,
    #[serde(default)]
    pub has_collider: bool,
    #[serde(default)]
    pub collider_group_direction: ColliderGroupDirection,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TileRowData {
    pub tile_columns: Vec<TileColumnData>,
}

/// A single grid cell. Created once at level load; immutable afterwards
/// except for `grouped`, which is transient bookkeeping consumed exactly once
/// by the grouping pass.
#[derive(Clone, Debug)]
pub struct Tile {
    pub row: usize,
    pub column: usize,
    pub texture_name: String,
    pub has_collider: bool,
    pub direction: ColliderGroupDirection,
    pub(crate) grouped: bool,
    /// World position of the cell centre.
    pub position: Vec2,
    pub cell_size: Vec2,
}

impl Tile {
    /// Top-left corner of the cell in world space.
    pub fn offset(&self) -> Vec2 {
        self.position - self.cell_size / 2.0
    }
}

/// A rectangular grid of tiles in row-major order, built once from map data.
#[derive(Debug)]
pub struct TileMap {
    tiles: Vec<Tile>,
    rows: usize,
    columns: usize,
    cell_size: Vec2,
}

impl TileMap {
    /// Builds the grid from parsed map rows. The grid must be rectangular and
    /// non-empty; anything else is a configuration error surfaced to the
    /// initialisation caller.
    pub fn new(rows_data: Vec<TileRowData>, cell_size: Vec2) -> Result<Self> {
        let rows = rows_data.len();
        if rows == 0 {
            bail!("tile map has no rows");
        }
        let columns = rows_data[0].tile_columns.len();
        if columns == 0 {
            bail!("tile map row 0 is empty");
        }
        if cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            bail!("tile cell size must be positive, got {cell_size}");
        }

        let mut tiles = Vec::with_capacity(rows * columns);
        for (row, row_data) in rows_data.into_iter().enumerate() {
            if row_data.tile_columns.len() != columns {
                bail!(
                    "tile map is not rectangular: row {row} has {} columns, expected {columns}",
                    row_data.tile_columns.len()
                );
            }
            for (column, column_data) in row_data.tile_columns.into_iter().enumerate() {
                tiles.push(Tile {
                    row,
                    column,
                    texture_name: column_data.texture_name,
                    has_collider: column_data.has_collider,
                    direction: column_data.collider_group_direction,
                    grouped: false,
                    position: cell_size.component_wise(Vec2 {
                        x: column as f32,
                        y: row as f32,
                    }),
                    cell_size,
                });
            }
        }
        info!("loaded tile map: {rows}x{columns} tiles, cell size {cell_size}");
        Ok(Self {
            tiles,
            rows,
            columns,
            cell_size,
        })
    }

    /// Parses a JSON map document (an array of rows) and builds the grid.
    pub fn from_json(json: &str, cell_size: Vec2) -> Result<Self> {
        let rows_data: Vec<TileRowData> =
            serde_json::from_str(json).context("failed to parse tile map document")?;
        Self::new(rows_data, cell_size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// World size of the whole map.
    pub fn total_size(&self) -> Vec2 {
        self.cell_size.component_wise(Vec2 {
            x: self.columns as f32,
            y: self.rows as f32,
        })
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Tile> {
        if row < self.rows && column < self.columns {
            self.tiles.get(row * self.columns + column)
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut Tile> {
        if row < self.rows && column < self.columns {
            self.tiles.get_mut(row * self.columns + column)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}
