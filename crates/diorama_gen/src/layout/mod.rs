//! Tile layout for the 3×3 diorama grid.
//!
//! Cells are indexed row-major from the back row: 0-2 are the background row, 3-5 the
//! middle row and 6-8 the front row. [`planner::plan_tiles`] fills every cell and
//! [`place_tiles`] hands the result to a placement sink.
use glam::Vec3;

use crate::catalog;
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::scatter::PlacedObject;
use crate::scene::PlacementSink;

pub mod planner;
pub mod river;

pub use planner::plan_tiles;
pub use river::{resolve_river_tile, RiverPlan, RiverRole, TileRule, RIVER_CELLS};

/// Number of cells in the grid.
pub const GRID_CELLS: usize = 9;
/// Cells per grid row.
pub const GRID_COLUMNS: usize = 3;
/// Edge length of one square tile in world units.
pub const TILE_SIZE: f32 = 20.0;
/// Background row; always plain ground.
pub const BACKGROUND_CELLS: [usize; 3] = [0, 1, 2];

/// Asset and yaw for one grid cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpec {
    pub asset: String,
    /// Rotation about the vertical axis in degrees.
    pub rotation_y: f32,
}

impl TileSpec {
    pub fn new(asset: impl Into<String>, rotation_y: f32) -> Self {
        Self {
            asset: asset.into(),
            rotation_y,
        }
    }

    pub fn ground() -> Self {
        Self::new(catalog::GROUND, 0.0)
    }

    pub fn is_ground(&self) -> bool {
        self.asset == catalog::GROUND
    }
}

/// All nine tiles plus the river they were planned around.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileLayout {
    pub tiles: [TileSpec; GRID_CELLS],
    pub river: RiverPlan,
}

impl TileLayout {
    /// Feature tile names used in this layout, in cell order.
    pub fn features(&self) -> Vec<&str> {
        self.tiles
            .iter()
            .map(|t| t.asset.as_str())
            .filter(|asset| catalog::FEATURE_TILES.contains(asset))
            .collect()
    }

    /// Number of bridge tiles in this layout.
    pub fn bridge_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| catalog::BRIDGE_TILES.contains(&t.asset.as_str()))
            .count()
    }
}

/// World-space centre of a cell on the ground plane.
pub fn cell_world_position(index: usize) -> Vec3 {
    let column = (index % GRID_COLUMNS) as f32;
    let row = (index / GRID_COLUMNS) as f32;
    Vec3::new(-TILE_SIZE + column * TILE_SIZE, 0.0, TILE_SIZE - row * TILE_SIZE)
}

/// Places every tile of `layout` and returns the placed objects in cell order.
pub fn place_tiles<P: PlacementSink + ?Sized>(
    layout: &TileLayout,
    scene: &mut P,
    sink: &mut dyn EventSink,
) -> Vec<PlacedObject> {
    let mut placed = Vec::with_capacity(GRID_CELLS);
    for (cell, tile) in layout.tiles.iter().enumerate() {
        let object = PlacedObject::new(tile.asset.clone(), cell_world_position(cell))
            .with_rotation(Vec3::new(0.0, tile.rotation_y, 0.0));
        scene.place(&object);
        if sink.wants(GenerationEventKind::TilePlaced) {
            sink.send(GenerationEvent::TilePlaced {
                cell,
                tile: tile.clone(),
            });
        }
        placed.push(object);
    }
    placed
}
