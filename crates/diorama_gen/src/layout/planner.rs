//! Tile layout planner: background row, river run, then feature cells.
use tracing::debug;

use crate::catalog;
use crate::context::GenerationContext;
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::layout::river::{resolve_river_tile, RiverPlan};
use crate::layout::{TileLayout, TileSpec, BACKGROUND_CELLS, GRID_CELLS};
use crate::rng::RngStream;

/// Decides the tile for each of the nine cells.
///
/// Draw order: river plan, river cells in flow order, then for each remaining cell in
/// ascending order a feature candidate, a ground roll and a rotation.
pub fn plan_tiles(ctx: &mut GenerationContext<'_>, sink: &mut dyn EventSink) -> TileLayout {
    let mut tiles: [TileSpec; GRID_CELLS] = std::array::from_fn(|_| TileSpec::ground());
    let mut needs_feature: Vec<usize> = (0..GRID_CELLS).collect();

    for cell in BACKGROUND_CELLS {
        tiles[cell] = TileSpec::ground();
        needs_feature.retain(|c| *c != cell);
    }

    let river = RiverPlan::draw(ctx, sink);
    debug!(
        "River: length {} starting at offset {} (spring: {}, at start: {}).",
        river.length, river.start, river.has_spring, river.spring_at_start
    );
    if sink.wants(GenerationEventKind::RiverPlanned) {
        sink.send(GenerationEvent::RiverPlanned {
            plan: river.clone(),
        });
    }
    for &cell in &river.cells {
        tiles[cell] = resolve_river_tile(ctx, &river, cell, sink);
        needs_feature.retain(|c| *c != cell);
    }

    let mut features: Vec<&str> = catalog::FEATURE_TILES.to_vec();
    for cell in needs_feature {
        let candidate = ctx.rng.range_usize(0, features.len());
        let asset = if ctx.rng.chance(ctx.ground_chance) || candidate >= features.len() {
            catalog::GROUND
        } else {
            ctx.escalate_ground_chance();
            features.remove(candidate)
        };
        let rotation = 90.0 * ctx.rng.range_i32(-1, 1) as f32;
        debug!("Cell {} -> {} at {}°.", cell, asset, rotation);
        tiles[cell] = TileSpec::new(asset, rotation);
    }

    TileLayout { tiles, river }
}
