//! The standard forest scatter plan: three tree bands, clutter, then two grass passes.
use glam::Vec2;

use crate::catalog;
use crate::sampling::PoissonDiskSampling;
use crate::scatter::plan::{AssetPool, ScatterLayer, ScatterPlan, TransformJitter};

pub const TALL_TREES_ID: &str = "tall trees";
pub const MEDIUM_TREES_ID: &str = "medium trees";
pub const SMALL_TREES_ID: &str = "small trees";
pub const CLUTTER_ID: &str = "clutter";
pub const GRASS_FILLER_ID: &str = "grass filler";
pub const GRASS_CLUMPS_ID: &str = "grass clumps";

const BAND: Vec2 = Vec2::new(60.0, 20.0);
const FIELD: Vec2 = Vec2::new(60.0, 60.0);
const FIELD_ANCHOR: Vec2 = Vec2::new(-30.0, -30.0);

fn poisson(min_distance: f32, max_attempts: usize) -> PoissonDiskSampling {
    PoissonDiskSampling::new(min_distance).with_max_attempts(max_attempts)
}

fn tree_band(
    id: &str,
    anchor: Vec2,
    min_distance: f32,
    sink_depth: f32,
    assets: &[&str],
    max_attempts: usize,
) -> ScatterLayer {
    ScatterLayer::new_with(
        id,
        BAND,
        anchor,
        poisson(min_distance, max_attempts),
        AssetPool::uniform(assets.iter().copied()),
        TransformJitter::tree(sink_depth),
    )
    .with_exclusion_zone(catalog::ZONE_NO_CLUTTER)
}

fn grass(id: &str, min_distance: f32, assets: &[&str], max_attempts: usize) -> ScatterLayer {
    ScatterLayer::new_with(
        id,
        FIELD,
        FIELD_ANCHOR,
        poisson(min_distance, max_attempts),
        AssetPool::uniform(assets.iter().copied()),
        TransformJitter::grass(),
    )
    .with_exclusion_zone(catalog::ZONE_NO_GRASS)
}

/// Builds the six forest layers in run order.
pub fn forest_scatter_plan(max_attempts: usize) -> ScatterPlan {
    let clutter = ScatterLayer::new_with(
        CLUTTER_ID,
        FIELD,
        FIELD_ANCHOR,
        poisson(4.0, max_attempts),
        AssetPool::weighted(catalog::CLUTTER.iter()),
        TransformJitter::clutter(),
    )
    .with_exclusion_zone(catalog::ZONE_NO_CLUTTER);

    ScatterPlan::new().with_layers(vec![
        tree_band(
            TALL_TREES_ID,
            Vec2::new(-30.0, 10.0),
            2.5,
            3.5,
            &catalog::TALL_TREES,
            max_attempts,
        ),
        tree_band(
            MEDIUM_TREES_ID,
            Vec2::new(-30.0, -10.0),
            4.5,
            2.5,
            &catalog::MEDIUM_TREES,
            max_attempts,
        ),
        tree_band(
            SMALL_TREES_ID,
            Vec2::new(-30.0, -30.0),
            7.0,
            1.5,
            &catalog::MEDIUM_TREES,
            max_attempts,
        ),
        clutter,
        grass(GRASS_FILLER_ID, 0.5, &catalog::GRASS_FILLERS, max_attempts),
        grass(GRASS_CLUMPS_ID, 2.5, &catalog::GRASS_CLUMPS, max_attempts),
    ])
}
