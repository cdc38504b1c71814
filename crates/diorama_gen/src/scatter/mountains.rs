//! Backdrop mountain row behind the grid.
use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::catalog;
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::scatter::plan::JitterRange;
use crate::scatter::{PlacedObject, SCATTER_BASE_HEIGHT};
use crate::scene::PlacementSink;
use crate::selection::pick_uniform;

/// Layer id reported for mountain placements.
pub const MOUNTAIN_LAYER_ID: &str = "mountains";
pub const MOUNTAIN_COUNT: usize = 8;
/// x of the first mountain.
pub const MOUNTAIN_START_X: f32 = -22.0;
/// x distance between neighbouring mountains.
pub const MOUNTAIN_SPACING: f32 = 6.2;
pub const MOUNTAIN_DEPTH_SCALE: f32 = 1.5;

const HEIGHT_SCALE: JitterRange = JitterRange::new(2.0, 3.0);
const WIDTH_SCALE: JitterRange = JitterRange::new(1.5, 3.0);
const YAW: JitterRange = JitterRange::new(-30.0, 30.0);
const DEPTH: JitterRange = JitterRange::new(21.5, 25.5);

/// Places the mountain row. Mountains skip occlusion tests.
///
/// Each mountain draws its asset, height, width, yaw and depth in that order.
pub fn place_mountains<P: PlacementSink + ?Sized>(
    scene: &mut P,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Vec<PlacedObject> {
    let mut placed = Vec::with_capacity(MOUNTAIN_COUNT);
    for i in 0..MOUNTAIN_COUNT {
        let Some(asset) = pick_uniform(&catalog::MOUNTAINS, rng) else {
            break;
        };
        let height = HEIGHT_SCALE.sample(rng);
        let width = WIDTH_SCALE.sample(rng);
        let yaw = YAW.sample(rng);
        let z = DEPTH.sample(rng);

        let position = Vec3::new(
            MOUNTAIN_START_X + i as f32 * MOUNTAIN_SPACING,
            SCATTER_BASE_HEIGHT,
            z,
        );
        let object = PlacedObject::new(*asset, position)
            .with_rotation(Vec3::new(0.0, yaw, 0.0))
            .with_scale(Vec3::new(width, height, MOUNTAIN_DEPTH_SCALE));
        debug!("Mountain {} '{}' at z={:.2}", i, object.asset, z);

        scene.place(&object);
        if sink.wants(GenerationEventKind::ObjectPlaced) {
            sink.send(GenerationEvent::ObjectPlaced {
                layer_id: MOUNTAIN_LAYER_ID.to_owned(),
                object: object.clone(),
            });
        }
        placed.push(object);
    }
    placed
}
