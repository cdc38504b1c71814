//! Runs scatter layers against a scene: sample, reject, pick, jitter, place.
use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::{info, warn};

use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::scatter::plan::{ScatterLayer, ScatterPlan};
use crate::scatter::PlacedObject;
use crate::scene::{OcclusionQuery, PlacementSink};

/// Why a candidate point was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// Solid geometry sits above the point.
    Solid,
    /// The point lies under the named exclusion zone.
    Zone(String),
}

/// Result of running a scatter layer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerResult {
    /// Objects handed to the scene, in sampler order.
    pub placements: Vec<PlacedObject>,
    /// Total candidate positions evaluated.
    pub positions_evaluated: usize,
    /// Total candidate positions rejected.
    pub positions_rejected: usize,
}

impl LayerResult {
    pub fn new() -> Self {
        Self::default()
    }
}

fn reject_reason<S: OcclusionQuery + ?Sized>(
    layer: &ScatterLayer,
    scene: &S,
    point: Vec3,
) -> Option<RejectReason> {
    if scene.is_solid_at(point) {
        return Some(RejectReason::Solid);
    }
    match &layer.exclusion_zone {
        Some(zone) if scene.is_in_zone(point, zone) => Some(RejectReason::Zone(zone.clone())),
        _ => None,
    }
}

/// Runs a single layer.
///
/// Rejected points consume no draws. Accepted points draw the asset first, then the
/// transform jitter, and are placed before the next point is tested, so later points
/// of the same layer see the colliders of earlier ones.
pub fn run_layer<S>(
    layer: &ScatterLayer,
    index: usize,
    scene: &mut S,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> LayerResult
where
    S: OcclusionQuery + PlacementSink + ?Sized,
{
    if sink.wants(GenerationEventKind::LayerStarted) {
        sink.send(GenerationEvent::LayerStarted {
            index,
            id: layer.id.clone(),
        });
    }

    let extent = mint::Vector2 {
        x: layer.extent.x,
        y: layer.extent.y,
    };
    let candidates = layer.sampling.generate(extent, rng);

    let mut result = LayerResult::new();
    for local in candidates {
        result.positions_evaluated += 1;
        let point = layer.world_point(Vec2::from(local));

        if let Some(reason) = reject_reason(layer, scene, point) {
            result.positions_rejected += 1;
            if sink.wants(GenerationEventKind::PointRejected) {
                sink.send(GenerationEvent::PointRejected {
                    layer_id: layer.id.clone(),
                    position: point,
                    reason,
                });
            }
            continue;
        }

        let Some(asset) = layer.assets.pick(rng, sink) else {
            warn!("Layer '{}' has no assets; skipping point.", layer.id);
            continue;
        };
        let asset = asset.to_owned();
        let (position, rotation, scale) = layer.jitter.sample(point, rng);
        let object = PlacedObject::new(asset, position)
            .with_rotation(rotation)
            .with_scale(scale);

        scene.place(&object);
        if sink.wants(GenerationEventKind::ObjectPlaced) {
            sink.send(GenerationEvent::ObjectPlaced {
                layer_id: layer.id.clone(),
                object: object.clone(),
            });
        }
        result.placements.push(object);
    }

    info!(
        "Layer '{}': {} placed, {} of {} candidates rejected.",
        layer.id,
        result.placements.len(),
        result.positions_rejected,
        result.positions_evaluated
    );

    if sink.wants(GenerationEventKind::LayerFinished) {
        sink.send(GenerationEvent::LayerFinished {
            index,
            id: layer.id.clone(),
            result: result.clone(),
        });
    }

    result
}

/// Runs every layer of `plan` in order, returning `(layer id, result)` pairs.
pub fn run_plan<S>(
    plan: &ScatterPlan,
    scene: &mut S,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Vec<(String, LayerResult)>
where
    S: OcclusionQuery + PlacementSink + ?Sized,
{
    plan.layers
        .iter()
        .enumerate()
        .map(|(index, layer)| (layer.id.clone(), run_layer(layer, index, scene, rng, sink)))
        .collect()
}

#[cfg(test)]
mod tests {
    use mint::Vector2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;
    use crate::scatter::plan::{AssetPool, TransformJitter};
    use crate::sampling::tests::FixedPoints;
    use crate::scene::memory::{Collider, MemoryScene, Prefab, PrefabCollider};
    use crate::scene::PlacementSink;

    fn layer(points: Vec<Vector2<f32>>) -> ScatterLayer {
        ScatterLayer::new_with(
            "rocks",
            Vec2::new(60.0, 60.0),
            Vec2::new(-30.0, -30.0),
            FixedPoints(points),
            AssetPool::uniform(["Rock 1", "Rock 2"]),
            TransformJitter::clutter(),
        )
        .with_exclusion_zone("No Clutter")
    }

    #[test]
    fn point_over_solid_collider_is_always_rejected() {
        let mut scene = MemoryScene::new().with_collider(Collider::solid(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(5.0, 8.0, 5.0),
        ));
        let layer = layer(vec![Vector2 { x: 30.0, y: 30.0 }]);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = run_layer(&layer, 0, &mut scene, &mut rng, &mut ());
            assert!(result.placements.is_empty());
            assert_eq!(result.positions_rejected, 1);
        }
        assert_eq!(scene.generated_count(), 0);
    }

    #[test]
    fn zone_only_rejects_its_own_layer_zone() {
        let zone = Collider::zone("No Grass", Vec3::splat(-1.0), Vec3::new(1.0, 5.0, 1.0));
        let mut scene = MemoryScene::new().with_collider(zone);
        let layer = layer(vec![Vector2 { x: 30.0, y: 30.0 }]);

        let mut rng = StdRng::seed_from_u64(7);
        let result = run_layer(&layer, 0, &mut scene, &mut rng, &mut ());
        assert_eq!(result.placements.len(), 1);

        let grass = self::layer(vec![Vector2 { x: 30.0, y: 30.0 }]).with_exclusion_zone("No Grass");
        let mut events = VecSink::new();
        let result = run_layer(&grass, 1, &mut scene, &mut rng, &mut events);
        assert!(result.placements.is_empty());
        assert!(events.as_slice().iter().any(|e| matches!(
            e,
            GenerationEvent::PointRejected {
                reason: RejectReason::Zone(z),
                ..
            } if z == "No Grass"
        )));
    }

    #[test]
    fn rejected_points_consume_no_draws() {
        let blocked = Vector2 { x: 30.0, y: 30.0 };
        let open = Vector2 { x: 50.0, y: 50.0 };
        let solid = Collider::solid(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0));

        let mut with_block = MemoryScene::new().with_collider(solid);
        let mut rng_a = StdRng::seed_from_u64(99);
        let a = run_layer(&layer(vec![blocked, open]), 0, &mut with_block, &mut rng_a, &mut ());

        let mut plain = MemoryScene::new();
        let mut rng_b = StdRng::seed_from_u64(99);
        let b = run_layer(&layer(vec![open]), 0, &mut plain, &mut rng_b, &mut ());

        assert_eq!(a.placements, b.placements);
        assert_eq!(rng_a.next_u32(), rng_b.next_u32());
    }

    #[test]
    fn placed_objects_block_later_points_of_the_same_layer() {
        let mut scene = MemoryScene::new();
        for rock in ["Rock 1", "Rock 2"] {
            scene.register_prefab(
                rock,
                Prefab::new().with_collider(PrefabCollider::solid(
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::splat(1.0),
                )),
            );
        }
        let p = Vector2 { x: 10.0, y: 10.0 };
        let mut rng = StdRng::seed_from_u64(3);
        let result = run_layer(&layer(vec![p, p]), 0, &mut scene, &mut rng, &mut ());

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.positions_rejected, 1);

        scene.clear_generated();
        assert!(!scene.is_solid_at(Vec3::new(-20.0, 2.5, -20.0)));
    }

    #[test]
    fn run_plan_reports_layers_in_order_with_events() {
        let plan = ScatterPlan::new()
            .with_layer(layer(vec![Vector2 { x: 1.0, y: 1.0 }]))
            .with_layer(
                ScatterLayer::new_with(
                    "pebbles",
                    Vec2::new(60.0, 60.0),
                    Vec2::new(-30.0, -30.0),
                    FixedPoints(vec![Vector2 { x: 2.0, y: 2.0 }]),
                    AssetPool::uniform(["Rock 3"]),
                    TransformJitter::grass(),
                ),
            );
        let mut scene = MemoryScene::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut events = VecSink::only(&[GenerationEventKind::LayerFinished]);
        let results = run_plan(&plan, &mut scene, &mut rng, &mut events);

        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["rocks", "pebbles"]);
        assert_eq!(events.len(), 2);
        assert_eq!(results[1].1.placements[0].asset, "Rock 3");
        assert_eq!(scene.generated_count(), 2);
    }
}
