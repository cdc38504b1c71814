//! Post-pass filters run over the placed tiles and mountains.
//!
//! - [cull_highlanders]: keep one entity per name among generated `Highlander` entities.
//! - [cull_random_features]: drop each child of a generated `RandomFeatureSet` with a
//!   fixed probability.
use rand::Rng;
use tracing::debug;

use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::rng::RngStream;
use crate::scene::{EntityId, EntityTag, SceneGraph};

/// Default probability that a random feature child is removed.
pub const RANDOM_FEATURE_DROP_CHANCE: f32 = 0.35;

/// Which filter removed an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterKind {
    Highlander,
    RandomFeature,
}

fn report_removed(sink: &mut dyn EventSink, id: EntityId, filter: FilterKind) {
    if sink.wants(GenerationEventKind::EntityRemoved) {
        sink.send(GenerationEvent::EntityRemoved { id, filter });
    }
}

/// Groups generated highlanders by name in first-seen order, draws one survivor per
/// group and removes the rest. Every group consumes one draw, singletons included.
pub fn cull_highlanders<G: SceneGraph + ?Sized>(
    scene: &mut G,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Vec<EntityId> {
    let mut groups: Vec<(String, Vec<EntityId>)> = Vec::new();
    for id in scene.find_tagged(EntityTag::Highlander) {
        if !scene.is_generated(id) {
            continue;
        }
        let Some(name) = scene.name(id) else {
            continue;
        };
        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, members)) => members.push(id),
            None => groups.push((name.to_owned(), vec![id])),
        }
    }

    let mut removed = Vec::new();
    for (name, members) in groups {
        let survivor = rng.range_usize(0, members.len());
        debug!(
            "Highlander '{}': keeping {} of {}",
            name,
            survivor,
            members.len()
        );
        for (i, id) in members.into_iter().enumerate() {
            if i != survivor && scene.remove(id) {
                report_removed(sink, id, FilterKind::Highlander);
                removed.push(id);
            }
        }
    }
    removed
}

/// Removes each direct child of every generated random feature set when a fresh
/// value is at most `drop_chance`.
pub fn cull_random_features<G: SceneGraph + ?Sized>(
    scene: &mut G,
    drop_chance: f32,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Vec<EntityId> {
    let mut removed = Vec::new();
    for set in scene.find_tagged(EntityTag::RandomFeatureSet) {
        if !scene.is_generated(set) {
            continue;
        }
        for child in scene.children(set) {
            if rng.chance(drop_chance) && scene.remove(child) {
                report_removed(sink, child, FilterKind::RandomFeature);
                removed.push(child);
            }
        }
    }
    removed
}
