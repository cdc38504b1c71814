//! Capabilities the engine needs from the scene it populates.
//!
//! The engine never walks a live scene graph. It places objects through
//! [`PlacementSink`], asks [`OcclusionQuery`] whether a column is blocked, and uses
//! [`SceneGraph`] for the tag and ancestry queries of the post-pass filters.
//! [`memory::MemoryScene`] is a headless implementation of all three.
use glam::Vec3;

use crate::scatter::PlacedObject;

pub mod memory;

/// Handle to an entity owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

/// Tags the post-pass filters look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityTag {
    /// Only one entity per name may survive.
    Highlander,
    /// Container whose direct children are randomly culled.
    RandomFeatureSet,
}

/// Vertical occlusion tests.
///
/// Both queries cast a ray straight up from `point` with unbounded length, so they
/// answer "is anything above this (x, z) column", not a radius test.
pub trait OcclusionQuery {
    fn is_solid_at(&self, point: Vec3) -> bool;
    fn is_in_zone(&self, point: Vec3, zone: &str) -> bool;
}

/// Receives placement requests from the engine.
pub trait PlacementSink {
    /// Tears down everything placed by earlier runs.
    fn clear_generated(&mut self);
    /// Instantiates `object` under the generated root.
    fn place(&mut self, object: &PlacedObject) -> EntityId;
}

/// Tag and ancestry queries for the post-pass filters.
pub trait SceneGraph {
    /// Live entities carrying `tag`, in a stable order.
    fn find_tagged(&self, tag: EntityTag) -> Vec<EntityId>;
    /// Whether `id` descends from the generated root.
    fn is_generated(&self, id: EntityId) -> bool;
    fn name(&self, id: EntityId) -> Option<&str>;
    /// Direct children of `id`, in a stable order.
    fn children(&self, id: EntityId) -> Vec<EntityId>;
    /// Removes `id` and its descendants. Returns `false` if it was already gone.
    fn remove(&mut self, id: EntityId) -> bool;
}

/// Everything a full generation run needs.
pub trait Scene: OcclusionQuery + PlacementSink + SceneGraph {}

impl<T: OcclusionQuery + PlacementSink + SceneGraph + ?Sized> Scene for T {}
