//! Headless, in-memory scene.
//!
//! Entities form a tree under a single generated root. Colliders are axis-aligned
//! boxes, either solid or a named zone. Prefabs registered per asset key are expanded
//! into child entities and colliders whenever that asset is placed, which lets feature
//! tiles carry highlander objects, random feature sets and exclusion zones.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::{Quat, Vec3};

use crate::scatter::PlacedObject;
use crate::scene::{EntityId, EntityTag, OcclusionQuery, PlacementSink, SceneGraph};

const ROOT_NAME: &str = "Generated Objects";

/// An entity in the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub tags: Vec<EntityTag>,
    pub parent: Option<EntityId>,
    /// World position.
    pub position: Vec3,
}

/// What a collider blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColliderKind {
    Solid,
    /// Named zone volume, e.g. "No Clutter".
    Zone(String),
}

/// World-space axis-aligned collider.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub kind: ColliderKind,
    pub min: Vec3,
    pub max: Vec3,
    /// Entity the collider is removed with. `None` for static level geometry.
    pub owner: Option<EntityId>,
}

impl Collider {
    pub fn solid(min: Vec3, max: Vec3) -> Self {
        Self {
            kind: ColliderKind::Solid,
            min: min.min(max),
            max: min.max(max),
            owner: None,
        }
    }

    pub fn zone(name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        Self {
            kind: ColliderKind::Zone(name.into()),
            min: min.min(max),
            max: min.max(max),
            owner: None,
        }
    }

    /// An upward ray from `point` hits this box when the box covers the point's
    /// (x, z) column and reaches at least the point's height.
    pub fn hit_by_upward_ray(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
            && self.max.y >= point.y
    }
}

/// Collider in a prefab's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabCollider {
    pub kind: ColliderKind,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl PrefabCollider {
    pub fn solid(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: ColliderKind::Solid,
            center,
            half_extents,
        }
    }

    pub fn zone(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: ColliderKind::Zone(name.into()),
            center,
            half_extents,
        }
    }
}

/// Child entity template. Offsets are in the placed object's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabNode {
    pub name: String,
    pub tags: Vec<EntityTag>,
    pub offset: Vec3,
    pub children: Vec<PrefabNode>,
    pub colliders: Vec<PrefabCollider>,
}

impl PrefabNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            offset: Vec3::ZERO,
            children: Vec::new(),
            colliders: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: EntityTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_collider(mut self, collider: PrefabCollider) -> Self {
        self.colliders.push(collider);
        self
    }
}

/// What gets instantiated alongside an asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
    pub colliders: Vec<PrefabCollider>,
}

impl Prefab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: PrefabNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_collider(mut self, collider: PrefabCollider) -> Self {
        self.colliders.push(collider);
        self
    }
}

/// Placement frame of an instantiated prefab node.
#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: Vec3,
    rotation: Quat,
    yaw: f32,
    scale: Vec3,
}

impl Frame {
    fn of(object: &PlacedObject) -> Self {
        let yaw = object.rotation.y.to_radians();
        Self {
            origin: object.position,
            rotation: Quat::from_rotation_y(yaw),
            yaw,
            scale: object.scale,
        }
    }

    fn point(&self, local: Vec3) -> Vec3 {
        self.origin + self.rotation * (local * self.scale)
    }

    /// Frame of a child node sitting at `offset` in this frame.
    fn nested(&self, offset: Vec3) -> Self {
        Self {
            origin: self.point(offset),
            ..*self
        }
    }

    /// World AABB of a local box after yaw rotation.
    fn collider(&self, local: &PrefabCollider, owner: EntityId) -> Collider {
        let center = self.point(local.center);
        let half = (local.half_extents * self.scale).abs();
        let (sin, cos) = self.yaw.sin_cos();
        let half = Vec3::new(
            cos.abs() * half.x + sin.abs() * half.z,
            half.y,
            sin.abs() * half.x + cos.abs() * half.z,
        );
        Collider {
            kind: local.kind.clone(),
            min: center - half,
            max: center + half,
            owner: Some(owner),
        }
    }
}

/// In-memory scene implementing every capability the generator needs.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    root: EntityId,
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    colliders: Vec<Collider>,
    prefabs: HashMap<String, Prefab>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        let root = EntityId(0);
        let mut entities = BTreeMap::new();
        entities.insert(
            root,
            Entity {
                name: ROOT_NAME.to_owned(),
                tags: Vec::new(),
                parent: None,
                position: Vec3::ZERO,
            },
        );
        Self {
            root,
            next_id: 1,
            entities,
            colliders: Vec::new(),
            prefabs: HashMap::new(),
        }
    }

    /// Root every placed object is parented to.
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Registers what gets instantiated whenever `asset` is placed.
    pub fn register_prefab(&mut self, asset: impl Into<String>, prefab: Prefab) {
        self.prefabs.insert(asset.into(), prefab);
    }

    pub fn with_prefab(mut self, asset: impl Into<String>, prefab: Prefab) -> Self {
        self.register_prefab(asset, prefab);
        self
    }

    /// Adds a collider that survives regeneration.
    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    /// Adds an entity outside the generated root.
    pub fn spawn_static(
        &mut self,
        name: impl Into<String>,
        tags: &[EntityTag],
        position: Vec3,
    ) -> EntityId {
        self.spawn(name.into(), tags.to_vec(), None, position)
    }

    /// Adds an entity under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        tags: &[EntityTag],
        position: Vec3,
    ) -> EntityId {
        self.spawn(name.into(), tags.to_vec(), Some(parent), position)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of live entities below the generated root.
    pub fn generated_count(&self) -> usize {
        self.entities
            .keys()
            .filter(|id| **id != self.root && self.is_generated(**id))
            .count()
    }

    /// Names of live generated entities, in creation order.
    pub fn generated_names(&self) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|(id, _)| **id != self.root && self.is_generated(**id))
            .map(|(_, e)| e.name.as_str())
            .collect()
    }

    fn spawn(
        &mut self,
        name: String,
        tags: Vec<EntityTag>,
        parent: Option<EntityId>,
        position: Vec3,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                name,
                tags,
                parent,
                position,
            },
        );
        id
    }

    fn instantiate_node(&mut self, node: &PrefabNode, parent: EntityId, frame: &Frame) {
        let frame = frame.nested(node.offset);
        let id = self.spawn(
            node.name.clone(),
            node.tags.clone(),
            Some(parent),
            frame.origin,
        );
        for collider in &node.colliders {
            self.colliders.push(frame.collider(collider, id));
        }
        for child in &node.children {
            self.instantiate_node(child, id, &frame);
        }
    }

    fn descendants_inclusive(&self, id: EntityId) -> BTreeSet<EntityId> {
        let mut found = BTreeSet::from([id]);
        // Children always have larger ids than their parents.
        for (child, entity) in self.entities.range(id..) {
            if let Some(parent) = entity.parent {
                if found.contains(&parent) {
                    found.insert(*child);
                }
            }
        }
        found
    }

    fn remove_set(&mut self, doomed: &BTreeSet<EntityId>) {
        self.entities.retain(|id, _| !doomed.contains(id));
        self.colliders
            .retain(|c| c.owner.is_none_or(|owner| !doomed.contains(&owner)));
    }
}

impl OcclusionQuery for MemoryScene {
    fn is_solid_at(&self, point: Vec3) -> bool {
        self.colliders
            .iter()
            .any(|c| c.kind == ColliderKind::Solid && c.hit_by_upward_ray(point))
    }

    fn is_in_zone(&self, point: Vec3, zone: &str) -> bool {
        self.colliders.iter().any(|c| {
            let named = matches!(&c.kind, ColliderKind::Zone(name) if name == zone);
            named && c.hit_by_upward_ray(point)
        })
    }
}

impl PlacementSink for MemoryScene {
    fn clear_generated(&mut self) {
        let mut doomed = self.descendants_inclusive(self.root);
        doomed.remove(&self.root);
        self.remove_set(&doomed);
        // Hand out the freed ids again so a regenerated scene is numbered like the first.
        self.next_id = self.entities.keys().next_back().map_or(1, |id| id.0 + 1);
    }

    fn place(&mut self, object: &PlacedObject) -> EntityId {
        let id = self.spawn(
            object.asset.clone(),
            Vec::new(),
            Some(self.root),
            object.position,
        );
        if let Some(prefab) = self.prefabs.get(&object.asset).cloned() {
            let frame = Frame::of(object);
            for collider in &prefab.colliders {
                self.colliders.push(frame.collider(collider, id));
            }
            for node in &prefab.nodes {
                self.instantiate_node(node, id, &frame);
            }
        }
        id
    }
}

impl SceneGraph for MemoryScene {
    fn find_tagged(&self, tag: EntityTag) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.tags.contains(&tag))
            .map(|(id, _)| *id)
            .collect()
    }

    fn is_generated(&self, id: EntityId) -> bool {
        let mut current = self.entities.get(&id).and_then(|e| e.parent);
        while let Some(parent) = current {
            if parent == self.root {
                return true;
            }
            current = self.entities.get(&parent).and_then(|e| e.parent);
        }
        false
    }

    fn name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(&id).map(|e| e.name.as_str())
    }

    fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    fn remove(&mut self, id: EntityId) -> bool {
        if id == self.root || !self.entities.contains_key(&id) {
            return false;
        }
        let doomed = self.descendants_inclusive(id);
        self.remove_set(&doomed);
        true
    }
}
