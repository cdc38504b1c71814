#![forbid(unsafe_code)]
//! diorama_gen: seeded procedural generation of a 3×3 forest tile diorama.
//!
//! Modules:
//! - rng, selection: the shared stream and weighted/uniform choice over it
//! - sampling: Poisson-disk candidate generation
//! - layout: the nine tiles, river path synthesis and feature placement
//! - scatter: mountains plus the tree, clutter and grass layers with occlusion rejection
//! - filters: highlander dedup and random feature culling
//! - scene: capabilities the engine needs from a scene, plus an in-memory scene
//! - generator: the orchestration tying every step to one seed
pub mod catalog;
pub mod context;
pub mod error;
pub mod events;
pub mod filters;
pub mod generator;
pub mod layout;
pub mod rng;
pub mod sampling;
pub mod scatter;
pub mod scene;
pub mod selection;

/// Convenient re-exports for common types. Import with `use diorama_gen::prelude::*;`.
pub mod prelude {
    pub use crate::context::GenerationContext;
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        EventSink, FnSink, GenerationEvent, GenerationEventKind, MultiSink, VecSink,
    };
    pub use crate::filters::{cull_highlanders, cull_random_features, FilterKind};
    pub use crate::generator::{Diorama, DioramaGenerator, GeneratorConfig};
    pub use crate::layout::{
        cell_world_position, place_tiles, plan_tiles, RiverPlan, TileLayout, TileSpec,
    };
    pub use crate::rng::{DioramaRng, RngStream};
    pub use crate::sampling::{PoissonDiskSampling, PositionSampling};
    pub use crate::scatter::forest::forest_scatter_plan;
    pub use crate::scatter::mountains::place_mountains;
    pub use crate::scatter::plan::{
        AssetPool, JitterRange, ScaleJitter, ScatterLayer, ScatterPlan, TransformJitter,
    };
    pub use crate::scatter::runner::{run_layer, run_plan, LayerResult, RejectReason};
    pub use crate::scatter::PlacedObject;
    pub use crate::scene::memory::{
        Collider, ColliderKind, MemoryScene, Prefab, PrefabCollider, PrefabNode,
    };
    pub use crate::scene::{EntityId, EntityTag, OcclusionQuery, PlacementSink, Scene, SceneGraph};
    pub use crate::selection::{pick_uniform, pick_weighted, Weighted};
}
