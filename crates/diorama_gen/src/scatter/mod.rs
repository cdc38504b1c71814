//! Scatter pipeline placing decorative objects over the tile grid.
//!
//! A [`plan::ScatterPlan`] is an ordered list of layers. Each layer samples candidate
//! points with a [`crate::sampling::PositionSampling`], rejects those blocked by the
//! scene, and turns the rest into [`PlacedObject`]s with per-object jitter.
use glam::Vec3;

pub mod forest;
pub mod mountains;
pub mod plan;
pub mod runner;

/// Base height every scattered point is lifted to before occlusion tests.
pub const SCATTER_BASE_HEIGHT: f32 = 2.5;

/// A placement request handed to the scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedObject {
    /// Catalog key of the asset.
    pub asset: String,
    /// World position.
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl PlacedObject {
    pub fn new(asset: impl Into<String>, position: Vec3) -> Self {
        Self {
            asset: asset.into(),
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}
