//! Sampling strategies for generating candidate positions in a 2D rectangle.
//!
//! Samplers work in local rectangle space: `x` in `[0, width]` and `y` in `[0, height]`.
//! The scatter pipeline translates points into world space with a layer anchor.
use mint::Vector2;
use rand::Rng;

pub mod poisson_disk;

pub use poisson_disk::PoissonDiskSampling;

/// Trait for position sampling.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<Vector2<f32>>;
}
