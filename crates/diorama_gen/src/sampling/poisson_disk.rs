//! Poisson disk position sampling strategy (Bridson).
use std::f32::consts::{PI, SQRT_2};

use glam::Vec2;
use mint::Vector2;
use rand::Rng;

use crate::rng::RngStream;
use crate::sampling::PositionSampling;

/// Candidate attempts per active point before it is retired.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

/// Poisson disk sampling strategy.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples in world units.
    pub min_distance: f32,
    /// Candidate attempts around an active point before it is retired.
    pub max_attempts: usize,
}

impl PositionSampling for PoissonDiskSampling {
    fn generate(&self, extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<Vector2<f32>> {
        let bounds = Vec2::from(extent);
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Vec::new();
        }
        if !bounds.is_finite() || bounds.x <= 0.0 || bounds.y <= 0.0 {
            return Vec::new();
        }

        let mut sampler = PoissonDiskSampler::new(self.min_distance, bounds);
        sampler
            .generate(rng, self.max_attempts)
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with the given spacing and the default retry budget.
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the retry budget per active point.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

struct PoissonDiskSampler {
    min_distance: f32,
    min_distance_squared: f32,
    cell_size: f32,
    grid_width: usize,
    grid_height: usize,
    grid: Vec<Option<Vec2>>,
    active: Vec<Vec2>,
    bounds: Vec2,
}

impl PoissonDiskSampler {
    fn new(min_distance: f32, bounds: Vec2) -> Self {
        debug_assert!(min_distance > 0.0);
        let cell_size = min_distance / SQRT_2;
        // One extra column and row so points on the far edges get their own cells.
        let grid_width = (bounds.x / cell_size).floor() as usize + 1;
        let grid_height = (bounds.y / cell_size).floor() as usize + 1;

        Self {
            min_distance,
            min_distance_squared: min_distance * min_distance,
            cell_size,
            grid_width,
            grid_height,
            grid: vec![None; grid_width * grid_height],
            active: Vec::new(),
            bounds,
        }
    }

    #[inline]
    fn grid_index(&self, x: usize, y: usize) -> usize {
        y * self.grid_width + x
    }

    #[inline]
    fn point_to_grid(&self, point: Vec2) -> (usize, usize) {
        let x = ((point.x / self.cell_size).floor() as isize)
            .clamp(0, self.grid_width as isize - 1) as usize;
        let y = ((point.y / self.cell_size).floor() as isize)
            .clamp(0, self.grid_height as isize - 1) as usize;
        (x, y)
    }

    #[inline]
    fn in_bounds(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.bounds.x && point.y >= 0.0 && point.y <= self.bounds.y
    }

    fn has_close_neighbor(&self, point: Vec2) -> bool {
        let (gx, gy) = self.point_to_grid(point);
        let start_x = gx.saturating_sub(2);
        let end_x = (gx + 3).min(self.grid_width);
        let start_y = gy.saturating_sub(2);
        let end_y = (gy + 3).min(self.grid_height);

        for y in start_y..end_y {
            for x in start_x..end_x {
                if let Some(existing) = self.grid[self.grid_index(x, y)] {
                    if point.distance_squared(existing) < self.min_distance_squared {
                        return true;
                    }
                }
            }
        }

        false
    }

    fn add_point(&mut self, point: Vec2) {
        let (gx, gy) = self.point_to_grid(point);
        let idx = self.grid_index(gx, gy);
        self.grid[idx] = Some(point);
        self.active.push(point);
    }

    /// Candidate in the annulus `[d, 2d)` around `point`. Draws the angle first.
    fn random_point_near(&self, rng: &mut dyn Rng, point: Vec2) -> Vec2 {
        let angle = rng.value() * 2.0 * PI;
        let distance = rng.range_f32(self.min_distance, self.min_distance * 2.0);
        Vec2::new(
            point.x + distance * angle.cos(),
            point.y + distance * angle.sin(),
        )
    }

    fn generate(&mut self, rng: &mut dyn Rng, max_attempts: usize) -> Vec<Vec2> {
        let first = Vec2::new(
            rng.range_f32(0.0, self.bounds.x),
            rng.range_f32(0.0, self.bounds.y),
        );
        self.add_point(first);
        let mut points = vec![first];

        while !self.active.is_empty() {
            let idx = rng.range_usize(0, self.active.len());
            let active = self.active[idx];

            let mut found = false;
            for _ in 0..max_attempts {
                let candidate = self.random_point_near(rng, active);
                if self.in_bounds(candidate) && !self.has_close_neighbor(candidate) {
                    self.add_point(candidate);
                    points.push(candidate);
                    found = true;
                    break;
                }
            }

            if !found {
                self.active.remove(idx);
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pairwise_min_distance(points: &[Vector2<f32>]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let a = Vec2::from(points[i]);
                let b = Vec2::from(points[j]);
                min = min.min(a.distance(b));
            }
        }
        min
    }

    /// Upper bound from disk packing: disks of radius d/2 centred in the rectangle.
    fn packing_bound(width: f32, height: f32, d: f32) -> f32 {
        2.0 * (width + d) * (height + d) / (3.0f32.sqrt() * d * d)
    }

    #[test]
    fn sampler_initializes_grid_dimensions() {
        let sampler = PoissonDiskSampler::new(2.5, Vec2::new(60.0, 20.0));
        assert_eq!(
            sampler.grid_width,
            (60.0 / sampler.cell_size).floor() as usize + 1
        );
        assert_eq!(
            sampler.grid_height,
            (20.0 / sampler.cell_size).floor() as usize + 1
        );
        assert!(sampler.grid.iter().all(Option::is_none));
    }

    #[test]
    fn close_neighbors_are_detected() {
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(4.0, 4.0));
        sampler.add_point(Vec2::new(2.0, 2.0));

        assert!(sampler.has_close_neighbor(Vec2::new(2.5, 2.0)));
        assert!(!sampler.has_close_neighbor(Vec2::new(3.5, 3.5)));
    }

    #[test]
    fn edge_points_map_into_the_grid() {
        let sampler = PoissonDiskSampler::new(SQRT_2, Vec2::new(4.0, 4.0));
        assert_eq!(sampler.point_to_grid(Vec2::new(4.0, 4.0)), (4, 4));
        assert_eq!(sampler.point_to_grid(Vec2::new(3.0, 3.9)), (3, 3));
        assert_eq!(sampler.point_to_grid(Vec2::ZERO), (0, 0));
    }

    #[test]
    fn generated_points_respect_spacing_and_bounds() {
        let mut rng = StdRng::seed_from_u64(123);
        let sampling = PoissonDiskSampling::new(2.5);
        let points = sampling.generate(Vec2::new(60.0, 20.0).into(), &mut rng);

        assert!(points.len() > 1);
        for p in &points {
            assert!(p.x >= 0.0 && p.x <= 60.0);
            assert!(p.y >= 0.0 && p.y <= 20.0);
        }
        assert!(pairwise_min_distance(&points) >= 2.5 - 1e-4);
    }

    #[test]
    fn same_stream_gives_same_points() {
        let sampling = PoissonDiskSampling::new(4.0);
        let mut rng_a = StdRng::seed_from_u64(12345);
        let mut rng_b = StdRng::seed_from_u64(12345);
        let a = sampling.generate(Vec2::new(60.0, 60.0).into(), &mut rng_a);
        let b = sampling.generate(Vec2::new(60.0, 60.0).into(), &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn larger_retry_budget_does_not_shrink_output() {
        let mut rng_low = StdRng::seed_from_u64(8);
        let mut rng_high = StdRng::seed_from_u64(8);
        let low = PoissonDiskSampling::new(2.5)
            .with_max_attempts(1)
            .generate(Vec2::new(60.0, 60.0).into(), &mut rng_low);
        let high = PoissonDiskSampling::new(2.5)
            .with_max_attempts(30)
            .generate(Vec2::new(60.0, 60.0).into(), &mut rng_high);
        assert!(high.len() >= low.len());
    }

    #[test]
    fn zero_attempts_yield_only_the_seed_point() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = PoissonDiskSampling::new(1.0)
            .with_max_attempts(0)
            .generate(Vec2::new(10.0, 10.0).into(), &mut rng);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn degenerate_spacing_yields_a_sparse_set() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = PoissonDiskSampling::new(100.0)
            .generate(Vec2::new(10.0, 10.0).into(), &mut rng);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn invalid_inputs_return_no_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let extent = Vec2::new(10.0, 10.0);
        assert!(PoissonDiskSampling::new(0.0)
            .generate(extent.into(), &mut rng)
            .is_empty());
        assert!(PoissonDiskSampling::new(f32::NAN)
            .generate(extent.into(), &mut rng)
            .is_empty());
        assert!(PoissonDiskSampling::new(1.0)
            .generate(Vec2::new(0.0, 5.0).into(), &mut rng)
            .is_empty());
    }

    #[test]
    fn grass_clump_density_is_plausible() {
        let mut rng = StdRng::seed_from_u64(12345);
        let points = PoissonDiskSampling::new(2.5)
            .generate(Vec2::new(60.0, 60.0).into(), &mut rng);
        let count = points.len() as f32;
        assert!(count <= packing_bound(60.0, 60.0, 2.5));
        // A near-maximal set covers the field with disks of radius d.
        assert!(count >= 0.5 * 3600.0 / (PI * 2.5 * 2.5));
    }

    #[test]
    fn grass_filler_density_is_plausible() {
        let mut rng = StdRng::seed_from_u64(12345);
        let points = PoissonDiskSampling::new(0.5)
            .generate(Vec2::new(60.0, 60.0).into(), &mut rng);
        let count = points.len() as f32;
        assert!(count <= packing_bound(60.0, 60.0, 0.5));
        assert!(count >= 0.5 * 3600.0 / (PI * 0.5 * 0.5));
    }
}
