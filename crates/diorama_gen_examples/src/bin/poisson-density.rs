use std::f32::consts::PI;

use diorama_gen::prelude::*;
use diorama_gen_examples::{init_tracing, render_points_to_png};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

const EXTENT: Vec2 = Vec2::new(60.0, 60.0);

fn main() -> anyhow::Result<()> {
    init_tracing();
    for (distance, radius) in [(2.5_f32, 4), (0.5, 1)] {
        for attempts in [1, 5, 20, 30] {
            let sampler = PoissonDiskSampling::new(distance).with_max_attempts(attempts);
            let mut rng = StdRng::seed_from_u64(7);
            let points: Vec<Vec2> = sampler
                .generate(EXTENT.into(), &mut rng)
                .into_iter()
                .map(Vec2::from)
                .collect();

            let area = EXTENT.x * EXTENT.y;
            let floor = 0.5 * area / (PI * distance * distance);
            let packing = 2.0 * (EXTENT.x + distance) * (EXTENT.y + distance)
                / (3.0_f32.sqrt() * distance * distance);
            info!(
                "D={distance} K={attempts}: {} points (floor {:.0}, packing bound {:.0})",
                points.len(),
                floor,
                packing
            );

            if attempts == 20 {
                render_points_to_png(
                    &points,
                    EXTENT,
                    (900, 900),
                    radius,
                    format!("poisson-d{distance}.png"),
                )?;
            }
        }
    }
    Ok(())
}
