#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use diorama_gen::generator::{DioramaGenerator, GeneratorConfig};
use diorama_gen::scene::memory::MemoryScene;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 15;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn diorama_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in accepted points or placed objects.
pub fn placements_throughput(placed: usize) -> Throughput {
    Throughput::Elements(placed.max(1) as u64)
}

/// Stream for a sampler bench, distinct per spacing.
pub fn spacing_rng(salt: u64, distance: f32) -> StdRng {
    StdRng::seed_from_u64(salt ^ distance.to_bits() as u64)
}

/// Generator and empty scene after one warm run, with the run's placement count.
pub fn warmed_generator(seed: i32) -> (DioramaGenerator, MemoryScene, usize) {
    let mut generator =
        DioramaGenerator::new(GeneratorConfig::new(seed)).expect("valid bench config");
    let mut scene = MemoryScene::new();
    let placed = generator.regenerate(&mut scene).placed_count();
    (generator, scene, placed)
}
