use diorama_gen::prelude::*;
use diorama_gen_examples::init_tracing;
use tracing::info;

const TRIALS: usize = 10_000;
const SEED: i32 = 12345;
const WEIGHTS: [f64; 5] = [3.0, 2.0, 3.0, 5.0, 4.0];

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = DioramaRng::new(SEED);
    let mut counts = [0usize; 5];
    let mut starts = [0usize; 5];

    for _ in 0..TRIALS {
        let mut ctx = GenerationContext::new(&mut rng);
        let plan = RiverPlan::draw(&mut ctx, &mut ());
        counts[plan.length - 1] += 1;
        starts[plan.start] += 1;
    }

    let total: f64 = WEIGHTS.iter().sum();
    for (i, count) in counts.iter().enumerate() {
        let observed = *count as f64 / TRIALS as f64;
        let expected = WEIGHTS[i] / total;
        info!(
            "length {}: {:>5} ({:.4}, expected {:.4}, diff {:+.4})",
            i + 1,
            count,
            observed,
            expected,
            observed - expected
        );
    }
    info!("start offsets: {:?}", starts);
    Ok(())
}
