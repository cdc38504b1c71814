use diorama_gen::prelude::*;
use diorama_gen_examples::{demo_scene, init_tracing, render_diorama_to_png, RenderConfig};
use tracing::{debug, info, warn};

type Reporter<'a> = FnSink<Box<dyn FnMut(GenerationEvent) + 'a>>;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<i32>()?,
        None => GeneratorConfig::default().seed,
    };

    let mut generator = DioramaGenerator::new(GeneratorConfig::new(seed))?;
    let mut scene = demo_scene();
    let mut removed = 0usize;
    let mut warnings = 0usize;
    let diorama = {
        let mut sinks: MultiSink<Reporter<'_>> = MultiSink::new();
        sinks.push(FnSink::new(Box::new(|event: GenerationEvent| {
            if let GenerationEvent::LayerFinished { id, result, .. } = event {
                debug!("{id}: {} rejected", result.positions_rejected);
            }
        })));
        sinks.push(FnSink::new(Box::new(|event: GenerationEvent| match event {
            GenerationEvent::EntityRemoved { .. } => removed += 1,
            GenerationEvent::Warning { context, message } => {
                warn!("{context}: {message}");
                warnings += 1;
            }
            _ => {}
        })));
        generator.generate(&mut scene, &mut sinks)
    };

    for row in diorama.layout.tiles.chunks(3) {
        let names: Vec<String> = row
            .iter()
            .map(|t| format!("{} ({:+.0}°)", t.asset, t.rotation_y))
            .collect();
        info!("{}", names.join(" | "));
    }
    for (id, result) in &diorama.layers {
        info!(
            "{id}: {} placed from {} candidates",
            result.placements.len(),
            result.positions_evaluated
        );
    }
    info!(
        "{removed} entities culled, {warnings} warnings, {} entities left in the scene",
        scene.generated_count()
    );

    let config = RenderConfig::forest((1024, 1024));
    render_diorama_to_png(&diorama, &config, format!("diorama-{seed}.png"))?;

    let next = generator.new_seed(&mut scene, &mut ());
    info!("Next seed would be {}", next.seed);
    Ok(())
}
