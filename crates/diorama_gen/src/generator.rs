//! Orchestrates a full generation run over one shared stream.
//!
//! Draw order: tile layout, mountains, highlander culling, random feature culling,
//! then the scatter layers in plan order. Changing this order changes every layout.
use tracing::info;

use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::filters::{
    cull_highlanders, cull_random_features, FilterKind, RANDOM_FEATURE_DROP_CHANCE,
};
use crate::layout::{place_tiles, plan_tiles, TileLayout};
use crate::rng::{DioramaRng, RngStream};
use crate::sampling::poisson_disk::DEFAULT_MAX_ATTEMPTS;
use crate::scatter::forest::forest_scatter_plan;
use crate::scatter::mountains::place_mountains;
use crate::scatter::plan::ScatterPlan;
use crate::scatter::runner::{run_plan, LayerResult};
use crate::scatter::PlacedObject;
use crate::scene::{EntityId, Scene};

/// Seed used when none is given.
pub const DEFAULT_SEED: i32 = 12345;
/// Lower bound of seeds drawn by [`DioramaGenerator::new_seed`].
pub const NEW_SEED_MIN: i32 = 10_000;
/// Exclusive upper bound of seeds drawn by [`DioramaGenerator::new_seed`].
pub const NEW_SEED_MAX: i32 = 100_000;

/// Configuration for a [`DioramaGenerator`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Seed the stream is reset with at the start of every run.
    pub seed: i32,
    /// Poisson-disk retry budget for the standard scatter layers.
    pub max_attempts: usize,
    /// Probability that each child of a random feature set is removed.
    pub feature_drop_chance: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            feature_drop_chance: RANDOM_FEATURE_DROP_CHANCE,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new [`GeneratorConfig`] with the given seed and default settings.
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the sampler retry budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the random feature drop chance.
    pub fn with_feature_drop_chance(mut self, feature_drop_chance: f32) -> Self {
        self.feature_drop_chance = feature_drop_chance;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }
        if !self.feature_drop_chance.is_finite() || !(0.0..=1.0).contains(&self.feature_drop_chance)
        {
            return Err(Error::InvalidConfig(
                "feature_drop_chance must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diorama {
    pub seed: i32,
    pub layout: TileLayout,
    /// Tile objects in cell order.
    pub tiles: Vec<PlacedObject>,
    pub mountains: Vec<PlacedObject>,
    /// Scatter results per layer, in run order.
    pub layers: Vec<(String, LayerResult)>,
    /// Entities removed by the post-pass filters, in removal order.
    pub removed: Vec<(EntityId, FilterKind)>,
}

impl Diorama {
    /// Result of the layer with `id`, if it ran.
    pub fn layer(&self, id: &str) -> Option<&LayerResult> {
        self.layers
            .iter()
            .find(|(layer_id, _)| layer_id == id)
            .map(|(_, result)| result)
    }

    /// All placed objects: tiles, mountains, then scatter layers in order.
    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.tiles
            .iter()
            .chain(&self.mountains)
            .chain(self.layers.iter().flat_map(|(_, r)| r.placements.iter()))
    }

    pub fn placed_count(&self) -> usize {
        self.objects().count()
    }

    pub fn positions_evaluated(&self) -> usize {
        self.layers.iter().map(|(_, r)| r.positions_evaluated).sum()
    }

    pub fn positions_rejected(&self) -> usize {
        self.layers.iter().map(|(_, r)| r.positions_rejected).sum()
    }
}

/// Seeded diorama generator.
///
/// Owns its stream; two generators never share state. Every run resets the stream
/// from the configured seed, so the same seed always yields the same diorama.
pub struct DioramaGenerator {
    config: GeneratorConfig,
    rng: DioramaRng,
    plan: ScatterPlan,
}

impl DioramaGenerator {
    /// Creates a generator with the standard forest scatter plan.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let plan = forest_scatter_plan(config.max_attempts);
        Ok(Self {
            rng: DioramaRng::new(config.seed),
            config,
            plan,
        })
    }

    /// Replaces the scatter plan.
    pub fn with_scatter_plan(mut self, plan: ScatterPlan) -> Result<Self> {
        plan.validate()?;
        self.plan = plan;
        Ok(self)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn scatter_plan(&self) -> &ScatterPlan {
        &self.plan
    }

    pub fn seed(&self) -> i32 {
        self.config.seed
    }

    pub fn set_seed(&mut self, seed: i32) {
        self.config.seed = seed;
    }

    /// Clears the scene's generated objects and builds a fresh diorama from the seed.
    pub fn generate<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        sink: &mut dyn EventSink,
    ) -> Diorama {
        let seed = self.config.seed;
        self.rng.reseed(seed);
        scene.clear_generated();
        info!("Generating diorama with seed {}.", seed);
        if sink.wants(GenerationEventKind::RunStarted) {
            sink.send(GenerationEvent::RunStarted { seed });
        }

        let mut ctx = GenerationContext::new(&mut self.rng);
        let layout = plan_tiles(&mut ctx, sink);
        let tiles = place_tiles(&layout, scene, sink);
        let mountains = place_mountains(scene, &mut self.rng, sink);

        let mut removed: Vec<(EntityId, FilterKind)> =
            cull_highlanders(scene, &mut self.rng, sink)
                .into_iter()
                .map(|id| (id, FilterKind::Highlander))
                .collect();
        removed.extend(
            cull_random_features(scene, self.config.feature_drop_chance, &mut self.rng, sink)
                .into_iter()
                .map(|id| (id, FilterKind::RandomFeature)),
        );

        let layers = run_plan(&self.plan, scene, &mut self.rng, sink);

        let diorama = Diorama {
            seed,
            layout,
            tiles,
            mountains,
            layers,
            removed,
        };
        info!(
            "Diorama {} done: {} objects placed, {} removed, {} of {} scatter candidates rejected.",
            seed,
            diorama.placed_count(),
            diorama.removed.len(),
            diorama.positions_rejected(),
            diorama.positions_evaluated()
        );
        if sink.wants(GenerationEventKind::RunFinished) {
            sink.send(GenerationEvent::RunFinished {
                seed,
                placed: diorama.placed_count(),
                removed: diorama.removed.len(),
            });
        }
        diorama
    }

    /// Rebuilds the diorama for the current seed without observing events.
    pub fn regenerate<S: Scene + ?Sized>(&mut self, scene: &mut S) -> Diorama {
        self.generate(scene, &mut ())
    }

    /// Draws a fresh seed in `[10000, 100000)` from the stream, then regenerates.
    ///
    /// The draw continues from wherever the previous run left the stream, so a
    /// sequence of new seeds is itself reproducible from the starting seed.
    pub fn new_seed<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        sink: &mut dyn EventSink,
    ) -> Diorama {
        let seed = self.rng.range_i32(NEW_SEED_MIN, NEW_SEED_MAX);
        self.set_seed(seed);
        self.generate(scene, sink)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::catalog;
    use crate::events::VecSink;
    use crate::scene::memory::{MemoryScene, Prefab, PrefabNode};
    use crate::scene::{EntityTag, SceneGraph};

    fn cabin_scene() -> MemoryScene {
        let mut scene = MemoryScene::new();
        for mountain in catalog::MOUNTAINS {
            scene.register_prefab(
                mountain,
                Prefab::new()
                    .with_node(PrefabNode::new("Summit Cabin").with_tag(EntityTag::Highlander))
                    .with_node(
                        PrefabNode::new("Scree")
                            .with_tag(EntityTag::RandomFeatureSet)
                            .with_child(PrefabNode::new("Boulder").with_offset(Vec3::X))
                            .with_child(PrefabNode::new("Boulder").with_offset(Vec3::Z)),
                    ),
            );
        }
        scene
    }

    #[test]
    fn config_validation_rejects_bad_values() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(GeneratorConfig::new(1).with_max_attempts(0).validate().is_err());
        assert!(GeneratorConfig::new(1)
            .with_feature_drop_chance(f32::NAN)
            .validate()
            .is_err());
        assert!(GeneratorConfig::new(1)
            .with_feature_drop_chance(1.5)
            .validate()
            .is_err());
        assert!(DioramaGenerator::new(GeneratorConfig::new(1).with_max_attempts(0)).is_err());
    }

    #[test]
    fn same_seed_yields_identical_dioramas() {
        let mut a = DioramaGenerator::new(GeneratorConfig::new(4242)).expect("valid config");
        let mut b = DioramaGenerator::new(GeneratorConfig::new(4242)).expect("valid config");
        let mut scene_a = cabin_scene();
        let mut scene_b = cabin_scene();

        let first = a.regenerate(&mut scene_a);
        let second = b.regenerate(&mut scene_b);
        assert_eq!(first, second);
        assert_eq!(scene_a.generated_names(), scene_b.generated_names());

        let again = a.regenerate(&mut scene_a);
        assert_eq!(first, again);
    }

    #[test]
    fn different_seeds_differ() {
        let mut generator = DioramaGenerator::new(GeneratorConfig::new(1)).expect("valid config");
        let mut scene = MemoryScene::new();
        let one = generator.regenerate(&mut scene);
        generator.set_seed(2);
        let two = generator.regenerate(&mut scene);
        assert_ne!(one.mountains, two.mountains);
    }

    #[test]
    fn regeneration_replaces_previous_output() {
        let mut generator = DioramaGenerator::new(GeneratorConfig::new(77)).expect("valid config");
        let mut scene = MemoryScene::new();
        generator.regenerate(&mut scene);
        let count = scene.generated_count();
        generator.regenerate(&mut scene);
        assert_eq!(scene.generated_count(), count);
    }

    #[test]
    fn filters_run_over_mountain_prefabs() {
        let mut generator =
            DioramaGenerator::new(GeneratorConfig::new(12345)).expect("valid config");
        let mut scene = cabin_scene();
        let diorama = generator.regenerate(&mut scene);

        let cabins = scene.find_tagged(EntityTag::Highlander);
        assert_eq!(cabins.len(), 1);
        let highlanders = diorama
            .removed
            .iter()
            .filter(|(_, f)| *f == FilterKind::Highlander)
            .count();
        assert_eq!(highlanders, 7);
        for set in scene.find_tagged(EntityTag::RandomFeatureSet) {
            assert!(scene.children(set).len() <= 2);
        }
    }

    #[test]
    fn new_seed_is_drawn_in_range_and_reproducible() {
        let mut a = DioramaGenerator::new(GeneratorConfig::new(500)).expect("valid config");
        let mut b = DioramaGenerator::new(GeneratorConfig::new(500)).expect("valid config");
        let mut scene = MemoryScene::new();

        a.regenerate(&mut scene);
        b.regenerate(&mut scene);
        let da = a.new_seed(&mut scene, &mut ());
        let db = b.new_seed(&mut scene, &mut ());

        assert!((NEW_SEED_MIN..NEW_SEED_MAX).contains(&da.seed));
        assert_eq!(da.seed, a.seed());
        assert_eq!(da, db);
    }

    #[test]
    fn events_bracket_the_run() {
        let mut generator = DioramaGenerator::new(GeneratorConfig::new(9)).expect("valid config");
        let mut scene = MemoryScene::new();
        let mut events = VecSink::only(&[
            GenerationEventKind::RunStarted,
            GenerationEventKind::TilePlaced,
            GenerationEventKind::RunFinished,
        ]);
        let diorama = generator.generate(&mut scene, &mut events);

        let events = events.into_inner();
        assert_eq!(events.len(), 11);
        assert!(matches!(events[0], GenerationEvent::RunStarted { seed: 9 }));
        match &events[10] {
            GenerationEvent::RunFinished { placed, .. } => {
                assert_eq!(*placed, diorama.placed_count());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn custom_scatter_plan_replaces_forest_layers() {
        let generator = DioramaGenerator::new(GeneratorConfig::default())
            .expect("valid config")
            .with_scatter_plan(ScatterPlan::new())
            .expect("valid plan");
        assert!(generator.scatter_plan().layers.is_empty());
    }
}
