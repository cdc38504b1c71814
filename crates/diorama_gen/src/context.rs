//! Per-run state threaded through the planners.
use rand::Rng;

/// Step added to the ground chance after every feature tile.
pub const GROUND_CHANCE_STEP: f32 = 0.33;

/// State scoped to a single generation run.
///
/// Created fresh for every run, so nothing here leaks into the next generation.
pub struct GenerationContext<'r> {
    /// Shared stream. Every planner draws from it in a fixed order.
    pub rng: &'r mut dyn Rng,
    /// Set once a bridge tile has been chosen.
    pub has_placed_bridge: bool,
    /// Probability that the next feature-eligible cell stays plain ground.
    pub ground_chance: f32,
}

impl<'r> GenerationContext<'r> {
    pub fn new(rng: &'r mut dyn Rng) -> Self {
        Self {
            rng,
            has_placed_bridge: false,
            ground_chance: 0.0,
        }
    }

    /// Records a feature tile and raises the chance of the next cell staying ground.
    pub fn escalate_ground_chance(&mut self) {
        self.ground_chance += GROUND_CHANCE_STEP;
    }
}
