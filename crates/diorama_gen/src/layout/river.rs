//! River path synthesis and per-cell river tile resolution.
//!
//! The river runs through a contiguous slice of [`RIVER_CELLS`]. Which asset a cell gets
//! and how it is rotated depends on the cell and on its role in the run, looked up in a
//! static rule table instead of nested branching.
use tracing::{debug, error};

use crate::catalog;
use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::layout::TileSpec;
use crate::rng::RngStream;
use crate::selection::{pick_weighted, Weighted};

/// Cells that can carry a river, in flow order (left edge, bottom row, right edge).
pub const RIVER_CELLS: [usize; 5] = [3, 6, 7, 8, 5];

/// River length distribution.
pub const RIVER_LENGTH_WEIGHTS: [Weighted<usize>; 5] = [
    Weighted::new(3, 1),
    Weighted::new(2, 2),
    Weighted::new(3, 3),
    Weighted::new(5, 4),
    Weighted::new(4, 5),
];

const SPRING_CHANCE: f32 = 0.4;
const SPRING_AT_START_CHANCE: f32 = 0.5;
const BEND_BANK_CHANCE: f32 = 0.4;
const BRIDGE_CHANCE: f32 = 0.4;
const STRAIGHT_BRIDGE_CHANCE: f32 = 0.3;
const RIVER_BANKS_CHANCE: f32 = 0.4;
const STRAIGHT_OVER_BEND_CHANCE: f32 = 0.5;

/// Where the river runs for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiverPlan {
    /// Grid cells covered by the river, in flow order.
    pub cells: Vec<usize>,
    /// Offset of the first cell within [`RIVER_CELLS`].
    pub start: usize,
    /// Number of river cells, in `1..=5`.
    pub length: usize,
    /// Whether one endpoint is a spring.
    pub has_spring: bool,
    /// Spring sits on the first cell rather than the last.
    pub spring_at_start: bool,
}

impl RiverPlan {
    /// Draws length, start offset, and spring placement, in that order.
    pub fn draw(ctx: &mut GenerationContext<'_>, sink: &mut dyn EventSink) -> Self {
        let length = pick_weighted(&RIVER_LENGTH_WEIGHTS, ctx.rng, sink)
            .copied()
            .unwrap_or(1);
        let start = ctx.rng.range_usize(0, RIVER_CELLS.len() - length + 1);
        let has_spring = length == 1 || ctx.rng.chance(SPRING_CHANCE);
        let spring_at_start = has_spring && ctx.rng.chance(SPRING_AT_START_CHANCE);

        Self::new(start, length, has_spring, spring_at_start)
    }

    pub fn new(start: usize, length: usize, has_spring: bool, spring_at_start: bool) -> Self {
        debug_assert!((1..=RIVER_CELLS.len()).contains(&length));
        debug_assert!(start + length <= RIVER_CELLS.len());
        Self {
            cells: RIVER_CELLS[start..start + length].to_vec(),
            start,
            length,
            has_spring,
            spring_at_start,
        }
    }

    pub fn first_cell(&self) -> Option<usize> {
        self.cells.first().copied()
    }

    pub fn last_cell(&self) -> Option<usize> {
        self.cells.last().copied()
    }

    /// Whether `cell` is the spring end of this river.
    pub fn is_spring(&self, cell: usize) -> bool {
        let is_start = self.first_cell() == Some(cell);
        let is_end = self.last_cell() == Some(cell);
        self.has_spring
            && ((is_start && self.spring_at_start) || (is_end && !self.spring_at_start))
    }
}

/// Position of a cell within the river run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiverRole {
    Start,
    End,
    Middle,
}

/// Spring rotation for a single-cell river and for a longer one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringRotation {
    pub single: f32,
    pub multi: f32,
}

/// How a non-spring river cell picks its asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileRule {
    Bend(f32),
    Straight(f32),
    /// Even odds between a straight segment and a bend.
    StraightOrBend { straight: f32, bend: f32 },
}

/// Asset rule for one role of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleRule {
    /// Spring orientation when this cell holds the spring.
    pub spring: Option<SpringRotation>,
    pub flow: TileRule,
}

/// Rules for a single river-capable cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRules {
    pub cell: usize,
    /// For a single-cell run, resolve it as the end rather than the start.
    pub end_before_start: bool,
    pub start: RoleRule,
    pub end: RoleRule,
    pub middle: RoleRule,
}

impl CellRules {
    pub fn role(&self, is_start: bool, is_end: bool) -> RiverRole {
        match (is_start, is_end) {
            (true, true) if self.end_before_start => RiverRole::End,
            (true, _) => RiverRole::Start,
            (_, true) => RiverRole::End,
            _ => RiverRole::Middle,
        }
    }

    pub fn rule(&self, role: RiverRole) -> RoleRule {
        match role {
            RiverRole::Start => self.start,
            RiverRole::End => self.end,
            RiverRole::Middle => self.middle,
        }
    }
}

const fn spring(single: f32, multi: f32) -> Option<SpringRotation> {
    Some(SpringRotation { single, multi })
}

const fn role(spring: Option<SpringRotation>, flow: TileRule) -> RoleRule {
    RoleRule { spring, flow }
}

/// Cells 3 and 5 are always run endpoints, so every role shares one rule.
const fn endpoint_cell(cell: usize, rule: RoleRule) -> CellRules {
    CellRules {
        cell,
        end_before_start: false,
        start: rule,
        end: rule,
        middle: rule,
    }
}

pub const RIVER_TILE_RULES: [CellRules; 5] = [
    endpoint_cell(3, role(spring(180.0, 90.0), TileRule::Bend(0.0))),
    endpoint_cell(5, role(spring(0.0, 90.0), TileRule::Bend(-90.0))),
    CellRules {
        cell: 6,
        end_before_start: true,
        start: role(
            spring(90.0, 0.0),
            TileRule::StraightOrBend {
                straight: 0.0,
                bend: -90.0,
            },
        ),
        end: role(spring(180.0, -90.0), TileRule::Bend(90.0)),
        middle: role(None, TileRule::Bend(180.0)),
    },
    CellRules {
        cell: 7,
        end_before_start: false,
        start: role(spring(90.0, 0.0), TileRule::Bend(-90.0)),
        end: role(spring(90.0, 180.0), TileRule::Bend(0.0)),
        middle: role(None, TileRule::Straight(0.0)),
    },
    CellRules {
        cell: 8,
        end_before_start: false,
        start: role(spring(0.0, -90.0), TileRule::Bend(180.0)),
        end: role(
            spring(90.0, 180.0),
            TileRule::StraightOrBend {
                straight: 0.0,
                bend: 0.0,
            },
        ),
        middle: role(None, TileRule::Bend(90.0)),
    },
];

/// Looks up the rule set for a river-capable cell.
pub fn cell_rules(cell: usize) -> Result<&'static CellRules> {
    RIVER_TILE_RULES
        .iter()
        .find(|rules| rules.cell == cell)
        .ok_or(Error::UnknownRiverCell { index: cell })
}

/// Chooses asset and rotation for one river cell.
///
/// A cell outside [`RIVER_CELLS`] is a planner defect; it is reported and the cell
/// becomes plain ground so the layout still completes.
pub fn resolve_river_tile(
    ctx: &mut GenerationContext<'_>,
    plan: &RiverPlan,
    cell: usize,
    sink: &mut dyn EventSink,
) -> TileSpec {
    let rules = match cell_rules(cell) {
        Ok(rules) => rules,
        Err(e) => {
            error!("Failed to generate a river tile: {}.", e);
            if sink.wants(GenerationEventKind::Warning) {
                sink.send(GenerationEvent::Warning {
                    context: format!("river cell:{cell}"),
                    message: e.to_string(),
                });
            }
            return TileSpec::ground();
        }
    };

    let is_start = plan.first_cell() == Some(cell);
    let is_end = plan.last_cell() == Some(cell);
    let role = rules.role(is_start, is_end);
    let rule = rules.rule(role);

    if plan.is_spring(cell) {
        if let Some(spring) = rule.spring {
            let rotation = if plan.length == 1 {
                spring.single
            } else {
                spring.multi
            };
            debug!("River cell {} ({:?}) is the spring.", cell, role);
            return TileSpec::new(catalog::RIVER_SPRING, rotation);
        }
    }

    let tile = match rule.flow {
        TileRule::Bend(rotation) => TileSpec::new(bent_river_tile(ctx), rotation),
        TileRule::Straight(rotation) => TileSpec::new(straight_river_tile(ctx), rotation),
        TileRule::StraightOrBend { straight, bend } => {
            if ctx.rng.chance(STRAIGHT_OVER_BEND_CHANCE) {
                TileSpec::new(straight_river_tile(ctx), straight)
            } else {
                TileSpec::new(bent_river_tile(ctx), bend)
            }
        }
    };
    debug!("River cell {} ({:?}) -> {:?}.", cell, role, tile);
    tile
}

fn bent_river_tile(ctx: &mut GenerationContext<'_>) -> &'static str {
    if ctx.rng.chance(BEND_BANK_CHANCE) {
        catalog::RIVER_BEND_BANK
    } else {
        catalog::RIVER_BEND
    }
}

fn straight_river_tile(ctx: &mut GenerationContext<'_>) -> &'static str {
    if !ctx.has_placed_bridge && ctx.rng.chance(BRIDGE_CHANCE) {
        ctx.has_placed_bridge = true;
        return if ctx.rng.chance(STRAIGHT_BRIDGE_CHANCE) {
            catalog::RIVER_BRIDGE_STRAIGHT
        } else {
            catalog::RIVER_BRIDGE_ARCH
        };
    }
    if ctx.rng.chance(RIVER_BANKS_CHANCE) {
        catalog::RIVER_BANKS
    } else {
        catalog::RIVER
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;
    use crate::rng::tests::ScriptedRng;

    fn resolve(plan: &RiverPlan, cell: usize, script: &[f32]) -> (TileSpec, bool) {
        let mut rng = ScriptedRng::new(script);
        let mut ctx = GenerationContext::new(&mut rng);
        let tile = resolve_river_tile(&mut ctx, plan, cell, &mut ());
        (tile, ctx.has_placed_bridge)
    }

    #[test]
    fn plan_cells_are_a_contiguous_run() {
        let plan = RiverPlan::new(1, 3, false, false);
        assert_eq!(plan.cells, vec![6, 7, 8]);
        assert_eq!(plan.first_cell(), Some(6));
        assert_eq!(plan.last_cell(), Some(8));
    }

    #[test]
    fn drawn_plans_stay_within_the_river_cells() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..2_000 {
            let mut ctx = GenerationContext::new(&mut rng);
            let plan = RiverPlan::draw(&mut ctx, &mut ());
            assert!((1..=5).contains(&plan.length));
            assert!(plan.start + plan.length <= RIVER_CELLS.len());
            assert_eq!(plan.cells.len(), plan.length);
            if plan.length == 1 {
                assert!(plan.has_spring);
            }
            if !plan.has_spring {
                assert!(!plan.spring_at_start);
            }
        }
    }

    #[test]
    fn river_length_distribution_matches_weights() {
        let mut rng = StdRng::seed_from_u64(12345);
        let trials = 10_000;
        let mut counts = [0usize; 5];
        for _ in 0..trials {
            let length = pick_weighted(&RIVER_LENGTH_WEIGHTS, &mut rng, &mut ())
                .copied()
                .expect("non-empty table");
            counts[length - 1] += 1;
        }
        let expected = [3.0, 2.0, 3.0, 5.0, 4.0].map(|w: f64| w / 17.0);
        for (count, p) in counts.iter().zip(expected) {
            let observed = *count as f64 / trials as f64;
            assert!(
                (observed - p).abs() < 0.02,
                "observed {observed}, expected {p}"
            );
        }
    }

    #[test]
    fn only_the_marked_end_is_a_spring() {
        let at_start = RiverPlan::new(0, 3, true, true);
        assert!(at_start.is_spring(3));
        assert!(!at_start.is_spring(6));
        assert!(!at_start.is_spring(7));

        let at_end = RiverPlan::new(0, 3, true, false);
        assert!(at_end.is_spring(7));
        assert!(!at_end.is_spring(3));

        let none = RiverPlan::new(0, 3, false, false);
        assert!(RIVER_CELLS.iter().all(|c| !none.is_spring(*c)));
    }

    #[test]
    fn single_cell_rivers_use_single_spring_rotation() {
        let cases = [(3, 180.0), (5, 0.0), (6, 180.0), (7, 90.0), (8, 0.0)];
        for (cell, rotation) in cases {
            let offset = RIVER_CELLS.iter().position(|c| *c == cell).expect("river cell");
            let plan = RiverPlan::new(offset, 1, true, false);
            let (tile, _) = resolve(&plan, cell, &[0.9]);
            assert_eq!(tile, TileSpec::new(catalog::RIVER_SPRING, rotation), "cell {cell}");
        }
    }

    #[test]
    fn multi_cell_springs_use_role_rotation() {
        // 3 -> 6 -> 7 with the spring at the end (cell 7 as End).
        let plan = RiverPlan::new(0, 3, true, false);
        let (tile, _) = resolve(&plan, 7, &[0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_SPRING, 180.0));

        // 6 -> 7 -> 8 with the spring at the start (cell 6 as Start).
        let plan = RiverPlan::new(1, 3, true, true);
        let (tile, _) = resolve(&plan, 6, &[0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_SPRING, 0.0));

        // 7 -> 8 -> 5 with the spring at the end (cell 5).
        let plan = RiverPlan::new(2, 3, true, false);
        let (tile, _) = resolve(&plan, 5, &[0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_SPRING, 90.0));
    }

    #[test]
    fn middle_cells_follow_the_table() {
        let plan = RiverPlan::new(0, 5, false, false);
        // Cell 6 middle: bend at 180, bank chance 0.4 -> 0.9 picks plain bend.
        let (tile, _) = resolve(&plan, 6, &[0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BEND, 180.0));
        // Cell 8 middle: bend at 90, 0.1 picks the bank variant.
        let (tile, _) = resolve(&plan, 8, &[0.1]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BEND_BANK, 90.0));
    }

    #[test]
    fn straight_middle_can_place_one_bridge() {
        let plan = RiverPlan::new(0, 5, false, false);
        // bridge roll 0.1 passes, straight-bridge roll 0.1 passes.
        let (tile, bridged) = resolve(&plan, 7, &[0.1, 0.1]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BRIDGE_STRAIGHT, 0.0));
        assert!(bridged);

        let (tile, bridged) = resolve(&plan, 7, &[0.1, 0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BRIDGE_ARCH, 0.0));
        assert!(bridged);

        // No bridge: banks roll 0.1, then plain river 0.9.
        let (tile, bridged) = resolve(&plan, 7, &[0.9, 0.1]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BANKS, 0.0));
        assert!(!bridged);
        let (tile, _) = resolve(&plan, 7, &[0.9, 0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER, 0.0));
    }

    #[test]
    fn second_straight_never_bridges() {
        let plan = RiverPlan::new(0, 5, false, false);
        let mut rng = ScriptedRng::new(&[0.1]);
        let mut ctx = GenerationContext::new(&mut rng);
        ctx.has_placed_bridge = true;
        let tile = resolve_river_tile(&mut ctx, &plan, 7, &mut ());
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BANKS, 0.0));
    }

    #[test]
    fn corner_endpoints_choose_between_straight_and_bend() {
        // 6 -> 7: cell 6 starts; 0.1 picks straight, then no bridge (0.9), plain river (0.9).
        let plan = RiverPlan::new(1, 2, false, false);
        let (tile, _) = resolve(&plan, 6, &[0.1, 0.9, 0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER, 0.0));
        let (tile, _) = resolve(&plan, 6, &[0.9, 0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BEND, -90.0));

        // 7 -> 8: cell 8 ends.
        let plan = RiverPlan::new(2, 2, false, false);
        let (tile, _) = resolve(&plan, 8, &[0.9, 0.9]);
        assert_eq!(tile, TileSpec::new(catalog::RIVER_BEND, 0.0));
    }

    #[test]
    fn single_cell_role_precedence_differs_per_cell() {
        let six = cell_rules(6).expect("cell 6");
        assert_eq!(six.role(true, true), RiverRole::End);
        let seven = cell_rules(7).expect("cell 7");
        assert_eq!(seven.role(true, true), RiverRole::Start);
        assert_eq!(seven.role(false, false), RiverRole::Middle);
    }

    #[test]
    fn unknown_cell_falls_back_to_ground_with_warning() {
        let plan = RiverPlan::new(0, 5, false, false);
        let mut rng = ScriptedRng::new(&[0.5]);
        let mut ctx = GenerationContext::new(&mut rng);
        let mut sink = VecSink::new();
        let tile = resolve_river_tile(&mut ctx, &plan, 4, &mut sink);
        assert_eq!(tile, TileSpec::ground());
        assert!(matches!(
            sink.as_slice(),
            [GenerationEvent::Warning { .. }]
        ));
        assert!(matches!(
            cell_rules(0),
            Err(Error::UnknownRiverCell { index: 0 })
        ));
    }
}
