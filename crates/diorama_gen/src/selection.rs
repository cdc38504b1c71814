//! Selection utilities for choosing one entry out of a catalog.
//!
//! - [pick_weighted]: integer-weighted draw, scanning entries in table order.
//! - [pick_uniform]: uniform draw over a slice.
//!
//! Both consume exactly one draw from the stream, even for degenerate tables, so the
//! position of every later draw does not depend on table contents.
use rand::Rng;
use tracing::error;

use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::rng::RngStream;

/// One entry of a weighted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weighted<T> {
    pub weight: u32,
    pub value: T,
}

impl<T> Weighted<T> {
    pub const fn new(weight: u32, value: T) -> Self {
        Self { weight, value }
    }
}

/// Draws `roll` in `[1, total]` and returns the first entry whose weight covers it.
///
/// Returns `None` only for an empty table. A table whose weights are all zero cannot
/// cover any roll; that falls back to the first entry, logs a diagnostic and sends a
/// [`GenerationEvent::Warning`] to `sink`.
pub fn pick_weighted<'a, T>(
    table: &'a [Weighted<T>],
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Option<&'a T> {
    let total: u32 = table.iter().map(|entry| entry.weight).sum();
    let mut roll = rng.range_u32(1, total.saturating_add(1));
    let first = table.first()?;

    for entry in table {
        if roll <= entry.weight {
            return Some(&entry.value);
        }
        roll -= entry.weight;
    }

    let message = format!(
        "Weighted table of {} entries ran out of items; using the first.",
        table.len()
    );
    error!("{}", message);
    if sink.wants(GenerationEventKind::Warning) {
        sink.send(GenerationEvent::Warning {
            context: "weighted table".to_owned(),
            message,
        });
    }
    Some(&first.value)
}

/// Picks a uniformly random element of `items`.
pub fn pick_uniform<'a, T>(items: &'a [T], rng: &mut dyn Rng) -> Option<&'a T> {
    let idx = rng.range_usize(0, items.len());
    items.get(idx)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;
    use crate::rng::tests::FixedRng;

    const TABLE: [Weighted<&str>; 3] = [
        Weighted::new(1, "a"),
        Weighted::new(2, "b"),
        Weighted::new(3, "c"),
    ];

    #[test]
    fn lowest_roll_selects_first_entry() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(pick_weighted(&TABLE, &mut rng, &mut ()), Some(&"a"));
    }

    #[test]
    fn highest_roll_selects_last_entry() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(pick_weighted(&TABLE, &mut rng, &mut ()), Some(&"c"));
    }

    #[test]
    fn roll_scans_in_table_order() {
        // roll 2 of 6 lands in the second entry's band.
        let mut rng = FixedRng {
            value: (u32::MAX / 6) + 1,
        };
        assert_eq!(pick_weighted(&TABLE, &mut rng, &mut ()), Some(&"b"));
    }

    #[test]
    fn empty_table_yields_none() {
        let table: [Weighted<&str>; 0] = [];
        let mut rng = FixedRng { value: 7 };
        assert_eq!(pick_weighted(&table, &mut rng, &mut ()), None);
        assert_eq!(pick_uniform::<u8>(&[], &mut rng), None);
    }

    #[test]
    fn zero_weights_fall_back_to_first_entry() {
        let table = [Weighted::new(0, 'x'), Weighted::new(0, 'y')];
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(pick_weighted(&table, &mut rng, &mut ()), Some(&'x'));
    }

    #[test]
    fn exhausted_table_sends_a_warning() {
        let table = [Weighted::new(0, 'x'), Weighted::new(0, 'y')];
        let mut rng = FixedRng { value: 0 };
        let mut sink = VecSink::new();
        assert_eq!(pick_weighted(&table, &mut rng, &mut sink), Some(&'x'));

        let events = sink.into_inner();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GenerationEvent::Warning { context, message } => {
                assert_eq!(context, "weighted table");
                assert!(message.contains("2 entries"), "{message}");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn covered_rolls_send_nothing() {
        let mut rng = FixedRng { value: u32::MAX };
        let mut sink = VecSink::new();
        assert_eq!(pick_weighted(&TABLE, &mut rng, &mut sink), Some(&"c"));
        assert!(sink.is_empty());
    }

    #[test]
    fn weighted_frequencies_follow_weights() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0usize; 3];
        let trials = 30_000;
        for _ in 0..trials {
            match pick_weighted(&TABLE, &mut rng, &mut ()) {
                Some(&"a") => counts[0] += 1,
                Some(&"b") => counts[1] += 1,
                Some(&"c") => counts[2] += 1,
                other => panic!("unexpected pick {other:?}"),
            }
        }
        for (count, weight) in counts.iter().zip([1.0, 2.0, 3.0]) {
            let observed = *count as f64 / trials as f64;
            assert!((observed - weight / 6.0).abs() < 0.02, "observed {observed}");
        }
    }

    #[test]
    fn uniform_pick_covers_every_item() {
        let items = ["p", "q", "r", "s"];
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let pick = pick_uniform(&items, &mut rng).expect("non-empty");
            let idx = items.iter().position(|i| i == pick).expect("known item");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
