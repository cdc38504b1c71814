//! Event types and sinks for observing generation runs.
//!
//! This module defines [`GenerationEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while [`crate::generator::DioramaGenerator`] runs.
use glam::Vec3;

use crate::filters::FilterKind;
use crate::layout::{RiverPlan, TileSpec};
use crate::scatter::runner::{LayerResult, RejectReason};
use crate::scatter::PlacedObject;
use crate::scene::EntityId;

/// Describes events emitted during a generation run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted once the stream has been reset and the previous output cleared.
    RunStarted {
        /// Seed the stream was reset with.
        seed: i32,
    },

    /// Emitted when the whole run finishes.
    RunFinished {
        seed: i32,
        /// Objects placed across tiles, mountains and scatter layers.
        placed: usize,
        /// Entities removed by the post-pass filters.
        removed: usize,
    },

    /// Emitted after the river path has been drawn.
    RiverPlanned { plan: RiverPlan },

    /// Emitted for each of the nine tiles as it is handed to the sink.
    TilePlaced { cell: usize, tile: TileSpec },

    /// Emitted when a scatter layer starts processing.
    LayerStarted {
        /// Index of the layer in the plan.
        index: usize,
        /// The layer id.
        id: String,
    },

    /// Emitted when a scatter layer finishes processing.
    LayerFinished {
        index: usize,
        id: String,
        /// Summary of what was evaluated and placed in this layer.
        result: LayerResult,
    },

    /// Emitted when a candidate point fails an occlusion test.
    PointRejected {
        layer_id: String,
        /// Candidate position in world space.
        position: Vec3,
        reason: RejectReason,
    },

    /// Emitted when an object is handed to the placement sink.
    ObjectPlaced {
        /// Id of the layer that produced the object.
        layer_id: String,
        object: PlacedObject,
    },

    /// Emitted when a post-pass filter removes an entity.
    EntityRemoved { id: EntityId, filter: FilterKind },

    /// Non-fatal warning generated during a run.
    Warning {
        /// Context string (e.g. layer id, cell index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`GenerationEvent`], used by sinks to opt out of noisy events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    RunStarted,
    RunFinished,
    RiverPlanned,
    TilePlaced,
    LayerStarted,
    LayerFinished,
    PointRejected,
    ObjectPlaced,
    EntityRemoved,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::RunStarted { .. } => GenerationEventKind::RunStarted,
            GenerationEvent::RunFinished { .. } => GenerationEventKind::RunFinished,
            GenerationEvent::RiverPlanned { .. } => GenerationEventKind::RiverPlanned,
            GenerationEvent::TilePlaced { .. } => GenerationEventKind::TilePlaced,
            GenerationEvent::LayerStarted { .. } => GenerationEventKind::LayerStarted,
            GenerationEvent::LayerFinished { .. } => GenerationEventKind::LayerFinished,
            GenerationEvent::PointRejected { .. } => GenerationEventKind::PointRejected,
            GenerationEvent::ObjectPlaced { .. } => GenerationEventKind::ObjectPlaced,
            GenerationEvent::EntityRemoved { .. } => GenerationEventKind::EntityRemoved,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&mut self, _kind: GenerationEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&mut self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
    only: Option<Vec<GenerationEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    /// Collects only the listed kinds.
    pub fn only(kinds: &[GenerationEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&mut self, kind: GenerationEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GenerationEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&mut self, kind: GenerationEventKind) -> bool {
        self.sinks.iter_mut().any(|s| s.wants(kind))
    }
}
