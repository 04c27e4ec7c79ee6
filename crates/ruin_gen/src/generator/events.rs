//! Event types and sinks for observing generation runs.
//!
//! This module defines [`GenerationEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing [`crate::generator::run_generation`]
//! or [`crate::generator::StructureGenerator::generate_with_events`].
//!
//! Recoverable placement failures are reported here as [`GenerationEvent::Warning`]
//! in addition to being logged through `tracing`.
use crate::catalog::PrefabId;
use crate::generator::entities::ElementId;
use crate::geometry::{Orientation, Rect};
use crate::layout::corridor::CorridorId;
use crate::layout::split::AreaId;

/// Why a corridor candidate was not inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorridorRejection {
    /// No pair of leaves on the two sides had facing walls overlapping by the corridor width.
    NoFacingWalls { width: i32 },
    /// An accepted corridor of the same orientation overlaps it and is at least as wide.
    Narrower { existing: CorridorId },
}

/// Describes events emitted during generation.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Parameter set name.
        params: String,
        /// Area carved by this run.
        area: Rect,
    },

    /// Emitted once splitting is done.
    TreeBuilt {
        /// Number of split iterations drawn for this run.
        iterations: u32,
        /// Number of leaves, i.e. rooms.
        leaves: usize,
    },

    /// A corridor was accepted.
    CorridorPlaced {
        id: CorridorId,
        rect: Rect,
        orientation: Orientation,
        /// The leaf pair it connects.
        rooms: [AreaId; 2],
    },

    /// A previously accepted corridor was replaced by a wider overlapping one.
    CorridorSuperseded { id: CorridorId, by: CorridorId },

    /// A sibling pair stayed unconnected, or its corridor lost arbitration.
    CorridorRejected {
        areas: [AreaId; 2],
        reason: CorridorRejection,
    },

    /// The entrance room was chosen.
    EntranceChosen { shape: usize, rect: Rect },

    /// Distance labelling finished.
    DistancesLabelled {
        /// Largest label found.
        max_distance: u32,
        /// Shapes the walk never reached.
        unreachable: usize,
    },

    /// A shape received a room type.
    RoomTypeAssigned {
        shape: usize,
        room_type: String,
    },

    /// A structural element was instantiated.
    ElementPlaced {
        element: ElementId,
        prefab: PrefabId,
        shape: usize,
    },

    /// Two elements were linked.
    ConnectionMade {
        from: ElementId,
        to: ElementId,
        /// True for wire links between named connection points.
        wire: bool,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. shape index, room type, prefab id).
        context: String,
        /// Human-readable message.
        message: String,
    },

    /// Emitted when the run finishes.
    RunFinished { summary: GenerationSummary },
}

/// Discriminant of [`GenerationEvent`], used by sinks to filter what they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    RunStarted,
    TreeBuilt,
    CorridorPlaced,
    CorridorSuperseded,
    CorridorRejected,
    EntranceChosen,
    DistancesLabelled,
    RoomTypeAssigned,
    ElementPlaced,
    ConnectionMade,
    Warning,
    RunFinished,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::RunStarted { .. } => GenerationEventKind::RunStarted,
            GenerationEvent::TreeBuilt { .. } => GenerationEventKind::TreeBuilt,
            GenerationEvent::CorridorPlaced { .. } => GenerationEventKind::CorridorPlaced,
            GenerationEvent::CorridorSuperseded { .. } => GenerationEventKind::CorridorSuperseded,
            GenerationEvent::CorridorRejected { .. } => GenerationEventKind::CorridorRejected,
            GenerationEvent::EntranceChosen { .. } => GenerationEventKind::EntranceChosen,
            GenerationEvent::DistancesLabelled { .. } => GenerationEventKind::DistancesLabelled,
            GenerationEvent::RoomTypeAssigned { .. } => GenerationEventKind::RoomTypeAssigned,
            GenerationEvent::ElementPlaced { .. } => GenerationEventKind::ElementPlaced,
            GenerationEvent::ConnectionMade { .. } => GenerationEventKind::ConnectionMade,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
            GenerationEvent::RunFinished { .. } => GenerationEventKind::RunFinished,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub rooms: usize,
    pub corridors: usize,
    pub typed_shapes: usize,
    pub elements: usize,
    pub wires: usize,
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Lets emitters skip building events nobody listens to.
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = GenerationEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
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

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
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

    /// Warning messages collected so far.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            GenerationEvent::Warning { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
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

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Logs a recoverable failure and forwards it to the sink.
pub(crate) fn emit_warning(sink: &mut dyn EventSink, context: String, message: String) {
    tracing::warn!("{context}: {message}.");
    if sink.wants(GenerationEventKind::Warning) {
        sink.send(GenerationEvent::Warning { context, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> GenerationEvent {
        GenerationEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(GenerationEvent::TreeBuilt {
            iterations: 1,
            leaves: 2,
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.warnings().count(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
        assert!(matches!(
            multi.sinks[0].as_slice()[0],
            GenerationEvent::Warning { .. }
        ));
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(GenerationEventKind::Warning));
        let empty: MultiSink<VecSink> = MultiSink::new();
        assert!(!empty.wants(GenerationEventKind::RunStarted));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }

    #[test]
    fn emit_warning_reaches_sink() {
        let mut sink = VecSink::new();
        emit_warning(&mut sink, "shape:3".into(), "no room type".into());
        assert_eq!(sink.warnings().collect::<Vec<_>>(), vec!["no room type"]);
        assert_eq!(warning("x").kind(), GenerationEventKind::Warning);
    }
}
