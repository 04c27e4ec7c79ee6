#![forbid(unsafe_code)]
//! ruin_gen: Procedural ruin structures from split trees, corridors and rule-based furnishing.
//!
//! Modules:
//! - layout: split tree, corridors, wall clipping and distance labels
//! - generator: room types, entity placement, events and the runner
//! - params: declarative generation parameters and entity rules
//! - catalog / physics: collaborators supplied by the host (prefab lookup, blocker registration)
//!
//! For examples and docs, see README and docs.rs.
pub mod catalog;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod physics;
pub mod random;

/// Convenient re-exports for common types. Import with `use ruin_gen::prelude::*;`.
pub mod prelude {
    pub use crate::catalog::{Prefab, PrefabCatalog, PrefabId, PrefabRegistry};
    pub use crate::error::{Error, Result};
    pub use crate::generator::entities::{DoorState, Element, ElementId, WireLink};
    pub use crate::generator::events::{
        EventSink, FnSink, GenerationEvent, GenerationEventKind, GenerationSummary, MultiSink,
        VecSink,
    };
    pub use crate::generator::selection::pick_weighted_random;
    pub use crate::generator::{run_generation, GenerateConfig, Structure, StructureGenerator};
    pub use crate::geometry::{Line, Orientation, Rect};
    pub use crate::layout::{Corridor, Shape, ShapeKind, SplitTree};
    pub use crate::params::{
        Alignment, ConnectionRule, ConnectionTarget, EntityRule, GenerationParams, RelativeRoom,
        RoomPlacement, RoomTypeRule, StructureRole,
    };
    pub use crate::physics::{BlockerList, PhysicsWorld};
}
