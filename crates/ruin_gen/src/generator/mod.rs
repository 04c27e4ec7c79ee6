//! Generation pipeline: room typing, entity placement, events and the runner that
//! drives the layout stage end to end.
pub mod entities;
pub mod events;
pub mod runner;
pub mod selection;
pub mod typing;

pub use entities::{Element, ElementId, WireLink};
pub use runner::{run_generation, GenerateConfig, Structure, StructureGenerator};
