//! Layout stage: partitioning, corridors, wall geometry and distance labels.
//!
//! - [`split`]: arena-backed split tree over the structure area
//! - [`corridor`]: leaf-pair corridor routing and overlap arbitration
//! - [`shape`]: rooms and corridors with clipped walls
//! - [`distance`]: hop distances from the entrance
pub mod corridor;
pub mod distance;
pub mod shape;
pub mod split;

pub use corridor::{Corridor, CorridorId};
pub use shape::{Shape, ShapeKind};
pub use split::{AreaId, SplitArea, SplitTree};
