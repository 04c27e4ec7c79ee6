//! Declarative generation parameters: partitioning bounds, room and corridor sizes, and the
//! weighted pool of room types with their entity placement rules.
//!
//! Parameters are plain data. Build them in code with the `with_*` helpers, or enable the
//! `serde` feature and deserialize them from any serde format. Call
//! [`GenerationParams::validate`] before use; [`crate::generator::StructureGenerator`]
//! does this for you.
use glam::IVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::random::range_i32;

pub mod entity;

pub use entity::{
    Alignment, ConnectionRule, ConnectionTarget, EntityRule, RelativeRoom, StructureRole,
};

/// How a room type chooses the shape it is applied to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoomPlacement {
    /// Drawn at random, weighted by commonness, for every shape left untyped.
    #[default]
    Any,
    /// Applied to the unassigned shape closest to the entrance.
    First,
    /// Applied to the unassigned shape furthest from the entrance.
    Last,
}

/// A named bundle of entity rules applied to one room or corridor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct RoomTypeRule {
    pub name: String,
    pub commonness: f32,
    pub placement: RoomPlacement,
    /// Hops to walk from the First/Last pick; the sign is the direction
    /// (positive moves away from the entrance).
    pub placement_offset: i32,
    pub is_corridor: bool,
    pub entities: Vec<EntityRule>,
}

impl Default for RoomTypeRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            commonness: 1.0,
            placement: RoomPlacement::Any,
            placement_offset: 0,
            is_corridor: false,
            entities: Vec::new(),
        }
    }
}

impl RoomTypeRule {
    pub fn room(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn corridor(name: impl Into<String>) -> Self {
        Self {
            is_corridor: true,
            ..Self::room(name)
        }
    }

    pub fn with_commonness(mut self, commonness: f32) -> Self {
        self.commonness = commonness;
        self
    }

    pub fn with_placement(mut self, placement: RoomPlacement, offset: i32) -> Self {
        self.placement = placement;
        self.placement_offset = offset;
        self
    }

    pub fn with_entity(mut self, entity: EntityRule) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_entities(mut self, entities: impl IntoIterator<Item = EntityRule>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Top-level rules with the given role.
    pub fn entities_with_role(&self, role: StructureRole) -> impl Iterator<Item = &EntityRule> {
        self.entities.iter().filter(move |e| e.role == role)
    }
}

/// Settings consumed by a single split of a [`crate::layout::split::SplitArea`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitSettings {
    pub min_division_ratio: f32,
    pub vertical_split_probability: f32,
    pub min_width: i32,
    pub min_height: i32,
}

/// Full parameter set for one structure.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct GenerationParams {
    pub name: String,
    /// Smallest structure size, per axis.
    pub size_min: IVec2,
    /// Largest structure size, per axis.
    pub size_max: IVec2,
    pub split_iterations_min: u32,
    pub split_iterations_max: u32,
    /// Each child of a split receives at least this share of the parent, in (0, 0.5].
    pub min_division_ratio: f32,
    /// Base chance of stacking the children vertically; scaled by height / width.
    pub vertical_split_probability: f32,
    pub min_split_width: i32,
    pub min_split_height: i32,
    /// Per-axis scale applied to leaves once splitting is done, in (0, 1].
    pub room_scale_min: f32,
    pub room_scale_max: f32,
    pub corridor_width_min: i32,
    pub corridor_width_max: i32,
    /// Chance that a placed door or hatch starts open.
    pub door_open_probability: f32,
    pub room_types: Vec<RoomTypeRule>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            name: "default".into(),
            size_min: IVec2::new(4000, 3000),
            size_max: IVec2::new(6000, 4500),
            split_iterations_min: 3,
            split_iterations_max: 4,
            min_division_ratio: 0.35,
            vertical_split_probability: 0.5,
            min_split_width: 800,
            min_split_height: 700,
            room_scale_min: 0.6,
            room_scale_max: 0.8,
            corridor_width_min: 200,
            corridor_width_max: 300,
            door_open_probability: 0.5,
            room_types: Vec::new(),
        }
    }
}

impl GenerationParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_size_range(mut self, min: IVec2, max: IVec2) -> Self {
        self.size_min = min;
        self.size_max = max;
        self
    }

    pub fn with_split_iterations(mut self, min: u32, max: u32) -> Self {
        self.split_iterations_min = min;
        self.split_iterations_max = max;
        self
    }

    pub fn with_min_division_ratio(mut self, ratio: f32) -> Self {
        self.min_division_ratio = ratio;
        self
    }

    pub fn with_vertical_split_probability(mut self, probability: f32) -> Self {
        self.vertical_split_probability = probability;
        self
    }

    pub fn with_min_split_size(mut self, width: i32, height: i32) -> Self {
        self.min_split_width = width;
        self.min_split_height = height;
        self
    }

    pub fn with_room_scale(mut self, min: f32, max: f32) -> Self {
        self.room_scale_min = min;
        self.room_scale_max = max;
        self
    }

    pub fn with_corridor_width(mut self, min: i32, max: i32) -> Self {
        self.corridor_width_min = min;
        self.corridor_width_max = max;
        self
    }

    pub fn with_door_open_probability(mut self, probability: f32) -> Self {
        self.door_open_probability = probability;
        self
    }

    pub fn with_room_type(mut self, room_type: RoomTypeRule) -> Self {
        self.room_types.push(room_type);
        self
    }

    pub fn split_settings(&self) -> SplitSettings {
        SplitSettings {
            min_division_ratio: self.min_division_ratio,
            vertical_split_probability: self.vertical_split_probability,
            min_width: self.min_split_width,
            min_height: self.min_split_height,
        }
    }

    /// Draws a structure size from `size_min..=size_max`, x before y.
    pub fn random_size(&self, rng: &mut dyn RngCore) -> IVec2 {
        IVec2::new(
            range_i32(rng, self.size_min.x, self.size_max.x),
            range_i32(rng, self.size_min.y, self.size_max.y),
        )
    }

    /// Validates the parameters, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(format!("{}: {msg}", self.name)));

        if self.size_min.x <= 0 || self.size_min.y <= 0 {
            return invalid("size_min must be > 0 in both components".into());
        }
        if self.size_max.x < self.size_min.x || self.size_max.y < self.size_min.y {
            return invalid("size_max must be >= size_min".into());
        }
        if self.split_iterations_max < self.split_iterations_min {
            return invalid("split_iterations_max must be >= split_iterations_min".into());
        }
        if !(self.min_division_ratio > 0.0 && self.min_division_ratio <= 0.5) {
            return invalid("min_division_ratio must be in (0, 0.5]".into());
        }
        if !(0.0..=1.0).contains(&self.vertical_split_probability) {
            return invalid("vertical_split_probability must be in [0, 1]".into());
        }
        if self.min_split_width < 0 || self.min_split_height < 0 {
            return invalid("min split sizes must be >= 0".into());
        }
        if !(self.room_scale_min > 0.0
            && self.room_scale_min <= self.room_scale_max
            && self.room_scale_max <= 1.0)
        {
            return invalid("room scale must satisfy 0 < min <= max <= 1".into());
        }
        if self.corridor_width_min <= 0 || self.corridor_width_max < self.corridor_width_min {
            return invalid("corridor width must satisfy 0 < min <= max".into());
        }
        if !(0.0..=1.0).contains(&self.door_open_probability) {
            return invalid("door_open_probability must be in [0, 1]".into());
        }
        for room_type in &self.room_types {
            if !room_type.commonness.is_finite() || room_type.commonness < 0.0 {
                return invalid(format!(
                    "room type '{}' commonness must be finite and >= 0",
                    room_type.name
                ));
            }
            let context = format!("{}:{}", self.name, room_type.name);
            for entity in &room_type.entities {
                entity.validate(&context)?;
            }
        }
        Ok(())
    }
}
