//! Entity placement rules: what to instantiate inside a room, where, and how it links up.
use std::ops::BitOr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::PrefabId;
use crate::error::{Error, Result};

/// Structural role an entity rule fills inside a shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureRole {
    /// Filler stretched along one wall segment. Registers a collision blocker.
    Wall,
    /// Background filler covering the whole shape.
    Back,
    /// Opener placed across a horizontal corridor.
    Door,
    /// Opener placed across a vertical corridor.
    Hatch,
    /// Free-standing element positioned by alignment.
    Prop,
}

/// Set of sides (and the center) an entity may be aligned to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Alignment(u8);

impl Alignment {
    pub const NONE: Alignment = Alignment(0);
    pub const TOP: Alignment = Alignment(1);
    pub const BOTTOM: Alignment = Alignment(1 << 1);
    pub const LEFT: Alignment = Alignment(1 << 2);
    pub const RIGHT: Alignment = Alignment(1 << 3);
    pub const CENTER: Alignment = Alignment(1 << 4);
    pub const SIDES: Alignment = Alignment(0b1111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Alignment(bits & 0b1_1111)
    }

    pub const fn contains(self, other: Alignment) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The individual side flags set in `self`, in top, bottom, left, right order.
    pub fn sides(self) -> Vec<Alignment> {
        [Self::TOP, Self::BOTTOM, Self::LEFT, Self::RIGHT]
            .into_iter()
            .filter(|s| self.contains(*s))
            .collect()
    }
}

impl BitOr for Alignment {
    type Output = Alignment;

    fn bitor(self, rhs: Alignment) -> Alignment {
        Alignment(self.0 | rhs.0)
    }
}

/// Which shape an entity is placed in, relative to the shape that owns its rule
/// (or its parent entity's shape).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RelativeRoom {
    #[default]
    SameRoom,
    NextRoom,
    NextCorridor,
    PreviousRoom,
    PreviousCorridor,
    FirstRoom,
    FirstCorridor,
    LastRoom,
    LastCorridor,
}

impl RelativeRoom {
    /// Whether the selector targets corridors rather than rooms.
    /// `None` for [`RelativeRoom::SameRoom`].
    pub fn targets_corridor(self) -> Option<bool> {
        match self {
            RelativeRoom::SameRoom => None,
            RelativeRoom::NextCorridor
            | RelativeRoom::PreviousCorridor
            | RelativeRoom::FirstCorridor
            | RelativeRoom::LastCorridor => Some(true),
            _ => Some(false),
        }
    }
}

/// The other end of a declared connection.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// The entity this one was instantiated as a child of.
    Parent,
    /// The first other entity of the same shape instantiated from the given prefab.
    Sibling(PrefabId),
}

/// A link declared on an entity rule, resolved once every entity of the shape exists.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionRule {
    /// Undirected adjacency link.
    Plain { target: ConnectionTarget },
    /// Link between a named connection point on this entity and one on the target.
    Wire {
        target: ConnectionTarget,
        from_point: String,
        to_point: String,
    },
}

impl ConnectionRule {
    pub fn plain(target: ConnectionTarget) -> Self {
        ConnectionRule::Plain { target }
    }

    pub fn wire(
        target: ConnectionTarget,
        from_point: impl Into<String>,
        to_point: impl Into<String>,
    ) -> Self {
        ConnectionRule::Wire {
            target,
            from_point: from_point.into(),
            to_point: to_point.into(),
        }
    }

    pub fn target(&self) -> &ConnectionTarget {
        match self {
            ConnectionRule::Plain { target } | ConnectionRule::Wire { target, .. } => target,
        }
    }
}

/// Declarative instruction for instantiating one structural element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct EntityRule {
    /// Prefab identifier looked up in the catalog.
    pub prefab: PrefabId,
    pub role: StructureRole,
    /// Relative weight when several rules compete for the same slot.
    pub commonness: f32,
    /// Wall classes a wall filler may cover, or the edge a prop hugs.
    pub alignment: Alignment,
    /// Shape the entity goes into.
    pub relative_to: RelativeRoom,
    pub min_amount: u32,
    pub max_amount: u32,
    /// Stretch a prop across the free axis instead of picking a position on it.
    pub expand: bool,
    /// Rules instantiated after this one, with this entity as their parent.
    pub children: Vec<EntityRule>,
    pub connections: Vec<ConnectionRule>,
}

impl Default for EntityRule {
    fn default() -> Self {
        Self {
            prefab: PrefabId::new(),
            role: StructureRole::Prop,
            commonness: 1.0,
            alignment: Alignment::CENTER,
            relative_to: RelativeRoom::SameRoom,
            min_amount: 1,
            max_amount: 1,
            expand: false,
            children: Vec::new(),
            connections: Vec::new(),
        }
    }
}

impl EntityRule {
    /// Creates a rule for `prefab`. Wall rules default to all four sides, others to the center.
    pub fn new(prefab: impl Into<PrefabId>, role: StructureRole) -> Self {
        let alignment = match role {
            StructureRole::Wall => Alignment::SIDES,
            _ => Alignment::CENTER,
        };
        Self {
            prefab: prefab.into(),
            role,
            alignment,
            ..Default::default()
        }
    }

    pub fn wall(prefab: impl Into<PrefabId>) -> Self {
        Self::new(prefab, StructureRole::Wall)
    }

    pub fn back(prefab: impl Into<PrefabId>) -> Self {
        Self::new(prefab, StructureRole::Back)
    }

    pub fn door(prefab: impl Into<PrefabId>) -> Self {
        Self::new(prefab, StructureRole::Door)
    }

    pub fn hatch(prefab: impl Into<PrefabId>) -> Self {
        Self::new(prefab, StructureRole::Hatch)
    }

    pub fn prop(prefab: impl Into<PrefabId>) -> Self {
        Self::new(prefab, StructureRole::Prop)
    }

    pub fn with_commonness(mut self, commonness: f32) -> Self {
        self.commonness = commonness;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn relative_to(mut self, relative_to: RelativeRoom) -> Self {
        self.relative_to = relative_to;
        self
    }

    /// Instantiate between `min` and `max` copies (inclusive).
    pub fn with_amount(mut self, min: u32, max: u32) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expand = true;
        self
    }

    pub fn with_child(mut self, child: EntityRule) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionRule) -> Self {
        self.connections.push(connection);
        self
    }

    pub(crate) fn validate(&self, context: &str) -> Result<()> {
        if self.prefab.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{context}: entity rule has an empty prefab id"
            )));
        }
        if !self.commonness.is_finite() || self.commonness < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{context}: commonness of '{}' must be finite and >= 0",
                self.prefab
            )));
        }
        if self.min_amount > self.max_amount {
            return Err(Error::InvalidConfig(format!(
                "{context}: min_amount of '{}' exceeds max_amount",
                self.prefab
            )));
        }
        let child_context = format!("{context} > {}", self.prefab);
        for child in &self.children {
            child.validate(&child_context)?;
        }
        Ok(())
    }
}
