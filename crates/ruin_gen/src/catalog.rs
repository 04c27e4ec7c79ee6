//! Prefab catalog: the structural pieces entity rules refer to by identifier.
//!
//! The generator only needs a prefab's footprint and its named connection points.
//! Implement [`PrefabCatalog`] over your own asset store, or fill a [`PrefabRegistry`].
use std::collections::HashMap;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type PrefabId = String;

/// A placeable structural element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Prefab {
    pub id: PrefabId,
    /// Declared footprint in world units. For wall fillers `x` is the thickness of
    /// a vertical filler and `y` the thickness of a horizontal one.
    pub size: Vec2,
    /// Named points wire connections can attach to.
    pub connection_points: Vec<String>,
}

impl Prefab {
    pub fn new(id: impl Into<PrefabId>, size: Vec2) -> Self {
        Self {
            id: id.into(),
            size,
            connection_points: Vec::new(),
        }
    }

    pub fn with_connection_point(mut self, name: impl Into<String>) -> Self {
        self.connection_points.push(name.into());
        self
    }

    pub fn has_connection_point(&self, name: &str) -> bool {
        self.connection_points.iter().any(|p| p == name)
    }
}

/// Lookup of prefabs by identifier.
pub trait PrefabCatalog {
    fn get(&self, id: &str) -> Option<&Prefab>;
}

/// [`PrefabCatalog`] backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct PrefabRegistry {
    prefabs: HashMap<PrefabId, Prefab>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self {
            prefabs: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Registers a prefab, replacing any previous one with the same identifier.
    pub fn register(&mut self, prefab: Prefab) {
        self.prefabs.insert(prefab.id.clone(), prefab);
    }

    pub fn with_prefab(mut self, prefab: Prefab) -> Self {
        self.register(prefab);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.prefabs.contains_key(id)
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.prefabs.remove(id).is_some()
    }
}

impl PrefabCatalog for PrefabRegistry {
    fn get(&self, id: &str) -> Option<&Prefab> {
        self.prefabs.get(id)
    }
}

impl FromIterator<Prefab> for PrefabRegistry {
    fn from_iter<I: IntoIterator<Item = Prefab>>(iter: I) -> Self {
        let mut registry = PrefabRegistry::new();
        for prefab in iter {
            registry.register(prefab);
        }
        registry
    }
}
