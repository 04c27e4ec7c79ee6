//! High-level runner turning [`GenerationParams`] into a finished [`Structure`].
use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::PrefabCatalog;
use crate::error::{Error, Result};
use crate::generator::entities::{place_entities, Element, ElementId, WireLink};
use crate::generator::events::{
    EventSink, GenerationEvent, GenerationEventKind, GenerationSummary,
};
use crate::generator::typing::assign_room_types;
use crate::geometry::Rect;
use crate::layout::corridor::Corridor;
use crate::layout::distance::{label_distances, max_distance, nearest_room};
use crate::layout::shape::{clip_all_walls, Shape};
use crate::layout::split::SplitTree;
use crate::params::GenerationParams;
use crate::physics::PhysicsWorld;
use crate::random::range_i32;

/// Per-run settings that are not part of the reusable parameter set.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    /// Area to carve. When unset, a size is drawn from the parameters and placed at the origin.
    pub area: Option<Rect>,
    /// World point the entrance room is chosen closest to.
    pub entrance_anchor: Vec2,
    /// Mirror the finished layout left to right within its area.
    pub mirror: bool,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixed area.
    pub fn with_area(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Sets the entrance anchor in world coordinates.
    pub fn with_entrance_anchor(mut self, anchor: Vec2) -> Self {
        self.entrance_anchor = anchor;
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(area) = self.area {
            if area.is_empty() {
                return Err(Error::InvalidConfig(
                    "area must be > 0 in both components".into(),
                ));
            }
        }
        if !self.entrance_anchor.is_finite() {
            return Err(Error::InvalidConfig("entrance_anchor must be finite".into()));
        }
        Ok(())
    }
}

/// Output of one generation run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub area: Rect,
    /// Rooms first, in split-tree leaf order, then corridors.
    pub shapes: Vec<Shape>,
    /// Index of the entrance room in `shapes`.
    pub entrance: usize,
    pub elements: Vec<Element>,
    pub wires: Vec<WireLink>,
}

impl Structure {
    pub fn rooms(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| !s.is_corridor())
    }

    pub fn corridors(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_corridor())
    }

    pub fn max_distance(&self) -> u32 {
        max_distance(&self.shapes)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Elements standing in the given shape.
    pub fn elements_in(&self, shape: usize) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.shape == shape)
    }

    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            rooms: self.rooms().count(),
            corridors: self.corridors().count(),
            typed_shapes: self.shapes.iter().filter(|s| s.room_type.is_some()).count(),
            elements: self.elements.len(),
            wires: self.wires.len(),
        }
    }
}

pub struct StructureGenerator<'a> {
    /// Validated parameter set.
    pub params: GenerationParams,
    /// Prefab lookup used for footprints and connection points.
    pub catalog: &'a dyn PrefabCatalog,
}

impl<'a> StructureGenerator<'a> {
    pub fn try_new(params: GenerationParams, catalog: &'a dyn PrefabCatalog) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, catalog })
    }

    /// Generates one structure.
    pub fn generate(
        &self,
        config: &GenerateConfig,
        rng: &mut impl RngCore,
        world: &mut dyn PhysicsWorld,
    ) -> Result<Structure> {
        run_generation(&self.params, self.catalog, config, rng, world, &mut ())
    }

    pub fn generate_with_events(
        &self,
        config: &GenerateConfig,
        rng: &mut impl RngCore,
        world: &mut dyn PhysicsWorld,
        sink: &mut dyn EventSink,
    ) -> Result<Structure> {
        run_generation(&self.params, self.catalog, config, rng, world, sink)
    }
}

/// Runs the full pipeline: split, scale, corridors, walls, entrance and distances,
/// room types, then entities.
///
/// Only invalid input and a broken split tree are errors. Anything that merely could
/// not be placed is reported to `sink` and left out of the result.
pub fn run_generation(
    params: &GenerationParams,
    catalog: &dyn PrefabCatalog,
    config: &GenerateConfig,
    rng: &mut dyn RngCore,
    world: &mut dyn PhysicsWorld,
    sink: &mut dyn EventSink,
) -> Result<Structure> {
    params.validate()?;
    config.validate()?;

    let area = match config.area {
        Some(area) => area,
        None => {
            let size = params.random_size(rng);
            Rect::new(0, 0, size.x, size.y)
        }
    };
    info!("Generating structure '{}' in {:?}.", params.name, area);
    if sink.wants(GenerationEventKind::RunStarted) {
        sink.send(GenerationEvent::RunStarted {
            params: params.name.clone(),
            area,
        });
    }

    let mut tree = SplitTree::new(area);
    let iterations = range_i32(
        rng,
        params.split_iterations_min as i32,
        params.split_iterations_max as i32,
    ) as u32;
    tree.split_iterations(iterations, &params.split_settings(), rng);
    let leaves = tree.leaves();
    info!(
        "Split tree built: {} iterations, {} rooms.",
        iterations,
        leaves.len()
    );
    if sink.wants(GenerationEventKind::TreeBuilt) {
        sink.send(GenerationEvent::TreeBuilt {
            iterations,
            leaves: leaves.len(),
        });
    }

    tree.scale_leaves(params.room_scale_min, params.room_scale_max, rng);
    let mut corridors: Vec<Corridor> = Vec::new();
    tree.generate_corridors(
        params.corridor_width_min,
        params.corridor_width_max,
        rng,
        &mut corridors,
        sink,
    )?;
    info!("Placed {} corridors.", corridors.len());

    let mut shapes: Vec<Shape> = leaves
        .iter()
        .map(|&leaf| Shape::room(leaf, tree.get(leaf).rect))
        .chain(corridors.iter().map(Shape::corridor))
        .collect();
    if config.mirror {
        for shape in &mut shapes {
            shape.mirror_within(&area);
        }
    }

    let entrance = nearest_room(&shapes, config.entrance_anchor).ok_or(Error::NoRooms)?;
    if sink.wants(GenerationEventKind::EntranceChosen) {
        sink.send(GenerationEvent::EntranceChosen {
            shape: entrance,
            rect: shapes[entrance].rect,
        });
    }

    clip_all_walls(&mut shapes);
    label_distances(&mut shapes, entrance);
    let deepest = max_distance(&shapes);
    let unreachable = shapes.iter().filter(|s| s.distance.is_none()).count();
    info!(
        "Distances labelled from shape {}: max {}, {} unreachable.",
        entrance, deepest, unreachable
    );
    if sink.wants(GenerationEventKind::DistancesLabelled) {
        sink.send(GenerationEvent::DistancesLabelled {
            max_distance: deepest,
            unreachable,
        });
    }

    assign_room_types(&mut shapes, entrance, params, rng, sink);
    let (elements, wires) = place_entities(&shapes, entrance, params, catalog, rng, world, sink);

    let structure = Structure {
        area,
        shapes,
        entrance,
        elements,
        wires,
    };
    let summary = structure.summary();
    info!(
        "Structure '{}' finished: {} rooms, {} corridors, {} typed, {} elements, {} wires.",
        params.name,
        summary.rooms,
        summary.corridors,
        summary.typed_shapes,
        summary.elements,
        summary.wires
    );
    if sink.wants(GenerationEventKind::RunFinished) {
        sink.send(GenerationEvent::RunFinished { summary });
    }
    Ok(structure)
}
