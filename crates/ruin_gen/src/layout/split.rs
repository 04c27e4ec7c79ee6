//! Binary space partitioning of the structure area.
//!
//! Areas live in an arena and refer to each other by [`AreaId`]. The tree is grown
//! breadth-wise: each iteration splits every current leaf once. After splitting, leaves
//! are shrunk toward their centers to open gaps for corridors, then corridors are
//! generated top-down between sibling subtrees.
use rand::RngCore;
use tracing::debug;

use crate::error::Result;
use crate::generator::events::{
    emit_warning, CorridorRejection, EventSink, GenerationEvent, GenerationEventKind,
};
use crate::geometry::Rect;
use crate::layout::corridor::{self, ConnectOutcome, Corridor, CorridorId};
use crate::params::SplitSettings;
use crate::random::{rand01, range_f32, range_i32};

pub type AreaId = usize;

/// One node of the partition tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitArea {
    pub rect: Rect,
    pub parent: Option<AreaId>,
    /// Either no children or exactly two that tile `rect`.
    pub children: Option<[AreaId; 2]>,
    /// The other child of the same split.
    pub sibling: Option<AreaId>,
    /// Corridor connecting this area to its sibling, if one was accepted.
    pub corridor: Option<CorridorId>,
    corridor_attempted: bool,
}

impl SplitArea {
    fn new(rect: Rect, parent: Option<AreaId>) -> Self {
        Self {
            rect,
            parent,
            children: None,
            sibling: None,
            corridor: None,
            corridor_attempted: false,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-backed partition tree.
#[derive(Clone, Debug)]
pub struct SplitTree {
    areas: Vec<SplitArea>,
    next_corridor_id: CorridorId,
}

impl SplitTree {
    pub const ROOT: AreaId = 0;

    pub fn new(root: Rect) -> Self {
        Self {
            areas: vec![SplitArea::new(root, None)],
            next_corridor_id: 0,
        }
    }

    pub fn root(&self) -> &SplitArea {
        &self.areas[Self::ROOT]
    }

    pub fn get(&self, id: AreaId) -> &SplitArea {
        &self.areas[id]
    }

    pub fn areas(&self) -> &[SplitArea] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Splits a leaf in two. Returns the new children, or `None` when `id` already has
    /// children or is too thin to cut along either axis.
    pub fn split(
        &mut self,
        id: AreaId,
        settings: &SplitSettings,
        rng: &mut dyn RngCore,
    ) -> Option<[AreaId; 2]> {
        if !self.areas[id].is_leaf() {
            return None;
        }
        let rect = self.areas[id].rect;
        if rect.width < 2 && rect.height < 2 {
            return None;
        }

        let aspect = rect.height as f32 / rect.width.max(1) as f32;
        let vertical_probability = (settings.vertical_split_probability * aspect).clamp(0.0, 1.0);
        let mut vertical = rand01(rng) < vertical_probability;
        let min_ratio = settings.min_division_ratio.clamp(0.0, 0.5);
        let mut ratio = range_f32(rng, min_ratio, 1.0 - min_ratio);

        let fits = |vertical: bool, ratio: f32| {
            let (dim, min_side) = if vertical {
                (rect.height, settings.min_height)
            } else {
                (rect.width, settings.min_width)
            };
            let (a, b) = cut(dim, ratio);
            a >= min_side.max(1) && b >= min_side.max(1)
        };

        if !fits(vertical, ratio) {
            if fits(!vertical, ratio) {
                vertical = !vertical;
            } else {
                ratio = 0.5;
            }
        }
        // Never produce an empty child.
        let dim = if vertical { rect.height } else { rect.width };
        if dim < 2 {
            vertical = !vertical;
        }

        let (first, second) = if vertical {
            let (a, _) = cut(rect.height, ratio);
            (
                Rect::new(rect.x, rect.y, rect.width, a),
                Rect::new(rect.x, rect.y + a, rect.width, rect.height - a),
            )
        } else {
            let (a, _) = cut(rect.width, ratio);
            (
                Rect::new(rect.x, rect.y, a, rect.height),
                Rect::new(rect.x + a, rect.y, rect.width - a, rect.height),
            )
        };

        let a = self.areas.len();
        let b = a + 1;
        let mut first_area = SplitArea::new(first, Some(id));
        first_area.sibling = Some(b);
        let mut second_area = SplitArea::new(second, Some(id));
        second_area.sibling = Some(a);
        self.areas.push(first_area);
        self.areas.push(second_area);
        self.areas[id].children = Some([a, b]);
        Some([a, b])
    }

    /// Runs `iterations` rounds, each splitting every leaf present at the start of the round.
    pub fn split_iterations(
        &mut self,
        iterations: u32,
        settings: &SplitSettings,
        rng: &mut dyn RngCore,
    ) {
        for iteration in 0..iterations {
            let leaves = self.leaves();
            for leaf in &leaves {
                self.split(*leaf, settings, rng);
            }
            debug!(
                "Split iteration {}: {} -> {} leaves.",
                iteration,
                leaves.len(),
                self.leaves().len()
            );
        }
    }

    /// Every leaf of the tree, first child before second.
    pub fn leaves(&self) -> Vec<AreaId> {
        self.leaves_of(Self::ROOT)
    }

    /// Every leaf under `id` (or `id` itself when it is a leaf), first child before second.
    pub fn leaves_of(&self, id: AreaId) -> Vec<AreaId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.areas[current].children {
                Some([a, b]) => {
                    stack.push(b);
                    stack.push(a);
                }
                None => out.push(current),
            }
        }
        out
    }

    /// Shrinks every leaf about its center by a factor drawn per axis from `[min, max]`.
    pub fn scale_leaves(&mut self, min: f32, max: f32, rng: &mut dyn RngCore) {
        for leaf in self.leaves() {
            let fx = range_f32(rng, min, max);
            let fy = range_f32(rng, min, max);
            let rect = &mut self.areas[leaf].rect;
            *rect = scaled(rect, fx, fy);
        }
    }

    /// Attempts one corridor per sibling pair, parents before children.
    ///
    /// Accepted corridors are appended to `corridors`; corridors superseded by a wider
    /// overlapping one are removed from it. Only a malformed adjacency is an error.
    pub fn generate_corridors(
        &mut self,
        width_min: i32,
        width_max: i32,
        rng: &mut dyn RngCore,
        corridors: &mut Vec<Corridor>,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        self.generate_corridors_from(Self::ROOT, width_min, width_max, rng, corridors, sink)
    }

    fn generate_corridors_from(
        &mut self,
        id: AreaId,
        width_min: i32,
        width_max: i32,
        rng: &mut dyn RngCore,
        corridors: &mut Vec<Corridor>,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        if let Some(sibling) = self.areas[id].sibling {
            if !self.areas[id].corridor_attempted {
                self.areas[id].corridor_attempted = true;
                self.areas[sibling].corridor_attempted = true;
                let width = range_i32(rng, width_min, width_max);
                let corridor_id = self.next_corridor_id;
                let outcome =
                    corridor::connect(self, id, sibling, width, corridor_id, rng, corridors)?;
                self.record_outcome(id, sibling, width, outcome, sink);
            }
        }
        if let Some([a, b]) = self.areas[id].children {
            self.generate_corridors_from(a, width_min, width_max, rng, corridors, sink)?;
            self.generate_corridors_from(b, width_min, width_max, rng, corridors, sink)?;
        }
        Ok(())
    }

    fn record_outcome(
        &mut self,
        a: AreaId,
        b: AreaId,
        width: i32,
        outcome: ConnectOutcome,
        sink: &mut dyn EventSink,
    ) {
        match outcome {
            ConnectOutcome::Placed {
                corridor,
                superseded,
            } => {
                self.next_corridor_id += 1;
                for old in &superseded {
                    for area in self.areas.iter_mut() {
                        if area.corridor == Some(old.id) {
                            area.corridor = None;
                        }
                    }
                    debug!("Corridor {} superseded by wider corridor {}.", old.id, corridor.id);
                    if sink.wants(GenerationEventKind::CorridorSuperseded) {
                        sink.send(GenerationEvent::CorridorSuperseded {
                            id: old.id,
                            by: corridor.id,
                        });
                    }
                }
                self.areas[a].corridor = Some(corridor.id);
                self.areas[b].corridor = Some(corridor.id);
                if sink.wants(GenerationEventKind::CorridorPlaced) {
                    sink.send(GenerationEvent::CorridorPlaced {
                        id: corridor.id,
                        rect: corridor.rect,
                        orientation: corridor.orientation,
                        rooms: corridor.rooms,
                    });
                }
            }
            ConnectOutcome::NoFacingWalls => {
                emit_warning(
                    sink,
                    format!("areas:{a}-{b}"),
                    format!("no facing walls overlap by corridor width {width}"),
                );
                if sink.wants(GenerationEventKind::CorridorRejected) {
                    sink.send(GenerationEvent::CorridorRejected {
                        areas: [a, b],
                        reason: CorridorRejection::NoFacingWalls { width },
                    });
                }
            }
            ConnectOutcome::Narrower { existing } => {
                debug!(
                    "Corridor between areas {} and {} dropped; corridor {} is at least as wide.",
                    a, b, existing
                );
                if sink.wants(GenerationEventKind::CorridorRejected) {
                    sink.send(GenerationEvent::CorridorRejected {
                        areas: [a, b],
                        reason: CorridorRejection::Narrower { existing },
                    });
                }
            }
        }
    }
}

/// Splits `dim` at `ratio`, returning both side lengths.
fn cut(dim: i32, ratio: f32) -> (i32, i32) {
    let a = (dim as f32 * ratio).round() as i32;
    let a = a.clamp(0, dim);
    (a, dim - a)
}

fn scaled(rect: &Rect, fx: f32, fy: f32) -> Rect {
    let width = ((rect.width as f32 * fx).round() as i32).clamp(1, rect.width.max(1));
    let height = ((rect.height as f32 * fy).round() as i32).clamp(1, rect.height.max(1));
    Rect::new(
        rect.x + (rect.width - width) / 2,
        rect.y + (rect.height - height) / 2,
        width,
        height,
    )
}
