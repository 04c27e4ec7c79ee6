//! Rooms and corridors as rectangles with wall geometry.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Line, Orientation, Rect};
use crate::layout::corridor::{Corridor, CorridorId};
use crate::layout::split::AreaId;

/// What a [`Shape`] was built from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Room {
        area: AreaId,
    },
    Corridor {
        id: CorridorId,
        orientation: Orientation,
        rooms: [AreaId; 2],
    },
}

/// A room or corridor of the finished layout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub rect: Rect,
    pub walls: Vec<Line>,
    pub kind: ShapeKind,
    /// Hops from the entrance; `None` when the labelling walk never reached it.
    pub distance: Option<u32>,
    /// Index into [`crate::params::GenerationParams::room_types`].
    pub room_type: Option<usize>,
}

impl Shape {
    pub fn room(area: AreaId, rect: Rect) -> Self {
        Self::with_kind(rect, ShapeKind::Room { area })
    }

    pub fn corridor(corridor: &Corridor) -> Self {
        Self::with_kind(
            corridor.rect,
            ShapeKind::Corridor {
                id: corridor.id,
                orientation: corridor.orientation,
                rooms: corridor.rooms,
            },
        )
    }

    fn with_kind(rect: Rect, kind: ShapeKind) -> Self {
        Self {
            rect,
            walls: Line::rect_outline(&rect).to_vec(),
            kind,
            distance: None,
            room_type: None,
        }
    }

    #[inline]
    pub fn is_corridor(&self) -> bool {
        matches!(self.kind, ShapeKind::Corridor { .. })
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self.kind {
            ShapeKind::Corridor { orientation, .. } => Some(orientation),
            ShapeKind::Room { .. } => None,
        }
    }

    /// Distance label, with unreached shapes reported as 0.
    pub fn distance_from_entrance(&self) -> u32 {
        self.distance.unwrap_or(0)
    }

    /// Cuts every wall segment against `rect`, keeping what lies outside it.
    pub fn split_walls(&mut self, rect: &Rect) {
        let walls = std::mem::take(&mut self.walls);
        self.walls = walls.iter().flat_map(|w| w.clip(rect)).collect();
    }

    /// Mirrors the shape across the vertical center line of `bounds`.
    pub fn mirror_within(&mut self, bounds: &Rect) {
        self.rect = self.rect.mirrored_within(bounds);
        for wall in &mut self.walls {
            *wall = wall.mirrored_within(bounds);
        }
    }
}

/// Opens every room onto the corridors touching it, and every corridor onto the
/// rooms and corridors it meets.
pub fn clip_all_walls(shapes: &mut [Shape]) {
    let corridor_rects: Vec<(usize, Rect)> = shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_corridor())
        .map(|(i, s)| (i, s.rect))
        .collect();
    let all_rects: Vec<Rect> = shapes.iter().map(|s| s.rect).collect();

    for (i, shape) in shapes.iter_mut().enumerate() {
        if shape.is_corridor() {
            for (j, rect) in all_rects.iter().enumerate() {
                if j != i {
                    shape.split_walls(rect);
                }
            }
        } else {
            for (_, rect) in &corridor_rects {
                shape.split_walls(rect);
            }
        }
    }
}
