//! Hop distances from the entrance room.
//!
//! The walk goes room, corridor, room. Adjacency is tested on rects grown by
//! [`ADJACENCY_MARGIN`] so shapes that merely touch count as connected. Rooms reached
//! through the same corridor receive staggered labels: the i-th candidate (closest
//! first) is offered `room + 1 + i`. A label only ever decreases.
use std::cmp::Ordering;

use glam::Vec2;

use crate::geometry::Rect;
use crate::layout::shape::Shape;

/// Growth applied to every rect before adjacency tests.
pub const ADJACENCY_MARGIN: i32 = 2;

/// The room whose center is closest to `anchor`; the first one wins ties.
pub fn nearest_room(shapes: &[Shape], anchor: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, shape) in shapes.iter().enumerate() {
        if shape.is_corridor() {
            continue;
        }
        let d = shape.rect.center().distance_squared(anchor);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Clears every label and walks the layout from `entrance`.
pub fn label_distances(shapes: &mut [Shape], entrance: usize) {
    for shape in shapes.iter_mut() {
        shape.distance = None;
    }
    let Some(start) = shapes.get_mut(entrance) else {
        return;
    };
    start.distance = Some(0);
    let inflated: Vec<Rect> = shapes
        .iter()
        .map(|s| s.rect.inflate(ADJACENCY_MARGIN))
        .collect();
    visit_room(shapes, &inflated, entrance);
}

fn visit_room(shapes: &mut [Shape], inflated: &[Rect], room: usize) {
    let Some(current) = shapes[room].distance else {
        return;
    };
    let next = current + 1;

    for corridor in 0..shapes.len() {
        if !shapes[corridor].is_corridor() || !inflated[corridor].intersects(&inflated[room]) {
            continue;
        }
        let label = &mut shapes[corridor].distance;
        *label = Some(label.map_or(next, |d| d.min(next)));

        let origin = shapes[room].rect;
        let mut candidates: Vec<usize> = (0..shapes.len())
            .filter(|&r| {
                r != room
                    && !shapes[r].is_corridor()
                    && inflated[r].intersects(&inflated[corridor])
                    && shapes[r].distance.is_none_or(|d| d > next)
            })
            .collect();
        candidates.sort_by_key(|&r| shapes[r].rect.manhattan_distance(&origin));

        for (i, r) in candidates.into_iter().enumerate() {
            let offered = next + i as u32;
            if shapes[r].distance.is_none_or(|d| offered < d) {
                shapes[r].distance = Some(offered);
                visit_room(shapes, inflated, r);
            }
        }
    }
}

/// Largest label in the layout.
pub fn max_distance(shapes: &[Shape]) -> u32 {
    shapes
        .iter()
        .filter_map(|s| s.distance)
        .max()
        .unwrap_or(0)
}

/// The candidate with the smallest (or, with `furthest`, largest) label. Unlabelled
/// candidates are ignored; the first one wins ties.
pub fn extreme_by_distance(
    shapes: &[Shape],
    candidates: impl IntoIterator<Item = usize>,
    furthest: bool,
) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for i in candidates {
        let Some(d) = shapes[i].distance else {
            continue;
        };
        let better = match best {
            None => true,
            Some((_, best_d)) => {
                let ord = d.cmp(&best_d);
                if furthest {
                    ord == Ordering::Greater
                } else {
                    ord == Ordering::Less
                }
            }
        };
        if better {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
