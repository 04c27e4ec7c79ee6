//! Room type assignment.
//!
//! Rules with [`RoomPlacement::First`] or [`RoomPlacement::Last`] run first, in
//! declaration order, each claiming one labelled shape of the matching kind. Every
//! shape still untyped afterwards draws from the [`RoomPlacement::Any`] rules by
//! commonness. The entrance never receives a type.
use rand::RngCore;
use tracing::debug;

use crate::generator::events::{emit_warning, EventSink, GenerationEvent, GenerationEventKind};
use crate::generator::selection::pick_weighted_random;
use crate::layout::distance::extreme_by_distance;
use crate::layout::shape::Shape;
use crate::params::{GenerationParams, RoomPlacement, RoomTypeRule};

/// Types every shape it can and returns how many received a type.
pub fn assign_room_types(
    shapes: &mut [Shape],
    entrance: usize,
    params: &GenerationParams,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> usize {
    if params.room_types.is_empty() {
        debug!("No room types configured for '{}'.", params.name);
        return 0;
    }
    let mut typed = 0;

    for (rule_index, rule) in params.room_types.iter().enumerate() {
        let furthest = match rule.placement {
            RoomPlacement::Any => continue,
            RoomPlacement::First => false,
            RoomPlacement::Last => true,
        };
        let pool: Vec<usize> = (0..shapes.len())
            .filter(|&i| {
                i != entrance
                    && shapes[i].room_type.is_none()
                    && shapes[i].distance.is_some()
                    && shapes[i].is_corridor() == rule.is_corridor
            })
            .collect();
        let Some(start) = extreme_by_distance(shapes, pool.iter().copied(), furthest) else {
            emit_warning(
                sink,
                format!("{}:{}", params.name, rule.name),
                format!("no {} left for {:?} placement", kind_name(rule), rule.placement),
            );
            continue;
        };
        let target = step_along_chain(shapes, &pool, start, rule.placement_offset);
        assign(shapes, target, rule_index, rule, sink);
        typed += 1;
    }

    let any_rules: Vec<usize> = params
        .room_types
        .iter()
        .enumerate()
        .filter(|(_, r)| r.placement == RoomPlacement::Any)
        .map(|(i, _)| i)
        .collect();

    for i in 0..shapes.len() {
        if i == entrance || shapes[i].room_type.is_some() {
            continue;
        }
        let is_corridor = shapes[i].is_corridor();
        let candidates: Vec<usize> = any_rules
            .iter()
            .copied()
            .filter(|&r| params.room_types[r].is_corridor == is_corridor)
            .collect();
        match pick_weighted_random(&candidates, |&r| params.room_types[r].commonness, rng) {
            Some(&rule_index) => {
                assign(shapes, i, rule_index, &params.room_types[rule_index], sink);
                typed += 1;
            }
            None => emit_warning(
                sink,
                format!("{}:shape {i}", params.name),
                format!(
                    "no room type with commonness > 0 for a {}",
                    if is_corridor { "corridor" } else { "room" }
                ),
            ),
        }
    }
    typed
}

/// Walks `offset.abs()` hops from `start` through `pool`, away from the entrance for a
/// positive offset and toward it for a negative one. Each hop takes the unvisited
/// shape with the nearest label in that direction, breaking ties by center distance.
fn step_along_chain(shapes: &[Shape], pool: &[usize], start: usize, offset: i32) -> usize {
    let forward = offset > 0;
    let mut current = start;
    let mut visited = vec![start];
    for _ in 0..offset.unsigned_abs() {
        let Some(from) = shapes[current].distance else {
            break;
        };
        let origin = shapes[current].rect;
        let next = pool
            .iter()
            .copied()
            .filter(|i| !visited.contains(i))
            .filter_map(|i| shapes[i].distance.map(|d| (i, d)))
            .filter(|&(_, d)| if forward { d >= from } else { d <= from })
            .min_by(|&(a, da), &(b, db)| {
                da.abs_diff(from).cmp(&db.abs_diff(from)).then_with(|| {
                    shapes[a]
                        .rect
                        .distance_squared(&origin)
                        .total_cmp(&shapes[b].rect.distance_squared(&origin))
                })
            });
        match next {
            Some((i, _)) => {
                visited.push(i);
                current = i;
            }
            None => break,
        }
    }
    current
}

fn assign(
    shapes: &mut [Shape],
    shape: usize,
    rule_index: usize,
    rule: &RoomTypeRule,
    sink: &mut dyn EventSink,
) {
    shapes[shape].room_type = Some(rule_index);
    debug!("Shape {} typed as '{}'.", shape, rule.name);
    if sink.wants(GenerationEventKind::RoomTypeAssigned) {
        sink.send(GenerationEvent::RoomTypeAssigned {
            shape,
            room_type: rule.name.clone(),
        });
    }
}

fn kind_name(rule: &RoomTypeRule) -> &'static str {
    if rule.is_corridor {
        "corridor"
    } else {
        "room"
    }
}
