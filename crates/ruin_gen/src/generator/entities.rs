//! Structural elements: wall, background and door fillers, props, and their links.
//!
//! Every typed shape is furnished in the same order: one filler per wall segment, an
//! optional background, a door or hatch for corridors, then props. Child rules are
//! placed right after their parent. Connections are resolved once the whole shape is
//! furnished, so a rule may link to an element declared after it.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Prefab, PrefabCatalog, PrefabId};
use crate::generator::events::{emit_warning, EventSink, GenerationEvent, GenerationEventKind};
use crate::generator::selection::pick_weighted_random;
use crate::geometry::{Line, Orientation, Rect};
use crate::layout::distance::extreme_by_distance;
use crate::layout::shape::Shape;
use crate::params::{
    Alignment, ConnectionRule, ConnectionTarget, EntityRule, GenerationParams, RelativeRoom,
    RoomTypeRule, StructureRole,
};
use crate::physics::PhysicsWorld;
use crate::random::{index, rand01, range_i32};

pub type ElementId = usize;

/// Gap between an edge-aligned prop and the edge of its shape.
pub const PROP_EDGE_INSET: i32 = 64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorState {
    /// Orientation of the corridor the door blocks.
    pub opener: Orientation,
    pub open: bool,
}

/// One instantiated prefab.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub prefab: PrefabId,
    pub role: StructureRole,
    /// Index of the shape it stands in.
    pub shape: usize,
    pub rect: Rect,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Undirected adjacency links.
    pub links: Vec<ElementId>,
    /// Set for doors and hatches.
    pub door: Option<DoorState>,
}

/// A typed link between two named connection points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireLink {
    pub from: ElementId,
    pub from_point: String,
    pub to: ElementId,
    pub to_point: String,
}

/// Furnishes every typed shape, returning the elements and wire links.
pub fn place_entities(
    shapes: &[Shape],
    entrance: usize,
    params: &GenerationParams,
    catalog: &dyn PrefabCatalog,
    rng: &mut dyn RngCore,
    world: &mut dyn PhysicsWorld,
    sink: &mut dyn EventSink,
) -> (Vec<Element>, Vec<WireLink>) {
    let mut placer = EntityPlacer {
        params,
        catalog,
        shapes,
        entrance,
        rng,
        world,
        sink,
        elements: Vec::new(),
        wires: Vec::new(),
    };
    for shape in 0..shapes.len() {
        placer.furnish(shape);
    }
    (placer.elements, placer.wires)
}

/// Resolves a relative room selector from shape `from`.
///
/// Next/Previous pick the nearest label strictly above/below the label of `from`;
/// First/Last pick the extremes. The entrance and unlabelled shapes are never chosen
/// by a relative selector, and the lowest index wins ties.
pub fn resolve_relative(
    shapes: &[Shape],
    entrance: usize,
    from: usize,
    selector: RelativeRoom,
) -> Option<usize> {
    let Some(want_corridor) = selector.targets_corridor() else {
        return Some(from);
    };
    let current = shapes[from].distance_from_entrance();
    let pool = (0..shapes.len()).filter(|&i| {
        i != entrance && shapes[i].distance.is_some() && shapes[i].is_corridor() == want_corridor
    });
    let label = |i: usize| shapes[i].distance_from_entrance();
    match selector {
        RelativeRoom::NextRoom | RelativeRoom::NextCorridor => {
            extreme_by_distance(shapes, pool.filter(|&i| label(i) > current), false)
        }
        RelativeRoom::PreviousRoom | RelativeRoom::PreviousCorridor => {
            extreme_by_distance(shapes, pool.filter(|&i| label(i) < current), true)
        }
        RelativeRoom::FirstRoom | RelativeRoom::FirstCorridor => {
            extreme_by_distance(shapes, pool, false)
        }
        RelativeRoom::LastRoom | RelativeRoom::LastCorridor => {
            extreme_by_distance(shapes, pool, true)
        }
        RelativeRoom::SameRoom => Some(from),
    }
}

/// Footprint of a wall filler along `wall`, or `None` when the segment is too short.
///
/// The filler is centered on the wall line. Every horizontal filler, whatever its
/// length, loses half its thickness at each end so it tucks under the vertical ones
/// at the corners. Clipped segments end at doorways as often as at corners, so the
/// trim is not limited to long walls; what is left must still be as long as the
/// filler is thick.
pub fn wall_filler_rect(wall: &Line, size: glam::Vec2) -> Option<Rect> {
    if wall.is_horizontal() {
        let thickness = (size.y.round() as i32).max(1);
        let trim = thickness / 2;
        let length = wall.length() - trim * 2;
        if length < thickness {
            return None;
        }
        Some(Rect::new(wall.a.x + trim, wall.a.y - trim, length, thickness))
    } else {
        let thickness = (size.x.round() as i32).max(1);
        let length = wall.length();
        if length <= 0 {
            return None;
        }
        Some(Rect::new(wall.a.x - thickness / 2, wall.a.y, thickness, length))
    }
}

/// Which side of `rect` the wall lies on.
fn wall_side(rect: &Rect, wall: &Line) -> Alignment {
    if wall.is_horizontal() {
        if wall.a.y * 2 >= rect.y * 2 + rect.height {
            Alignment::TOP
        } else {
            Alignment::BOTTOM
        }
    } else if wall.a.x * 2 >= rect.x * 2 + rect.width {
        Alignment::RIGHT
    } else {
        Alignment::LEFT
    }
}

/// Footprint of a prop of `size` inside `area`.
fn prop_rect(
    area: &Rect,
    size: glam::Vec2,
    alignment: Alignment,
    expand: bool,
    rng: &mut dyn RngCore,
) -> Rect {
    let w = (size.x.round() as i32).max(1);
    let h = (size.y.round() as i32).max(1);
    let sides = alignment.sides();
    let side = match sides.len() {
        0 => return Rect::from_center(area.center_i(), glam::IVec2::new(w, h)),
        1 => sides[0],
        n => sides[index(rng, n)],
    };

    let max = area.max();
    if side == Alignment::TOP || side == Alignment::BOTTOM {
        let y = if side == Alignment::TOP {
            max.y - PROP_EDGE_INSET - h
        } else {
            area.y + PROP_EDGE_INSET
        };
        let (x, width) = free_axis(area.x, area.width, w, expand, rng);
        Rect::new(x, y, width, h)
    } else {
        let x = if side == Alignment::RIGHT {
            max.x - PROP_EDGE_INSET - w
        } else {
            area.x + PROP_EDGE_INSET
        };
        let (y, height) = free_axis(area.y, area.height, h, expand, rng);
        Rect::new(x, y, w, height)
    }
}

/// Start and extent along the axis a prop is free to slide on.
fn free_axis(
    start: i32,
    span: i32,
    extent: i32,
    expand: bool,
    rng: &mut dyn RngCore,
) -> (i32, i32) {
    if expand {
        (start, span)
    } else {
        (range_i32(rng, start, start + span - extent), extent)
    }
}

struct EntityPlacer<'p, 'r> {
    params: &'p GenerationParams,
    catalog: &'p dyn PrefabCatalog,
    shapes: &'p [Shape],
    entrance: usize,
    rng: &'r mut dyn RngCore,
    world: &'r mut dyn PhysicsWorld,
    sink: &'r mut dyn EventSink,
    elements: Vec<Element>,
    wires: Vec<WireLink>,
}

type Pending<'p> = Vec<(ElementId, &'p EntityRule)>;

impl<'p> EntityPlacer<'p, '_> {
    fn furnish(&mut self, shape_index: usize) {
        let params = self.params;
        let shapes = self.shapes;
        let shape = &shapes[shape_index];
        let Some(room_type) = shape.room_type.and_then(|rt| params.room_types.get(rt)) else {
            return;
        };
        let mut pending: Pending<'p> = Vec::new();

        for wall in &shape.walls {
            let side = wall_side(&shape.rect, wall);
            let Some(rule) = self.pick_rule(room_type, StructureRole::Wall, Some(side)) else {
                continue;
            };
            let Some(prefab) = self.lookup(room_type, rule) else {
                continue;
            };
            let Some(rect) = wall_filler_rect(wall, prefab.size) else {
                debug!(
                    "Wall segment of shape {} too short for '{}'.",
                    shape_index, prefab.id
                );
                continue;
            };
            self.world.register_blocker(rect, rect.center().into());
            let id = self.instantiate(prefab, rule.role, shape_index, rect, None, None);
            pending.push((id, rule));
            self.place_children(room_type, rule, shape_index, id, &mut pending);
        }

        if let Some(rule) = self.pick_rule(room_type, StructureRole::Back, None) {
            if let Some(prefab) = self.lookup(room_type, rule) {
                let id = self.instantiate(prefab, rule.role, shape_index, shape.rect, None, None);
                pending.push((id, rule));
                self.place_children(room_type, rule, shape_index, id, &mut pending);
            }
        }

        if let Some(orientation) = shape.orientation() {
            self.place_door(room_type, shape_index, orientation, &mut pending);
        }

        for rule in room_type.entities_with_role(StructureRole::Prop) {
            self.place_rule(room_type, rule, shape_index, None, &mut pending);
        }

        self.connect(room_type, &pending);
    }

    fn place_door(
        &mut self,
        room_type: &'p RoomTypeRule,
        shape_index: usize,
        orientation: Orientation,
        pending: &mut Pending<'p>,
    ) {
        let shapes = self.shapes;
        let shape = &shapes[shape_index];
        let horizontal = orientation == Orientation::Horizontal;
        let parallel: Vec<&Line> = shape
            .walls
            .iter()
            .filter(|w| w.is_horizontal() == horizontal)
            .collect();
        if parallel.is_empty() {
            return;
        }
        let wall = parallel[index(self.rng, parallel.len())];
        let role = if horizontal {
            StructureRole::Door
        } else {
            StructureRole::Hatch
        };
        let Some(rule) = self.pick_rule(room_type, role, None) else {
            return;
        };
        let Some(prefab) = self.lookup(room_type, rule) else {
            return;
        };
        let open = rand01(self.rng) < self.params.door_open_probability;
        let mid = wall.midpoint();
        let rect = if horizontal {
            let w = (prefab.size.x.round() as i32).max(1);
            Rect::new(mid.x - w / 2, shape.rect.y, w, shape.rect.height)
        } else {
            let h = (prefab.size.y.round() as i32).max(1);
            Rect::new(shape.rect.x, mid.y - h / 2, shape.rect.width, h)
        };
        let door = DoorState {
            opener: orientation,
            open,
        };
        let id = self.instantiate(prefab, role, shape_index, rect, None, Some(door));
        pending.push((id, rule));
        self.place_children(room_type, rule, shape_index, id, pending);
    }

    /// Places `amount` copies of a rule in the shape its selector resolves to.
    fn place_rule(
        &mut self,
        room_type: &'p RoomTypeRule,
        rule: &'p EntityRule,
        origin: usize,
        parent: Option<ElementId>,
        pending: &mut Pending<'p>,
    ) {
        let Some(target) = resolve_relative(self.shapes, self.entrance, origin, rule.relative_to)
        else {
            emit_warning(
                self.sink,
                format!("{}:{}", room_type.name, rule.prefab),
                format!("no shape matches {:?} from shape {origin}", rule.relative_to),
            );
            return;
        };
        let Some(prefab) = self.lookup(room_type, rule) else {
            return;
        };
        let amount = range_i32(
            self.rng,
            rule.min_amount.min(i32::MAX as u32) as i32,
            rule.max_amount.min(i32::MAX as u32) as i32,
        );
        let area = self.shapes[target].rect;
        for _ in 0..amount {
            let rect = prop_rect(&area, prefab.size, rule.alignment, rule.expand, self.rng);
            let id = self.instantiate(prefab, rule.role, target, rect, parent, None);
            pending.push((id, rule));
            self.place_children(room_type, rule, target, id, pending);
        }
    }

    fn place_children(
        &mut self,
        room_type: &'p RoomTypeRule,
        rule: &'p EntityRule,
        shape: usize,
        parent: ElementId,
        pending: &mut Pending<'p>,
    ) {
        for child in &rule.children {
            self.place_rule(room_type, child, shape, Some(parent), pending);
        }
    }

    /// Weighted pick among the room type's rules of `role`, optionally restricted to
    /// rules aligned with `side`.
    fn pick_rule(
        &mut self,
        room_type: &'p RoomTypeRule,
        role: StructureRole,
        side: Option<Alignment>,
    ) -> Option<&'p EntityRule> {
        let candidates: Vec<&'p EntityRule> = room_type
            .entities_with_role(role)
            .filter(|r| side.is_none_or(|s| r.alignment.contains(s)))
            .collect();
        pick_weighted_random(&candidates, |r| r.commonness, self.rng).copied()
    }

    fn lookup(&mut self, room_type: &RoomTypeRule, rule: &EntityRule) -> Option<&'p Prefab> {
        let catalog = self.catalog;
        let prefab = catalog.get(&rule.prefab);
        if prefab.is_none() {
            emit_warning(
                self.sink,
                format!("{}:{}", self.params.name, room_type.name),
                format!("unknown prefab '{}'", rule.prefab),
            );
        }
        prefab
    }

    fn instantiate(
        &mut self,
        prefab: &Prefab,
        role: StructureRole,
        shape: usize,
        rect: Rect,
        parent: Option<ElementId>,
        door: Option<DoorState>,
    ) -> ElementId {
        let id = self.elements.len();
        self.elements.push(Element {
            id,
            prefab: prefab.id.clone(),
            role,
            shape,
            rect,
            parent,
            children: Vec::new(),
            links: Vec::new(),
            door,
        });
        if let Some(parent) = parent {
            self.elements[parent].children.push(id);
        }
        if self.sink.wants(GenerationEventKind::ElementPlaced) {
            self.sink.send(GenerationEvent::ElementPlaced {
                element: id,
                prefab: prefab.id.clone(),
                shape,
            });
        }
        id
    }

    fn connect(&mut self, room_type: &RoomTypeRule, pending: &Pending<'p>) {
        for &(from, rule) in pending {
            for connection in &rule.connections {
                let to = match connection.target() {
                    ConnectionTarget::Parent => self.elements[from].parent,
                    ConnectionTarget::Sibling(prefab) => pending
                        .iter()
                        .map(|(id, _)| *id)
                        .find(|&id| id != from && self.elements[id].prefab == *prefab),
                };
                let Some(to) = to else {
                    emit_warning(
                        self.sink,
                        format!("{}:{}", room_type.name, rule.prefab),
                        format!("no {:?} element to connect to", connection.target()),
                    );
                    continue;
                };
                let wire = match connection {
                    ConnectionRule::Plain { .. } => false,
                    ConnectionRule::Wire {
                        from_point,
                        to_point,
                        ..
                    } => {
                        if !self.has_point(from, from_point) || !self.has_point(to, to_point) {
                            emit_warning(
                                self.sink,
                                format!("{}:{}", room_type.name, rule.prefab),
                                format!(
                                    "wire {}.{} -> {}.{} names a missing connection point",
                                    self.elements[from].prefab,
                                    from_point,
                                    self.elements[to].prefab,
                                    to_point
                                ),
                            );
                            continue;
                        }
                        self.wires.push(WireLink {
                            from,
                            from_point: from_point.clone(),
                            to,
                            to_point: to_point.clone(),
                        });
                        true
                    }
                };
                self.link(from, to);
                if self.sink.wants(GenerationEventKind::ConnectionMade) {
                    self.sink
                        .send(GenerationEvent::ConnectionMade { from, to, wire });
                }
            }
        }
    }

    fn has_point(&self, element: ElementId, point: &str) -> bool {
        self.catalog
            .get(&self.elements[element].prefab)
            .is_some_and(|p| p.has_connection_point(point))
    }

    fn link(&mut self, a: ElementId, b: ElementId) {
        if !self.elements[a].links.contains(&b) {
            self.elements[a].links.push(b);
        }
        if !self.elements[b].links.contains(&a) {
            self.elements[b].links.push(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{IVec2, Vec2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::PrefabRegistry;
    use crate::generator::events::VecSink;
    use crate::layout::corridor::Corridor;
    use crate::physics::BlockerList;

    fn labelled(mut shape: Shape, distance: u32, room_type: Option<usize>) -> Shape {
        shape.distance = Some(distance);
        shape.room_type = room_type;
        shape
    }

    fn layout() -> Vec<Shape> {
        vec![
            labelled(Shape::room(0, Rect::new(0, 0, 1000, 1000)), 0, None),
            labelled(Shape::room(1, Rect::new(1200, 0, 1000, 1000)), 1, Some(0)),
            labelled(
                Shape::corridor(&Corridor {
                    id: 0,
                    rect: Rect::new(1000, 400, 200, 200),
                    orientation: Orientation::Horizontal,
                    rooms: [0, 1],
                }),
                1,
                Some(1),
            ),
            labelled(Shape::room(2, Rect::new(2400, 0, 1000, 1000)), 3, Some(0)),
        ]
    }

    fn catalog() -> PrefabRegistry {
        [
            Prefab::new("wall", Vec2::new(100.0, 20.0)),
            Prefab::new("back", Vec2::ONE),
            Prefab::new("door", Vec2::new(40.0, 200.0)),
            Prefab::new("hatch", Vec2::new(200.0, 40.0)),
            Prefab::new("lamp", Vec2::new(50.0, 50.0)).with_connection_point("power"),
            Prefab::new("switch", Vec2::new(20.0, 20.0)).with_connection_point("out"),
            Prefab::new("crate", Vec2::new(100.0, 100.0)),
        ]
        .into_iter()
        .collect()
    }

    fn params(room: RoomTypeRule, corridor: RoomTypeRule) -> GenerationParams {
        GenerationParams::default()
            .with_room_type(room)
            .with_room_type(corridor)
    }

    fn run(params: &GenerationParams) -> (Vec<Element>, Vec<WireLink>, BlockerList, VecSink) {
        run_on(&layout(), params, 7)
    }

    fn run_on(
        shapes: &[Shape],
        params: &GenerationParams,
        seed: u64,
    ) -> (Vec<Element>, Vec<WireLink>, BlockerList, VecSink) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut world = BlockerList::new();
        let mut sink = VecSink::new();
        let (elements, wires) = place_entities(
            shapes,
            0,
            params,
            &catalog(),
            &mut rng,
            &mut world,
            &mut sink,
        );
        (elements, wires, world, sink)
    }

    #[test]
    fn relative_selectors_follow_labels() {
        let shapes = layout();
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::SameRoom), Some(1));
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::NextRoom), Some(3));
        assert_eq!(resolve_relative(&shapes, 0, 3, RelativeRoom::PreviousRoom), Some(1));
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::PreviousRoom), None);
        assert_eq!(resolve_relative(&shapes, 0, 3, RelativeRoom::FirstRoom), Some(1));
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::LastRoom), Some(3));
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::FirstCorridor), Some(2));
        assert_eq!(resolve_relative(&shapes, 0, 1, RelativeRoom::NextCorridor), None);
    }

    #[test]
    fn horizontal_wall_filler_is_trimmed() {
        let wall = Line::new(IVec2::new(0, 100), IVec2::new(200, 100));
        let rect = wall_filler_rect(&wall, Vec2::new(100.0, 20.0)).unwrap();
        assert_eq!(rect, Rect::new(10, 90, 180, 20));
        let short = Line::new(IVec2::new(0, 0), IVec2::new(30, 0));
        assert!(wall_filler_rect(&short, Vec2::new(1.0, 20.0)).is_none());
    }

    #[test]
    fn short_horizontal_wall_is_trimmed_too() {
        let stub = Line::new(IVec2::new(0, 0), IVec2::new(40, 0));
        let rect = wall_filler_rect(&stub, Vec2::new(100.0, 20.0)).unwrap();
        assert_eq!(rect, Rect::new(10, -10, 20, 20));
        let too_short = Line::new(IVec2::new(0, 0), IVec2::new(39, 0));
        assert!(wall_filler_rect(&too_short, Vec2::new(100.0, 20.0)).is_none());
    }

    #[test]
    fn vertical_wall_filler_spans_segment() {
        let wall = Line::new(IVec2::new(50, 0), IVec2::new(50, 10));
        let rect = wall_filler_rect(&wall, Vec2::new(20.0, 100.0)).unwrap();
        assert_eq!(rect, Rect::new(40, 0, 20, 10));
    }

    #[test]
    fn edge_aligned_prop_is_inset() {
        let area = Rect::new(0, 0, 1000, 500);
        let mut rng = StdRng::seed_from_u64(3);
        let top = prop_rect(&area, Vec2::new(100.0, 50.0), Alignment::TOP, false, &mut rng);
        assert_eq!(top.y + top.height, 500 - PROP_EDGE_INSET);
        assert!(area.contains_rect(&top));
        let left = prop_rect(&area, Vec2::new(100.0, 50.0), Alignment::LEFT, true, &mut rng);
        assert_eq!(left, Rect::new(PROP_EDGE_INSET, 0, 100, 500));
        let center = prop_rect(&area, Vec2::new(100.0, 50.0), Alignment::CENTER, false, &mut rng);
        assert_eq!(center.center_i(), area.center_i());
    }

    #[test]
    fn walls_register_blockers_and_door_is_placed() {
        let p = params(
            RoomTypeRule::room("hall").with_entity(EntityRule::wall("wall")),
            RoomTypeRule::corridor("tunnel")
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::door("door")),
        );
        let (elements, _, world, _) = run(&p);
        let walls = elements.iter().filter(|e| e.role == StructureRole::Wall).count();
        assert_eq!(walls, world.len());
        // Two rooms and one corridor, four walls each.
        assert_eq!(walls, 12);
        let doors: Vec<_> = elements.iter().filter(|e| e.role == StructureRole::Door).collect();
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0].shape, 2);
        assert_eq!(doors[0].rect.height, 200);
        assert_eq!(doors[0].door.map(|d| d.opener), Some(Orientation::Horizontal));
    }

    fn door_params(open_probability: f32) -> GenerationParams {
        params(
            RoomTypeRule::room("hall"),
            RoomTypeRule::corridor("tunnel")
                .with_entity(EntityRule::door("door"))
                .with_entity(EntityRule::hatch("hatch")),
        )
        .with_door_open_probability(open_probability)
    }

    fn doors(elements: &[Element]) -> Vec<&Element> {
        elements.iter().filter(|e| e.door.is_some()).collect()
    }

    #[test]
    fn door_open_state_follows_probability() {
        for seed in 0..16 {
            let (elements, ..) = run_on(&layout(), &door_params(0.0), seed);
            let closed = doors(&elements);
            assert_eq!(closed.len(), 1);
            assert!(closed.iter().all(|e| e.door.is_some_and(|d| !d.open)));

            let (elements, ..) = run_on(&layout(), &door_params(1.0), seed);
            let open = doors(&elements);
            assert_eq!(open.len(), 1);
            assert!(open.iter().all(|e| e.door.is_some_and(|d| d.open)));
        }
    }

    #[test]
    fn door_is_centered_on_a_parallel_wall() {
        // Clipped corridor walls: the two horizontal runs have different midpoints.
        let mut shapes = layout();
        shapes[2].walls = vec![
            Line::new(IVec2::new(1000, 400), IVec2::new(1120, 400)),
            Line::new(IVec2::new(1060, 600), IVec2::new(1200, 600)),
            Line::new(IVec2::new(1000, 400), IVec2::new(1000, 600)),
        ];
        let midpoints = [1060, 1130];
        let mut seen = Vec::new();
        for seed in 0..32 {
            let (elements, ..) = run_on(&shapes, &door_params(0.5), seed);
            let door = doors(&elements)[0];
            assert_eq!(door.role, StructureRole::Door);
            let center_x = door.rect.x + door.rect.width / 2;
            assert!(midpoints.contains(&center_x), "seed {seed}: center {center_x}");
            assert_eq!(door.rect.y, 400);
            assert_eq!(door.rect.height, 200);
            seen.push(center_x);
        }
        assert!(midpoints.iter().all(|m| seen.contains(m)));
    }

    #[test]
    fn vertical_corridor_gets_full_width_hatch() {
        let shapes = vec![
            labelled(Shape::room(0, Rect::new(0, 0, 1000, 1000)), 0, None),
            labelled(
                Shape::corridor(&Corridor {
                    id: 0,
                    rect: Rect::new(300, 1000, 250, 400),
                    orientation: Orientation::Vertical,
                    rooms: [0, 1],
                }),
                1,
                Some(1),
            ),
            labelled(Shape::room(1, Rect::new(0, 1400, 1000, 1000)), 1, Some(0)),
        ];
        let (elements, ..) = run_on(&shapes, &door_params(1.0), 3);
        let hatches = doors(&elements);
        assert_eq!(hatches.len(), 1);
        let hatch = hatches[0];
        assert_eq!(hatch.role, StructureRole::Hatch);
        assert_eq!(hatch.shape, 1);
        assert_eq!(hatch.rect.x, 300);
        assert_eq!(hatch.rect.width, 250);
        assert_eq!(hatch.rect.height, 40);
        // Both vertical walls share the midpoint y of 1200.
        assert_eq!(hatch.rect.y + hatch.rect.height / 2, 1200);
        assert_eq!(hatch.door.map(|d| d.opener), Some(Orientation::Vertical));
    }

    #[test]
    fn wall_rules_only_cover_their_sides() {
        let p = params(
            RoomTypeRule::room("hall")
                .with_entity(EntityRule::wall("wall").with_alignment(Alignment::TOP)),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, _, _, _) = run(&p);
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| e.rect.y > 900));
    }

    #[test]
    fn props_and_children_link_to_their_parent() {
        let switch = EntityRule::prop("switch")
            .with_alignment(Alignment::LEFT)
            .with_connection(ConnectionRule::wire(ConnectionTarget::Parent, "out", "power"));
        let lamp = EntityRule::prop("lamp").with_child(switch);
        let p = params(
            RoomTypeRule::room("hall").with_entity(lamp),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, wires, _, sink) = run(&p);
        assert_eq!(elements.len(), 4);
        let lamp = &elements[0];
        let switch = &elements[1];
        assert_eq!(switch.parent, Some(lamp.id));
        assert_eq!(lamp.children, vec![switch.id]);
        assert_eq!(lamp.links, vec![switch.id]);
        assert_eq!(wires.len(), 2);
        assert_eq!(wires[0].from, switch.id);
        assert_eq!(wires[0].to_point, "power");
        assert_eq!(sink.warnings().count(), 0);
    }

    #[test]
    fn wire_to_missing_point_is_skipped_with_warning() {
        let child = EntityRule::prop("crate")
            .with_connection(ConnectionRule::wire(ConnectionTarget::Parent, "out", "power"));
        let p = params(
            RoomTypeRule::room("hall").with_entity(EntityRule::prop("lamp").with_child(child)),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, wires, _, sink) = run(&p);
        assert!(wires.is_empty());
        assert!(elements.iter().all(|e| e.links.is_empty()));
        assert_eq!(sink.warnings().count(), 2);
    }

    #[test]
    fn sibling_connection_resolves_after_shape_is_furnished() {
        let lamp = EntityRule::prop("lamp").with_connection(ConnectionRule::plain(
            ConnectionTarget::Sibling("crate".into()),
        ));
        let p = params(
            RoomTypeRule::room("hall")
                .with_entity(lamp)
                .with_entity(EntityRule::prop("crate")),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, _, _, _) = run(&p);
        assert_eq!(elements[0].prefab, "lamp");
        assert_eq!(elements[1].prefab, "crate");
        assert_eq!(elements[0].links, vec![1]);
        assert_eq!(elements[1].links, vec![0]);
    }

    #[test]
    fn unknown_prefab_skips_rule_and_children() {
        let p = params(
            RoomTypeRule::room("hall")
                .with_entity(EntityRule::prop("ghost").with_child(EntityRule::prop("lamp")))
                .with_entity(EntityRule::prop("crate").with_amount(2, 2)),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, _, _, sink) = run(&p);
        assert!(elements.iter().all(|e| e.prefab == "crate"));
        assert_eq!(elements.len(), 4);
        assert_eq!(sink.warnings().count(), 2);
    }

    #[test]
    fn relative_prop_lands_in_target_shape() {
        let p = params(
            RoomTypeRule::room("hall")
                .with_entity(EntityRule::prop("crate").relative_to(RelativeRoom::FirstCorridor)),
            RoomTypeRule::corridor("tunnel"),
        );
        let (elements, _, _, _) = run(&p);
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| e.shape == 2));
    }
}
