use glam::IVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ruin_gen::layout::distance::label_distances;
use ruin_gen::prelude::*;

fn bare_generator(params: GenerationParams, registry: &PrefabRegistry) -> StructureGenerator<'_> {
    StructureGenerator::try_new(params, registry).unwrap()
}

#[test]
fn two_iterations_on_a_square_yield_four_quadrants() {
    let params = GenerationParams::new("quadrants")
        .with_size_range(IVec2::splat(400), IVec2::splat(400))
        .with_split_iterations(2, 2)
        .with_min_division_ratio(0.5)
        .with_vertical_split_probability(1.0)
        // The vertical chance is scaled by height / width, so a 400x200 half would be
        // stacked again half of the time. Strips of 100 fall under a 150 minimum, which
        // forces the second cut across the width.
        .with_min_split_size(150, 150)
        .with_room_scale(0.6, 0.8)
        .with_corridor_width(40, 60);
    let registry = PrefabRegistry::new();
    let generator = bare_generator(params, &registry);
    let root = Rect::new(0, 0, 400, 400);

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let structure = generator
            .generate(&GenerateConfig::new().with_area(root), &mut rng, &mut ())
            .unwrap();

        let rooms: Vec<&Shape> = structure.rooms().collect();
        assert_eq!(rooms.len(), 4, "seed {seed}");
        let quadrants = [
            Rect::new(0, 0, 200, 200),
            Rect::new(200, 0, 200, 200),
            Rect::new(0, 200, 200, 200),
            Rect::new(200, 200, 200, 200),
        ];
        for quadrant in &quadrants {
            let inside = rooms
                .iter()
                .filter(|r| quadrant.contains_rect(&r.rect))
                .count();
            assert_eq!(inside, 1, "seed {seed}: {quadrant:?}");
        }

        let horizontal: Vec<&Shape> = structure
            .corridors()
            .filter(|c| c.orientation() == Some(Orientation::Horizontal))
            .collect();
        assert_eq!(horizontal.len(), 2, "seed {seed}");
        for corridor in &horizontal {
            let row = if corridor.rect.y < 200 { 0 } else { 200 };
            assert!(corridor.rect.y >= row && corridor.rect.max().y <= row + 200);
            assert!(corridor.rect.x < 200 && corridor.rect.max().x > 200);
        }
        for corridor in structure.corridors() {
            assert!(root.contains_rect(&corridor.rect), "seed {seed}");
        }
    }
}

#[test]
fn corridor_wider_than_facing_overlap_is_not_built() {
    // One horizontal split into two 500x400 leaves, halved about their centers: the
    // facing walls overlap by exactly 200 units.
    let base = GenerationParams::new("narrow")
        .with_size_range(IVec2::new(1000, 400), IVec2::new(1000, 400))
        .with_split_iterations(1, 1)
        .with_min_division_ratio(0.5)
        .with_vertical_split_probability(0.0)
        .with_min_split_size(0, 0)
        .with_room_scale(0.5, 0.5);
    let registry = PrefabRegistry::new();
    let config = GenerateConfig::new().with_area(Rect::new(0, 0, 1000, 400));

    let generator = bare_generator(base.clone().with_corridor_width(300, 300), &registry);
    let mut sink = VecSink::new();
    let mut rng = StdRng::seed_from_u64(1);
    let structure = generator
        .generate_with_events(&config, &mut rng, &mut (), &mut sink)
        .unwrap();
    assert_eq!(structure.rooms().count(), 2);
    assert_eq!(structure.corridors().count(), 0);
    assert!(sink.as_slice().iter().any(|e| matches!(
        e,
        GenerationEvent::CorridorRejected { .. }
    )));
    assert_eq!(sink.warnings().count(), 1);

    let generator = bare_generator(base.with_corridor_width(200, 200), &registry);
    let mut rng = StdRng::seed_from_u64(1);
    let structure = generator.generate(&config, &mut rng, &mut ()).unwrap();
    let corridors: Vec<&Shape> = structure.corridors().collect();
    assert_eq!(corridors.len(), 1);
    assert_eq!(corridors[0].rect, Rect::new(375, 100, 250, 200));
}

#[test]
fn room_behind_two_corridors_keeps_distance_one() {
    // L0 is the entrance; L1 is reachable through an upper and a lower corridor.
    let corridor = |id: usize, y: i32| {
        Shape::corridor(&Corridor {
            id,
            rect: Rect::new(300, y, 100, 50),
            orientation: Orientation::Horizontal,
            rooms: [0, 1],
        })
    };
    let build = |reverse: bool| {
        let mut corridors = vec![corridor(0, 20), corridor(1, 500)];
        if reverse {
            corridors.reverse();
        }
        let mut shapes = vec![
            Shape::room(0, Rect::new(0, 0, 300, 600)),
            Shape::room(1, Rect::new(400, 0, 300, 600)),
        ];
        shapes.extend(corridors);
        shapes
    };

    for reverse in [false, true] {
        let mut shapes = build(reverse);
        label_distances(&mut shapes, 0);
        assert_eq!(shapes[0].distance, Some(0));
        assert_eq!(shapes[1].distance, Some(1), "reverse {reverse}");
        assert_eq!(shapes[2].distance, Some(1));
        assert_eq!(shapes[3].distance, Some(1));
    }
}

#[test]
fn zero_weight_room_types_leave_shapes_untyped() {
    let params = GenerationParams::default()
        .with_room_type(RoomTypeRule::room("never").with_commonness(0.0))
        .with_room_type(RoomTypeRule::corridor("hall"));
    let registry = PrefabRegistry::new();
    let generator = bare_generator(params, &registry);
    let mut rng = StdRng::seed_from_u64(8);
    let mut sink = VecSink::new();
    let structure = generator
        .generate_with_events(&GenerateConfig::new(), &mut rng, &mut (), &mut sink)
        .unwrap();
    assert!(structure.rooms().all(|r| r.room_type.is_none()));
    assert!(structure.corridors().all(|c| c.room_type == Some(1)));
    let untyped_warnings = sink
        .warnings()
        .filter(|m| m.starts_with("no room type"))
        .count();
    assert_eq!(untyped_warnings, structure.rooms().count() - 1);
}
