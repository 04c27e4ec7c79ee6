use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ruin_gen::prelude::*;
use ruin_gen_examples::{init_tracing, render_structure_to_png, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog: PrefabRegistry = [
        Prefab::new("wall", Vec2::new(50.0, 50.0)),
        Prefab::new("tiles", Vec2::ONE),
        Prefab::new("door", Vec2::new(50.0, 200.0)),
        Prefab::new("hatch", Vec2::new(200.0, 50.0)),
        Prefab::new("generator", Vec2::new(300.0, 300.0)).with_connection_point("out"),
        Prefab::new("lamp", Vec2::new(60.0, 60.0)).with_connection_point("in"),
        Prefab::new("console", Vec2::new(120.0, 80.0)).with_connection_point("in"),
        Prefab::new("table", Vec2::new(200.0, 120.0)),
    ]
    .into_iter()
    .collect();

    // The generator lives in the furthest room and powers a lamp hanging above it
    // plus a console placed in the room right behind the entrance.
    let generator_rule = EntityRule::prop("generator")
        .with_child(
            EntityRule::prop("lamp")
                .with_alignment(Alignment::TOP)
                .with_connection(ConnectionRule::wire(ConnectionTarget::Parent, "in", "out")),
        )
        .with_child(
            EntityRule::prop("console")
                .relative_to(RelativeRoom::FirstRoom)
                .with_connection(ConnectionRule::wire(ConnectionTarget::Parent, "in", "out")),
        );

    let params = GenerationParams::new("furnished-in-code")
        .with_door_open_probability(0.25)
        .with_room_type(
            RoomTypeRule::room("power")
                .with_placement(RoomPlacement::Last, 0)
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::back("tiles"))
                .with_entity(generator_rule),
        )
        .with_room_type(
            RoomTypeRule::room("mess")
                .with_commonness(2.0)
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::back("tiles"))
                .with_entity(
                    EntityRule::prop("table")
                        .with_alignment(Alignment::SIDES)
                        .with_amount(1, 3),
                ),
        )
        .with_room_type(RoomTypeRule::room("bare").with_entity(EntityRule::wall("wall")))
        .with_room_type(
            RoomTypeRule::corridor("passage")
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::door("door"))
                .with_entity(EntityRule::hatch("hatch")),
        );

    let generator = StructureGenerator::try_new(params, &catalog)?;
    let config = GenerateConfig::new()
        .with_area(Rect::new(0, 0, 5000, 3500))
        .with_entrance_anchor(Vec2::new(0.0, 1750.0));

    let mut rng = StdRng::seed_from_u64(7);
    let mut world = BlockerList::new();
    let structure = generator.generate(&config, &mut rng, &mut world)?;

    let summary = structure.summary();
    info!(
        "{} rooms, {} corridors, {} elements, {} wires, {} blockers",
        summary.rooms,
        summary.corridors,
        summary.elements,
        summary.wires,
        world.len()
    );

    let rc = RenderConfig::new((1250, 875));
    render_structure_to_png(&structure, &rc, "furnished-in-code.png")?;

    Ok(())
}
