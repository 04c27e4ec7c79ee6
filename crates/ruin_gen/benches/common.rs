#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use ruin_gen::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Catalog covering every prefab used by [`furnished_params`].
pub fn bench_catalog() -> PrefabRegistry {
    [
        Prefab::new("wall", Vec2::new(100.0, 40.0)),
        Prefab::new("floor", Vec2::ONE),
        Prefab::new("door", Vec2::new(60.0, 200.0)),
        Prefab::new("hatch", Vec2::new(200.0, 60.0)),
        Prefab::new("console", Vec2::new(80.0, 80.0)).with_connection_point("out"),
        Prefab::new("light", Vec2::new(40.0, 40.0)).with_connection_point("in"),
        Prefab::new("crate", Vec2::new(100.0, 100.0)),
    ]
    .into_iter()
    .collect()
}

/// A parameter set that exercises every placement path.
pub fn furnished_params() -> GenerationParams {
    let light = EntityRule::prop("light")
        .with_alignment(Alignment::TOP)
        .with_connection(ConnectionRule::wire(ConnectionTarget::Parent, "in", "out"));
    GenerationParams::new("bench")
        .with_room_type(
            RoomTypeRule::room("control")
                .with_placement(RoomPlacement::Last, 0)
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::back("floor"))
                .with_entity(EntityRule::prop("console").with_child(light)),
        )
        .with_room_type(
            RoomTypeRule::room("store")
                .with_entity(EntityRule::wall("wall"))
                .with_entity(
                    EntityRule::prop("crate")
                        .with_alignment(Alignment::SIDES)
                        .with_amount(1, 4),
                ),
        )
        .with_room_type(
            RoomTypeRule::corridor("passage")
                .with_entity(EntityRule::wall("wall"))
                .with_entity(EntityRule::door("door"))
                .with_entity(EntityRule::hatch("hatch")),
        )
}
