use rand::rngs::StdRng;
use rand::SeedableRng;
use ruin_gen::prelude::*;
use ruin_gen_examples::init_tracing;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Wide corridors on a narrow area: several sibling pairs cannot be joined,
    // which shows up as rejections and warnings in the event stream.
    let params = GenerationParams::new("events-log")
        .with_split_iterations(3, 3)
        .with_corridor_width(400, 600)
        .with_room_type(RoomTypeRule::room("cell"))
        .with_room_type(RoomTypeRule::corridor("duct").with_commonness(0.0));

    let catalog = PrefabRegistry::new();
    let generator = StructureGenerator::try_new(params, &catalog)?;
    let config = GenerateConfig::new()
        .with_area(Rect::new(0, 0, 4000, 2400))
        .with_mirror(true);

    let mut sink = FnSink::new(|event: GenerationEvent| match event {
        GenerationEvent::CorridorPlaced {
            id,
            rect,
            orientation,
            ..
        } => info!("corridor {id}: {orientation:?} {rect:?}"),
        GenerationEvent::CorridorRejected { areas, reason } => {
            info!("areas {areas:?} left unconnected: {reason:?}")
        }
        GenerationEvent::Warning { context, message } => warn!("[{context}] {message}"),
        GenerationEvent::RunFinished { summary } => info!("done: {summary:?}"),
        _ => {}
    });

    let mut rng = StdRng::seed_from_u64(99);
    let structure = generator.generate_with_events(&config, &mut rng, &mut (), &mut sink)?;
    info!("entrance is shape {}", structure.entrance);

    Ok(())
}
