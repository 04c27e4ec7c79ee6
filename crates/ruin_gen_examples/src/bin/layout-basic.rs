use rand::rngs::StdRng;
use rand::SeedableRng;
use ruin_gen::prelude::*;
use ruin_gen_examples::{init_tracing, render_structure_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // No room types: the run stops after distance labelling, which is enough to
    // see the split tree, the corridors and the clipped walls.
    let params = GenerationParams::new("layout-basic")
        .with_split_iterations(4, 4)
        .with_min_split_size(600, 500)
        .with_corridor_width(160, 240);

    let catalog = PrefabRegistry::new();
    let generator = StructureGenerator::try_new(params, &catalog)?;
    let config = GenerateConfig::new().with_area(Rect::new(0, 0, 6000, 4000));

    let mut rng = StdRng::seed_from_u64(2025);
    let structure = generator.generate(&config, &mut rng, &mut ())?;

    let rc = RenderConfig::new((1200, 800));
    render_structure_to_png(&structure, &rc, "layout-basic.png")?;

    Ok(())
}
