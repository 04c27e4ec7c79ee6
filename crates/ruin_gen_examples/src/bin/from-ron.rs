use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ruin_gen::prelude::*;
use ruin_gen_examples::{init_tracing, render_structure_to_png, RenderConfig, RuinFile};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Usage: from-ron [path.ruin.ron]
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/outpost.ruin.ron")
        });

    let file = RuinFile::load(&path)?;
    let catalog = file.catalog();
    let generator = StructureGenerator::try_new(file.params.clone(), &catalog)?;

    let mut rng = StdRng::seed_from_u64(file.seed);
    let mut world = BlockerList::new();
    let structure = generator.generate(&file.config(), &mut rng, &mut world)?;

    info!(
        "Generated '{}' in {:?}: max distance {}, {} blockers",
        file.params.name,
        structure.area,
        structure.max_distance(),
        world.len()
    );

    let out = format!("{}.png", file.params.name);
    render_structure_to_png(&structure, &RenderConfig::new((1200, 900)), &out)?;

    Ok(())
}
