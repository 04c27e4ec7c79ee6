#![forbid(unsafe_code)]

mod rendering;
mod ruin_file;

pub use rendering::{init_tracing, render_structure_to_png, RenderConfig, RoleStyle};
pub use ruin_file::RuinFile;
