use std::path::Path;

use anyhow::Context;
use ruin_gen::prelude::*;
use serde::Deserialize;

/// A self-contained generation setup loaded from RON: parameters, the prefab
/// catalog they refer to, and the run configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct RuinFile {
    pub seed: u64,
    #[serde(default)]
    pub area: Option<Rect>,
    #[serde(default)]
    pub mirror: bool,
    pub prefabs: Vec<Prefab>,
    pub params: GenerationParams,
}

impl RuinFile {
    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let file: RuinFile = ron::from_str(text)?;
        file.params.validate()?;
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_ron_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn catalog(&self) -> PrefabRegistry {
        self.prefabs.iter().cloned().collect()
    }

    pub fn config(&self) -> GenerateConfig {
        let config = GenerateConfig::new().with_mirror(self.mirror);
        match self.area {
            Some(area) => config.with_area(area),
            None => config,
        }
    }
}
