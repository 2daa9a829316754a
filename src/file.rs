use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    choice::*,
    error::*,
    generate::*
};

const fn default_dim() -> f64 {
    16.
}

/// A saved distribution together with the grid it should be drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default = "default_dim")]
    pub width: f64,
    #[serde(default = "default_dim")]
    pub height: f64,
    #[serde(default = "default_dim")]
    pub block_px: f64,
    pub choices: Vec<Choice>,
}

impl Preset {
    pub fn grid_config(&self) -> GridConfig {
        GridConfig::new(self.width, self.height, self.block_px)
    }

    pub fn from_json(src: &str) -> serde_json::Result<Preset> {
        serde_json::from_str(src)
    }

    pub fn from_ron(src: &str) -> ron::error::SpannedResult<Preset> {
        ron::from_str(src)
    }

    pub fn from_yaml(src: &str) -> Result<Preset, serde_yaml::Error> {
        serde_yaml::from_str(src)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Preset, PresetError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(match path.as_ref().extension().ok_or(PresetError::ExtensionError)?.to_str() {
            Some("json") => Preset::from_json(&contents)?,
            Some("ron") => Preset::from_ron(&contents)?,
            Some("yaml") | Some("yml") => Preset::from_yaml(&contents)?,
            _ => return Err(PresetError::ExtensionError)
        })
    }
}
