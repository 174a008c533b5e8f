//! Tool configuration stored as TOML

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tilemap_autotile::{StrokeEngine, StrokeKind, StrokeOptions, Surroundings, DEFAULT_TRANSFORMS};
use tilemap_core::FlipFlags;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings shared by the terrain tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Start with surroundings ignored; holding a modifier inverts this
    pub ignore_surroundings: bool,
    /// Let edge strokes replace neighbors whose edges stop agreeing
    pub corrections: bool,
    /// Fixed seed for tile picks, for reproducible strokes
    pub seed: Option<u64>,
    /// Flips tried when matching tiles
    pub transforms: Vec<FlipFlags>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ignore_surroundings: false,
            corrections: true,
            seed: None,
            transforms: DEFAULT_TRANSFORMS.to_vec(),
        }
    }
}

impl ToolConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from a TOML file, falling back to defaults when it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn stroke_options(&self) -> StrokeOptions {
        StrokeOptions {
            surroundings: if self.ignore_surroundings {
                Surroundings::Ignore
            } else {
                Surroundings::Match
            },
            corrections: self.corrections,
            transforms: if self.transforms.is_empty() {
                DEFAULT_TRANSFORMS.to_vec()
            } else {
                self.transforms.clone()
            },
        }
    }

    pub fn stroke_engine(&self, kind: StrokeKind) -> StrokeEngine {
        match self.seed {
            Some(seed) => StrokeEngine::with_seed(kind, self.stroke_options(), seed),
            None => StrokeEngine::new(kind, self.stroke_options()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ToolConfig = toml::from_str("seed = 7\ntransforms = [0, 1]").unwrap();
        assert_eq!(config.seed, Some(7));
        assert!(config.corrections);
        assert_eq!(
            config.stroke_options().transforms,
            vec![FlipFlags::NONE, FlipFlags::HORIZONTAL]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.toml");
        assert_eq!(ToolConfig::load_or_default(&path).unwrap(), ToolConfig::default());

        let config = ToolConfig {
            ignore_surroundings: true,
            corrections: false,
            seed: Some(42),
            transforms: vec![FlipFlags::NONE],
        };
        config.save(&path).unwrap();
        let loaded = ToolConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.stroke_options().surroundings, Surroundings::Ignore);

        std::fs::write(&path, "corrections = \"yes\"").unwrap();
        assert!(matches!(ToolConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
