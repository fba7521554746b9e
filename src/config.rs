//! Configuration loading for Circumplex.
//!
//! Configuration is loaded from TOML files with environment variable overrides.

use crate::catalog::{ActiveSet, Catalog, Category};
use crate::generators::blob::DEFAULT_RESOLUTION;
use crate::layout::CanvasSize;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CircumplexConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub render: RenderConfig,

    /// Custom category list; empty means the built-in emotions.
    #[serde(default)]
    pub catalog: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Also write each category layer as its own PNG.
    #[serde(default)]
    pub layers: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            width: default_width(),
            height: default_height(),
            layers: false,
        }
    }
}

fn default_directory() -> String {
    "output".to_string()
}

fn default_width() -> u32 {
    900
}

fn default_height() -> u32 {
    900
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    /// Active category ids; unset means the default selection for the
    /// configured catalog.
    #[serde(default)]
    pub active: Option<Vec<String>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            active: None,
        }
    }
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

impl CircumplexConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("CIRCUMPLEX")
                    .separator("_")
                    .list_separator(",")
                    .with_list_parse_key("render.active")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        let circumplex_config: CircumplexConfig = config
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        tracing::debug!(
            catalog = circumplex_config.catalog.len(),
            "configuration loaded"
        );
        Ok(circumplex_config)
    }

    /// The configured catalog, or the built-in one when none is given.
    pub fn catalog(&self) -> Result<Catalog> {
        if self.catalog.is_empty() {
            return Ok(Catalog::emotions());
        }
        Ok(Catalog::new(self.catalog.clone())?)
    }

    /// The configured selection, or the catalog's default one when unset.
    pub fn active_set(&self, catalog: &Catalog) -> Result<ActiveSet> {
        match &self.render.active {
            Some(ids) => Ok(ActiveSet::new(catalog, ids)?),
            None => Ok(ActiveSet::default_for(catalog)),
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.output.width, self.output.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RgbColor;

    #[test]
    fn defaults_match_builtin_scene() {
        let config = CircumplexConfig::default();
        assert_eq!(config.canvas(), CanvasSize::new(900, 900));
        assert_eq!(config.render.resolution, 400);

        let catalog = config.catalog().unwrap();
        let active = config.active_set(&catalog).unwrap();
        assert_eq!(active.ids(), ["joy", "sadness", "anger", "love"]);
    }

    #[test]
    fn unknown_active_id_is_an_error() {
        let mut config = CircumplexConfig::default();
        config.render.active = Some(vec!["boredom".to_string()]);
        let catalog = config.catalog().unwrap();
        assert!(config.active_set(&catalog).is_err());
    }

    #[test]
    fn explicit_empty_selection_is_an_error() {
        let mut config = CircumplexConfig::default();
        config.render.active = Some(Vec::new());
        let catalog = config.catalog().unwrap();
        assert!(config.active_set(&catalog).is_err());
    }

    #[test]
    fn unset_selection_follows_custom_catalog() {
        let mut config = CircumplexConfig::default();
        config.catalog = vec![
            Category::new("calm", "Calm", RgbColor::from_hex("#88CCEE").unwrap()),
            Category::new("love", "Love", RgbColor::from_hex("#FF69B4").unwrap()),
        ];
        let catalog = config.catalog().unwrap();
        let active = config.active_set(&catalog).unwrap();
        assert_eq!(active.ids(), ["love"]);
    }
}
