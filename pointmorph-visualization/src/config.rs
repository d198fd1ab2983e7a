//! Viewer configuration
//!
//! Everything here can be read from a TOML file:
//!
//! ```toml
//! title = "Morph"
//! morph_steps = 60
//! models_dir = "assets"
//!
//! [[models]]
//! name = "bunny"
//! path = "bunny.obj"
//! scale = 7.5
//! ```
//!
//! Fields left out keep their defaults, which reproduce the bundled
//! bunny, dragon and bear models.

use log::info;
use pointmorph_algorithms::DEFAULT_MORPH_STEPS;
use pointmorph_core::{Error, PointCloud, Result, DEFAULT_SPIN_DEGREES};
use pointmorph_io::ModelPreset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest point size the viewer will draw with
pub const MIN_POINT_SIZE: f32 = 1.0;

/// One model to load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    /// Relative paths are resolved against [`ViewerConfig::models_dir`]
    pub path: PathBuf,
    pub scale: f32,
}

impl ModelEntry {
    pub fn from_preset(preset: ModelPreset) -> Self {
        Self {
            name: preset.to_string(),
            path: PathBuf::from(preset.file_name()),
            scale: preset.scale(),
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub morph_steps: usize,
    pub spin_degrees_per_tick: f32,
    pub point_size: f32,
    pub point_size_step: f32,
    pub models_dir: PathBuf,
    pub models: Vec<ModelEntry>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "pointmorph".to_string(),
            width: 640,
            height: 480,
            morph_steps: DEFAULT_MORPH_STEPS,
            spin_degrees_per_tick: DEFAULT_SPIN_DEGREES,
            point_size: 2.0,
            point_size_step: 0.75,
            models_dir: PathBuf::from("."),
            models: ModelPreset::ALL.iter().copied().map(ModelEntry::from_preset).collect(),
        }
    }
}

impl ViewerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| Error::InvalidData(format!("Invalid viewer config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        info!("Read viewer config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| Error::InvalidData(format!("Cannot serialize viewer config: {}", e)))
    }

    /// Check the values the viewer relies on
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::InvalidArgument("No models configured".to_string()));
        }
        if self.morph_steps == 0 {
            return Err(Error::InvalidArgument("morph_steps must be at least 1".to_string()));
        }
        if !self.point_size_step.is_finite() || self.point_size_step < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Invalid point_size_step {}",
                self.point_size_step
            )));
        }
        for model in &self.models {
            if !model.scale.is_finite() || model.scale <= 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "Model '{}' has invalid scale {}",
                    model.name, model.scale
                )));
            }
        }
        Ok(())
    }

    /// Where a model's file lives on disk
    pub fn model_path(&self, model: &ModelEntry) -> PathBuf {
        self.models_dir.join(&model.path)
    }

    /// Load every configured model, in order. The first failure aborts.
    pub fn load_models(&self) -> Result<Vec<PointCloud>> {
        self.validate()?;
        self.models
            .iter()
            .map(|model| {
                let path = self.model_path(model);
                info!("Loading model '{}' from {}", model.name, path.display());
                pointmorph_io::read_model(&path, model.scale).map_err(Error::from)
            })
            .collect()
    }
}
