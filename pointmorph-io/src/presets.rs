//! Named model presets
//!
//! Each bundled model needs its own scale to fill the view at the default
//! camera distance. The scale travels with the preset, so it never depends
//! on how the model's path happens to be spelled.

use std::fmt;

/// Bundled point models with their display scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelPreset {
    Bunny,
    Dragon,
    Bear,
}

impl ModelPreset {
    /// All presets in their default key order (F1, F2, F3)
    pub const ALL: [ModelPreset; 3] = [ModelPreset::Bunny, ModelPreset::Dragon, ModelPreset::Bear];

    /// Preset name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            ModelPreset::Bunny => "bunny",
            ModelPreset::Dragon => "dragon",
            ModelPreset::Bear => "bear",
        }
    }

    /// File name of the model
    pub fn file_name(&self) -> &'static str {
        match self {
            ModelPreset::Bunny => "bunny.obj",
            ModelPreset::Dragon => "dragon.obj",
            ModelPreset::Bear => "bear.obj",
        }
    }

    /// Scale applied after centering
    pub fn scale(&self) -> f32 {
        match self {
            ModelPreset::Bunny => 7.5,
            ModelPreset::Dragon => 9.0,
            ModelPreset::Bear => 0.9,
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
