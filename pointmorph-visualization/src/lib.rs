//! Interactive viewer for pointmorph models
//!
//! - [`ViewerState`]: which model is shown, morph progress, point size
//! - [`command_for_key`]: keyboard bindings
//! - [`Camera`]: fixed perspective camera
//! - [`ViewerConfig`]: TOML-backed settings and model list
//! - [`ModelViewer`]: the winit event loop tying it to the GPU renderer

pub mod camera;
pub mod config;
pub mod input;
pub mod interactive_viewer;
pub mod state;

pub use camera::*;
pub use config::*;
pub use input::*;
pub use interactive_viewer::*;
pub use state::*;

use pointmorph_core::Result;

/// Load the configured models and run the viewer until it is closed
pub fn show_models(config: ViewerConfig) -> Result<()> {
    ModelViewer::new(config)?.run()
}
