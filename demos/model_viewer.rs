//! Spin the bundled models and morph between them
//!
//! ```text
//! cargo run --bin model_viewer -- --models-dir assets
//! ```
//!
//! F1-F9 pick a model, P / Shift+P shrink or grow the points, Escape quits.
//! Set `RUST_LOG=debug` to see every morph step.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pointmorph_visualization::{show_models, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(about = "Interactive point model viewer")]
struct Opts {
    /// TOML file with viewer settings and the model list
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Directory the model paths are relative to
    #[clap(long)]
    pub models_dir: Option<PathBuf>,
    /// Frames per morph
    #[clap(long)]
    pub steps: Option<usize>,
    /// Initial point size in pixels
    #[clap(long)]
    pub point_size: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let mut config = match &opts.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(dir) = opts.models_dir {
        config.models_dir = dir;
    }
    if let Some(steps) = opts.steps {
        config.morph_steps = steps;
    }
    if let Some(point_size) = opts.point_size {
        config.point_size = point_size;
    }

    info!(
        "Loading {} models from {}",
        config.models.len(),
        config.models_dir.display()
    );
    show_models(config).context("Viewer failed")?;
    Ok(())
}
