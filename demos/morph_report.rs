//! Run a morph without a window and report how it went
//!
//! ```text
//! cargo run --bin morph_report -- --models-dir assets --from bunny --to bear
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use pointmorph_algorithms::morph;
use pointmorph_core::Drawable;
use pointmorph_visualization::ViewerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(about = "Morph one model into another and print a summary")]
struct Opts {
    /// TOML file with the model list
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Directory the model paths are relative to
    #[clap(long)]
    pub models_dir: Option<PathBuf>,
    /// Frames per morph
    #[clap(long)]
    pub steps: Option<usize>,
    /// Source model, by name or index
    #[clap(long, default_value = "0")]
    pub from: String,
    /// Target model, by name or index
    #[clap(long, default_value = "1")]
    pub to: String,
}

fn model_index(config: &ViewerConfig, key: &str) -> Result<usize> {
    if let Some(index) = config.models.iter().position(|m| m.name == key) {
        return Ok(index);
    }
    match key.parse::<usize>() {
        Ok(index) if index < config.models.len() => Ok(index),
        _ => Err(anyhow!("No model named or numbered '{}'", key)),
    }
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

    let from = model_index(&config, &opts.from)?;
    let to = model_index(&config, &opts.to)?;
    let models = config.load_models().context("Failed to load models")?;
    let (source, target) = (&models[from], &models[to]);

    let steps = config.morph_steps;
    let report_every = (steps / 10).max(1);
    let mut frame = 0;
    let result = morph(source, target, steps, |working| {
        frame += 1;
        if frame % report_every == 0 || frame == steps {
            let (min, max) = working.bounding_box();
            info!(
                "step {}/{}: extent ({:.2}, {:.2}, {:.2})",
                frame,
                steps,
                max.x - min.x,
                max.y - min.y,
                max.z - min.z
            );
        }
        Ok(())
    })?;

    let (min, max) = result.bounding_box();
    println!(
        "{} ({} points) -> {} ({} points) in {} steps",
        config.models[from].name,
        source.len(),
        config.models[to].name,
        target.len(),
        steps
    );
    println!("result: {} points", result.len());
    println!(
        "bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    Ok(())
}
