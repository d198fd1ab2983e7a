//! Viewer state machine
//!
//! [`ViewerState`] owns the loaded models and decides what is on screen.
//! It knows nothing about windows or GPUs: the event loop feeds it ticks,
//! commands and resizes, and hands it a [`FrameRenderer`] to draw with.

use crate::config::{ViewerConfig, MIN_POINT_SIZE};
use crate::input::ViewerCommand;
use log::info;
use pointmorph_algorithms::Morph;
use pointmorph_core::{render_cloud, Error, FrameRenderer, PointCloud, Result};

/// Drawable area in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, as the projection expects
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Whether a morph is in flight
#[derive(Debug)]
pub enum MorphState {
    Idle,
    Morphing { target: usize, morph: Morph },
}

/// What the event loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct ViewerState {
    models: Vec<PointCloud>,
    active: usize,
    morph_state: MorphState,
    point_size: f32,
    point_size_step: f32,
    spin_degrees: f32,
    morph_steps: usize,
    viewport: Viewport,
}

impl ViewerState {
    /// Start idle on the first model
    pub fn new(models: Vec<PointCloud>, config: &ViewerConfig) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::InvalidArgument("Viewer needs at least one model".to_string()));
        }
        if config.morph_steps == 0 {
            return Err(Error::InvalidArgument("morph_steps must be at least 1".to_string()));
        }
        if let Some(index) = models.iter().position(|m| m.is_empty() || !m.is_aligned()) {
            return Err(Error::InvalidArgument(format!(
                "Model {} is empty or has misaligned normals",
                index
            )));
        }

        Ok(Self {
            models,
            active: 0,
            morph_state: MorphState::Idle,
            point_size: config.point_size.max(MIN_POINT_SIZE),
            point_size_step: config.point_size_step,
            spin_degrees: config.spin_degrees_per_tick,
            morph_steps: config.morph_steps,
            viewport: Viewport::new(config.width, config.height),
        })
    }

    /// Index of the model last settled on
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn models(&self) -> &[PointCloud] {
        &self.models
    }

    pub fn morph_state(&self) -> &MorphState {
        &self.morph_state
    }

    pub fn is_morphing(&self) -> bool {
        matches!(self.morph_state, MorphState::Morphing { .. })
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The cloud to draw this frame: the working cloud while morphing
    pub fn displayed(&self) -> &PointCloud {
        match &self.morph_state {
            MorphState::Idle => &self.models[self.active],
            MorphState::Morphing { morph, .. } => morph.working(),
        }
    }

    /// Idle update, called once per event loop iteration.
    ///
    /// A finished morph stays on screen for one frame; the next tick makes
    /// its target the active model.
    pub fn tick(&mut self) {
        let finished = match &mut self.morph_state {
            MorphState::Idle => false,
            MorphState::Morphing { morph, .. } if morph.is_finished() => true,
            MorphState::Morphing { morph, .. } => {
                morph.working_mut().spin(self.spin_degrees);
                morph.advance();
                return;
            }
        };

        if finished {
            self.finish_morph();
        }
        self.models[self.active].spin(self.spin_degrees);
    }

    fn finish_morph(&mut self) {
        let previous = std::mem::replace(&mut self.morph_state, MorphState::Idle);
        if let MorphState::Morphing { target, morph } = previous {
            let angle = morph.working().angle();
            self.active = target;
            self.models[target].set_angle(angle);
            info!("Morph finished, now showing model {}", target);
        }
    }

    /// Apply a user command
    pub fn handle(&mut self, command: ViewerCommand) -> Result<Outcome> {
        match command {
            ViewerCommand::SwitchModel(index) => {
                self.switch_to(index)?;
            }
            ViewerCommand::IncreasePointSize => {
                self.point_size += self.point_size_step;
            }
            ViewerCommand::DecreasePointSize => {
                self.point_size = (self.point_size - self.point_size_step).max(MIN_POINT_SIZE);
            }
            ViewerCommand::Exit => return Ok(Outcome::Exit),
        }
        Ok(Outcome::Continue)
    }

    fn switch_to(&mut self, index: usize) -> Result<()> {
        if index >= self.models.len() {
            return Err(Error::InvalidArgument(format!(
                "No model {} ({} loaded)",
                index,
                self.models.len()
            )));
        }

        let morph = match &self.morph_state {
            MorphState::Idle if index == self.active => return Ok(()),
            MorphState::Morphing { target, .. } if *target == index => return Ok(()),
            MorphState::Idle => {
                Morph::new(&self.models[self.active], &self.models[index], self.morph_steps)?
            }
            // Retarget from wherever the in-flight morph has got to
            MorphState::Morphing { morph, .. } => {
                Morph::new(morph.working(), &self.models[index], self.morph_steps)?
            }
        };

        info!("Switching to model {}", index);
        self.morph_state = MorphState::Morphing { target: index, morph };
        Ok(())
    }

    /// Store a new viewport. Zero sizes, as reported for minimized windows, are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = Viewport::new(width, height);
        }
    }

    /// Draw and present the displayed cloud
    pub fn render<R: FrameRenderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        render_cloud(renderer, self.displayed())
    }
}
