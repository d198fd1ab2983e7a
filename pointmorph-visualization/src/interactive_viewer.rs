//! Interactive model viewer
//!
//! Opens a window, spins the active model, and morphs between models as the
//! function keys are pressed. One morph step runs per event loop iteration,
//! so input keeps being handled while a morph is in flight.

use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use log::{error, info, warn};
use pointmorph_core::{Error, Result};
use pointmorph_gpu::{PointCloudRenderer, RenderConfig};

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::input::command_for_key;
use crate::state::{Outcome, ViewerState};

/// Window, camera and viewer state bundled for the event loop
pub struct ModelViewer {
    state: ViewerState,
    camera: Camera,
    config: ViewerConfig,
}

impl ModelViewer {
    /// Load every configured model and start idle on the first
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let models = config.load_models()?;
        let state = ViewerState::new(models, &config)?;
        Ok(Self::from_state(state, config))
    }

    /// Wrap an already prepared state
    pub fn from_state(state: ViewerState, config: ViewerConfig) -> Self {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(state.viewport().aspect_ratio());
        Self { state, camera, config }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Run until the window is closed or Escape is pressed
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.config.title.as_str())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let render_config = RenderConfig {
            point_size: self.state.point_size(),
            ..RenderConfig::default()
        };
        let mut renderer =
            pollster::block_on(PointCloudRenderer::new(window.clone(), render_config))?;
        self.resize(&mut renderer, window.inner_size());

        info!(
            "Viewer ready with {} models; F1-F{} switch, P/Shift+P point size, Escape quits",
            self.state.models().len(),
            self.state.models().len().min(9)
        );

        let mut shift = false;
        let mut failure: Option<Error> = None;

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(new_size) => self.resize(&mut renderer, new_size),
                        WindowEvent::ModifiersChanged(modifiers) => {
                            shift = modifiers.state().shift_key();
                        }
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed && !event.repeat =>
                        {
                            let Some(command) = command_for_key(&event.logical_key, shift) else {
                                return;
                            };
                            match self.state.handle(command) {
                                Ok(Outcome::Exit) => target.exit(),
                                Ok(Outcome::Continue) => {
                                    renderer.set_point_size(self.state.point_size())
                                }
                                Err(e) => warn!("Ignoring {:?}: {}", command, e),
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(e) = self.state.render(&mut renderer) {
                                error!("Render failed: {}", e);
                                failure = Some(e);
                                target.exit();
                            }
                        }
                        _ => {}
                    },
                    Event::AboutToWait => {
                        self.state.tick();
                        window.request_redraw();
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn resize(&mut self, renderer: &mut PointCloudRenderer, size: PhysicalSize<u32>) {
        self.state.resize(size.width, size.height);
        renderer.resize(size);
        self.camera.set_aspect_ratio(self.state.viewport().aspect_ratio());
        renderer.update_camera(self.camera.view_projection());
    }
}
