//! # pointmorph GPU
//!
//! wgpu rendering for pointmorph: device and surface setup plus a point
//! renderer that implements the [`FrameRenderer`](pointmorph_core::FrameRenderer)
//! contract, drawing every point as a screen-facing square coloured by its normal.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pointmorph_core::{render_cloud, PointCloud};
//! use pointmorph_gpu::{PointCloudRenderer, RenderConfig};
//!
//! async fn example(
//!     window: Arc<winit::window::Window>,
//!     cloud: &PointCloud,
//! ) -> pointmorph_core::Result<()> {
//!     let mut renderer = PointCloudRenderer::new(window, RenderConfig::default()).await?;
//!     render_cloud(&mut renderer, cloud)
//! }
//! ```

pub mod device;
pub mod renderer;

// Re-export commonly used items
pub use device::GpuContext;
pub use renderer::{PointCloudRenderer, PointVertex, FrameUniform, RenderConfig, points_to_vertices};
