//! pointlod: level-of-detail rendering for large static point clouds.
//!
//! Positions are split into contiguous segments, each with a ladder of
//! reduced-density index lists. Every frame the segments outside the view
//! frustum are skipped and each visible segment is drawn with the coarsest
//! index list that still covers it at the requested on-screen point size.
//!
//! # Quick Start
//!
//! ```no_run
//! use pointlod::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     // Presort for spatial locality, then optimize
//!     let points: Vec<Vec3> = (0..10_000)
//!         .map(|i| Vec3::new((i % 100) as f32 * 0.1, (i / 100) as f32 * 0.1, 0.0))
//!         .collect();
//!     let (points, _order) = presort::sort_by_morton(&points);
//!     let mut mesh = OptimizedPointMesh::from_positions(points, OptimizerConfig::new(16))?;
//!
//!     // Draw one frame through a backend
//!     let viewport = Viewport::new(1280, 720);
//!     let mut camera = Camera::for_viewport(viewport);
//!     camera.look_at_bounds(&mesh.optimizer().bounds()?, 1.5);
//!     let mut renderer = HeadlessRenderer::new();
//!     let stats = mesh.render_camera(&mut renderer, &camera, viewport)?;
//!     println!("{} draws, {} points", stats.draw_calls, stats.rendered_points);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`PointCloudOptimizer`] builds segments and selects views; it never
//!   touches the GPU.
//! - [`Renderer`] is implemented by the host's rendering backend.
//! - [`OptimizedPointMesh`] drives a renderer frame by frame.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod headless;
mod init;
mod pick;
mod render;

// Re-export core types
pub use pointlod_core::{
    BoundingVolume, Camera, ClosestPosition, Mat4, OptimizerConfig, PointLodError,
    ProjectionMode, Ray, Result, Vec2, Vec3, Vec4, Viewport,
};

// Re-export optimizer types
pub use pointlod_optimizer::{
    presort, IndexView, OptimizerState, PointCloudOptimizer, Segment, SelectedView, Selection,
    SelectionStats,
};

pub use headless::{DrawCommand, HeadlessRenderer, RecordedFrame};
pub use init::{init_logging, load_config, save_config};
pub use pick::pick_closest;
pub use render::{FrameStats, OptimizedPointMesh, Renderer};
