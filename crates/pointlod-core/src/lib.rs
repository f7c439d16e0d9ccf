//! Core types for pointlod.
//!
//! This crate provides the shared vocabulary used by the optimizer and the
//! rendering driver:
//! - [`PointLodError`] and the crate-wide [`Result`] alias
//! - [`OptimizerConfig`] build and selection options
//! - [`BoundingVolume`], [`Ray`] and [`Camera`] geometry helpers

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounds;
pub mod camera;
pub mod error;
pub mod options;
pub mod pick;
pub mod ray;

pub use bounds::BoundingVolume;
pub use camera::{Camera, ProjectionMode, Viewport};
pub use error::{PointLodError, Result};
pub use options::OptimizerConfig;
pub use pick::ClosestPosition;
pub use ray::Ray;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
