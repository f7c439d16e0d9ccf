//! Segment and level-of-detail optimizer for large static point clouds.
//!
//! A [`PointCloudOptimizer`] splits a position array into contiguous
//! [`Segment`]s. Each segment carries a ladder of [`IndexView`]s, from the
//! full-density index list down to grid-reduced subsets. Every frame,
//! [`PointCloudOptimizer::select_visible_views`] drops segments outside the
//! view frustum and picks, for each remaining segment, the coarsest view whose
//! point spacing still fits the target on-screen point size.
//!
//! The optimizer never touches the GPU: the caller uploads
//! [`PointCloudOptimizer::positions`] once as a shared vertex buffer and issues
//! one indexed draw per [`SelectedView`].
//!
//! Segment quality depends on the input being spatially coherent in array
//! order; [`presort`] provides a Morton-order sort for that.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Index math converts between usize, u32 and f32 throughout
#![allow(clippy::cast_precision_loss)]

pub mod index_view;
pub mod optimizer;
pub mod partition;
pub mod presort;
pub mod query;
pub mod segment;
pub mod selection;

pub use index_view::IndexView;
pub use optimizer::{OptimizerState, PointCloudOptimizer};
pub use segment::Segment;
pub use selection::{SelectedView, Selection, SelectionStats};
