//! Headless renderer that records draws instead of submitting them.
//!
//! Useful for integration tests, batch statistics, and tuning the target
//! point size without a GPU.

use glam::Vec3;
use pointlod_core::{Result, Viewport};
use pointlod_optimizer::SelectedView;

use crate::render::Renderer;

/// One recorded indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    /// Id of the drawn segment.
    pub segment_id: usize,
    /// Ladder level of the drawn view (0 = full density).
    pub level: usize,
    /// Number of indices drawn.
    pub index_count: usize,
}

/// The draws recorded between two `begin_frame` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedFrame {
    /// Viewport the frame was rendered at.
    pub viewport: Option<Viewport>,
    /// Draws in submission order.
    pub draws: Vec<DrawCommand>,
}

impl RecordedFrame {
    /// Returns the total number of points drawn in this frame.
    #[must_use]
    pub fn rendered_points(&self) -> usize {
        self.draws.iter().map(|d| d.index_count).sum()
    }
}

/// A [`Renderer`] that records every call.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    vertex_count: usize,
    upload_count: usize,
    frames: Vec<RecordedFrame>,
}

impl HeadlessRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times positions were uploaded.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.upload_count
    }

    /// Returns the size of the last uploaded vertex buffer.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns all recorded frames.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Returns the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Returns the number of draws over all frames.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.frames.iter().map(|f| f.draws.len()).sum()
    }

    /// Forgets all recorded frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Renderer for HeadlessRenderer {
    fn upload_positions(&mut self, positions: &[Vec3]) -> Result<()> {
        self.vertex_count = positions.len();
        self.upload_count += 1;
        Ok(())
    }

    fn begin_frame(&mut self, viewport: Viewport) -> Result<()> {
        self.frames.push(RecordedFrame {
            viewport: Some(viewport),
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw_indexed(&mut self, draw: &SelectedView<'_>) -> Result<()> {
        let command = DrawCommand {
            segment_id: draw.segment.id(),
            level: draw.level,
            index_count: draw.view.len(),
        };

        if self.frames.is_empty() {
            self.frames.push(RecordedFrame::default());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.draws.push(command);
        }
        Ok(())
    }
}
