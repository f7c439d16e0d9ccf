//! Reduced-density index lists.

/// An ordered list of position indices used as the index buffer of one draw.
///
/// A view keeps at most one point per grid cell of size [`spacing`]
/// (world units). The full-density view has a spacing of zero.
///
/// [`spacing`]: IndexView::spacing
#[derive(Debug, Clone, PartialEq)]
pub struct IndexView {
    indices: Vec<u32>,
    spacing: f32,
    pixel_scale: f32,
}

impl IndexView {
    /// Creates a view over the given indices.
    pub fn new(indices: Vec<u32>, spacing: f32, pixel_scale: f32) -> Self {
        Self {
            indices,
            spacing,
            pixel_scale,
        }
    }

    /// Creates the full-density view over `indices`.
    pub fn full(indices: Vec<u32>) -> Self {
        Self::new(indices, 0.0, 0.0)
    }

    /// Returns the indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the indices as raw bytes for an index buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Returns the number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the view holds no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the world-space cell size this view was reduced with.
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Returns the pixel distance between represented points when the
    /// segment spans the reference resolution.
    #[must_use]
    pub fn pixel_scale(&self) -> f32 {
        self.pixel_scale
    }

    /// Returns true for the view holding every point of its segment.
    #[must_use]
    pub fn is_full_density(&self) -> bool {
        self.spacing == 0.0 && self.pixel_scale == 0.0
    }

    /// Returns the on-screen spacing in pixels at the given projection scale.
    #[must_use]
    pub fn projected_spacing(&self, pixels_per_unit: f32) -> f32 {
        self.spacing * pixels_per_unit
    }
}
