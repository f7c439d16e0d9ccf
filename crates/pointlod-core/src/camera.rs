//! Camera and viewport description supplied by the host application.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::bounds::BoundingVolume;
use crate::ray::Ray;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// Render target size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns width / height, or 1.0 for an empty viewport.
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Returns the size as floats.
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Converts normalized device coordinates to pixel coordinates
    /// (origin at the top-left corner, y down).
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        let size = self.size();
        Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }

    /// Converts pixel coordinates to normalized device coordinates.
    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        let half = self.size() * 0.5;
        Vec2::new(pixel.x / half.x - 1.0, 1.0 - pixel.y / half.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Eye, framing and projection that produce a frame's view-projection matrix.
///
/// Projection matrices follow glam's right-handed `*_rh` convention and map
/// depth to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Look-at point.
    pub target: Vec3,
    /// World direction that maps to screen up.
    pub up: Vec3,
    /// Vertical field of view in radians (perspective only).
    pub fov: f32,
    /// Viewport width over height.
    pub aspect_ratio: f32,
    /// Distance to the near clip plane.
    pub near: f32,
    /// Distance to the far clip plane.
    pub far: f32,
    /// Perspective or orthographic.
    pub projection_mode: ProjectionMode,
    /// Half of the visible height in world units (orthographic only).
    pub ortho_scale: f32,
}

impl Camera {
    /// Creates a perspective camera three units up +Z, looking at the origin.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::Z * 3.0,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_scale: 1.0,
        }
    }

    /// Creates a camera matching the viewport's aspect ratio.
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::new(viewport.aspect_ratio())
    }

    /// World-to-eye transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Eye-to-clip transform.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        if self.projection_mode == ProjectionMode::Perspective {
            return Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far);
        }
        let half = Vec2::new(self.ortho_scale * self.aspect_ratio, self.ortho_scale);
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, self.near, self.far)
    }

    /// World-to-clip transform, as consumed by view selection.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frames `bounds` from `distance_factor` diagonals up its +Z side and
    /// fits the clip planes and orthographic height around it.
    pub fn look_at_bounds(&mut self, bounds: &BoundingVolume, distance_factor: f32) {
        let size = bounds.diagonal().max(1e-3);
        let distance = size * distance_factor;

        self.target = bounds.center();
        self.position = self.target + Vec3::Z * distance;
        self.near = (distance - size).max(size * 0.001);
        self.far = distance + size * 2.0;

        let extents = bounds.extents();
        self.ortho_scale = (extents.y.max(extents.x / self.aspect_ratio) * 0.6).max(0.1);
    }

    /// Returns the ray from the camera through a pixel of the viewport.
    ///
    /// Returns `None` for an empty viewport or a degenerate projection.
    pub fn screen_ray(&self, viewport: Viewport, pixel: Vec2) -> Option<Ray> {
        if viewport.is_empty() {
            return None;
        }

        let ndc = viewport.pixel_to_ndc(pixel);
        let inv_view_proj = self.view_projection_matrix().inverse();

        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return None;
        }

        let origin = near.truncate() / near.w;
        let direction = (far.truncate() / far.w - origin).normalize_or_zero();
        if direction.length_squared() < 1e-12 {
            return None;
        }

        Some(Ray { origin, direction })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
