//! Axis-aligned bounding volumes.

use glam::{Mat4, Vec3, Vec4};

use crate::ray::Ray;

/// An axis-aligned box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingVolume {
    /// Creates a bounding volume from two corners.
    ///
    /// The corners are reordered per axis, so any two opposite corners work.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Computes the bounding volume of a set of points.
    ///
    /// Non-finite points are skipped. Returns `None` if no finite point exists.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut finite = points.iter().copied().filter(|p| p.is_finite());
        let first = finite.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in finite {
            bounds.expand(p);
        }
        Some(bounds)
    }

    /// Grows the volume to include a point.
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size along each axis.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the largest size along any axis.
    pub fn max_extent(&self) -> f32 {
        self.extents().max_element()
    }

    /// Returns the length of the diagonal.
    pub fn diagonal(&self) -> f32 {
        self.extents().length()
    }

    /// Returns the eight corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Returns whether the point lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns the volume grown by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Returns the corners transformed into homogeneous clip space.
    pub fn clip_corners(&self, view_projection: &Mat4) -> [Vec4; 8] {
        self.corners().map(|c| *view_projection * c.extend(1.0))
    }

    /// Returns whether the volume lies entirely outside the clip cube.
    ///
    /// The cube is `-w <= x, y, z <= w` in homogeneous coordinates, i.e.
    /// `[-1, 1]^3` after the perspective divide. A volume is rejected only
    /// when all eight corners are outside the same plane, so volumes that
    /// straddle a frustum corner may be kept.
    pub fn is_outside_clip_volume(&self, view_projection: &Mat4) -> bool {
        let corners = self.clip_corners(view_projection);
        let all_outside = |test: fn(&Vec4) -> bool| corners.iter().all(test);

        all_outside(|c| c.x < -c.w)
            || all_outside(|c| c.x > c.w)
            || all_outside(|c| c.y < -c.w)
            || all_outside(|c| c.y > c.w)
            || all_outside(|c| c.z < -c.w)
            || all_outside(|c| c.z > c.w)
    }

    /// Returns the ray parameter range `[t_near, t_far]` inside the volume,
    /// restricted to `t >= 0`, or `None` if the ray misses.
    pub fn intersects_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }
}
