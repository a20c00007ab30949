//! Math type re-exports and mesh bounds.
//!
//! This module re-exports the `glam` types used by mesh descriptions and
//! provides an axis-aligned bounding box.

pub use glam::Vec3;

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// 3D bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point set; `EMPTY` for no points.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bbox = Self::EMPTY;
        for &p in points {
            bbox.expand_by_point(p);
        }
        bbox
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

}

impl Default for BBox3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_points() {
        let b = BBox3f::from_points(&[Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 4.0, 2.0)]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 2.0));
    }

    #[test]
    fn test_bbox_empty() {
        assert!(BBox3f::from_points(&[]).is_empty());
        assert!(!BBox3f::new(Vec3::ZERO, Vec3::ZERO).is_empty());
    }
}
