//! Bounding sphere attached to a group node

use super::Frustum;
use crate::foundation::math::{Mat4, Mat4Ext};

/// Sphere centered on the origin of the group it is attached to
///
/// Only the translation of the accumulated transform is used for the test;
/// the radius is taken as-is and is not affected by scale in the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere radius in world units
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a sphere with `radius`
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Radius is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }

    /// Whether the sphere, placed by `world`, passes all frustum planes
    pub fn is_visible(&self, world: &Mat4, frustum: &Frustum) -> bool {
        frustum.intersects_sphere(world.origin(), self.radius)
    }

    /// Model matrix for drawing a unit wireframe sphere at this bound
    pub fn wire_transform(&self, world: &Mat4) -> Mat4 {
        Mat4::new_translation(&world.origin()) * Mat4::new_scaling(self.radius)
    }
}
