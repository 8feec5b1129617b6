//! Math utilities and types
//!
//! Provides the f32 math aliases used across the scene graph and the
//! `Mat4Ext` extension trait used by the camera, the frustum test and the
//! animation code.

pub use nalgebra::{Matrix4, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation of `degrees` around an arbitrary (not necessarily unit) axis
    fn rotation_deg(axis: Vec3, degrees: f32) -> Mat4;

    /// Create a right-handed OpenGL-style perspective projection
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// World-space origin of an affine matrix (its translation column)
    fn origin(&self) -> Vec3;

    /// True when every entry is finite and the bottom row is `(0, 0, 0, 1)`
    fn is_affine(&self) -> bool;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_deg(axis: Vec3, degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&Unit::new_normalize(axis), utils::deg_to_rad(degrees))
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn origin(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn is_affine(&self) -> bool {
        self.iter().all(|v| v.is_finite())
            && self[(3, 0)] == 0.0
            && self[(3, 1)] == 0.0
            && self[(3, 2)] == 0.0
            && self[(3, 3)] == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_origin_reads_translation_column() {
        let m = Mat4::new_translation(&Vec3::new(3.0, -2.0, 7.5)) * Mat4::rotation_y(0.7);
        assert_relative_eq!(m.origin(), Vec3::new(3.0, -2.0, 7.5), epsilon = EPSILON);
    }

    #[test]
    fn test_affine_detection() {
        assert!(Mat4::identity().is_affine());
        assert!(Mat4::rotation_deg(Vec3::new(0.0, 1.0, -1.0), 15.0).is_affine());

        let mut projective = Mat4::identity();
        projective[(3, 2)] = -1.0;
        assert!(!projective.is_affine());

        let mut broken = Mat4::identity();
        broken[(0, 3)] = f32::NAN;
        assert!(!broken.is_affine());
    }

    #[test]
    fn test_degree_conversion_roundtrip() {
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(60.0)), 60.0, epsilon = 1e-4);
    }
}
