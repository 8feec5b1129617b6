//! # Scene Camera
//!
//! Perspective camera consumed read-only during traversal. The frustum used
//! for culling is derived from these parameters each frame (see
//! [`Frustum::from_camera`](super::Frustum::from_camera)), so every mutation
//! here takes effect on the next draw.
//!
//! The controller helpers at the bottom of the impl (`zoom`, `orbit`,
//! `pan_target`, `ride`) are what an input layer calls between frames.

use nalgebra::{Rotation3, Unit};

use super::SceneError;
use crate::foundation::math::{constants::PI, utils, Mat4, Mat4Ext, Vec3};

/// Smallest accepted length for direction vectors and cross products
const DIRECTION_EPSILON: f32 = 1e-6;

/// Below this `|outward x Y|` the rider camera switches its up vector to +Z
const RIDE_UP_EPSILON: f32 = 1e-3;

/// Perspective camera
///
/// # Coordinate System
/// Right-handed, Y-up. The camera looks from `position` towards `target`;
/// `up` does not need to be perpendicular to the look direction but must not
/// be parallel to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position (eye) in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Default for Camera {
    /// Eye at (0, 0, 20) looking at the origin, 60° FOV, 640x480, near 1, far 1000
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 20.0), 60.0, 640.0 / 480.0, 1.0, 1000.0)
    }
}

impl Camera {
    /// Smallest field of view reachable through [`zoom`](Self::zoom), in degrees
    pub const MIN_FOV_DEGREES: f32 = 1.0;

    /// Largest field of view reachable through [`zoom`](Self::zoom), in degrees
    pub const MAX_FOV_DEGREES: f32 = 179.0;

    /// Create a new perspective camera looking at the origin with +Y up
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees (stored in radians)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use scenegraph::foundation::math::Vec3;
    /// use scenegraph::scene::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 0.0, 20.0), 60.0, 4.0 / 3.0, 1.0, 1000.0);
    /// assert!(camera.validate().is_ok());
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Set the look-at point and up vector together
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update the aspect ratio after a viewport change
    ///
    /// Only changes larger than 0.01 are logged.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Vertical field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        utils::rad_to_deg(self.fov)
    }

    /// Unnormalized look direction `target - position`
    pub fn look_direction(&self) -> Vec3 {
        self.target - self.position
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Check that the parameters describe a usable frustum
    ///
    /// # Errors
    /// [`SceneError::DegenerateCamera`] when any of these hold:
    /// - a parameter is not finite
    /// - the look direction is zero
    /// - `fov` is not in (0°, 180°)
    /// - `near <= 0` or `near >= far`
    /// - `aspect <= 0`
    /// - `up` is zero or parallel to the look direction
    pub fn validate(&self) -> Result<(), SceneError> {
        let finite = self.position.iter().all(|v| v.is_finite())
            && self.target.iter().all(|v| v.is_finite())
            && self.up.iter().all(|v| v.is_finite())
            && self.fov.is_finite()
            && self.aspect.is_finite()
            && self.near.is_finite()
            && self.far.is_finite();
        if !finite {
            return Err(degenerate("non-finite camera parameter"));
        }

        let forward = self.look_direction();
        if forward.norm() <= DIRECTION_EPSILON {
            return Err(degenerate("look direction is zero (eye == target)"));
        }
        if self.fov <= 0.0 || self.fov >= PI {
            return Err(degenerate(format!(
                "field of view {:.2}° outside (0°, 180°)",
                self.fov_degrees()
            )));
        }
        if self.near <= 0.0 {
            return Err(degenerate(format!("near plane {} must be positive", self.near)));
        }
        if self.near >= self.far {
            return Err(degenerate(format!(
                "near plane {} must be closer than far plane {}",
                self.near, self.far
            )));
        }
        if self.aspect <= 0.0 {
            return Err(degenerate(format!("aspect ratio {} must be positive", self.aspect)));
        }
        if forward.normalize().cross(&self.up).norm() <= DIRECTION_EPSILON {
            return Err(degenerate("up vector is zero or parallel to the look direction"));
        }
        Ok(())
    }

    /// Scale the field of view by `factor`, clamped to
    /// [`MIN_FOV_DEGREES`](Self::MIN_FOV_DEGREES)..=[`MAX_FOV_DEGREES`](Self::MAX_FOV_DEGREES)
    ///
    /// A scroll-wheel step uses 0.95 to zoom in and 1/0.95 to zoom out.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring invalid zoom factor {}", factor);
            return;
        }
        let degrees = (self.fov_degrees() * factor).clamp(Self::MIN_FOV_DEGREES, Self::MAX_FOV_DEGREES);
        self.fov = utils::deg_to_rad(degrees);
        log::trace!("Camera fov set to {:.2}°", degrees);
    }

    /// Move the look-at point by `delta`, keeping the eye in place
    pub fn pan_target(&mut self, delta: Vec3) {
        self.set_target(self.target + delta);
    }

    /// Rotate the eye around the target by `angle` radians about `axis`
    ///
    /// A zero axis leaves the camera unchanged.
    pub fn orbit(&mut self, axis: Vec3, angle: f32) {
        let Some(axis) = Unit::try_new(axis, DIRECTION_EPSILON) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, angle);
        let offset = rotation * (self.position - self.target);
        self.set_position(self.target + offset);
    }

    /// First-person view from a track cart at `cart`
    ///
    /// The eye sits just outside the cart along the direction from the origin
    /// and looks further out along the same direction.
    pub fn ride(&mut self, cart: Vec3) {
        let outward = cart
            .try_normalize(DIRECTION_EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));
        // +Y is parallel to the view above or below the origin
        let up = if outward.cross(&Vec3::y()).norm() > RIDE_UP_EPSILON {
            Vec3::y()
        } else {
            Vec3::z()
        };
        self.position = cart + outward * 0.1;
        self.look_at(cart + outward * 5.0, up);
    }
}

fn degenerate(reason: impl Into<String>) -> SceneError {
    SceneError::DegenerateCamera(reason.into())
}

/// Map a cursor position onto the unit trackball hemisphere
///
/// The viewport center maps to (0, 0, 1); points on or outside the inscribed
/// circle land on the rim.
#[allow(clippy::cast_precision_loss)]
pub fn trackball_point(x: f32, y: f32, width: u32, height: u32) -> Vec3 {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let mut v = Vec3::new((2.0 * x - w) / w, (h - 2.0 * y) / h, 0.0);
    let d = v.norm().min(1.0);
    v.z = (1.001 - d * d).sqrt();
    v.normalize()
}
