//! View frustum built from camera parameters and the bounding-sphere test

use super::Camera;
use crate::foundation::math::Vec3;

/// Plane defined by a point on it and an outward unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Unit normal pointing out of the frustum
    pub normal: Vec3,
}

impl Plane {
    /// Create a plane; `normal` is normalized here
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Signed distance from the plane to `p`, positive on the outside
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        p.dot(&self.normal) - self.point.dot(&self.normal)
    }
}

/// Six-plane view frustum
///
/// Plane order is near, far, left, right, top, bottom; see the `*_PLANE`
/// index constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Frustum planes with outward normals
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Index of the near plane
    pub const NEAR_PLANE: usize = 0;
    /// Index of the far plane
    pub const FAR_PLANE: usize = 1;
    /// Index of the left plane
    pub const LEFT_PLANE: usize = 2;
    /// Index of the right plane
    pub const RIGHT_PLANE: usize = 3;
    /// Index of the top plane
    pub const TOP_PLANE: usize = 4;
    /// Index of the bottom plane
    pub const BOTTOM_PLANE: usize = 5;

    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Build the frustum for `camera`
    ///
    /// The camera must satisfy [`Camera::validate`]; a degenerate camera
    /// produces NaN normals, and every test against them fails.
    pub fn from_camera(camera: &Camera) -> Self {
        let eye = camera.position;
        let forward = camera.look_direction().normalize();
        let right = forward.cross(&camera.up).normalize();
        let up = right.cross(&forward);

        let near_center = eye + forward * camera.near;
        let far_center = eye + forward * camera.far;

        let near_height = 2.0 * (camera.fov / 2.0).tan() * camera.near;
        let near_width = near_height * camera.aspect;

        // Directions from the eye through the midpoints of the near-plane edges
        let to_right = (near_center + right * (near_width / 2.0) - eye).normalize();
        let to_left = (near_center - right * (near_width / 2.0) - eye).normalize();
        let to_top = (near_center + up * (near_height / 2.0) - eye).normalize();
        let to_bottom = (near_center - up * (near_height / 2.0) - eye).normalize();

        Self::new([
            Plane::new(near_center, -forward),
            Plane::new(far_center, forward),
            Plane::new(eye, up.cross(&to_left)),
            Plane::new(eye, to_right.cross(&up)),
            Plane::new(eye, right.cross(&to_top)),
            Plane::new(eye, to_bottom.cross(&right)),
        ])
    }

    /// Number of planes the sphere is conservatively inside of
    ///
    /// A plane counts when the signed distance is strictly less than the
    /// radius, so a sphere exactly touching a plane from outside fails it.
    pub fn planes_passed(&self, center: Vec3, radius: f32) -> usize {
        self.planes
            .iter()
            .filter(|plane| plane.distance_to_point(center) < radius)
            .count()
    }

    /// True when the sphere passes all six planes
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes_passed(center, radius) == self.planes.len()
    }

    /// True when the point is strictly inside all six planes
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.intersects_sphere(point, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::default()
    }

    #[test]
    fn test_plane_signed_distance() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(plane.normal, Vec3::y());
        assert_relative_eq!(plane.distance_to_point(Vec3::new(5.0, 7.0, -1.0)), 5.0);
        assert_relative_eq!(plane.distance_to_point(Vec3::new(0.0, -1.0, 0.0)), -3.0);
    }

    #[test]
    fn test_planes_face_outward() {
        let frustum = Frustum::from_camera(&camera());
        let planes = &frustum.planes;

        // camera looks down -Z from (0, 0, 20)
        assert_relative_eq!(planes[Frustum::NEAR_PLANE].normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(planes[Frustum::FAR_PLANE].normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert!(planes[Frustum::LEFT_PLANE].normal.x < 0.0);
        assert!(planes[Frustum::RIGHT_PLANE].normal.x > 0.0);
        assert!(planes[Frustum::TOP_PLANE].normal.y > 0.0);
        assert!(planes[Frustum::BOTTOM_PLANE].normal.y < 0.0);
        for plane in planes {
            assert_relative_eq!(plane.normal.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_side_planes_match_field_of_view() {
        let frustum = Frustum::from_camera(&camera());
        // 60° vertical FOV: the top plane is tilted 30° from the look direction
        let top = frustum.planes[Frustum::TOP_PLANE].normal;
        assert_relative_eq!(top.dot(&Vec3::new(0.0, 0.0, -1.0)), -(30.0_f32.to_radians().sin()), epsilon = 1e-5);

        // a point just inside the top edge at distance 10 is visible, just outside is not
        let half_height = 10.0 * 30.0_f32.to_radians().tan();
        assert!(frustum.contains_point(Vec3::new(0.0, half_height - 0.01, 10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, half_height + 0.01, 10.0)));
    }

    #[test]
    fn test_sphere_straddling_a_plane_is_visible() {
        let frustum = Frustum::from_camera(&camera());
        // center behind the near plane, but the sphere reaches past it
        assert!(frustum.intersects_sphere(Vec3::new(0.0, 0.0, 19.5), 1.0));
        // just behind the eye only the near plane rejects it
        assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 20.5), 1.0));
        assert_eq!(frustum.planes_passed(Vec3::new(0.0, 0.0, 20.5), 1.0), 5);
    }

    #[test]
    fn test_touching_sphere_is_culled() {
        let frustum = Frustum::from_camera(&camera());
        let far_plane = frustum.planes[Frustum::FAR_PLANE];
        // exactly one radius beyond the far plane: d == radius fails the strict test
        let center = far_plane.point + far_plane.normal * 2.0;
        assert_relative_eq!(far_plane.distance_to_point(center), 2.0, epsilon = 1e-3);
        assert!(!frustum.intersects_sphere(center, 2.0));
        assert!(frustum.intersects_sphere(center, 2.5));
    }

    #[test]
    fn test_degenerate_camera_culls_everything() {
        let mut camera = camera();
        camera.target = camera.position;
        let frustum = Frustum::from_camera(&camera);
        assert!(!frustum.intersects_sphere(Vec3::zeros(), 1.0));
    }
}
