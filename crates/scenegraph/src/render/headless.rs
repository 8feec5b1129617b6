//! Backend that records submissions without a GPU

use super::{Material, Mesh, RenderBackend};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Counts everything it is asked to draw
///
/// Used by the demo binary in place of a window and by tests that need to see
/// what a traversal submitted. Counters accumulate until [`reset`](Self::reset).
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    /// Meshes submitted
    pub meshes: usize,
    /// Line strips submitted
    pub line_strips: usize,
    /// Wireframe spheres submitted
    pub wire_spheres: usize,
    /// Vertices across all mesh and line submissions
    pub vertices: usize,
    /// World-space origin of every mesh submission, in order
    pub mesh_origins: Vec<Vec3>,
    /// World-space center of every wire sphere submission, in order
    pub sphere_centers: Vec<Vec3>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Total submissions of any kind
    pub fn submissions(&self) -> usize {
        self.meshes + self.line_strips + self.wire_spheres
    }

    /// Clear all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl RenderBackend for HeadlessBackend {
    fn draw_mesh(&mut self, mesh: &Mesh, transform: &Mat4, _material: &Material) {
        self.meshes += 1;
        self.vertices += mesh.vertices.len();
        self.mesh_origins.push(transform.origin());
    }

    fn draw_lines(&mut self, points: &[Vec3], _transform: &Mat4, _material: &Material) {
        self.line_strips += 1;
        self.vertices += points.len();
    }

    fn draw_wire_sphere(&mut self, transform: &Mat4, _material: &Material) {
        self.wire_spheres += 1;
        self.sphere_centers.push(transform.origin());
    }
}
