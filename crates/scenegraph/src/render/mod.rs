//! # Render surface
//!
//! The scene graph never talks to a graphics API directly. Leaves implement
//! [`Drawable`] and submit geometry through a [`RenderBackend`], which a real
//! renderer implements on top of its GPU resources. [`HeadlessBackend`] is the
//! in-crate implementation used by the demo binary and the tests; it only
//! counts what it is asked to draw.

pub mod mesh;
pub mod headless;

pub use mesh::{Mesh, MeshDrawable, Vertex};
pub use headless::HeadlessBackend;

use std::any::Any;

use crate::foundation::math::{Mat4, Vec3};

/// Surface appearance handed to the backend with every submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (linear RGB)
    pub color: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Material {
    /// White material
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = Vec3::new(r, g, b);
        self
    }

    /// Red, used for bounding-sphere wireframes and track anchors
    pub fn red() -> Self {
        Self::new().with_color(1.0, 0.0, 0.0)
    }
}

/// Backend that receives draw submissions during scene traversal
///
/// All transforms are fully accumulated model-to-world matrices. Submissions
/// cannot fail from the scene's point of view; a backend that loses its device
/// is expected to drop work and report it through its own channel.
pub trait RenderBackend {
    /// Draw an indexed triangle mesh
    fn draw_mesh(&mut self, mesh: &Mesh, transform: &Mat4, material: &Material);

    /// Draw a connected line strip through `points`
    fn draw_lines(&mut self, points: &[Vec3], transform: &Mat4, material: &Material);

    /// Draw a unit wireframe sphere; `transform` carries center and radius
    fn draw_wire_sphere(&mut self, transform: &Mat4, material: &Material);
}

/// Leaf of the scene graph that owns its own render resources
pub trait Drawable {
    /// Submit this drawable with the accumulated transform of its parent chain
    fn draw(&self, transform: &Mat4, material: &Material, backend: &mut dyn RenderBackend);

    /// Advance per-frame state; most drawables are static
    fn update(&mut self, _transform: &Mat4, _delta_time: f32) {}

    /// Get as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get as mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
