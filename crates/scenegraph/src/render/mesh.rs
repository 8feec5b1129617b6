//! CPU-side mesh data
//!
//! Meshes are plain vertex/index arrays. A drawable holds its mesh behind an
//! [`Arc`] so the robot army can reuse one cube for every body part without
//! copying vertex data per instance.

use std::any::Any;
use std::sync::Arc;

use super::{Drawable, Material, RenderBackend};
use crate::foundation::math::{constants::PI, Mat4, Vec3};

/// Vertex with position, normal, and texture coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }

    /// Position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Unit cube centered at the origin with corners at ±1
    ///
    /// Each face has its own four vertices so normals stay flat:
    /// 24 vertices, 36 indices.
    pub fn cube() -> Self {
        // (normal, tangent u, tangent v) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (base, (normal, u, v)) in (0u32..).step_by(4).zip(faces) {
            let n = Vec3::from(normal);
            let u = Vec3::from(u);
            let v = Vec3::from(v);

            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = n + u * su + v * sv;
                vertices.push(Vertex::new(
                    p.into(),
                    normal,
                    [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
                ));
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// Unit UV sphere centered at the origin
    ///
    /// `stacks` and `slices` are clamped to at least 2 and 3.
    #[allow(clippy::cast_precision_loss)]
    pub fn uv_sphere(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let phi = v * PI;
            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let theta = u * 2.0 * PI;
                let p = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
                vertices.push(Vertex::new(p, p, [u, v]));
            }
        }

        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Number of triangles described by the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned extents as `(min, max)`, or `None` for an empty mesh
    pub fn extents(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position();
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = v.position();
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// Distance from the model origin to the farthest vertex
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position().norm())
            .fold(0.0, f32::max)
    }

    /// Center the mesh on its box midpoint and scale it so the largest
    /// extent equals `target_size`
    ///
    /// Normals are unaffected by a uniform scale and are left alone.
    pub fn normalize(&mut self, target_size: f32) {
        let Some((min, max)) = self.extents() else {
            return;
        };

        let center = (min + max) * 0.5;
        let largest = (max - min).max();
        let scale = if largest > 0.0 { target_size / largest } else { 1.0 };

        for vertex in &mut self.vertices {
            let p = (vertex.position() - center) * scale;
            vertex.position = p.into();
        }
    }
}

/// Drawable that submits one shared mesh
#[derive(Debug, Clone)]
pub struct MeshDrawable {
    mesh: Arc<Mesh>,
    local: Mat4,
}

impl MeshDrawable {
    /// Draw `mesh` with the node's accumulated transform
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            mesh,
            local: Mat4::identity(),
        }
    }

    /// Apply an extra model matrix after the accumulated transform
    ///
    /// Lets a single shared unit mesh be drawn at a part-specific size.
    pub fn with_local(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    /// Shared mesh data
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }
}

impl Drawable for MeshDrawable {
    fn draw(&self, transform: &Mat4, material: &Material, backend: &mut dyn RenderBackend) {
        backend.draw_mesh(&self.mesh, &(transform * self.local), material);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
