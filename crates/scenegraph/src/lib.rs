//! # Scenegraph
//!
//! A retained scene graph with hierarchical transform propagation and
//! bounding-sphere frustum culling.
//!
//! ## Features
//!
//! - **Hierarchical transforms**: every node is drawn with the product of
//!   its ancestors' local matrices
//! - **Frustum culling**: groups carrying a bounding sphere are tested
//!   against the camera frustum and skipped with their whole subtree
//! - **Animation**: swinging limbs and a closed Bezier track with a cart
//! - **Assets**: OBJ loading with a shared mesh cache
//! - **Headless rendering**: a counting backend for tools and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use scenegraph::prelude::*;
//!
//! let cube = Arc::new(Mesh::cube());
//! let robot = GroupNode::new("robot", Mat4::new_translation(&Vec3::new(0.0, 0.0, -5.0)))
//!     .with_bounds(2.2)
//!     .with_child(DrawableNode::new("body", Box::new(MeshDrawable::new(cube)), Material::default()));
//!
//! let mut scene = Scene::new(GroupNode::identity("world").with_child(robot), Camera::default()).unwrap();
//! let stats = scene.frame(1.0 / 60.0, &mut HeadlessBackend::new());
//! assert_eq!(stats.objects_rendered, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod render;
pub mod assets;
pub mod animation;
pub mod scene;

/// Common imports for scene graph users
pub mod prelude {
    pub use crate::{
        animation::{Axis, BezierCurve, Swing, SwingDirection, Track, TrackDrawable},
        assets::{ModelLoader, ObjError, ObjLoader},
        config::{Config, ConfigError, SceneConfig},
        foundation::{
            math::{Mat4, Mat4Ext, Vec3},
            time::Timer,
        },
        render::{Drawable, HeadlessBackend, Material, Mesh, MeshDrawable, RenderBackend},
        scene::{
            BoundingSphere, Camera, DrawableNode, Frustum, GroupNode, RenderStats, Scene, SceneError,
            SceneNode,
        },
    };
}
