//! Scene graph with hierarchical transforms and frustum culling
//!
//! ## Architecture
//!
//! ```text
//! Scene (camera, toggles, stats)
//!   └─ GroupNode (local matrix, bounds?, swing?)
//!        ├─ GroupNode ...
//!        └─ DrawableNode (Box<dyn Drawable>, Material)
//! ```
//!
//! Every frame the scene runs two traversals from the root with the identity
//! matrix:
//! - `update` advances animation and hands each child `parent * local`
//! - `draw` repeats the composition and, at every group carrying a bounding
//!   sphere, tests the sphere against the active frustum; a failing subtree is
//!   skipped for this frame only
//!
//! Accumulated transforms are never stored, only passed down the recursion.

mod bounds;
mod camera;
mod frustum;
mod node;
mod scene_manager;
mod stats;

#[cfg(test)]
mod tests;

pub use bounds::BoundingSphere;
pub use camera::{trackball_point, Camera};
pub use frustum::{Frustum, Plane};
pub use node::{DrawPass, DrawableNode, GroupNode, SceneNode, UpdatePass};
pub use scene_manager::Scene;
pub use stats::RenderStats;

use thiserror::Error;

/// Errors raised while building or validating a scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A group carries a bounding sphere with a non-positive or non-finite radius
    #[error("Invalid bounding sphere on group '{group}': radius {radius}")]
    InvalidBounds {
        /// Offending group
        group: String,
        /// Rejected radius
        radius: f32,
    },

    /// A node's local matrix is not a finite affine transform
    #[error("Invalid transform on node '{node}': {reason}")]
    InvalidTransform {
        /// Offending node
        node: String,
        /// What is wrong with the matrix
        reason: String,
    },

    /// Camera parameters do not describe a usable frustum
    #[error("Degenerate camera: {0}")]
    DegenerateCamera(String),

    /// Track control points do not form a closed chain of cubic curves
    #[error("Invalid track: {0}")]
    InvalidTrack(String),
}
