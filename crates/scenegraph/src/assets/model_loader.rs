//! Model loading into drawable scene nodes

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::obj_loader::{ObjError, ObjLoader};
use crate::render::{Material, Mesh, MeshDrawable};
use crate::scene::DrawableNode;

/// Loads OBJ models relative to a base directory and hands out drawables
///
/// Each file is parsed once; later requests for the same path share the
/// cached mesh. A model that fails to load is reported with `log::error!`
/// and skipped, so a missing file leaves a hole in the scene instead of
/// aborting setup.
pub struct ModelLoader {
    base_dir: PathBuf,
    normalize_to: Option<f32>,
    cache: HashMap<PathBuf, Arc<Mesh>>,
}

impl ModelLoader {
    /// Resolve model paths against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            normalize_to: None,
            cache: HashMap::new(),
        }
    }

    /// Center every loaded mesh and scale its largest extent to `size`
    pub fn with_normalize(mut self, size: f32) -> Self {
        self.normalize_to = Some(size);
        self
    }

    /// Directory model paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of distinct meshes loaded so far
    pub fn cached_meshes(&self) -> usize {
        self.cache.len()
    }

    /// Load a mesh, reusing the cached copy when the file was seen before
    pub fn load_mesh(&mut self, path: impl AsRef<Path>) -> Result<Arc<Mesh>, ObjError> {
        let full_path = self.base_dir.join(path);
        if let Some(mesh) = self.cache.get(&full_path) {
            return Ok(Arc::clone(mesh));
        }

        let mut mesh = ObjLoader::load_obj(&full_path)?;
        if let Some(size) = self.normalize_to {
            mesh.normalize(size);
        }

        log::debug!(
            "Loaded model {} ({} vertices)",
            full_path.display(),
            mesh.vertices.len()
        );

        let mesh = Arc::new(mesh);
        self.cache.insert(full_path, Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Load `path` as a drawable node, or log the failure and return `None`
    pub fn load_drawable(
        &mut self,
        path: impl AsRef<Path>,
        name: &str,
        material: Material,
    ) -> Option<DrawableNode> {
        let path = path.as_ref();
        match self.load_mesh(path) {
            Ok(mesh) => Some(DrawableNode::new(
                name,
                Box::new(MeshDrawable::new(mesh)),
                material,
            )),
            Err(e) => {
                log::error!(
                    "Failed to load model '{}' from {}: {}",
                    name,
                    self.base_dir.join(path).display(),
                    e
                );
                None
            }
        }
    }
}
