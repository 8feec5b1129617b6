//! Asset loading: OBJ meshes and the model loader that turns them into
//! drawable scene nodes

pub mod obj_loader;
pub mod model_loader;

pub use obj_loader::{ObjError, ObjLoader};
pub use model_loader::ModelLoader;
