//! GPU buffer management

pub mod scene_buffer;
pub mod vertex;

pub use scene_buffer::{sun_direction, ObjectBuffer, ObjectUniform, SceneBuffer, SceneUniform};
pub use vertex::MeshVertex;
