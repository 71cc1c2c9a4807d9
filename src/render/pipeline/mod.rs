//! Render pipelines

pub mod backdrop;
pub mod mesh;

pub use backdrop::{BackdropPipeline, BackdropUniform};
pub use mesh::MeshPipeline;
