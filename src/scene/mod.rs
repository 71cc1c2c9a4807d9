//! Retained scene graph and the incremental scene build

pub mod builder;
pub mod graph;
pub mod node;

pub use builder::{BuildProgress, SceneBuild, SceneBuildParams};
pub use graph::{DrawItem, SceneGraph};
pub use node::{MeshPart, NodeKind, SceneNode, SceneNodeId, Transform};
