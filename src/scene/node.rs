//! Scene graph node types
//!
//! Core types for the retained scene: node IDs, transforms, mesh parts, and nodes.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::pool::{GeometryHandle, MaterialHandle};

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneNodeId(pub u32);

/// What a node depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Mountain,
    Cloud,
    Terrain,
    SkyDome,
    CelestialBody,
}

/// Position, rotation, and non-uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// One drawable piece of a node: a pooled geometry/material pair placed
/// relative to the node origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshPart {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub local: Transform,
}

impl MeshPart {
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            geometry,
            material,
            local: Transform::default(),
        }
    }

    pub fn with_local(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }
}

/// A node in the scene graph.
///
/// `base` is the authored placement; `current` is what the last applied
/// frame put there. Nodes outside their visibility window stay in the graph
/// with `contributing` cleared so they can re-enter without being rebuilt.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub kind: NodeKind,
    pub base: Transform,
    pub current: Transform,
    pub parts: Vec<MeshPart>,
    pub opacity: f32,
    pub contributing: bool,
}

impl SceneNode {
    pub fn new(id: SceneNodeId, kind: NodeKind, base: Transform, parts: Vec<MeshPart>) -> Self {
        Self {
            id,
            kind,
            base,
            current: base,
            parts,
            opacity: 1.0,
            contributing: true,
        }
    }

    /// World matrix for the current frame.
    pub fn world_matrix(&self) -> Mat4 {
        self.current.to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::new(2.0, 4.0, 2.0));
        let p = t.to_matrix().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((p - Vec3::new(3.0, 6.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_ids_order() {
        assert!(SceneNodeId(1) < SceneNodeId(2));
    }
}
