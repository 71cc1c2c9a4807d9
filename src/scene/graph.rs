//! Retained scene graph: a flat list of nodes
//!
//! The frame scheduler mutates nodes in place each tick from the mapper's
//! output; renderers walk [`SceneGraph::draw_items`] to issue draws.

use std::collections::BTreeMap;

use glam::Mat4;

use super::node::{MeshPart, NodeKind, SceneNode, SceneNodeId, Transform};
use crate::animation::FrameTransforms;
use crate::pool::{GeometryHandle, MaterialHandle};

/// One draw: geometry + material + world matrix + opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub node: SceneNodeId,
    pub kind: NodeKind,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub model: Mat4,
    pub opacity: f32,
}

/// CPU-side scene graph.
#[derive(Default)]
pub struct SceneGraph {
    nodes: BTreeMap<SceneNodeId, SceneNode>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a node. Returns the new node's ID.
    pub fn add(&mut self, kind: NodeKind, base: Transform, parts: Vec<MeshPart>) -> SceneNodeId {
        let id = self.alloc_id();
        self.nodes.insert(id, SceneNode::new(id, kind, base, parts));
        id
    }

    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn remove(&mut self, id: SceneNodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Drop every node. IDs are not reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Apply a mapper frame. Nodes without an entry keep their base
    /// placement and stay contributing.
    pub fn apply(&mut self, frame: &FrameTransforms) {
        for node in self.nodes.values_mut() {
            match frame.nodes.get(&node.id) {
                Some(f) => {
                    node.current = Transform {
                        position: f.position,
                        rotation: f.rotation,
                        scale: f.scale,
                    };
                    node.opacity = f.opacity;
                    node.contributing = f.contributing;
                }
                None => {
                    node.current = node.base;
                    node.opacity = 1.0;
                    node.contributing = true;
                }
            }
        }
    }

    /// Every part of every contributing node, in ID order.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem> + '_ {
        self.nodes
            .values()
            .filter(|n| n.contributing && n.opacity > 0.0)
            .flat_map(|node| {
                let world = node.world_matrix();
                node.parts.iter().map(move |part| DrawItem {
                    node: node.id,
                    kind: node.kind,
                    geometry: part.geometry,
                    material: part.material,
                    model: world * part.local.to_matrix(),
                    opacity: node.opacity,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{FrameTransforms, NodeFrame};
    use crate::mesh;
    use crate::pool::{CpuBackend, MaterialDescriptor, ResourcePool};
    use glam::{Quat, Vec3};

    fn parts(pool: &mut ResourcePool<CpuBackend>, n: usize) -> Vec<MeshPart> {
        let geometry = pool.allocate_unique(&mesh::grid(1.0, 1.0, 1)).unwrap();
        let material = pool.get_material(&MaterialDescriptor::lit(0x808080)).unwrap();
        (0..n).map(|_| MeshPart::new(geometry, material)).collect()
    }

    #[test]
    fn test_add_and_draw() {
        let mut pool = ResourcePool::new(CpuBackend::new(), 16);
        let mut graph = SceneGraph::new();
        let a = graph.add(NodeKind::Mountain, Transform::default(), parts(&mut pool, 1));
        let b = graph.add(NodeKind::Cloud, Transform::default(), parts(&mut pool, 3));
        assert_ne!(a, b);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.draw_items().count(), 4);
        assert_eq!(graph.count_kind(NodeKind::Cloud), 1);
    }

    #[test]
    fn test_apply_hides_non_contributing() {
        let mut pool = ResourcePool::new(CpuBackend::new(), 16);
        let mut graph = SceneGraph::new();
        let a = graph.add(NodeKind::Mountain, Transform::default(), parts(&mut pool, 1));
        let b = graph.add(NodeKind::Mountain, Transform::default(), parts(&mut pool, 1));

        let mut frame = FrameTransforms::default();
        frame.nodes.insert(
            a,
            NodeFrame {
                position: Vec3::new(0.0, -1000.0, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
                opacity: 0.0,
                contributing: false,
            },
        );
        graph.apply(&frame);

        // Hidden node is kept, just not drawn
        assert!(graph.get(a).is_some());
        assert!(!graph.get(a).unwrap().contributing);
        let drawn: Vec<_> = graph.draw_items().map(|d| d.node).collect();
        assert_eq!(drawn, vec![b]);
    }

    #[test]
    fn test_clear() {
        let mut graph = SceneGraph::new();
        let first = graph.add(NodeKind::SkyDome, Transform::default(), Vec::new());
        graph.clear();
        assert!(graph.is_empty());
        let second = graph.add(NodeKind::SkyDome, Transform::default(), Vec::new());
        assert_ne!(first, second);
    }
}
