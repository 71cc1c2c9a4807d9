//! CPU-side mesh data and primitive builders.

pub mod primitives;

pub use primitives::{cone, dome, grid, sphere};

use glam::Vec3;

/// Indexed triangle mesh with per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Approximate GPU footprint: positions + normals + indices.
    pub fn byte_size(&self) -> usize {
        self.positions.len() * std::mem::size_of::<[f32; 3]>() * 2
            + self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Recompute smooth per-vertex normals by accumulating area-weighted face
    /// normals. Call after displacing vertices.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            // Unnormalized cross product weights by triangle area
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }

    /// Axis-aligned bounds as (min, max). Empty meshes return zeros.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from(*p);
                (min.min(p), max.max(p))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, -1.0],
                [0.0, 0.0, -1.0],
            ],
            normals: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_recompute_normals_flat_quad() {
        let mut mesh = quad();
        mesh.recompute_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((Vec3::from(*n) - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn test_counts_and_size() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.byte_size(), 4 * 12 * 2 + 6 * 4);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = quad().bounds();
        assert_eq!(min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(MeshData::default().bounds(), (Vec3::ZERO, Vec3::ZERO));
    }
}
