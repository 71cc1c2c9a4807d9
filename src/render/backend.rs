//! Pool backend that uploads geometry to the GPU

use wgpu::util::DeviceExt;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::mesh::MeshData;
use crate::pool::{MaterialDescriptor, MaterialKind, ResourceBackend};

use super::buffer::MeshVertex;

/// Vertex and index buffers for one pooled geometry
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Resolved material parameters. Materials carry no GPU objects of their
/// own; they become per-draw uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpuMaterial {
    pub kind: MaterialKind,
    /// Linear RGB
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
}

/// Creates buffers on a shared device. Holds its own device handle so the
/// pool can outlive any one renderer borrow.
pub struct WgpuBackend {
    device: wgpu::Device,
    live_buffers: usize,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            live_buffers: 0,
        }
    }

    /// Buffers created and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers
    }
}

impl ResourceBackend for WgpuBackend {
    type Geometry = GpuMesh;
    type Material = GpuMaterial;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GpuMesh> {
        if mesh.indices.is_empty() || mesh.positions.is_empty() {
            return Err(Error::Gpu("cannot upload an empty mesh".into()));
        }

        let vertices = MeshVertex::interleave(mesh);
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.live_buffers += 2;

        Ok(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }

    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> Result<GpuMaterial> {
        descriptor.validate()?;
        Ok(GpuMaterial {
            kind: descriptor.kind,
            color: descriptor.linear_color(),
            opacity: descriptor.opacity.get(),
            transparent: descriptor.transparent,
        })
    }

    fn release_geometry(&mut self, geometry: GpuMesh) {
        geometry.vertex_buffer.destroy();
        geometry.index_buffer.destroy();
        self.live_buffers = self.live_buffers.saturating_sub(2);
    }

    fn release_material(&mut self, _material: GpuMaterial) {}
}
