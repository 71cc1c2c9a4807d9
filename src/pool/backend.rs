//! Backend seam between the pool and whatever owns real GPU objects.

use std::sync::Arc;

use crate::core::types::Result;
use crate::mesh::MeshData;

use super::descriptor::MaterialDescriptor;

/// Creates and releases the concrete resources behind pooled handles.
pub trait ResourceBackend {
    type Geometry;
    type Material;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<Self::Geometry>;
    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> Result<Self::Material>;
    fn release_geometry(&mut self, geometry: Self::Geometry);
    fn release_material(&mut self, material: Self::Material);
}

/// Backend that keeps meshes in memory. Used headless and in tests.
#[derive(Debug, Default)]
pub struct CpuBackend {
    pub geometries_created: usize,
    pub materials_created: usize,
    pub geometries_released: usize,
    pub materials_released: usize,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources created but not yet released.
    pub fn live_resources(&self) -> usize {
        (self.geometries_created + self.materials_created)
            - (self.geometries_released + self.materials_released)
    }
}

impl ResourceBackend for CpuBackend {
    type Geometry = Arc<MeshData>;
    type Material = MaterialDescriptor;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<Self::Geometry> {
        self.geometries_created += 1;
        Ok(Arc::new(mesh.clone()))
    }

    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> Result<Self::Material> {
        self.materials_created += 1;
        Ok(*descriptor)
    }

    fn release_geometry(&mut self, _geometry: Self::Geometry) {
        self.geometries_released += 1;
    }

    fn release_material(&mut self, _material: Self::Material) {
        self.materials_released += 1;
    }
}
