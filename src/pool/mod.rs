//! Shared resource pool for geometries and materials.
//!
//! Many scene nodes reference the same cone, sphere, or colored material.
//! The pool hands out lightweight handles keyed by a canonical descriptor, so
//! each distinct descriptor is allocated once per pool lifetime. Handles are
//! read-only: per-instance variation lives in node transforms, never in the
//! shared resource.
//!
//! The pool is owned by one scene and disposed explicitly when that scene
//! unmounts. `dispose_all` bumps the pool generation, so handles issued
//! before disposal resolve to `None` afterwards instead of dangling.

pub mod backend;
pub mod budget;
pub mod descriptor;

pub use backend::{CpuBackend, ResourceBackend};
pub use budget::MemoryBudget;
pub use descriptor::{srgb_hex_to_linear, Dim, GeometryDescriptor, MaterialDescriptor, MaterialKind};

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::mesh::MeshData;

/// Handle to a pooled or unique geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle {
    index: u32,
    generation: u32,
}

/// Handle to a pooled material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle {
    index: u32,
    generation: u32,
}

/// Cumulative pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub requests: u64,
    pub hits: u64,
    pub geometries_created: u64,
    pub materials_created: u64,
    pub unique_created: u64,
    pub disposals: u64,
}

struct GeometrySlot<G> {
    resource: G,
    bytes: usize,
}

/// Descriptor-keyed cache of backend resources.
pub struct ResourcePool<B: ResourceBackend> {
    backend: B,
    generation: u32,
    geometry_keys: HashMap<GeometryDescriptor, GeometryHandle>,
    material_keys: HashMap<MaterialDescriptor, MaterialHandle>,
    geometries: Vec<GeometrySlot<B::Geometry>>,
    materials: Vec<B::Material>,
    unique_count: usize,
    budget: MemoryBudget,
    stats: PoolStats,
}

impl<B: ResourceBackend> ResourcePool<B> {
    /// Create an empty pool with a GPU memory budget in megabytes.
    pub fn new(backend: B, budget_mb: usize) -> Self {
        Self {
            backend,
            generation: 0,
            geometry_keys: HashMap::new(),
            material_keys: HashMap::new(),
            geometries: Vec::new(),
            materials: Vec::new(),
            unique_count: 0,
            budget: MemoryBudget::new(budget_mb),
            stats: PoolStats::default(),
        }
    }

    /// Get or lazily create the geometry for `descriptor`.
    pub fn get_geometry(&mut self, descriptor: &GeometryDescriptor) -> Result<GeometryHandle> {
        self.stats.requests += 1;
        if let Some(handle) = self.geometry_keys.get(descriptor) {
            self.stats.hits += 1;
            return Ok(*handle);
        }

        let mesh = descriptor.build_mesh()?;
        let handle = self.insert_geometry(&mesh)?;
        self.geometry_keys.insert(*descriptor, handle);
        self.stats.geometries_created += 1;
        log::debug!("Pool: created geometry {:?} ({} bytes)", descriptor, mesh.byte_size());
        Ok(handle)
    }

    /// Get or lazily create the material for `descriptor`.
    pub fn get_material(&mut self, descriptor: &MaterialDescriptor) -> Result<MaterialHandle> {
        self.stats.requests += 1;
        if let Some(handle) = self.material_keys.get(descriptor) {
            self.stats.hits += 1;
            return Ok(*handle);
        }

        descriptor.validate()?;
        let material = self.backend.create_material(descriptor)?;
        let handle = MaterialHandle {
            index: self.materials.len() as u32,
            generation: self.generation,
        };
        self.materials.push(material);
        self.material_keys.insert(*descriptor, handle);
        self.stats.materials_created += 1;
        log::debug!("Pool: created material {:?}", descriptor);
        Ok(handle)
    }

    /// Allocate a geometry that is never shared (e.g. a terrain heightfield).
    /// It is still released by `dispose_all`.
    pub fn allocate_unique(&mut self, mesh: &MeshData) -> Result<GeometryHandle> {
        let handle = self.insert_geometry(mesh)?;
        self.unique_count += 1;
        self.stats.unique_created += 1;
        Ok(handle)
    }

    fn insert_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle> {
        let resource = self.backend.create_geometry(mesh)?;
        let bytes = mesh.byte_size();
        self.budget.add(bytes);
        let handle = GeometryHandle {
            index: self.geometries.len() as u32,
            generation: self.generation,
        };
        self.geometries.push(GeometrySlot { resource, bytes });
        Ok(handle)
    }

    /// Resolve a geometry handle. Stale handles return `None`.
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&B::Geometry> {
        if handle.generation != self.generation {
            return None;
        }
        self.geometries.get(handle.index as usize).map(|slot| &slot.resource)
    }

    /// Resolve a material handle. Stale handles return `None`.
    pub fn material(&self, handle: MaterialHandle) -> Option<&B::Material> {
        if handle.generation != self.generation {
            return None;
        }
        self.materials.get(handle.index as usize)
    }

    /// Like [`geometry`](Self::geometry) but as a `Result`.
    pub fn try_geometry(&self, handle: GeometryHandle) -> Result<&B::Geometry> {
        self.geometry(handle).ok_or(Error::StaleHandle)
    }

    /// Like [`material`](Self::material) but as a `Result`.
    pub fn try_material(&self, handle: MaterialHandle) -> Result<&B::Material> {
        self.material(handle).ok_or(Error::StaleHandle)
    }

    /// Release every resource. Safe to call repeatedly and on an empty pool.
    ///
    /// The frame scheduler must be stopped first so no frame references a
    /// freed resource.
    pub fn dispose_all(&mut self) {
        let released = self.geometries.len() + self.materials.len();

        for slot in self.geometries.drain(..) {
            self.budget.remove(slot.bytes);
            self.backend.release_geometry(slot.resource);
        }
        for material in self.materials.drain(..) {
            self.backend.release_material(material);
        }
        self.geometry_keys.clear();
        self.material_keys.clear();
        self.unique_count = 0;
        self.budget.reset();
        self.generation = self.generation.wrapping_add(1);
        self.stats.disposals += 1;

        if released > 0 {
            log::info!("Pool: disposed {} resources", released);
        }
    }

    /// Number of distinct pooled geometries (unique allocations excluded).
    pub fn geometry_count(&self) -> usize {
        self.geometry_keys.len()
    }

    /// Number of unique (unpooled) geometries.
    pub fn unique_count(&self) -> usize {
        self.unique_count
    }

    /// Number of distinct pooled materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.materials.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn budget(&self) -> &MemoryBudget {
        &self.budget
    }

    /// Current GPU memory pressure (see [`MemoryBudget::pressure`]).
    pub fn memory_pressure(&self) -> f32 {
        self.budget.pressure()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ResourceBackend> Drop for ResourcePool<B> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
