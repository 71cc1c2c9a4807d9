//! GPU uniform buffers for per-frame scene data and per-draw object data

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::animation::SkyFrame;
use crate::core::camera::Camera;
use crate::generation::SKY_RADIUS;
use crate::pool::MaterialKind;

/// Scene uniform data for GPU (must match `Scene` in mesh.wgsl)
/// WGSL vec3 has 16-byte alignment, so each vec3 is followed by a scalar
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    /// View-projection matrix (64 bytes, offset 0)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space (offset 64)
    pub camera_position: [f32; 3],
    pub _pad0: f32,
    /// Direction towards the sun (offset 80)
    pub sun_direction: [f32; 3],
    /// Directional light multiplier (offset 92)
    pub light_intensity: f32,
    /// Sky zenith color, linear RGB (offset 96)
    pub zenith: [f32; 3],
    pub _pad1: f32,
    /// Sky horizon color, linear RGB (offset 112)
    pub horizon: [f32; 3],
    /// Dome radius used to normalize sky height (offset 124)
    pub sky_radius: f32,
}

impl SceneUniform {
    pub fn new(camera: &Camera, sky: &SkyFrame) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.to_array(),
            _pad0: 0.0,
            sun_direction: sun_direction(sky.sun_elevation).to_array(),
            light_intensity: sky.light_intensity,
            zenith: sky.zenith,
            _pad1: 0.0,
            horizon: sky.horizon,
            sky_radius: SKY_RADIUS,
        }
    }
}

/// Unit vector towards a sun at `elevation` radians, arcing over the scene
/// from behind the right shoulder.
pub fn sun_direction(elevation: f32) -> Vec3 {
    let (sin, cos) = elevation.sin_cos();
    Vec3::new(0.35 * cos, sin, -cos).try_normalize().unwrap_or(Vec3::Y)
}

/// Per-draw data (must match `Object` in mesh.wgsl), 160 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix for normals
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGB + final opacity
    pub color: [f32; 4],
    /// 0 = lit, 1 = unlit, 2 = sky
    pub shading: u32,
    pub _pad: [u32; 3],
}

impl ObjectUniform {
    pub fn new(model: Mat4, kind: MaterialKind, color: [f32; 3], opacity: f32) -> Self {
        let normal = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
            shading: shading_index(kind),
            _pad: [0; 3],
        }
    }
}

fn shading_index(kind: MaterialKind) -> u32 {
    match kind {
        MaterialKind::Lit => 0,
        MaterialKind::Unlit => 1,
        MaterialKind::Sky => 2,
    }
}

/// Scene uniform buffer and its bind group (group 0)
pub struct SceneBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl SceneBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniform"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Growable array of [`ObjectUniform`]s addressed by dynamic offset (group 1)
pub struct ObjectBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    /// Bytes between consecutive objects, rounded up to the device alignment
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl ObjectBuffer {
    const INITIAL_CAPACITY: usize = 64;

    pub fn new(device: &wgpu::Device) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let size = std::mem::size_of::<ObjectUniform>() as u64;
        let stride = size.div_ceil(alignment) * alignment;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size),
                },
                count: None,
            }],
        });

        let (buffer, bind_group) = Self::allocate(device, &bind_group_layout, stride, Self::INITIAL_CAPACITY);

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            stride,
            capacity: Self::INITIAL_CAPACITY,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Upload this frame's objects, growing the buffer if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, objects: &[ObjectUniform]) {
        if objects.len() > self.capacity {
            let capacity = objects.len().next_power_of_two();
            let (buffer, bind_group) = Self::allocate(device, &self.bind_group_layout, self.stride, capacity);
            log::debug!("Object buffer grown {} -> {}", self.capacity, capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
        }

        self.staging.clear();
        self.staging.resize(objects.len() * self.stride as usize, 0);
        for (i, object) in objects.iter().enumerate() {
            let start = i * self.stride as usize;
            let bytes = bytemuck::bytes_of(object);
            self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, &self.staging);
        }
    }

    /// Dynamic offset of object `index`.
    pub fn offset(&self, index: usize) -> u32 {
        (index as u64 * self.stride) as u32
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn test_sun_direction() {
        let noon = sun_direction(std::f32::consts::FRAC_PI_2);
        assert!((noon - Vec3::Y).length() < 1e-5);
        let horizon = sun_direction(0.0);
        assert!(horizon.y.abs() < 1e-6);
        assert!((horizon.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_object_uniform_normal_matrix() {
        let model = Mat4::from_scale(Vec3::new(2.0, 4.0, 2.0));
        let object = ObjectUniform::new(model, MaterialKind::Lit, [1.0, 0.5, 0.25], 0.5);
        assert_eq!(object.color, [1.0, 0.5, 0.25, 0.5]);
        assert!((object.normal_matrix[1][1] - 0.25).abs() < 1e-6);

        let flat = ObjectUniform::new(Mat4::from_scale(Vec3::ZERO), MaterialKind::Sky, [0.0; 3], 1.0);
        assert_eq!(flat.normal_matrix, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(flat.shading, 2);
    }
}
