//! Fullscreen gradient for the static fallback presentation

use bytemuck::{Pod, Zeroable};

use crate::fallback::StaticPresentation;
use crate::pool::srgb_hex_to_linear;

/// Gradient stops the shader can blend
pub const MAX_STOPS: usize = 4;

/// Backdrop uniform (must match `Backdrop` in backdrop.wgsl), 96 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BackdropUniform {
    /// Linear RGB, alpha unused
    pub colors: [[f32; 4]; MAX_STOPS],
    pub offsets: [f32; MAX_STOPS],
    pub count: u32,
    pub _pad: [u32; 3],
}

impl BackdropUniform {
    /// Pack the first [`MAX_STOPS`] stops. An empty gradient renders black.
    pub fn from_presentation(presentation: &StaticPresentation) -> Self {
        let mut uniform = Self::zeroed();
        for (i, stop) in presentation.gradient.iter().take(MAX_STOPS).enumerate() {
            let [r, g, b] = srgb_hex_to_linear(stop.color);
            uniform.colors[i] = [r, g, b, 1.0];
            uniform.offsets[i] = stop.offset;
            uniform.count += 1;
        }
        uniform
    }
}

/// Draws the static gradient as one fullscreen triangle
pub struct BackdropPipeline {
    pipeline: wgpu::RenderPipeline,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BackdropPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/backdrop.wgsl").into()),
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("backdrop_uniform"),
            size: std::mem::size_of::<BackdropUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("backdrop_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("backdrop_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            buffer,
            bind_group,
        }
    }

    /// Draw the gradient over the whole target
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        presentation: &StaticPresentation,
    ) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&BackdropUniform::from_presentation(presentation)));

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("backdrop_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::GradientStop;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<BackdropUniform>(), 96);
    }

    #[test]
    fn test_packs_at_most_max_stops() {
        let presentation = StaticPresentation {
            gradient: (0..6)
                .map(|i| GradientStop {
                    offset: i as f32 / 5.0,
                    color: 0xffffff,
                })
                .collect(),
            ..Default::default()
        };
        let uniform = BackdropUniform::from_presentation(&presentation);
        assert_eq!(uniform.count, MAX_STOPS as u32);
        assert!(uniform.colors[0].iter().all(|c| (c - 1.0).abs() < 1e-5));
        assert!((uniform.offsets[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_gradient() {
        let presentation = StaticPresentation {
            gradient: Vec::new(),
            ..Default::default()
        };
        assert_eq!(BackdropUniform::from_presentation(&presentation).count, 0);
    }
}
