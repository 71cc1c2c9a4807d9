//! Forward mesh pipeline for pooled scene geometry

use crate::render::buffer::MeshVertex;
use crate::render::texture::DEPTH_FORMAT;

/// Opaque and alpha-blended variants of the scene mesh pipeline.
///
/// Both share one shader and layout: scene uniforms in group 0, per-object
/// uniforms with a dynamic offset in group 1. Back faces are drawn because the
/// sky dome is viewed from inside.
pub struct MeshPipeline {
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
}

impl MeshPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[scene_layout, object_layout],
            immediate_size: 0,
        });

        let build = |label: &str, blend: Option<wgpu::BlendState>, depth_write_enabled: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::layout()],
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count.max(1),
                    ..Default::default()
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build("mesh_opaque_pipeline", Some(wgpu::BlendState::REPLACE), true);
        let transparent = build("mesh_transparent_pipeline", Some(wgpu::BlendState::ALPHA_BLENDING), false);

        Self { opaque, transparent }
    }

    pub fn opaque(&self) -> &wgpu::RenderPipeline {
        &self.opaque
    }

    pub fn transparent(&self) -> &wgpu::RenderPipeline {
        &self.transparent
    }
}
