//! Forward renderer for the live scene and the static backdrop

use std::cmp::Ordering;

use crate::capability::CapabilityProfile;
use crate::core::types::Result;
use crate::fallback::StaticPresentation;
use crate::pool::GeometryHandle;

use super::backend::WgpuBackend;
use super::buffer::{ObjectBuffer, ObjectUniform, SceneBuffer, SceneUniform};
use super::context::GpuContext;
use super::pipeline::{BackdropPipeline, MeshPipeline};
use super::renderer::{FrameView, SceneRenderer};
use super::texture::RenderTargets;

struct Draw {
    uniform: usize,
    geometry: GeometryHandle,
    transparent: bool,
    /// Squared distance to the camera
    depth: f32,
}

/// Draws the scene graph in one forward pass: opaque nodes first, then
/// translucent ones back to front.
pub struct WgpuRenderer {
    ctx: GpuContext,
    scene_buffer: SceneBuffer,
    objects: ObjectBuffer,
    mesh_pipeline: MeshPipeline,
    backdrop: BackdropPipeline,
    targets: RenderTargets,
    uniforms: Vec<ObjectUniform>,
    draws: Vec<Draw>,
}

impl WgpuRenderer {
    /// Build pipelines for the context's current surface format. Configure
    /// the color space on the context before calling this.
    pub fn new(ctx: GpuContext, profile: &CapabilityProfile) -> Self {
        let sample_count = if profile.antialias_enabled { profile.msaa_samples.max(1) } else { 1 };
        let scene_buffer = SceneBuffer::new(&ctx.device);
        let objects = ObjectBuffer::new(&ctx.device);
        let mesh_pipeline = MeshPipeline::new(
            &ctx.device,
            ctx.format(),
            scene_buffer.bind_group_layout(),
            objects.bind_group_layout(),
            sample_count,
        );
        let backdrop = BackdropPipeline::new(&ctx.device, ctx.format());
        let (width, height) = ctx.size();
        let targets = RenderTargets::new(&ctx.device, ctx.format(), width, height, sample_count);

        log::info!(
            "Renderer ready: {}x{}, {:?}, {}x MSAA",
            width,
            height,
            ctx.format(),
            sample_count
        );

        Self {
            ctx,
            scene_buffer,
            objects,
            mesh_pipeline,
            backdrop,
            targets,
            uniforms: Vec::new(),
            draws: Vec::new(),
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    fn collect_draws(&mut self, view: &FrameView<'_, WgpuBackend>) -> Result<()> {
        self.uniforms.clear();
        self.draws.clear();

        for item in view.graph.draw_items() {
            let material = view.pool.try_material(item.material)?;
            view.pool.try_geometry(item.geometry)?;
            let opacity = item.opacity * material.opacity;
            if opacity <= 0.0 {
                continue;
            }
            let origin = item.model.w_axis.truncate();
            self.draws.push(Draw {
                uniform: self.uniforms.len(),
                geometry: item.geometry,
                transparent: material.transparent || opacity < 1.0,
                depth: view.camera.position.distance_squared(origin),
            });
            self.uniforms.push(ObjectUniform::new(item.model, material.kind, material.color, opacity));
        }

        self.draws.sort_by(|a, b| {
            a.transparent.cmp(&b.transparent).then_with(|| {
                if a.transparent {
                    b.depth.total_cmp(&a.depth)
                } else {
                    Ordering::Equal
                }
            })
        });
        Ok(())
    }
}

impl SceneRenderer<WgpuBackend> for WgpuRenderer {
    fn render(&mut self, view: &FrameView<'_, WgpuBackend>) -> Result<()> {
        self.collect_draws(view)?;
        let Some(frame) = self.ctx.acquire_frame()? else {
            return Ok(());
        };

        self.scene_buffer.update(&self.ctx.queue, &SceneUniform::new(view.camera, view.sky));
        self.objects.upload(&self.ctx.device, &self.ctx.queue, &self.uniforms);

        let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let (color_view, resolve_target) = self.targets.color_views(&surface_view);
            let [r, g, b] = view.sky.horizon;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.targets.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, self.scene_buffer.bind_group(), &[]);
            for draw in &self.draws {
                let mesh = view.pool.try_geometry(draw.geometry)?;
                let pipeline = if draw.transparent {
                    self.mesh_pipeline.transparent()
                } else {
                    self.mesh_pipeline.opaque()
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, self.objects.bind_group(), &[self.objects.offset(draw.uniform)]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.targets.resize(&self.ctx.device, width, height);
    }

    fn present_static(&mut self, presentation: &StaticPresentation) -> Result<()> {
        let Some(frame) = self.ctx.acquire_frame()? else {
            return Ok(());
        };
        let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("backdrop_encoder"),
        });
        self.backdrop.render(&self.ctx.queue, &mut encoder, &surface_view, presentation);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
