//! Depth and multisample color targets sized to the surface

use wgpu::{Device, Extent3d, Texture, TextureView};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Depth buffer plus an optional MSAA color buffer that resolves into the
/// swapchain image.
pub struct RenderTargets {
    #[allow(dead_code)]
    depth: Texture,
    depth_view: TextureView,
    #[allow(dead_code)]
    msaa: Option<Texture>,
    msaa_view: Option<TextureView>,
    format: wgpu::TextureFormat,
    sample_count: u32,
    width: u32,
    height: u32,
}

impl RenderTargets {
    pub fn new(device: &Device, format: wgpu::TextureFormat, width: u32, height: u32, sample_count: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let sample_count = sample_count.max(1);
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_target"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let msaa = (sample_count > 1).then(|| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("msaa_color_target"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
        });
        let msaa_view = msaa
            .as_ref()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()));

        Self {
            depth,
            depth_view,
            msaa,
            msaa_view,
            format,
            sample_count,
            width,
            height,
        }
    }

    /// Recreate at a new size. No-op when the size is unchanged.
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        if (width.max(1), height.max(1)) != (self.width, self.height) {
            *self = Self::new(device, self.format, width, height, self.sample_count);
        }
    }

    pub fn depth_view(&self) -> &TextureView {
        &self.depth_view
    }

    /// Color attachment and resolve target for a frame drawn into `surface`.
    pub fn color_views<'a>(&'a self, surface: &'a TextureView) -> (&'a TextureView, Option<&'a TextureView>) {
        match &self.msaa_view {
            Some(msaa) => (msaa, Some(surface)),
            None => (surface, None),
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
