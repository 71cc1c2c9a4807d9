//! Device, queue and swapchain for the scene window

use std::sync::Arc;
use winit::window::Window;

use crate::capability::ColorSpace;
use crate::core::error::Error;

/// GPU device plus the window surface it presents to
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    formats: Vec<wgpu::TextureFormat>,
}

impl GpuContext {
    /// Create new GPU context from window.
    ///
    /// Fails when no adapter can drive the window's surface; the host treats
    /// that as "no 3D available" and feeds it to capability detection.
    pub async fn new(window: Arc<Window>) -> Result<Self, Error> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())
            .map_err(|e| Error::Gpu(e.to_string()))?;

        // A marketing page should not wake the discrete GPU
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Gpu(format!("No suitable adapter found: {:?}", e)))?;

        let device_desc = wgpu::DeviceDescriptor {
            label: Some("ridgeline_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            experimental_features: Default::default(),
            trace: Default::default(),
        };

        let (device, queue) = adapter
            .request_device(&device_desc)
            .await
            .map_err(|e| Error::Gpu(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let size = window.inner_size();
        let capabilities = surface.get_capabilities(&adapter);
        let format = *capabilities
            .formats
            .first()
            .ok_or_else(|| Error::Gpu("surface reports no formats".into()))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            config,
            formats: capabilities.formats,
        })
    }

    /// Reconfigure the swapchain for the profile's output color space.
    /// Keeps the current format when no matching one is offered.
    pub fn set_color_space(&mut self, color_space: ColorSpace) {
        let want_srgb = color_space == ColorSpace::Srgb;
        if let Some(format) = self.formats.iter().copied().find(|f| f.is_srgb() == want_srgb) {
            if format != self.config.format {
                log::info!("Surface format {:?} -> {:?}", self.config.format, format);
                self.config.format = format;
                self.surface.configure(&self.device, &self.config);
            }
        }
    }

    /// Ignores zero sizes (minimized window).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) != self.size() {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Next swapchain image, or `None` when this frame should be dropped.
    /// Outdated and lost surfaces are reconfigured for the following frame.
    pub fn acquire_frame(&self) -> Result<Option<wgpu::SurfaceTexture>, Error> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("Surface outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface acquire timed out, dropping frame");
                Ok(None)
            }
            Err(e) => Err(Error::Gpu(e.to_string())),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}
