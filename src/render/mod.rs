//! Rendering: the renderer seam, frame scheduling, and the wgpu backend

pub mod backend;
pub mod buffer;
pub mod context;
pub mod pipeline;
pub mod renderer;
pub mod scheduler;
pub mod texture;
pub mod wgpu_renderer;
pub mod window;

pub use backend::{GpuMaterial, GpuMesh, WgpuBackend};
pub use context::GpuContext;
pub use renderer::{FrameView, HeadlessRenderer, SceneRenderer};
pub use scheduler::{Activity, FrameScheduler, RenderMode, TickOutcome};
pub use wgpu_renderer::WgpuRenderer;
