//! Renderer seam between the engine and a drawing backend.

use crate::animation::SkyFrame;
use crate::capability::CapabilityProfile;
use crate::core::camera::Camera;
use crate::core::types::Result;
use crate::fallback::StaticPresentation;
use crate::pool::{ResourceBackend, ResourcePool};
use crate::scene::SceneGraph;

/// Everything a renderer may read for one frame. The graph has already had
/// the frame's transforms applied.
pub struct FrameView<'a, B: ResourceBackend> {
    pub graph: &'a SceneGraph,
    pub pool: &'a ResourcePool<B>,
    pub camera: &'a Camera,
    pub sky: &'a SkyFrame,
    pub profile: &'a CapabilityProfile,
}

/// Draws a scene whose resources live in backend `B`.
pub trait SceneRenderer<B: ResourceBackend> {
    /// Draw and present one frame.
    fn render(&mut self, view: &FrameView<'_, B>) -> Result<()>;

    /// Output size changed, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Show the static presentation in place of the scene. Renderers that
    /// leave the static view to the host keep the default.
    fn present_static(&mut self, presentation: &StaticPresentation) -> Result<()> {
        let _ = presentation;
        Ok(())
    }
}

/// Renderer that resolves every draw against the pool without drawing.
/// Used by headless hosts and benchmarks.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last_draw_count: usize,
    pub size: (u32, u32),
    pub static_presented: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: ResourceBackend> SceneRenderer<B> for HeadlessRenderer {
    fn render(&mut self, view: &FrameView<'_, B>) -> Result<()> {
        let mut draws = 0;
        for item in view.graph.draw_items() {
            view.pool.try_geometry(item.geometry)?;
            view.pool.try_material(item.material)?;
            draws += 1;
        }
        self.frames += 1;
        self.last_draw_count = draws;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn present_static(&mut self, _presentation: &StaticPresentation) -> Result<()> {
        self.static_presented = true;
        Ok(())
    }
}
