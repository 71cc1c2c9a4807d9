//! Ridgeline demo host: a window whose mouse wheel drives a virtual page

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use ridgeline::capability::{detect, SystemProbe};
use ridgeline::core::input::InputState;
use ridgeline::core::logging;
use ridgeline::engine::{EngineConfig, LogObserver, SceneEngine};
use ridgeline::pool::CpuBackend;
use ridgeline::render::window::{self, WindowConfig};
use ridgeline::render::{GpuContext, HeadlessRenderer, WgpuBackend, WgpuRenderer};

/// Height of the virtual page the wheel scrolls through
const PAGE_HEIGHT_PX: f32 = 6000.0;

type GpuEngine = SceneEngine<WgpuBackend, WgpuRenderer>;

struct App {
    config: EngineConfig,
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    engine: Option<GpuEngine>,
    input: InputState,
    scroll_offset: f32,
}

impl App {
    fn new(config: EngineConfig) -> Self {
        let window_config = WindowConfig::default();
        let input = InputState::new(window_config.width, window_config.height);
        Self {
            config,
            window_config,
            window: None,
            engine: None,
            input,
            scroll_offset: 0.0,
        }
    }

    fn scrollable_height(&self) -> f32 {
        (PAGE_HEIGHT_PX - self.input.window_size().1).max(0.0)
    }

    fn create_engine(&self, window: Arc<Window>) -> Result<GpuEngine, ridgeline::core::Error> {
        let mut ctx = pollster::block_on(GpuContext::new(window))?;
        let probe = SystemProbe::new(true);
        let profile = detect(&probe, self.config.force_tier);
        ctx.set_color_space(profile.color_space);

        let backend = WgpuBackend::new(ctx.device.clone());
        let renderer = WgpuRenderer::new(ctx, &profile);
        let mut engine = SceneEngine::new(self.config.clone(), backend, renderer)?;
        engine.add_observer(Box::new(LogObserver));
        // The renderer was configured from this profile; hand the same one over
        engine.mount_with_profile(profile, Instant::now());
        Ok(engine)
    }

    /// No surface to draw on: run detection once so the fallback is still
    /// reported, then give up.
    fn report_unavailable(&self) {
        let engine = SceneEngine::new(self.config.clone(), CpuBackend::new(), HeadlessRenderer::new());
        match engine {
            Ok(mut engine) => {
                engine.add_observer(Box::new(LogObserver));
                engine.mount(&SystemProbe::new(false), Instant::now());
            }
            Err(e) => log::error!("Invalid engine config: {}", e),
        }
    }

    fn pump_input(&mut self, now: Instant) {
        let scrollable = self.scrollable_height();
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        let delta = self.input.take_scroll_delta();
        if delta != 0.0 {
            self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, scrollable);
            engine.on_scroll(self.scroll_offset, now);
        }
        if let Some(pointer) = self.input.take_pointer() {
            engine.on_pointer_move(pointer);
        }
        if let Some(visible) = self.input.take_visibility_change() {
            engine.on_visibility_change(visible, now);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.window_config.attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        self.input = InputState::new(size.width, size.height);

        match self.create_engine(window.clone()) {
            Ok(mut engine) => {
                engine.set_scrollable_height(self.scrollable_height());
                engine.on_resize(size.width, size.height);
                log::info!("Engine mounted: {:?}", engine.state());
                self.engine = Some(engine);
            }
            Err(e) => {
                log::error!("GPU unavailable: {}", e);
                self.report_unavailable();
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.unmount();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scrollable = self.scrollable_height();
                self.scroll_offset = self.scroll_offset.min(scrollable);
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_scrollable_height(scrollable);
                    engine.on_resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                self.pump_input(now);
                if let Some(engine) = self.engine.as_mut() {
                    engine.frame(now);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                return;
            }
        },
        None => EngineConfig::default(),
    };

    let mut app = App::new(config);
    if let Err(e) = window::run(&mut app) {
        log::error!("{}", e);
    }
}
