//! Scene engine facade.
//!
//! [`SceneEngine`] owns one mounted scene: capability profile, resource pool,
//! scene graph, mapper, scroll tracker, frame scheduler and fallback
//! controller. The host drives it with lifecycle calls, input signals and one
//! [`SceneEngine::frame`] per display refresh. No error or renderer panic
//! escapes it; failures become a [`FallbackReason`] reported to observers.

pub mod config;
pub mod observer;

pub use config::EngineConfig;
pub use observer::{LogObserver, SceneObserver};

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use glam::Vec2;

use crate::animation::{MapperInput, ScrollMapper, SkyFrame, SmoothDamp};
use crate::capability::{detect, CapabilityProfile, DeviceProbe};
use crate::core::camera::Camera;
use crate::core::types::Result;
use crate::fallback::{FallbackController, FallbackReason, FallbackState, StaticPresentation, Transition};
use crate::generation::CancellationToken;
use crate::pool::{ResourceBackend, ResourcePool};
use crate::render::{Activity, FrameScheduler, FrameView, SceneRenderer, TickOutcome};
use crate::scene::{BuildProgress, SceneBuild, SceneBuildParams, SceneGraph};
use crate::scroll::{ScrollState, ScrollTracker};

/// Pointer smoothing counts as settled within this distance of its target
const POINTER_SETTLED: f32 = 1e-3;

/// One mounted scroll-driven scene.
pub struct SceneEngine<B: ResourceBackend, R: SceneRenderer<B>> {
    config: EngineConfig,
    profile: Option<CapabilityProfile>,
    pool: ResourcePool<B>,
    graph: SceneGraph,
    mapper: ScrollMapper,
    build: Option<SceneBuild>,
    cancel: CancellationToken,
    tracker: ScrollTracker,
    scheduler: FrameScheduler,
    controller: FallbackController,
    renderer: R,
    camera: Camera,
    sky: SkyFrame,
    pointer: SmoothDamp,
    pointer_moved: bool,
    visible: bool,
    mounted: bool,
    mounted_at: Option<Instant>,
    last_frame: Option<Instant>,
    observers: Vec<Box<dyn SceneObserver>>,
}

impl<B: ResourceBackend, R: SceneRenderer<B>> SceneEngine<B, R> {
    pub fn new(config: EngineConfig, backend: B, renderer: R) -> Result<Self> {
        config.validate()?;
        let mut mapper = ScrollMapper::from_preset(config.preset)?;
        mapper.set_parallax_enabled(config.enable_pointer_parallax);

        Ok(Self {
            profile: None,
            pool: ResourcePool::new(backend, config.memory_budget_mb),
            graph: SceneGraph::new(),
            mapper,
            build: None,
            cancel: CancellationToken::new(),
            tracker: ScrollTracker::new(config.idle_timeout()),
            scheduler: FrameScheduler::new(config.render_mode(), config.idle_frame_interval),
            controller: FallbackController::new(
                config.grace_period(),
                config.load_timeout(),
                config.fallback.clone(),
            ),
            renderer,
            camera: Camera::default(),
            sky: SkyFrame::default(),
            pointer: SmoothDamp::new(config.pointer_smoothing),
            pointer_moved: false,
            visible: true,
            mounted: false,
            mounted_at: None,
            last_frame: None,
            observers: Vec::new(),
            config,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SceneObserver>) {
        self.observers.push(observer);
    }

    /// Detect capabilities and start building. A capability shortfall
    /// falls back here, before any frame is scheduled.
    pub fn mount(&mut self, probe: &dyn DeviceProbe, now: Instant) -> FallbackState {
        if self.mounted {
            return self.controller.state();
        }
        let profile = detect(probe, self.config.force_tier);
        self.mount_with_profile(profile, now)
    }

    /// Mount with a profile the host already detected, so a renderer
    /// configured from it and the engine agree on one profile.
    ///
    /// Mounting again after [`unmount`](Self::unmount) starts a fresh
    /// session unless the previous one ended in the static fallback, which
    /// stays in place.
    pub fn mount_with_profile(&mut self, profile: CapabilityProfile, now: Instant) -> FallbackState {
        if self.mounted {
            return self.controller.state();
        }
        if self.controller.is_static() {
            log::info!("Not remounting: session already fell back");
            return self.controller.state();
        }
        if self.mounted_at.is_some() {
            self.reset_session();
        }
        self.mounted = true;
        self.mounted_at = Some(now);

        let transition = self.controller.begin(&profile, now);
        let build_params = SceneBuildParams::for_profile(
            &profile,
            self.config.seed,
            self.config.mountain_count,
            self.config.cloud_count,
            self.config.terrain_rows_per_frame,
        );
        self.profile = Some(profile);

        if let Some(Transition::Fallback(reason)) = transition {
            self.enter_static(reason);
            return self.controller.state();
        }

        log::info!(
            "Mounting scene: preset={:?} seed={} mountains={} clouds={}",
            self.config.preset,
            self.config.seed,
            build_params.mountain_count,
            build_params.cloud_count
        );
        self.build = Some(SceneBuild::new(build_params, self.cancel.clone()));
        if self.visible {
            self.scheduler.start();
        } else {
            self.controller.pause(now);
        }
        self.controller.state()
    }

    /// Fresh per-session state for a remount. The previous token stays
    /// cancelled for any build still holding it.
    fn reset_session(&mut self) {
        self.cancel = CancellationToken::new();
        let scrollable_height = self.tracker.scrollable_height();
        self.tracker = ScrollTracker::new(self.config.idle_timeout());
        self.tracker.set_scrollable_height(scrollable_height);
        self.controller = FallbackController::new(
            self.config.grace_period(),
            self.config.load_timeout(),
            self.config.fallback.clone(),
        );
        self.pointer = SmoothDamp::new(self.config.pointer_smoothing);
        self.pointer_moved = false;
        self.last_frame = None;
        self.camera = Camera::default();
        self.sky = SkyFrame::default();
    }

    /// Advance one display refresh. Returns whether a frame was drawn.
    pub fn frame(&mut self, now: Instant) -> TickOutcome {
        if !self.mounted || self.controller.is_static() {
            return TickOutcome::Stopped;
        }

        if let Some(Transition::Fallback(reason)) = self.controller.check_timeout(now) {
            self.enter_static(reason);
            return TickOutcome::Stopped;
        }
        if !self.scheduler.is_running() {
            return TickOutcome::Stopped;
        }

        if let Err(reason) = self.step_build(now) {
            self.fail(reason);
            return TickOutcome::Stopped;
        }

        let pressure = self.pool.memory_pressure();
        if pressure >= self.config.memory_pressure_threshold {
            log::warn!(
                "Memory pressure {:.2} over threshold, {} bytes left in budget",
                pressure,
                self.pool.budget().available()
            );
            self.fail(FallbackReason::MemoryPressure);
            return TickOutcome::Stopped;
        }

        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.pointer.update(dt);

        if self.build.is_some() {
            self.scheduler.request_redraw();
        }
        let activity = Activity {
            scrolling: self.tracker.is_active(now),
            pointer_moving: std::mem::take(&mut self.pointer_moved),
            settled: self.pointer.is_settled(POINTER_SETTLED),
        };
        let outcome = self.scheduler.tick(activity);
        if outcome != TickOutcome::Render {
            return outcome;
        }

        self.update_scene(now);
        match self.render_frame() {
            Ok(()) => {
                if self.controller.on_frame(now) == Some(Transition::Ready) {
                    for observer in &mut self.observers {
                        observer.on_ready();
                    }
                }
                TickOutcome::Render
            }
            Err(reason) => {
                self.fail(reason);
                TickOutcome::Stopped
            }
        }
    }

    fn step_build(&mut self, now: Instant) -> std::result::Result<(), FallbackReason> {
        let Some(build) = self.build.as_mut() else {
            return Ok(());
        };
        match build.step(&mut self.pool, &mut self.graph, &mut self.mapper) {
            Ok(BuildProgress::Pending { stage, fraction }) => {
                log::debug!("Building {} ({:.0}%)", stage, fraction * 100.0);
            }
            Ok(BuildProgress::Complete { nodes, skipped }) => {
                log::info!("Scene build complete: {} nodes, {} skipped", nodes, skipped);
                self.build = None;
                self.controller.on_build_complete(now);
            }
            Ok(BuildProgress::Cancelled) => {
                self.build = None;
            }
            Err(e) => {
                log::error!("Scene build failed: {}", e);
                self.build = None;
                return Err(FallbackReason::GenerationError);
            }
        }
        Ok(())
    }

    /// Sample scroll, evaluate the mapper, apply the result. Nothing is
    /// presented until all three have run.
    fn update_scene(&mut self, now: Instant) {
        let scroll = self.tracker.sample(now);
        let time_secs = self
            .mounted_at
            .map(|start| now.saturating_duration_since(start).as_secs_f32())
            .unwrap_or(0.0);
        let input = MapperInput::new(scroll.progress, self.pointer.value(), time_secs);
        let frame = self.mapper.evaluate(&input);

        self.graph.apply(&frame);
        self.camera.apply_pose(&frame.camera);
        self.sky = frame.sky;
    }

    fn render_frame(&mut self) -> std::result::Result<(), FallbackReason> {
        let Some(profile) = self.profile.as_ref() else {
            return Ok(());
        };
        let view = FrameView {
            graph: &self.graph,
            pool: &self.pool,
            camera: &self.camera,
            sky: &self.sky,
            profile,
        };
        let renderer = &mut self.renderer;
        match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&view))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                log::error!("Render failed: {}", e);
                Err(FallbackReason::RenderError)
            }
            Err(_) => {
                log::error!("Renderer panicked");
                Err(FallbackReason::RenderError)
            }
        }
    }

    /// Report a failure; the first one wins.
    fn fail(&mut self, reason: FallbackReason) {
        if let Some(Transition::Fallback(reason)) = self.controller.on_error(reason) {
            self.enter_static(reason);
        }
    }

    fn enter_static(&mut self, reason: FallbackReason) {
        self.teardown();
        for observer in &mut self.observers {
            observer.on_fallback(reason);
        }
        self.present_static();
    }

    fn present_static(&mut self) {
        if let Some(presentation) = self.controller.presentation() {
            if let Err(e) = self.renderer.present_static(presentation) {
                log::warn!("Static presentation failed: {}", e);
            }
        }
    }

    /// Stop frames, abandon in-flight generation, drop nodes, free
    /// resources. In that order: no frame may see a freed resource.
    fn teardown(&mut self) {
        self.scheduler.stop();
        self.cancel.cancel();
        self.build = None;
        self.mapper.clear_nodes();
        self.graph.clear();
        self.pool.dispose_all();
    }

    /// Tear down the scene. The engine stays unmounted afterwards.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.teardown();
        self.tracker.unsubscribe();
        self.mounted = false;
        log::info!("Scene unmounted");
    }

    pub fn on_scroll(&mut self, offset_px: f32, now: Instant) {
        self.tracker.on_scroll(offset_px, now);
    }

    pub fn set_scrollable_height(&mut self, height_px: f32) {
        self.tracker.set_scrollable_height(height_px);
    }

    /// Pointer in [-1, 1] on both axes, y up. Ignored when parallax is off.
    pub fn on_pointer_move(&mut self, pointer: Vec2) {
        if !self.config.enable_pointer_parallax || !pointer.is_finite() {
            return;
        }
        self.pointer.set_target(pointer.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)));
        self.pointer_moved = true;
    }

    /// Frames are only scheduled while the page is visible. The load
    /// timeout does not run while hidden.
    pub fn on_visibility_change(&mut self, visible: bool, now: Instant) {
        self.visible = visible;
        if !self.mounted || self.controller.is_static() {
            return;
        }
        if visible {
            self.controller.resume(now);
            self.scheduler.start();
        } else {
            self.controller.pause(now);
            self.scheduler.stop();
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32, height as f32);
        self.renderer.resize(width, height);
        if self.controller.is_static() {
            self.present_static();
        } else {
            self.scheduler.request_redraw();
        }
    }

    /// External low-memory signal from the host.
    pub fn signal_memory_pressure(&mut self) {
        self.fail(FallbackReason::MemoryPressure);
    }

    pub fn state(&self) -> FallbackState {
        self.controller.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn profile(&self) -> Option<&CapabilityProfile> {
        self.profile.as_ref()
    }

    /// The static view, once fallen back.
    pub fn presentation(&self) -> Option<&StaticPresentation> {
        self.controller.presentation()
    }

    pub fn scroll_state(&self, now: Instant) -> ScrollState {
        self.tracker.sample(now)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn pool(&self) -> &ResourcePool<B> {
        &self.pool
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
