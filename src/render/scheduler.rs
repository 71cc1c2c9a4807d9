//! Frame scheduling and render-on-demand throttling.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::time::{FpsWindow, FrameTimer};

/// How aggressively idle frames are skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Render every tick
    Continuous,
    /// Skip ticks while nothing is moving
    #[default]
    OnDemand,
}

/// What is moving this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Activity {
    pub scrolling: bool,
    pub pointer_moving: bool,
    /// Camera smoothing has reached its target
    pub settled: bool,
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        !self.scrolling && !self.pointer_moving && self.settled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Render,
    Skip,
    /// Unmounted, hidden, or fallen back
    Stopped,
}

/// Decides which ticks produce a frame.
///
/// In on-demand mode an idle scene still renders every
/// `idle_frame_interval`th tick so ambient drift and bob keep moving, only
/// at a lower rate.
pub struct FrameScheduler {
    mode: RenderMode,
    idle_frame_interval: u32,
    running: bool,
    idle_ticks: u32,
    redraw_requested: bool,
    rendered: u64,
    skipped: u64,
    timer: FrameTimer,
}

impl FrameScheduler {
    pub fn new(mode: RenderMode, idle_frame_interval: u32) -> Self {
        Self {
            mode,
            idle_frame_interval: idle_frame_interval.max(1),
            running: false,
            idle_ticks: 0,
            redraw_requested: false,
            rendered: 0,
            skipped: 0,
            timer: FrameTimer::new(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Frame scheduler started ({:?})", self.mode);
        }
        self.running = true;
        self.redraw_requested = true;
    }

    /// Stop issuing frames. Takes effect on the next tick.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame scheduler stopped after {} frames", self.rendered);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Force the next tick to render (resize, visibility regained).
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn tick(&mut self, activity: Activity) -> TickOutcome {
        if !self.running {
            return TickOutcome::Stopped;
        }

        let render = match self.mode {
            RenderMode::Continuous => true,
            RenderMode::OnDemand if self.redraw_requested || !activity.is_idle() => {
                self.idle_ticks = 0;
                true
            }
            RenderMode::OnDemand => {
                self.idle_ticks += 1;
                if self.idle_ticks >= self.idle_frame_interval {
                    self.idle_ticks = 0;
                    true
                } else {
                    false
                }
            }
        };

        if render {
            self.redraw_requested = false;
            self.rendered += 1;
            self.timer.record(Instant::now());
            TickOutcome::Render
        } else {
            self.skipped += 1;
            TickOutcome::Skip
        }
    }

    pub fn rendered_frames(&self) -> u64 {
        self.rendered
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Rendered-frame rate over the recent history.
    pub fn fps(&self) -> FpsWindow {
        self.timer.fps_window()
    }
}
