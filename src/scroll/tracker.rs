//! Event-driven scroll tracking.
//!
//! The host forwards scroll events through [`ScrollTracker::on_scroll`]; the
//! frame scheduler pulls one [`ScrollState`] per frame with
//! [`ScrollTracker::sample`], so bursts of events between frames collapse
//! into a single update. The idle window is evaluated lazily at sample time
//! against the timestamp of the last event.

use std::time::{Duration, Instant};

use super::state::{ScrollDirection, ScrollState};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(150);

pub struct ScrollTracker {
    offset_px: f32,
    scrollable_height: f32,
    direction: Option<ScrollDirection>,
    last_event: Option<Instant>,
    idle_timeout: Duration,
    subscribed: bool,
}

impl ScrollTracker {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            offset_px: 0.0,
            scrollable_height: 0.0,
            direction: None,
            last_event: None,
            idle_timeout,
            subscribed: true,
        }
    }

    /// Total scrollable distance (content height minus viewport height).
    pub fn set_scrollable_height(&mut self, height_px: f32) {
        self.scrollable_height = if height_px.is_finite() { height_px.max(0.0) } else { 0.0 };
    }

    pub fn scrollable_height(&self) -> f32 {
        self.scrollable_height
    }

    /// Record a scroll event. Ignored after [`unsubscribe`](Self::unsubscribe)
    /// or when the offset is not a number.
    pub fn on_scroll(&mut self, offset_px: f32, now: Instant) {
        if !self.subscribed || !offset_px.is_finite() {
            return;
        }
        if offset_px > self.offset_px {
            self.direction = Some(ScrollDirection::Down);
        } else if offset_px < self.offset_px {
            self.direction = Some(ScrollDirection::Up);
        }
        self.offset_px = offset_px;
        self.last_event = Some(now);
    }

    pub fn sample(&self, now: Instant) -> ScrollState {
        let progress = if self.scrollable_height > 0.0 {
            (self.offset_px / self.scrollable_height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ScrollState {
            offset_px: self.offset_px,
            progress,
            direction: self.direction,
            is_active: self.is_active(now),
        }
    }

    /// True until `idle_timeout` has passed since the last event.
    pub fn is_active(&self, now: Instant) -> bool {
        self.last_event
            .is_some_and(|last| now.saturating_duration_since(last) < self.idle_timeout)
    }

    /// Stop listening. Later events are dropped; the last state stays readable.
    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.last_event = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}
