//! Host input translation
//!
//! Turns raw window events into the three signals the scene engine consumes:
//! a scroll offset delta, a normalized pointer position, and tab visibility.

use glam::Vec2;
use winit::event::{MouseScrollDelta, WindowEvent};

/// Pixels scrolled per wheel "line"
pub const LINE_HEIGHT_PX: f32 = 40.0;

/// Map a cursor position in pixels to `[-1, 1]` on both axes (y up).
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (x / width) * 2.0 - 1.0,
        1.0 - (y / height) * 2.0,
    )
    .clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Tracks pointer, wheel, and visibility state between frames
pub struct InputState {
    window_size: (f32, f32),
    pointer: Vec2,
    pointer_moved: bool,
    /// Wheel movement accumulated since the last `take_scroll_delta`
    scroll_delta_px: f32,
    visible: bool,
    visibility_changed: bool,
}

impl InputState {
    /// Create new input state
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width as f32, height as f32),
            pointer: Vec2::ZERO,
            pointer_moved: false,
            scroll_delta_px: 0.0,
            visible: true,
            visibility_changed: false,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.window_size = (size.width as f32, size.height as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = normalize_pointer(
                    position.x as f32,
                    position.y as f32,
                    self.window_size.0,
                    self.window_size.1,
                );
                self.pointer_moved = true;
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = Vec2::ZERO;
                self.pointer_moved = true;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel down (negative y) scrolls the page down
                self.scroll_delta_px += match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
            }
            WindowEvent::Occluded(occluded) => {
                self.set_visible(!occluded);
            }
            _ => {}
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.visibility_changed = true;
        }
    }

    /// Wheel movement since the last call, in pixels.
    pub fn take_scroll_delta(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta_px)
    }

    /// Pointer position if it moved since the last call.
    pub fn take_pointer(&mut self) -> Option<Vec2> {
        std::mem::take(&mut self.pointer_moved).then_some(self.pointer)
    }

    /// New visibility if it changed since the last call.
    pub fn take_visibility_change(&mut self) -> Option<bool> {
        std::mem::take(&mut self.visibility_changed).then_some(self.visible)
    }

    pub fn window_size(&self) -> (f32, f32) {
        self.window_size
    }
}
