//! Window management using winit

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event_loop::{ControlFlow, EventLoop},
    window::WindowAttributes,
};

use crate::core::error::Error;

/// Window configuration
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ridgeline".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height))
    }
}

/// Creates an event loop and runs the application until it exits
pub fn run<A: ApplicationHandler>(app: &mut A) -> Result<(), Error> {
    let event_loop = EventLoop::new()
        .map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;

    // Frames are paced by the scheduler; the loop itself never sleeps
    event_loop.set_control_flow(ControlFlow::Poll);

    event_loop
        .run_app(app)
        .map_err(|e| Error::Window(format!("Event loop error: {}", e)))?;

    Ok(())
}
