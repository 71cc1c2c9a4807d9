//! Outbound notifications to the host page

use crate::fallback::FallbackReason;

/// Receives the two lifecycle events the engine reports. Each fires at most
/// once per mount.
pub trait SceneObserver {
    /// The initial build finished and survived the grace period.
    fn on_ready(&mut self) {}

    /// The scene degraded to static content for the rest of the session.
    fn on_fallback(&mut self, reason: FallbackReason) {
        let _ = reason;
    }
}

/// Observer that only logs.
#[derive(Debug, Default)]
pub struct LogObserver;

impl SceneObserver for LogObserver {
    fn on_ready(&mut self) {
        log::info!("Scene ready");
    }

    fn on_fallback(&mut self, reason: FallbackReason) {
        log::info!("Scene fell back: {}", reason);
    }
}
