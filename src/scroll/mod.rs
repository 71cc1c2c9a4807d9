//! Page scroll tracking

pub mod state;
pub mod tracker;

pub use state::{ScrollDirection, ScrollState};
pub use tracker::{ScrollTracker, DEFAULT_IDLE_TIMEOUT};
