//! Error types for the Ridgeline scene engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Capability probe failed: {0}")]
    Capability(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Animation error: {0}")]
    Animation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Stale resource handle")]
    StaleHandle,
}
