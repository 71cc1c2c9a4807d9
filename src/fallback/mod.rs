//! Static fallback when the live scene cannot run.
//!
//! [`FallbackController`] is the three-state machine (Detecting, Live3D,
//! StaticFallback) wrapped around the live scene. Every failure the engine
//! catches ends up here as a [`FallbackReason`]; once static, the session
//! stays static.

pub mod controller;
pub mod presentation;

pub use controller::{FallbackController, FallbackState, Transition};
pub use presentation::{GradientStop, StaticPresentation};

use serde::{Deserialize, Serialize};

/// Why the scene degraded to static content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    #[serde(rename = "no-webgl")]
    NoWebGl,
    ForcedLow,
    ReducedMotion,
    RenderError,
    /// Fatal failure while building the initial terrain
    GenerationError,
    Timeout,
    MemoryPressure,
}

impl FallbackReason {
    /// Tag reported to observers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoWebGl => "no-webgl",
            Self::ForcedLow => "forced-low",
            Self::ReducedMotion => "reduced-motion",
            Self::RenderError => "render-error",
            Self::GenerationError => "generation-error",
            Self::Timeout => "timeout",
            Self::MemoryPressure => "memory-pressure",
        }
    }

    /// Shortfalls are known before anything is built.
    pub fn is_capability_shortfall(self) -> bool {
        matches!(self, Self::NoWebGl | Self::ForcedLow | Self::ReducedMotion)
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde() {
        for reason in [
            FallbackReason::NoWebGl,
            FallbackReason::ForcedLow,
            FallbackReason::ReducedMotion,
            FallbackReason::RenderError,
            FallbackReason::GenerationError,
            FallbackReason::Timeout,
            FallbackReason::MemoryPressure,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
        }
    }

    #[test]
    fn test_shortfalls() {
        assert!(FallbackReason::NoWebGl.is_capability_shortfall());
        assert!(FallbackReason::ReducedMotion.is_capability_shortfall());
        assert!(!FallbackReason::Timeout.is_capability_shortfall());
    }
}
