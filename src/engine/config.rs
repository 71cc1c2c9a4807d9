//! Engine configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::ScenePreset;
use crate::capability::QualityTier;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::fallback::StaticPresentation;
use crate::render::RenderMode;

/// Options recognized at mount. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Skip detection and use this tier
    pub force_tier: Option<QualityTier>,
    pub mountain_count: usize,
    pub cloud_count: usize,
    pub enable_pointer_parallax: bool,
    /// Scroll inactivity before `is_active` clears
    pub idle_timeout_ms: u64,
    /// Initial build must finish within this window
    pub load_timeout_ms: u64,
    /// Error-free time after the build before the scene counts as live
    pub grace_period_ms: u64,
    pub seed: u32,
    pub preset: ScenePreset,
    pub render_on_demand: bool,
    /// In on-demand mode, render one of every N idle ticks
    pub idle_frame_interval: u32,
    pub terrain_rows_per_frame: u32,
    pub memory_budget_mb: usize,
    /// Budget fraction at which the scene falls back
    pub memory_pressure_threshold: f32,
    /// Pointer smoothing time constant in seconds
    pub pointer_smoothing: f32,
    pub fallback: StaticPresentation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            force_tier: None,
            mountain_count: 12,
            cloud_count: 8,
            enable_pointer_parallax: true,
            idle_timeout_ms: 150,
            load_timeout_ms: 10_000,
            grace_period_ms: 500,
            seed: 42,
            preset: ScenePreset::FullPage,
            render_on_demand: true,
            idle_frame_interval: 6,
            terrain_rows_per_frame: 16,
            memory_budget_mb: 256,
            memory_pressure_threshold: 0.9,
            pointer_smoothing: 0.25,
            fallback: StaticPresentation::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.idle_timeout_ms == 0 {
            return invalid("idle_timeout_ms must be positive".into());
        }
        if self.load_timeout_ms == 0 {
            return invalid("load_timeout_ms must be positive".into());
        }
        if self.terrain_rows_per_frame == 0 {
            return invalid("terrain_rows_per_frame must be positive".into());
        }
        if self.idle_frame_interval == 0 {
            return invalid("idle_frame_interval must be positive".into());
        }
        if self.memory_budget_mb == 0 {
            return invalid("memory_budget_mb must be positive".into());
        }
        if !(self.memory_pressure_threshold > 0.0 && self.memory_pressure_threshold <= 1.0) {
            return invalid(format!(
                "memory_pressure_threshold {} outside (0, 1]",
                self.memory_pressure_threshold
            ));
        }
        if !(self.pointer_smoothing.is_finite() && self.pointer_smoothing > 0.0) {
            return invalid(format!("pointer_smoothing {} must be positive", self.pointer_smoothing));
        }
        if self.fallback.gradient.windows(2).any(|w| w[1].offset < w[0].offset) {
            return invalid("fallback gradient stops must be sorted by offset".into());
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.render_on_demand {
            RenderMode::OnDemand
        } else {
            RenderMode::Continuous
        }
    }
}
