//! The static gradient/hero view shown in place of the live scene.

use serde::{Deserialize, Serialize};

use super::FallbackReason;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// 0 = top of the viewport, 1 = bottom
    pub offset: f32,
    /// 0xRRGGBB, sRGB encoded
    pub color: u32,
}

/// Static content shown after fallback. Carries the same calls to action as
/// the live scene so the page stays fully usable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPresentation {
    pub gradient: Vec<GradientStop>,
    pub hero_image: Option<String>,
    pub headline: String,
    pub call_to_action: String,
    /// Set when the presentation is activated
    pub reason: Option<FallbackReason>,
}

impl Default for StaticPresentation {
    fn default() -> Self {
        Self {
            gradient: vec![
                GradientStop { offset: 0.0, color: 0x3f7fcf },
                GradientStop { offset: 0.6, color: 0xcfe3f7 },
                GradientStop { offset: 1.0, color: 0x4a5d6e },
            ],
            hero_image: None,
            headline: "Find your next summit".into(),
            call_to_action: "Browse tours".into(),
            reason: None,
        }
    }
}

impl StaticPresentation {
    pub fn with_reason(mut self, reason: FallbackReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Colour at vertical position `t` (0 = top). Stops are assumed sorted.
    pub fn color_at(&self, t: f32) -> u32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (Some(first), Some(last)) = (self.gradient.first(), self.gradient.last()) else {
            return 0x000000;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let upper = self.gradient.partition_point(|s| s.offset <= t);
        let (a, b) = (self.gradient[upper - 1], self.gradient[upper]);
        let f = (t - a.offset) / (b.offset - a.offset);
        let channel = |shift: u32| {
            let ca = ((a.color >> shift) & 0xFF) as f32;
            let cb = ((b.color >> shift) & 0xFF) as f32;
            ((ca + (cb - ca) * f).round() as u32) << shift
        };
        channel(16) | channel(8) | channel(0)
    }
}
