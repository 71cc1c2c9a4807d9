//! Quality tiers and the render parameters each tier maps to.

use serde::{Deserialize, Serialize};

use crate::fallback::FallbackReason;

/// Discrete render quality level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

/// Output color space for the swapchain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    /// sRGB-encoded output (gamma applied on write)
    Srgb,
    /// Linear output, no conversion on write
    LinearSrgb,
}

/// Shadow map filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowMapKind {
    Disabled,
    Pcf,
    PcfSoft,
}

/// Which detection rule produced the tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierReason {
    Override,
    NoWebGl,
    ReducedMotion,
    ConstrainedNetwork,
    LowEndDevice,
    ProbeFailed,
    Default,
}

/// Fixed parameter table for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierParams {
    pub pixel_ratio_cap: f32,
    pub shadow_map: ShadowMapKind,
    pub antialias: bool,
    pub max_anisotropy: u32,
    pub color_space: ColorSpace,
    pub msaa_samples: u32,
    /// Terrain grid resolution (quads per side)
    pub terrain_segments: u32,
    /// Longitude segments for pooled spheres (latitude is half)
    pub sphere_segments: u32,
    /// Radial segments for the shared mountain cone
    pub cone_segments: u32,
    pub max_mountains: usize,
    pub max_clouds: usize,
}

impl QualityTier {
    pub fn params(self) -> TierParams {
        match self {
            QualityTier::Low => TierParams {
                pixel_ratio_cap: 1.0,
                shadow_map: ShadowMapKind::Disabled,
                antialias: false,
                max_anisotropy: 1,
                color_space: ColorSpace::LinearSrgb,
                msaa_samples: 1,
                terrain_segments: 32,
                sphere_segments: 8,
                cone_segments: 6,
                max_mountains: 6,
                max_clouds: 4,
            },
            QualityTier::Medium => TierParams {
                pixel_ratio_cap: 1.5,
                shadow_map: ShadowMapKind::Pcf,
                antialias: true,
                max_anisotropy: 4,
                color_space: ColorSpace::Srgb,
                msaa_samples: 4,
                terrain_segments: 64,
                sphere_segments: 12,
                cone_segments: 8,
                max_mountains: 16,
                max_clouds: 10,
            },
            QualityTier::High => TierParams {
                pixel_ratio_cap: 2.0,
                shadow_map: ShadowMapKind::PcfSoft,
                antialias: true,
                max_anisotropy: 16,
                color_space: ColorSpace::Srgb,
                msaa_samples: 4,
                terrain_segments: 128,
                sphere_segments: 16,
                cone_segments: 12,
                max_mountains: 32,
                max_clouds: 16,
            },
        }
    }
}

/// Result of capability detection. Created once per mount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub tier: QualityTier,
    pub reason: TierReason,
    /// False when no 3D context can be created at all
    pub three_d_enabled: bool,
    pub pixel_ratio_cap: f32,
    pub shadows_enabled: bool,
    pub shadow_map: ShadowMapKind,
    pub antialias_enabled: bool,
    pub max_anisotropy: u32,
    pub color_space: ColorSpace,
    pub msaa_samples: u32,
    pub terrain_segments: u32,
    pub sphere_segments: u32,
    pub cone_segments: u32,
    pub max_mountains: usize,
    pub max_clouds: usize,
}

impl CapabilityProfile {
    /// Build a profile from the tier table. `device_max_anisotropy` caps the
    /// table value when the device reports one.
    pub fn from_tier(
        tier: QualityTier,
        reason: TierReason,
        three_d_enabled: bool,
        device_max_anisotropy: Option<u32>,
    ) -> Self {
        let params = tier.params();
        let max_anisotropy = match device_max_anisotropy {
            Some(device_max) => params.max_anisotropy.min(device_max.max(1)),
            None => params.max_anisotropy,
        };

        Self {
            tier,
            reason,
            three_d_enabled,
            pixel_ratio_cap: params.pixel_ratio_cap,
            shadows_enabled: params.shadow_map != ShadowMapKind::Disabled,
            shadow_map: params.shadow_map,
            antialias_enabled: params.antialias,
            max_anisotropy,
            color_space: params.color_space,
            msaa_samples: params.msaa_samples,
            terrain_segments: params.terrain_segments,
            sphere_segments: params.sphere_segments,
            cone_segments: params.cone_segments,
            max_mountains: params.max_mountains,
            max_clouds: params.max_clouds,
        }
    }

    /// The capability shortfall that forbids mounting the live scene, if any.
    pub fn shortfall(&self) -> Option<FallbackReason> {
        if !self.three_d_enabled {
            return Some(FallbackReason::NoWebGl);
        }
        match (self.reason, self.tier) {
            (TierReason::Override, QualityTier::Low) => Some(FallbackReason::ForcedLow),
            (TierReason::ReducedMotion, _) => Some(FallbackReason::ReducedMotion),
            _ => None,
        }
    }

    /// Effective pixel ratio for a display with the given native ratio.
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        device_pixel_ratio.clamp(1.0, self.pixel_ratio_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        assert!(QualityTier::Low < QualityTier::Medium);
        assert!(QualityTier::Medium < QualityTier::High);
    }

    #[test]
    fn test_tier_table_scales_with_tier() {
        let low = QualityTier::Low.params();
        let medium = QualityTier::Medium.params();
        let high = QualityTier::High.params();

        assert!(low.pixel_ratio_cap < medium.pixel_ratio_cap);
        assert!(medium.pixel_ratio_cap < high.pixel_ratio_cap);
        assert!(low.terrain_segments < high.terrain_segments);
        assert_eq!(low.shadow_map, ShadowMapKind::Disabled);
        assert!(!low.antialias);
        assert!(high.antialias);
    }

    #[test]
    fn test_anisotropy_capped_by_device() {
        let profile = CapabilityProfile::from_tier(QualityTier::High, TierReason::Override, true, Some(8));
        assert_eq!(profile.max_anisotropy, 8);

        let profile = CapabilityProfile::from_tier(QualityTier::Low, TierReason::Default, true, Some(16));
        assert_eq!(profile.max_anisotropy, 1);
    }

    #[test]
    fn test_shortfall_classification() {
        let no_gl = CapabilityProfile::from_tier(QualityTier::Low, TierReason::NoWebGl, false, None);
        assert_eq!(no_gl.shortfall(), Some(FallbackReason::NoWebGl));

        let forced = CapabilityProfile::from_tier(QualityTier::Low, TierReason::Override, true, None);
        assert_eq!(forced.shortfall(), Some(FallbackReason::ForcedLow));

        let motion = CapabilityProfile::from_tier(QualityTier::Low, TierReason::ReducedMotion, true, None);
        assert_eq!(motion.shortfall(), Some(FallbackReason::ReducedMotion));

        // A weak device still gets the live scene, just at low quality
        let weak = CapabilityProfile::from_tier(QualityTier::Low, TierReason::LowEndDevice, true, None);
        assert_eq!(weak.shortfall(), None);

        let forced_high = CapabilityProfile::from_tier(QualityTier::High, TierReason::Override, true, None);
        assert_eq!(forced_high.shortfall(), None);
    }

    #[test]
    fn test_pixel_ratio_cap() {
        let profile = CapabilityProfile::from_tier(QualityTier::Medium, TierReason::Default, true, None);
        assert_eq!(profile.pixel_ratio(3.0), 1.5);
        assert_eq!(profile.pixel_ratio(1.25), 1.25);
        assert_eq!(profile.pixel_ratio(0.5), 1.0);
    }

    #[test]
    fn test_tier_serde_names() {
        assert_eq!(serde_json::to_string(&QualityTier::Medium).unwrap(), "\"medium\"");
        let tier: QualityTier = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(tier, QualityTier::High);
    }
}
