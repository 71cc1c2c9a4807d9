//! Tier selection from device signals.

use super::probe::{DeviceProbe, DeviceSignals};
use super::profile::{CapabilityProfile, QualityTier, TierReason};

/// Devices with fewer logical cores than this are treated as low-end.
pub const LOW_CORE_THRESHOLD: u32 = 4;

/// Devices reporting less memory than this (GB) are treated as low-end.
pub const LOW_MEMORY_GB: f32 = 4.0;

/// Pick a tier from signals. First matching rule wins; `High` is only ever
/// reached through an explicit override.
pub fn classify(signals: &DeviceSignals, force_tier: Option<QualityTier>) -> (QualityTier, TierReason) {
    if let Some(tier) = force_tier {
        return (tier, TierReason::Override);
    }
    if !signals.webgl_available {
        return (QualityTier::Low, TierReason::NoWebGl);
    }
    if signals.prefers_reduced_motion {
        return (QualityTier::Low, TierReason::ReducedMotion);
    }
    if signals.constrained_connectivity() {
        return (QualityTier::Low, TierReason::ConstrainedNetwork);
    }

    let few_cores = signals
        .hardware_concurrency
        .is_some_and(|cores| cores < LOW_CORE_THRESHOLD);
    let low_memory = signals
        .device_memory_gb
        .is_some_and(|gb| gb < LOW_MEMORY_GB);
    if signals.mobile_user_agent || few_cores || low_memory {
        return (QualityTier::Low, TierReason::LowEndDevice);
    }

    (QualityTier::Medium, TierReason::Default)
}

/// Probe the device once and build the capability profile.
///
/// Never fails: a probe error yields a low-tier profile with 3D still enabled
/// (or the forced tier, if one was given).
pub fn detect(probe: &dyn DeviceProbe, force_tier: Option<QualityTier>) -> CapabilityProfile {
    match probe.signals() {
        Ok(signals) => {
            let (tier, reason) = classify(&signals, force_tier);
            log::info!(
                "Capability: tier={:?} reason={:?} webgl={} cores={:?}",
                tier, reason, signals.webgl_available, signals.hardware_concurrency
            );
            CapabilityProfile::from_tier(tier, reason, signals.webgl_available, signals.max_anisotropy)
        }
        Err(e) => {
            log::warn!("Capability probe failed ({}), assuming low tier", e);
            match force_tier {
                Some(tier) => CapabilityProfile::from_tier(tier, TierReason::Override, true, None),
                None => CapabilityProfile::from_tier(QualityTier::Low, TierReason::ProbeFailed, true, None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::probe::{NetworkClass, RegionHint, StaticProbe};
    use crate::core::error::Error;
    use crate::core::types::Result;
    use crate::fallback::FallbackReason;

    struct FailingProbe;

    impl DeviceProbe for FailingProbe {
        fn signals(&self) -> Result<DeviceSignals> {
            Err(Error::Capability("extension lookup failed".into()))
        }
    }

    fn desktop() -> DeviceSignals {
        DeviceSignals {
            hardware_concurrency: Some(8),
            device_memory_gb: Some(16.0),
            network: NetworkClass::FourG,
            ..Default::default()
        }
    }

    #[test]
    fn test_desktop_defaults_to_medium() {
        let profile = detect(&StaticProbe(desktop()), None);
        assert_eq!(profile.tier, QualityTier::Medium);
        assert_eq!(profile.reason, TierReason::Default);
        assert!(profile.three_d_enabled);
        assert_eq!(profile.shortfall(), None);
    }

    #[test]
    fn test_override_wins() {
        let profile = detect(&StaticProbe(desktop()), Some(QualityTier::High));
        assert_eq!(profile.tier, QualityTier::High);
        assert_eq!(profile.reason, TierReason::Override);

        let profile = detect(&StaticProbe(desktop()), Some(QualityTier::Low));
        assert_eq!(profile.shortfall(), Some(FallbackReason::ForcedLow));
    }

    #[test]
    fn test_no_webgl_disables_3d() {
        let signals = DeviceSignals { webgl_available: false, ..desktop() };
        let profile = detect(&StaticProbe(signals), None);
        assert_eq!(profile.tier, QualityTier::Low);
        assert!(!profile.three_d_enabled);
        assert_eq!(profile.shortfall(), Some(FallbackReason::NoWebGl));
    }

    #[test]
    fn test_reduced_motion_is_low() {
        let signals = DeviceSignals { prefers_reduced_motion: true, ..desktop() };
        let (tier, reason) = classify(&signals, None);
        assert_eq!(tier, QualityTier::Low);
        assert_eq!(reason, TierReason::ReducedMotion);
    }

    #[test]
    fn test_constrained_network_is_low() {
        let signals = DeviceSignals { network: NetworkClass::Slow2g, ..desktop() };
        assert_eq!(classify(&signals, None), (QualityTier::Low, TierReason::ConstrainedNetwork));

        let signals = DeviceSignals { region: RegionHint::LowBandwidth, ..desktop() };
        assert_eq!(classify(&signals, None), (QualityTier::Low, TierReason::ConstrainedNetwork));
    }

    #[test]
    fn test_low_end_device_is_low() {
        let signals = DeviceSignals { mobile_user_agent: true, ..desktop() };
        assert_eq!(classify(&signals, None), (QualityTier::Low, TierReason::LowEndDevice));

        let signals = DeviceSignals { hardware_concurrency: Some(2), ..desktop() };
        assert_eq!(classify(&signals, None), (QualityTier::Low, TierReason::LowEndDevice));

        let signals = DeviceSignals { device_memory_gb: Some(2.0), ..desktop() };
        assert_eq!(classify(&signals, None), (QualityTier::Low, TierReason::LowEndDevice));
    }

    #[test]
    fn test_rule_order_no_webgl_before_reduced_motion() {
        let signals = DeviceSignals {
            webgl_available: false,
            prefers_reduced_motion: true,
            ..desktop()
        };
        assert_eq!(classify(&signals, None).1, TierReason::NoWebGl);
    }

    #[test]
    fn test_few_cores_never_high() {
        for cores in 0..LOW_CORE_THRESHOLD {
            for mobile in [false, true] {
                for network in [NetworkClass::Unknown, NetworkClass::ThreeG, NetworkClass::FourG] {
                    let signals = DeviceSignals {
                        hardware_concurrency: Some(cores),
                        mobile_user_agent: mobile,
                        network,
                        ..Default::default()
                    };
                    let profile = detect(&StaticProbe(signals), None);
                    assert_ne!(profile.tier, QualityTier::High);
                }
            }
        }
    }

    #[test]
    fn test_probe_failure_assumes_low() {
        let profile = detect(&FailingProbe, None);
        assert_eq!(profile.tier, QualityTier::Low);
        assert_eq!(profile.reason, TierReason::ProbeFailed);
        assert!(profile.three_d_enabled);
        assert_eq!(profile.shortfall(), None);
    }

    #[test]
    fn test_probe_failure_keeps_override() {
        let profile = detect(&FailingProbe, Some(QualityTier::High));
        assert_eq!(profile.tier, QualityTier::High);
    }
}
