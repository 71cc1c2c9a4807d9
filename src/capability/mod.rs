//! Device capability detection.
//!
//! Probes the host once at mount and turns the result into an immutable
//! [`CapabilityProfile`]: a quality tier plus the concrete render parameters
//! for that tier. The profile is passed down to generation and rendering;
//! nothing else re-probes the device.

pub mod detector;
pub mod probe;
pub mod profile;

pub use detector::{classify, detect, LOW_CORE_THRESHOLD};
pub use probe::{DeviceProbe, DeviceSignals, NetworkClass, RegionHint, StaticProbe, SystemProbe};
pub use profile::{CapabilityProfile, ColorSpace, QualityTier, ShadowMapKind, TierParams, TierReason};
