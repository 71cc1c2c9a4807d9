//! Device/browser signal probes.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Coarse connection class as reported by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkClass {
    #[default]
    Unknown,
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

impl NetworkClass {
    pub fn is_constrained(self) -> bool {
        matches!(self, NetworkClass::Slow2g | NetworkClass::TwoG)
    }
}

/// Coarse geography hint, used only as a network-quality heuristic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionHint {
    #[default]
    Unknown,
    Standard,
    LowBandwidth,
}

/// Raw signals gathered once at mount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSignals {
    pub webgl_available: bool,
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f32>,
    pub network: NetworkClass,
    pub save_data: bool,
    pub prefers_reduced_motion: bool,
    pub mobile_user_agent: bool,
    pub region: RegionHint,
    pub max_anisotropy: Option<u32>,
}

impl Default for DeviceSignals {
    fn default() -> Self {
        Self {
            webgl_available: true,
            hardware_concurrency: None,
            device_memory_gb: None,
            network: NetworkClass::Unknown,
            save_data: false,
            prefers_reduced_motion: false,
            mobile_user_agent: false,
            region: RegionHint::Unknown,
            max_anisotropy: None,
        }
    }
}

impl DeviceSignals {
    /// Parse a JSON payload handed over by the host page.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True if the connection or region suggests a slow network.
    pub fn constrained_connectivity(&self) -> bool {
        self.network.is_constrained() || self.save_data || self.region == RegionHint::LowBandwidth
    }
}

/// Source of device signals. Probing must be synchronous and cheap.
pub trait DeviceProbe {
    fn signals(&self) -> Result<DeviceSignals>;
}

/// Probe returning signals supplied by the host.
#[derive(Clone, Debug, Default)]
pub struct StaticProbe(pub DeviceSignals);

impl DeviceProbe for StaticProbe {
    fn signals(&self) -> Result<DeviceSignals> {
        Ok(self.0.clone())
    }
}

/// Native probe: core count from the OS, adapter availability from the host.
#[derive(Clone, Debug)]
pub struct SystemProbe {
    pub adapter_available: bool,
    pub max_anisotropy: Option<u32>,
    pub prefers_reduced_motion: bool,
}

impl SystemProbe {
    pub fn new(adapter_available: bool) -> Self {
        Self {
            adapter_available,
            max_anisotropy: None,
            prefers_reduced_motion: false,
        }
    }
}

impl DeviceProbe for SystemProbe {
    fn signals(&self) -> Result<DeviceSignals> {
        let cores = std::thread::available_parallelism()
            .map_err(|e| Error::Capability(format!("core count unavailable: {}", e)))?;

        Ok(DeviceSignals {
            webgl_available: self.adapter_available,
            hardware_concurrency: Some(cores.get() as u32),
            max_anisotropy: self.max_anisotropy,
            prefers_reduced_motion: self.prefers_reduced_motion,
            ..Default::default()
        })
    }
}
