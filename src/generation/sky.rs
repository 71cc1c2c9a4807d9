//! Sky dome and celestial bodies.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Radius of the inverted sky dome. Everything else sits inside it.
pub const SKY_RADIUS: f32 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialKind {
    Sun,
    Moon,
}

/// A sun or moon travelling along an arc as the page scrolls.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialSpec {
    pub kind: CelestialKind,
    pub radius: f32,
    pub color: u32,
    /// Distance from the arc centre
    pub orbit_radius: f32,
    /// Azimuth of the arc plane in radians (0 = +X towards the viewer's right)
    pub azimuth: f32,
}

impl CelestialSpec {
    pub fn sun() -> Self {
        Self {
            kind: CelestialKind::Sun,
            radius: 4.0,
            color: 0xffd27a,
            orbit_radius: 120.0,
            azimuth: 0.0,
        }
    }

    pub fn moon() -> Self {
        Self {
            kind: CelestialKind::Moon,
            radius: 2.5,
            color: 0xdfe6f0,
            orbit_radius: 120.0,
            azimuth: std::f32::consts::PI,
        }
    }

    /// Position for an elevation angle in radians above the horizon. The arc
    /// sits behind the scene (negative Z).
    pub fn position_at(&self, elevation: f32) -> Vec3 {
        let (sin_e, cos_e) = elevation.sin_cos();
        let horizontal = cos_e * self.orbit_radius;
        Vec3::new(
            horizontal * self.azimuth.cos(),
            sin_e * self.orbit_radius,
            -self.orbit_radius * 0.6 - horizontal * self.azimuth.sin().abs(),
        )
    }
}
