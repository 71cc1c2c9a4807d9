//! Authored camera paths and sky ramps for each page layout.
//!
//! The numbers are tuned by eye and are not load-bearing; what matters is that
//! each track is monotonic in progress and that every camera pose keeps the
//! mountain ranges in frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::track::Track;
use crate::core::types::Result;
use crate::pool::srgb_hex_to_linear;

/// Which authored layout a scene uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenePreset {
    /// Short above-the-fold hero: a gentle push-in
    Hero,
    /// Whole-page journey from the valley floor up over the ridge
    #[default]
    FullPage,
    /// Slow arc around the ranges for product showcase sections
    Showcase,
}

/// Camera tracks sampled by the mapper.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPath {
    pub position: Track<Vec3>,
    pub look_at: Track<Vec3>,
    pub fov_y_degrees: Track<f32>,
    /// Max world-space camera sway from the pointer
    pub parallax_offset: f32,
}

/// Sky colours and celestial arcs keyed by progress.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyRamps {
    /// Linear RGB
    pub zenith: Track<[f32; 3]>,
    /// Linear RGB
    pub horizon: Track<[f32; 3]>,
    /// Radians above the horizon
    pub sun_elevation: Track<f32>,
    pub moon_elevation: Track<f32>,
    pub light_intensity: Track<f32>,
}

fn color_track(keys: &[(f32, u32)]) -> Result<Track<[f32; 3]>> {
    let pairs: Vec<(f32, [f32; 3])> = keys.iter().map(|&(p, hex)| (p, srgb_hex_to_linear(hex))).collect();
    Track::from_pairs(&pairs)
}

fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

impl ScenePreset {
    pub fn camera_path(self) -> Result<CameraPath> {
        Ok(match self {
            Self::Hero => CameraPath {
                position: Track::from_pairs(&[(0.0, v(0.0, 2.0, 10.0)), (1.0, v(0.0, 3.0, 6.0))])?,
                look_at: Track::constant(v(0.0, 3.0, -20.0)),
                fov_y_degrees: Track::from_pairs(&[(0.0, 60.0), (1.0, 55.0)])?,
                parallax_offset: 0.6,
            },
            Self::FullPage => CameraPath {
                position: Track::from_pairs(&[
                    (0.0, v(0.0, 2.0, 10.0)),
                    (0.25, v(0.0, 2.5, 6.0)),
                    (0.5, v(5.0, 5.0, 0.0)),
                    (0.75, v(-4.0, 8.0, -6.0)),
                    (1.0, v(0.0, 12.0, -12.0)),
                ])?,
                look_at: Track::from_pairs(&[
                    (0.0, v(0.0, 3.0, -20.0)),
                    (0.5, v(0.0, 4.0, -28.0)),
                    (1.0, v(0.0, 2.0, -40.0)),
                ])?,
                fov_y_degrees: Track::from_pairs(&[(0.0, 60.0), (0.5, 55.0), (1.0, 65.0)])?,
                parallax_offset: 0.8,
            },
            Self::Showcase => CameraPath {
                position: Track::from_pairs(&[
                    (0.0, v(0.0, 4.0, 6.0)),
                    (0.33, v(16.0, 6.0, -4.0)),
                    (0.66, v(-14.0, 7.0, -6.0)),
                    (1.0, v(0.0, 10.0, 2.0)),
                ])?,
                look_at: Track::constant(v(0.0, 4.0, -22.0)),
                fov_y_degrees: Track::constant(50.0),
                parallax_offset: 0.4,
            },
        })
    }

    /// Dawn at the top of the page, full day in the middle, dusk at the bottom.
    pub fn sky_ramps(self) -> Result<SkyRamps> {
        let (zenith, horizon) = match self {
            Self::Showcase => (
                color_track(&[(0.0, 0x2f5d9e), (1.0, 0x1e3f73)])?,
                color_track(&[(0.0, 0xbcd4ee), (1.0, 0x9db8dc)])?,
            ),
            Self::Hero | Self::FullPage => (
                color_track(&[(0.0, 0x3a4f7a), (0.35, 0x3f7fcf), (0.7, 0x4a6fa8), (1.0, 0x1c2448)])?,
                color_track(&[(0.0, 0xf6b38a), (0.35, 0xcfe3f7), (0.7, 0xf0a66e), (1.0, 0x6b4a78)])?,
            ),
        };
        Ok(SkyRamps {
            zenith,
            horizon,
            sun_elevation: Track::from_pairs(&[(0.0, 0.08), (0.45, 1.1), (0.9, 0.05), (1.0, -0.12)])?,
            moon_elevation: Track::from_pairs(&[(0.0, -0.3), (0.8, -0.05), (1.0, 0.45)])?,
            light_intensity: Track::from_pairs(&[(0.0, 0.7), (0.45, 1.0), (1.0, 0.45)])?,
        })
    }
}

impl SkyRamps {
    pub fn sample(&self, progress: f32) -> super::mapper::SkyFrame {
        super::mapper::SkyFrame {
            zenith: self.zenith.sample(progress),
            horizon: self.horizon.sample(progress),
            sun_elevation: self.sun_elevation.sample(progress),
            moon_elevation: self.moon_elevation.sample(progress),
            light_intensity: self.light_intensity.sample(progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: [ScenePreset; 3] = [ScenePreset::Hero, ScenePreset::FullPage, ScenePreset::Showcase];

    #[test]
    fn test_all_presets_build() {
        for preset in PRESETS {
            let path = preset.camera_path().unwrap();
            assert!(path.parallax_offset > 0.0);
            preset.sky_ramps().unwrap();
        }
    }

    #[test]
    fn test_camera_looks_at_ranges() {
        for preset in PRESETS {
            let path = preset.camera_path().unwrap();
            for i in 0..=10 {
                let p = i as f32 / 10.0;
                let pos = path.position.sample(p);
                let target = path.look_at.sample(p);
                // Mountains sit behind z = -8; the camera always looks that way
                assert!(target.z < pos.z, "{:?} at {}", preset, p);
                let fov = path.fov_y_degrees.sample(p);
                assert!((30.0..=90.0).contains(&fov));
            }
        }
    }

    #[test]
    fn test_sun_sets_by_the_end() {
        let ramps = ScenePreset::FullPage.sky_ramps().unwrap();
        assert!(ramps.sun_elevation.sample(0.45) > ramps.sun_elevation.sample(0.0));
        assert!(ramps.sun_elevation.sample(1.0) < 0.0);
        assert!(ramps.moon_elevation.sample(1.0) > 0.0);
    }

    #[test]
    fn test_preset_serde_names() {
        assert_eq!(serde_json::to_string(&ScenePreset::FullPage).unwrap(), "\"full-page\"");
        let p: ScenePreset = serde_json::from_str("\"showcase\"").unwrap();
        assert_eq!(p, ScenePreset::Showcase);
    }
}
