//! Mountain range layout.
//!
//! All mountains share one unit cone from the pool; size comes from the node
//! scale and color from a small palette, so a whole range costs one geometry
//! and a handful of materials.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::SeededRng;

/// Slate/blue-grey palette, far to near.
pub const MOUNTAIN_PALETTE: [u32; 4] = [0x6b8191, 0x5d7284, 0x4a5d6e, 0x3e4f5c];

/// Layout parameters for the mountain ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountainParams {
    /// Half-width of the ranges along X
    pub spread: f32,
    /// Z range of the far range (near, far)
    pub back_depth: (f32, f32),
    /// Z range of the near range (near, far)
    pub front_depth: (f32, f32),
    pub back_height: (f32, f32),
    pub front_height: (f32, f32),
    /// Base radius as a fraction of height
    pub radius_ratio: (f32, f32),
    pub bob_amplitude: f32,
    /// Max tilt in radians
    pub tilt_amplitude: f32,
}

impl Default for MountainParams {
    fn default() -> Self {
        Self {
            spread: 30.0,
            back_depth: (-40.0, -28.0),
            front_depth: (-18.0, -8.0),
            back_height: (8.0, 14.0),
            front_height: (4.0, 8.0),
            radius_ratio: (0.6, 0.9),
            bob_amplitude: 0.15,
            tilt_amplitude: 0.03,
        }
    }
}

/// One placed mountain.
#[derive(Clone, Debug, PartialEq)]
pub struct MountainSpec {
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub color: u32,
    /// Animation phase in radians, decorrelates bobbing between peaks
    pub phase: f32,
    pub bob_amplitude: f32,
    pub tilt_amplitude: f32,
    /// Progress window in which the mountain contributes to the frame
    pub window: (f32, f32),
    pub is_front: bool,
}

impl MountainSpec {
    /// Node scale to apply to the shared unit cone.
    pub fn scale(&self) -> Vec3 {
        Vec3::new(self.radius, self.height, self.radius)
    }
}

/// Lay out `count` mountains: roughly 40% in the far range, the rest in front.
/// Returned far-to-near.
pub fn layout_mountains(count: usize, seed: u32, params: &MountainParams) -> Vec<MountainSpec> {
    let mut rng = SeededRng::new(seed ^ 0x4d4f_554e);
    let back_count = (count * 2).div_ceil(5);
    let mut specs = Vec::with_capacity(count);

    for i in 0..count {
        let is_front = i >= back_count;
        let (depth, height_range, palette) = if is_front {
            (params.front_depth, params.front_height, &MOUNTAIN_PALETTE[2..])
        } else {
            (params.back_depth, params.back_height, &MOUNTAIN_PALETTE[..2])
        };

        // Spread evenly across X with jitter so peaks don't stack
        let row_count = if is_front { count - back_count } else { back_count }.max(1);
        let slot = if is_front { i - back_count } else { i };
        let t = (slot as f32 + 0.5) / row_count as f32;
        let jitter = rng.range(-0.4, 0.4) / row_count as f32;
        let x = ((t + jitter) * 2.0 - 1.0) * params.spread;

        let z = rng.range(depth.0.min(depth.1), depth.0.max(depth.1));
        let height = rng.range(height_range.0, height_range.1);
        let radius = height * rng.range(params.radius_ratio.0, params.radius_ratio.1);
        let color = rng.pick(palette).copied().unwrap_or(MOUNTAIN_PALETTE[0]);

        specs.push(MountainSpec {
            position: Vec3::new(x, 0.0, z),
            radius,
            height,
            color,
            phase: rng.range(0.0, std::f32::consts::TAU),
            bob_amplitude: params.bob_amplitude,
            tilt_amplitude: params.tilt_amplitude,
            // Near peaks scroll out of view before the end of the page
            window: if is_front { (0.0, 0.75) } else { (0.0, 1.0) },
            is_front,
        });
    }

    specs.sort_by(|a, b| a.position.z.total_cmp(&b.position.z));
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_count_and_order() {
        let specs = layout_mountains(12, 42, &MountainParams::default());
        assert_eq!(specs.len(), 12);
        for pair in specs.windows(2) {
            assert!(pair[0].position.z <= pair[1].position.z);
        }
    }

    #[test]
    fn test_layout_deterministic() {
        let params = MountainParams::default();
        assert_eq!(layout_mountains(9, 7, &params), layout_mountains(9, 7, &params));
        assert_ne!(layout_mountains(9, 7, &params), layout_mountains(9, 8, &params));
    }

    #[test]
    fn test_layout_respects_ranges() {
        let params = MountainParams::default();
        for spec in layout_mountains(20, 3, &params) {
            assert!(spec.position.x.abs() <= params.spread * 1.2);
            assert!(MOUNTAIN_PALETTE.contains(&spec.color));
            assert!(spec.radius > 0.0 && spec.height > 0.0);
            let (lo, hi) = if spec.is_front { params.front_depth } else { params.back_depth };
            assert!(spec.position.z >= lo && spec.position.z <= hi);
        }
    }

    #[test]
    fn test_palette_is_small() {
        let specs = layout_mountains(30, 1, &MountainParams::default());
        let mut colors: Vec<u32> = specs.iter().map(|s| s.color).collect();
        colors.sort();
        colors.dedup();
        assert!(colors.len() <= MOUNTAIN_PALETTE.len());
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout_mountains(0, 1, &MountainParams::default()).is_empty());
    }
}
