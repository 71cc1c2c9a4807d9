//! Cloud clusters built from pooled spheres.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::SeededRng;

/// Puff radii snap to this step so clusters share sphere geometry.
pub const RADIUS_STEP: f32 = 0.25;

/// Inclusive range of puffs per cloud.
pub const PUFFS_PER_CLOUD: (u32, u32) = (3, 5);

pub const CLOUD_COLOR: u32 = 0xf4f7fb;

/// Snap a radius to the nearest multiple of [`RADIUS_STEP`], never below one step.
pub fn quantize_radius(radius: f32) -> f32 {
    ((radius / RADIUS_STEP).round() * RADIUS_STEP).max(RADIUS_STEP)
}

/// Layout parameters for cloud clusters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    /// Width of the band clouds drift across before wrapping
    pub wrap_width: f32,
    pub altitude: (f32, f32),
    pub depth: (f32, f32),
    pub puff_radius: (f32, f32),
    /// Lateral drift in units per second
    pub drift_speed: (f32, f32),
    /// Vertical rise over the full scroll range
    pub scroll_lift: (f32, f32),
    pub opacity: f32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            wrap_width: 80.0,
            altitude: (7.0, 13.0),
            depth: (-30.0, -6.0),
            puff_radius: (0.75, 1.75),
            drift_speed: (0.2, 0.8),
            scroll_lift: (2.0, 6.0),
            opacity: 0.9,
        }
    }
}

/// One sphere within a cluster, relative to the cluster origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudPuff {
    pub offset: Vec3,
    pub radius: f32,
}

/// One placed cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudSpec {
    pub position: Vec3,
    pub puffs: Vec<CloudPuff>,
    pub drift_speed: f32,
    pub scroll_lift: f32,
    pub wrap_width: f32,
    pub opacity: f32,
}

impl CloudSpec {
    /// Distinct puff radii, sorted. One pooled sphere per entry.
    pub fn distinct_radii(&self) -> Vec<f32> {
        let mut radii: Vec<f32> = self.puffs.iter().map(|p| p.radius).collect();
        radii.sort_by(f32::total_cmp);
        radii.dedup();
        radii
    }
}

fn layout_puffs(rng: &mut SeededRng, params: &CloudParams) -> Vec<CloudPuff> {
    let count = rng.range_u32(PUFFS_PER_CLOUD.0, PUFFS_PER_CLOUD.1);
    let mut puffs = Vec::with_capacity(count as usize);
    let mut x = 0.0;
    for i in 0..count {
        let radius = quantize_radius(rng.range(params.puff_radius.0, params.puff_radius.1));
        // Middle puffs sit higher for a rounded silhouette
        let middle = 1.0 - ((i as f32 + 0.5) / count as f32 * 2.0 - 1.0).abs();
        puffs.push(CloudPuff {
            offset: Vec3::new(x, middle * radius * 0.5, rng.range(-0.3, 0.3)),
            radius,
        });
        x += radius * rng.range(0.9, 1.3);
    }
    // Center the cluster on its origin
    let center = x * 0.5;
    for puff in &mut puffs {
        puff.offset.x -= center;
    }
    puffs
}

/// Lay out `count` clouds spread across the wrap band.
pub fn layout_clouds(count: usize, seed: u32, params: &CloudParams) -> Vec<CloudSpec> {
    let mut rng = SeededRng::new(seed ^ 0x434c_4f55);
    (0..count)
        .map(|i| {
            let band = params.wrap_width / count.max(1) as f32;
            let x = -params.wrap_width * 0.5 + band * (i as f32 + rng.range(0.2, 0.8));
            let position = Vec3::new(
                x,
                rng.range(params.altitude.0, params.altitude.1),
                rng.range(params.depth.0, params.depth.1),
            );
            CloudSpec {
                position,
                puffs: layout_puffs(&mut rng, params),
                drift_speed: rng.range(params.drift_speed.0, params.drift_speed.1),
                scroll_lift: rng.range(params.scroll_lift.0, params.scroll_lift.1),
                wrap_width: params.wrap_width,
                opacity: params.opacity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_radius() {
        assert_eq!(quantize_radius(1.1), 1.0);
        assert_eq!(quantize_radius(1.13), 1.25);
        assert_eq!(quantize_radius(0.01), RADIUS_STEP);
    }

    #[test]
    fn test_puff_counts() {
        for cloud in layout_clouds(25, 9, &CloudParams::default()) {
            let n = cloud.puffs.len() as u32;
            assert!((PUFFS_PER_CLOUD.0..=PUFFS_PER_CLOUD.1).contains(&n));
            for puff in &cloud.puffs {
                let steps = puff.radius / RADIUS_STEP;
                assert!((steps - steps.round()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_clouds_stay_in_band() {
        let params = CloudParams::default();
        for cloud in layout_clouds(8, 42, &params) {
            assert!(cloud.position.x.abs() <= params.wrap_width * 0.5);
            assert!(cloud.drift_speed >= params.drift_speed.0);
            assert!(cloud.drift_speed <= params.drift_speed.1);
        }
    }

    #[test]
    fn test_radii_shared_across_clusters() {
        let clouds = layout_clouds(16, 5, &CloudParams::default());
        let mut all: Vec<f32> = clouds.iter().flat_map(|c| c.distinct_radii()).collect();
        let puff_total: usize = clouds.iter().map(|c| c.puffs.len()).sum();
        all.sort_by(f32::total_cmp);
        all.dedup();
        // 0.75..=1.75 in quarter steps gives at most five sizes
        assert!(all.len() <= 5);
        assert!(puff_total > all.len());
    }

    #[test]
    fn test_deterministic() {
        let params = CloudParams::default();
        assert_eq!(layout_clouds(4, 1, &params), layout_clouds(4, 1, &params));
    }
}
