//! Progress-keyed waypoint tracks.

use serde::{Deserialize, Serialize};

use super::lerp::Lerp;
use crate::core::error::Error;
use crate::core::types::Result;

/// An authored (progress, value) control point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint<T> {
    pub progress: f32,
    pub value: T,
}

impl<T> Waypoint<T> {
    pub fn new(progress: f32, value: T) -> Self {
        Self { progress, value }
    }
}

/// Ordered waypoints for one animated property.
///
/// Progress values are weakly increasing. Sampling clamps to the first and
/// last waypoint and interpolates linearly between the bracketing pair. Two
/// waypoints at the same progress form a step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track<T: Lerp> {
    waypoints: Vec<Waypoint<T>>,
}

impl<T: Lerp> Track<T> {
    /// Build a track, rejecting empty input and out-of-order or non-finite
    /// progress values.
    pub fn new(waypoints: Vec<Waypoint<T>>) -> Result<Self> {
        if waypoints.is_empty() {
            return Err(Error::Animation("track needs at least one waypoint".into()));
        }
        for (i, w) in waypoints.iter().enumerate() {
            if !w.progress.is_finite() {
                return Err(Error::Animation(format!("waypoint {} has non-finite progress", i)));
            }
            if i > 0 && w.progress < waypoints[i - 1].progress {
                return Err(Error::Animation(format!(
                    "waypoint {} progress {} is before {}",
                    i,
                    w.progress,
                    waypoints[i - 1].progress
                )));
            }
        }
        Ok(Self { waypoints })
    }

    pub fn from_pairs(pairs: &[(f32, T)]) -> Result<Self> {
        Self::new(pairs.iter().map(|(p, v)| Waypoint::new(*p, v.clone())).collect())
    }

    /// Track that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self {
            waypoints: vec![Waypoint::new(0.0, value)],
        }
    }

    pub fn waypoints(&self) -> &[Waypoint<T>] {
        &self.waypoints
    }

    pub fn sample(&self, progress: f32) -> T {
        let first = &self.waypoints[0];
        let last = &self.waypoints[self.waypoints.len() - 1];
        if progress.is_nan() || progress <= first.progress {
            return first.value.clone();
        }
        if progress >= last.progress {
            return last.value.clone();
        }

        // First waypoint strictly after `progress`; never 0 or len here
        let upper = self.waypoints.partition_point(|w| w.progress <= progress);
        let a = &self.waypoints[upper - 1];
        let b = &self.waypoints[upper];
        let t = (progress - a.progress) / (b.progress - a.progress);
        a.value.lerp(&b.value, t)
    }
}

impl<'de, T: Lerp + Deserialize<'de>> Deserialize<'de> for Track<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let waypoints = Vec::<Waypoint<T>>::deserialize(deserializer)?;
        Self::new(waypoints).map_err(serde::de::Error::custom)
    }
}
