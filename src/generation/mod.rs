//! Procedural scene content: mountains, clouds, terrain and sky.
//!
//! Layouts are plain data derived from a seed. Turning them into pooled GPU
//! resources and scene nodes is the job of [`crate::scene::SceneBuild`].

pub mod cloud;
pub mod mountain;
pub mod octave;
pub mod rng;
pub mod sky;
pub mod terrain;

pub use cloud::{layout_clouds, quantize_radius, CloudParams, CloudPuff, CloudSpec};
pub use mountain::{layout_mountains, MountainParams, MountainSpec, MOUNTAIN_PALETTE};
pub use octave::OctaveNoise;
pub use rng::SeededRng;
pub use sky::{CelestialKind, CelestialSpec, SKY_RADIUS};
pub use terrain::{BuildStep, TerrainBuild, TerrainParams};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by incremental builds between chunks.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
