//! Noise-displaced terrain grid, built a few rows per frame.

use serde::{Deserialize, Serialize};

use super::octave::OctaveNoise;
use super::CancellationToken;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::mesh::{self, MeshData};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub width: f32,      // Extent along X
    pub depth: f32,      // Extent along Z
    pub segments: u32,   // Quads per side
    pub amplitude: f32,  // Base amplitude of the first octave
    pub frequency: f32,  // Base frequency of the first octave
    pub center: [f32; 3],
    pub color: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 120.0,
            depth: 80.0,
            segments: 64,
            amplitude: 1.6,
            frequency: 0.06,
            center: [0.0, -2.0, -20.0],
            color: 0x55684a,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<()> {
        let dims_ok = [self.width, self.depth, self.frequency]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !dims_ok {
            return Err(Error::Generation(format!(
                "terrain dimensions must be positive: {}x{} @ {}",
                self.width, self.depth, self.frequency
            )));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(Error::Generation(format!("terrain amplitude {} invalid", self.amplitude)));
        }
        if self.segments == 0 || self.segments > 1024 {
            return Err(Error::Generation(format!("terrain segments {} out of range", self.segments)));
        }
        Ok(())
    }
}

/// Outcome of one [`TerrainBuild::step`].
#[derive(Debug)]
pub enum BuildStep {
    /// Rows remain
    Pending { rows_done: u32, rows_total: u32 },
    Complete(MeshData),
    Cancelled,
}

/// Incremental terrain build. The flat grid is created up front; each step
/// displaces a band of rows, and the final step recomputes normals.
pub struct TerrainBuild {
    noise: OctaveNoise,
    mesh: Option<MeshData>,
    row_len: u32,
    rows_total: u32,
    next_row: u32,
    cancel: CancellationToken,
}

impl TerrainBuild {
    pub fn new(params: &TerrainParams, seed: u32, cancel: CancellationToken) -> Result<Self> {
        params.validate()?;
        let mesh = mesh::grid(params.width, params.depth, params.segments);
        Ok(Self {
            noise: OctaveNoise::new(seed, params.amplitude, params.frequency),
            mesh: Some(mesh),
            row_len: params.segments + 1,
            rows_total: params.segments + 1,
            next_row: 0,
            cancel,
        })
    }

    pub fn progress(&self) -> f32 {
        self.next_row as f32 / self.rows_total as f32
    }

    /// Displace up to `rows` rows. The cancellation flag is checked before
    /// any work is done.
    pub fn step(&mut self, rows: u32) -> Result<BuildStep> {
        if self.cancel.is_cancelled() {
            self.mesh = None;
            return Ok(BuildStep::Cancelled);
        }
        let Some(mesh) = self.mesh.as_mut() else {
            return Err(Error::Generation("terrain build already finished".into()));
        };

        let end = (self.next_row + rows.max(1)).min(self.rows_total);
        let start = (self.next_row * self.row_len) as usize;
        let stop = (end * self.row_len) as usize;
        for p in &mut mesh.positions[start..stop] {
            p[1] = self.noise.height_at(p[0], p[2]);
        }
        self.next_row = end;

        if self.next_row < self.rows_total {
            return Ok(BuildStep::Pending {
                rows_done: self.next_row,
                rows_total: self.rows_total,
            });
        }

        let mut mesh = self.mesh.take().ok_or_else(|| Error::Generation("terrain mesh missing".into()))?;
        mesh.recompute_normals();
        log::debug!(
            "Terrain built: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(BuildStep::Complete(mesh))
    }

    /// Run every remaining row in one call.
    pub fn finish(mut self) -> Result<Option<MeshData>> {
        loop {
            match self.step(self.rows_total)? {
                BuildStep::Pending { .. } => continue,
                BuildStep::Complete(mesh) => return Ok(Some(mesh)),
                BuildStep::Cancelled => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TerrainParams {
        TerrainParams {
            segments: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_chunked_build_completes() {
        let mut build = TerrainBuild::new(&small(), 42, CancellationToken::new()).unwrap();
        let mut steps = 0;
        let mesh = loop {
            steps += 1;
            match build.step(2).unwrap() {
                BuildStep::Pending { rows_done, rows_total } => {
                    assert!(rows_done < rows_total);
                }
                BuildStep::Complete(mesh) => break mesh,
                BuildStep::Cancelled => panic!("not cancelled"),
            }
        };
        // 9 rows at 2 per step
        assert_eq!(steps, 5);
        assert_eq!(mesh.vertex_count(), 81);
        assert_eq!(mesh.normals.len(), 81);
    }

    #[test]
    fn test_chunked_matches_single_pass() {
        let a = TerrainBuild::new(&small(), 7, CancellationToken::new()).unwrap().finish().unwrap();
        let mut b = TerrainBuild::new(&small(), 7, CancellationToken::new()).unwrap();
        let b = loop {
            if let BuildStep::Complete(mesh) = b.step(1).unwrap() {
                break mesh;
            }
        };
        assert_eq!(a, Some(b));
    }

    #[test]
    fn test_heights_bounded() {
        let params = small();
        let mesh = TerrainBuild::new(&params, 3, CancellationToken::new())
            .unwrap()
            .finish()
            .unwrap()
            .unwrap();
        let bound = OctaveNoise::new(3, params.amplitude, params.frequency).max_height();
        for p in &mesh.positions {
            assert!(p[1].abs() <= bound * 1.01);
        }
    }

    #[test]
    fn test_cancel_between_chunks() {
        let token = CancellationToken::new();
        let mut build = TerrainBuild::new(&small(), 1, token.clone()).unwrap();
        assert!(matches!(build.step(3).unwrap(), BuildStep::Pending { .. }));
        token.cancel();
        assert!(matches!(build.step(3).unwrap(), BuildStep::Cancelled));
    }

    #[test]
    fn test_invalid_params() {
        let mut params = small();
        params.width = -1.0;
        assert!(TerrainBuild::new(&params, 1, CancellationToken::new()).is_err());
        let mut params = small();
        params.segments = 0;
        assert!(params.validate().is_err());
        let mut params = small();
        params.amplitude = f32::NAN;
        assert!(params.validate().is_err());
    }
}
