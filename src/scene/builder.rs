//! Incremental scene build.
//!
//! [`SceneBuild::step`] is called once per frame while the scene is loading.
//! Each call does one stage (sky, celestial bodies, mountains, clouds) or a
//! band of terrain rows, so no single frame blocks on generation. A node that
//! fails to build is skipped with a warning; a terrain failure is fatal and
//! returned as an error.

use glam::{Quat, Vec3};

use super::graph::SceneGraph;
use super::node::{MeshPart, NodeKind, SceneNodeId, Transform};
use crate::animation::{Bob, Drift, NodeAnimation, ScrollMapper};
use crate::capability::CapabilityProfile;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::cloud::CLOUD_COLOR;
use crate::generation::{
    layout_clouds, layout_mountains, BuildStep, CancellationToken, CelestialSpec, CloudParams, CloudSpec,
    MountainParams, MountainSpec, TerrainBuild, TerrainParams, SKY_RADIUS,
};
use crate::pool::{GeometryDescriptor, MaterialDescriptor, ResourceBackend, ResourcePool};

/// Bob angular speed for mountains, radians per second.
const MOUNTAIN_BOB_SPEED: f32 = 0.6;
const CLOUD_BOB_SPEED: f32 = 0.9;

/// Everything needed to lay out one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBuildParams {
    pub seed: u32,
    pub mountain_count: usize,
    pub cloud_count: usize,
    pub mountains: MountainParams,
    pub clouds: CloudParams,
    pub terrain: TerrainParams,
    pub cone_segments: u32,
    pub sphere_segments: u32,
    /// Terrain rows displaced per step
    pub rows_per_step: u32,
}

impl SceneBuildParams {
    /// Counts are capped and mesh detail chosen by the capability tier.
    pub fn for_profile(
        profile: &CapabilityProfile,
        seed: u32,
        mountain_count: usize,
        cloud_count: usize,
        rows_per_step: u32,
    ) -> Self {
        Self {
            seed,
            mountain_count: mountain_count.min(profile.max_mountains),
            cloud_count: cloud_count.min(profile.max_clouds),
            mountains: MountainParams::default(),
            clouds: CloudParams::default(),
            terrain: TerrainParams {
                segments: profile.terrain_segments,
                ..Default::default()
            },
            cone_segments: profile.cone_segments,
            sphere_segments: profile.sphere_segments,
            rows_per_step: rows_per_step.max(1),
        }
    }
}

/// Result of one build step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuildProgress {
    /// More steps needed; `fraction` is the terrain share completed
    Pending { stage: &'static str, fraction: f32 },
    Complete { nodes: usize, skipped: usize },
    Cancelled,
}

enum Stage {
    Sky,
    Mountains,
    Clouds,
    Terrain(TerrainBuild),
    Done,
}

pub struct SceneBuild {
    params: SceneBuildParams,
    stage: Stage,
    cancel: CancellationToken,
    skipped: usize,
}

impl SceneBuild {
    pub fn new(params: SceneBuildParams, cancel: CancellationToken) -> Self {
        Self {
            params,
            stage: Stage::Sky,
            cancel,
            skipped: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// Advance the build by one stage or terrain band.
    pub fn step<B: ResourceBackend>(
        &mut self,
        pool: &mut ResourcePool<B>,
        graph: &mut SceneGraph,
        mapper: &mut ScrollMapper,
    ) -> Result<BuildProgress> {
        if self.cancel.is_cancelled() {
            self.stage = Stage::Done;
            return Ok(BuildProgress::Cancelled);
        }

        let stage = std::mem::replace(&mut self.stage, Stage::Done);
        match stage {
            Stage::Sky => {
                self.build_sky(pool, graph, mapper);
                self.stage = Stage::Mountains;
                Ok(BuildProgress::Pending { stage: "sky", fraction: 0.0 })
            }
            Stage::Mountains => {
                let specs = layout_mountains(self.params.mountain_count, self.params.seed, &self.params.mountains);
                for spec in &specs {
                    let built = add_mountain(spec, self.params.cone_segments, pool, graph, mapper);
                    self.skip_on_error(NodeKind::Mountain, built);
                }
                self.stage = Stage::Clouds;
                Ok(BuildProgress::Pending { stage: "mountains", fraction: 0.0 })
            }
            Stage::Clouds => {
                let specs = layout_clouds(self.params.cloud_count, self.params.seed, &self.params.clouds);
                for spec in &specs {
                    let built = add_cloud(spec, self.params.sphere_segments, pool, graph, mapper);
                    self.skip_on_error(NodeKind::Cloud, built);
                }
                let terrain = TerrainBuild::new(&self.params.terrain, self.params.seed, self.cancel.clone())?;
                self.stage = Stage::Terrain(terrain);
                Ok(BuildProgress::Pending { stage: "clouds", fraction: 0.0 })
            }
            Stage::Terrain(mut terrain) => match terrain.step(self.params.rows_per_step)? {
                BuildStep::Pending { .. } => {
                    let fraction = terrain.progress();
                    self.stage = Stage::Terrain(terrain);
                    Ok(BuildProgress::Pending { stage: "terrain", fraction })
                }
                BuildStep::Cancelled => Ok(BuildProgress::Cancelled),
                BuildStep::Complete(mesh) => {
                    let geometry = pool.allocate_unique(&mesh)?;
                    let material = pool.get_material(&MaterialDescriptor::lit(self.params.terrain.color))?;
                    let center = Vec3::from(self.params.terrain.center);
                    let id = graph.add(
                        NodeKind::Terrain,
                        Transform::from_position(center),
                        vec![MeshPart::new(geometry, material)],
                    );
                    mapper.insert_node(id, NodeAnimation::new(Transform::from_position(center)).with_parallax(0.1));
                    log::info!(
                        "Scene built: {} nodes, {} skipped, {} geometries, {} materials",
                        graph.len(),
                        self.skipped,
                        pool.geometry_count() + pool.unique_count(),
                        pool.material_count()
                    );
                    Ok(BuildProgress::Complete {
                        nodes: graph.len(),
                        skipped: self.skipped,
                    })
                }
            },
            Stage::Done => Err(Error::Generation("scene build already finished".into())),
        }
    }

    fn skip_on_error(&mut self, kind: NodeKind, built: Result<SceneNodeId>) {
        if let Err(e) = built {
            self.skipped += 1;
            log::warn!("Skipping {:?} node: {}", kind, e);
        }
    }

    fn build_sky<B: ResourceBackend>(
        &mut self,
        pool: &mut ResourcePool<B>,
        graph: &mut SceneGraph,
        mapper: &mut ScrollMapper,
    ) {
        let dome = add_sky_dome(self.params.sphere_segments, pool, graph);
        self.skip_on_error(NodeKind::SkyDome, dome);

        for spec in [CelestialSpec::sun(), CelestialSpec::moon()] {
            let body = add_celestial(&spec, self.params.sphere_segments, pool, graph, mapper);
            self.skip_on_error(NodeKind::CelestialBody, body);
        }
    }
}

fn add_sky_dome<B: ResourceBackend>(
    sphere_segments: u32,
    pool: &mut ResourcePool<B>,
    graph: &mut SceneGraph,
) -> Result<SceneNodeId> {
    let geometry = pool.get_geometry(&GeometryDescriptor::dome(SKY_RADIUS, sphere_segments * 2))?;
    let material = pool.get_material(&MaterialDescriptor::sky())?;
    Ok(graph.add(NodeKind::SkyDome, Transform::default(), vec![MeshPart::new(geometry, material)]))
}

fn add_mountain<B: ResourceBackend>(
    spec: &MountainSpec,
    cone_segments: u32,
    pool: &mut ResourcePool<B>,
    graph: &mut SceneGraph,
    mapper: &mut ScrollMapper,
) -> Result<SceneNodeId> {
    let valid = [spec.radius, spec.height].iter().all(|v| v.is_finite() && *v > 0.0);
    if !valid {
        return Err(Error::Generation(format!(
            "mountain size {}x{} must be positive",
            spec.radius, spec.height
        )));
    }
    // Every mountain shares the unit cone; size comes from the node scale
    let geometry = pool.get_geometry(&GeometryDescriptor::cone(1.0, 1.0, cone_segments))?;
    let material = pool.get_material(&MaterialDescriptor::lit(spec.color))?;

    let base = Transform::from_position(spec.position).with_scale(spec.scale());
    let id = graph.add(NodeKind::Mountain, base, vec![MeshPart::new(geometry, material)]);
    let animation = NodeAnimation::new(base)
        .with_window(spec.window.0, spec.window.1)
        .with_bob(Bob {
            amplitude: spec.bob_amplitude,
            tilt: spec.tilt_amplitude,
            speed: MOUNTAIN_BOB_SPEED,
            phase: spec.phase,
        })
        .with_parallax(if spec.is_front { 0.6 } else { 0.25 });
    mapper.insert_node(id, animation);
    Ok(id)
}

fn add_cloud<B: ResourceBackend>(
    spec: &CloudSpec,
    sphere_segments: u32,
    pool: &mut ResourcePool<B>,
    graph: &mut SceneGraph,
    mapper: &mut ScrollMapper,
) -> Result<SceneNodeId> {
    let material = pool.get_material(&MaterialDescriptor::lit(CLOUD_COLOR).with_opacity(spec.opacity))?;
    let mut parts = Vec::with_capacity(spec.puffs.len());
    for puff in &spec.puffs {
        let descriptor = GeometryDescriptor::sphere(puff.radius, sphere_segments, (sphere_segments / 2).max(2));
        let geometry = pool.get_geometry(&descriptor)?;
        parts.push(MeshPart::new(geometry, material).with_local(Transform::from_position(puff.offset)));
    }

    let base = Transform::from_position(spec.position);
    let id = graph.add(NodeKind::Cloud, base, parts);
    let animation = NodeAnimation::new(base)
        .with_drift(Drift {
            speed: spec.drift_speed,
            wrap_width: spec.wrap_width,
        })
        .with_scroll_lift(spec.scroll_lift)
        .with_bob(Bob {
            amplitude: 0.1,
            tilt: 0.0,
            speed: CLOUD_BOB_SPEED,
            phase: spec.position.x,
        })
        .with_parallax(0.8);
    mapper.insert_node(id, animation);
    Ok(id)
}

fn add_celestial<B: ResourceBackend>(
    spec: &CelestialSpec,
    sphere_segments: u32,
    pool: &mut ResourcePool<B>,
    graph: &mut SceneGraph,
    mapper: &mut ScrollMapper,
) -> Result<SceneNodeId> {
    let descriptor = GeometryDescriptor::sphere(spec.radius, sphere_segments, (sphere_segments / 2).max(2));
    let geometry = pool.get_geometry(&descriptor)?;
    let material = pool.get_material(&MaterialDescriptor::unlit(spec.color))?;
    let base = Transform {
        position: spec.position_at(0.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
    let id = graph.add(NodeKind::CelestialBody, base, vec![MeshPart::new(geometry, material)]);
    mapper.insert_node(id, NodeAnimation::new(base).with_celestial(spec.clone()));
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{MapperInput, ScenePreset};
    use crate::capability::{CapabilityProfile, QualityTier, TierReason};
    use crate::pool::CpuBackend;
    use std::collections::HashSet;

    fn profile(tier: QualityTier) -> CapabilityProfile {
        CapabilityProfile::from_tier(tier, TierReason::Default, true, None)
    }

    fn params() -> SceneBuildParams {
        let mut params = SceneBuildParams::for_profile(&profile(QualityTier::Medium), 42, 12, 8, 4);
        params.terrain.segments = 16;
        params
    }

    struct Fixture {
        pool: ResourcePool<CpuBackend>,
        graph: SceneGraph,
        mapper: ScrollMapper,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                pool: ResourcePool::new(CpuBackend::new(), 64),
                graph: SceneGraph::new(),
                mapper: ScrollMapper::from_preset(ScenePreset::FullPage).unwrap(),
            }
        }

        fn run(&mut self, build: &mut SceneBuild) -> Result<(BuildProgress, usize)> {
            let mut steps = 0;
            loop {
                steps += 1;
                let progress = build.step(&mut self.pool, &mut self.graph, &mut self.mapper)?;
                if !matches!(progress, BuildProgress::Pending { .. }) {
                    return Ok((progress, steps));
                }
            }
        }
    }

    #[test]
    fn test_full_build() {
        let mut fx = Fixture::new();
        let mut build = SceneBuild::new(params(), CancellationToken::new());
        let (progress, steps) = fx.run(&mut build).unwrap();

        // dome + sun + moon + 12 mountains + 8 clouds + terrain
        assert_eq!(progress, BuildProgress::Complete { nodes: 24, skipped: 0 });
        assert_eq!(fx.graph.count_kind(NodeKind::Mountain), 12);
        assert_eq!(fx.graph.count_kind(NodeKind::Cloud), 8);
        assert_eq!(fx.graph.count_kind(NodeKind::Terrain), 1);
        // 3 single stages + 17 terrain rows at 4 per step
        assert_eq!(steps, 3 + 5);
        assert!(build.is_done());
        assert_eq!(fx.pool.unique_count(), 1);
        // Dome is the only node without an animation entry
        assert_eq!(fx.mapper.node_count(), 23);
    }

    #[test]
    fn test_mountains_share_geometry() {
        let mut fx = Fixture::new();
        let mut build = SceneBuild::new(params(), CancellationToken::new());
        fx.run(&mut build).unwrap();

        let mountain_parts: Vec<MeshPart> = fx
            .graph
            .iter()
            .filter(|n| n.kind == NodeKind::Mountain)
            .flat_map(|n| n.parts.clone())
            .collect();
        let first = mountain_parts[0].geometry;
        assert!(mountain_parts.iter().all(|p| p.geometry == first));

        let materials: HashSet<_> = mountain_parts.iter().map(|p| p.material).collect();
        assert!(materials.len() <= crate::generation::MOUNTAIN_PALETTE.len());
    }

    #[test]
    fn test_counts_capped_by_tier() {
        let params = SceneBuildParams::for_profile(&profile(QualityTier::Low), 1, 100, 100, 7);
        let low = QualityTier::Low.params();
        assert_eq!(params.mountain_count, low.max_mountains);
        assert_eq!(params.cloud_count, low.max_clouds);
        assert_eq!(params.terrain.segments, low.terrain_segments);
        assert_eq!(params.rows_per_step, 7);
    }

    #[test]
    fn test_rows_per_step_floor() {
        let params = SceneBuildParams::for_profile(&profile(QualityTier::Medium), 1, 4, 4, 0);
        assert_eq!(params.rows_per_step, 1);
    }

    #[test]
    fn test_bad_cloud_material_skips_clouds_only() {
        let mut fx = Fixture::new();
        let mut params = params();
        params.clouds.opacity = 2.0;
        let mut build = SceneBuild::new(params, CancellationToken::new());
        let (progress, _) = fx.run(&mut build).unwrap();
        assert_eq!(progress, BuildProgress::Complete { nodes: 16, skipped: 8 });
        assert_eq!(fx.graph.count_kind(NodeKind::Cloud), 0);
        assert_eq!(fx.graph.count_kind(NodeKind::Terrain), 1);
    }

    #[test]
    fn test_bad_mountain_size_is_skipped() {
        let mut fx = Fixture::new();
        let mut params = params();
        params.mountains.front_height = (-4.0, -2.0);
        let mut build = SceneBuild::new(params, CancellationToken::new());
        let (progress, _) = fx.run(&mut build).unwrap();
        let BuildProgress::Complete { skipped, .. } = progress else {
            panic!("expected completion, got {:?}", progress);
        };
        // Back range (40%) survives
        assert_eq!(skipped, 7);
        assert_eq!(fx.graph.count_kind(NodeKind::Mountain), 5);
    }

    #[test]
    fn test_terrain_failure_is_fatal() {
        let mut fx = Fixture::new();
        let mut params = params();
        params.terrain.width = 0.0;
        let mut build = SceneBuild::new(params, CancellationToken::new());
        assert!(matches!(fx.run(&mut build), Err(Error::Generation(_))));
    }

    #[test]
    fn test_cancel_mid_terrain() {
        let mut fx = Fixture::new();
        let token = CancellationToken::new();
        let mut build = SceneBuild::new(params(), token.clone());
        for _ in 0..4 {
            build.step(&mut fx.pool, &mut fx.graph, &mut fx.mapper).unwrap();
        }
        token.cancel();
        let progress = build.step(&mut fx.pool, &mut fx.graph, &mut fx.mapper).unwrap();
        assert_eq!(progress, BuildProgress::Cancelled);
        assert_eq!(fx.graph.count_kind(NodeKind::Terrain), 0);
        assert!(build.is_done());
    }

    #[test]
    fn test_built_scene_animates() {
        let mut fx = Fixture::new();
        let mut build = SceneBuild::new(params(), CancellationToken::new());
        fx.run(&mut build).unwrap();

        let frame = fx.mapper.evaluate(&MapperInput::new(0.9, glam::Vec2::ZERO, 1.0));
        fx.graph.apply(&frame);
        // Front mountains leave at 0.75 but stay in the graph
        let hidden = fx.graph.iter().filter(|n| n.kind == NodeKind::Mountain && !n.contributing).count();
        assert_eq!(hidden, 7);
        assert_eq!(fx.graph.count_kind(NodeKind::Mountain), 12);
    }
}
