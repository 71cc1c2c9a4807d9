//! Scroll-to-animation mapper.
//!
//! [`ScrollMapper::evaluate`] turns (progress, pointer, time) into a complete
//! frame: camera pose, per-node transform and opacity, and sky state. It reads
//! only its inputs and the authored tracks, so equal inputs always give equal
//! frames.

use std::collections::BTreeMap;

use glam::{Quat, Vec2, Vec3};

use super::lerp::Angle;
use super::presets::{CameraPath, ScenePreset, SkyRamps};
use super::track::Track;
use crate::core::camera::CameraPose;
use crate::core::types::Result;
use crate::generation::{CelestialKind, CelestialSpec};
use crate::scene::{SceneNodeId, Transform};

/// Where nodes outside their visibility window are parked.
pub const OFFSCREEN_Y: f32 = -1000.0;

/// Below this elevation a celestial body stops contributing.
const BELOW_HORIZON: f32 = -0.05;

/// Everything the mapper reads for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapperInput {
    /// Normalized scroll progress; clamped to [0, 1], NaN reads as 0
    pub progress: f32,
    /// Pointer in [-1, 1] on both axes, y up
    pub pointer: Vec2,
    /// Scene clock for ambient motion (bob, drift)
    pub time_secs: f32,
}

impl MapperInput {
    pub fn new(progress: f32, pointer: Vec2, time_secs: f32) -> Self {
        Self {
            progress,
            pointer,
            time_secs,
        }
    }

    fn sanitized(&self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self {
            progress: if self.progress.is_nan() { 0.0 } else { self.progress.clamp(0.0, 1.0) },
            pointer: Vec2::new(unit(self.pointer.x), unit(self.pointer.y)),
            time_secs: if self.time_secs.is_finite() { self.time_secs } else { 0.0 },
        }
    }
}

/// Mapper output for one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeFrame {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub opacity: f32,
    /// False when the node is outside its active segment
    pub contributing: bool,
}

/// Sky colours (linear RGB) and celestial elevations (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkyFrame {
    pub zenith: [f32; 3],
    pub horizon: [f32; 3],
    pub sun_elevation: f32,
    pub moon_elevation: f32,
    pub light_intensity: f32,
}

/// Complete mapper output for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameTransforms {
    pub camera: CameraPose,
    pub nodes: BTreeMap<SceneNodeId, NodeFrame>,
    pub sky: SkyFrame,
}

/// Ambient vertical bob plus a slight roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bob {
    pub amplitude: f32,
    /// Max roll in radians
    pub tilt: f32,
    /// Angular speed in radians per second
    pub speed: f32,
    pub phase: f32,
}

/// Constant lateral drift that wraps inside a band centred on x = 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drift {
    pub speed: f32,
    pub wrap_width: f32,
}

impl Drift {
    fn apply(&self, x: f32, time_secs: f32) -> f32 {
        if self.wrap_width <= 0.0 {
            return x;
        }
        let half = self.wrap_width * 0.5;
        (x + self.speed * time_secs + half).rem_euclid(self.wrap_width) - half
    }
}

/// Authored animation for one node. Everything except `base` is optional.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAnimation {
    pub base: Transform,
    /// Added to the base position
    pub offset: Option<Track<Vec3>>,
    /// Extra yaw about +Y
    pub yaw: Option<Track<Angle>>,
    pub opacity: Option<Track<f32>>,
    /// Inclusive progress range in which the node contributes
    pub window: Option<(f32, f32)>,
    pub bob: Option<Bob>,
    pub drift: Option<Drift>,
    /// Vertical rise over the full scroll range
    pub scroll_lift: f32,
    /// 0 = pinned, 1 = full pointer parallax
    pub parallax_depth: f32,
    /// Positions the node on a celestial arc driven by the sky ramps
    pub celestial: Option<CelestialSpec>,
}

impl NodeAnimation {
    pub fn new(base: Transform) -> Self {
        Self {
            base,
            offset: None,
            yaw: None,
            opacity: None,
            window: None,
            bob: None,
            drift: None,
            scroll_lift: 0.0,
            parallax_depth: 0.0,
            celestial: None,
        }
    }

    pub fn with_offset(mut self, track: Track<Vec3>) -> Self {
        self.offset = Some(track);
        self
    }

    pub fn with_yaw(mut self, track: Track<Angle>) -> Self {
        self.yaw = Some(track);
        self
    }

    pub fn with_opacity(mut self, track: Track<f32>) -> Self {
        self.opacity = Some(track);
        self
    }

    pub fn with_window(mut self, start: f32, end: f32) -> Self {
        self.window = Some((start.min(end), start.max(end)));
        self
    }

    pub fn with_bob(mut self, bob: Bob) -> Self {
        self.bob = Some(bob);
        self
    }

    pub fn with_drift(mut self, drift: Drift) -> Self {
        self.drift = Some(drift);
        self
    }

    pub fn with_scroll_lift(mut self, lift: f32) -> Self {
        self.scroll_lift = lift;
        self
    }

    pub fn with_parallax(mut self, depth: f32) -> Self {
        self.parallax_depth = depth.clamp(0.0, 1.0);
        self
    }

    pub fn with_celestial(mut self, spec: CelestialSpec) -> Self {
        self.celestial = Some(spec);
        self
    }
}

/// Camera, sky and node tracks for one scene.
#[derive(Clone, Debug)]
pub struct ScrollMapper {
    camera: CameraPath,
    sky: SkyRamps,
    nodes: BTreeMap<SceneNodeId, NodeAnimation>,
    parallax_enabled: bool,
    /// Max world-space node offset at parallax depth 1
    node_parallax: f32,
}

impl ScrollMapper {
    pub fn new(camera: CameraPath, sky: SkyRamps) -> Self {
        Self {
            camera,
            sky,
            nodes: BTreeMap::new(),
            parallax_enabled: true,
            node_parallax: 0.5,
        }
    }

    pub fn from_preset(preset: ScenePreset) -> Result<Self> {
        Ok(Self::new(preset.camera_path()?, preset.sky_ramps()?))
    }

    pub fn set_parallax_enabled(&mut self, enabled: bool) {
        self.parallax_enabled = enabled;
    }

    pub fn insert_node(&mut self, id: SceneNodeId, animation: NodeAnimation) {
        self.nodes.insert(id, animation);
    }

    pub fn remove_node(&mut self, id: SceneNodeId) -> Option<NodeAnimation> {
        self.nodes.remove(&id)
    }

    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn evaluate(&self, input: &MapperInput) -> FrameTransforms {
        let input = input.sanitized();
        let pointer = if self.parallax_enabled { input.pointer } else { Vec2::ZERO };
        let p = input.progress;

        let sway = Vec3::new(pointer.x, pointer.y * 0.5, 0.0) * self.camera.parallax_offset;
        let camera = CameraPose {
            position: self.camera.position.sample(p) + sway.clamp_length_max(self.camera.parallax_offset),
            look_at: self.camera.look_at.sample(p),
            fov_y_degrees: self.camera.fov_y_degrees.sample(p),
        };

        let sky = self.sky.sample(p);
        let nodes = self
            .nodes
            .iter()
            .map(|(id, anim)| (*id, self.evaluate_node(anim, p, pointer, input.time_secs, &sky)))
            .collect();

        FrameTransforms { camera, nodes, sky }
    }

    fn evaluate_node(&self, anim: &NodeAnimation, p: f32, pointer: Vec2, time: f32, sky: &SkyFrame) -> NodeFrame {
        let base = anim.base;
        if let Some((start, end)) = anim.window {
            if p < start || p > end {
                return NodeFrame {
                    position: Vec3::new(base.position.x, OFFSCREEN_Y, base.position.z),
                    rotation: base.rotation,
                    scale: base.scale,
                    opacity: 0.0,
                    contributing: false,
                };
            }
        }

        let mut position = base.position;
        let mut rotation = base.rotation;
        let mut contributing = true;

        if let Some(spec) = &anim.celestial {
            let elevation = match spec.kind {
                CelestialKind::Sun => sky.sun_elevation,
                CelestialKind::Moon => sky.moon_elevation,
            };
            position = spec.position_at(elevation);
            contributing = elevation > BELOW_HORIZON;
        }
        if let Some(track) = &anim.offset {
            position += track.sample(p);
        }
        if let Some(track) = &anim.yaw {
            rotation = Quat::from_rotation_y(track.sample(p).radians()) * rotation;
        }
        if let Some(bob) = &anim.bob {
            let angle = time * bob.speed + bob.phase;
            position.y += bob.amplitude * angle.sin();
            rotation *= Quat::from_rotation_z(bob.tilt * (angle * 0.7).cos());
        }
        if let Some(drift) = &anim.drift {
            position.x = drift.apply(position.x, time);
        }
        position.y += anim.scroll_lift * p;

        if anim.parallax_depth > 0.0 {
            let cap = self.node_parallax * anim.parallax_depth;
            let offset = Vec3::new(pointer.x, pointer.y, 0.0) * cap;
            position += offset.clamp_length_max(cap);
        }

        let opacity = anim.opacity.as_ref().map_or(1.0, |t| t.sample(p).clamp(0.0, 1.0));

        NodeFrame {
            position,
            rotation,
            scale: base.scale,
            opacity,
            contributing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_mapper() -> ScrollMapper {
        let camera = CameraPath {
            position: Track::from_pairs(&[
                (0.0, Vec3::new(0.0, 2.0, 10.0)),
                (0.5, Vec3::new(0.0, 0.0, 5.0)),
                (1.0, Vec3::new(0.0, -2.0, 0.0)),
            ])
            .unwrap(),
            look_at: Track::constant(Vec3::new(0.0, 0.0, -20.0)),
            fov_y_degrees: Track::constant(60.0),
            parallax_offset: 0.5,
        };
        ScrollMapper::new(camera, ScenePreset::FullPage.sky_ramps().unwrap())
    }

    fn at(progress: f32) -> MapperInput {
        MapperInput::new(progress, Vec2::ZERO, 0.0)
    }

    #[test]
    fn test_camera_midpoint_at_quarter() {
        let mapper = scenario_mapper();
        let positions: Vec<Vec3> = [0.0, 0.25, 0.5, 0.75, 1.0]
            .iter()
            .map(|p| mapper.evaluate(&at(*p)).camera.position)
            .collect();
        let midpoint = (Vec3::new(0.0, 2.0, 10.0) + Vec3::new(0.0, 0.0, 5.0)) * 0.5;
        assert_eq!(positions[1], midpoint);
        assert_eq!(positions[0], Vec3::new(0.0, 2.0, 10.0));
        assert_eq!(positions[4], Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_clamping() {
        let mut mapper = scenario_mapper();
        mapper.insert_node(
            SceneNodeId(1),
            NodeAnimation::new(Transform::default())
                .with_offset(Track::from_pairs(&[(0.0, Vec3::ZERO), (1.0, Vec3::Y)]).unwrap())
                .with_scroll_lift(3.0),
        );
        let pointer = Vec2::new(0.3, -0.2);
        let low = mapper.evaluate(&MapperInput::new(0.0, pointer, 2.0));
        let high = mapper.evaluate(&MapperInput::new(1.0, pointer, 2.0));
        for p in [-0.5, -10.0, f32::NEG_INFINITY, f32::NAN] {
            assert_eq!(mapper.evaluate(&MapperInput::new(p, pointer, 2.0)), low);
        }
        for p in [1.01, 4.0, f32::INFINITY] {
            assert_eq!(mapper.evaluate(&MapperInput::new(p, pointer, 2.0)), high);
        }
    }

    #[test]
    fn test_deterministic() {
        let mut mapper = ScrollMapper::from_preset(ScenePreset::FullPage).unwrap();
        mapper.insert_node(
            SceneNodeId(0),
            NodeAnimation::new(Transform::default())
                .with_bob(Bob { amplitude: 0.2, tilt: 0.05, speed: 1.3, phase: 0.4 })
                .with_parallax(1.0),
        );
        for i in 0..20 {
            let input = MapperInput::new(i as f32 / 19.0, Vec2::new(0.5, 0.1), i as f32 * 0.1);
            assert_eq!(mapper.evaluate(&input), mapper.evaluate(&input));
        }
    }

    #[test]
    fn test_pointer_parallax_is_capped() {
        let mut mapper = scenario_mapper();
        mapper.insert_node(SceneNodeId(0), NodeAnimation::new(Transform::default()).with_parallax(1.0));
        let rest = mapper.evaluate(&at(0.3));
        for pointer in [Vec2::new(1e6, -1e6), Vec2::ONE, Vec2::new(-1.0, 1.0), Vec2::new(f32::NAN, 5.0)] {
            let frame = mapper.evaluate(&MapperInput::new(0.3, pointer, 0.0));
            let camera_shift = frame.camera.position - rest.camera.position;
            assert!(camera_shift.length() <= 0.5 + 1e-5);
            let node_shift = frame.nodes[&SceneNodeId(0)].position - rest.nodes[&SceneNodeId(0)].position;
            assert!(node_shift.length() <= mapper.node_parallax + 1e-5);
        }
    }

    #[test]
    fn test_parallax_disabled() {
        let mut mapper = scenario_mapper();
        mapper.set_parallax_enabled(false);
        let a = mapper.evaluate(&at(0.4));
        let b = mapper.evaluate(&MapperInput::new(0.4, Vec2::ONE, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_window_parks_node_offscreen() {
        let mut mapper = scenario_mapper();
        let id = SceneNodeId(4);
        mapper.insert_node(
            id,
            NodeAnimation::new(Transform::from_position(Vec3::new(1.0, 0.0, -10.0))).with_window(0.2, 0.6),
        );
        let before = mapper.evaluate(&at(0.1)).nodes[&id];
        assert!(!before.contributing);
        assert_eq!(before.position.y, OFFSCREEN_Y);
        assert_eq!(before.opacity, 0.0);

        let inside = mapper.evaluate(&at(0.4)).nodes[&id];
        assert!(inside.contributing);
        assert_eq!(inside.position, Vec3::new(1.0, 0.0, -10.0));

        // Re-entry after leaving needs nothing but a new evaluation
        assert!(!mapper.evaluate(&at(0.9)).nodes[&id].contributing);
        assert!(mapper.evaluate(&at(0.6)).nodes[&id].contributing);
    }

    #[test]
    fn test_bob_bounded_and_time_driven() {
        let mut mapper = scenario_mapper();
        let id = SceneNodeId(0);
        mapper.insert_node(
            id,
            NodeAnimation::new(Transform::default()).with_bob(Bob { amplitude: 0.25, tilt: 0.05, speed: 2.0, phase: 0.0 }),
        );
        let mut ys = Vec::new();
        for i in 0..50 {
            let frame = mapper.evaluate(&MapperInput::new(0.5, Vec2::ZERO, i as f32 * 0.1));
            let y = frame.nodes[&id].position.y;
            assert!(y.abs() <= 0.25 + 1e-5);
            ys.push(y);
        }
        assert!(ys.iter().any(|y| *y > 0.1));
        assert!(ys.iter().any(|y| *y < -0.1));
    }

    #[test]
    fn test_drift_wraps_inside_band() {
        let drift = Drift { speed: 3.0, wrap_width: 20.0 };
        for i in 0..100 {
            let x = drift.apply(5.0, i as f32 * 0.7);
            assert!((-10.0..10.0).contains(&x));
        }
        assert!((drift.apply(5.0, 0.0) - 5.0).abs() < 1e-5);
        assert!((drift.apply(9.0, 1.0) - -8.0).abs() < 1e-4);
    }

    #[test]
    fn test_celestial_follows_sky() {
        let mut mapper = ScrollMapper::from_preset(ScenePreset::FullPage).unwrap();
        let sun = SceneNodeId(0);
        mapper.insert_node(sun, NodeAnimation::new(Transform::default()).with_celestial(CelestialSpec::sun()));
        let noon = mapper.evaluate(&at(0.45));
        let dusk = mapper.evaluate(&at(1.0));
        assert!(noon.nodes[&sun].contributing);
        assert!(noon.nodes[&sun].position.y > dusk.nodes[&sun].position.y);
        assert!(!dusk.nodes[&sun].contributing);
    }

    #[test]
    fn test_opacity_track_clamped() {
        let mut mapper = scenario_mapper();
        let id = SceneNodeId(2);
        mapper.insert_node(
            id,
            NodeAnimation::new(Transform::default())
                .with_opacity(Track::from_pairs(&[(0.0, -1.0), (1.0, 2.0)]).unwrap()),
        );
        assert_eq!(mapper.evaluate(&at(0.0)).nodes[&id].opacity, 0.0);
        assert_eq!(mapper.evaluate(&at(1.0)).nodes[&id].opacity, 1.0);
    }
}
