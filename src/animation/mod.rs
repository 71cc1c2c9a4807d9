//! Scroll-driven animation: waypoint tracks, the mapper, and pointer smoothing

pub mod lerp;
pub mod mapper;
pub mod presets;
pub mod smoothing;
pub mod track;

pub use lerp::{Angle, Lerp};
pub use mapper::{Bob, Drift, FrameTransforms, MapperInput, NodeAnimation, NodeFrame, ScrollMapper, SkyFrame, OFFSCREEN_Y};
pub use presets::{CameraPath, ScenePreset, SkyRamps};
pub use smoothing::SmoothDamp;
pub use track::{Track, Waypoint};
