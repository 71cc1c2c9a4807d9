//! Ridgeline - adaptive scroll-driven 3D scene engine

pub mod core;
pub mod capability;
pub mod mesh;
pub mod pool;
pub mod generation;
pub mod scroll;
pub mod animation;
pub mod scene;
pub mod render;
pub mod fallback;
pub mod engine;
