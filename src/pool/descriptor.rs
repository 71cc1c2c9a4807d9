//! Canonical keys for pooled geometries and materials.

use std::hash::{Hash, Hasher};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::mesh::{self, MeshData};

/// A float dimension hashed by its bit pattern. `-0.0` is folded into `0.0`
/// so equal values always produce equal keys.
#[derive(Clone, Copy, Debug)]
pub struct Dim(f32);

impl Dim {
    pub fn get(self) -> f32 {
        self.0
    }

    fn bits(self) -> u32 {
        self.0.to_bits()
    }
}

impl From<f32> for Dim {
    fn from(value: f32) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }
}

impl PartialEq for Dim {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Dim {}

impl Hash for Dim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

fn positive(name: &str, value: Dim) -> Result<f32> {
    let v = value.get();
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(Error::Generation(format!("{} must be a positive finite number, got {}", name, v)))
    }
}

/// Shape + dimensional parameters identifying an interchangeable geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryDescriptor {
    Cone { radius: Dim, height: Dim, radial_segments: u32 },
    Sphere { radius: Dim, width_segments: u32, height_segments: u32 },
    Grid { width: Dim, depth: Dim, segments: u32 },
    Dome { radius: Dim, segments: u32 },
}

impl GeometryDescriptor {
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cone { radius: radius.into(), height: height.into(), radial_segments }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere { radius: radius.into(), width_segments, height_segments }
    }

    pub fn grid(width: f32, depth: f32, segments: u32) -> Self {
        Self::Grid { width: width.into(), depth: depth.into(), segments }
    }

    pub fn dome(radius: f32, segments: u32) -> Self {
        Self::Dome { radius: radius.into(), segments }
    }

    /// Check dimensions without building anything.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Cone { radius, height, .. } => {
                positive("cone radius", radius)?;
                positive("cone height", height)?;
            }
            Self::Sphere { radius, .. } | Self::Dome { radius, .. } => {
                positive("radius", radius)?;
            }
            Self::Grid { width, depth, .. } => {
                positive("grid width", width)?;
                positive("grid depth", depth)?;
            }
        }
        Ok(())
    }

    /// Build the CPU mesh for this descriptor.
    pub fn build_mesh(&self) -> Result<MeshData> {
        self.validate()?;
        Ok(match *self {
            Self::Cone { radius, height, radial_segments } => {
                mesh::cone(radius.get(), height.get(), radial_segments)
            }
            Self::Sphere { radius, width_segments, height_segments } => {
                mesh::sphere(radius.get(), width_segments, height_segments)
            }
            Self::Grid { width, depth, segments } => mesh::grid(width.get(), depth.get(), segments),
            Self::Dome { radius, segments } => mesh::dome(radius.get(), segments),
        })
    }
}

/// Shading model of a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Diffuse-lit surface (mountains, terrain, clouds)
    Lit,
    /// Emissive flat color (sun, moon)
    Unlit,
    /// Vertical gradient driven by the per-frame sky colors
    Sky,
}

/// Color/opacity/kind identifying an interchangeable material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialDescriptor {
    pub kind: MaterialKind,
    /// 0xRRGGBB, sRGB encoded
    pub color: u32,
    pub opacity: Dim,
    pub transparent: bool,
}

impl MaterialDescriptor {
    pub fn new(kind: MaterialKind, color: u32) -> Self {
        Self {
            kind,
            color,
            opacity: Dim::from(1.0_f32),
            transparent: false,
        }
    }

    pub fn lit(color: u32) -> Self {
        Self::new(MaterialKind::Lit, color)
    }

    pub fn unlit(color: u32) -> Self {
        Self::new(MaterialKind::Unlit, color)
    }

    pub fn sky() -> Self {
        Self::new(MaterialKind::Sky, 0xFFFFFF)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.into();
        self.transparent = opacity < 1.0;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.color > 0xFF_FF_FF {
            return Err(Error::Generation(format!("color {:#x} out of range", self.color)));
        }
        let opacity = self.opacity.get();
        if !(0.0..=1.0).contains(&opacity) {
            return Err(Error::Generation(format!("opacity {} outside [0, 1]", opacity)));
        }
        Ok(())
    }

    /// Base color converted to linear RGB.
    pub fn linear_color(&self) -> [f32; 3] {
        srgb_hex_to_linear(self.color)
    }
}

/// Convert an 0xRRGGBB sRGB color to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}
