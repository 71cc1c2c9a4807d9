//! Interpolation in each property's natural space.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for [f32; 3] {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
        ]
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

/// Spherical, shortest path.
impl Lerp for Quat {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.slerp(*other, t)
    }
}

// ---------------------------------------------------------------------------
// Angle
// ---------------------------------------------------------------------------

/// An angle in radians that interpolates along the shortest arc.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(pub f32);

impl Angle {
    pub fn degrees(deg: f32) -> Self {
        Self(deg.to_radians())
    }

    pub fn radians(self) -> f32 {
        self.0
    }
}

impl Lerp for Angle {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        // Signed difference wrapped into [-PI, PI)
        let delta = (other.0 - self.0 + PI).rem_euclid(TAU) - PI;
        Angle(self.0 + delta * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_vector() {
        assert_eq!(Lerp::lerp(&2.0_f32, &4.0, 0.5), 3.0);
        // glam's inherent by-value lerp would shadow the trait method
        assert_eq!(Lerp::lerp(&Vec3::ZERO, &Vec3::new(2.0, 4.0, 6.0), 0.5), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!([0.0_f32, 1.0, 2.0].lerp(&[1.0, 1.0, 0.0], 1.0), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_angle_shortest_arc() {
        // 350 deg -> 10 deg passes through 0, not 180
        let a = Angle::degrees(350.0);
        let b = Angle::degrees(10.0);
        let mid = a.lerp(&b, 0.5).radians().to_degrees().rem_euclid(360.0);
        assert!(mid < 1e-3 || (360.0 - mid) < 1e-3);

        let c = Angle::degrees(10.0).lerp(&Angle::degrees(50.0), 0.25);
        assert!((c.radians().to_degrees() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_quat_slerp_midpoint() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mid = Lerp::lerp(&a, &b, 0.5);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.abs_diff_eq(expected, 1e-5));
    }
}
