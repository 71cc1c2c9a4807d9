//! Scene camera

use crate::core::types::{Mat4, Vec3};

/// Camera placement produced by the scroll mapper for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World position
    pub position: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, look_at: Vec3, fov_y_degrees: f32) -> Self {
        Self {
            position,
            look_at,
            fov_y_degrees,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO, 60.0)
    }
}

/// Perspective camera driven by a [`CameraPose`] each frame
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_pose(pose: &CameraPose, aspect: f32) -> Self {
        Self {
            position: pose.position,
            target: pose.look_at,
            fov_y: pose.fov_y_degrees.to_radians(),
            aspect,
            near: 0.1,
            far: 500.0,
        }
    }

    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.look_at;
        self.fov_y = pose.fov_y_degrees.to_radians();
    }

    /// Unit view direction. Falls back to -Z when the target sits on the eye.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    /// World up used for the view basis; swapped to +Z when looking straight
    /// up or down.
    fn up_hint(&self) -> Vec3 {
        if self.forward().cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up_hint())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ignored for a zero-height surface (minimized window).
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 && width > 0.0 {
            self.aspect = width / height;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_pose(&CameraPose::default(), 16.0 / 9.0)
    }
}
