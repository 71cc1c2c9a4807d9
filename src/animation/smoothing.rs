//! Critically damped smoothing for pointer-follow motion.

use glam::Vec2;

/// Critically damped spring chasing a moving target. Never overshoots.
#[derive(Clone, Debug)]
pub struct SmoothDamp {
    current: Vec2,
    target: Vec2,
    velocity: Vec2,
    /// Approximate time to reach the target, in seconds
    smooth_time: f32,
}

impl SmoothDamp {
    pub fn new(smooth_time: f32) -> Self {
        Self {
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            velocity: Vec2::ZERO,
            smooth_time: smooth_time.max(1e-4),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn value(&self) -> Vec2 {
        self.current
    }

    /// Snap to `value` with zero velocity.
    pub fn reset(&mut self, value: Vec2) {
        self.current = value;
        self.target = value;
        self.velocity = Vec2::ZERO;
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn update(&mut self, dt: f32) -> Vec2 {
        if dt <= 0.0 || !dt.is_finite() {
            return self.current;
        }
        let omega = 2.0 / self.smooth_time;
        let x = omega * dt;
        // Pade approximation of exp(-x)
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.current - self.target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut next = self.target + (change + temp) * decay;

        // Crossed the target: stop there
        if (self.target - self.current).dot(next - self.target) > 0.0 {
            next = self.target;
            self.velocity = Vec2::ZERO;
        }
        self.current = next;
        self.current
    }

    /// True once the value has effectively reached the target.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.current.distance(self.target) <= epsilon && self.velocity.length() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_without_overshoot() {
        let mut damp = SmoothDamp::new(0.2);
        damp.set_target(Vec2::new(1.0, -1.0));
        let mut prev = 0.0;
        for _ in 0..120 {
            let v = damp.update(1.0 / 60.0);
            assert!(v.x <= 1.0 + 1e-6);
            assert!(v.x >= prev - 1e-6);
            prev = v.x;
        }
        assert!(damp.is_settled(1e-3));
    }

    #[test]
    fn test_not_instant() {
        let mut damp = SmoothDamp::new(0.25);
        damp.set_target(Vec2::X);
        let v = damp.update(1.0 / 60.0);
        assert!(v.x > 0.0 && v.x < 0.5);
        assert!(!damp.is_settled(1e-3));
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut damp = SmoothDamp::new(0.1);
        damp.set_target(Vec2::ONE);
        assert_eq!(damp.update(0.0), Vec2::ZERO);
        damp.reset(Vec2::ONE);
        assert!(damp.is_settled(0.0));
    }
}
