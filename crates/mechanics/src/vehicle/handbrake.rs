//! Rate-limited handbrake engagement, rear-wheel-only torque, lock detection.

use serde::{Deserialize, Serialize};
use simcore::clamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandbrakeConfig {
    pub max_torque: f64,
    pub engagement_rate: f64,
    pub release_rate: f64,
    pub can_lock_wheels: bool,
    pub lock_threshold: f64,
}

impl Default for HandbrakeConfig {
    fn default() -> Self {
        HandbrakeConfig {
            max_torque: 2000.0,
            engagement_rate: 10.0,
            release_rate: 15.0,
            can_lock_wheels: true,
            lock_threshold: 0.5,
        }
    }
}

pub struct Handbrake {
    pub config: HandbrakeConfig,
    input: f64,
    engagement: f64,
}

impl Handbrake {
    pub fn new(config: HandbrakeConfig) -> Self {
        Handbrake { config, input: 0.0, engagement: 0.0 }
    }

    pub fn set_input(&mut self, input: f64) {
        self.input = clamp(input, 0.0, 1.0);
    }

    pub fn update(&mut self, dt: f64) {
        let c = &self.config;
        if self.input > self.engagement {
            self.engagement = (self.engagement + c.engagement_rate * dt).min(self.input);
        } else {
            self.engagement = (self.engagement - c.release_rate * dt).max(self.input);
        }
    }

    /// `(left, right)` rear-wheel torque magnitudes.
    pub fn get_brake_torques(&self, rear_wheel_speeds: (f64, f64)) -> (f64, f64) {
        let torque = self.engagement * self.config.max_torque;
        let _ = rear_wheel_speeds;
        (torque, torque)
    }

    /// Signed torque opposing a given wheel's current spin.
    pub fn get_torque_with_direction(&self, wheel_angular_velocity: f64) -> f64 {
        let torque = self.engagement * self.config.max_torque;
        -torque * wheel_angular_velocity.signum()
    }

    fn is_locked(&self, wheel_angular_velocity: f64) -> bool {
        self.config.can_lock_wheels
            && self.engagement > 0.8
            && wheel_angular_velocity.abs() < self.config.lock_threshold
    }

    pub fn left_locked(&self, left_angular_velocity: f64) -> bool {
        self.is_locked(left_angular_velocity)
    }

    pub fn right_locked(&self, right_angular_velocity: f64) -> bool {
        self.is_locked(right_angular_velocity)
    }

    pub fn both_locked(&self, left: f64, right: f64) -> bool {
        self.left_locked(left) && self.right_locked(right)
    }

    pub fn engagement(&self) -> f64 {
        self.engagement
    }

    pub fn is_engaged(&self) -> bool {
        self.engagement > 0.0
    }

    pub fn is_fully_engaged(&self) -> bool {
        self.engagement >= 1.0 - 1e-9
    }

    pub fn reset(&mut self) {
        self.input = 0.0;
        self.engagement = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engage_rate_limited() {
        let mut h = Handbrake::new(HandbrakeConfig::default());
        h.set_input(1.0);
        h.update(0.01);
        assert!(h.engagement() < 1.0);
        assert!(h.engagement() > 0.0);
    }

    #[test]
    fn release_is_faster_than_engage() {
        let mut engage = Handbrake::new(HandbrakeConfig::default());
        engage.set_input(1.0);
        engage.update(0.1);

        let mut release = Handbrake::new(HandbrakeConfig::default());
        release.set_input(1.0);
        release.update(10.0);
        release.set_input(0.0);
        release.update(0.1);

        assert!(release.engagement() < 1.0 - engage.engagement());
    }

    #[test]
    fn lock_detected_when_fully_engaged_and_slow() {
        let mut h = Handbrake::new(HandbrakeConfig::default());
        h.set_input(1.0);
        h.update(10.0);
        assert!(h.left_locked(0.1));
        assert!(!h.left_locked(5.0));
    }

    #[test]
    fn reset_clears_engagement() {
        let mut h = Handbrake::new(HandbrakeConfig::default());
        h.set_input(1.0);
        h.update(10.0);
        h.reset();
        assert_eq!(h.engagement(), 0.0);
        assert!(!h.is_engaged());
    }
}
