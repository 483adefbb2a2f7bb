//! Rate-limited steering input and Ackermann wheel-angle geometry.

use serde::{Deserialize, Serialize};
use simcore::clamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SteeringConfig {
    pub max_steer_angle: f64,
    pub steering_ratio: f64,
    pub ackermann_factor: f64,
    pub wheelbase: f64,
    pub track_width: f64,
    pub steering_rate: f64,
    pub steering_smoothing: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        SteeringConfig {
            max_steer_angle: 0.6,
            steering_ratio: 15.0,
            ackermann_factor: 0.8,
            wheelbase: 2.7,
            track_width: 1.5,
            steering_rate: 3.0,
            steering_smoothing: 0.0,
        }
    }
}

pub struct Steering {
    pub config: SteeringConfig,
    input: f64,
    current: f64,
}

impl Steering {
    pub fn new(config: SteeringConfig) -> Self {
        Steering { config, input: 0.0, current: 0.0 }
    }

    pub fn set_input(&mut self, input: f64) {
        self.input = clamp(input, -1.0, 1.0);
    }

    pub fn update(&mut self, dt: f64) {
        let max_delta = self.config.steering_rate * dt / self.config.max_steer_angle;
        let diff = self.input - self.current;
        if diff.abs() <= max_delta {
            self.current = self.input;
        } else {
            self.current += max_delta.copysign(diff);
        }
    }

    pub fn current_input(&self) -> f64 {
        self.current
    }

    /// `(left, right)` wheel steer angles (radians) for the current
    /// rate-limited input.
    pub fn get_wheel_angles(&self) -> (f64, f64) {
        self.get_wheel_angles_for(self.current)
    }

    /// Wheel angles for an arbitrary input, bypassing rate limiting.
    pub fn get_wheel_angles_instant(&self, input: f64) -> (f64, f64) {
        self.get_wheel_angles_for(clamp(input, -1.0, 1.0))
    }

    fn get_wheel_angles_for(&self, input: f64) -> (f64, f64) {
        let c = &self.config;
        let base_angle = input * c.max_steer_angle;

        if base_angle.abs() < 0.001 {
            return (0.0, 0.0);
        }
        if c.ackermann_factor < 0.001 {
            return (base_angle, base_angle);
        }

        if base_angle.abs() < 0.1 {
            let delta = c.wheelbase * base_angle / (2.0 * c.track_width) * c.ackermann_factor;
            return (base_angle + delta, base_angle - delta);
        }

        let radius = c.wheelbase / base_angle.abs().tan();
        let radius_inner = radius - c.track_width / 2.0;
        let radius_outer = radius + c.track_width / 2.0;
        let angle_inner = (c.wheelbase / radius_inner).atan();
        let angle_outer = (c.wheelbase / radius_outer).atan();

        let parallel = base_angle.abs();
        let blended_inner = parallel + (angle_inner - parallel) * c.ackermann_factor;
        let blended_outer = parallel + (angle_outer - parallel) * c.ackermann_factor;

        if base_angle > 0.0 {
            // Turning left: left wheel is inner.
            (blended_inner, blended_outer)
        } else {
            (-blended_outer, -blended_inner)
        }
    }

    pub fn get_turn_radius(&self) -> f64 {
        let base_angle = self.current * self.config.max_steer_angle;
        if base_angle.abs() < 0.001 {
            f64::INFINITY
        } else {
            self.config.wheelbase / base_angle.abs().tan()
        }
    }

    pub fn reset(&mut self) {
        self.input = 0.0;
        self.current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_input_gives_zero_wheel_angles() {
        let s = Steering::new(SteeringConfig::default());
        let (l, r) = s.get_wheel_angles();
        assert_eq!(l, 0.0);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn small_angle_inner_wheel_turns_more() {
        let mut s = Steering::new(SteeringConfig::default());
        s.set_input(0.05);
        s.update(10.0);
        let (l, r) = s.get_wheel_angles();
        assert!(l > r);
    }

    #[test]
    fn large_angle_left_turn_keeps_inner_greater() {
        let mut s = Steering::new(SteeringConfig::default());
        s.set_input(0.9);
        s.update(10.0);
        let (l, r) = s.get_wheel_angles();
        assert!(l > r);
        assert!(l > 0.0 && r > 0.0);
    }

    #[test]
    fn large_angle_right_turn_is_mirrored() {
        let mut s_left = Steering::new(SteeringConfig::default());
        s_left.set_input(0.9);
        s_left.update(10.0);
        let (ll, lr) = s_left.get_wheel_angles();

        let mut s_right = Steering::new(SteeringConfig::default());
        s_right.set_input(-0.9);
        s_right.update(10.0);
        let (rl, rr) = s_right.get_wheel_angles();

        assert_relative_eq!(rl, -lr, epsilon = 1e-9);
        assert_relative_eq!(rr, -ll, epsilon = 1e-9);
    }

    #[test]
    fn rate_limit_caps_change_per_step() {
        let mut s = Steering::new(SteeringConfig::default());
        s.set_input(1.0);
        s.update(0.001);
        assert!(s.current_input().abs() < 1.0);
    }

    #[test]
    fn turn_radius_infinite_when_straight() {
        let s = Steering::new(SteeringConfig::default());
        assert!(s.get_turn_radius().is_infinite());
    }
}
