//! Engine torque curve, differential torque split, brake distribution, RPM follower.

use serde::{Deserialize, Serialize};
use simcore::clamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifferentialType {
    Open,
    Locked,
    Lsd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    Rwd,
    Fwd,
    Awd,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DrivetrainConfig {
    pub drive_type: DriveType,
    pub differential: DifferentialType,
    pub max_torque: f64,
    pub max_rpm: f64,
    pub idle_rpm: f64,
    pub gear_ratio: f64,
    pub efficiency: f64,
    pub lsd_preload: f64,
    pub lsd_power_ratio: f64,
    pub lsd_coast_ratio: f64,
    pub wheel_inertia: f64,
    pub max_brake_torque: f64,
    pub brake_bias: f64,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        DrivetrainConfig {
            drive_type: DriveType::Rwd,
            differential: DifferentialType::Open,
            max_torque: 400.0,
            max_rpm: 7000.0,
            idle_rpm: 800.0,
            gear_ratio: 3.5,
            efficiency: 0.9,
            lsd_preload: 100.0,
            lsd_power_ratio: 0.3,
            lsd_coast_ratio: 0.1,
            wheel_inertia: 1.0,
            max_brake_torque: 3000.0,
            brake_bias: 0.65,
        }
    }
}

pub struct Drivetrain {
    pub config: DrivetrainConfig,
    engine_rpm: f64,
}

impl Drivetrain {
    pub fn new(config: DrivetrainConfig) -> Self {
        let engine_rpm = config.idle_rpm;
        Drivetrain { config, engine_rpm }
    }

    pub fn engine_rpm(&self) -> f64 {
        self.engine_rpm
    }

    /// Piecewise torque-vs-rpm shape: ramp below 30%, flat 30-80%, decay above 80%.
    pub fn get_engine_torque(&self, throttle: f64) -> f64 {
        let c = &self.config;
        let rpm_fraction = clamp(self.engine_rpm / c.max_rpm, 0.1, 1.0);

        let shape = if rpm_fraction < 0.3 {
            0.6 + rpm_fraction / 0.3 * 0.4
        } else if rpm_fraction < 0.8 {
            1.0
        } else {
            1.0 - (rpm_fraction - 0.8) / 0.2 * 0.3
        };

        throttle * c.max_torque * shape
    }

    /// Drive torque to the two driven wheels, given throttle and their
    /// current angular velocities `(left, right)`.
    pub fn get_drive_torques(&self, throttle: f64, wheel_speeds: (f64, f64)) -> (f64, f64) {
        let c = &self.config;
        let engine_torque = self.get_engine_torque(throttle);
        let axle_torque = engine_torque * c.gear_ratio * c.efficiency;

        match c.differential {
            DifferentialType::Open | DifferentialType::Locked => (axle_torque / 2.0, axle_torque / 2.0),
            DifferentialType::Lsd => self.lsd_torques(axle_torque, wheel_speeds),
        }
    }

    fn lsd_torques(&self, axle_torque: f64, wheel_speeds: (f64, f64)) -> (f64, f64) {
        let c = &self.config;
        let lock_ratio = if axle_torque > 0.0 { c.lsd_power_ratio } else { c.lsd_coast_ratio };
        let locking_torque = c.lsd_preload + axle_torque.abs() * lock_ratio;

        let t_base = axle_torque / 2.0;
        let delta_omega = wheel_speeds.1 - wheel_speeds.0;

        if delta_omega.abs() > 0.1 {
            let transfer = locking_torque.min(t_base.abs());
            if delta_omega > 0.0 {
                (t_base + transfer * lock_ratio, t_base - transfer * lock_ratio)
            } else {
                (t_base - transfer * lock_ratio, t_base + transfer * lock_ratio)
            }
        } else {
            (t_base, t_base)
        }
    }

    /// `(fl, fr, rl, rr)` brake torques from a single brake input.
    pub fn get_brake_torques(&self, brake: f64) -> (f64, f64, f64, f64) {
        let c = &self.config;
        let total = brake * c.max_brake_torque;
        let front = total * c.brake_bias;
        let rear = total * (1.0 - c.brake_bias);
        (front / 2.0, front / 2.0, rear / 2.0, rear / 2.0)
    }

    /// Smoothed RPM follower with a ~0.2s time constant.
    pub fn update_engine_rpm(&mut self, driven_wheel_speed: f64, dt: f64) {
        let c = &self.config;
        let target_rpm = clamp(
            driven_wheel_speed.abs() * c.gear_ratio * 60.0 / (2.0 * std::f64::consts::PI),
            c.idle_rpm,
            c.max_rpm,
        );
        let alpha = (dt * 5.0).min(1.0);
        self.engine_rpm += (target_rpm - self.engine_rpm) * alpha;
    }

    pub fn reset(&mut self) {
        self.engine_rpm = self.config.idle_rpm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_throttle_gives_zero_torque() {
        let d = Drivetrain::new(DrivetrainConfig::default());
        assert_eq!(d.get_engine_torque(0.0), 0.0);
    }

    #[test]
    fn open_diff_splits_evenly() {
        let d = Drivetrain::new(DrivetrainConfig::default());
        let (l, r) = d.get_drive_torques(1.0, (10.0, 10.0));
        assert_relative_eq!(l, r, epsilon = 1e-9);
    }

    #[test]
    fn lsd_transfers_torque_on_wheel_speed_difference() {
        let mut config = DrivetrainConfig::default();
        config.differential = DifferentialType::Lsd;
        let d = Drivetrain::new(config);
        let (l, r) = d.get_drive_torques(1.0, (5.0, 20.0));
        assert!(l > r);
    }

    #[test]
    fn brake_split_respects_bias() {
        let d = Drivetrain::new(DrivetrainConfig::default());
        let (fl, fr, rl, rr) = d.get_brake_torques(1.0);
        assert_relative_eq!(fl, fr, epsilon = 1e-9);
        assert_relative_eq!(rl, rr, epsilon = 1e-9);
        assert!(fl + fr > rl + rr);
    }

    #[test]
    fn rpm_follows_wheel_speed_toward_target() {
        let mut d = Drivetrain::new(DrivetrainConfig::default());
        for _ in 0..500 {
            d.update_engine_rpm(30.0, 0.01);
        }
        let expected = (30.0_f64 * d.config.gear_ratio * 60.0 / (2.0 * std::f64::consts::PI))
            .clamp(d.config.idle_rpm, d.config.max_rpm);
        assert_relative_eq!(d.engine_rpm(), expected, epsilon = 1.0);
    }

    #[test]
    fn reset_restores_idle_rpm() {
        let mut d = Drivetrain::new(DrivetrainConfig::default());
        d.update_engine_rpm(50.0, 1.0);
        d.reset();
        assert_eq!(d.engine_rpm(), d.config.idle_rpm);
    }
}
