//! Complete per-wheel tire model: Pacejka + slip + combined slip + relaxation
//! + wheel spin integration.

use serde::{Deserialize, Serialize};
use simcore::Vec3;

use super::combined::{CombinedForces, CombinedSlip, CombinedSlipMethod};
use super::pacejka::{PacejkaFormula, PacejkaParams};
use super::slip::{self, SlipState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TireState {
    pub slip_ratio: f64,
    pub slip_angle: f64,
    pub slip_angle_deg: f64,
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub fx_pure: f64,
    pub fy_pure: f64,
    pub saturation: f64,
    pub angular_velocity: f64,
    pub rotation_angle: f64,
    pub contact_velocity: f64,
    pub is_grounded: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TireConfig {
    pub radius: f64,
    pub width: f64,
    pub inertia: f64,
    pub pacejka_params: PacejkaParams,
    pub relaxation_length_x: f64,
    pub relaxation_length_y: f64,
    pub use_relaxation: bool,
    pub friction_mu: f64,
}

impl Default for TireConfig {
    fn default() -> Self {
        TireConfig {
            radius: 0.32,
            width: 0.225,
            inertia: 1.0,
            pacejka_params: PacejkaParams::sport_tire(),
            relaxation_length_x: 0.4,
            relaxation_length_y: 0.5,
            use_relaxation: true,
            friction_mu: 1.0,
        }
    }
}

impl TireConfig {
    pub fn sport() -> Self {
        TireConfig {
            radius: 0.32,
            width: 0.245,
            inertia: 1.2,
            pacejka_params: PacejkaParams::sport_tire(),
            relaxation_length_x: 0.3,
            relaxation_length_y: 0.4,
            use_relaxation: true,
            friction_mu: 1.0,
        }
    }

    pub fn drift() -> Self {
        TireConfig {
            radius: 0.32,
            width: 0.225,
            inertia: 1.0,
            pacejka_params: PacejkaParams::drift_tire(),
            relaxation_length_x: 0.35,
            relaxation_length_y: 0.45,
            use_relaxation: true,
            friction_mu: 0.9,
        }
    }

    /// Rejects a tire configuration with a non-positive radius (see
    /// `ConfigError` taxonomy).
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        if self.radius <= 0.0 {
            return Err(crate::error::ConfigError::NonPositive {
                field: "tire.radius",
                value: self.radius,
            });
        }
        Ok(())
    }
}

pub struct Tire {
    pub config: TireConfig,
    pacejka: PacejkaFormula,
    combined_slip: CombinedSlip,
    relaxation: super::relaxation::TireRelaxation,

    angular_velocity: f64,
    rotation_angle: f64,
    normal_load: f64,
    camber_deg: f64,

    slip_state: SlipState,
    fx: f64,
    fy: f64,
}

impl Tire {
    pub fn new(config: TireConfig) -> Self {
        let pacejka = PacejkaFormula::new(config.pacejka_params);
        let combined_slip = CombinedSlip::new(pacejka, config.friction_mu);
        let relaxation =
            super::relaxation::TireRelaxation::new(config.relaxation_length_x, config.relaxation_length_y);

        Tire {
            config,
            pacejka,
            combined_slip,
            relaxation,
            angular_velocity: 0.0,
            rotation_angle: 0.0,
            normal_load: 4000.0,
            camber_deg: 0.0,
            slip_state: SlipState::default(),
            fx: 0.0,
            fy: 0.0,
        }
    }

    /// Advance the tire by `dt`, given contact-patch velocity (world
    /// frame), the wheel's heading, vertical load, and commanded
    /// drive/brake torques. Returns the resulting telemetry snapshot.
    pub fn update(
        &mut self,
        contact_velocity: Vec3,
        wheel_heading: f64,
        normal_load: f64,
        drive_torque: f64,
        brake_torque: f64,
        dt: f64,
    ) -> TireState {
        self.normal_load = normal_load.max(0.0);

        if self.normal_load < 10.0 {
            self.fx = 0.0;
            self.fy = 0.0;
            return self.state_snapshot(contact_velocity, None);
        }

        self.slip_state =
            slip::calculate_slip(contact_velocity, wheel_heading, self.angular_velocity, self.config.radius);

        let forces = self.combined_slip.calculate(
            self.slip_state.slip_ratio,
            self.slip_state.slip_angle_deg,
            self.normal_load,
            self.camber_deg,
            CombinedSlipMethod::Empirical,
        );

        if self.config.use_relaxation {
            let velocity_mag = contact_velocity.magnitude_2d();
            let (fx, fy) = self.relaxation.update(forces.fx, forces.fy, velocity_mag, dt);
            self.fx = fx;
            self.fy = fy;
        } else {
            self.fx = forces.fx;
            self.fy = forces.fy;
        }

        self.update_wheel_rotation(drive_torque, brake_torque, dt);
        self.rotation_angle += self.angular_velocity * dt;

        self.state_snapshot(contact_velocity, Some(forces))
    }

    fn update_wheel_rotation(&mut self, drive_torque: f64, brake_torque: f64, dt: f64) {
        let reaction_torque = self.fx * self.config.radius;
        let mut net_torque = drive_torque - reaction_torque;

        if self.angular_velocity.abs() > 0.1 {
            let brake_dir = -self.angular_velocity.signum();
            net_torque += brake_torque * brake_dir;
        } else if net_torque.abs() < brake_torque {
            net_torque = 0.0;
            self.angular_velocity = 0.0;
        }

        let angular_accel = net_torque / self.config.inertia;
        self.angular_velocity += angular_accel * dt;

        if brake_torque > 0.0 && self.angular_velocity.abs() < 0.1 {
            self.angular_velocity = self.angular_velocity.max(0.0);
        }
    }

    fn state_snapshot(&self, contact_velocity: Vec3, forces: Option<CombinedForces>) -> TireState {
        TireState {
            slip_ratio: self.slip_state.slip_ratio,
            slip_angle: self.slip_state.slip_angle,
            slip_angle_deg: self.slip_state.slip_angle_deg,
            fx: self.fx,
            fy: self.fy,
            fz: self.normal_load,
            fx_pure: forces.map_or(self.fx, |f| f.fx_pure),
            fy_pure: forces.map_or(self.fy, |f| f.fy_pure),
            saturation: forces.map_or(0.0, |f| f.saturation),
            angular_velocity: self.angular_velocity,
            rotation_angle: self.rotation_angle,
            contact_velocity: contact_velocity.magnitude_2d(),
            is_grounded: self.normal_load > 10.0,
        }
    }

    /// Tire force transformed from tire frame (x=forward, y=right) to world frame.
    pub fn get_forces_world(&self, wheel_heading: f64) -> Vec3 {
        let cos_h = wheel_heading.cos();
        let sin_h = wheel_heading.sin();
        Vec3::new_2d(self.fx * cos_h - self.fy * sin_h, self.fx * sin_h + self.fy * cos_h)
    }

    pub fn get_forces_local(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }

    /// Reset restores the nominal `4000 N` load rather than zero, avoiding a
    /// one-tick zero-load transient before the suspension recomputes it.
    pub fn reset(&mut self) {
        self.angular_velocity = 0.0;
        self.rotation_angle = 0.0;
        self.normal_load = 4000.0;
        self.fx = 0.0;
        self.fy = 0.0;
        self.slip_state = SlipState::default();
        self.relaxation.reset();
    }

    pub fn set_angular_velocity_from_speed(&mut self, speed: f64) {
        self.angular_velocity = speed / self.config.radius;
    }

    pub fn state(&self) -> TireState {
        self.state_snapshot(Vec3::ZERO, None)
    }

    pub fn slip_ratio(&self) -> f64 {
        self.slip_state.slip_ratio
    }

    pub fn slip_angle_deg(&self) -> f64 {
        self.slip_state.slip_angle_deg
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_load_produces_zero_force() {
        let mut tire = Tire::new(TireConfig::default());
        let state = tire.update(Vec3::new_2d(5.0, 0.0), 0.0, 5.0, 0.0, 0.0, 0.01);
        assert_eq!(state.fx, 0.0);
        assert_eq!(state.fy, 0.0);
        assert!(!state.is_grounded);
    }

    #[test]
    fn reset_restores_nominal_load() {
        let mut tire = Tire::new(TireConfig::default());
        tire.update(Vec3::new_2d(5.0, 0.0), 0.0, 3000.0, 100.0, 0.0, 0.01);
        tire.reset();
        assert_eq!(tire.state().fz, 4000.0);
        assert_eq!(tire.angular_velocity(), 0.0);
    }

    #[test]
    fn drive_torque_spins_up_stationary_wheel() {
        let mut tire = Tire::new(TireConfig::default());
        for _ in 0..50 {
            tire.update(Vec3::ZERO, 0.0, 4000.0, 50.0, 0.0, 0.01);
        }
        assert!(tire.angular_velocity() > 0.0);
    }

    #[test]
    fn brake_torque_stops_slow_wheel_without_reversing() {
        let mut tire = Tire::new(TireConfig::default());
        tire.set_angular_velocity_from_speed(0.05);
        for _ in 0..20 {
            tire.update(Vec3::new_2d(0.05, 0.0), 0.0, 4000.0, 0.0, 500.0, 0.01);
        }
        assert!(tire.angular_velocity() >= 0.0);
    }

    #[test]
    fn set_angular_velocity_from_speed_matches_ground_speed() {
        let mut tire = Tire::new(TireConfig::default());
        tire.set_angular_velocity_from_speed(10.0);
        assert_eq!(tire.angular_velocity(), 10.0 / tire.config.radius);
    }
}
