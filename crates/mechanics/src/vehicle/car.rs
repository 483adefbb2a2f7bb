//! Vehicle orchestration: wires rigid body, four tires, suspension, steering,
//! drivetrain and handbrake into one fixed-step physics update.

use serde::{Deserialize, Serialize};
use simcore::{RigidBody, Vec3};

use crate::error::ConfigError;
use crate::tire::{Tire, TireConfig, TireState};

use super::drivetrain::{Drivetrain, DrivetrainConfig};
use super::handbrake::{Handbrake, HandbrakeConfig};
use super::steering::{Steering, SteeringConfig};
use super::suspension::{Suspension, SuspensionConfig};
use super::wheel::{PerWheel, WheelPosition};

const AIR_DENSITY: f64 = 1.225;
const DRAG_COEFFICIENT: f64 = 0.3;
const FRONTAL_AREA: f64 = 2.2;
const MIN_DRAG_SPEED: f64 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarConfig {
    pub mass: f64,
    pub yaw_inertia: f64,
    pub wheelbase: f64,
    pub cg_to_front: f64,
    pub track_front: f64,
    pub track_rear: f64,
    pub cg_height: f64,
}

impl Default for CarConfig {
    fn default() -> Self {
        CarConfig {
            mass: 1400.0,
            yaw_inertia: 2500.0,
            wheelbase: 2.7,
            cg_to_front: 1.35,
            track_front: 1.5,
            track_rear: 1.5,
            cg_height: 0.5,
        }
    }
}

impl CarConfig {
    pub fn sport() -> Self {
        CarConfig { mass: 1300.0, yaw_inertia: 2200.0, ..CarConfig::default() }
    }

    pub fn drift() -> Self {
        CarConfig { mass: 1450.0, yaw_inertia: 2600.0, cg_height: 0.55, ..CarConfig::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositive { field: "car.mass", value: self.mass });
        }
        if self.yaw_inertia <= 0.0 {
            return Err(ConfigError::NonPositive { field: "car.yaw_inertia", value: self.yaw_inertia });
        }
        if self.wheelbase <= 0.0 {
            return Err(ConfigError::NonPositive { field: "car.wheelbase", value: self.wheelbase });
        }
        if self.track_front <= 0.0 {
            return Err(ConfigError::NonPositive { field: "car.track_front", value: self.track_front });
        }
        if self.track_rear <= 0.0 {
            return Err(ConfigError::NonPositive { field: "car.track_rear", value: self.track_rear });
        }
        if self.cg_to_front <= 0.0 || self.cg_to_front >= self.wheelbase {
            return Err(ConfigError::OutOfRange {
                field: "car.cg_to_front",
                value: self.cg_to_front,
                low: 0.0,
                high: self.wheelbase,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarState {
    pub position: Vec3,
    pub yaw: f64,
    pub velocity: Vec3,
    pub yaw_rate: f64,
    pub speed: f64,
    pub drift_angle_deg: f64,
}

pub struct Vehicle {
    pub body: RigidBody,
    pub config: CarConfig,
    pub suspension: Suspension,
    pub steering: Steering,
    pub drivetrain: Drivetrain,
    pub handbrake: Handbrake,

    tires: PerWheel<Tire>,

    throttle: f64,
    brake: f64,

    prev_velocity: Vec3,
    smoothed_long_accel: f64,
    smoothed_lat_accel: f64,
}

impl Vehicle {
    pub fn new(
        config: CarConfig,
        tire_config: TireConfig,
        suspension_config: SuspensionConfig,
        steering_config: SteeringConfig,
        drivetrain_config: DrivetrainConfig,
        handbrake_config: HandbrakeConfig,
    ) -> Self {
        let body = RigidBody::new(config.mass, config.yaw_inertia);
        let tires = PerWheel::new(
            Tire::new(tire_config),
            Tire::new(tire_config),
            Tire::new(tire_config),
            Tire::new(tire_config),
        );

        Vehicle {
            body,
            config,
            suspension: Suspension::new(suspension_config),
            steering: Steering::new(steering_config),
            drivetrain: Drivetrain::new(drivetrain_config),
            handbrake: Handbrake::new(handbrake_config),
            tires,
            throttle: 0.0,
            brake: 0.0,
            prev_velocity: Vec3::ZERO,
            smoothed_long_accel: 0.0,
            smoothed_lat_accel: 0.0,
        }
    }

    pub fn set_inputs(&mut self, throttle: f64, brake: f64, steer: f64, handbrake: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
        self.brake = brake.clamp(0.0, 1.0);
        self.steering.set_input(steer);
        self.handbrake.set_input(handbrake);
    }

    /// Local-frame anchor point of a wheel relative to the center of gravity.
    pub fn get_wheel_position_local(&self, wheel: WheelPosition) -> Vec3 {
        let c = &self.config;
        let rear_offset = -(c.wheelbase - c.cg_to_front);
        match wheel {
            WheelPosition::FrontLeft => Vec3::new_2d(c.cg_to_front, c.track_front / 2.0),
            WheelPosition::FrontRight => Vec3::new_2d(c.cg_to_front, -c.track_front / 2.0),
            WheelPosition::RearLeft => Vec3::new_2d(rear_offset, c.track_rear / 2.0),
            WheelPosition::RearRight => Vec3::new_2d(rear_offset, -c.track_rear / 2.0),
        }
    }

    pub fn get_wheel_position_world(&self, wheel: WheelPosition) -> Vec3 {
        self.body.local_to_world(self.get_wheel_position_local(wheel))
    }

    pub fn physics_step(&mut self, dt: f64) {
        self.steering.update(dt);
        self.handbrake.update(dt);

        let local_velocity = self.body.get_local_velocity();
        let prev_local_velocity = self.prev_velocity.rotate_z(-self.body.yaw);
        let long_accel = (local_velocity.x - prev_local_velocity.x) / dt;
        let lat_accel = (local_velocity.y - prev_local_velocity.y) / dt;
        let alpha = (10.0 * dt).min(1.0);
        self.smoothed_long_accel += (long_accel - self.smoothed_long_accel) * alpha;
        self.smoothed_lat_accel += (lat_accel - self.smoothed_lat_accel) * alpha;
        self.prev_velocity = self.body.velocity;

        let loads = self.suspension.calculate_loads_simple(self.smoothed_long_accel, self.smoothed_lat_accel);

        let (steer_left, steer_right) = self.steering.get_wheel_angles();

        let rear_left_omega = self.tires.rl.angular_velocity();
        let rear_right_omega = self.tires.rr.angular_velocity();
        let (drive_left, drive_right) =
            self.drivetrain.get_drive_torques(self.throttle, (rear_left_omega, rear_right_omega));
        let (brake_fl, brake_fr, mut brake_rl, mut brake_rr) = self.drivetrain.get_brake_torques(self.brake);
        let (hb_left, hb_right) = self.handbrake.get_brake_torques((rear_left_omega, rear_right_omega));
        brake_rl += hb_left;
        brake_rr += hb_right;

        let mut body_force = Vec3::ZERO;
        let mut body_torque = 0.0;

        for wheel in WheelPosition::ALL {
            let local_anchor = self.get_wheel_position_local(wheel);
            let world_point = self.body.local_to_world(local_anchor);
            let point_velocity = self.body.get_velocity_at_point(local_anchor);

            let steer = match wheel {
                WheelPosition::FrontLeft => steer_left,
                WheelPosition::FrontRight => steer_right,
                _ => 0.0,
            };
            let wheel_heading = self.body.yaw + steer;

            let (drive_torque, brake_torque) = match wheel {
                WheelPosition::FrontLeft => (0.0, brake_fl),
                WheelPosition::FrontRight => (0.0, brake_fr),
                WheelPosition::RearLeft => (drive_left, brake_rl),
                WheelPosition::RearRight => (drive_right, brake_rr),
            };
            let load = loads.get(wheel);

            let tire = self.tire_mut(wheel);
            tire.update(point_velocity, wheel_heading, load, drive_torque, brake_torque, dt);
            let force = tire.get_forces_world(wheel_heading);

            body_force += force;
            let r = world_point - self.body.position;
            body_torque += r.cross_2d(&force);
        }

        let speed = self.body.get_speed();
        if speed > MIN_DRAG_SPEED {
            let drag_mag = 0.5 * AIR_DENSITY * DRAG_COEFFICIENT * FRONTAL_AREA * speed * speed;
            body_force += self.body.velocity.normalized() * (-drag_mag);
        }

        self.body.apply_force(body_force);
        self.body.apply_torque(body_torque);
        self.body.integrate(dt);

        let driven_avg = (rear_left_omega + rear_right_omega) / 2.0;
        self.drivetrain.update_engine_rpm(driven_avg, dt);
    }

    fn tire_mut(&mut self, wheel: WheelPosition) -> &mut Tire {
        match wheel {
            WheelPosition::FrontLeft => &mut self.tires.fl,
            WheelPosition::FrontRight => &mut self.tires.fr,
            WheelPosition::RearLeft => &mut self.tires.rl,
            WheelPosition::RearRight => &mut self.tires.rr,
        }
    }

    pub fn tire(&self, wheel: WheelPosition) -> &Tire {
        match wheel {
            WheelPosition::FrontLeft => &self.tires.fl,
            WheelPosition::FrontRight => &self.tires.fr,
            WheelPosition::RearLeft => &self.tires.rl,
            WheelPosition::RearRight => &self.tires.rr,
        }
    }

    pub fn tire_state(&self, wheel: WheelPosition) -> TireState {
        self.tire(wheel).state()
    }

    pub fn get_drift_angle(&self) -> f64 {
        let local = self.body.get_local_velocity();
        if local.x.abs() < 0.5 {
            return 0.0;
        }
        local.y.atan2(local.x).to_degrees()
    }

    pub fn get_state(&self) -> CarState {
        CarState {
            position: self.body.position,
            yaw: self.body.yaw,
            velocity: self.body.velocity,
            yaw_rate: self.body.yaw_rate,
            speed: self.body.get_speed(),
            drift_angle_deg: self.get_drift_angle(),
        }
    }

    pub fn set_velocity(&mut self, speed: f64, direction: Option<f64>) {
        let heading = direction.unwrap_or(self.body.yaw);
        let velocity = Vec3::new_2d(speed * heading.cos(), speed * heading.sin());
        self.body.velocity = velocity;

        for wheel in WheelPosition::ALL {
            self.tire_mut(wheel).set_angular_velocity_from_speed(speed);
        }
    }

    pub fn reset(&mut self, position: Option<Vec3>, yaw: Option<f64>) {
        self.body.reset();
        if let Some(position) = position {
            self.body.position = position;
        }
        if let Some(yaw) = yaw {
            self.body.yaw = yaw;
        }

        for wheel in WheelPosition::ALL {
            self.tire_mut(wheel).reset();
        }
        self.steering.reset();
        self.handbrake.reset();
        self.drivetrain.reset();
        self.throttle = 0.0;
        self.brake = 0.0;
        self.prev_velocity = Vec3::ZERO;
        self.smoothed_long_accel = 0.0;
        self.smoothed_lat_accel = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tire::TireConfig;

    fn make_vehicle() -> Vehicle {
        Vehicle::new(
            CarConfig::default(),
            TireConfig::default(),
            SuspensionConfig::default(),
            SteeringConfig::default(),
            DrivetrainConfig::default(),
            HandbrakeConfig::default(),
        )
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(CarConfig::default().validate().is_ok());
    }

    #[test]
    fn cg_out_of_range_is_rejected() {
        let mut c = CarConfig::default();
        c.cg_to_front = c.wheelbase + 1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn wheel_anchors_are_symmetric_left_right() {
        let v = make_vehicle();
        let fl = v.get_wheel_position_local(WheelPosition::FrontLeft);
        let fr = v.get_wheel_position_local(WheelPosition::FrontRight);
        assert_eq!(fl.x, fr.x);
        assert_eq!(fl.y, -fr.y);
    }

    #[test]
    fn throttle_from_rest_accelerates_forward() {
        let mut v = make_vehicle();
        v.set_inputs(1.0, 0.0, 0.0, 0.0);
        for _ in 0..200 {
            v.physics_step(0.001);
        }
        assert!(v.body.get_speed() > 0.1);
        assert!(v.body.get_local_velocity().x > 0.0);
    }

    #[test]
    fn reset_zeros_motion_and_restores_idle_state() {
        let mut v = make_vehicle();
        v.set_inputs(1.0, 0.0, 0.0, 0.0);
        for _ in 0..100 {
            v.physics_step(0.001);
        }
        v.reset(None, None);
        assert_eq!(v.body.position, Vec3::ZERO);
        assert_eq!(v.body.velocity, Vec3::ZERO);
        assert_eq!(v.drivetrain.engine_rpm(), v.drivetrain.config.idle_rpm);
    }

    #[test]
    fn drift_angle_is_zero_below_forward_speed_threshold() {
        let v = make_vehicle();
        assert_eq!(v.get_drift_angle(), 0.0);
    }

    #[test]
    fn set_velocity_matches_tire_spin_to_avoid_slip_spike() {
        let mut v = make_vehicle();
        v.set_velocity(20.0, None);
        let expected = 20.0 / v.tire(WheelPosition::FrontLeft).config.radius;
        assert!((v.tire(WheelPosition::FrontLeft).angular_velocity() - expected).abs() < 1e-9);
    }

    #[test]
    fn mirrored_inputs_produce_mirrored_trajectory() {
        let mut right = make_vehicle();
        let mut left = make_vehicle();
        right.set_velocity(15.0, None);
        left.set_velocity(15.0, None);

        for _ in 0..500 {
            right.set_inputs(0.3, 0.0, 0.4, 0.0);
            left.set_inputs(0.3, 0.0, -0.4, 0.0);
            right.physics_step(0.001);
            left.physics_step(0.001);
        }

        assert!((right.body.position.y + left.body.position.y).abs() < 1e-6);
        assert!((right.body.yaw + left.body.yaw).abs() < 1e-9);
    }
}
