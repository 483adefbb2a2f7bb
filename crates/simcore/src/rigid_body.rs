//! Planar rigid body: pose, velocities, and force/torque accumulators.
//!
//! Integration is semi-implicit (symplectic) Euler: velocity is advanced
//! first, then position is advanced using the *new* velocity. This is the
//! only integrator the core exercises; alternates (RK4, Verlet) are not
//! implemented here (see DESIGN.md).

use crate::vec3::{normalize_angle, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub mass: f64,
    pub yaw_inertia: f64,

    pub position: Vec3,
    pub yaw: f64,
    pub velocity: Vec3,
    pub yaw_rate: f64,

    #[serde(skip)]
    force: Vec3,
    #[serde(skip)]
    torque: f64,
}

impl RigidBody {
    pub fn new(mass: f64, yaw_inertia: f64) -> Self {
        RigidBody {
            mass,
            yaw_inertia,
            position: Vec3::ZERO,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            yaw_rate: 0.0,
            force: Vec3::ZERO,
            torque: 0.0,
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Apply a force given in the body's local frame.
    pub fn apply_force_local(&mut self, force_local: Vec3) {
        self.force += self.local_to_world_direction(force_local);
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + local.rotate_z(self.yaw)
    }

    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        (world - self.position).rotate_z(-self.yaw)
    }

    pub fn local_to_world_direction(&self, local: Vec3) -> Vec3 {
        local.rotate_z(self.yaw)
    }

    pub fn world_to_local_direction(&self, world: Vec3) -> Vec3 {
        world.rotate_z(-self.yaw)
    }

    /// World-frame velocity of a point given in the body's local frame,
    /// including the `omega x r` contribution of yaw rotation.
    pub fn get_velocity_at_point(&self, local_point: Vec3) -> Vec3 {
        let r_world = self.local_to_world_direction(local_point);
        let rotational = Vec3::new_2d(-self.yaw_rate * r_world.y, self.yaw_rate * r_world.x);
        self.velocity + rotational
    }

    pub fn get_velocity_at_local_point(&self, local_point: Vec3) -> Vec3 {
        self.get_velocity_at_point(local_point)
    }

    pub fn get_local_velocity(&self) -> Vec3 {
        self.world_to_local_direction(self.velocity)
    }

    pub fn get_forward_vector(&self) -> Vec3 {
        Vec3::new_2d(self.yaw.cos(), self.yaw.sin())
    }

    pub fn get_right_vector(&self) -> Vec3 {
        Vec3::new_2d(self.yaw.sin(), -self.yaw.cos())
    }

    pub fn get_speed(&self) -> f64 {
        self.velocity.magnitude_2d()
    }

    pub fn get_forward_speed(&self) -> f64 {
        self.get_local_velocity().x
    }

    pub fn get_lateral_speed(&self) -> f64 {
        self.get_local_velocity().y
    }

    pub fn get_accumulated_force(&self) -> Vec3 {
        self.force
    }

    pub fn get_accumulated_torque(&self) -> f64 {
        self.torque
    }

    pub fn get_acceleration(&self) -> Vec3 {
        self.force / self.mass
    }

    pub fn get_angular_acceleration(&self) -> f64 {
        self.torque / self.yaw_inertia
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = 0.0;
    }

    /// Semi-implicit Euler: new velocity first, then position from the new
    /// velocity. Clears accumulators and re-normalizes yaw.
    pub fn integrate(&mut self, dt: f64) {
        let accel = self.get_acceleration();
        self.velocity += accel * dt;
        self.position += self.velocity * dt;

        let angular_accel = self.get_angular_acceleration();
        self.yaw_rate += angular_accel * dt;
        self.yaw = normalize_angle(self.yaw + self.yaw_rate * dt);

        self.clear_forces();
    }

    pub fn set_state(&mut self, position: Vec3, yaw: f64, velocity: Vec3, yaw_rate: f64) {
        self.position = position;
        self.yaw = normalize_angle(yaw);
        self.velocity = velocity;
        self.yaw_rate = yaw_rate;
    }

    pub fn reset(&mut self) {
        self.set_state(Vec3::ZERO, 0.0, Vec3::ZERO, 0.0);
        self.clear_forces();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_line_acceleration() {
        let mut body = RigidBody::new(1000.0, 1500.0);
        body.apply_force(Vec3::new_2d(1000.0, 0.0));
        body.integrate(0.1);
        assert_relative_eq!(body.velocity.x, 0.1, epsilon = 1e-9);
        assert_relative_eq!(body.position.x, 0.01, epsilon = 1e-9);
    }

    #[test]
    fn integrate_clears_accumulators() {
        let mut body = RigidBody::new(1000.0, 1500.0);
        body.apply_force(Vec3::new_2d(500.0, 0.0));
        body.apply_torque(10.0);
        body.integrate(0.01);
        assert_eq!(body.get_accumulated_force(), Vec3::ZERO);
        assert_eq!(body.get_accumulated_torque(), 0.0);
    }

    #[test]
    fn world_to_local_round_trip() {
        let mut body = RigidBody::new(1000.0, 1500.0);
        body.set_state(Vec3::new_2d(3.0, -2.0), 0.7, Vec3::ZERO, 0.0);
        let local = Vec3::new_2d(1.5, -0.4);
        let world = body.local_to_world(local);
        let back = body.world_to_local(world);
        assert_relative_eq!(back.x, local.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, local.y, epsilon = 1e-9);
    }

    #[test]
    fn velocity_at_point_includes_rotation() {
        let mut body = RigidBody::new(1000.0, 1500.0);
        body.yaw_rate = 2.0;
        let v = body.get_velocity_at_point(Vec3::new_2d(1.0, 0.0));
        // omega x r for r=(1,0), omega=2 about z gives (0, 2)
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(v.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn reset_zeroes_pose_and_motion() {
        let mut body = RigidBody::new(1000.0, 1500.0);
        body.set_state(Vec3::new_2d(5.0, 5.0), 1.0, Vec3::new_2d(3.0, 1.0), 0.5);
        body.reset();
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.yaw, 0.0);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.yaw_rate, 0.0);
    }
}
