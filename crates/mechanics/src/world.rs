//! Fixed-timestep accumulator loop driving any number of managed vehicles.

use crate::vehicle::Vehicle;

const MAX_STEPS_PER_FRAME: u32 = 20;

pub struct World {
    dt: f64,
    accumulator: f64,
    time: f64,
    vehicles: Vec<Vehicle>,
}

impl World {
    pub fn new(dt: f64) -> Self {
        World { dt, accumulator: 0.0, time: 0.0, vehicles: Vec::new() }
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> usize {
        self.vehicles.push(vehicle);
        self.vehicles.len() - 1
    }

    pub fn remove_vehicle(&mut self, index: usize) -> Vehicle {
        self.vehicles.remove(index)
    }

    pub fn vehicle(&self, index: usize) -> &Vehicle {
        &self.vehicles[index]
    }

    pub fn vehicle_mut(&mut self, index: usize) -> &mut Vehicle {
        &mut self.vehicles[index]
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance every managed vehicle by exactly one fixed tick, with no
    /// accumulator bookkeeping.
    pub fn step(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.physics_step(self.dt);
        }
        self.time += self.dt;
    }

    /// Drain `real_dt` from the accumulator in fixed `dt` chunks, capped at
    /// [`MAX_STEPS_PER_FRAME`] to avoid a spiral of death. Returns the number
    /// of fixed ticks actually run.
    pub fn step_fixed(&mut self, real_dt: f64) -> u32 {
        if real_dt <= 0.0 {
            return 0;
        }

        self.accumulator += real_dt;
        let mut steps = 0;
        while self.accumulator >= self.dt && steps < MAX_STEPS_PER_FRAME {
            self.step();
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Push one shared input tuple to every managed vehicle, then run
    /// [`Self::step_fixed`].
    pub fn update(&mut self, real_dt: f64, inputs: (f64, f64, f64, f64)) -> u32 {
        let (throttle, brake, steer, handbrake) = inputs;
        for vehicle in &mut self.vehicles {
            vehicle.set_inputs(throttle, brake, steer, handbrake);
        }
        self.step_fixed(real_dt)
    }

    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.time = 0.0;
        for vehicle in &mut self.vehicles {
            vehicle.reset(None, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tire::TireConfig;
    use crate::vehicle::{CarConfig, DrivetrainConfig, HandbrakeConfig, SteeringConfig, SuspensionConfig};

    fn make_world() -> World {
        let mut world = World::new(0.001);
        let vehicle = Vehicle::new(
            CarConfig::default(),
            TireConfig::default(),
            SuspensionConfig::default(),
            SteeringConfig::default(),
            DrivetrainConfig::default(),
            HandbrakeConfig::default(),
        );
        world.add_vehicle(vehicle);
        world
    }

    #[test]
    fn step_fixed_runs_expected_number_of_ticks() {
        let mut world = make_world();
        let steps = world.step_fixed(0.01);
        assert_eq!(steps, 10);
    }

    #[test]
    fn step_fixed_caps_at_max_steps_per_frame() {
        let mut world = make_world();
        let steps = world.step_fixed(1.0);
        assert_eq!(steps, MAX_STEPS_PER_FRAME);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut world = make_world();
        let steps = world.step_fixed(0.0);
        assert_eq!(steps, 0);
        assert_eq!(world.time(), 0.0);
    }

    #[test]
    fn interpolation_alpha_stays_in_unit_range() {
        let mut world = make_world();
        world.step_fixed(0.0035);
        let alpha = world.interpolation_alpha();
        assert!((0.0..1.0).contains(&alpha));
    }

    #[test]
    fn update_pushes_inputs_before_stepping() {
        let mut world = make_world();
        world.update(0.01, (1.0, 0.0, 0.0, 0.0));
        assert!(world.vehicle(0).body.get_speed() >= 0.0);
    }
}
