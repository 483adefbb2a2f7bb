//! Static weight split plus longitudinal/lateral load transfer.

use serde::{Deserialize, Serialize};

use super::wheel::WheelLoads;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuspensionConfig {
    pub wheelbase: f64,
    pub track_front: f64,
    pub track_rear: f64,
    pub cg_height: f64,
    pub cg_to_front: f64,
    pub total_mass: f64,
    pub gravity: f64,
    pub front_roll_stiffness: f64,
    pub rear_roll_stiffness: f64,
}

impl Default for SuspensionConfig {
    fn default() -> Self {
        SuspensionConfig {
            wheelbase: 2.7,
            track_front: 1.5,
            track_rear: 1.5,
            cg_height: 0.5,
            cg_to_front: 1.35,
            total_mass: 1400.0,
            gravity: 9.81,
            front_roll_stiffness: 0.5,
            rear_roll_stiffness: 0.5,
        }
    }
}

impl SuspensionConfig {
    pub fn cg_to_rear(&self) -> f64 {
        self.wheelbase - self.cg_to_front
    }

    /// `cg_to_rear / wheelbase` — the *rear* overhang fraction determines
    /// the *front* axle's static share of the weight. Preserved exactly as
    /// the original names it even though it reads backwards at a glance.
    pub fn front_weight_fraction(&self) -> f64 {
        self.cg_to_rear() / self.wheelbase
    }

    pub fn rear_weight_fraction(&self) -> f64 {
        self.cg_to_front / self.wheelbase
    }
}

pub struct Suspension {
    pub config: SuspensionConfig,
    static_loads: WheelLoads,
}

impl Suspension {
    pub fn new(config: SuspensionConfig) -> Self {
        let static_loads = Self::calculate_static_loads(&config);
        Suspension { config, static_loads }
    }

    fn calculate_static_loads(config: &SuspensionConfig) -> WheelLoads {
        let total_weight = config.total_mass * config.gravity;
        let front_total = total_weight * config.front_weight_fraction();
        let rear_total = total_weight * config.rear_weight_fraction();
        WheelLoads { fl: front_total / 2.0, fr: front_total / 2.0, rl: rear_total / 2.0, rr: rear_total / 2.0 }
    }

    pub fn get_static_loads(&self) -> WheelLoads {
        self.static_loads
    }

    /// Full roll-weighted load transfer.
    pub fn calculate_loads(&self, long_accel: f64, lat_accel: f64) -> WheelLoads {
        let c = &self.config;
        let total_weight = c.total_mass * c.gravity;
        let static_front = total_weight * c.front_weight_fraction();
        let static_rear = total_weight * c.rear_weight_fraction();

        let dfz_long = c.total_mass * long_accel * c.cg_height / c.wheelbase;
        let front_total = static_front - dfz_long;
        let rear_total = static_rear + dfz_long;

        let roll_denominator = c.front_roll_stiffness + c.rear_roll_stiffness + 0.001;
        let front_roll_frac = 2.0 * c.front_roll_stiffness / roll_denominator;
        let rear_roll_frac = 2.0 * c.rear_roll_stiffness / roll_denominator;

        let dfz_front = c.total_mass * lat_accel * c.cg_height * c.front_weight_fraction()
            / c.track_front
            * front_roll_frac;
        let dfz_rear = c.total_mass * lat_accel * c.cg_height * c.rear_weight_fraction()
            / c.track_rear
            * rear_roll_frac;

        WheelLoads {
            fl: (front_total / 2.0 - dfz_front).max(0.0),
            fr: (front_total / 2.0 + dfz_front).max(0.0),
            rl: (rear_total / 2.0 - dfz_rear).max(0.0),
            rr: (rear_total / 2.0 + dfz_rear).max(0.0),
        }
    }

    /// Simpler variant omitting roll-stiffness weighting; this is the one
    /// the vehicle uses by default each tick.
    pub fn calculate_loads_simple(&self, long_accel: f64, lat_accel: f64) -> WheelLoads {
        let c = &self.config;
        let total_weight = c.total_mass * c.gravity;
        let static_front = total_weight * c.front_weight_fraction();
        let static_rear = total_weight * c.rear_weight_fraction();

        let dfz_long = c.total_mass * long_accel * c.cg_height / c.wheelbase;
        let front_total = static_front - dfz_long;
        let rear_total = static_rear + dfz_long;

        let dfz_front =
            c.total_mass * lat_accel * c.cg_height * c.front_weight_fraction() / c.track_front;
        let dfz_rear = c.total_mass * lat_accel * c.cg_height * c.rear_weight_fraction() / c.track_rear;

        WheelLoads {
            fl: (front_total / 2.0 - dfz_front).max(0.0),
            fr: (front_total / 2.0 + dfz_front).max(0.0),
            rl: (rear_total / 2.0 - dfz_rear).max(0.0),
            rr: (rear_total / 2.0 + dfz_rear).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn static_loads_sum_to_total_weight() {
        let s = Suspension::new(SuspensionConfig::default());
        let loads = s.get_static_loads();
        let expected = s.config.total_mass * s.config.gravity;
        assert_relative_eq!(loads.total(), expected, epsilon = 1e-6);
    }

    #[test]
    fn zero_acceleration_matches_static_split() {
        let s = Suspension::new(SuspensionConfig::default());
        let loads = s.calculate_loads_simple(0.0, 0.0);
        let static_loads = s.get_static_loads();
        assert_relative_eq!(loads.total(), static_loads.total(), epsilon = 1e-6);
    }

    #[test]
    fn braking_transfers_load_forward() {
        let s = Suspension::new(SuspensionConfig::default());
        let loads = s.calculate_loads_simple(-5.0, 0.0);
        assert!(loads.front_total() > loads.rear_total());
    }

    #[test]
    fn cornering_loads_never_negative() {
        let s = Suspension::new(SuspensionConfig::default());
        let loads = s.calculate_loads_simple(0.0, 50.0);
        assert!(loads.fl >= 0.0 && loads.fr >= 0.0 && loads.rl >= 0.0 && loads.rr >= 0.0);
    }

    #[test]
    fn positive_lat_accel_loads_right_wheels_more() {
        let s = Suspension::new(SuspensionConfig::default());
        let loads = s.calculate_loads_simple(0.0, 5.0);
        assert!(loads.fr > loads.fl);
        assert!(loads.rr > loads.rl);
    }
}
