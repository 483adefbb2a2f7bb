//! Wheel indexing shared by suspension, steering, drivetrain, and the vehicle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPosition {
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FrontLeft,
        WheelPosition::FrontRight,
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
    ];

    pub fn is_front(&self) -> bool {
        matches!(self, WheelPosition::FrontLeft | WheelPosition::FrontRight)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, WheelPosition::FrontLeft | WheelPosition::RearLeft)
    }
}

/// Per-wheel scalar, indexed by [`WheelPosition`] rather than a hashmap since
/// the set of wheels is fixed at four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelLoads {
    pub fl: f64,
    pub fr: f64,
    pub rl: f64,
    pub rr: f64,
}

impl WheelLoads {
    pub fn get(&self, wheel: WheelPosition) -> f64 {
        match wheel {
            WheelPosition::FrontLeft => self.fl,
            WheelPosition::FrontRight => self.fr,
            WheelPosition::RearLeft => self.rl,
            WheelPosition::RearRight => self.rr,
        }
    }

    pub fn set(&mut self, wheel: WheelPosition, value: f64) {
        match wheel {
            WheelPosition::FrontLeft => self.fl = value,
            WheelPosition::FrontRight => self.fr = value,
            WheelPosition::RearLeft => self.rl = value,
            WheelPosition::RearRight => self.rr = value,
        }
    }

    pub fn front_total(&self) -> f64 {
        self.fl + self.fr
    }

    pub fn rear_total(&self) -> f64 {
        self.rl + self.rr
    }

    pub fn left_total(&self) -> f64 {
        self.fl + self.rl
    }

    pub fn right_total(&self) -> f64 {
        self.fr + self.rr
    }

    pub fn total(&self) -> f64 {
        self.fl + self.fr + self.rl + self.rr
    }
}

/// Per-wheel container generic over any value, for torques/angles/spins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerWheel<T> {
    pub fl: T,
    pub fr: T,
    pub rl: T,
    pub rr: T,
}

impl<T: Copy> PerWheel<T> {
    pub fn new(fl: T, fr: T, rl: T, rr: T) -> Self {
        PerWheel { fl, fr, rl, rr }
    }

    pub fn get(&self, wheel: WheelPosition) -> T {
        match wheel {
            WheelPosition::FrontLeft => self.fl,
            WheelPosition::FrontRight => self.fr,
            WheelPosition::RearLeft => self.rl,
            WheelPosition::RearRight => self.rr,
        }
    }
}
