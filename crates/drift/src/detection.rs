//! Drift-phase state machine with an initiation-style classifier, driven by
//! driver inputs and slip-angle history rather than raw forces.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

const HISTORY_SIZE: usize = 20;

const DRIFT_ANGLE_THRESHOLD_DEG: f64 = 10.0;
const SLIP_ANGLE_THRESHOLD_DEG: f64 = 8.0;
const HANDBRAKE_THRESHOLD: f64 = 0.5;
const THROTTLE_SPIKE_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftState {
    Straight,
    Initiating,
    Drifting,
    Transitioning,
    Recovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftInitiation {
    None,
    Handbrake,
    PowerOver,
    Braking,
    Feint,
    LiftOff,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionState {
    pub state: DriftState,
    pub initiation: DriftInitiation,
    pub time_in_state: f64,
}

pub struct DriftDetector {
    state: DriftState,
    initiation: DriftInitiation,
    time_in_state: f64,
    drift_sign: f64,
    throttle_history: VecDeque<f64>,
    steer_history: VecDeque<f64>,
}

impl Default for DriftDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftDetector {
    pub fn new() -> Self {
        DriftDetector {
            state: DriftState::Straight,
            initiation: DriftInitiation::None,
            time_in_state: 0.0,
            drift_sign: 0.0,
            throttle_history: VecDeque::with_capacity(HISTORY_SIZE),
            steer_history: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        drift_angle_deg: f64,
        front_slip_avg_deg: f64,
        rear_slip_avg_deg: f64,
        handbrake: f64,
        throttle: f64,
        brake: f64,
        steer_angle_deg: f64,
        speed: f64,
        dt: f64,
    ) -> DetectionState {
        self.push_history(throttle, steer_angle_deg);
        self.time_in_state += dt;

        let beta = drift_angle_deg;
        let abs_beta = beta.abs();

        match self.state {
            DriftState::Straight => {
                if speed > 3.0 && abs_beta > DRIFT_ANGLE_THRESHOLD_DEG {
                    self.initiation =
                        self.classify_initiation(handbrake, throttle, brake, rear_slip_avg_deg, front_slip_avg_deg);
                    self.enter(DriftState::Initiating);
                }
            }
            DriftState::Initiating => {
                if abs_beta < 7.0 {
                    self.enter(DriftState::Straight);
                } else if self.time_in_state > 0.3 || abs_beta > 15.0 {
                    self.drift_sign = beta.signum();
                    self.enter(DriftState::Drifting);
                }
            }
            DriftState::Drifting => {
                if beta.signum() != 0.0 && self.drift_sign != 0.0 && beta.signum() != self.drift_sign {
                    self.enter(DriftState::Transitioning);
                } else if abs_beta < 7.0 {
                    self.enter(DriftState::Recovering);
                }
            }
            DriftState::Transitioning => {
                if abs_beta > DRIFT_ANGLE_THRESHOLD_DEG {
                    self.drift_sign = beta.signum();
                    self.enter(DriftState::Drifting);
                } else if self.time_in_state > 1.0 {
                    self.enter(DriftState::Recovering);
                }
            }
            DriftState::Recovering => {
                if abs_beta > DRIFT_ANGLE_THRESHOLD_DEG {
                    self.drift_sign = beta.signum();
                    self.enter(DriftState::Drifting);
                } else if abs_beta < 5.0 && self.time_in_state > 0.5 {
                    self.enter(DriftState::Straight);
                }
            }
        }

        DetectionState { state: self.state, initiation: self.initiation, time_in_state: self.time_in_state }
    }

    fn enter(&mut self, state: DriftState) {
        self.state = state;
        self.time_in_state = 0.0;
        if state == DriftState::Straight {
            self.initiation = DriftInitiation::None;
        }
    }

    fn classify_initiation(
        &self,
        handbrake: f64,
        throttle: f64,
        brake: f64,
        rear_slip_avg_deg: f64,
        front_slip_avg_deg: f64,
    ) -> DriftInitiation {
        if handbrake > HANDBRAKE_THRESHOLD && rear_slip_avg_deg.abs() > SLIP_ANGLE_THRESHOLD_DEG {
            return DriftInitiation::Handbrake;
        }
        if throttle > THROTTLE_SPIKE_THRESHOLD
            && rear_slip_avg_deg.abs() - front_slip_avg_deg.abs() >= 5.0
        {
            return DriftInitiation::PowerOver;
        }
        if brake > 0.3 && rear_slip_avg_deg.abs() > SLIP_ANGLE_THRESHOLD_DEG {
            return DriftInitiation::Braking;
        }
        if self.is_feint() {
            return DriftInitiation::Feint;
        }
        if self.is_lift_off() {
            return DriftInitiation::LiftOff;
        }
        DriftInitiation::None
    }

    fn is_feint(&self) -> bool {
        if self.steer_history.len() < 10 {
            return false;
        }
        let recent = mean_last(&self.steer_history, 5);
        let prior = mean_range(&self.steer_history, 5, 10);
        recent.signum() != 0.0 && prior.signum() != 0.0 && recent.signum() != prior.signum()
            && (recent - prior).abs() > 0.5
    }

    fn is_lift_off(&self) -> bool {
        if self.throttle_history.len() < 6 {
            return false;
        }
        let recent = mean_last(&self.throttle_history, 3);
        let prior = mean_range(&self.throttle_history, 3, 6);
        prior > 0.5 && recent < 0.2
    }

    fn push_history(&mut self, throttle: f64, steer_angle_deg: f64) {
        if self.throttle_history.len() >= HISTORY_SIZE {
            self.throttle_history.pop_front();
        }
        self.throttle_history.push_back(throttle);

        if self.steer_history.len() >= HISTORY_SIZE {
            self.steer_history.pop_front();
        }
        self.steer_history.push_back(steer_angle_deg);
    }

    pub fn state(&self) -> DriftState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = DriftState::Straight;
        self.initiation = DriftInitiation::None;
        self.time_in_state = 0.0;
        self.drift_sign = 0.0;
        self.throttle_history.clear();
        self.steer_history.clear();
    }
}

/// Mean of the last `n` samples (most recent end of the deque).
fn mean_last(history: &VecDeque<f64>, n: usize) -> f64 {
    mean_range(history, 0, n)
}

/// Mean of samples `[skip_from_end, skip_from_end + n)` counted back from the
/// most recent end, i.e. `mean_range(h, 5, 10)` is the 5 samples before the
/// most recent 5.
fn mean_range(history: &VecDeque<f64>, skip_from_end: usize, end_from_end: usize) -> f64 {
    let len = history.len();
    if len <= skip_from_end {
        return 0.0;
    }
    let hi = len - skip_from_end;
    let lo = len.saturating_sub(end_from_end);
    if hi <= lo {
        return 0.0;
    }
    let slice: Vec<f64> = history.iter().skip(lo).take(hi - lo).copied().collect();
    slice.iter().sum::<f64>() / slice.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_straight_state() {
        let detector = DriftDetector::new();
        assert_eq!(detector.state(), DriftState::Straight);
    }

    #[test]
    fn large_slip_angle_enters_initiating() {
        let mut detector = DriftDetector::new();
        let result = detector.update(12.0, 2.0, 2.0, 0.0, 0.5, 0.0, 0.0, 10.0, 0.01);
        assert_eq!(result.state, DriftState::Initiating);
    }

    #[test]
    fn handbrake_with_rear_slip_is_classified_as_handbrake_initiation() {
        let mut detector = DriftDetector::new();
        let result = detector.update(12.0, 1.0, 10.0, 0.8, 0.2, 0.0, 0.0, 10.0, 0.01);
        assert_eq!(result.initiation, DriftInitiation::Handbrake);
    }

    #[test]
    fn sustained_initiation_progresses_to_drifting() {
        let mut detector = DriftDetector::new();
        let mut result = detector.update(12.0, 2.0, 2.0, 0.0, 0.5, 0.0, 0.0, 10.0, 0.01);
        for _ in 0..40 {
            result = detector.update(12.0, 2.0, 2.0, 0.0, 0.5, 0.0, 0.0, 10.0, 0.01);
        }
        assert_eq!(result.state, DriftState::Drifting);
    }

    #[test]
    fn reset_returns_to_straight() {
        let mut detector = DriftDetector::new();
        detector.update(12.0, 2.0, 2.0, 0.0, 0.5, 0.0, 0.0, 10.0, 0.01);
        detector.reset();
        assert_eq!(detector.state(), DriftState::Straight);
    }
}
