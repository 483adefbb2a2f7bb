//! Per-frame drift scoring: body slip angle, smoothing, and a 0-100 score
//! blending angle, speed, and stability.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use simcore::{normalize_angle, Vec3};

const HISTORY_LEN: usize = 30;
const MIN_SPEED_FOR_ANGLE: f64 = 0.5;
const DRIFT_ANGLE_THRESHOLD_DEG: f64 = 10.0;
const DRIFT_SPEED_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DriftMetrics {
    pub slip_angle_deg: f64,
    pub smoothed_slip_angle_deg: f64,
    pub slip_angle_rate_deg_s: f64,
    pub yaw_rate: f64,
    pub throttle: f64,
    pub is_drifting: bool,
    pub drift_duration: f64,
    pub drift_distance: f64,
    pub angle_score: f64,
    pub speed_score: f64,
    pub stability_score: f64,
    pub overall_score: f64,
}

pub struct DriftAnalyzer {
    smoothed_beta: f64,
    smoothed_beta_rate: f64,
    prev_beta: f64,
    history: VecDeque<f64>,
    drift_start_time: Option<f64>,
    drift_distance: f64,
}

impl Default for DriftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftAnalyzer {
    pub fn new() -> Self {
        DriftAnalyzer {
            smoothed_beta: 0.0,
            smoothed_beta_rate: 0.0,
            prev_beta: 0.0,
            history: VecDeque::with_capacity(HISTORY_LEN),
            drift_start_time: None,
            drift_distance: 0.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        velocity: Vec3,
        yaw: f64,
        steer_angle_deg: f64,
        throttle: f64,
        yaw_rate: f64,
        speed: f64,
        dt: f64,
        sim_time: f64,
    ) -> DriftMetrics {
        let beta_deg = if velocity.magnitude_2d() < MIN_SPEED_FOR_ANGLE {
            0.0
        } else {
            normalize_angle(velocity.y.atan2(velocity.x) - yaw).to_degrees()
        };

        let alpha = (10.0 * dt).min(1.0);
        self.smoothed_beta += (beta_deg - self.smoothed_beta) * alpha;
        let raw_rate = if dt > 0.0 { (beta_deg - self.prev_beta) / dt } else { 0.0 };
        self.smoothed_beta_rate += (raw_rate - self.smoothed_beta_rate) * alpha;
        self.prev_beta = beta_deg;

        if self.history.len() >= HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(beta_deg.abs());

        let is_drifting = beta_deg.abs() > DRIFT_ANGLE_THRESHOLD_DEG && speed > DRIFT_SPEED_THRESHOLD;
        let drift_duration = if is_drifting {
            let start = *self.drift_start_time.get_or_insert(sim_time);
            self.drift_distance += speed * dt;
            sim_time - start
        } else {
            self.drift_start_time = None;
            self.drift_distance = 0.0;
            0.0
        };

        let abs_beta = beta_deg.abs();
        let angle_score = if abs_beta < 10.0 {
            0.0
        } else if abs_beta < 35.0 {
            (abs_beta - 10.0) / 25.0
        } else if abs_beta < 60.0 {
            1.0 - (abs_beta - 35.0) / 25.0 * 0.3
        } else {
            0.5
        };

        let speed_kmh = speed * 3.6;
        let speed_score = (speed_kmh / 80.0).min(1.0);

        let stability_score = {
            let stddev = self.history_stddev();
            (1.0 - stddev / 20.0).max(0.0)
        };

        let counter_steer_bonus = if beta_deg.signum() != 0.0
            && steer_angle_deg.signum() != beta_deg.signum()
            && steer_angle_deg.abs() > 5.0
        {
            0.1
        } else {
            0.0
        };

        let overall_score =
            ((0.4 * angle_score + 0.3 * speed_score + 0.3 * stability_score + counter_steer_bonus) * 100.0)
                .clamp(0.0, 100.0);

        let simple_angle_score = (abs_beta / 35.0).min(1.0);
        let simple_speed_score = speed_score;

        DriftMetrics {
            slip_angle_deg: beta_deg,
            smoothed_slip_angle_deg: self.smoothed_beta,
            slip_angle_rate_deg_s: self.smoothed_beta_rate,
            yaw_rate,
            throttle,
            is_drifting,
            drift_duration,
            drift_distance: self.drift_distance,
            angle_score: simple_angle_score,
            speed_score: simple_speed_score,
            stability_score,
            overall_score,
        }
    }

    fn history_stddev(&self) -> f64 {
        if self.history.len() < 2 {
            return 0.0;
        }
        let n = self.history.len() as f64;
        let mean = self.history.iter().sum::<f64>() / n;
        let variance = self.history.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    }

    pub fn reset(&mut self) {
        self.smoothed_beta = 0.0;
        self.smoothed_beta_rate = 0.0;
        self.prev_beta = 0.0;
        self.history.clear();
        self.drift_start_time = None;
        self.drift_distance = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_speed_gives_zero_slip_angle() {
        let mut analyzer = DriftAnalyzer::new();
        let metrics = analyzer.update(Vec3::new_2d(0.1, 0.1), 0.0, 0.0, 0.0, 0.0, 0.2, 0.01, 0.0);
        assert_eq!(metrics.slip_angle_deg, 0.0);
    }

    #[test]
    fn large_lateral_velocity_is_flagged_as_drifting() {
        let mut analyzer = DriftAnalyzer::new();
        let mut metrics = DriftMetrics::default();
        let mut sim_time = 0.0;
        for _ in 0..50 {
            metrics = analyzer.update(Vec3::new_2d(10.0, 6.0), 0.0, -20.0, 0.5, 0.5, 15.0, 0.01, sim_time);
            sim_time += 0.01;
        }
        assert!(metrics.is_drifting);
        assert!(metrics.drift_duration > 0.0);
        assert_eq!(metrics.throttle, 0.5);
        assert_eq!(metrics.yaw_rate, 0.5);
        assert!(metrics.overall_score > 0.0);
    }

    #[test]
    fn straight_driving_is_not_drifting() {
        let mut analyzer = DriftAnalyzer::new();
        let metrics = analyzer.update(Vec3::new_2d(20.0, 0.0), 0.0, 0.0, 0.5, 0.0, 20.0, 0.01, 0.0);
        assert!(!metrics.is_drifting);
        assert_eq!(metrics.overall_score, 0.0);
    }

    #[test]
    fn reset_clears_accumulated_duration_and_distance() {
        let mut analyzer = DriftAnalyzer::new();
        let mut sim_time = 0.0;
        for _ in 0..20 {
            analyzer.update(Vec3::new_2d(10.0, 6.0), 0.0, -20.0, 0.5, 0.5, 15.0, 0.01, sim_time);
            sim_time += 0.01;
        }
        analyzer.reset();
        let metrics = analyzer.update(Vec3::new_2d(20.0, 0.0), 0.0, 0.0, 0.5, 0.0, 20.0, 0.01, sim_time);
        assert_eq!(metrics.drift_duration, 0.0);
        assert_eq!(metrics.drift_distance, 0.0);
    }
}
