//! Pacejka "Magic Formula" tire model.
//!
//! `F = D * sin(C * atan(B*x - E*(B*x - atan(B*x)))) + Sv`, with `x` the
//! (shifted) slip input. Coefficients are organized per the Pacejka-94
//! convention: `b0..b13` for the longitudinal curve, `a0..a17` for the
//! lateral curve.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacejkaParams {
    // Longitudinal (Fx)
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub b4: f64,
    pub b5: f64,
    pub b6: f64,
    pub b7: f64,
    pub b8: f64,
    pub b9: f64,
    pub b10: f64,
    pub b11: f64,
    pub b12: f64,
    pub b13: f64,

    // Lateral (Fy)
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
    pub a6: f64,
    pub a7: f64,
    pub a8: f64,
    pub a9: f64,
    pub a10: f64,
    pub a11: f64,
    pub a12: f64,
    pub a13: f64,
    pub a14: f64,
    pub a15: f64,
    pub a16: f64,
    pub a17: f64,

    /// Reference vertical load (N) the curve was fit against.
    pub nominal_load: f64,
}

impl Default for PacejkaParams {
    fn default() -> Self {
        PacejkaParams::sport_tire()
    }
}

impl PacejkaParams {
    /// Typical sport tire with high grip.
    pub fn sport_tire() -> Self {
        PacejkaParams {
            b0: 1.65, b1: 0.0, b2: 1688.0, b3: 0.0, b4: 229.0,
            b5: 0.0, b6: 0.0, b7: 0.0, b8: -10.0, b9: 0.0,
            b10: 0.0, b11: 0.0, b12: 0.0, b13: 0.0,
            a0: 1.3, a1: -22.1, a2: 1011.0, a3: 1078.0, a4: 1.82,
            a5: 0.208, a6: 0.0, a7: -0.354, a8: 0.707, a9: 0.028,
            a10: 0.0, a11: 14.8, a12: 0.022, a13: 0.0, a14: 0.0,
            a15: 0.0, a16: 0.0, a17: 0.0,
            nominal_load: 4000.0,
        }
    }

    /// Drift tire: lower grip, more progressive breakaway.
    pub fn drift_tire() -> Self {
        PacejkaParams {
            b0: 1.5, b1: 0.0, b2: 1400.0, b3: 0.0, b4: 200.0,
            b5: 0.0, b6: 0.0, b7: 0.0, b8: -8.0, b9: 0.0,
            b10: 0.0, b11: 0.0, b12: 0.0, b13: 0.0,
            a0: 1.2, a1: -18.0, a2: 850.0, a3: 900.0, a4: 2.0,
            a5: 0.15, a6: 0.0, a7: -0.2, a8: 0.5, a9: 0.02,
            a10: 0.0, a11: 10.0, a12: 0.015, a13: 0.0, a14: 0.0,
            a15: 0.0, a16: 0.0, a17: 0.0,
            nominal_load: 4000.0,
        }
    }

    /// Wet/rain conditions: significantly reduced grip, earlier breakaway.
    pub fn rain_tire() -> Self {
        PacejkaParams {
            b0: 1.4, b1: 0.0, b2: 1000.0, b3: 0.0, b4: 150.0,
            b5: 0.0, b6: 0.0, b7: 0.0, b8: -5.0, b9: 0.0,
            b10: 0.0, b11: 0.0, b12: 0.0, b13: 0.0,
            a0: 1.1, a1: -15.0, a2: 600.0, a3: 700.0, a4: 2.5,
            a5: 0.1, a6: 0.0, a7: -0.1, a8: 0.3, a9: 0.01,
            a10: 0.0, a11: 5.0, a12: 0.01, a13: 0.0, a14: 0.0,
            a15: 0.0, a16: 0.0, a17: 0.0,
            nominal_load: 4000.0,
        }
    }
}

/// Evaluates longitudinal/lateral Pacejka curves for a single tire.
#[derive(Debug, Clone, Copy)]
pub struct PacejkaFormula {
    pub params: PacejkaParams,
}

impl PacejkaFormula {
    pub fn new(params: PacejkaParams) -> Self {
        PacejkaFormula { params }
    }

    /// Core Magic Formula evaluation.
    pub fn magic_formula(x: f64, b: f64, c: f64, d: f64, e: f64, sh: f64, sv: f64) -> f64 {
        let x1 = x + sh;
        let bx1 = b * x1;
        d * (c * (bx1 - e * (bx1 - bx1.atan())).atan()).sin() + sv
    }

    /// Longitudinal force (N) from slip ratio and vertical load.
    pub fn longitudinal_force(&self, slip_ratio: f64, fz: f64) -> f64 {
        if fz <= 0.0 {
            return 0.0;
        }
        let p = &self.params;
        let fz_kn = fz / 1000.0;

        let c = p.b0;
        let d = fz * (p.b1 * fz_kn + p.b2) / 1000.0;
        let bcd = (p.b3 * fz_kn * fz_kn + p.b4 * fz_kn) * (-p.b5 * fz_kn).exp();
        let b = if (c * d).abs() > 1e-6 {
            bcd / (c * d)
        } else {
            log::trace!("longitudinal_force: |c*d| below epsilon, stiffness factor floored to 0");
            0.0
        };
        let e = p.b6 * fz_kn * fz_kn + p.b7 * fz_kn + p.b8;
        let sh = p.b9 * fz_kn + p.b10;
        let sv = p.b11 * fz_kn + p.b12;

        Self::magic_formula(slip_ratio, b, c, d, e, sh, sv)
    }

    /// Lateral force (N) from slip angle (degrees), vertical load, and camber (degrees).
    pub fn lateral_force(&self, slip_angle_deg: f64, fz: f64, camber_deg: f64) -> f64 {
        if fz <= 0.0 {
            return 0.0;
        }
        let p = &self.params;
        let fz_kn = fz / 1000.0;

        let d = fz * (p.a1 * fz_kn + p.a2) * (1.0 - p.a15 * camber_deg * camber_deg) / 1000.0;
        let c = p.a0;
        let bcd = p.a3 * (2.0 * (fz_kn / p.a4).atan()).sin() * (1.0 - p.a5 * camber_deg.abs());
        let b = if (c * d).abs() > 1e-6 {
            bcd / (c * d)
        } else {
            log::trace!("lateral_force: |c*d| below epsilon, stiffness factor floored to 0");
            0.0
        };
        let e = (p.a6 * fz_kn + p.a7)
            * (1.0 - (p.a16 * camber_deg + p.a17) * slip_angle_deg.signum());
        let sh = p.a8 * fz_kn + p.a9 + p.a10 * camber_deg;
        let sv = (p.a11 * fz_kn + p.a12) + (p.a13 * fz_kn + p.a14) * camber_deg * fz_kn;

        Self::magic_formula(slip_angle_deg, b, c, d, e, sh, sv)
    }

    /// Peak lateral force magnitude (N) and the slip angle (degrees) it occurs at,
    /// found by a 200-sample scan over `[0, 20]` degrees.
    pub fn peak_lateral_force(&self, fz: f64, camber_deg: f64) -> (f64, f64) {
        let samples = 200;
        let mut best_force = 0.0_f64;
        let mut best_angle = 0.0_f64;
        for i in 0..samples {
            let angle = 20.0 * (i as f64) / ((samples - 1) as f64);
            let force = self.lateral_force(angle, fz, camber_deg).abs();
            if force > best_force {
                best_force = force;
                best_angle = angle;
            }
        }
        (best_force, best_angle)
    }

    /// Peak longitudinal force magnitude (N) and the slip ratio it occurs at,
    /// found by a 200-sample scan over `[0, 0.5]`.
    pub fn peak_longitudinal_force(&self, fz: f64) -> (f64, f64) {
        let samples = 200;
        let mut best_force = 0.0_f64;
        let mut best_ratio = 0.0_f64;
        for i in 0..samples {
            let ratio = 0.5 * (i as f64) / ((samples - 1) as f64);
            let force = self.longitudinal_force(ratio, fz).abs();
            if force > best_force {
                best_force = force;
                best_ratio = ratio;
            }
        }
        (best_force, best_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_load_gives_zero_force() {
        let f = PacejkaFormula::new(PacejkaParams::sport_tire());
        assert_eq!(f.longitudinal_force(0.1, 0.0), 0.0);
        assert_eq!(f.lateral_force(5.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn zero_slip_gives_near_zero_force() {
        let f = PacejkaFormula::new(PacejkaParams::sport_tire());
        assert_relative_eq!(f.longitudinal_force(0.0, 4000.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.lateral_force(0.0, 4000.0, 0.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn longitudinal_force_is_odd_in_slip_ratio() {
        let f = PacejkaFormula::new(PacejkaParams::sport_tire());
        let pos = f.longitudinal_force(0.2, 4000.0);
        let neg = f.longitudinal_force(-0.2, 4000.0);
        assert_relative_eq!(pos, -neg, epsilon = 1e-9);
    }

    #[test]
    fn peak_force_is_bounded_and_positive() {
        let f = PacejkaFormula::new(PacejkaParams::sport_tire());
        let (peak, angle) = f.peak_lateral_force(4000.0, 0.0);
        assert!(peak > 0.0);
        assert!((0.0..=20.0).contains(&angle));
    }

    #[test]
    fn drift_tire_has_lower_peak_than_sport() {
        let sport = PacejkaFormula::new(PacejkaParams::sport_tire());
        let drift = PacejkaFormula::new(PacejkaParams::drift_tire());
        let (sport_peak, _) = sport.peak_lateral_force(4000.0, 0.0);
        let (drift_peak, _) = drift.peak_lateral_force(4000.0, 0.0);
        assert!(drift_peak < sport_peak);
    }
}
