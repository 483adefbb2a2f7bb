//! Combined-slip force reconciliation under a friction ellipse.
//!
//! When a tire slips both longitudinally and laterally at once, the two
//! forces compete for the same friction budget:
//! `(Fx/Fx_max)^2 + (Fy/Fy_max)^2 <= 1`. Three interchangeable methods are
//! provided; `Empirical` is the default used by [`crate::tire::Tire`].

use super::pacejka::PacejkaFormula;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombinedForces {
    pub fx: f64,
    pub fy: f64,
    pub fx_pure: f64,
    pub fy_pure: f64,
    pub saturation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinedSlipMethod {
    /// Pure forces scaled back onto the friction ellipse boundary.
    Simple,
    /// Slip expressed as a 2D vector, magnitude looked up on the lateral curve.
    Vector,
    /// Cosine-weighted attenuation, then ellipse clip. Default.
    Empirical,
}

#[derive(Debug, Clone, Copy)]
pub struct CombinedSlip {
    pub pacejka: PacejkaFormula,
    pub friction_mu: f64,
    pub ellipse_ratio: f64,
}

impl CombinedSlip {
    pub fn new(pacejka: PacejkaFormula, friction_mu: f64) -> Self {
        CombinedSlip { pacejka, friction_mu, ellipse_ratio: 1.0 }
    }

    pub fn combined_forces_simple(
        &self,
        slip_ratio: f64,
        slip_angle_deg: f64,
        fz: f64,
        camber_deg: f64,
    ) -> CombinedForces {
        let fx_pure = self.pacejka.longitudinal_force(slip_ratio, fz) * self.friction_mu;
        let fy_pure = self.pacejka.lateral_force(slip_angle_deg, fz, camber_deg) * self.friction_mu;

        let (mut fx_peak, _) = self.pacejka.peak_longitudinal_force(fz);
        let (mut fy_peak, _) = self.pacejka.peak_lateral_force(fz, camber_deg);
        fx_peak *= self.friction_mu;
        fy_peak *= self.friction_mu * self.ellipse_ratio;

        if fx_peak < 1.0 || fy_peak < 1.0 {
            return CombinedForces { fx: 0.0, fy: 0.0, fx_pure, fy_pure, saturation: 0.0 };
        }

        let fx_norm = if fx_peak > 0.0 { fx_pure / fx_peak } else { 0.0 };
        let fy_norm = if fy_peak > 0.0 { fy_pure / fy_peak } else { 0.0 };
        let saturation = (fx_norm * fx_norm + fy_norm * fy_norm).sqrt();

        if saturation <= 1.0 {
            return CombinedForces { fx: fx_pure, fy: fy_pure, fx_pure, fy_pure, saturation };
        }

        let scale = 1.0 / saturation;
        CombinedForces { fx: fx_pure * scale, fy: fy_pure * scale, fx_pure, fy_pure, saturation: 1.0 }
    }

    pub fn combined_forces_vector(
        &self,
        slip_ratio: f64,
        slip_angle_rad: f64,
        fz: f64,
        camber_deg: f64,
    ) -> CombinedForces {
        let slip_angle_deg = slip_angle_rad.to_degrees();
        let fx_pure = self.pacejka.longitudinal_force(slip_ratio, fz) * self.friction_mu;
        let fy_pure = self.pacejka.lateral_force(slip_angle_deg, fz, camber_deg) * self.friction_mu;

        let epsilon = 1e-6;
        let tan_alpha = if slip_angle_rad.abs() < 1.5 { slip_angle_rad.tan() } else { 10.0 };
        let sigma = (slip_ratio * slip_ratio + tan_alpha * tan_alpha).sqrt();

        if sigma < epsilon {
            return CombinedForces { fx: 0.0, fy: 0.0, fx_pure, fy_pure, saturation: 0.0 };
        }

        let sigma_deg = sigma.atan().to_degrees();
        let f_combined = self.pacejka.lateral_force(sigma_deg, fz, camber_deg).abs() * self.friction_mu;

        let mut fx = f_combined * (slip_ratio / sigma);
        let mut fy = f_combined * (tan_alpha / sigma);
        fx = fx.copysign(slip_ratio);
        fy = fy.copysign(slip_angle_rad);

        let (fx_peak, _) = self.pacejka.peak_longitudinal_force(fz);
        let (fy_peak, _) = self.pacejka.peak_lateral_force(fz, camber_deg);
        let f_peak = (fx_peak * fx_peak + fy_peak * fy_peak).sqrt() * self.friction_mu;

        let saturation = if f_peak > 0.0 {
            ((fx * fx + fy * fy).sqrt() / f_peak).min(1.0)
        } else {
            0.0
        };

        CombinedForces { fx, fy, fx_pure, fy_pure, saturation }
    }

    pub fn combined_forces_empirical(
        &self,
        slip_ratio: f64,
        slip_angle_deg: f64,
        fz: f64,
        camber_deg: f64,
    ) -> CombinedForces {
        let fx_pure = self.pacejka.longitudinal_force(slip_ratio, fz) * self.friction_mu;
        let fy_pure = self.pacejka.lateral_force(slip_angle_deg, fz, camber_deg) * self.friction_mu;

        let (mut fx_peak, _) = self.pacejka.peak_longitudinal_force(fz);
        let (mut fy_peak, _) = self.pacejka.peak_lateral_force(fz, camber_deg);
        fx_peak *= self.friction_mu;
        fy_peak *= self.friction_mu;

        if fx_peak < 1.0 || fy_peak < 1.0 {
            return CombinedForces { fx: 0.0, fy: 0.0, fx_pure, fy_pure, saturation: 0.0 };
        }

        let fx_norm = fx_pure.abs() / fx_peak;
        let fy_norm = fy_pure.abs() / fy_peak;
        if fx_norm + fy_norm < 0.001 {
            return CombinedForces { fx: 0.0, fy: 0.0, fx_pure, fy_pure, saturation: 0.0 };
        }

        let force_angle = fy_norm.atan2(fx_norm);
        let gx = (force_angle * 0.5).cos();
        let gy = ((std::f64::consts::FRAC_PI_2 - force_angle) * 0.5).cos();

        let mut fx = fx_pure * gx;
        let mut fy = fy_pure * gy;

        let fx_scaled = if fx_peak > 0.0 { fx / fx_peak } else { 0.0 };
        let fy_scaled = if fy_peak > 0.0 { fy / fy_peak } else { 0.0 };
        let mut saturation = (fx_scaled * fx_scaled + fy_scaled * fy_scaled).sqrt();

        if saturation > 1.0 {
            let scale = 1.0 / saturation;
            fx *= scale;
            fy *= scale;
            saturation = 1.0;
        }

        CombinedForces { fx, fy, fx_pure, fy_pure, saturation }
    }

    pub fn calculate(
        &self,
        slip_ratio: f64,
        slip_angle_deg: f64,
        fz: f64,
        camber_deg: f64,
        method: CombinedSlipMethod,
    ) -> CombinedForces {
        match method {
            CombinedSlipMethod::Simple => {
                self.combined_forces_simple(slip_ratio, slip_angle_deg, fz, camber_deg)
            }
            CombinedSlipMethod::Vector => self.combined_forces_vector(
                slip_ratio,
                slip_angle_deg.to_radians(),
                fz,
                camber_deg,
            ),
            CombinedSlipMethod::Empirical => {
                self.combined_forces_empirical(slip_ratio, slip_angle_deg, fz, camber_deg)
            }
        }
    }
}

/// Clamp a force vector onto the friction ellipse boundary.
pub fn friction_ellipse_limit(fx: f64, fy: f64, fx_max: f64, fy_max: f64) -> (f64, f64) {
    if fx_max <= 0.0 || fy_max <= 0.0 {
        return (0.0, 0.0);
    }
    let fx_norm = fx / fx_max;
    let fy_norm = fy / fy_max;
    let r_sq = fx_norm * fx_norm + fy_norm * fy_norm;
    if r_sq <= 1.0 {
        return (fx, fy);
    }
    let scale = 1.0 / r_sq.sqrt();
    (fx * scale, fy * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tire::pacejka::PacejkaParams;
    use approx::assert_relative_eq;

    fn slip() -> CombinedSlip {
        CombinedSlip::new(PacejkaFormula::new(PacejkaParams::sport_tire()), 1.0)
    }

    #[test]
    fn friction_ellipse_no_op_when_inside() {
        let (fx, fy) = friction_ellipse_limit(100.0, 100.0, 1000.0, 1000.0);
        assert_relative_eq!(fx, 100.0);
        assert_relative_eq!(fy, 100.0);
    }

    #[test]
    fn friction_ellipse_clips_when_outside() {
        let (fx, fy) = friction_ellipse_limit(1000.0, 1000.0, 1000.0, 1000.0);
        let r = (fx / 1000.0).powi(2) + (fy / 1000.0).powi(2);
        assert_relative_eq!(r, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn empirical_pure_longitudinal_matches_pure_force() {
        let cs = slip();
        let combined = cs.calculate(0.15, 0.0, 4000.0, 0.0, CombinedSlipMethod::Empirical);
        assert_relative_eq!(combined.fx, combined.fx_pure, epsilon = 1.0);
        assert_relative_eq!(combined.fy, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn empirical_saturation_never_exceeds_one() {
        let cs = slip();
        let combined = cs.calculate(0.9, 15.0, 4000.0, 0.0, CombinedSlipMethod::Empirical);
        assert!(combined.saturation <= 1.0 + 1e-9);
    }

    #[test]
    fn simple_method_respects_ellipse() {
        let cs = slip();
        let combined = cs.calculate(0.9, 15.0, 4000.0, 0.0, CombinedSlipMethod::Simple);
        let (fx_peak, _) = cs.pacejka.peak_longitudinal_force(4000.0);
        let (fy_peak, _) = cs.pacejka.peak_lateral_force(4000.0, 0.0);
        let r = (combined.fx / fx_peak).powi(2) + (combined.fy / fy_peak).powi(2);
        assert!(r <= 1.0 + 1e-6);
    }
}
