//! First-order tire force relaxation.
//!
//! Real tires don't generate steady-state force instantly — the contact
//! patch has to deform and the tread has to build up slip first. Modeled as
//! a first-order lag whose time constant depends on travel speed and a
//! "relaxation length": the distance the tire must roll for force to reach
//! ~63% of steady-state.

/// Minimum velocity to prevent an unbounded time constant.
pub const MIN_VELOCITY: f64 = 0.5;
/// Time constant ceiling so forces always eventually converge.
pub const MAX_TAU: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelaxationState {
    pub fx: f64,
    pub fy: f64,
    pub tau_x: f64,
    pub tau_y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TireRelaxation {
    pub sigma_x: f64,
    pub sigma_y: f64,
    fx: f64,
    fy: f64,
}

impl TireRelaxation {
    pub fn new(relaxation_length_x: f64, relaxation_length_y: f64) -> Self {
        TireRelaxation { sigma_x: relaxation_length_x, sigma_y: relaxation_length_y, fx: 0.0, fy: 0.0 }
    }

    fn time_constants(&self, velocity: f64) -> (f64, f64) {
        let v = velocity.abs().max(MIN_VELOCITY);
        ((self.sigma_x / v).min(MAX_TAU), (self.sigma_y / v).min(MAX_TAU))
    }

    /// Exact exponential filter: `alpha = 1 - exp(-dt/tau)`.
    pub fn update(&mut self, target_fx: f64, target_fy: f64, velocity: f64, dt: f64) -> (f64, f64) {
        let (tau_x, tau_y) = self.time_constants(velocity);

        if tau_x > 0.0 {
            let alpha_x = 1.0 - (-dt / tau_x).exp();
            self.fx += (target_fx - self.fx) * alpha_x;
        } else {
            self.fx = target_fx;
        }

        if tau_y > 0.0 {
            let alpha_y = 1.0 - (-dt / tau_y).exp();
            self.fy += (target_fy - self.fy) * alpha_y;
        } else {
            self.fy = target_fy;
        }

        (self.fx, self.fy)
    }

    /// Linear approximation of [`Self::update`], cheaper for very small `dt`.
    pub fn update_simple(&mut self, target_fx: f64, target_fy: f64, velocity: f64, dt: f64) -> (f64, f64) {
        let (tau_x, tau_y) = self.time_constants(velocity);

        let alpha_x = if tau_x > 0.0 { (dt / tau_x).min(1.0) } else { 1.0 };
        let alpha_y = if tau_y > 0.0 { (dt / tau_y).min(1.0) } else { 1.0 };

        self.fx += (target_fx - self.fx) * alpha_x;
        self.fy += (target_fy - self.fy) * alpha_y;

        (self.fx, self.fy)
    }

    pub fn get_state(&self) -> RelaxationState {
        let (tau_x, tau_y) = self.time_constants(MIN_VELOCITY);
        RelaxationState { fx: self.fx, fy: self.fy, tau_x, tau_y }
    }

    pub fn reset(&mut self) {
        self.fx = 0.0;
        self.fy = 0.0;
    }

    pub fn set_forces(&mut self, fx: f64, fy: f64) {
        self.fx = fx;
        self.fy = fy;
    }

    pub fn current_forces(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }
}

/// Relaxation variant that shortens the effective relaxation length at high
/// combined slip, letting forces respond faster once the tire has already
/// broken away — useful for aggressive drift inputs.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveRelaxation {
    inner: TireRelaxation,
    pub high_slip_factor: f64,
    pub slip_threshold: f64,
}

impl AdaptiveRelaxation {
    pub fn new(
        relaxation_length_x: f64,
        relaxation_length_y: f64,
        high_slip_factor: f64,
        slip_threshold: f64,
    ) -> Self {
        AdaptiveRelaxation {
            inner: TireRelaxation::new(relaxation_length_x, relaxation_length_y),
            high_slip_factor,
            slip_threshold,
        }
    }

    pub fn update_adaptive(
        &mut self,
        target_fx: f64,
        target_fy: f64,
        velocity: f64,
        slip_ratio: f64,
        slip_angle: f64,
        dt: f64,
    ) -> (f64, f64) {
        let tan_alpha = if slip_angle.abs() < 1.5 { slip_angle.tan() } else { 100.0 };
        let combined_slip = (slip_ratio * slip_ratio + tan_alpha * tan_alpha).sqrt();

        let factor = if combined_slip > self.slip_threshold {
            let t = ((combined_slip - self.slip_threshold) / (1.0 - self.slip_threshold)).min(1.0);
            1.0 - t * (1.0 - self.high_slip_factor)
        } else {
            1.0
        };

        let (orig_x, orig_y) = (self.inner.sigma_x, self.inner.sigma_y);
        self.inner.sigma_x *= factor;
        self.inner.sigma_y *= factor;
        let result = self.inner.update(target_fx, target_fy, velocity, dt);
        self.inner.sigma_x = orig_x;
        self.inner.sigma_y = orig_y;

        result
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn current_forces(&self) -> (f64, f64) {
        self.inner.current_forces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relaxation_converges_toward_target() {
        let mut r = TireRelaxation::new(0.4, 0.5);
        for _ in 0..1000 {
            r.update(1000.0, 500.0, 10.0, 0.001);
        }
        let (fx, fy) = r.current_forces();
        assert_relative_eq!(fx, 1000.0, epsilon = 1.0);
        assert_relative_eq!(fy, 500.0, epsilon = 1.0);
    }

    #[test]
    fn relaxation_is_monotonic_toward_step_target() {
        let mut r = TireRelaxation::new(0.4, 0.5);
        let mut prev = 0.0;
        for _ in 0..50 {
            let (fx, _) = r.update(1000.0, 0.0, 10.0, 0.005);
            assert!(fx >= prev - 1e-9);
            prev = fx;
        }
    }

    #[test]
    fn reset_zeroes_forces() {
        let mut r = TireRelaxation::new(0.4, 0.5);
        r.update(1000.0, 500.0, 10.0, 0.1);
        r.reset();
        assert_eq!(r.current_forces(), (0.0, 0.0));
    }

    #[test]
    fn adaptive_relaxation_responds_faster_at_high_slip() {
        let mut low = AdaptiveRelaxation::new(0.4, 0.5, 0.5, 0.1);
        let mut high = AdaptiveRelaxation::new(0.4, 0.5, 0.5, 0.1);
        let (low_fx, _) = low.update_adaptive(1000.0, 0.0, 10.0, 0.05, 0.0, 0.01);
        let (high_fx, _) = high.update_adaptive(1000.0, 0.0, 10.0, 0.9, 0.0, 0.01);
        assert!(high_fx > low_fx);
    }
}
