//! Longitudinal slip ratio and lateral slip angle calculations.

use simcore::Vec3;

/// Minimum velocity threshold to avoid division by zero.
pub const MIN_VELOCITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlipState {
    pub slip_ratio: f64,
    pub slip_angle: f64,
    pub slip_angle_deg: f64,
    pub combined_slip: f64,
}

/// Longitudinal slip ratio.
///
/// `SR = (omega*R - Vx) / max(|Vx|, |omega*R|, epsilon)`, clamped to
/// `[-1, 1]`. Positive = acceleration, negative = braking.
pub fn slip_ratio(ground_velocity: f64, wheel_angular_velocity: f64, wheel_radius: f64) -> f64 {
    slip_ratio_with_epsilon(ground_velocity, wheel_angular_velocity, wheel_radius, MIN_VELOCITY)
}

pub fn slip_ratio_with_epsilon(
    ground_velocity: f64,
    wheel_angular_velocity: f64,
    wheel_radius: f64,
    epsilon: f64,
) -> f64 {
    slip_ratio_extended(ground_velocity, wheel_angular_velocity, wheel_radius, epsilon)
        .clamp(-1.0, 1.0)
}

/// Slip ratio without clamping, for combined-slip vector decomposition.
pub fn slip_ratio_extended(
    ground_velocity: f64,
    wheel_angular_velocity: f64,
    wheel_radius: f64,
    epsilon: f64,
) -> f64 {
    let wheel_velocity = wheel_angular_velocity * wheel_radius;
    let reference = ground_velocity.abs().max(wheel_velocity.abs()).max(epsilon);
    (wheel_velocity - ground_velocity) / reference
}

/// Lateral slip angle (radians), world frame.
///
/// `alpha = normalize(atan2(vy, vx) - wheel_heading)`, zero below `epsilon`.
pub fn slip_angle(velocity: Vec3, wheel_heading: f64) -> f64 {
    slip_angle_with_epsilon(velocity, wheel_heading, MIN_VELOCITY)
}

pub fn slip_angle_with_epsilon(velocity: Vec3, wheel_heading: f64, epsilon: f64) -> f64 {
    let speed = velocity.magnitude_2d();
    if speed < epsilon {
        return 0.0;
    }
    let velocity_angle = velocity.y.atan2(velocity.x);
    simcore::normalize_angle(velocity_angle - wheel_heading)
}

/// Slip angle from velocity already expressed in the tire's local frame
/// (x = forward, y = right).
pub fn slip_angle_from_local_velocity(local_velocity: Vec3, epsilon: f64) -> f64 {
    let vx = local_velocity.x;
    let vy = local_velocity.y;
    if vx.abs() < epsilon {
        if vy.abs() < epsilon {
            return 0.0;
        }
        return (std::f64::consts::FRAC_PI_2).copysign(vy);
    }
    vy.atan2(vx)
}

/// Combined slip magnitude `sigma = sqrt(SR^2 + tan(alpha)^2)`.
pub fn combined_slip_magnitude(slip_ratio: f64, slip_angle: f64) -> f64 {
    let tan_alpha = if slip_angle.abs() < std::f64::consts::FRAC_PI_2 - 0.01 {
        slip_angle.tan()
    } else {
        100.0
    };
    (slip_ratio * slip_ratio + tan_alpha * tan_alpha).sqrt()
}

/// Full slip state for a tire given contact velocity, heading, and spin.
pub fn calculate_slip(
    contact_velocity: Vec3,
    wheel_heading: f64,
    wheel_angular_velocity: f64,
    wheel_radius: f64,
) -> SlipState {
    let heading_vec = Vec3::new_2d(wheel_heading.cos(), wheel_heading.sin());
    let forward_velocity = contact_velocity.dot(&heading_vec);

    let sr = slip_ratio(forward_velocity, wheel_angular_velocity, wheel_radius);
    let sa = slip_angle(contact_velocity, wheel_heading);
    let sa_deg = sa.to_degrees();
    let combined = combined_slip_magnitude(sr, sa);

    SlipState { slip_ratio: sr, slip_angle: sa, slip_angle_deg: sa_deg, combined_slip: combined }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn slip_ratio_clamped_to_unit_range() {
        let sr = slip_ratio(1.0, 1000.0, 0.3);
        assert!((-1.0..=1.0).contains(&sr));
    }

    #[test]
    fn slip_ratio_zero_when_matched() {
        let sr = slip_ratio(10.0, 10.0 / 0.3, 0.3);
        assert_relative_eq!(sr, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn slip_angle_zero_below_min_velocity() {
        let a = slip_angle(Vec3::new_2d(0.1, 0.1), 0.0);
        assert_eq!(a, 0.0);
    }

    #[test]
    fn slip_angle_straight_ahead_is_zero() {
        let a = slip_angle(Vec3::new_2d(10.0, 0.0), 0.0);
        assert_relative_eq!(a, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn extended_slip_ratio_is_unclamped() {
        let sr = slip_ratio_extended(0.1, 1000.0, 0.3, 0.5);
        assert!(sr > 1.0);
    }
}
