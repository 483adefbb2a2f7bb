//! Planar vector primitive shared by every mechanics crate.
//!
//! The simulation is planar (motion in x/y, z reserved for height/attitude
//! bookkeeping), so `Vec3` carries a z component for anchor points and world
//! positions but most rotation/force math only touches x and y.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn new_2d(x: f64, y: f64) -> Self {
        Vec3 { x, y, z: 0.0 }
    }

    pub fn from_angle(angle: f64, magnitude: f64) -> Self {
        Vec3::new_2d(angle.cos() * magnitude, angle.sin() * magnitude)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude_2d(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Vec3 {
        let m = self.magnitude();
        if m < 1e-9 {
            Vec3::ZERO
        } else {
            *self / m
        }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// z-component of the 3D cross product, i.e. the planar cross product.
    pub fn cross_2d(&self, other: &Vec3) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate the x/y plane about z by `angle` radians using `nalgebra`'s
    /// planar rotation, leaving z untouched.
    pub fn rotate_z(&self, angle: f64) -> Vec3 {
        let r = Rotation2::new(angle);
        let v = r * Vector2::new(self.x, self.y);
        Vec3::new(v.x, v.y, self.z)
    }

    pub fn angle_2d(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn project_onto(&self, axis: &Vec3) -> Vec3 {
        let axis_n = axis.normalized();
        axis_n * self.dot(&axis_n)
    }

    /// The 2D vector rotated +90 degrees (left-hand perpendicular).
    pub fn perpendicular_2d(&self) -> Vec3 {
        Vec3::new_2d(-self.y, self.x)
    }

    pub fn lerp(&self, other: &Vec3, t: f64) -> Vec3 {
        *self + (*other - *self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

/// Normalize an angle (radians) into `(-pi, pi]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * std::f64::consts::PI);
    if a > std::f64::consts::PI {
        a -= 2.0 * std::f64::consts::PI;
    } else if a <= -std::f64::consts::PI {
        a += 2.0 * std::f64::consts::PI;
    }
    a
}

pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_angle(a - b)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotate_z_quarter_turn() {
        let v = Vec3::new_2d(1.0, 0.0);
        let r = v.rotate_z(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(3.0 * std::f64::consts::PI), std::f64::consts::PI, epsilon = 1e-9);
        assert_relative_eq!(normalize_angle(-3.0 * std::f64::consts::PI), std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn magnitude_2d_ignores_z() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert_relative_eq!(v.magnitude_2d(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn normalized_zero_vector_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }
}
