//! Shared primitives for the vehicle dynamics workspace: planar vectors
//! and the rigid body integrator.

pub mod rigid_body;
pub mod vec3;

pub use rigid_body::RigidBody;
pub use vec3::{angle_difference, clamp, lerp, normalize_angle, sign, Vec3};
