pub mod car;
pub mod drivetrain;
pub mod handbrake;
pub mod steering;
pub mod suspension;
pub mod wheel;

pub use car::{CarConfig, CarState, Vehicle};
pub use drivetrain::{DifferentialType, DriveType, Drivetrain, DrivetrainConfig};
pub use handbrake::{Handbrake, HandbrakeConfig};
pub use steering::{Steering, SteeringConfig};
pub use suspension::{Suspension, SuspensionConfig};
pub use wheel::{PerWheel, WheelLoads, WheelPosition};
