//! Named vehicle presets bundling a [`CarConfig`], [`SuspensionConfig`],
//! [`SteeringConfig`], and [`DrivetrainConfig`] for a representative archetype.

use crate::error::ConfigError;
use crate::vehicle::{CarConfig, DifferentialType, DriveType, DrivetrainConfig, SteeringConfig, SuspensionConfig};

pub struct VehiclePreset {
    pub car: CarConfig,
    pub suspension: SuspensionConfig,
    pub steering: SteeringConfig,
    pub drivetrain: DrivetrainConfig,
}

pub const AVAILABLE: [&str; 6] = ["sport_coupe", "drift_car", "muscle", "hot_hatch", "formula", "touring"];

/// Look up a vehicle preset by catalog id.
pub fn get(name: &str) -> Result<VehiclePreset, ConfigError> {
    let preset = match name {
        "sport_coupe" => VehiclePreset {
            car: CarConfig { mass: 1300.0, yaw_inertia: 2200.0, ..CarConfig::default() },
            suspension: SuspensionConfig { total_mass: 1300.0, ..SuspensionConfig::default() },
            steering: SteeringConfig::default(),
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Rwd,
                differential: DifferentialType::Lsd,
                max_torque: 380.0,
                max_rpm: 7200.0,
                ..DrivetrainConfig::default()
            },
        },
        "drift_car" => VehiclePreset {
            car: CarConfig { mass: 1450.0, yaw_inertia: 2600.0, cg_height: 0.55, ..CarConfig::default() },
            suspension: SuspensionConfig {
                total_mass: 1450.0,
                cg_height: 0.55,
                front_roll_stiffness: 0.4,
                rear_roll_stiffness: 0.6,
                ..SuspensionConfig::default()
            },
            steering: SteeringConfig { ackermann_factor: 0.6, steering_rate: 4.5, ..SteeringConfig::default() },
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Rwd,
                differential: DifferentialType::Lsd,
                max_torque: 420.0,
                lsd_power_ratio: 0.5,
                lsd_coast_ratio: 0.2,
                ..DrivetrainConfig::default()
            },
        },
        "muscle" => VehiclePreset {
            car: CarConfig { mass: 1700.0, yaw_inertia: 3100.0, cg_to_front: 1.5, ..CarConfig::default() },
            suspension: SuspensionConfig {
                total_mass: 1700.0,
                cg_to_front: 1.5,
                front_roll_stiffness: 0.45,
                rear_roll_stiffness: 0.55,
                ..SuspensionConfig::default()
            },
            steering: SteeringConfig { steering_rate: 2.2, ..SteeringConfig::default() },
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Rwd,
                differential: DifferentialType::Locked,
                max_torque: 550.0,
                max_rpm: 6500.0,
                gear_ratio: 3.1,
                ..DrivetrainConfig::default()
            },
        },
        "hot_hatch" => VehiclePreset {
            car: CarConfig { mass: 1200.0, yaw_inertia: 1900.0, cg_to_front: 1.2, ..CarConfig::default() },
            suspension: SuspensionConfig {
                total_mass: 1200.0,
                cg_to_front: 1.2,
                ..SuspensionConfig::default()
            },
            steering: SteeringConfig { max_steer_angle: 0.65, steering_rate: 3.5, ..SteeringConfig::default() },
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Fwd,
                differential: DifferentialType::Open,
                max_torque: 300.0,
                gear_ratio: 3.8,
                brake_bias: 0.7,
                ..DrivetrainConfig::default()
            },
        },
        "formula" => VehiclePreset {
            car: CarConfig {
                mass: 740.0,
                yaw_inertia: 900.0,
                wheelbase: 3.0,
                cg_to_front: 1.5,
                track_front: 1.6,
                track_rear: 1.55,
                cg_height: 0.28,
            },
            suspension: SuspensionConfig {
                wheelbase: 3.0,
                track_front: 1.6,
                track_rear: 1.55,
                cg_height: 0.28,
                cg_to_front: 1.5,
                total_mass: 740.0,
                front_roll_stiffness: 0.55,
                rear_roll_stiffness: 0.45,
                ..SuspensionConfig::default()
            },
            steering: SteeringConfig {
                wheelbase: 3.0,
                track_front: 1.6,
                max_steer_angle: 0.35,
                steering_rate: 5.0,
                ..SteeringConfig::default()
            },
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Rwd,
                differential: DifferentialType::Lsd,
                max_torque: 350.0,
                max_rpm: 12000.0,
                idle_rpm: 4000.0,
                gear_ratio: 2.8,
                max_brake_torque: 2200.0,
                brake_bias: 0.6,
                ..DrivetrainConfig::default()
            },
        },
        "touring" => VehiclePreset {
            car: CarConfig { mass: 1550.0, yaw_inertia: 2900.0, ..CarConfig::default() },
            suspension: SuspensionConfig { total_mass: 1550.0, ..SuspensionConfig::default() },
            steering: SteeringConfig { steering_rate: 2.5, ackermann_factor: 0.9, ..SteeringConfig::default() },
            drivetrain: DrivetrainConfig {
                drive_type: DriveType::Awd,
                differential: DifferentialType::Open,
                max_torque: 420.0,
                ..DrivetrainConfig::default()
            },
        },
        _ => {
            return Err(ConfigError::UnknownPreset {
                name: name.to_string(),
                available: AVAILABLE.join(", "),
            })
        }
    };
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_resolve_and_validate() {
        for name in AVAILABLE {
            let preset = get(name).expect("preset should resolve");
            assert!(preset.car.validate().is_ok());
        }
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(get("go_kart").is_err());
    }

    #[test]
    fn hot_hatch_is_front_wheel_drive() {
        let preset = get("hot_hatch").unwrap();
        assert_eq!(preset.drivetrain.drive_type, DriveType::Fwd);
    }
}
