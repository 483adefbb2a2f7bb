//! Named tire presets, for callers that select a tire by catalog id rather
//! than building a [`TireConfig`] by hand.

use crate::error::ConfigError;
use crate::tire::{PacejkaParams, TireConfig};

fn street_pacejka() -> PacejkaParams {
    PacejkaParams {
        b0: 1.5,
        b2: 1400.0,
        b4: 200.0,
        b8: -8.0,
        a0: 1.2,
        a2: 900.0,
        a3: 950.0,
        a4: 1.9,
        a7: -0.3,
        nominal_load: 4000.0,
        ..zeroed()
    }
}

fn semi_slick_pacejka() -> PacejkaParams {
    PacejkaParams {
        b0: 1.7,
        b2: 1900.0,
        b4: 260.0,
        b8: -12.0,
        a0: 1.4,
        a2: 1200.0,
        a3: 1250.0,
        a4: 1.7,
        a7: -0.45,
        nominal_load: 4500.0,
        ..zeroed()
    }
}

fn zeroed() -> PacejkaParams {
    PacejkaParams {
        b0: 0.0,
        b1: 0.0,
        b2: 0.0,
        b3: 0.0,
        b4: 0.0,
        b5: 0.0,
        b6: 0.0,
        b7: 0.0,
        b8: 0.0,
        b9: 0.0,
        b10: 0.0,
        b11: 0.0,
        b12: 0.0,
        b13: 0.0,
        a0: 0.0,
        a1: 0.0,
        a2: 0.0,
        a3: 0.0,
        a4: 0.0,
        a5: 0.0,
        a6: 0.0,
        a7: 0.0,
        a8: 0.0,
        a9: 0.0,
        a10: 0.0,
        a11: 0.0,
        a12: 0.0,
        a13: 0.0,
        a14: 0.0,
        a15: 0.0,
        a16: 0.0,
        a17: 0.0,
        nominal_load: 4000.0,
    }
}

/// Look up a tire preset by catalog id: `sport`, `drift`, `street`, `rain`,
/// `semi_slick`.
pub fn get(name: &str) -> Result<TireConfig, ConfigError> {
    let config = match name {
        "sport" => TireConfig {
            radius: 0.32,
            width: 0.245,
            inertia: 1.2,
            pacejka_params: PacejkaParams::sport_tire(),
            relaxation_length_x: 0.3,
            relaxation_length_y: 0.4,
            use_relaxation: true,
            friction_mu: 1.0,
        },
        "drift" => TireConfig {
            radius: 0.32,
            width: 0.225,
            inertia: 1.0,
            pacejka_params: PacejkaParams::drift_tire(),
            relaxation_length_x: 0.35,
            relaxation_length_y: 0.45,
            use_relaxation: true,
            friction_mu: 0.9,
        },
        "street" => TireConfig {
            radius: 0.33,
            width: 0.205,
            inertia: 1.0,
            pacejka_params: street_pacejka(),
            relaxation_length_x: 0.45,
            relaxation_length_y: 0.55,
            use_relaxation: true,
            friction_mu: 0.95,
        },
        "rain" => TireConfig {
            radius: 0.32,
            width: 0.225,
            inertia: 1.0,
            pacejka_params: PacejkaParams::rain_tire(),
            relaxation_length_x: 0.5,
            relaxation_length_y: 0.6,
            use_relaxation: true,
            friction_mu: 0.7,
        },
        "semi_slick" => TireConfig {
            radius: 0.31,
            width: 0.265,
            inertia: 1.3,
            pacejka_params: semi_slick_pacejka(),
            relaxation_length_x: 0.25,
            relaxation_length_y: 0.35,
            use_relaxation: true,
            friction_mu: 1.1,
        },
        _ => {
            return Err(ConfigError::UnknownPreset {
                name: name.to_string(),
                available: AVAILABLE.join(", "),
            })
        }
    };
    Ok(config)
}

pub const AVAILABLE: [&str; 5] = ["sport", "drift", "street", "rain", "semi_slick"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_resolve() {
        for name in AVAILABLE {
            assert!(get(name).is_ok());
        }
    }

    #[test]
    fn unknown_preset_lists_available_names() {
        let err = get("slick").unwrap_err();
        match err {
            ConfigError::UnknownPreset { available, .. } => assert!(available.contains("sport")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn every_preset_has_positive_radius() {
        for name in AVAILABLE {
            assert!(get(name).unwrap().radius > 0.0);
        }
    }
}
