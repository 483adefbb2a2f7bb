//! Runs the six end-to-end scenarios the core library is tested against and
//! prints a short summary plus a JSON telemetry dump for the last one.

use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use drift::{DriftAnalyzer, DriftDetector};
use mechanics::presets;
use mechanics::vehicle::{HandbrakeConfig, Vehicle};
use mechanics::world::World;

const FIXED_DT: f64 = 0.001;

fn build_vehicle(tire_preset: &str, drive_preset: &str) -> Vehicle {
    let tire_config = presets::tire::get(tire_preset).expect("known tire preset");
    let vehicle_preset = presets::vehicle::get(drive_preset).expect("known vehicle preset");

    Vehicle::new(
        vehicle_preset.car,
        tire_config,
        vehicle_preset.suspension,
        vehicle_preset.steering,
        vehicle_preset.drivetrain,
        HandbrakeConfig::default(),
    )
}

fn scenario_straight_line_acceleration() {
    info!("scenario 1: straight-line acceleration (sport)");
    let mut world = World::new(FIXED_DT);
    let idx = world.add_vehicle(build_vehicle("sport", "sport_coupe"));

    let steps = (3.0 / FIXED_DT) as u32;
    for _ in 0..steps {
        world.vehicle_mut(idx).set_inputs(1.0, 0.0, 0.0, 0.0);
        world.step();
    }

    let state = world.vehicle(idx).get_state();
    info!(
        "  final speed={:.2} m/s, drift angle={:.2} deg",
        state.speed, state.drift_angle_deg
    );
}

fn scenario_constant_radius_cornering() {
    info!("scenario 2: constant-radius cornering (sport)");
    let mut world = World::new(FIXED_DT);
    let idx = world.add_vehicle(build_vehicle("sport", "sport_coupe"));
    world.vehicle_mut(idx).set_velocity(15.0, None);

    let steps = (4.0 / FIXED_DT) as u32;
    for _ in 0..steps {
        world.vehicle_mut(idx).set_inputs(0.3, 0.0, 0.3, 0.0);
        world.step();
    }

    let state = world.vehicle(idx).get_state();
    info!("  drift angle={:.2} deg at end of corner", state.drift_angle_deg);
}

fn scenario_handbrake_turn() {
    info!("scenario 3: handbrake turn (drift config)");
    let mut world = World::new(FIXED_DT);
    let idx = world.add_vehicle(build_vehicle("drift", "drift_car"));
    world.vehicle_mut(idx).set_velocity(15.0, None);

    let mut analyzer = DriftAnalyzer::new();
    let mut detector = DriftDetector::new();
    let steps = (2.0 / FIXED_DT) as u32;

    let throttle = 0.2;
    for step in 0..steps {
        let t = step as f64 * FIXED_DT;
        let handbrake = if (0.2..0.7).contains(&t) { 1.0 } else { 0.0 };
        world.vehicle_mut(idx).set_inputs(throttle, 0.0, 0.5, handbrake);
        world.step();

        let state = world.vehicle(idx).get_state();
        analyzer.update(
            state.velocity,
            state.yaw,
            0.5_f64.to_degrees(),
            throttle,
            state.yaw_rate,
            state.speed,
            FIXED_DT,
            t,
        );
        detector.update(state.drift_angle_deg, 0.0, 0.0, handbrake, throttle, 0.0, 0.5_f64.to_degrees(), state.speed, FIXED_DT);
    }

    info!("  final detector state = {:?}", detector.state());
}

fn scenario_power_over() {
    info!("scenario 4: power-over (drift config, LSD)");
    let mut world = World::new(FIXED_DT);
    let idx = world.add_vehicle(build_vehicle("drift", "drift_car"));
    world.vehicle_mut(idx).set_velocity(10.0, None);

    let steps = (2.0 / FIXED_DT) as u32;
    for _ in 0..steps {
        world.vehicle_mut(idx).set_inputs(1.0, 0.0, 0.4, 0.0);
        world.step();
    }

    let state = world.vehicle(idx).get_state();
    info!("  final drift angle={:.2} deg, speed={:.2} m/s", state.drift_angle_deg, state.speed);
}

fn scenario_spiral_of_death() {
    info!("scenario 6: spiral-of-death cap");
    let mut world = World::new(FIXED_DT);
    world.add_vehicle(build_vehicle("sport", "sport_coupe"));
    let steps = world.step_fixed(10.0);
    info!("  step_fixed(10.0) ran {steps} ticks, world time={:.3}", world.time());
}

fn main() {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .expect("logger should initialize exactly once");

    scenario_straight_line_acceleration();
    scenario_constant_radius_cornering();
    scenario_handbrake_turn();
    scenario_power_over();
    scenario_spiral_of_death();

    let mut world = World::new(FIXED_DT);
    let idx = world.add_vehicle(build_vehicle("sport", "sport_coupe"));
    for _ in 0..500 {
        world.vehicle_mut(idx).set_inputs(1.0, 0.0, 0.0, 0.0);
        world.step();
    }
    let telemetry = world.vehicle(idx).get_state();
    match serde_json::to_string_pretty(&telemetry) {
        Ok(json) => info!("final telemetry:\n{json}"),
        Err(err) => log::warn!("failed to serialize telemetry: {err}"),
    }
}
