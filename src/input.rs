//! Keyboard shortcuts for the simulation clock and camera.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::types::SimulationClock;

/// Smallest non-zero rate magnitude reachable with the slow-down key.
pub const MIN_RATE_MAGNITUDE: f64 = 0.125;

/// Largest rate magnitude reachable with the speed-up key.
pub const MAX_RATE_MAGNITUDE: f64 = 100_000.0;

/// Rate adjustments bound to keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateCommand {
    Slower,
    Faster,
    Reverse,
}

/// The clock rate after applying `command` to `rate`. Zero stays zero.
pub fn adjusted_rate(rate: f64, command: RateCommand) -> f64 {
    match command {
        RateCommand::Slower => {
            let halved = rate * 0.5;
            if halved == 0.0 {
                0.0
            } else {
                halved.signum() * halved.abs().max(MIN_RATE_MAGNITUDE)
            }
        }
        RateCommand::Faster => {
            let doubled = rate * 2.0;
            doubled.signum() * doubled.abs().min(MAX_RATE_MAGNITUDE)
        }
        RateCommand::Reverse => -rate,
    }
}

/// Plugin providing keyboard input handling.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_shortcuts);
    }
}

/// Handle keyboard shortcuts for simulation control.
fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut clock: ResMut<SimulationClock>,
    mut orbit: ResMut<OrbitCamera>,
) {
    // Space: toggle pause
    if keys.just_pressed(KeyCode::Space) {
        clock.toggle();
        info!("Simulation {}", if clock.is_paused() { "paused" } else { "running" });
    }

    // R: camera back to the default view
    if keys.just_pressed(KeyCode::KeyR) {
        orbit.reset();
        info!("Camera reset");
    }

    let command = if keys.just_pressed(KeyCode::BracketLeft) {
        Some(RateCommand::Slower)
    } else if keys.just_pressed(KeyCode::BracketRight) {
        Some(RateCommand::Faster)
    } else if keys.just_pressed(KeyCode::Minus) {
        Some(RateCommand::Reverse)
    } else {
        None
    };

    if let Some(command) = command {
        let rate = adjusted_rate(clock.rate, command);
        clock.set_rate(rate);
        info!("Time rate: {}x", clock.rate);
    }
}
