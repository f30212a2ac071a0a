//! Per-frame animation of tracked objects against the simulation clock.
//!
//! Every object traverses its whole curve over twice the interval between its
//! creation and its close approach, so that closest approach (progress 0.5)
//! lands exactly on the real approach time. Outside that window the object
//! parks at the nearer end of its path.

use bevy::math::{DVec2, DVec3};

use crate::sim::occlusion::update_label_visibility;
use crate::sim::registry::{NeoRegistry, TrackedObject, SAFE_BASE_GLOW};
use crate::types::{SimulationClock, KM_SCALE};

/// Progress at closest approach; also the fallback for degenerate timing.
pub const CLOSEST_APPROACH_PROGRESS: f64 = 0.5;

/// Scene distance beyond which a hazardous object gets no proximity boost.
pub const GLOW_FALLOFF_DISTANCE: f64 = 200.0;

/// Hazardous objects closer than this (km) flash a warning pulse.
pub const WARNING_DISTANCE_KM: f64 = 100_000.0;

/// Hazardous glow with no proximity boost.
const GLOW_FLOOR: f64 = 0.5;

/// Extra glow at zero distance.
const GLOW_PROXIMITY_GAIN: f64 = 0.5;

const PULSE_FREQUENCY: f64 = 5.0;
const PULSE_AMPLITUDE: f64 = 0.3;
const PULSE_BASELINE: f64 = 0.7;

/// Spin rate per km/s of relative velocity (rad/s).
const SPIN_FACTOR: f64 = 0.01;

/// Y-axis spin relative to X-axis spin.
const SPIN_Y_RATIO: f64 = 0.7;

/// The traversal window has zero (or non-finite) length.
///
/// Never shown to the user: the animator parks such objects at closest approach.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("approach time coincides with creation time; traversal window is empty")]
pub struct DegenerateTiming;

/// Inputs for one rendered frame, supplied by the host loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Real seconds since the previous tick.
    pub real_delta_secs: f64,
    /// Real seconds since the application started. Drives the warning pulse.
    pub wall_elapsed_secs: f64,
    /// Camera position in scene coordinates, for label occlusion.
    pub camera_position: DVec3,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            real_delta_secs: 0.0,
            wall_elapsed_secs: 0.0,
            camera_position: DVec3::new(30.0, 15.0, 30.0),
        }
    }
}

/// Curve parameter for simulated time `sim_ms`, clamped to [0, 1].
pub fn progress_at(start_ms: f64, approach_ms: f64, sim_ms: f64) -> Result<f64, DegenerateTiming> {
    let total_period = (approach_ms - start_ms).abs() * 2.0;
    if total_period == 0.0 || !total_period.is_finite() {
        return Err(DegenerateTiming);
    }
    let raw = CLOSEST_APPROACH_PROGRESS - (approach_ms - sim_ms) / total_period;
    if raw.is_nan() {
        return Err(DegenerateTiming);
    }
    Ok(raw.clamp(0.0, 1.0))
}

/// Progress of an object, with degenerate timing parked at closest approach.
pub fn object_progress(object: &TrackedObject, sim_ms: f64) -> f64 {
    progress_at(object.start_ms, object.approach_ms, sim_ms).unwrap_or(CLOSEST_APPROACH_PROGRESS)
}

/// Scene position of an object at simulated time `sim_ms`.
pub fn position_at(object: &TrackedObject, sim_ms: f64) -> DVec3 {
    object.curve.point_at(object_progress(object, sim_ms))
}

/// Emissive intensity and whether the warning pulse is active.
///
/// The pulse follows real elapsed time, not simulated time, so it keeps
/// flashing while the simulation is paused.
pub fn glow_intensity(
    is_hazardous: bool,
    position: DVec3,
    distance_km: f64,
    wall_elapsed_secs: f64,
) -> (f64, bool) {
    if !is_hazardous {
        return (SAFE_BASE_GLOW, false);
    }
    if distance_km < WARNING_DISTANCE_KM {
        let pulse = (wall_elapsed_secs * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE + PULSE_BASELINE;
        return (pulse, true);
    }
    let proximity = 1.0 - (position.length() / GLOW_FALLOFF_DISTANCE).min(1.0);
    (GLOW_FLOOR + proximity * GLOW_PROXIMITY_GAIN, false)
}

/// Recompute the display state of one object.
///
/// `spin_delta_secs` is the real time the spin advances by; the caller passes
/// zero while the clock is paused.
pub fn update_object(
    object: &mut TrackedObject,
    sim_ms: f64,
    spin_delta_secs: f64,
    wall_elapsed_secs: f64,
) {
    let progress = object_progress(object, sim_ms);
    let position = object.curve.point_at(progress);
    let distance_km = position.length() / KM_SCALE;
    let (glow, pulsing) =
        glow_intensity(object.is_hazardous, position, distance_km, wall_elapsed_secs);

    let speed = object.velocity_km_per_second() * SPIN_FACTOR;
    let spin = object.display.spin + DVec2::new(speed, speed * SPIN_Y_RATIO) * spin_delta_secs;

    let display = &mut object.display;
    display.progress = progress;
    display.position = position;
    display.current_distance_km = distance_km;
    display.glow_intensity = glow;
    display.pulsing = pulsing;
    display.spin = spin;
}

/// Advance the clock and bring every object up to date.
///
/// This is the whole per-frame core: it never schedules itself and never
/// calls into UI code.
pub fn tick(clock: &mut SimulationClock, registry: &mut NeoRegistry, frame: &FrameInput) {
    clock.advance(frame.real_delta_secs);

    let spin_delta = if clock.is_paused() || !frame.real_delta_secs.is_finite() {
        0.0
    } else {
        frame.real_delta_secs.max(0.0)
    };

    for object in registry.iter_mut() {
        update_object(object, clock.simulated_ms, spin_delta, frame.wall_elapsed_secs);
    }

    update_label_visibility(registry, frame.camera_position);
}
