//! Per-frame simulation driver.
//!
//! The simulation core exposes a single `tick`; this plugin calls it once per
//! rendered frame with the real frame delta, and re-applies the visibility
//! filter whenever the toggles change or a new data set is swapped in.

use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::sim::{apply_visibility, tick, FrameInput, NeoRegistry, VisibilityToggles};
use crate::types::SimulationClock;

/// System set containing the clock advance and object updates.
///
/// Rendering and UI systems that read display state run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

/// Plugin providing the simulation clock and per-frame animation.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            .init_resource::<NeoRegistry>()
            .init_resource::<VisibilityToggles>()
            .add_systems(
                Update,
                (sync_visibility, advance_simulation)
                    .chain()
                    .in_set(SimulationSet),
            );
    }
}

/// Re-run the visibility filter when the toggles change or the registry is replaced.
fn sync_visibility(
    toggles: Res<VisibilityToggles>,
    mut registry: ResMut<NeoRegistry>,
    mut applied_generation: Local<Option<u64>>,
) {
    let generation = registry.generation();
    if !toggles.is_changed() && *applied_generation == Some(generation) {
        return;
    }
    let shown = apply_visibility(&mut registry, &toggles);
    *applied_generation = Some(generation);
    debug!("Visibility updated: {} of {} objects shown", shown, registry.len());
}

/// Advance simulated time and recompute every object's display state.
fn advance_simulation(
    time: Res<Time>,
    camera: Query<&GlobalTransform, With<MainCamera>>,
    mut clock: ResMut<SimulationClock>,
    mut registry: ResMut<NeoRegistry>,
) {
    let defaults = FrameInput::default();
    let camera_position = camera
        .single()
        .map(|transform| transform.translation().as_dvec3())
        .unwrap_or(defaults.camera_position);

    let frame = FrameInput {
        real_delta_secs: time.delta_secs_f64(),
        wall_elapsed_secs: time.elapsed_secs_f64(),
        camera_position,
    };
    tick(&mut clock, &mut registry, &frame);
}
