//! UI module providing the egui-based overlay.
//!
//! Panels read the registry and the simulation clock directly. The hover
//! panel asks the registry what lies under the cursor each frame rather than
//! being notified by the animation.

mod feed_prompt;
mod hud;
mod threats;
pub mod tooltip;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::time::SimulationSet;

pub use hud::{clock_status, rate_label, RATE_PRESETS};
pub use tooltip::HoveredObject;

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredObject>()
            .add_systems(Update, tooltip::detect_hover.after(SimulationSet))
            .add_systems(
                EguiPrimaryContextPass,
                (
                    feed_prompt::feed_prompt,
                    hud::hud_panel,
                    hud::alert_banner,
                    threats::threat_panel,
                    tooltip::hover_panel,
                ),
            );
    }
}
