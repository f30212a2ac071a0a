//! Hover detection and the object detail panel.
//!
//! Each frame the cursor is turned into a pick ray and the registry is asked
//! which object lies under it at the current simulated time.

use bevy::math::DVec3;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};

use crate::camera::MainCamera;
use crate::report::ObjectDetails;
use crate::sim::{pick, NeoRegistry};
use crate::types::SimulationClock;

/// Offset of the panel from the cursor, in logical pixels.
const PANEL_OFFSET: f32 = 16.0;

/// Object currently under the cursor.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct HoveredObject {
    pub id: Option<String>,
    /// Cursor position in logical window pixels.
    pub cursor: Vec2,
}

/// Id of the object hit by the ray at `sim_ms`, if any.
pub fn hovered_id(registry: &NeoRegistry, origin: DVec3, direction: DVec3, sim_ms: f64) -> Option<String> {
    pick(registry, origin, direction, sim_ms).map(|hit| hit.object.id.clone())
}

/// Pick the object under the cursor.
pub fn detect_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    registry: Res<NeoRegistry>,
    clock: Res<SimulationClock>,
    mut hovered: ResMut<HoveredObject>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        hovered.id = None;
        return;
    };
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        hovered.id = None;
        return;
    };

    hovered.id = hovered_id(
        &registry,
        ray.origin.as_dvec3(),
        ray.direction.as_dvec3(),
        clock.simulated_ms,
    );
    hovered.cursor = cursor;
}

/// Detail panel next to the cursor for the hovered object.
pub fn hover_panel(
    mut contexts: EguiContexts,
    hovered: Res<HoveredObject>,
    registry: Res<NeoRegistry>,
    clock: Res<SimulationClock>,
) {
    let Some(object) = hovered.id.as_deref().and_then(|id| registry.get(id)) else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let details = ObjectDetails::new(object, clock.simulated_ms);
    let title_color = if details.is_hazardous {
        egui::Color32::from_rgb(255, 102, 102)
    } else {
        egui::Color32::from_rgb(68, 255, 68)
    };
    let pos = egui::pos2(hovered.cursor.x + PANEL_OFFSET, hovered.cursor.y + PANEL_OFFSET);

    egui::Area::new(egui::Id::new("object_details"))
        .fixed_pos(pos)
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(&details.name).strong().color(title_color));
                ui.separator();
                egui::Grid::new("object_detail_rows").num_columns(2).show(ui, |ui| {
                    for (label, value) in &details.rows {
                        ui.label(*label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
            });
        });
}
