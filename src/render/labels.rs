//! Asteroid name labels using egui for text rendering.
//!
//! A label is drawn above each object whose `label_visible` flag is set, so
//! labels follow both the visibility toggles and Earth occlusion.

use bevy::math::DVec3;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::camera::MainCamera;
use crate::sim::NeoRegistry;

/// Plugin providing asteroid label rendering.
pub struct LabelPlugin;

impl Plugin for LabelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LabelSettings>()
            .add_systems(EguiPrimaryContextPass, draw_asteroid_labels);
    }
}

/// Settings for label rendering.
#[derive(Resource)]
pub struct LabelSettings {
    /// Whether labels are drawn at all.
    pub visible: bool,
    /// Gap between the top of the object and the label, in scene units.
    pub lift: f64,
    pub font_size: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            visible: true,
            lift: 0.5,
            font_size: 12.0,
        }
    }
}

/// Label text color: light red for hazardous, green for safe.
pub fn label_color(is_hazardous: bool) -> egui::Color32 {
    if is_hazardous {
        egui::Color32::from_rgb(255, 102, 102)
    } else {
        egui::Color32::from_rgb(68, 255, 68)
    }
}

/// Draw labels for all unoccluded, visible objects.
fn draw_asteroid_labels(
    mut egui_ctx: EguiContexts,
    registry: Res<NeoRegistry>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    settings: Res<LabelSettings>,
) {
    if !settings.visible {
        return;
    }
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Ok(ctx) = egui_ctx.ctx_mut() else {
        return;
    };

    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("asteroid_labels"),
    ));
    let font = egui::FontId::proportional(settings.font_size);

    for object in registry.iter().filter(|object| object.display.label_visible) {
        let anchor = object.display.position + DVec3::Y * (object.render_size() + settings.lift);
        let Ok(screen_pos) = camera.world_to_viewport(camera_transform, anchor.as_vec3()) else {
            continue;
        };
        let label_pos = egui::pos2(screen_pos.x, screen_pos.y);
        let text = object.label_text();

        // Shadow
        painter.text(
            label_pos + egui::vec2(1.0, 1.0),
            egui::Align2::CENTER_BOTTOM,
            &text,
            font.clone(),
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 180),
        );

        painter.text(
            label_pos,
            egui::Align2::CENTER_BOTTOM,
            &text,
            font.clone(),
            label_color(object.is_hazardous),
        );
    }
}
