//! Threat list panel on the right edge.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::report::threat_list;
use crate::sim::NeoRegistry;

pub const NO_THREATS_TEXT: &str = "No immediate threats detected";

pub fn threat_panel(mut contexts: EguiContexts, registry: Res<NeoRegistry>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let threats = threat_list(&registry);

    egui::Window::new("Threat Assessment")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .default_width(280.0)
        .resizable(false)
        .show(ctx, |ui| {
            if threats.is_empty() {
                ui.label(egui::RichText::new(NO_THREATS_TEXT).color(egui::Color32::from_rgb(68, 255, 68)));
                return;
            }

            egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                for threat in &threats {
                    ui.label(
                        egui::RichText::new(&threat.name)
                            .strong()
                            .color(egui::Color32::from_rgb(255, 102, 102)),
                    );
                    ui.label(format!("Closest Approach: {}", threat.closest_approach));
                    ui.label(format!("Diameter: {}", threat.diameter));
                    ui.label(format!("Velocity: {}", threat.velocity));
                    ui.label(format!("Miss Distance: {}", threat.miss_distance));
                    ui.separator();
                }
            });
        });
}
