//! Heads-up display: fleet counts, clocks, rate controls and visibility toggles.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::report::FleetSummary;
use crate::sim::{NeoRegistry, VisibilityClass, VisibilityToggles};
use crate::types::{
    format_date, format_time_of_day, unix_millis_now, ClockState, SimulationClock,
};

/// Rate buttons offered in the HUD, slowest reverse first. Zero pauses.
pub const RATE_PRESETS: [f64; 7] = [-10.0, -1.0, 0.0, 1.0, 10.0, 100.0, 1000.0];

/// Button text for a rate preset.
pub fn rate_label(rate: f64) -> String {
    if rate == 0.0 {
        "\u{23F8}".to_string()
    } else {
        format!("{}x", rate as i64)
    }
}

/// "ACTIVE" with the rate, or "PAUSED".
pub fn clock_status(clock: &SimulationClock) -> String {
    match clock.state() {
        ClockState::Running(rate) => format!("ACTIVE ({rate}x)"),
        ClockState::Paused => "PAUSED".to_string(),
    }
}

pub fn class_label(class: VisibilityClass) -> &'static str {
    match class {
        VisibilityClass::All => "All Objects",
        VisibilityClass::Safe => "Safe",
        VisibilityClass::Hazardous => "Hazardous",
    }
}

/// Stats and controls panel in the top-left corner.
pub fn hud_panel(
    mut contexts: EguiContexts,
    registry: Res<NeoRegistry>,
    mut clock: ResMut<SimulationClock>,
    mut toggles: ResMut<VisibilityToggles>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let summary = FleetSummary::from_registry(&registry);

    egui::Window::new("Near-Earth Objects")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("fleet_stats").num_columns(2).show(ui, |ui| {
                ui.label("Tracked Objects:");
                ui.label(summary.tracked.to_string());
                ui.end_row();
                ui.label("Potentially Hazardous:");
                ui.label(
                    egui::RichText::new(summary.hazardous.to_string())
                        .color(egui::Color32::from_rgb(255, 102, 102)),
                );
                ui.end_row();
                ui.label("Safe Passage:");
                ui.label(
                    egui::RichText::new(summary.safe.to_string())
                        .color(egui::Color32::from_rgb(68, 255, 68)),
                );
                ui.end_row();
                ui.label("System Time:");
                ui.label(egui::RichText::new(format_time_of_day(unix_millis_now())).monospace());
                ui.end_row();
                ui.label("Simulation Date:");
                ui.label(egui::RichText::new(format_date(clock.simulated_ms)).monospace());
                ui.end_row();
                ui.label("Simulation:");
                ui.label(clock_status(&clock));
                ui.end_row();
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Speed:");
                for rate in RATE_PRESETS {
                    let selected = clock.rate == rate;
                    let hover = if rate == 0.0 {
                        "Pause (Space)".to_string()
                    } else {
                        format!("Set time rate to {rate}x")
                    };
                    if ui
                        .selectable_label(selected, rate_label(rate))
                        .on_hover_text(hover)
                        .clicked()
                    {
                        clock.set_rate(rate);
                        info!("Time rate: {}x", rate);
                    }
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Show:");
                for class in [
                    VisibilityClass::All,
                    VisibilityClass::Safe,
                    VisibilityClass::Hazardous,
                ] {
                    if ui
                        .selectable_label(toggles.get(class), class_label(class))
                        .clicked()
                    {
                        toggles.toggle(class);
                    }
                }
            });
        });
}

/// Warning banner across the top while hazardous objects are tracked.
pub fn alert_banner(mut contexts: EguiContexts, registry: Res<NeoRegistry>) {
    if !FleetSummary::from_registry(&registry).has_threats() {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Area::new(egui::Id::new("threat_alert"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 10.0])
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(120, 0, 0, 200))
                .inner_margin(egui::Margin::symmetric(16, 6))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("\u{26A0} POTENTIALLY HAZARDOUS OBJECTS DETECTED")
                            .color(egui::Color32::WHITE)
                            .strong(),
                    );
                });
        });
}
