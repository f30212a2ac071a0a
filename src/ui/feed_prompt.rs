//! API key and date window prompt that starts a feed load.
//!
//! The prompt disappears once a load succeeds. After a failure it stays up
//! with the error so the user can fix the key and retry.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::feed::FetchWindow;
use crate::loader::{FeedLoader, FeedSettings, LoadStatus};

/// Whether the prompt should be shown for `status`.
pub fn prompt_visible(status: &LoadStatus) -> bool {
    !matches!(status, LoadStatus::Loaded { .. })
}

/// One-line status under the load button, if any.
pub fn status_line(status: &LoadStatus) -> Option<String> {
    match status {
        LoadStatus::Idle => None,
        LoadStatus::Loading { .. } => Some(format!(
            "Loading asteroid data... {}%",
            status.percent().unwrap_or(0)
        )),
        LoadStatus::Loaded { tracked, .. } => Some(format!("Tracking {tracked} objects")),
        LoadStatus::Failed(message) => Some(format!("Failed to load asteroid data: {message}")),
    }
}

pub fn feed_prompt(
    mut contexts: EguiContexts,
    mut settings: ResMut<FeedSettings>,
    mut loader: ResMut<FeedLoader>,
    status: Res<LoadStatus>,
) {
    if !prompt_visible(&status) {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let busy = status.is_loading() || loader.is_running() || loader.requested;

    egui::Window::new("NASA NEO Feed")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("API key:");
                ui.add_enabled(
                    !busy,
                    egui::TextEdit::singleline(&mut settings.api_key)
                        .password(true)
                        .hint_text("api.nasa.gov key"),
                );
            });

            ui.add_enabled_ui(!busy, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Window:");
                    for window in FetchWindow::ALL {
                        let selected = settings.window == window;
                        if ui.selectable_label(selected, window.label()).clicked() {
                            settings.window = window;
                        }
                    }
                });
            });

            let can_load = !busy && !settings.api_key.trim().is_empty();
            if ui
                .add_enabled(can_load, egui::Button::new("Load Asteroid Data"))
                .clicked()
            {
                settings.api_key = settings.api_key.trim().to_string();
                loader.requested = true;
            }

            if let Some(line) = status_line(&status) {
                let color = if matches!(*status, LoadStatus::Failed(_)) {
                    egui::Color32::from_rgb(255, 102, 102)
                } else {
                    egui::Color32::LIGHT_GRAY
                };
                ui.label(egui::RichText::new(line).color(color));
            }
        });
}
