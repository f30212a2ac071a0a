//! NEO Watch - near-Earth object approach visualizer
//!
//! A desktop application showing upcoming asteroid close approaches from the
//! NASA NeoWs feed as animated paths around Earth.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clap::Parser;

use neowatch::camera::CameraPlugin;
use neowatch::feed::FetchWindow;
use neowatch::input::InputPlugin;
use neowatch::loader::{FeedLoader, FeedSettings, LoaderPlugin};
use neowatch::render::RenderPlugin;
use neowatch::time::SimulationPlugin;
use neowatch::types::SimulationClock;
use neowatch::ui::UiPlugin;

/// Real-time 3D view of near-Earth asteroid close approaches.
#[derive(Parser, Debug)]
#[command(author, version, about = "Near-Earth object approach visualizer")]
struct Cli {
    /// NASA API key (https://api.nasa.gov)
    #[arg(long, env = "NASA_API_KEY", default_value = "")]
    api_key: String,

    /// Days of close approaches to fetch, starting today (1, 3, 7, 14 or 30)
    #[arg(long, default_value = "7", value_parser = parse_window)]
    days: FetchWindow,

    /// Start loading immediately when an API key is available
    #[arg(long, default_value_t = false)]
    autoload: bool,
}

fn parse_window(value: &str) -> Result<FetchWindow, String> {
    let days: u32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of days"))?;
    FetchWindow::from_days(days).ok_or_else(|| format!("unsupported window of {days} days"))
}

fn main() {
    let cli = Cli::parse();
    let api_key = cli.api_key.trim().to_string();
    let loader = if cli.autoload && !api_key.is_empty() {
        FeedLoader::requesting()
    } else {
        FeedLoader::default()
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "NEO Watch".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        // Insert resources before plugins that depend on them
        .insert_resource(SimulationClock::default())
        .insert_resource(FeedSettings {
            api_key,
            window: cli.days,
        })
        .insert_resource(loader)
        .add_plugins((
            CameraPlugin,
            SimulationPlugin,
            LoaderPlugin,
            InputPlugin,
            RenderPlugin,
            UiPlugin,
        ))
        .run();
}
