//! Rendering systems for the near-Earth object view.
//!
//! This module provides the starfield, the Earth system, asteroid meshes with their
//! approach paths, and screen-space name labels.

pub mod asteroids;
mod background;
pub mod bodies;
pub mod labels;

use bevy::prelude::*;

use self::asteroids::AsteroidRenderPlugin;
use self::background::BackgroundPlugin;
use self::bodies::EarthSystemPlugin;
use self::labels::LabelPlugin;

pub use self::asteroids::AsteroidVisual;
pub use self::labels::LabelSettings;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_plugins((
                BackgroundPlugin,
                EarthSystemPlugin,
                AsteroidRenderPlugin,
                LabelPlugin,
            ));
    }
}
