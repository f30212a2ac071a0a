//! NEO Watch - near-Earth object approach visualizer
//!
//! A library crate providing the feed client, trajectory synthesis and
//! simulation clock behind the viewer, for testing and integration purposes.

pub mod camera;
pub mod feed;
pub mod input;
pub mod loader;
pub mod render;
pub mod report;
pub mod sim;
pub mod time;
pub mod types;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
