//! Tracked objects and the id-keyed arena that owns them.
//!
//! The registry is the single owner of simulation state. Render entities hold
//! only the object id and look their state up here every frame.

use std::collections::HashMap;

use bevy::log::{debug, warn};
use bevy::math::{DVec2, DVec3};
use bevy::prelude::Resource;
use rand::Rng;

use crate::feed::NeoRecord;
use crate::sim::trajectory::{synthesize, QuadraticBezier, ValidationError};

/// Emissive intensity of a hazardous object before any proximity boost.
pub const HAZARDOUS_BASE_GLOW: f64 = 0.8;

/// Emissive intensity of a safe object. Never changes.
pub const SAFE_BASE_GLOW: f64 = 0.5;

/// Render size bounds in scene units.
pub const MIN_RENDER_SIZE: f64 = 0.05;
pub const MAX_RENDER_SIZE: f64 = 0.5;

/// Per-frame state recomputed by the animator. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    /// Curve parameter in [0, 1]; 0.5 is closest approach.
    pub progress: f64,
    /// Scene position on the curve.
    pub position: DVec3,
    pub current_distance_km: f64,
    /// Set by the visibility filter.
    pub visible: bool,
    /// Cleared when Earth occludes the object from the camera.
    pub label_visible: bool,
    pub glow_intensity: f64,
    /// Whether `glow_intensity` currently holds the proximity warning pulse.
    pub pulsing: bool,
    /// Accumulated self-rotation (x, y) in radians.
    pub spin: DVec2,
}

impl DisplayState {
    pub fn initial(is_hazardous: bool) -> Self {
        Self {
            progress: 0.0,
            position: DVec3::ZERO,
            current_distance_km: 0.0,
            visible: false,
            label_visible: false,
            glow_intensity: if is_hazardous {
                HAZARDOUS_BASE_GLOW
            } else {
                SAFE_BASE_GLOW
            },
            pulsing: false,
            spin: DVec2::ZERO,
        }
    }
}

/// One near-Earth object with its synthesized path.
///
/// Everything except `display` is fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    pub is_hazardous: bool,
    pub diameter_meters: f64,
    pub mass_kg: f64,
    pub miss_distance_km: f64,
    pub velocity_km_per_hour: f64,
    /// Close approach, Unix milliseconds.
    pub approach_ms: f64,
    /// Close approach as shown to the user.
    pub approach_label: String,
    /// Closest-approach radius used to build the curve.
    pub orbit_radius: f64,
    pub curve: QuadraticBezier,
    /// Display only; motion uses the curve parameter.
    pub curve_length: f64,
    /// Wall-clock creation time, Unix milliseconds.
    pub start_ms: f64,
    pub display: DisplayState,
}

impl TrackedObject {
    pub fn velocity_km_per_second(&self) -> f64 {
        self.velocity_km_per_hour / 3600.0
    }

    /// Mesh radius in scene units, derived from the diameter.
    pub fn render_size(&self) -> f64 {
        (self.diameter_meters / 600.0).clamp(MIN_RENDER_SIZE, MAX_RENDER_SIZE)
    }

    /// Name without the designation parentheses, e.g. "2020 RQ4".
    pub fn label_text(&self) -> String {
        self.name.replace(['(', ')'], "")
    }

    /// Number of line segments used to draw the path.
    pub fn path_segments(&self) -> usize {
        if self.is_hazardous { 100 } else { 50 }
    }
}

/// Arena of tracked objects keyed by id, in feed order.
#[derive(Resource, Debug, Default)]
pub struct NeoRegistry {
    objects: Vec<TrackedObject>,
    index: HashMap<String, usize>,
    generation: u64,
}

impl NeoRegistry {
    /// Build from objects, keeping the first object for each id.
    pub fn from_objects(objects: impl IntoIterator<Item = TrackedObject>) -> Self {
        let mut registry = Self::default();
        for object in objects {
            if registry.index.contains_key(&object.id) {
                continue;
            }
            registry.index.insert(object.id.clone(), registry.objects.len());
            registry.objects.push(object);
        }
        registry
    }

    /// Replace the whole collection at once. Bumps the generation so
    /// render collaborators know to rebuild.
    pub fn replace(&mut self, next: NeoRegistry) {
        let generation = self.generation + 1;
        *self = next;
        self.generation = generation;
    }

    /// Incremented on every [`replace`](Self::replace).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: &str) -> Option<&TrackedObject> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TrackedObject> {
        let i = *self.index.get(id)?;
        self.objects.get_mut(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Outcome of turning a batch of records into a registry.
#[derive(Debug)]
pub struct BuildReport {
    pub registry: NeoRegistry,
    /// Records that failed validation and were left out.
    pub skipped: Vec<ValidationError>,
}

/// Synthesize every record, skipping the malformed ones.
///
/// One bad record never aborts the batch.
pub fn build_registry<R: Rng + ?Sized>(
    records: &[NeoRecord],
    now_ms: f64,
    rng: &mut R,
) -> BuildReport {
    let mut objects = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        match synthesize(record, now_ms, rng) {
            Ok(object) => {
                if object.approach_ms == object.start_ms {
                    debug!("{}: approach coincides with load time", object.id);
                }
                objects.push(object);
            }
            Err(err) => {
                warn!("Skipping record: {err}");
                skipped.push(err);
            }
        }
    }

    BuildReport {
        registry: NeoRegistry::from_objects(objects),
        skipped,
    }
}
