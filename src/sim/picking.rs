//! Pull-style hover query: which tracked object lies under a ray at a given time.

use bevy::math::DVec3;

use crate::sim::animator::position_at;
use crate::sim::occlusion::ray_sphere_hit;
use crate::sim::registry::{NeoRegistry, TrackedObject};

/// Smallest pick radius in scene units, so tiny objects stay hoverable.
pub const MIN_PICK_RADIUS: f64 = 0.5;

/// Nearest object hit by a pick ray.
#[derive(Clone, Copy, Debug)]
pub struct PickHit<'a> {
    pub object: &'a TrackedObject,
    /// Distance from the ray origin.
    pub distance: f64,
}

/// Find the visible object nearest to `origin` along `direction` at `sim_ms`.
///
/// Positions are evaluated at `sim_ms` rather than read from the last tick,
/// so the answer is a pure function of its inputs.
pub fn pick(
    registry: &NeoRegistry,
    origin: DVec3,
    direction: DVec3,
    sim_ms: f64,
) -> Option<PickHit<'_>> {
    let direction = direction.try_normalize()?;

    registry
        .iter()
        .filter(|object| object.display.visible)
        .filter_map(|object| {
            let center = position_at(object, sim_ms);
            let radius = object.render_size().max(MIN_PICK_RADIUS);
            ray_sphere_hit(origin, direction, center, radius)
                .map(|distance| PickHit { object, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
