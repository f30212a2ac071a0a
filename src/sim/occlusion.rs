//! Label occlusion: hide labels of objects behind Earth.

use bevy::math::DVec3;

use crate::sim::registry::NeoRegistry;
use crate::types::EARTH_RADIUS;

/// Slack for targets lying on Earth's surface, where the hit and the target
/// coincide up to rounding.
const SURFACE_EPSILON: f64 = 1e-6;

/// Distance along a ray to the first point where it meets a sphere.
///
/// `direction` must be normalized. Returns `None` when the ray misses or the
/// sphere lies entirely behind the origin. From inside the sphere this is the
/// exit point.
pub fn ray_sphere_hit(origin: DVec3, direction: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Whether Earth blocks the line of sight from `camera` to `target`.
///
/// Only a hit nearer than the target by more than [`SURFACE_EPSILON`] counts,
/// so an object sitting on the near surface keeps its label.
pub fn is_occluded_by_earth(camera: DVec3, target: DVec3) -> bool {
    let to_target = target - camera;
    let distance = to_target.length();
    if distance == 0.0 || !distance.is_finite() {
        return false;
    }
    matches!(
        ray_sphere_hit(camera, to_target / distance, DVec3::ZERO, EARTH_RADIUS),
        Some(hit) if hit < distance - SURFACE_EPSILON
    )
}

/// Recompute every label's visibility for this frame.
///
/// Hidden objects never show a label.
pub fn update_label_visibility(registry: &mut NeoRegistry, camera: DVec3) {
    for object in registry.iter_mut() {
        let display = &mut object.display;
        display.label_visible =
            display.visible && !is_occluded_by_earth(camera, display.position);
    }
}
