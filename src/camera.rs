//! Orbit camera around Earth.
//!
//! Left-drag rotates, the scroll wheel zooms. The camera always looks at the
//! origin, where Earth sits.

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};
use bevy_egui::EguiContexts;

/// Where the camera starts and where a reset puts it.
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(30.0, 15.0, 30.0);

/// Closest allowed distance from the origin.
pub const MIN_DISTANCE: f32 = 15.0;

/// Farthest allowed distance from the origin.
pub const MAX_DISTANCE: f32 = 5000.0;

/// Zoom speed multiplier for scroll wheel.
pub const ZOOM_SPEED: f32 = 0.1;

/// Radians of rotation per pixel of drag.
pub const ROTATE_SPEED: f32 = 0.005;

/// Pitch stays short of the poles so `looking_at` keeps a stable up vector.
const MAX_PITCH: f32 = 1.5;

/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW_DEGREES: f32 = 75.0;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Spherical camera coordinates around the origin.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Angle around the Y axis, measured from +Z towards +X.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    pub radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(DEFAULT_CAMERA_POSITION)
    }
}

impl OrbitCamera {
    pub fn from_position(position: Vec3) -> Self {
        let radius = position.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let pitch = if position.length() > 0.0 {
            (position.y / position.length()).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        Self {
            yaw: position.x.atan2(position.z),
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            radius,
        }
    }

    pub fn position(&self) -> Vec3 {
        let horizontal = self.radius * self.pitch.cos();
        Vec3::new(
            horizontal * self.yaw.sin(),
            self.radius * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        )
    }

    /// Rotate by a mouse drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ROTATE_SPEED;
        self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Logarithmic zoom: positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        let zoom_factor = 1.0 - scroll * ZOOM_SPEED;
        self.radius = (self.radius * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (camera_controls, apply_orbit_camera).chain());
    }
}

/// Spawn the main camera with a perspective projection.
fn setup_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            near: 0.1,
            far: 20_000.0,
            ..default()
        }),
        Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));
}

/// Left drag rotates, scroll zooms. Ignored while the pointer is over a panel.
fn camera_controls(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut contexts: EguiContexts,
    mut orbit: ResMut<OrbitCamera>,
) {
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area() || ctx.wants_pointer_input())
        .unwrap_or(false);
    if over_ui {
        return;
    }

    if mouse_buttons.pressed(MouseButton::Left) && mouse_motion.delta != Vec2::ZERO {
        orbit.rotate(mouse_motion.delta);
    }

    if mouse_scroll.delta.y != 0.0 {
        orbit.zoom(mouse_scroll.delta.y);
    }
}

fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    *transform = Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_position_matches_reset_point() {
        let position = OrbitCamera::default().position();
        assert_relative_eq!(position.x, 30.0, epsilon = 1e-3);
        assert_relative_eq!(position.y, 15.0, epsilon = 1e-3);
        assert_relative_eq!(position.z, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut orbit = OrbitCamera::default();
        for _ in 0..200 {
            orbit.zoom(5.0);
        }
        assert_eq!(orbit.radius, MIN_DISTANCE);

        for _ in 0..500 {
            orbit.zoom(-5.0);
        }
        assert_eq!(orbit.radius, MAX_DISTANCE);
    }

    #[test]
    fn test_rotate_keeps_radius_and_limits_pitch() {
        let mut orbit = OrbitCamera::default();
        let radius = orbit.radius;
        orbit.rotate(Vec2::new(120.0, 10_000.0));
        assert_eq!(orbit.pitch, MAX_PITCH);
        assert_relative_eq!(orbit.position().length(), radius, epsilon = 1e-3);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(300.0, -40.0));
        orbit.zoom(3.0);
        orbit.reset();
        assert_eq!(orbit, OrbitCamera::default());
    }
}
