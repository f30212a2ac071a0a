//! Earth, Moon and sunlight.
//!
//! Earth sits at the origin with its axial tilt. Its spin, the direction of
//! the sun and the Moon's place on its orbit all follow the simulation clock.

use std::f64::consts::{PI, TAU};

use bevy::prelude::*;

use crate::types::{
    day_of_month, seconds_of_day, SimulationClock, EARTH_RADIUS, EARTH_TILT, MOON_ORBIT_DISTANCE,
    MOON_RADIUS,
};

/// Distance of the directional light from the origin.
const SUN_DISTANCE: f32 = 150.0;

/// Length of the lunar cycle used for the Moon's orbital angle, in days.
const LUNAR_CYCLE_DAYS: f64 = 30.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Tilted parent of the Earth sphere and the Moon's orbit.
#[derive(Component)]
pub struct EarthSystem;

/// The Earth sphere, spun about its own Y axis.
#[derive(Component)]
pub struct EarthSurface;

/// Pivot carrying the Moon around Earth.
#[derive(Component)]
pub struct MoonOrbit;

/// The directional light standing in for the Sun.
#[derive(Component)]
pub struct SunLight;

/// Plugin spawning and animating the Earth system.
pub struct EarthSystemPlugin;

impl Plugin for EarthSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_earth_system)
            .add_systems(Update, animate_earth_system);
    }
}

/// Earth's rotation angle: one full turn per UTC day.
pub fn earth_rotation_angle(sim_ms: f64) -> f64 {
    seconds_of_day(sim_ms) / SECONDS_PER_DAY * TAU
}

/// Sun direction angle in the XZ plane, half a turn behind Earth's spin.
pub fn sun_angle(sim_ms: f64) -> f64 {
    earth_rotation_angle(sim_ms) - PI
}

/// Position of the sunlight for `sim_ms`.
pub fn sun_position(sim_ms: f64) -> Vec3 {
    let angle = sun_angle(sim_ms) as f32;
    Vec3::new(angle.cos() * SUN_DISTANCE, 0.0, angle.sin() * SUN_DISTANCE)
}

/// The Moon's angle on its orbit, from the day of the month.
pub fn moon_orbit_angle(sim_ms: f64) -> f64 {
    f64::from(day_of_month(sim_ms)) / LUNAR_CYCLE_DAYS * TAU
}

/// Spawn Earth, the Moon and the sun light.
fn spawn_earth_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    clock: Res<SimulationClock>,
) {
    let earth_mesh = meshes.add(Sphere::new(EARTH_RADIUS as f32));
    let earth_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.5, 0.8),
        perceptual_roughness: 0.8,
        ..default()
    });
    let moon_mesh = meshes.add(Sphere::new(MOON_RADIUS as f32));
    let moon_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.7, 0.7, 0.7),
        perceptual_roughness: 0.9,
        ..default()
    });

    let sim_ms = clock.simulated_ms;
    commands
        .spawn((
            EarthSystem,
            Transform::from_rotation(Quat::from_rotation_z(EARTH_TILT as f32)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                EarthSurface,
                Mesh3d(earth_mesh),
                MeshMaterial3d(earth_material),
                Transform::from_rotation(Quat::from_rotation_y(earth_rotation_angle(sim_ms) as f32)),
            ));
            parent
                .spawn((
                    MoonOrbit,
                    Transform::from_rotation(Quat::from_rotation_y(moon_orbit_angle(sim_ms) as f32)),
                    Visibility::default(),
                ))
                .with_children(|orbit| {
                    orbit.spawn((
                        Mesh3d(moon_mesh),
                        MeshMaterial3d(moon_material),
                        Transform::from_xyz(MOON_ORBIT_DISTANCE as f32, 0.0, 0.0),
                    ));
                });
        });

    commands.spawn((
        SunLight,
        DirectionalLight {
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(sun_position(sim_ms)).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("Spawned Earth system");
}

/// Spin Earth, move the Moon and swing the sunlight with the simulation clock.
fn animate_earth_system(
    clock: Res<SimulationClock>,
    mut earth: Query<&mut Transform, (With<EarthSurface>, Without<MoonOrbit>, Without<SunLight>)>,
    mut moon: Query<&mut Transform, (With<MoonOrbit>, Without<EarthSurface>, Without<SunLight>)>,
    mut sun: Query<&mut Transform, (With<SunLight>, Without<EarthSurface>, Without<MoonOrbit>)>,
) {
    if !clock.is_changed() {
        return;
    }
    let sim_ms = clock.simulated_ms;

    if let Ok(mut transform) = earth.single_mut() {
        transform.rotation = Quat::from_rotation_y(earth_rotation_angle(sim_ms) as f32);
    }
    if let Ok(mut transform) = moon.single_mut() {
        transform.rotation = Quat::from_rotation_y(moon_orbit_angle(sim_ms) as f32);
    }
    if let Ok(mut transform) = sun.single_mut() {
        *transform = Transform::from_translation(sun_position(sim_ms)).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
