//! Asteroid meshes and approach paths.
//!
//! Visuals hold the object id, not the object. They are rebuilt whenever the
//! registry is replaced and synced from the display state every frame.

use bevy::prelude::*;

use crate::sim::{NeoRegistry, TrackedObject};
use crate::time::SimulationSet;

/// Links a rendered mesh back to its tracked object.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct AsteroidVisual {
    pub id: String,
}

/// Plugin spawning asteroid meshes and drawing their paths.
pub struct AsteroidRenderPlugin;

impl Plugin for AsteroidRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (rebuild_asteroid_visuals, sync_asteroid_visuals, draw_asteroid_paths)
                .chain()
                .after(SimulationSet),
        );
    }
}

/// Body color: red for hazardous, green for safe.
pub fn body_color(is_hazardous: bool) -> Color {
    if is_hazardous {
        Color::srgb_u8(255, 51, 51)
    } else {
        Color::srgb_u8(68, 255, 68)
    }
}

/// Translucent path color.
pub fn path_color(is_hazardous: bool) -> Color {
    if is_hazardous {
        Color::srgba_u8(255, 102, 102, 102)
    } else {
        Color::srgba_u8(255, 170, 0, 102)
    }
}

fn emissive_for(object: &TrackedObject) -> LinearRgba {
    body_color(object.is_hazardous).to_linear() * object.display.glow_intensity as f32
}

/// Transform for an object's current display state.
pub fn asteroid_transform(object: &TrackedObject) -> Transform {
    let display = &object.display;
    Transform::from_translation(display.position.as_vec3()).with_rotation(Quat::from_euler(
        EulerRot::XYZ,
        display.spin.x as f32,
        display.spin.y as f32,
        0.0,
    ))
}

/// Despawn and respawn all visuals after the registry is replaced.
fn rebuild_asteroid_visuals(
    mut commands: Commands,
    registry: Res<NeoRegistry>,
    existing: Query<Entity, With<AsteroidVisual>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut built_generation: Local<Option<u64>>,
) {
    let generation = registry.generation();
    if *built_generation == Some(generation) {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    for object in registry.iter() {
        let mesh = meshes.add(Sphere::new(object.render_size() as f32));
        let material = materials.add(StandardMaterial {
            base_color: body_color(object.is_hazardous),
            emissive: emissive_for(object),
            perceptual_roughness: 0.9,
            metallic: 0.1,
            ..default()
        });

        commands.spawn((
            AsteroidVisual {
                id: object.id.clone(),
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            asteroid_transform(object),
            if object.display.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
        ));
    }

    *built_generation = Some(generation);
    info!("Spawned {} asteroid visuals", registry.len());
}

/// Copy position, spin, visibility and glow onto each visual.
fn sync_asteroid_visuals(
    registry: Res<NeoRegistry>,
    mut visuals: Query<(
        &AsteroidVisual,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (visual, mut transform, mut visibility, material) in &mut visuals {
        let Some(object) = registry.get(&visual.id) else {
            continue;
        };

        *transform = asteroid_transform(object);
        *visibility = if object.display.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };

        // get_mut marks the material modified.
        let emissive = emissive_for(object);
        let stale = materials
            .get(&material.0)
            .is_some_and(|current| current.emissive != emissive);
        if stale {
            if let Some(mut current) = materials.get_mut(&material.0) {
                current.emissive = emissive;
            }
        }
    }
}

/// Objects whose path is drawn this frame.
pub fn visible_paths(registry: &NeoRegistry) -> impl Iterator<Item = &TrackedObject> {
    registry.iter().filter(|object| object.display.visible)
}

/// Draw each visible object's path as a polyline.
fn draw_asteroid_paths(mut gizmos: Gizmos, registry: Res<NeoRegistry>) {
    for object in visible_paths(&registry) {
        let points = object
            .curve
            .sample(object.path_segments())
            .into_iter()
            .map(|point| point.as_vec3());
        gizmos.linestrip(points, path_color(object.is_hazardous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{apply_visibility, VisibilityToggles};
    use crate::test_utils::fixtures;
    use bevy::math::{DVec2, DVec3};

    #[test]
    fn test_transform_follows_display_state() {
        let mut object = fixtures::tracked("a", false, 1.0e6);
        object.display.position = DVec3::new(1.0, 2.0, 3.0);
        object.display.spin = DVec2::new(0.5, 0.35);

        let transform = asteroid_transform(&object);
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        let (x, y, _) = transform.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.5).abs() < 1e-5);
        assert!((y - 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_emissive_scales_with_glow() {
        let mut object = fixtures::tracked("a", true, 1.0e6);
        object.display.glow_intensity = 0.0;
        assert_eq!(emissive_for(&object).red, 0.0);
        object.display.glow_intensity = 1.0;
        assert_eq!(emissive_for(&object), body_color(true).to_linear());
    }

    #[test]
    fn test_paths_drawn_only_for_shown_class() {
        let mut registry = NeoRegistry::from_objects([
            fixtures::tracked("safe", false, 1.0e6),
            fixtures::tracked("risky", true, 1.0e6),
            fixtures::tracked("risky-too", true, 2.0e6),
        ]);
        let toggles = VisibilityToggles {
            master: true,
            safe: false,
            hazardous: true,
        };
        apply_visibility(&mut registry, &toggles);

        let mut ids: Vec<&str> = visible_paths(&registry).map(|o| o.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["risky", "risky-too"]);

        apply_visibility(&mut registry, &VisibilityToggles::default());
        assert_eq!(visible_paths(&registry).count(), 0);
    }
}
