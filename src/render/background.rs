//! Starfield backdrop.

use bevy::prelude::*;
use rand::Rng;

use crate::sim::trajectory::random_unit_vector;

/// Number of background stars.
pub const STAR_COUNT: usize = 1000;

/// Stars sit on a shell between these radii, well outside the camera's reach.
const STAR_SHELL_INNER: f32 = 6000.0;
const STAR_SHELL_OUTER: f32 = 9000.0;

/// Plugin providing the starfield.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_starfield);
    }
}

/// Random star position on the background shell.
pub fn star_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let direction = random_unit_vector(rng).as_vec3();
    direction * rng.gen_range(STAR_SHELL_INNER..STAR_SHELL_OUTER)
}

/// Spawn a starfield background with randomly placed stars.
fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::WHITE * 0.5,
        unlit: true,
        ..default()
    });
    let star_mesh = meshes.add(Sphere::new(4.0));

    let mut rng = rand::thread_rng();
    for _ in 0..STAR_COUNT {
        let scale = rng.gen_range(0.5..1.5);
        commands.spawn((
            Mesh3d(star_mesh.clone()),
            MeshMaterial3d(star_material.clone()),
            Transform::from_translation(star_position(&mut rng)).with_scale(Vec3::splat(scale)),
        ));
    }

    info!("Spawned {} background stars", STAR_COUNT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stars_stay_on_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let distance = star_position(&mut rng).length();
            assert!(distance >= STAR_SHELL_INNER - 0.01);
            assert!(distance <= STAR_SHELL_OUTER + 0.01);
        }
    }
}
