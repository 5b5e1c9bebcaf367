//! Shared test world: infinite planes (optionally cut off past an x edge)
//! and a backend that steps characters against them.

#![allow(dead_code)]

use bevy::prelude::*;
use swept_character_controller::prelude::*;
use swept_character_controller::systems::{step_characters, ActiveCamera, CharacterQuery};

/// Solid half-space behind a plane.
#[derive(Debug, Clone, Copy)]
pub struct HalfSpace {
    pub point: Vec3,
    pub normal: Vec3,
    /// Probes whose origin is past this x coordinate ignore the plane.
    pub max_x: f32,
}

impl HalfSpace {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            max_x: f32::INFINITY,
        }
    }

    /// Flat floor whose surface is at `height`.
    pub fn floor(height: f32) -> Self {
        Self::new(Vec3::new(0.0, height, 0.0), Vec3::Y)
    }

    /// Cut the plane off past `max_x`.
    pub fn until_x(mut self, max_x: f32) -> Self {
        self.max_x = max_x;
        self
    }

    fn signed_distance(&self, center: Vec3, radius: f32) -> f32 {
        (center - self.point).dot(self.normal) - radius
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlaneWorld {
    pub planes: Vec<HalfSpace>,
}

impl PlaneWorld {
    pub fn new(planes: impl IntoIterator<Item = HalfSpace>) -> Self {
        Self {
            planes: planes.into_iter().collect(),
        }
    }
}

impl PhysicsQuery for PlaneWorld {
    fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        _filter: &ProbeFilter,
    ) -> Option<CollisionData> {
        self.planes
            .iter()
            .filter(|plane| origin.x <= plane.max_x)
            .filter_map(|plane| {
                let approach = direction.dot(plane.normal);
                let gap = plane.signed_distance(origin, radius);
                // Moving away, or starting inside: no hit.
                if approach >= -1e-6 || gap < -1e-4 {
                    return None;
                }
                let distance = gap.max(0.0) / -approach;
                (distance <= max_distance).then(|| {
                    let point = origin + direction * distance - plane.normal * radius;
                    CollisionData::new(distance, plane.normal, point, None)
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, _filter: &ProbeFilter) -> bool {
        self.planes
            .iter()
            .any(|plane| center.x <= plane.max_x && plane.signed_distance(center, radius) <= 0.0)
    }
}

/// Backend stepping characters against the [`PlaneWorld`] resource.
pub struct PlaneBackend;

impl CharacterPhysicsBackend for PlaneBackend {
    fn plugin() -> impl Plugin {
        PlaneBackendPlugin
    }
}

pub struct PlaneBackendPlugin;

impl Plugin for PlaneBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaneWorld>();
        app.add_systems(
            Update,
            plane_motion_step.in_set(CharacterControllerSet::Motion),
        );
    }
}

fn plane_motion_step(
    world: Res<PlaneWorld>,
    time: Res<Time>,
    camera: Res<ActiveCamera>,
    mut characters: CharacterQuery,
) {
    step_characters(&*world, camera.0, time.delta_secs(), &mut characters);
}

/// Resting height of a character on a floor at y = 0: the capsule (centered
/// on the position) stops `skin_width` above the floor.
pub fn rest_height(config: &ControllerConfig) -> f32 {
    config.character_height / 2.0 + config.skin_width
}
