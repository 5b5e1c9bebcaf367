//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.
//!
//! Characters are kinematic position-based bodies: the controller writes
//! their `Transform` and Rapier follows.

use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;
use bevy_rapier3d::prelude::*;

use crate::backend::{CharacterPhysicsBackend, CollisionMask, PhysicsQuery, ProbeFilter};
use crate::collision::CollisionData;
use crate::config::ControllerConfig;
use crate::systems::{step_characters, ActiveCamera, CharacterQuery};
use crate::CharacterControllerSet;

/// Rapier3D physics backend for the character controller.
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn name() -> &'static str {
        "rapier3d"
    }
}

/// Plugin that sets up Rapier3D-specific systems for the character controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            rapier_motion_step.in_set(CharacterControllerSet::Motion),
        );
    }
}

/// [`PhysicsQuery`] over a Rapier context.
pub struct RapierPhysicsQuery<'a, 'w> {
    context: &'a RapierContext<'w>,
}

impl<'a, 'w> RapierPhysicsQuery<'a, 'w> {
    pub fn new(context: &'a RapierContext<'w>) -> Self {
        Self { context }
    }
}

/// Build a Rapier query filter from a probe filter.
fn query_filter(filter: &ProbeFilter) -> QueryFilter<'static> {
    let mut query = QueryFilter::default()
        .exclude_sensors()
        .groups(CollisionGroups::new(Group::ALL, mask_group(filter.mask)));
    if let Some(entity) = filter.exclude {
        query = query.exclude_rigid_body(entity).exclude_collider(entity);
    }
    query
}

/// Convert a collision mask into a Rapier filter group.
pub fn mask_group(mask: CollisionMask) -> Group {
    Group::from_bits_truncate(mask.0)
}

impl PhysicsQuery for RapierPhysicsQuery<'_, '_> {
    fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        filter: &ProbeFilter,
    ) -> Option<CollisionData> {
        let shape = Collider::ball(radius);
        self.context
            .cast_shape(
                origin,
                Quat::IDENTITY,
                direction.as_vec3(),
                &shape,
                ShapeCastOptions {
                    max_time_of_impact: max_distance,
                    stop_at_penetration: false,
                    ..default()
                },
                query_filter(filter),
            )
            .map(|(hit_entity, hit)| {
                let normal = hit.details.map(|d| d.normal1).unwrap_or(-direction.as_vec3());
                let center = origin + direction * hit.time_of_impact;
                let point = center - normal * radius;
                CollisionData::new(hit.time_of_impact, normal, point, Some(hit_entity))
            })
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &ProbeFilter) -> bool {
        let shape = Collider::ball(radius);
        let mut hit = false;
        self.context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &shape,
            query_filter(filter),
            |_| {
                hit = true;
                false
            },
        );
        hit
    }
}

/// Run the frame step for every character against the Rapier world.
fn rapier_motion_step(
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    camera: Res<ActiveCamera>,
    mut characters: CharacterQuery,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let physics = RapierPhysicsQuery::new(&context);
    step_characters(&physics, camera.0, time.delta_secs(), &mut characters);
}

/// Bundle for creating a character with Rapier3D physics.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use swept_character_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     let config = ControllerConfig::player();
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         config,
///         KeyboardControlled,
///         Rapier3dCharacterBundle::from_config(&config),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// Kinematic body moved through its `Transform`.
    pub rigid_body: RigidBody,
    /// Capsule matching the controller's height and radius.
    pub collider: Collider,
    /// Which groups this character belongs to and collides with.
    pub collision_groups: CollisionGroups,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

impl Rapier3dCharacterBundle {
    /// Create a bundle whose capsule matches the config's dimensions.
    ///
    /// The capsule is centered on the collision origin, where the probes
    /// start, so a resting character sits `skin_width` above the ground.
    pub fn from_config(config: &ControllerConfig) -> Self {
        let half_segment = config.foot_offset().max(0.0);
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            collider: Collider::capsule(
                config.collision_origin_offset - Vec3::Y * half_segment,
                config.collision_origin_offset + Vec3::Y * half_segment,
                config.character_radius,
            ),
            collision_groups: CollisionGroups::new(Group::ALL, mask_group(config.collision_mask)),
        }
    }

    /// Set the collision groups.
    pub fn with_groups(mut self, memberships: Group, filters: Group) -> Self {
        self.collision_groups = CollisionGroups::new(memberships, filters);
        self
    }
}
