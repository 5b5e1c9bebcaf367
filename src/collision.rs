//! Swept-sphere collision resolution.
//!
//! Two probes per frame, vertical first and horizontal second, both cast
//! along the displacement the integrated velocity would produce this frame.
//! Resolving the axes separately keeps a landing-while-walking-into-a-wall
//! frame from blending floor and wall normals, at the cost of being
//! approximate for simultaneous diagonal contacts.

use bevy::prelude::*;

use crate::backend::{PhysicsQuery, ProbeFilter};
use crate::config::ControllerConfig;

/// Information about a sweep hit.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionData {
    /// Distance travelled by the sphere center before contact.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if known).
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// Outcome of one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Velocity after clamping against the hit surfaces.
    pub velocity: Vec3,
    /// Hit of the vertical probe, if any.
    pub vertical: Option<CollisionData>,
    /// Hit of the horizontal probe, if any.
    pub horizontal: Option<CollisionData>,
}

/// Project `v` onto the plane with normal `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

/// Sweep both capsule caps horizontally and keep the nearest hit.
fn sweep_caps(
    physics: &impl PhysicsQuery,
    position: Vec3,
    direction: Dir3,
    max_distance: f32,
    config: &ControllerConfig,
    filter: &ProbeFilter,
) -> Option<CollisionData> {
    let radius = config.character_radius;
    if config.foot_offset() <= 0.0 {
        let origin = config.collision_origin(position);
        return physics.sweep_sphere(origin, radius, direction, max_distance, filter);
    }

    [config.foot_center(position), config.head_center(position)]
        .into_iter()
        .filter_map(|origin| physics.sweep_sphere(origin, radius, direction, max_distance, filter))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Resolve this frame's displacement against the physics world.
///
/// The vertical probe starts at the leading cap (the foot when falling, the
/// head when rising). The horizontal probe starts at both caps of the
/// snapped position. `position` is snapped in place on each hit; the returned
/// velocity is what should be integrated afterwards.
pub fn resolve_collisions(
    physics: &impl PhysicsQuery,
    position: &mut Vec3,
    desired_velocity: Vec3,
    config: &ControllerConfig,
    filter: &ProbeFilter,
    dt: f32,
) -> CollisionOutcome {
    let mut velocity = desired_velocity;
    let delta = desired_velocity * dt;
    let skin = config.skin_width;

    let mut outcome = CollisionOutcome::default();

    if delta.y != 0.0 {
        let (axis, origin) = if delta.y > 0.0 {
            (Dir3::Y, config.head_center(*position))
        } else {
            (Dir3::NEG_Y, config.foot_center(*position))
        };
        let reach = delta.y.abs() + skin;
        if let Some(hit) =
            physics.sweep_sphere(origin, config.character_radius, axis, reach, filter)
        {
            velocity.y = 0.0;
            *position += axis * (hit.distance - skin);
            outcome.vertical = Some(hit);
        }
    }

    let horizontal = Vec3::new(delta.x, 0.0, delta.z);
    if let Ok(direction) = Dir3::new(horizontal) {
        let reach = horizontal.length() + skin;
        if let Some(hit) = sweep_caps(physics, *position, direction, reach, config, filter) {
            let projected = project_on_plane(velocity, hit.normal);
            velocity = Vec3::new(projected.x, velocity.y, projected.z);
            *position += direction * (hit.distance - skin);
            outcome.horizontal = Some(hit);
        }
    }

    outcome.velocity = velocity;
    outcome
}
