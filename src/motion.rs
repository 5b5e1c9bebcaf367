//! Frame-stepped movement.
//!
//! Everything here is a plain function of its arguments so a whole frame can
//! be run against a mock [`PhysicsQuery`] without an app.
//!
//! Per frame: grounded check, jump timers, velocity integration, collision
//! resolution, position integration.

use bevy::prelude::*;

use crate::backend::{PhysicsQuery, ProbeFilter};
use crate::collision::{resolve_collisions, CollisionOutcome};
use crate::config::{ControllerConfig, JumpModel};
use crate::detection::check_grounded;
use crate::jump::JumpTimers;
use crate::state::CharacterMotor;

/// Camera basis used to resolve movement direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    /// Basis of a camera transform.
    pub fn from_transform(transform: &GlobalTransform) -> Self {
        Self {
            forward: transform.forward().as_vec3(),
            right: transform.right().as_vec3(),
        }
    }
}

/// Input for one frame step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// World-space movement direction (unit length or zero).
    pub direction: Vec3,
    /// Jump button went down this frame.
    pub jump_pressed: bool,
    /// Jump button is held.
    pub jump_held: bool,
}

/// What happened during a frame step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub grounded: bool,
    pub jumped: bool,
    pub collision: CollisionOutcome,
}

/// Camera-relative world-space direction for a two-axis input.
///
/// Returns zero when there is no camera or no input.
pub fn resolve_direction(input: Vec2, camera: Option<CameraBasis>) -> Vec3 {
    let Some(camera) = camera else {
        return Vec3::ZERO;
    };

    let forward = Vec3::new(camera.forward.x, 0.0, camera.forward.z).normalize_or_zero();
    (input.y * forward + input.x * camera.right).normalize_or_zero()
}

/// Move `current` toward `target` by at most `max_delta`.
#[inline]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Compute next frame's velocity.
///
/// May fire a jump, in which case `timers` is latched. Returns the new
/// velocity and whether a jump fired.
pub fn integrate_velocity(
    velocity: Vec3,
    direction: Vec3,
    grounded: bool,
    timers: &mut JumpTimers,
    config: &ControllerConfig,
    dt: f32,
) -> (Vec3, bool) {
    let horizontal = move_towards(
        Vec3::new(velocity.x, 0.0, velocity.z),
        direction * config.move_speed,
        config.acceleration * dt,
    );
    let friction = if grounded {
        config.ground_friction
    } else {
        config.air_friction
    };
    let horizontal = horizontal.lerp(Vec3::ZERO, (friction * dt).clamp(0.0, 1.0));

    let mut vertical = velocity.y;
    let mut jumped = false;

    match config.jump_model {
        JumpModel::Forgiving => {
            if timers.can_fire() {
                vertical = config.jump_force;
                timers.fire();
                jumped = true;
            }
            // Variable jump height
            if !timers.held && vertical > 0.0 {
                vertical *= config.jump_release_multiplier;
            }
        }
        JumpModel::EdgeTriggered => {
            if grounded && timers.pressed {
                vertical = config.jump_force;
                timers.fire();
                jumped = true;
            }
        }
    }

    if !grounded {
        vertical -= config.airborne_gravity() * dt;
    }

    (Vec3::new(horizontal.x, vertical, horizontal.z), jumped)
}

/// Advance one character by one frame.
///
/// `position` is the character's world position; it is snapped by collision
/// hits and then integrated with the resolved velocity.
pub fn step_character(
    physics: &impl PhysicsQuery,
    motor: &mut CharacterMotor,
    position: &mut Vec3,
    input: &FrameInput,
    config: &ControllerConfig,
    filter: &ProbeFilter,
    dt: f32,
) -> StepOutcome {
    let grounded = check_grounded(physics, *position, config, filter);
    motor.grounded = grounded;

    motor.jump.tick(
        config,
        grounded,
        motor.velocity.y,
        input.jump_pressed,
        input.jump_held,
        dt,
    );

    let (desired, jumped) = integrate_velocity(
        motor.velocity,
        input.direction,
        grounded,
        &mut motor.jump,
        config,
        dt,
    );

    let collision = resolve_collisions(physics, position, desired, config, filter, dt);

    motor.velocity = collision.velocity;
    motor.vertical_hit = collision.vertical;
    motor.horizontal_hit = collision.horizontal;
    *position += motor.velocity * dt;

    StepOutcome {
        grounded,
        jumped,
        collision,
    }
}
