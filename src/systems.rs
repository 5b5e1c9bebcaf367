//! Core controller systems.
//!
//! These systems are backend-agnostic. The frame step itself needs the physics
//! world, so backends call [`step_characters`] from a system of their own.

use bevy::prelude::*;

use crate::backend::{PhysicsQuery, ProbeFilter};
use crate::camera::ControllerCamera;
use crate::config::ControllerConfig;
use crate::intent::MovementIntent;
use crate::motion::{resolve_direction, step_character, CameraBasis, FrameInput};
use crate::state::{Airborne, CharacterMotor, Grounded};

/// Basis of the camera that movement is resolved against, if one exists.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ActiveCamera(pub Option<CameraBasis>);

/// Query over every controlled character.
///
/// The character's `Transform` translation is treated as its world position,
/// so controlled characters should not be parented to moving entities.
pub type CharacterQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static ControllerConfig,
        &'static mut MovementIntent,
        &'static mut CharacterMotor,
        &'static mut Transform,
    ),
>;

/// Track the first entity marked with [`ControllerCamera`].
pub fn track_controller_camera(
    q_cameras: Query<&GlobalTransform, With<ControllerCamera>>,
    mut active: ResMut<ActiveCamera>,
) {
    let basis = q_cameras.iter().next().map(CameraBasis::from_transform);

    match (active.0.is_some(), basis.is_some()) {
        (false, true) => debug!("controller camera found"),
        (true, false) => debug!("controller camera lost, movement input ignored"),
        _ => {}
    }

    if active.0 != basis {
        active.0 = basis;
    }
}

/// Advance every character by one frame using the given physics query.
pub fn step_characters(
    physics: &impl PhysicsQuery,
    camera: Option<CameraBasis>,
    dt: f32,
    characters: &mut CharacterQuery,
) {
    if dt <= 0.0 {
        return;
    }

    for (entity, config, mut intent, mut motor, mut transform) in characters.iter_mut() {
        let jump_pressed = intent.consume_edge();
        let input = FrameInput {
            direction: resolve_direction(intent.axis, camera),
            jump_pressed,
            jump_held: intent.jump_held,
        };
        let filter = ProbeFilter::new(config.collision_mask).excluding(entity);

        let mut position = transform.translation;
        let outcome = step_character(
            physics,
            &mut motor,
            &mut position,
            &input,
            config,
            &filter,
            dt,
        );
        transform.translation = position;

        if outcome.jumped {
            trace!(?entity, velocity = ?motor.velocity, "jump fired");
        }
    }
}

/// Keep the [`Grounded`] / [`Airborne`] markers in sync with the motor.
pub fn sync_state_markers(
    mut commands: Commands,
    q_motors: Query<
        (Entity, &CharacterMotor, Has<Grounded>, Has<Airborne>),
        Changed<CharacterMotor>,
    >,
) {
    for (entity, motor, has_grounded, has_airborne) in &q_motors {
        if motor.grounded {
            if !has_grounded {
                commands.entity(entity).insert(Grounded);
            }
            if has_airborne {
                commands.entity(entity).remove::<Airborne>();
            }
        } else {
            if !has_airborne {
                commands.entity(entity).insert(Airborne);
            }
            if has_grounded {
                commands.entity(entity).remove::<Grounded>();
            }
        }
    }
}

/// Report configs the controller cannot work with.
///
/// The controller keeps running with the invalid values.
pub fn report_invalid_configs(
    q_configs: Query<(Entity, &ControllerConfig), Changed<ControllerConfig>>,
) {
    for (entity, config) in &q_configs {
        if let Err(err) = config.validate() {
            warn!(?entity, "invalid character controller config: {err}");
        }
    }
}
