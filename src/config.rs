//! Controller configuration.
//!
//! All tunables are static: the controller reads them every frame and never
//! writes them. Distances are in meters, times in seconds.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::CollisionMask;
use crate::intent::MovementIntent;
use crate::state::CharacterMotor;

/// How jump input is turned into vertical velocity.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpModel {
    /// Coyote time, jump buffering and variable jump height. Gravity is
    /// scaled by `fall_gravity_scale` while airborne.
    #[default]
    Forgiving,
    /// Jump only on the frame the button goes down while grounded. No release
    /// cut, base gravity.
    EdgeTriggered,
}

/// How the grounded state is detected.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundProbe {
    /// Stationary sphere overlap just below the bottom cap.
    #[default]
    Overlap,
    /// Short downward sphere cast from the bottom cap, `ground_reach` long.
    SphereCast,
}

/// Reasons a [`ControllerConfig`] is rejected by [`ControllerConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("`character_radius` must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("`character_radius` ({radius}) exceeds half of `character_height` ({height})")]
    RadiusExceedsHalfHeight { radius: f32, height: f32 },
    #[error("`jump_release_multiplier` must be within [0, 1], got {0}")]
    ReleaseMultiplierOutOfRange(f32),
}

/// Configuration parameters for the character controller.
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[require(CharacterMotor, MovementIntent, Transform)]
#[serde(default)]
pub struct ControllerConfig {
    // === Movement Settings ===
    /// Target horizontal speed at full input (units/second).
    pub move_speed: f32,
    /// Maximum change of horizontal velocity per second.
    pub acceleration: f32,
    /// Exponential drag applied while grounded (per second).
    pub ground_friction: f32,
    /// Exponential drag applied while airborne (per second).
    pub air_friction: f32,

    // === Jump/Gravity Settings ===
    /// Vertical velocity set when a jump fires.
    pub jump_force: f32,
    /// Gravity magnitude (positive, applied along -Y).
    pub gravity: f32,
    /// Gravity multiplier while airborne with [`JumpModel::Forgiving`].
    pub fall_gravity_scale: f32,
    /// Factor applied to rising velocity each frame the jump button is released.
    pub jump_release_multiplier: f32,
    /// Grace period after leaving the ground during which a jump still fires.
    pub coyote_time: f32,
    /// Grace period before landing during which a press is remembered.
    pub jump_buffer_time: f32,
    /// Jump behavior.
    pub jump_model: JumpModel,

    // === Collision Settings ===
    /// Grounded detection method.
    pub ground_probe: GroundProbe,
    /// Support tolerance below the skin gap used by the grounded check.
    pub ground_check_distance: f32,
    /// Extra length added to every probe; hits snap the character to this
    /// distance from the surface.
    pub skin_width: f32,
    /// Total height of the character.
    pub character_height: f32,
    /// Radius of the capsule, and of every probe sphere.
    pub character_radius: f32,
    /// Layers the probes can hit.
    pub collision_mask: CollisionMask,
    /// Offset from the character position to the capsule center.
    pub collision_origin_offset: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            acceleration: 10.0,
            ground_friction: 5.0,
            air_friction: 1.0,

            jump_force: 7.0,
            gravity: 9.81,
            fall_gravity_scale: 1.5,
            jump_release_multiplier: 0.5,
            coyote_time: 0.15,
            jump_buffer_time: 0.2,
            jump_model: JumpModel::Forgiving,

            ground_probe: GroundProbe::Overlap,
            ground_check_distance: 0.1,
            skin_width: 0.1,
            character_height: 2.0,
            character_radius: 0.5,
            collision_mask: CollisionMask::ALL,
            collision_origin_offset: Vec3::ZERO,
        }
    }
}

impl ControllerConfig {
    /// Create a config for a responsive player character.
    pub fn player() -> Self {
        Self::default()
    }

    /// Edge-triggered jumping with base gravity and no grace windows.
    pub fn classic() -> Self {
        Self {
            jump_model: JumpModel::EdgeTriggered,
            fall_gravity_scale: 1.0,
            ..default()
        }
    }

    /// Effective gravity magnitude while airborne.
    #[inline]
    pub fn airborne_gravity(&self) -> f32 {
        match self.jump_model {
            JumpModel::Forgiving => self.gravity * self.fall_gravity_scale,
            JumpModel::EdgeTriggered => self.gravity,
        }
    }

    /// World-space capsule center for a character at `position`.
    #[inline]
    pub fn collision_origin(&self, position: Vec3) -> Vec3 {
        position + self.collision_origin_offset
    }

    /// Distance from the probe origin to the center of either capsule cap.
    #[inline]
    pub fn foot_offset(&self) -> f32 {
        self.character_height / 2.0 - self.character_radius
    }

    /// Center of the bottom capsule cap for a character at `position`.
    #[inline]
    pub fn foot_center(&self, position: Vec3) -> Vec3 {
        self.collision_origin(position) - Vec3::Y * self.foot_offset()
    }

    /// Center of the top capsule cap for a character at `position`.
    #[inline]
    pub fn head_center(&self, position: Vec3) -> Vec3 {
        self.collision_origin(position) + Vec3::Y * self.foot_offset()
    }

    /// How far below the bottom cap support is still detected.
    ///
    /// Landing leaves the cap `skin_width` above the surface, so the reach
    /// always covers the skin.
    #[inline]
    pub fn ground_reach(&self) -> f32 {
        self.skin_width + self.ground_check_distance
    }

    /// Check the tunables for values the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("acceleration", self.acceleration),
            ("ground_friction", self.ground_friction),
            ("air_friction", self.air_friction),
            ("jump_force", self.jump_force),
            ("gravity", self.gravity),
            ("fall_gravity_scale", self.fall_gravity_scale),
            ("coyote_time", self.coyote_time),
            ("jump_buffer_time", self.jump_buffer_time),
            ("ground_check_distance", self.ground_check_distance),
            ("skin_width", self.skin_width),
            ("character_height", self.character_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !self.collision_origin_offset.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "collision_origin_offset",
                value: f32::NAN,
            });
        }

        if !(self.character_radius > 0.0 && self.character_radius.is_finite()) {
            return Err(ConfigError::NonPositiveRadius(self.character_radius));
        }
        if self.character_radius > self.character_height / 2.0 {
            return Err(ConfigError::RadiusExceedsHalfHeight {
                radius: self.character_radius,
                height: self.character_height,
            });
        }
        if !(0.0..=1.0).contains(&self.jump_release_multiplier) {
            return Err(ConfigError::ReleaseMultiplierOutOfRange(
                self.jump_release_multiplier,
            ));
        }
        Ok(())
    }

    /// Builder: set movement parameters.
    pub fn with_movement(mut self, move_speed: f32, acceleration: f32) -> Self {
        self.move_speed = move_speed;
        self.acceleration = acceleration;
        self
    }

    /// Builder: set ground and air friction.
    pub fn with_friction(mut self, ground: f32, air: f32) -> Self {
        self.ground_friction = ground;
        self.air_friction = air;
        self
    }

    /// Builder: set jump force.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set gravity magnitude.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the jump release multiplier.
    pub fn with_jump_release_multiplier(mut self, multiplier: f32) -> Self {
        self.jump_release_multiplier = multiplier;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.coyote_time = time;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jump_buffer_time = time;
        self
    }

    /// Builder: set the jump model.
    pub fn with_jump_model(mut self, model: JumpModel) -> Self {
        self.jump_model = model;
        self
    }

    /// Builder: set the grounded detection method.
    pub fn with_ground_probe(mut self, probe: GroundProbe) -> Self {
        self.ground_probe = probe;
        self
    }

    /// Builder: set character dimensions.
    pub fn with_dimensions(mut self, height: f32, radius: f32) -> Self {
        self.character_height = height;
        self.character_radius = radius;
        self
    }

    /// Builder: set skin width.
    pub fn with_skin_width(mut self, skin: f32) -> Self {
        self.skin_width = skin;
        self
    }

    /// Builder: set the collision mask.
    pub fn with_collision_mask(mut self, mask: CollisionMask) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Builder: set the probe origin offset.
    pub fn with_collision_origin_offset(mut self, offset: Vec3) -> Self {
        self.collision_origin_offset = offset;
        self
    }
}
