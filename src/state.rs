//! Character state.
//!
//! [`CharacterMotor`] holds everything the controller carries from one frame
//! to the next. The [`Grounded`] and [`Airborne`] markers mirror its grounded
//! flag so game code can filter queries on them.

use bevy::prelude::*;

use crate::collision::CollisionData;
use crate::jump::JumpTimers;

/// Per-character motion state.
///
/// Position is not stored here; it lives in the entity's `Transform`.
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Component)]
pub struct CharacterMotor {
    /// Velocity produced by the last frame. Overwritten every frame.
    pub velocity: Vec3,
    /// Result of the last grounded check.
    pub grounded: bool,
    /// Jump timers and latch.
    pub jump: JumpTimers,
    /// Last frame's vertical probe hit.
    pub vertical_hit: Option<CollisionData>,
    /// Last frame's horizontal probe hit.
    pub horizontal_hit: Option<CollisionData>,
}

impl CharacterMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal part of the velocity.
    #[inline]
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    /// Check if the character hit a wall last frame.
    pub fn touching_wall(&self) -> bool {
        self.horizontal_hit.is_some()
    }

    /// Check if the character bumped its head last frame.
    pub fn touching_ceiling(&self) -> bool {
        self.vertical_hit
            .as_ref()
            .is_some_and(|hit| hit.normal.y < 0.0)
    }
}

/// Marker component indicating the character is grounded.
///
/// Mutually exclusive with [`Airborne`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_velocity_drops_y() {
        let motor = CharacterMotor {
            velocity: Vec3::new(1.0, -4.0, 2.0),
            ..default()
        };
        assert_eq!(motor.horizontal_velocity(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn ceiling_contact_from_downward_normal() {
        let mut motor = CharacterMotor::new();
        assert!(!motor.touching_ceiling());

        motor.vertical_hit = Some(CollisionData::new(0.1, Vec3::NEG_Y, Vec3::ZERO, None));
        assert!(motor.touching_ceiling());

        motor.vertical_hit = Some(CollisionData::new(0.1, Vec3::Y, Vec3::ZERO, None));
        assert!(!motor.touching_ceiling());
    }

    #[test]
    fn wall_contact_from_horizontal_hit() {
        let mut motor = CharacterMotor::new();
        assert!(!motor.touching_wall());
        motor.horizontal_hit = Some(CollisionData::new(0.3, Vec3::X, Vec3::ZERO, None));
        assert!(motor.touching_wall());
    }
}
