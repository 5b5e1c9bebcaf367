//! Camera reference and mouse look.
//!
//! [`ControllerCamera`] marks the camera whose basis drives movement
//! direction. [`CameraLook`] turns mouse motion into yaw/pitch on the same
//! entity; it runs after movement so it sees the final character position.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for the camera that movement direction is resolved against.
///
/// When no entity carries this marker, characters receive no movement.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ControllerCamera;

/// Mouse look settings and accumulated orientation.
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[serde(default)]
pub struct CameraLook {
    /// Degrees per mouse unit per second.
    pub rotation_speed: f32,
    /// Minimum and maximum pitch in degrees (positive looks up).
    pub pitch_limits: Vec2,
    /// Whether `pitch_limits` are enforced.
    pub clamp_pitch: bool,
    /// Accumulated yaw in degrees.
    pub yaw: f32,
    /// Accumulated pitch in degrees.
    pub pitch: f32,
}

impl Default for CameraLook {
    fn default() -> Self {
        Self {
            rotation_speed: 10.0,
            pitch_limits: Vec2::new(-80.0, 20.0),
            clamp_pitch: true,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraLook {
    /// Builder: disable the pitch clamp.
    pub fn unclamped(mut self) -> Self {
        self.clamp_pitch = false;
        self
    }

    /// Builder: set the rotation speed.
    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Accumulate a mouse delta (screen space, +y down) over `dt` seconds.
    pub fn apply_delta(&mut self, delta: Vec2, dt: f32) {
        let scale = self.rotation_speed * dt;
        self.yaw -= delta.x * scale;
        self.pitch -= delta.y * scale;
        if self.clamp_pitch {
            let (min, max) = (
                self.pitch_limits.x.min(self.pitch_limits.y),
                self.pitch_limits.x.max(self.pitch_limits.y),
            );
            self.pitch = self.pitch.clamp(min, max);
        }
    }

    /// Rotation for the current yaw and pitch.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }
}

/// Apply accumulated mouse motion to every [`CameraLook`].
pub fn apply_camera_look(
    motion: Option<Res<AccumulatedMouseMotion>>,
    time: Res<Time>,
    mut q_cameras: Query<(&mut CameraLook, &mut Transform)>,
) {
    let Some(motion) = motion else {
        return;
    };
    let dt = time.delta_secs();
    if motion.delta == Vec2::ZERO || dt <= 0.0 {
        return;
    }

    for (mut look, mut transform) in &mut q_cameras {
        look.apply_delta(motion.delta, dt);
        transform.rotation = look.rotation();
    }
}
