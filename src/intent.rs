//! Movement intent.
//!
//! The intent is what the controller reads each frame: a two-axis movement
//! vector and the jump button's held state. Any input source can write it
//! (keyboard via [`crate::input`], gamepad, AI, network). Rising-edge
//! detection of the jump button is done by the controller.

use bevy::prelude::*;

/// Desired movement for the current frame.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use swept_character_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_axis(Vec2::new(0.0, 1.0));
/// assert!(intent.is_moving());
///
/// intent.set_jump_held(true);
/// assert!(intent.is_jump_held());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Movement axes: `x` is strafe (right positive), `y` is forward.
    /// Each component is within [-1, 1].
    pub axis: Vec2,
    /// Whether the jump button is held.
    pub jump_held: bool,
    /// Previous frame's held state, for edge detection.
    pub(crate) jump_held_prev: bool,
}

impl MovementIntent {
    /// Create a new empty movement intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement axes. Each component is clamped to [-1, 1].
    pub fn set_axis(&mut self, axis: Vec2) {
        self.axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Set the jump button state. Call every frame with the current state.
    pub fn set_jump_held(&mut self, held: bool) {
        self.jump_held = held;
    }

    /// Clear movement and jump input.
    pub fn clear(&mut self) {
        self.axis = Vec2::ZERO;
        self.jump_held = false;
    }

    /// Check if there is active movement input.
    pub fn is_moving(&self) -> bool {
        self.axis.length_squared() > 1e-6
    }

    /// Check if jump is currently held.
    pub fn is_jump_held(&self) -> bool {
        self.jump_held
    }

    /// Whether the jump button went down since the last [`Self::consume_edge`].
    pub fn jump_just_pressed(&self) -> bool {
        self.jump_held && !self.jump_held_prev
    }

    /// Return the rising edge and remember the current held state.
    pub(crate) fn consume_edge(&mut self) -> bool {
        let pressed = self.jump_just_pressed();
        self.jump_held_prev = self.jump_held;
        pressed
    }
}
