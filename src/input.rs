//! Keyboard input sampling.
//!
//! Raw axes: each direction key contributes a full unit, opposite keys
//! cancel. Only characters tagged with [`KeyboardControlled`] are sampled.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::intent::MovementIntent;

/// Marker for characters driven by the keyboard sampler.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct KeyboardControlled;

/// Key bindings for the keyboard sampler.
#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct InputBindings {
    pub forward: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            back: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: vec![KeyCode::Space],
        }
    }
}

impl InputBindings {
    /// Raw two-axis input from the currently pressed keys.
    pub fn axis(&self, keys: &ButtonInput<KeyCode>) -> Vec2 {
        let held = |bound: &[KeyCode]| -> f32 {
            if keys.any_pressed(bound.iter().copied()) {
                1.0
            } else {
                0.0
            }
        };
        Vec2::new(
            held(&self.right) - held(&self.left),
            held(&self.forward) - held(&self.back),
        )
    }

    /// Whether any jump key is held.
    pub fn jump_held(&self, keys: &ButtonInput<KeyCode>) -> bool {
        keys.any_pressed(self.jump.iter().copied())
    }
}

/// Write keyboard state into the intent of every keyboard-controlled character.
pub fn sample_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut q_intents: Query<&mut MovementIntent, With<KeyboardControlled>>,
) {
    let axis = bindings.axis(&keys);
    let jump_held = bindings.jump_held(&keys);

    for mut intent in &mut q_intents {
        intent.set_axis(axis);
        intent.set_jump_held(jump_held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel() {
        let bindings = InputBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::KeyW);

        assert_eq!(bindings.axis(&keys), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn alternate_bindings_count_once() {
        let bindings = InputBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyS);
        keys.press(KeyCode::ArrowDown);
        keys.press(KeyCode::ArrowLeft);

        assert_eq!(bindings.axis(&keys), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn sampler_writes_tagged_characters_only() {
        let mut app = App::new();
        app.init_resource::<InputBindings>();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::Space);
        app.insert_resource(keys);
        app.add_systems(Update, sample_keyboard_input);

        let tagged = app
            .world_mut()
            .spawn((MovementIntent::default(), KeyboardControlled))
            .id();
        let untagged = app.world_mut().spawn(MovementIntent::default()).id();

        app.update();

        let intent = app.world().get::<MovementIntent>(tagged).unwrap();
        assert_eq!(intent.axis, Vec2::X);
        assert!(intent.jump_held);

        let intent = app.world().get::<MovementIntent>(untagged).unwrap();
        assert_eq!(intent.axis, Vec2::ZERO);
        assert!(!intent.jump_held);
    }
}
