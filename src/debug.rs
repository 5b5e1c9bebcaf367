//! Debug overlay.
//!
//! Draws each character's ground probe sphere: red while airborne, green
//! while grounded. Requires Bevy's gizmo plugin (part of `DefaultPlugins`).

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::detection::ground_probe_center;
use crate::state::CharacterMotor;
use crate::CharacterControllerSet;

const GROUNDED_COLOR: Color = Color::srgb(0.2, 0.9, 0.3);
const AIRBORNE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Opt-in plugin drawing the ground probes.
pub struct CharacterControllerDebugPlugin;

impl Plugin for CharacterControllerDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            draw_ground_probes.after(CharacterControllerSet::Camera),
        );
    }
}

/// Overlay color for a character's ground probe.
#[inline]
pub fn overlay_color(grounded: bool) -> Color {
    if grounded {
        GROUNDED_COLOR
    } else {
        AIRBORNE_COLOR
    }
}

/// Draw the ground probe sphere of every character.
pub fn draw_ground_probes(
    mut gizmos: Gizmos,
    q_characters: Query<(&Transform, &ControllerConfig, &CharacterMotor)>,
) {
    for (transform, config, motor) in &q_characters {
        let center = ground_probe_center(transform.translation, config);
        gizmos.sphere(
            Isometry3d::from_translation(center),
            config.character_radius,
            overlay_color(motor.grounded),
        );
    }
}
