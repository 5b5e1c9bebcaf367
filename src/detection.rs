//! Grounded detection.
//!
//! The grounded probe is independent of the swept collision probes, so the
//! grounded flag can lag actual support by a frame at ledges and on steep
//! contacts.
//!
//! Both probe kinds look [`ControllerConfig::ground_reach`] below the bottom
//! cap. A landed character rests `skin_width` above the surface, so neither
//! probe starts inside the ground it is looking for.

use bevy::prelude::*;

use crate::backend::{PhysicsQuery, ProbeFilter};
use crate::config::{ControllerConfig, GroundProbe};

/// Center of the overlap sphere for a character at `position`.
///
/// This is also what the debug overlay draws.
#[inline]
pub fn ground_probe_center(position: Vec3, config: &ControllerConfig) -> Vec3 {
    config.foot_center(position) - Vec3::Y * config.ground_reach()
}

/// Check whether the character at `position` is supported.
pub fn check_grounded(
    physics: &impl PhysicsQuery,
    position: Vec3,
    config: &ControllerConfig,
    filter: &ProbeFilter,
) -> bool {
    let radius = config.character_radius;
    match config.ground_probe {
        GroundProbe::Overlap => {
            physics.overlap_sphere(ground_probe_center(position, config), radius, filter)
        }
        GroundProbe::SphereCast => physics
            .sweep_sphere(
                config.foot_center(position),
                radius,
                Dir3::NEG_Y,
                config.ground_reach(),
                filter,
            )
            .is_some(),
    }
}
