//! Jump timing: coyote time, jump buffering and the once-per-excursion latch.

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Where the character is in its jump cycle.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    /// No jump pending and none consumed.
    #[default]
    Idle,
    /// A press is buffered and waiting for the coyote window.
    Armed,
    /// A jump fired. Stays latched until the character is grounded with
    /// non-positive vertical velocity.
    Airborne,
}

/// Per-character jump timers, advanced once per frame.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpTimers {
    /// Remaining coyote time (seconds). Refilled while standing on ground.
    pub coyote_remaining: f32,
    /// Remaining jump buffer (seconds). Refilled on each press.
    pub buffer_remaining: f32,
    /// Whether the jump button is held this frame.
    pub held: bool,
    /// Whether the jump button went down this frame.
    pub pressed: bool,
    phase: JumpPhase,
}

impl JumpTimers {
    /// Current phase.
    #[inline]
    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    /// Whether a jump already fired during the current airborne excursion.
    #[inline]
    pub fn has_jumped(&self) -> bool {
        self.phase == JumpPhase::Airborne
    }

    /// Whether a jump would fire if the integrator ran now.
    #[inline]
    pub fn can_fire(&self) -> bool {
        self.coyote_remaining > 0.0 && self.buffer_remaining > 0.0 && !self.has_jumped()
    }

    /// Advance the timers.
    ///
    /// `vertical_velocity` is the velocity produced by the previous frame;
    /// `pressed` is the rising edge of the jump button.
    pub fn tick(
        &mut self,
        config: &ControllerConfig,
        grounded: bool,
        vertical_velocity: f32,
        pressed: bool,
        held: bool,
        dt: f32,
    ) {
        if grounded && vertical_velocity <= 0.0 {
            self.coyote_remaining = config.coyote_time;
            if self.phase == JumpPhase::Airborne {
                self.phase = JumpPhase::Idle;
            }
        } else {
            self.coyote_remaining -= dt;
        }

        if pressed {
            self.buffer_remaining = config.jump_buffer_time;
        } else {
            self.buffer_remaining -= dt;
        }

        self.pressed = pressed;
        self.held = held;
        self.refresh_phase();
    }

    /// Consume both windows and latch the jump.
    pub fn fire(&mut self) {
        self.coyote_remaining = 0.0;
        self.buffer_remaining = 0.0;
        self.phase = JumpPhase::Airborne;
    }

    fn refresh_phase(&mut self) {
        if self.phase != JumpPhase::Airborne {
            self.phase = if self.buffer_remaining > 0.0 {
                JumpPhase::Armed
            } else {
                JumpPhase::Idle
            };
        }
    }
}
