//! # `swept_character_controller`
//!
//! A kinematic 3D character controller with physics backend abstraction.
//!
//! This crate provides a frame-stepped character controller that:
//! - Moves relative to a camera, with acceleration and ground/air drag
//! - Jumps with coyote time, jump buffering and variable jump height
//! - Resolves collisions with two swept-sphere probes (vertical, then horizontal)
//! - Detects ground with a sphere overlap (or short sphere cast) at the feet
//! - Optionally drives a mouse-look camera
//! - Abstracts the physics world behind a narrow query trait (Rapier3D included)
//!
//! ## Architecture
//!
//! The movement logic lives in plain functions ([`motion::step_character`] and
//! the functions it calls) operating on [`state::CharacterMotor`] and a
//! [`backend::PhysicsQuery`]. The plugin runs them once per rendered frame:
//!
//! 1. [`CharacterControllerSet::Input`]: keyboard sampling, camera tracking
//! 2. [`CharacterControllerSet::Motion`]: the backend's frame step
//! 3. [`CharacterControllerSet::Sync`]: `Grounded` / `Airborne` markers
//! 4. [`CharacterControllerSet::Camera`] (in `PostUpdate`): mouse look
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use swept_character_controller::prelude::*;
//!
//! // ControllerConfig pulls in CharacterMotor, MovementIntent and Transform.
//! let config = ControllerConfig::player();
//! let intent = MovementIntent::default();
//! assert!(config.validate().is_ok());
//! # let _ = intent;
//! ```

use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub mod backend;
pub mod camera;
pub mod collision;
pub mod config;
pub mod debug;
pub mod detection;
pub mod input;
pub mod intent;
pub mod jump;
pub mod motion;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{CharacterPhysicsBackend, CollisionMask, PhysicsQuery, ProbeFilter};
    pub use crate::camera::{CameraLook, ControllerCamera};
    pub use crate::collision::CollisionData;
    pub use crate::config::{ConfigError, ControllerConfig, GroundProbe, JumpModel};
    pub use crate::debug::CharacterControllerDebugPlugin;
    pub use crate::input::{InputBindings, KeyboardControlled};
    pub use crate::intent::MovementIntent;
    pub use crate::jump::{JumpPhase, JumpTimers};
    pub use crate::state::{Airborne, CharacterMotor, Grounded};
    pub use crate::{CharacterControllerPlugin, CharacterControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// System sets for the character controller, in execution order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Input sampling and camera tracking.
    Input,
    /// Frame step (grounded check, jump, velocity, collisions, position).
    Motion,
    /// State marker sync.
    Sync,
    /// Mouse look, in `PostUpdate`.
    Camera,
}

/// Main plugin for the character controller system.
///
/// This plugin is generic over a physics backend `B` which schedules the frame
/// step with its physics queries.
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use swept_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct CharacterControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<config::ControllerConfig>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<state::CharacterMotor>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<camera::ControllerCamera>();
        app.register_type::<camera::CameraLook>();
        app.register_type::<input::KeyboardControlled>();
        app.register_type::<input::InputBindings>();

        app.init_resource::<systems::ActiveCamera>();
        app.init_resource::<input::InputBindings>();

        app.configure_sets(
            Update,
            (
                CharacterControllerSet::Input,
                CharacterControllerSet::Motion,
                CharacterControllerSet::Sync,
            )
                .chain(),
        );
        app.configure_sets(
            PostUpdate,
            CharacterControllerSet::Camera.before(TransformSystem::TransformPropagate),
        );

        app.add_systems(
            Update,
            (
                input::sample_keyboard_input.run_if(resource_exists::<ButtonInput<KeyCode>>),
                systems::track_controller_camera,
                systems::report_invalid_configs,
            )
                .in_set(CharacterControllerSet::Input),
        );
        app.add_systems(
            Update,
            systems::sync_state_markers.in_set(CharacterControllerSet::Sync),
        );
        app.add_systems(
            PostUpdate,
            camera::apply_camera_look.in_set(CharacterControllerSet::Camera),
        );

        debug!("character controller using {} backend", B::name());
        app.add_plugins(B::plugin());
    }
}
