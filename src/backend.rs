//! Physics backend abstraction.
//!
//! The controller only ever asks the physics world two questions: "does a
//! sphere swept along this ray hit anything?" and "does a sphere placed here
//! overlap anything?". [`PhysicsQuery`] is that narrow seam. It is what the
//! pure movement functions are written against, so they can be tested with a
//! hand-built mock world.
//!
//! [`CharacterPhysicsBackend`] is the Bevy-facing side: a backend supplies a
//! plugin that schedules the motion step with its own [`PhysicsQuery`]
//! implementation (see the `rapier` module for the bundled Rapier3D one).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionData;

/// Bit filter selecting which colliders the controller's probes can hit.
///
/// A probe hits a collider when the collider's membership bits intersect
/// this mask.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    /// Hit everything.
    pub const ALL: Self = Self(u32::MAX);
    /// Hit nothing.
    pub const NONE: Self = Self(0);

    /// Check whether a collider with the given membership bits passes the mask.
    #[inline]
    pub fn matches(&self, memberships: u32) -> bool {
        self.0 & memberships != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Filter applied to every probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeFilter {
    /// Layers the probe can hit.
    pub mask: CollisionMask,
    /// Entity to ignore, usually the character itself.
    pub exclude: Option<Entity>,
}

impl ProbeFilter {
    pub fn new(mask: CollisionMask) -> Self {
        Self {
            mask,
            exclude: None,
        }
    }

    /// Exclude an entity from the probe.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

/// Synchronous physics queries used by the controller.
///
/// A miss is `None`/`false`; there is no error path. Implementations must not
/// report colliders excluded by the [`ProbeFilter`].
pub trait PhysicsQuery {
    /// Sweep a sphere of `radius` from `origin` along `direction`, up to
    /// `max_distance`, and return the first hit.
    ///
    /// `CollisionData::distance` is the distance travelled by the sphere
    /// center before contact. A sweep that starts already penetrating a
    /// collider may report a miss for it.
    fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        filter: &ProbeFilter,
    ) -> Option<CollisionData>;

    /// Test whether a stationary sphere overlaps any collider.
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &ProbeFilter) -> bool;
}

/// Trait for physics backend implementations.
///
/// A backend owns the part of the frame that needs the physics world: its
/// plugin must add a system in [`CharacterControllerSet::Motion`] that builds a
/// [`PhysicsQuery`] and hands it to [`crate::systems::step_characters`].
///
/// [`CharacterControllerSet::Motion`]: crate::CharacterControllerSet::Motion
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Human-readable backend name, used in log output.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
