//! Integration tests against a real Rapier3D world.
//!
//! Static geometry is built from fixed cuboid colliders and characters use
//! the kinematic capsule bundle, so these cover the shape casts and
//! intersection queries the backend issues.

#![cfg(feature = "rapier3d")]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::geometry::Group;
use bevy_rapier3d::prelude::*;
use swept_character_controller::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

/// Create a minimal test app with physics and character controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    app.add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        FRAME,
    )));

    app.finish();
    app.cleanup();
    app.update();
    app
}

/// Spawn a fixed cuboid collider.
fn spawn_static_box(app: &mut App, position: Vec3, half_size: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(half_size.x, half_size.y, half_size.z),
        ))
        .id()
}

/// Spawn a floor whose top surface is at y = 0.
fn spawn_floor(app: &mut App) -> Entity {
    spawn_static_box(app, Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
}

/// Let Rapier pick up freshly spawned colliders before characters query them.
fn sync_colliders(app: &mut App) {
    app.update();
}

/// Spawn a character controller with a matching Rapier capsule.
fn spawn_character_with_config(app: &mut App, position: Vec3, config: ControllerConfig) -> Entity {
    let transform = Transform::from_translation(position);
    let bundle = Rapier3dCharacterBundle::from_config(&config);
    app.world_mut()
        .spawn((transform, GlobalTransform::from(transform), config, bundle))
        .id()
}

fn spawn_character(app: &mut App, position: Vec3) -> Entity {
    spawn_character_with_config(app, position, ControllerConfig::default())
}

fn spawn_camera(app: &mut App, direction: Vec3) -> Entity {
    let transform = Transform::default().looking_to(direction, Vec3::Y);
    app.world_mut()
        .spawn((transform, GlobalTransform::from(transform), ControllerCamera))
        .id()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn position(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|t| t.translation)
        .unwrap_or(Vec3::NAN)
}

fn motor(app: &App, entity: Entity) -> CharacterMotor {
    app.world().get::<CharacterMotor>(entity).unwrap().clone()
}

fn rest_height(config: &ControllerConfig) -> f32 {
    config.character_height / 2.0 + config.skin_width
}

// ==================== Grounding ====================

#[test]
fn character_settles_on_cuboid_floor() {
    let mut app = create_test_app();
    spawn_floor(&mut app);
    sync_colliders(&mut app);

    let config = ControllerConfig::default();
    let character = spawn_character(&mut app, Vec3::new(0.0, 3.0, 0.0));
    run_frames(&mut app, 240);

    let pos = position(&app, character);
    let motor = motor(&app, character);
    let rest = rest_height(&config);
    assert!(
        (pos.y - rest).abs() < 0.02,
        "character should rest {rest} above the floor, got {}",
        pos.y
    );
    assert!(motor.grounded);
    assert!(app.world().get::<Grounded>(character).is_some());

    // Capsule bottom stays out of the floor.
    assert!(pos.y - config.character_height / 2.0 >= 0.0);
}

#[test]
fn sphere_cast_grounds_on_cuboid_floor() {
    let mut app = create_test_app();
    spawn_floor(&mut app);
    sync_colliders(&mut app);

    let config = ControllerConfig::default().with_ground_probe(GroundProbe::SphereCast);
    let character = spawn_character_with_config(&mut app, Vec3::new(0.0, 3.0, 0.0), config);
    run_frames(&mut app, 240);

    assert!(motor(&app, character).grounded);
    assert!((position(&app, character).y - rest_height(&config)).abs() < 0.02);
}

// ==================== Walls ====================

#[test]
fn cuboid_wall_stops_character() {
    let mut app = create_test_app();
    spawn_floor(&mut app);
    // Wall face at x = 3.
    spawn_static_box(&mut app, Vec3::new(3.5, 2.5, 0.0), Vec3::new(0.5, 2.5, 10.0));
    spawn_camera(&mut app, Vec3::X);
    sync_colliders(&mut app);

    let config = ControllerConfig::default();
    let character = spawn_character(&mut app, Vec3::new(0.0, rest_height(&config), 0.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_axis(Vec2::Y);
    run_frames(&mut app, 300);

    let pos = position(&app, character);
    let motor = motor(&app, character);
    assert!(
        pos.x > 2.3 && pos.x < 2.45,
        "character should stop a skin width from the wall, got {}",
        pos.x
    );
    let hit = motor.horizontal_hit.expect("wall hit");
    assert!(
        hit.normal.x < -0.9,
        "normal should face the character, got {:?}",
        hit.normal
    );
    assert!(motor.velocity.x.abs() < 1e-3);
}

// ==================== Collision Mask ====================

#[test]
fn collision_mask_filters_colliders() {
    let mut app = create_test_app();
    let floor = spawn_floor(&mut app);
    app.world_mut()
        .entity_mut(floor)
        .insert(CollisionGroups::new(Group::GROUP_2, Group::ALL));
    sync_colliders(&mut app);

    let filtered = spawn_character_with_config(
        &mut app,
        Vec3::new(0.0, 2.0, 0.0),
        ControllerConfig::default().with_collision_mask(CollisionMask(1)),
    );
    let unfiltered = spawn_character(&mut app, Vec3::new(5.0, 2.0, 0.0));
    run_frames(&mut app, 120);

    assert!(
        position(&app, filtered).y < -1.0,
        "masked-out floor should not stop the character"
    );
    assert!(!motor(&app, filtered).grounded);

    let rest = rest_height(&ControllerConfig::default());
    assert!((position(&app, unfiltered).y - rest).abs() < 0.02);
    assert!(motor(&app, unfiltered).grounded);
}
