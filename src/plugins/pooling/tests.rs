//! Pooling plugin tests: the registry driven through `WorldHost` on a bare `World`.
use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::test_utils::{pooled_world, run_system_once};
use crate::pool::{Despawned, PoolError, PoolSettings, TemplateId};

use super::{
    systems, with_pools, world_transform, ActiveLayers, Pooled, PoolRequest, TemplateLibrary, UnitSpawned,
    UnitState,
};

#[derive(Component, Clone)]
struct Crate;

fn register(world: &mut World, name: &str) -> TemplateId {
    let layers = CollisionLayers::new(Layer::Brick, [Layer::World, Layer::Player]);
    world
        .resource_mut::<TemplateLibrary>()
        .register_bundle(name, (Crate, layers, ActiveLayers(layers), LinearVelocity::ZERO))
}

fn world_with_template() -> (World, TemplateId) {
    let mut world = pooled_world(PoolSettings::default());
    let template = register(&mut world, "Crate");
    (world, template)
}

fn init_messages(world: &mut World) {
    world.init_resource::<Messages<PoolRequest>>();
    world.init_resource::<Messages<UnitSpawned>>();
}

// --------------------------------------------------------------------------------------
// WorldHost
// --------------------------------------------------------------------------------------

#[test]
fn preload_spawns_inactive_tagged_entities() {
    let (mut world, template) = world_with_template();

    with_pools(&mut world, |pools, host| pools.preload(host, template, 4, None)).unwrap();

    let mut q = world.query::<(&Pooled, &UnitState, &Visibility, &CollisionLayers, &Crate)>();
    let rows: Vec<_> = q.iter(&world).collect();
    assert_eq!(rows.len(), 4);
    for (pooled, state, vis, layers, _) in rows {
        assert_eq!(pooled.template, template);
        assert_eq!(*state, UnitState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        assert!(layers.memberships.has_all(Layer::Brick));
        assert!(!layers.filters.has_all(Layer::Player));
    }
}

#[test]
fn spawn_places_and_activates() {
    let (mut world, template) = world_with_template();
    let rotation = Quat::from_rotation_z(0.5);

    let unit = with_pools(&mut world, |pools, host| {
        pools.spawn(host, template, Vec3::new(10.0, 20.0, 1.0), rotation)
    })
    .expect("spawn should succeed");

    let e = unit.instance();
    let tf = unit.transform(&world).unwrap();
    assert_eq!(tf.translation, Vec3::new(10.0, 20.0, 1.0));
    assert_eq!(tf.rotation, rotation);
    assert_eq!(*world.get::<UnitState>(e).unwrap(), UnitState::Active);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Inherited);

    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(layers.filters.has_all(Layer::World));
    assert!(layers.filters.has_all(Layer::Player));
}

#[test]
fn despawn_hides_stops_and_disables_collisions() {
    let (mut world, template) = world_with_template();
    let unit = with_pools(&mut world, |pools, host| {
        pools.spawn(host, template, Vec3::ZERO, Quat::IDENTITY)
    })
    .unwrap();
    let e = unit.instance();
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(3.0, 4.0);

    let outcome = with_pools(&mut world, |pools, host| pools.despawn(host, e));

    assert_eq!(outcome, Despawned::Reclaimed);
    assert_eq!(*world.get::<UnitState>(e).unwrap(), UnitState::Inactive);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    assert!(!world.get::<CollisionLayers>(e).unwrap().filters.has_all(Layer::World));
}

#[test]
fn fresh_units_go_under_the_requested_parent() {
    let (mut world, template) = world_with_template();
    let holder = world.spawn((Name::new("StackHolder"), Transform::default())).id();

    let unit = with_pools(&mut world, |pools, host| {
        pools.preload(host, template, 0, None)?;
        pools.spawn_with_parent(host, template, Vec3::Y, Quat::IDENTITY, holder)
    })
    .unwrap();

    let child_of = world.get::<ChildOf>(unit.instance()).expect("fresh unit should be parented");
    assert_eq!(child_of.parent(), holder);
}

#[test]
fn release_despawns_every_pooled_entity() {
    let (mut world, template) = world_with_template();
    let unit = with_pools(&mut world, |pools, host| {
        pools.preload(host, template, 2, None)?;
        pools.spawn(host, template, Vec3::ZERO, Quat::IDENTITY)
    })
    .unwrap();

    let destroyed = with_pools(&mut world, |pools, host| pools.release_all(host));

    assert_eq!(destroyed, 2);
    assert!(world.get_entity(unit.instance()).is_err());
    assert_eq!(world.query::<&Pooled>().iter(&world).count(), 0);
}

#[test]
fn despawning_a_foreign_entity_destroys_it() {
    let (mut world, _) = world_with_template();
    let stray = world.spawn(Crate).id();

    let outcome = with_pools(&mut world, |pools, host| pools.despawn(host, stray));

    assert_eq!(outcome, Despawned::Destroyed);
    assert!(world.get_entity(stray).is_err());
}

#[test]
fn unregistered_template_is_rejected() {
    let mut world = pooled_world(PoolSettings::default());
    let missing = TemplateId(7);

    let err = with_pools(&mut world, |pools, host| {
        pools.spawn(host, missing, Vec3::ZERO, Quat::IDENTITY)
    })
    .unwrap_err();

    assert_eq!(err, PoolError::UnknownTemplate(missing));
    assert_eq!(world.query::<&Pooled>().iter(&world).count(), 0);
}

#[test]
fn library_names_pooled_entities_after_the_template() {
    let (mut world, template) = world_with_template();
    assert_eq!(world.resource::<TemplateLibrary>().name(template), Some("Crate"));

    let unit = with_pools(&mut world, |pools, host| {
        pools.spawn(host, template, Vec3::ZERO, Quat::IDENTITY)
    })
    .unwrap();

    assert_eq!(world.get::<Name>(unit.instance()).unwrap().as_str(), "Crate(Pooled)");
}

// --------------------------------------------------------------------------------------
// Request pipeline
// --------------------------------------------------------------------------------------

#[test]
fn requests_apply_in_order_and_report_spawns() {
    let (mut world, template) = world_with_template();
    init_messages(&mut world);

    world.write_message(PoolRequest::spawn(template, Vec3::X));
    world.write_message(PoolRequest::spawn(template, Vec3::Y));
    world.write_message(PoolRequest::spawn(template, Vec3::Z));
    world.write_message(PoolRequest::DespawnNewest { template });

    run_system_once(&mut world, systems::apply_pool_requests);

    assert_eq!(world.resource::<Messages<UnitSpawned>>().len(), 3);
    assert!(world.resource::<Messages<PoolRequest>>().is_empty());

    let pools = world.resource::<super::EntityPools>();
    let pool = pools.pool(template).unwrap();
    assert_eq!(pool.active_len(), 2);
    assert_eq!(pool.total(), PoolSettings::DEFAULT_AMOUNT);
}

#[test]
fn failed_requests_do_not_stop_the_batch() {
    let (mut world, template) = world_with_template();
    let never_spawned = register(&mut world, "Barrel");
    init_messages(&mut world);

    world.write_message(PoolRequest::Collect { template: never_spawned });
    world.write_message(PoolRequest::DespawnOldest { template: never_spawned });
    world.write_message(PoolRequest::spawn(template, Vec3::ZERO));

    run_system_once(&mut world, systems::apply_pool_requests);

    assert_eq!(world.resource::<Messages<UnitSpawned>>().len(), 1);
    assert!(!world.resource::<super::EntityPools>().contains(never_spawned));
}

#[test]
fn collect_all_request_returns_everything() {
    let (mut world, template) = world_with_template();
    init_messages(&mut world);

    for x in 0..3 {
        world.write_message(PoolRequest::spawn(template, Vec3::X * x as f32));
    }
    world.write_message(PoolRequest::CollectAll);
    run_system_once(&mut world, systems::apply_pool_requests);

    let active = world
        .query::<&UnitState>()
        .iter(&world)
        .filter(|s| **s == UnitState::Active)
        .count();
    assert_eq!(active, 0);
    assert_eq!(world.resource::<super::EntityPools>().pool(template).unwrap().free_len(), 10);
}

#[test]
fn spawn_under_request_parents_fresh_units() {
    let (mut world, template) = world_with_template();
    init_messages(&mut world);
    let holder = world.spawn(Transform::default()).id();
    with_pools(&mut world, |pools, host| pools.preload(host, template, 0, None)).unwrap();

    world.write_message(PoolRequest::spawn_under(template, Vec3::Y, Quat::IDENTITY, holder));
    run_system_once(&mut world, systems::apply_pool_requests);

    let mut q = world.query::<(&Pooled, &ChildOf)>();
    let parents: Vec<Entity> = q.iter(&world).map(|(_, c)| c.parent()).collect();
    assert_eq!(parents, vec![holder]);
}

#[test]
fn parented_units_are_placed_and_reported_in_world_space() {
    let (mut world, template) = world_with_template();
    let turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    let holder = world.spawn(Transform::from_xyz(10.0, 0.0, 0.0).with_rotation(turn)).id();
    let target = Vec3::new(10.0, 5.0, 0.0);

    let unit = with_pools(&mut world, |pools, host| {
        pools.preload(host, template, 0, None)?;
        pools.spawn_with_parent(host, template, target, turn, holder)
    })
    .unwrap();

    // The holder's quarter turn maps its local +X onto world +Y.
    let local = unit.transform(&world).unwrap();
    assert!(local.translation.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
    assert!(local.rotation.abs_diff_eq(Quat::IDENTITY, 1e-4));
    assert!(world_transform(&world, unit.instance()).unwrap().translation().abs_diff_eq(target, 1e-4));

    let reported = with_pools(&mut world, |pools, host| {
        pools.first_active_position(&*host, template, Vec3::ZERO)
    })
    .unwrap();
    assert!(reported.abs_diff_eq(target, 1e-4));
}
