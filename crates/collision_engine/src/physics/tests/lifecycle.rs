//! Enter/stay/exit transitions over several ticks

use super::*;
use crate::physics::TYPE_NONE;

#[test]
fn test_enter_stay_exit_sequence() {
    let mut scene = Scene::new();
    let (a, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    let (b, key_b) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(1.5, 0.0, 0.0));

    // First tick of contact fires enter and stay together
    let first = scene.tick();
    assert_eq!(
        first,
        vec![
            Event::Enter(a, b),
            Event::Enter(b, a),
            Event::EnterDirection(a, b, HitDirection::Right),
            Event::EnterDirection(b, a, HitDirection::Left),
            Event::Stay(a, b),
            Event::Stay(b, a),
            Event::Direction(a, b, HitDirection::Right),
            Event::Direction(b, a, HitDirection::Left),
        ]
    );

    let second = scene.tick();
    assert_eq!(count(&second, |e| matches!(e, Event::Enter(..))), 0);
    assert_eq!(count(&second, |e| matches!(e, Event::Stay(..))), 2);
    assert!(scene.world.is_touching(a, b));

    scene.move_to(key_b, Vec3::new(5.0, 0.0, 0.0));
    let third = scene.tick();
    assert_eq!(third, vec![Event::Exit(a, b), Event::Exit(b, a)]);
    assert!(!scene.world.is_touching(a, b));

    assert!(scene.tick().is_empty());
}

#[test]
fn test_each_transition_fires_once() {
    let mut scene = Scene::new();
    let (_, key_a) = scene.spawn(ColliderDesc::cube(1.0), Vec3::new(10.0, 0.0, 0.0));
    scene.spawn(ColliderDesc::cube(1.0), Vec3::zeros());

    let mut all = Vec::new();
    for x in [10.0, 1.5, 1.0, 1.5, 10.0, 10.0] {
        scene.move_to(key_a, Vec3::new(x, 0.0, 0.0));
        all.extend(scene.tick());
    }

    assert_eq!(count(&all, |e| matches!(e, Event::Enter(..))), 2);
    assert_eq!(count(&all, |e| matches!(e, Event::Exit(..))), 2);
    assert_eq!(count(&all, |e| matches!(e, Event::Stay(..))), 6);
}

#[test]
fn test_touching_spheres_collide() {
    let mut scene = Scene::new();
    let (a, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    let (b, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(2.0, 0.0, 0.0));
    let (c, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(-2.01, 0.0, 0.0));

    scene.tick();
    assert!(scene.world.is_touching(a, b));
    assert!(!scene.world.is_touching(a, c));
}

#[test]
fn test_deregister_purges_without_exit() {
    let mut scene = Scene::new();
    let (a, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    let (b, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(0.5, 0.0, 0.0));
    scene.tick();
    assert!(scene.world.is_touching(a, b));

    scene.world.deregister(b).unwrap();
    assert!(scene.world.contacts_of(a).is_empty());
    assert!(scene.tick().is_empty());

    // A fresh collider in the same place is a new episode
    let (c, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(0.5, 0.0, 0.0));
    let events = scene.tick();
    assert!(events.contains(&Event::Enter(a, c)));
    assert!(events.contains(&Event::Enter(c, a)));
}

#[test]
fn test_disabling_ends_contact_and_enabling_restarts_it() {
    let mut scene = Scene::new();
    let (a, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    let (b, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(0.5, 0.0, 0.0));
    scene.tick();

    scene.world.set_active(b, false).unwrap();
    let events = scene.tick();
    assert_eq!(events, vec![Event::Exit(a, b), Event::Exit(b, a)]);
    assert!(scene.tick().is_empty());

    scene.world.set_active(b, true).unwrap();
    let events = scene.tick();
    assert_eq!(count(&events, |e| matches!(e, Event::Enter(..))), 2);
}

#[test]
fn test_lost_transform_detaches_until_reattached() {
    let mut scene = Scene::new();
    let (a, _) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    let (b, key_b) = scene.spawn(ColliderDesc::sphere(1.0), Vec3::new(0.5, 0.0, 0.0));
    scene.tick();

    scene.transforms.remove(key_b);
    let events = scene.tick();
    assert_eq!(events, vec![Event::Exit(a, b), Event::Exit(b, a)]);
    assert!(!scene.world.collider(b).unwrap().is_attached());
    assert!(scene.tick().is_empty());

    let key = scene
        .transforms
        .insert(WorldTransform::from_position(Vec3::new(0.5, 0.0, 0.0)));
    scene.world.attach(b, key).unwrap();
    let events = scene.tick();
    assert!(events.contains(&Event::Enter(a, b)));
    assert!(scene.world.collider(b).unwrap().is_attached());
}

#[test]
fn test_unbound_collider_never_collides() {
    let mut scene = Scene::new();
    scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    scene.world.register(Collider::new(ColliderDesc::sphere(1.0), 1));

    let stats = scene.world.tick(&scene.transforms);
    assert_eq!(stats.colliders, 2);
    assert_eq!(stats.pairs_tested, 0);
}

#[test]
fn test_invalid_geometry_fails_closed() {
    let mut scene = Scene::new();
    scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    scene.spawn(ColliderDesc::sphere(f32::NAN), Vec3::zeros());
    scene.spawn(ColliderDesc::sphere(-1.0), Vec3::zeros());
    scene.spawn(
        ColliderDesc::obb(Vec3::new(f32::INFINITY, 1.0, 1.0)),
        Vec3::zeros(),
    );
    scene.spawn(ColliderDesc::cube(1.0), Vec3::new(f32::NAN, 0.0, 0.0));

    let events = scene.tick();
    assert!(events.is_empty());
    assert_eq!(scene.world.touching_pairs().count(), 0);
}

#[test]
fn test_inert_and_ignored_types_stay_silent() {
    const WALL: u32 = 3;

    let mut scene = Scene::new();
    scene.world.type_filter_mut().ignore(WALL, WALL);
    scene.spawn_typed(ColliderDesc::cube(1.0), Vec3::zeros(), TYPE_NONE);
    scene.spawn_typed(ColliderDesc::cube(1.0), Vec3::zeros(), WALL);
    scene.spawn_typed(ColliderDesc::cube(1.0), Vec3::zeros(), WALL);

    assert!(scene.tick().is_empty());

    let (probe, _) = scene.spawn_typed(ColliderDesc::sphere(0.5), Vec3::zeros(), 1);
    let events = scene.tick();
    assert_eq!(count(&events, |e| matches!(e, Event::Enter(p, _) if *p == probe)), 2);
}

#[test]
fn test_clear_drops_everything_silently() {
    let mut scene = Scene::new();
    scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    scene.spawn(ColliderDesc::sphere(1.0), Vec3::zeros());
    scene.tick();

    scene.world.clear();
    assert!(scene.world.is_empty());
    assert_eq!(scene.world.touching_pairs().count(), 0);
    assert!(scene.tick().is_empty());
}
