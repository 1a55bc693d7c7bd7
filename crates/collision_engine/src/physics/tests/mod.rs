//! Scenario tests for the collision world
//!
//! Each scenario drives a `CollisionWorld` through several ticks with
//! recording listeners and checks the resulting event stream.

mod lifecycle;

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::collections::{ColliderHandle, TransformKey};
use crate::foundation::math::Vec3;
use crate::physics::{
    Collider, ColliderDesc, CollisionContext, CollisionListener, CollisionWorld, HitDirection,
    TransformStore, WorldTransform,
};

/// One recorded callback, from the point of view of `this`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Event {
    Enter(ColliderHandle, ColliderHandle),
    EnterDirection(ColliderHandle, ColliderHandle, HitDirection),
    Stay(ColliderHandle, ColliderHandle),
    Direction(ColliderHandle, ColliderHandle, HitDirection),
    Exit(ColliderHandle, ColliderHandle),
}

pub(super) type EventLog = Rc<RefCell<Vec<Event>>>;

/// Listener that appends every callback to a shared log
pub(super) struct Recorder {
    log: EventLog,
}

impl Recorder {
    pub(super) fn new(log: &EventLog) -> Self {
        Self { log: Rc::clone(log) }
    }
}

impl CollisionListener for Recorder {
    fn on_enter(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        self.log.borrow_mut().push(Event::Enter(ctx.this(), other));
    }

    fn on_enter_direction(
        &mut self,
        ctx: &mut CollisionContext<'_>,
        other: ColliderHandle,
        direction: HitDirection,
    ) {
        self.log
            .borrow_mut()
            .push(Event::EnterDirection(ctx.this(), other, direction));
    }

    fn on_stay(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        self.log.borrow_mut().push(Event::Stay(ctx.this(), other));
    }

    fn on_direction(
        &mut self,
        ctx: &mut CollisionContext<'_>,
        other: ColliderHandle,
        direction: HitDirection,
    ) {
        self.log
            .borrow_mut()
            .push(Event::Direction(ctx.this(), other, direction));
    }

    fn on_exit(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        self.log.borrow_mut().push(Event::Exit(ctx.this(), other));
    }
}

/// World, transforms and a shared event log
pub(super) struct Scene {
    pub world: CollisionWorld,
    pub transforms: TransformStore,
    pub log: EventLog,
}

impl Scene {
    pub(super) fn new() -> Self {
        crate::foundation::logging::init_for_tests();
        Self {
            world: CollisionWorld::new(),
            transforms: TransformStore::new(),
            log: EventLog::default(),
        }
    }

    /// Register a recorded collider of type 1 at `position`
    pub(super) fn spawn(&mut self, desc: ColliderDesc, position: Vec3) -> (ColliderHandle, TransformKey) {
        self.spawn_typed(desc, position, 1)
    }

    pub(super) fn spawn_typed(
        &mut self,
        desc: ColliderDesc,
        position: Vec3,
        type_id: u32,
    ) -> (ColliderHandle, TransformKey) {
        let key = self.transforms.insert(WorldTransform::from_position(position));
        let collider = Collider::new(desc, type_id).with_transform(key);
        let handle = self
            .world
            .register_with_listener(collider, Recorder::new(&self.log));
        (handle, key)
    }

    pub(super) fn tick(&mut self) -> Vec<Event> {
        self.world.tick(&self.transforms);
        self.log.borrow_mut().drain(..).collect()
    }

    pub(super) fn move_to(&mut self, key: TransformKey, position: Vec3) {
        assert!(self.transforms.set_position(key, position));
    }
}

pub(super) fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}
