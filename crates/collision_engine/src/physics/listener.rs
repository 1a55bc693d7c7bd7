//! Collision callbacks
//!
//! Game objects implement [`CollisionListener`] to hear about contacts. Every
//! callback runs synchronously inside `CollisionWorld::tick` and receives a
//! [`CollisionContext`] through which it may disable or deregister colliders;
//! such changes are visible to the pairs tested later in the same tick.

use crate::foundation::collections::{ColliderHandle, HandleMap};

use super::collider::Collider;
use super::direction::HitDirection;

/// Callbacks for one collider. All methods default to doing nothing.
pub trait CollisionListener {
    /// First tick of contact with `other`
    fn on_enter(&mut self, _ctx: &mut CollisionContext<'_>, _other: ColliderHandle) {}

    /// First tick of contact with `other`, with the face that was struck
    fn on_enter_direction(
        &mut self,
        _ctx: &mut CollisionContext<'_>,
        _other: ColliderHandle,
        _direction: HitDirection,
    ) {
    }

    /// Every tick of contact with `other`, including the first
    fn on_stay(&mut self, _ctx: &mut CollisionContext<'_>, _other: ColliderHandle) {}

    /// Every tick of contact with `other`, with the face that was struck
    fn on_direction(
        &mut self,
        _ctx: &mut CollisionContext<'_>,
        _other: ColliderHandle,
        _direction: HitDirection,
    ) {
    }

    /// First tick after contact with `other` ended
    fn on_exit(&mut self, _ctx: &mut CollisionContext<'_>, _other: ColliderHandle) {}
}

/// What a listener may see and change while being notified
pub struct CollisionContext<'a> {
    this: ColliderHandle,
    colliders: &'a mut HandleMap<ColliderHandle, Collider>,
    pending_removals: &'a mut Vec<ColliderHandle>,
}

impl<'a> CollisionContext<'a> {
    pub(crate) fn new(
        this: ColliderHandle,
        colliders: &'a mut HandleMap<ColliderHandle, Collider>,
        pending_removals: &'a mut Vec<ColliderHandle>,
    ) -> Self {
        Self {
            this,
            colliders,
            pending_removals,
        }
    }

    /// Handle of the collider being notified
    pub fn this(&self) -> ColliderHandle {
        self.this
    }

    /// Read any live collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        if self.is_pending_removal(handle) {
            return None;
        }
        self.colliders.get(handle)
    }

    /// Type id of a live collider
    pub fn type_id_of(&self, handle: ColliderHandle) -> Option<u32> {
        self.collider(handle).map(Collider::type_id)
    }

    /// Enable or disable a collider; returns false for an unknown handle
    pub fn set_active(&mut self, handle: ColliderHandle, active: bool) -> bool {
        if self.is_pending_removal(handle) {
            return false;
        }
        match self.colliders.get_mut(handle) {
            Some(collider) => {
                collider.set_active(active);
                true
            }
            None => false,
        }
    }

    /// Deregister a collider at the end of the current tick.
    ///
    /// From now on the collider is skipped and receives no further events.
    /// Returns false if it is unknown or already scheduled.
    pub fn deregister(&mut self, handle: ColliderHandle) -> bool {
        if !self.colliders.contains_key(handle) || self.is_pending_removal(handle) {
            return false;
        }
        self.pending_removals.push(handle);
        true
    }

    fn is_pending_removal(&self, handle: ColliderHandle) -> bool {
        self.pending_removals.contains(&handle)
    }
}
