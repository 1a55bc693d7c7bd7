//! Collision world: registry, pairwise sweep and contact lifecycle
//!
//! Every tick the world refreshes each collider from its transform, tests all
//! unordered pairs of eligible colliders (brute force, there is no broad
//! phase) and derives enter/stay/exit notifications from the persistent set of
//! touching pairs. A pair is either touching or not; the transitions between
//! the two are exactly the events dispatched.

use std::collections::HashSet;

use crate::config::{CollisionConfig, ConfigError};
use crate::foundation::collections::{ColliderHandle, HandleMap, SecondaryMap, TransformKey};

use super::collider::Collider;
use super::direction::{HitDirection, HitDirectionBits};
use super::listener::{CollisionContext, CollisionListener};
use super::narrow_phase::{check_with_direction, NarrowPhaseOptions, Overlap};
use super::transform::TransformProvider;
use super::type_filter::TypeFilter;

/// Errors reported by the registration API
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// The handle does not name a registered collider
    #[error("collider {0:?} is not registered")]
    NotFound(ColliderHandle),
}

/// Unordered pair of colliders (smaller handle stored first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller handle
    pub a: ColliderHandle,
    /// Larger handle
    pub b: ColliderHandle,
}

impl CollisionPair {
    /// Create a pair; argument order does not matter
    pub fn new(a: ColliderHandle, b: ColliderHandle) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Whether `handle` is one side of the pair
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.a == handle || self.b == handle
    }

    /// The side that is not `handle`
    pub fn other(&self, handle: ColliderHandle) -> Option<ColliderHandle> {
        if self.a == handle {
            Some(self.b)
        } else if self.b == handle {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Counters for one call to [`CollisionWorld::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Registered colliders at the start of the tick
    pub colliders: usize,
    /// Pairs that passed filtering and reached the narrow phase
    pub pairs_tested: usize,
    /// Pairs found overlapping
    pub contacts: usize,
    /// Pairs that started touching
    pub entered: usize,
    /// Pairs that stopped touching
    pub exited: usize,
}

#[derive(Debug, Clone, Copy)]
enum Notification {
    Enter,
    EnterDirection(HitDirection),
    Stay,
    Direction(HitDirection),
    Exit,
}

/// Owns the collider registry and runs the per-tick sweep
pub struct CollisionWorld {
    config: CollisionConfig,
    narrow_phase: NarrowPhaseOptions,
    type_filter: TypeFilter,
    colliders: HandleMap<ColliderHandle, Collider>,
    listeners: SecondaryMap<ColliderHandle, Box<dyn CollisionListener>>,
    touching: HashSet<CollisionPair>,
    pending_removals: Vec<ColliderHandle>,
    sweep_order: Vec<ColliderHandle>,
}

impl CollisionWorld {
    /// Create a world with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(CollisionConfig::default())
    }

    /// Create a world from a configuration, validating it first
    pub fn with_config(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CollisionConfig) -> Self {
        log::debug!("Creating collision world with {:?}", config);
        Self {
            narrow_phase: config.narrow_phase(),
            type_filter: config.type_filter(),
            config,
            colliders: HandleMap::with_key(),
            listeners: SecondaryMap::new(),
            touching: HashSet::new(),
            pending_removals: Vec::new(),
            sweep_order: Vec::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Type filter, for adjusting which type ids interact at runtime
    pub fn type_filter_mut(&mut self) -> &mut TypeFilter {
        &mut self.type_filter
    }

    /// Register a collider without a listener
    pub fn register(&mut self, collider: Collider) -> ColliderHandle {
        let kind = collider.shape().kind_name();
        let type_id = collider.type_id();
        let handle = self.colliders.insert(collider);
        log::debug!("Registered {} collider {:?} (type {})", kind, handle, type_id);
        handle
    }

    /// Register a collider together with the listener that receives its events
    pub fn register_with_listener<L>(&mut self, collider: Collider, listener: L) -> ColliderHandle
    where
        L: CollisionListener + 'static,
    {
        let handle = self.register(collider);
        self.listeners.insert(handle, Box::new(listener));
        handle
    }

    /// Install or replace the listener of a collider, returning the previous one
    pub fn set_listener(
        &mut self,
        handle: ColliderHandle,
        listener: Box<dyn CollisionListener>,
    ) -> Result<Option<Box<dyn CollisionListener>>, CollisionError> {
        if !self.colliders.contains_key(handle) {
            return Err(CollisionError::NotFound(handle));
        }
        Ok(self.listeners.insert(handle, listener))
    }

    /// Remove a collider, its listener and every touching pair that names it.
    ///
    /// No exit events are sent for the purged pairs.
    pub fn deregister(&mut self, handle: ColliderHandle) -> Result<Collider, CollisionError> {
        let collider = self
            .colliders
            .remove(handle)
            .ok_or(CollisionError::NotFound(handle))?;
        self.listeners.remove(handle);
        self.pending_removals.retain(|pending| *pending != handle);
        let purged = self.purge_pairs(handle);
        log::debug!("Deregistered collider {:?}, purged {} touching pairs", handle, purged);
        Ok(collider)
    }

    fn purge_pairs(&mut self, handle: ColliderHandle) -> usize {
        let before = self.touching.len();
        self.touching.retain(|pair| !pair.contains(handle));
        before - self.touching.len()
    }

    /// Get a registered collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Get a registered collider mutably
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    /// Enable or disable a collider
    pub fn set_active(&mut self, handle: ColliderHandle, active: bool) -> Result<(), CollisionError> {
        self.collider_mut(handle)
            .map(|collider| collider.set_active(active))
            .ok_or(CollisionError::NotFound(handle))
    }

    /// Bind a collider to another transform
    pub fn attach(&mut self, handle: ColliderHandle, key: TransformKey) -> Result<(), CollisionError> {
        self.collider_mut(handle)
            .map(|collider| collider.attach(key))
            .ok_or(CollisionError::NotFound(handle))
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// True if no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Handles of all registered colliders
    pub fn handles(&self) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.colliders.keys()
    }

    /// Whether two colliders were touching at the end of the last tick
    pub fn is_touching(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.touching.contains(&CollisionPair::new(a, b))
    }

    /// All pairs touching at the end of the last tick
    pub fn touching_pairs(&self) -> impl Iterator<Item = &CollisionPair> {
        self.touching.iter()
    }

    /// Colliders touching `handle` at the end of the last tick
    pub fn contacts_of(&self, handle: ColliderHandle) -> Vec<ColliderHandle> {
        self.touching
            .iter()
            .filter_map(|pair| pair.other(handle))
            .collect()
    }

    /// Best-matching direction from `this` towards `other`, in `this`'s frame
    pub fn self_local_hit_direction(
        &self,
        this: ColliderHandle,
        other: ColliderHandle,
    ) -> Result<HitDirection, CollisionError> {
        let (this, other) = self.both(this, other)?;
        Ok(this.self_local_hit_direction(other))
    }

    /// Directions from `this` towards `other` within the configured flags threshold
    pub fn self_local_hit_direction_flags(
        &self,
        this: ColliderHandle,
        other: ColliderHandle,
    ) -> Result<HitDirectionBits, CollisionError> {
        self.self_local_hit_direction_flags_with(this, other, self.config.flags_threshold)
    }

    /// Directions from `this` towards `other` within `threshold`
    pub fn self_local_hit_direction_flags_with(
        &self,
        this: ColliderHandle,
        other: ColliderHandle,
        threshold: f32,
    ) -> Result<HitDirectionBits, CollisionError> {
        let (this, other) = self.both(this, other)?;
        Ok(this.self_local_hit_direction_flags(other, threshold))
    }

    /// Single direction from `this` towards `other`, or `None` outside the
    /// configured direction threshold
    pub fn self_local_hit_direction_simple(
        &self,
        this: ColliderHandle,
        other: ColliderHandle,
    ) -> Result<HitDirection, CollisionError> {
        let (this, other) = self.both(this, other)?;
        Ok(this.self_local_hit_direction_simple(other, self.config.direction_threshold))
    }

    fn both(
        &self,
        a: ColliderHandle,
        b: ColliderHandle,
    ) -> Result<(&Collider, &Collider), CollisionError> {
        let first = self.collider(a).ok_or(CollisionError::NotFound(a))?;
        let second = self.collider(b).ok_or(CollisionError::NotFound(b))?;
        Ok((first, second))
    }

    /// Drop every collider, listener and touching pair without sending events
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.listeners.clear();
        self.touching.clear();
        self.pending_removals.clear();
    }

    /// Run one collision step.
    ///
    /// Refreshes every collider from `transforms`, then tests each unordered
    /// pair once. For a pair that overlaps and was not touching, both sides
    /// get `on_enter` (plus `on_enter_direction` when a direction exists); every
    /// overlapping pair, entering or not, then gets `on_stay` (plus
    /// `on_direction`). A pair that stops overlapping, or stops being eligible,
    /// gets `on_exit` on both sides.
    pub fn tick(&mut self, transforms: &dyn TransformProvider) -> TickStats {
        let mut stats = TickStats {
            colliders: self.colliders.len(),
            ..TickStats::default()
        };

        self.refresh_shapes(transforms);

        let mut order = std::mem::take(&mut self.sweep_order);
        order.clear();
        order.extend(self.colliders.keys());
        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                self.step_pair(a, b, &mut stats);
            }
        }
        self.sweep_order = order;

        self.apply_pending_removals();

        log::trace!("Collision tick: {:?}", stats);
        stats
    }

    fn refresh_shapes(&mut self, transforms: &dyn TransformProvider) {
        for (handle, collider) in &mut self.colliders {
            let was_attached = collider.is_attached();
            let attached = collider.refresh(transforms);
            if was_attached && !attached {
                log::warn!(
                    "Collider {:?} lost its transform; skipping it until reattached",
                    handle
                );
            } else if !was_attached && attached {
                log::debug!("Collider {:?} attached to its transform", handle);
            }
        }
    }

    fn step_pair(&mut self, a: ColliderHandle, b: ColliderHandle, stats: &mut TickStats) {
        if self.is_pending_removal(a) || self.is_pending_removal(b) {
            return;
        }

        let pair = CollisionPair::new(a, b);
        let was_touching = self.touching.contains(&pair);

        let overlap = if self.is_eligible(a, b) {
            stats.pairs_tested += 1;
            self.test_pair(a, b)
        } else {
            None
        };

        match overlap {
            Some(hit) => {
                stats.contacts += 1;
                if !was_touching {
                    self.touching.insert(pair);
                    stats.entered += 1;
                    self.notify_both(a, b, Notification::Enter, Notification::Enter);
                    self.notify_directions(a, b, hit, Notification::EnterDirection);
                }
                self.notify_both(a, b, Notification::Stay, Notification::Stay);
                self.notify_directions(a, b, hit, Notification::Direction);
            }
            None if was_touching => {
                self.touching.remove(&pair);
                stats.exited += 1;
                self.notify_both(a, b, Notification::Exit, Notification::Exit);
            }
            None => {}
        }
    }

    fn is_eligible(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        match (self.colliders.get(a), self.colliders.get(b)) {
            (Some(first), Some(second)) => {
                first.is_active()
                    && second.is_active()
                    && self
                        .type_filter
                        .should_interact(first.type_id(), second.type_id())
            }
            _ => false,
        }
    }

    fn test_pair(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Overlap> {
        let first = self.colliders.get(a)?;
        let second = self.colliders.get(b)?;
        check_with_direction(
            first.shape(),
            &first.basis(),
            second.shape(),
            &second.basis(),
            &self.narrow_phase,
        )
    }

    fn notify_both(
        &mut self,
        a: ColliderHandle,
        b: ColliderHandle,
        for_a: Notification,
        for_b: Notification,
    ) {
        self.notify(a, b, for_a);
        self.notify(b, a, for_b);
    }

    fn notify_directions(
        &mut self,
        a: ColliderHandle,
        b: ColliderHandle,
        hit: Overlap,
        kind: fn(HitDirection) -> Notification,
    ) {
        if hit.direction_a.is_some() {
            self.notify(a, b, kind(hit.direction_a));
        }
        if hit.direction_b.is_some() {
            self.notify(b, a, kind(hit.direction_b));
        }
    }

    fn notify(&mut self, this: ColliderHandle, other: ColliderHandle, notification: Notification) {
        if self.is_pending_removal(this) || self.is_pending_removal(other) {
            return;
        }
        let Some(mut listener) = self.listeners.remove(this) else {
            return;
        };

        log::trace!("{:?} -> {:?}: {:?}", this, other, notification);
        {
            let mut ctx = CollisionContext::new(this, &mut self.colliders, &mut self.pending_removals);
            match notification {
                Notification::Enter => listener.on_enter(&mut ctx, other),
                Notification::EnterDirection(direction) => {
                    listener.on_enter_direction(&mut ctx, other, direction);
                }
                Notification::Stay => listener.on_stay(&mut ctx, other),
                Notification::Direction(direction) => listener.on_direction(&mut ctx, other, direction),
                Notification::Exit => listener.on_exit(&mut ctx, other),
            }
        }
        self.listeners.insert(this, listener);
    }

    fn is_pending_removal(&self, handle: ColliderHandle) -> bool {
        self.pending_removals.contains(&handle)
    }

    fn apply_pending_removals(&mut self) {
        for handle in std::mem::take(&mut self.pending_removals) {
            debug_assert!(
                self.colliders.contains_key(handle),
                "pending removal of unknown collider {handle:?}"
            );
            if self.colliders.remove(handle).is_some() {
                self.listeners.remove(handle);
                let purged = self.purge_pairs(handle);
                log::debug!(
                    "Deregistered collider {:?} during tick, purged {} touching pairs",
                    handle,
                    purged
                );
            }
        }
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}
