//! Type-id interaction filtering
//!
//! Collider type ids are small host-defined integers. Id 0 is inert and never
//! interacts; every other pair interacts unless it was explicitly ignored.

use std::collections::HashSet;

use super::collider::TYPE_NONE;

/// Symmetric table of type-id pairs that never interact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    ignored: HashSet<(u32, u32)>,
}

impl TypeFilter {
    /// A filter where every non-inert pair interacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from a list of ignored pairs
    pub fn from_ignored(pairs: &[(u32, u32)]) -> Self {
        let mut filter = Self::new();
        for &(a, b) in pairs {
            filter.ignore(a, b);
        }
        filter
    }

    /// Stop `a` and `b` from interacting (in both orders)
    pub fn ignore(&mut self, a: u32, b: u32) {
        self.ignored.insert(ordered(a, b));
    }

    /// Let `a` and `b` interact again
    pub fn allow(&mut self, a: u32, b: u32) {
        self.ignored.remove(&ordered(a, b));
    }

    /// Check if two colliders of these types should be tested against each other
    ///
    /// # Example
    /// ```
    /// use collision_engine::physics::TypeFilter;
    ///
    /// const PLAYER: u32 = 1;
    /// const PICKUP: u32 = 2;
    ///
    /// let mut filter = TypeFilter::new();
    /// filter.ignore(PICKUP, PICKUP);
    ///
    /// assert!(filter.should_interact(PLAYER, PICKUP));
    /// assert!(!filter.should_interact(PICKUP, PICKUP));
    /// assert!(!filter.should_interact(0, PLAYER));
    /// ```
    pub fn should_interact(&self, a: u32, b: u32) -> bool {
        a != TYPE_NONE && b != TYPE_NONE && !self.ignored.contains(&ordered(a, b))
    }

    /// Ignored pairs, smaller id first
    pub fn ignored_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.ignored.iter().copied()
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
