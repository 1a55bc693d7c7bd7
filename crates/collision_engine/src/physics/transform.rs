//! World transforms consumed by colliders
//!
//! Game logic owns the transforms; colliders only hold a [`TransformKey`] into
//! whatever [`TransformProvider`] the host passes to the collision world each
//! tick. A key whose transform was removed simply resolves to nothing.

use serde::{Deserialize, Serialize};

use crate::foundation::collections::{HandleMap, TransformKey};
use crate::foundation::math::{quat_from_euler, Basis, Quat, Vec3};

/// Position, rotation and non-uniform scale of a collidable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    /// World-space translation
    pub position: Vec3,
    /// World-space rotation
    pub rotation: Quat,
    /// Non-uniform scale factors
    pub scale: Vec3,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl WorldTransform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set rotation from Euler angles (radians)
    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.rotation = quat_from_euler(euler);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Local axes of the object
    pub fn basis(&self) -> Basis {
        Basis::from_rotation(&self.rotation)
    }
}

/// Read-only source of world transforms, keyed by [`TransformKey`]
pub trait TransformProvider {
    /// Current transform for `key`, or `None` if the object no longer exists
    fn world_transform(&self, key: TransformKey) -> Option<WorldTransform>;
}

/// Arena of transforms owned by game logic
#[derive(Debug, Default, Clone)]
pub struct TransformStore {
    transforms: HandleMap<TransformKey, WorldTransform>,
}

impl TransformStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform and return its key
    pub fn insert(&mut self, transform: WorldTransform) -> TransformKey {
        self.transforms.insert(transform)
    }

    /// Remove a transform; colliders keyed to it become detached
    pub fn remove(&mut self, key: TransformKey) -> Option<WorldTransform> {
        self.transforms.remove(key)
    }

    /// Get a transform
    pub fn get(&self, key: TransformKey) -> Option<&WorldTransform> {
        self.transforms.get(key)
    }

    /// Get a mutable transform
    pub fn get_mut(&mut self, key: TransformKey) -> Option<&mut WorldTransform> {
        self.transforms.get_mut(key)
    }

    /// Move a transform to a new position, returning false for a dead key
    pub fn set_position(&mut self, key: TransformKey, position: Vec3) -> bool {
        match self.transforms.get_mut(key) {
            Some(transform) => {
                transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Number of live transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True if no transforms are stored
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl TransformProvider for TransformStore {
    fn world_transform(&self, key: TransformKey) -> Option<WorldTransform> {
        self.transforms.get(key).copied()
    }
}
