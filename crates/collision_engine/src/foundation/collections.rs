//! Handle types for the collider and transform arenas

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to a collider registered with a `CollisionWorld`
    pub struct ColliderHandle;

    /// Stable handle to a transform owned by a `TransformStore`
    pub struct TransformKey;
}

/// Arena of values addressed by `K`
pub type HandleMap<K, T> = SlotMap<K, T>;
