//! Collision detection for game objects
//!
//! Colliders (spheres, axis-aligned boxes, oriented boxes) are registered with
//! a [`CollisionWorld`], follow externally owned transforms, and are tested
//! pairwise once per tick. Overlaps are reported to [`CollisionListener`]s as
//! enter/stay/exit transitions, optionally tagged with the struck face.

pub mod collider;
pub mod collision_system;
pub mod direction;
pub mod listener;
pub mod narrow_phase;
pub mod shape;
pub mod transform;
pub mod type_filter;

#[cfg(test)]
mod tests;

pub use collider::{Collider, ColliderDesc, TYPE_NONE};
pub use collision_system::{CollisionError, CollisionPair, CollisionWorld, TickStats};
pub use direction::{HitDirection, HitDirectionBits, DEFAULT_DIRECTION_THRESHOLD};
pub use listener::{CollisionContext, CollisionListener};
pub use narrow_phase::{Contact, NarrowPhaseOptions, Overlap};
pub use shape::{Aabb, Obb, Shape, Sphere};
pub use transform::{TransformProvider, TransformStore, WorldTransform};
pub use type_filter::TypeFilter;
