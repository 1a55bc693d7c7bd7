//! # Collision Engine
//!
//! Collision detection and directional contact resolution for game objects.
//!
//! ## Features
//!
//! - **Shapes**: spheres, axis-aligned boxes and oriented boxes
//! - **Narrow Phase**: exact pairwise tests, including a 15-axis SAT for oriented boxes
//! - **Hit Directions**: which face of each collider was struck, in its own frame
//! - **Contact Lifecycle**: enter/stay/exit callbacks, once per contact episode
//! - **Configuration**: TOML or RON files through the shared `Config` trait
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! struct Printer;
//!
//! impl CollisionListener for Printer {
//!     fn on_enter(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
//!         println!("{:?} hit {:?}", ctx.this(), other);
//!     }
//! }
//!
//! let mut transforms = TransformStore::new();
//! let mut world = CollisionWorld::new();
//!
//! let ship = transforms.insert(WorldTransform::from_position(Vec3::new(0.0, 0.0, 0.0)));
//! let rock = transforms.insert(WorldTransform::from_position(Vec3::new(1.5, 0.0, 0.0)));
//!
//! world.register_with_listener(Collider::new(ColliderDesc::sphere(1.0), 1).with_transform(ship), Printer);
//! world.register(Collider::new(ColliderDesc::cube(1.0), 2).with_transform(rock));
//!
//! let stats = world.tick(&transforms);
//! assert_eq!(stats.entered, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        foundation::{
            collections::{ColliderHandle, TransformKey},
            math::{Quat, Vec3},
        },
        physics::{
            Collider, ColliderDesc, CollisionContext, CollisionError, CollisionListener,
            CollisionWorld, HitDirection, HitDirectionBits, TickStats, TransformProvider,
            TransformStore, WorldTransform,
        },
    };
}
