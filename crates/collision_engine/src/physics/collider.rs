//! Colliders: a shape descriptor bound to an external transform
//!
//! A collider stores its geometry relative to its owner (the descriptor) and
//! recomputes the world-space [`Shape`] from the owner's transform every tick.
//! The world-space shape is never accumulated incrementally.

use serde::{Deserialize, Serialize};

use crate::foundation::collections::TransformKey;
use crate::foundation::math::{quat_from_euler, Basis, Quat, Vec3};

use super::direction::{classify, classify_flags, classify_within, HitDirection, HitDirectionBits};
use super::shape::{Aabb, Obb, Shape, Sphere};
use super::transform::{TransformProvider, WorldTransform};

/// Type id reserved for inert colliders, which are never tested
pub const TYPE_NONE: u32 = 0;

/// Local geometry of a collider, relative to its owner's transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderDesc {
    /// Sphere; not scaled by the owner's scale
    Sphere {
        /// Base radius
        radius: f32,
        /// Added to the base radius
        radius_offset: f32,
        /// Added to the owner's position (world frame)
        center_offset: Vec3,
    },
    /// Axis-aligned box; its size is scaled by the owner's scale and it is
    /// centered on the owner's position
    Aabb {
        /// Local minimum corner
        min: Vec3,
        /// Local maximum corner
        max: Vec3,
    },
    /// Oriented box
    Obb {
        /// Half extents before scaling
        half_extents: Vec3,
        /// Offset from the owner's position, in the owner's frame
        center_offset: Vec3,
        /// Rotation applied in the owner's frame
        rotation: Quat,
    },
}

impl ColliderDesc {
    /// Sphere of the given radius centered on the owner
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            radius_offset: 0.0,
            center_offset: Vec3::zeros(),
        }
    }

    /// Axis-aligned box spanning `min..max` before scaling
    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Self::Aabb { min, max }
    }

    /// Axis-aligned cube with the given half size
    pub fn cube(half_size: f32) -> Self {
        let half = Vec3::new(half_size, half_size, half_size);
        Self::aabb(-half, half)
    }

    /// Oriented box with the given half extents, aligned with the owner
    pub fn obb(half_extents: Vec3) -> Self {
        Self::Obb {
            half_extents,
            center_offset: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    /// Builder pattern: Set the center offset (ignored by axis-aligned boxes)
    pub fn with_center_offset(mut self, offset: Vec3) -> Self {
        match &mut self {
            Self::Sphere { center_offset, .. } | Self::Obb { center_offset, .. } => {
                *center_offset = offset;
            }
            Self::Aabb { .. } => {}
        }
        self
    }

    /// Builder pattern: Set the radius offset (spheres only)
    pub fn with_radius_offset(mut self, offset: f32) -> Self {
        if let Self::Sphere { radius_offset, .. } = &mut self {
            *radius_offset = offset;
        }
        self
    }

    /// Builder pattern: Set the local rotation from Euler angles (oriented boxes only)
    pub fn with_rotation_euler(mut self, euler: Vec3) -> Self {
        if let Self::Obb { rotation, .. } = &mut self {
            *rotation = quat_from_euler(euler);
        }
        self
    }

    /// World-space shape for an owner at `transform`
    pub fn shape_at(&self, transform: &WorldTransform) -> Shape {
        match *self {
            Self::Sphere {
                radius,
                radius_offset,
                center_offset,
            } => Shape::Sphere(Sphere::new(
                transform.position + center_offset,
                radius + radius_offset,
            )),
            Self::Aabb { min, max } => {
                let half = (max - min).component_mul(&transform.scale) * 0.5;
                let center = transform.position;
                Shape::Aabb(Aabb::new(center - half, center + half))
            }
            Self::Obb {
                half_extents,
                center_offset,
                rotation,
            } => Shape::Obb(Obb::new(
                transform.position + transform.rotation * center_offset,
                half_extents.component_mul(&transform.scale.abs()),
                transform.rotation * rotation,
            )),
        }
    }
}

/// A registered collision volume
#[derive(Debug, Clone)]
pub struct Collider {
    desc: ColliderDesc,
    shape: Shape,
    orientation: Quat,
    transform: Option<TransformKey>,
    type_id: u32,
    active: bool,
    attached: bool,
}

impl Collider {
    /// Create a collider with the given type id, not yet bound to a transform
    pub fn new(desc: ColliderDesc, type_id: u32) -> Self {
        let origin = WorldTransform::identity();
        Self {
            desc,
            shape: desc.shape_at(&origin),
            orientation: origin.rotation,
            transform: None,
            type_id,
            active: true,
            attached: false,
        }
    }

    /// Builder pattern: Bind to a transform
    pub fn with_transform(mut self, key: TransformKey) -> Self {
        self.transform = Some(key);
        self
    }

    /// Builder pattern: Start inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Recompute the shape from the bound transform.
    ///
    /// If the transform is missing the shape keeps its last value and the
    /// collider counts as detached until a later refresh finds it again.
    /// Detachment is a recoverable state in every build profile: debug builds
    /// do not assert on it, `CollisionWorld` only logs a warning.
    /// Returns whether the collider is attached afterwards.
    pub fn refresh(&mut self, transforms: &dyn TransformProvider) -> bool {
        match self.transform.and_then(|key| transforms.world_transform(key)) {
            Some(transform) => {
                self.shape = self.desc.shape_at(&transform);
                self.orientation = transform.rotation;
                self.attached = true;
            }
            None => self.attached = false,
        }
        self.attached
    }

    /// Rebind to another transform; takes effect on the next refresh
    pub fn attach(&mut self, key: TransformKey) {
        self.transform = Some(key);
    }

    /// Unbind from the transform; the collider stops colliding on the next refresh
    pub fn detach(&mut self) {
        self.transform = None;
    }

    /// The local geometry
    pub fn desc(&self) -> &ColliderDesc {
        &self.desc
    }

    /// The world-space shape as of the last refresh
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The bound transform, if any
    pub fn transform(&self) -> Option<TransformKey> {
        self.transform
    }

    /// Host-defined type id; [`TYPE_NONE`] marks an inert collider
    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    /// Change the type id
    pub fn set_type_id(&mut self, type_id: u32) {
        self.type_id = type_id;
    }

    /// Enable or disable the collider
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Enabled by the host and bound to a live transform
    pub fn is_active(&self) -> bool {
        self.active && self.attached
    }

    /// Whether the last refresh found the transform
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Local axes used to classify hit directions.
    ///
    /// Axis-aligned boxes always use the world axes.
    pub fn basis(&self) -> Basis {
        match &self.shape {
            Shape::Sphere(_) => Basis::from_rotation(&self.orientation),
            Shape::Aabb(_) => Basis::identity(),
            Shape::Obb(obb) => obb.basis(),
        }
    }

    /// Center of the world-space shape
    pub fn center(&self) -> Vec3 {
        self.shape.center()
    }

    /// Best-matching local direction towards `other`'s center
    pub fn self_local_hit_direction(&self, other: &Collider) -> HitDirection {
        classify(&(other.center() - self.center()), &self.basis())
    }

    /// Every local direction within `threshold` (dot product) of the vector to `other`
    pub fn self_local_hit_direction_flags(&self, other: &Collider, threshold: f32) -> HitDirectionBits {
        classify_flags(&(other.center() - self.center()), &self.basis(), threshold)
    }

    /// Best-matching local direction towards `other`, or `None` unless it is
    /// within `threshold` (dot product) of the vector
    pub fn self_local_hit_direction_simple(&self, other: &Collider, threshold: f32) -> HitDirection {
        classify_within(&(other.center() - self.center()), &self.basis(), threshold)
    }
}
