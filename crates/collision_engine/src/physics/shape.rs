//! World-space collision volumes
//!
//! Pure data recomputed from a collider's transform every tick. The overlap
//! tests live in [`super::narrow_phase`].

use serde::{Deserialize, Serialize};

use crate::foundation::math::{is_finite, sort_components, Basis, Quat, Vec3};

/// A bounding sphere in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A sphere collides only with a finite center and a finite, non-negative radius.
    pub fn is_valid(&self) -> bool {
        is_finite(&self.center) && self.radius.is_finite() && self.radius >= 0.0
    }
}

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners, sorting them component-wise
    pub fn new(a: Vec3, b: Vec3) -> Self {
        let (min, max) = sort_components(a, b);
        Self { min, max }
    }

    /// Creates a box from its center and half-size
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        Self::new(center - half_size, center + half_size)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Corners must be finite and ordered.
    pub fn is_valid(&self) -> bool {
        is_finite(&self.min)
            && is_finite(&self.max)
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// The same volume as an unrotated oriented box
    pub fn to_obb(&self) -> Obb {
        Obb::new(self.center(), self.half_size(), Quat::identity())
    }
}

/// An oriented box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    /// Center of the box
    pub center: Vec3,
    /// Half extents along the box's local axes
    pub half_extents: Vec3,
    /// Orientation of the local axes
    pub rotation: Quat,
}

impl Obb {
    /// Creates a new oriented box
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Creates a box whose rotation is given as Euler angles (radians)
    pub fn from_euler(center: Vec3, half_extents: Vec3, euler: Vec3) -> Self {
        Self::new(center, half_extents, crate::foundation::math::quat_from_euler(euler))
    }

    /// Local axes in world space
    pub fn basis(&self) -> Basis {
        Basis::from_rotation(&self.rotation)
    }

    /// Radius of the sphere enclosing the box
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents.norm()
    }

    /// Center and extents must be finite, extents non-negative.
    pub fn is_valid(&self) -> bool {
        is_finite(&self.center)
            && is_finite(&self.half_extents)
            && self.half_extents.iter().all(|h| *h >= 0.0)
            && self.rotation.coords.iter().all(|c| c.is_finite())
    }
}

/// The closed set of volumes a collider can take
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Sphere volume
    Sphere(Sphere),
    /// Axis-aligned box volume
    Aabb(Aabb),
    /// Oriented box volume
    Obb(Obb),
}

impl Shape {
    /// Geometric center of the volume
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.center,
            Self::Aabb(aabb) => aabb.center(),
            Self::Obb(obb) => obb.center,
        }
    }

    /// Short name of the variant, for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
            Self::Aabb(_) => "aabb",
            Self::Obb(_) => "obb",
        }
    }

    /// Whether the volume's numbers allow it to collide at all
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Sphere(sphere) => sphere.is_valid(),
            Self::Aabb(aabb) => aabb.is_valid(),
            Self::Obb(obb) => obb.is_valid(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Aabb> for Shape {
    fn from(aabb: Aabb) -> Self {
        Self::Aabb(aabb)
    }
}

impl From<Obb> for Shape {
    fn from(obb: Obb) -> Self {
        Self::Obb(obb)
    }
}
