//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the few helpers the collision code needs
//! for building rotations and local bases.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Orthonormal local frame of an oriented object.
///
/// `right`, `up` and `forward` are the images of +X, +Y and +Z under the
/// object's rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Local +X in world space
    pub right: Vec3,
    /// Local +Y in world space
    pub up: Vec3,
    /// Local +Z in world space
    pub forward: Vec3,
}

impl Basis {
    /// World axes
    pub fn identity() -> Self {
        Self {
            right: Vec3::x(),
            up: Vec3::y(),
            forward: Vec3::z(),
        }
    }

    /// Build the basis from a rotation, fresh each call.
    pub fn from_rotation(rotation: &Quat) -> Self {
        Self {
            right: rotation * Vec3::x(),
            up: rotation * Vec3::y(),
            forward: rotation * Vec3::z(),
        }
    }

    /// Axes as an array in X, Y, Z order
    pub fn axes(&self) -> [Vec3; 3] {
        [self.right, self.up, self.forward]
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::identity()
    }
}

/// Build a rotation from Euler angles in radians (roll about X, pitch about Y, yaw about Z).
pub fn quat_from_euler(euler: Vec3) -> Quat {
    Quat::from_euler_angles(euler.x, euler.y, euler.z)
}

/// Component-wise minimum and maximum of two vectors, in that order.
pub fn sort_components(a: Vec3, b: Vec3) -> (Vec3, Vec3) {
    (a.inf(&b), a.sup(&b))
}

/// True if every component is finite
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;
}
