//! Contact direction classification
//!
//! A direction names the face of a collider that was struck, measured in that
//! collider's own frame: `Right`/`Left` along local ±X, `Top`/`Bottom` along
//! local ±Y and `Front`/`Back` along local ±Z.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Basis, Vec3};

/// Dot-product threshold of the single-best simple query (within ~60° of an axis)
pub const DEFAULT_DIRECTION_THRESHOLD: f32 = 0.5;

/// Which face of a collider a contact arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HitDirection {
    /// No direction could be determined
    #[default]
    None,
    /// Local +Y
    Top,
    /// Local -Y
    Bottom,
    /// Local -X
    Left,
    /// Local +X
    Right,
    /// Local +Z
    Front,
    /// Local -Z
    Back,
}

impl HitDirection {
    /// The six real directions, in tie-breaking order
    pub const ALL: [HitDirection; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Front,
        Self::Back,
    ];

    /// The direction seen from the other side of the contact
    pub fn invert(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Unit vector of this direction in the given frame
    pub fn axis_in(self, basis: &Basis) -> Vec3 {
        match self {
            Self::None => Vec3::zeros(),
            Self::Top => basis.up,
            Self::Bottom => -basis.up,
            Self::Left => -basis.right,
            Self::Right => basis.right,
            Self::Front => basis.forward,
            Self::Back => -basis.forward,
        }
    }

    /// Single-bit flag form
    pub fn bits(self) -> HitDirectionBits {
        match self {
            Self::None => HitDirectionBits::empty(),
            Self::Top => HitDirectionBits::TOP,
            Self::Bottom => HitDirectionBits::BOTTOM,
            Self::Left => HitDirectionBits::LEFT,
            Self::Right => HitDirectionBits::RIGHT,
            Self::Front => HitDirectionBits::FRONT,
            Self::Back => HitDirectionBits::BACK,
        }
    }

    /// True for every variant except `None`
    pub fn is_some(self) -> bool {
        self != Self::None
    }
}

bitflags! {
    /// OR-able set of hit directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HitDirectionBits: u8 {
        /// Local +Y
        const TOP = 1 << 0;
        /// Local -Y
        const BOTTOM = 1 << 1;
        /// Local -X
        const LEFT = 1 << 2;
        /// Local +X
        const RIGHT = 1 << 3;
        /// Local +Z
        const FRONT = 1 << 4;
        /// Local -Z
        const BACK = 1 << 5;
    }
}

impl From<HitDirection> for HitDirectionBits {
    fn from(direction: HitDirection) -> Self {
        direction.bits()
    }
}

/// Direction whose axis best matches `v`, or `None` for a zero or non-finite vector.
///
/// `v` does not need to be normalized. Ties go to the earlier entry of
/// [`HitDirection::ALL`].
pub fn classify(v: &Vec3, basis: &Basis) -> HitDirection {
    best_match(v, basis).map_or(HitDirection::None, |(direction, _)| direction)
}

/// Like [`classify`], but only if the normalized dot product reaches `threshold`.
pub fn classify_within(v: &Vec3, basis: &Basis, threshold: f32) -> HitDirection {
    match best_match(v, basis) {
        Some((direction, dot)) if dot >= threshold => direction,
        _ => HitDirection::None,
    }
}

/// Every direction whose normalized dot product with `v` reaches `threshold`.
pub fn classify_flags(v: &Vec3, basis: &Basis, threshold: f32) -> HitDirectionBits {
    let Some(unit) = normalized(v) else {
        return HitDirectionBits::empty();
    };

    HitDirection::ALL
        .iter()
        .filter(|direction| direction.axis_in(basis).dot(&unit) >= threshold)
        .fold(HitDirectionBits::empty(), |acc, direction| acc | direction.bits())
}

fn best_match(v: &Vec3, basis: &Basis) -> Option<(HitDirection, f32)> {
    let unit = normalized(v)?;

    let mut best = None;
    let mut best_dot = f32::NEG_INFINITY;
    for direction in HitDirection::ALL {
        let dot = direction.axis_in(basis).dot(&unit);
        if dot > best_dot {
            best_dot = dot;
            best = Some(direction);
        }
    }
    best.map(|direction| (direction, best_dot))
}

fn normalized(v: &Vec3) -> Option<Vec3> {
    let length = v.norm();
    if !length.is_finite() || length <= f32::EPSILON {
        return None;
    }
    Some(v / length)
}
