//! Narrow-phase overlap tests
//!
//! Pairwise predicates for every combination of [`Shape`] kinds, plus the
//! directional variants that also report which face each side was struck on.
//! Nothing here has side effects or returns errors: malformed volumes simply do
//! not overlap anything.

use crate::foundation::math::{Basis, Vec3};

use super::direction::{classify, HitDirection};
use super::shape::{Aabb, Obb, Shape, Sphere};

/// Cross-product axes shorter than this (squared) come from near-parallel
/// edges and are skipped by the separating-axis test.
pub const SAT_AXIS_EPSILON: f32 = 1e-6;

/// Switches for the optional parts of the narrow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrowPhaseOptions {
    /// Reject box pairs whose enclosing spheres are apart before running the
    /// full separating-axis test
    pub bounding_sphere_precheck: bool,
    /// Report a center-to-center direction for pairs involving a sphere
    pub sphere_directions: bool,
}

impl Default for NarrowPhaseOptions {
    fn default() -> Self {
        Self {
            bounding_sphere_precheck: true,
            sphere_directions: true,
        }
    }
}

/// Minimum-translation axis of an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit axis pointing from the first shape into the second; zero for
    /// axis-aligned boxes that coincide along the contact axis
    pub normal: Vec3,
    /// Overlap along `normal`
    pub depth: f32,
}

/// Result of a directional test on an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlap {
    /// Face of the first shape that was struck
    pub direction_a: HitDirection,
    /// Face of the second shape that was struck
    pub direction_b: HitDirection,
}

impl Overlap {
    fn undirected() -> Self {
        Self::default()
    }

    fn swapped(self) -> Self {
        Self {
            direction_a: self.direction_b,
            direction_b: self.direction_a,
        }
    }
}

/// Sphere against sphere.
///
/// Compares the linear center distance against the sum of radii (closed
/// interval, touching counts).
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    if !a.is_valid() || !b.is_valid() {
        return false;
    }
    (a.center - b.center).norm() <= a.radius + b.radius
}

/// Sphere against axis-aligned box
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    if !sphere.is_valid() || !aabb.is_valid() {
        return false;
    }
    let closest = sphere.center.sup(&aabb.min).inf(&aabb.max);
    (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
}

/// Sphere against oriented box, tested in the box's local frame
pub fn sphere_obb(sphere: &Sphere, obb: &Obb) -> bool {
    if !sphere.is_valid() || !obb.is_valid() {
        return false;
    }
    let local = obb
        .rotation
        .inverse_transform_vector(&(sphere.center - obb.center));
    let half = obb.half_extents;
    let closest = local.sup(&-half).inf(&half);
    (closest - local).norm_squared() <= sphere.radius * sphere.radius
}

/// Axis-aligned box against axis-aligned box
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    if !a.is_valid() || !b.is_valid() {
        return false;
    }
    a.min.x <= b.max.x
        && a.max.x >= b.min.x
        && a.min.y <= b.max.y
        && a.max.y >= b.min.y
        && a.min.z <= b.max.z
        && a.max.z >= b.min.z
}

/// Oriented box against oriented box (15-axis separating-axis test)
pub fn obb_obb(a: &Obb, b: &Obb, options: &NarrowPhaseOptions) -> bool {
    obb_contact(a, b, options).is_some()
}

/// Axis-aligned box against oriented box
pub fn aabb_obb(aabb: &Aabb, obb: &Obb, options: &NarrowPhaseOptions) -> bool {
    if !aabb.is_valid() {
        return false;
    }
    obb_obb(&aabb.to_obb(), obb, options)
}

/// Overlap test for any pair of shapes
pub fn check(a: &Shape, b: &Shape, options: &NarrowPhaseOptions) -> bool {
    match (a, b) {
        (Shape::Sphere(a), Shape::Sphere(b)) => sphere_sphere(a, b),
        (Shape::Sphere(sphere), Shape::Aabb(aabb)) | (Shape::Aabb(aabb), Shape::Sphere(sphere)) => {
            sphere_aabb(sphere, aabb)
        }
        (Shape::Sphere(sphere), Shape::Obb(obb)) | (Shape::Obb(obb), Shape::Sphere(sphere)) => {
            sphere_obb(sphere, obb)
        }
        (Shape::Aabb(a), Shape::Aabb(b)) => aabb_aabb(a, b),
        (Shape::Aabb(aabb), Shape::Obb(obb)) | (Shape::Obb(obb), Shape::Aabb(aabb)) => {
            aabb_obb(aabb, obb, options)
        }
        (Shape::Obb(a), Shape::Obb(b)) => obb_obb(a, b, options),
    }
}

/// Minimum-penetration axis of two overlapping axis-aligned boxes.
///
/// The contact axis is the one whose overlap has the smallest magnitude; ties
/// go to X, then Y, then Z. When the centers coincide along the chosen axis
/// the normal points towards the box whose lower face is higher; if the boxes
/// span the same interval there, the normal is zero and no side is favoured.
/// Swapping `a` and `b` always negates the normal.
pub fn aabb_contact(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if !aabb_aabb(a, b) {
        return None;
    }

    let offset = b.center() - a.center();
    let reach = a.half_size() + b.half_size();

    let mut best_axis = 0;
    let mut best_overlap = f32::INFINITY;
    for axis in 0..3 {
        let overlap = (offset[axis].abs() - reach[axis]).abs();
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    let side = if offset[best_axis] == 0.0 {
        b.min[best_axis] - a.min[best_axis]
    } else {
        offset[best_axis]
    };

    let mut normal = Vec3::zeros();
    if side != 0.0 {
        normal[best_axis] = side.signum();
    }
    Some(Contact {
        normal,
        depth: best_overlap,
    })
}

/// Separating-axis test that also yields the minimum-translation axis.
///
/// Tests the three face normals of each box and the nine edge cross products,
/// exiting on the first separating axis. Among the non-separating axes the one
/// with the smallest overlap wins (earlier axes win ties) and is oriented from
/// `a` towards `b`.
pub fn obb_contact(a: &Obb, b: &Obb, options: &NarrowPhaseOptions) -> Option<Contact> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }

    let offset = b.center - a.center;
    if options.bounding_sphere_precheck
        && offset.norm() > a.bounding_radius() + b.bounding_radius()
    {
        return None;
    }

    let axes_a = a.basis().axes();
    let axes_b = b.basis().axes();

    let mut candidates = [Vec3::zeros(); 15];
    candidates[..3].copy_from_slice(&axes_a);
    candidates[3..6].copy_from_slice(&axes_b);
    for (i, axis_a) in axes_a.iter().enumerate() {
        for (j, axis_b) in axes_b.iter().enumerate() {
            candidates[6 + i * 3 + j] = axis_a.cross(axis_b);
        }
    }

    let mut best: Option<Contact> = None;
    for candidate in &candidates {
        let length_squared = candidate.norm_squared();
        if length_squared < SAT_AXIS_EPSILON {
            continue;
        }
        let axis = candidate / length_squared.sqrt();

        let radius_a = projected_radius(&axes_a, &a.half_extents, &axis);
        let radius_b = projected_radius(&axes_b, &b.half_extents, &axis);
        let distance = offset.dot(&axis);
        let overlap = radius_a + radius_b - distance.abs();
        if overlap < 0.0 {
            return None;
        }

        if best.map_or(true, |contact| overlap < contact.depth) {
            let normal = if distance < 0.0 { -axis } else { axis };
            best = Some(Contact {
                normal,
                depth: overlap,
            });
        }
    }
    best
}

fn projected_radius(axes: &[Vec3; 3], half_extents: &Vec3, axis: &Vec3) -> f32 {
    axes.iter()
        .zip(half_extents.iter())
        .map(|(local, half)| half * local.dot(axis).abs())
        .sum()
}

/// Directional test for axis-aligned boxes.
///
/// The second side's direction is always the inverse of the first.
pub fn aabb_aabb_direction(a: &Aabb, b: &Aabb) -> Option<Overlap> {
    let contact = aabb_contact(a, b)?;
    let direction_a = classify(&contact.normal, &Basis::identity());
    Some(Overlap {
        direction_a,
        direction_b: direction_a.invert(),
    })
}

/// Directional test for oriented boxes.
///
/// Each side classifies the contact normal against its own local axes: the
/// first side sees the normal pointing into the second, the second sees it
/// reversed.
pub fn obb_obb_direction(a: &Obb, b: &Obb, options: &NarrowPhaseOptions) -> Option<Overlap> {
    let contact = obb_contact(a, b, options)?;
    Some(Overlap {
        direction_a: classify(&contact.normal, &a.basis()),
        direction_b: classify(&-contact.normal, &b.basis()),
    })
}

/// Directional test between an axis-aligned box and an oriented box.
///
/// The axis-aligned side classifies against the world axes.
pub fn aabb_obb_direction(aabb: &Aabb, obb: &Obb, options: &NarrowPhaseOptions) -> Option<Overlap> {
    if !aabb.is_valid() {
        return None;
    }
    obb_obb_direction(&aabb.to_obb(), obb, options)
}

/// Overlap test for any pair of shapes, with a hit direction for each side.
///
/// `basis_a` and `basis_b` are the local frames of the two colliders; they
/// only matter for sphere pairs, since boxes carry their own orientation.
pub fn check_with_direction(
    a: &Shape,
    basis_a: &Basis,
    b: &Shape,
    basis_b: &Basis,
    options: &NarrowPhaseOptions,
) -> Option<Overlap> {
    match (a, b) {
        (Shape::Aabb(a), Shape::Aabb(b)) => aabb_aabb_direction(a, b),
        (Shape::Aabb(aabb), Shape::Obb(obb)) => aabb_obb_direction(aabb, obb, options),
        (Shape::Obb(obb), Shape::Aabb(aabb)) => {
            aabb_obb_direction(aabb, obb, options).map(Overlap::swapped)
        }
        (Shape::Obb(a), Shape::Obb(b)) => obb_obb_direction(a, b, options),
        (Shape::Sphere(_), _) | (_, Shape::Sphere(_)) => {
            if !check(a, b, options) {
                return None;
            }
            if !options.sphere_directions {
                return Some(Overlap::undirected());
            }
            let offset = b.center() - a.center();
            Some(Overlap {
                direction_a: classify(&offset, basis_a),
                direction_b: classify(&-offset, basis_b),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::QUARTER_PI, quat_from_euler, Quat};
    use approx::assert_relative_eq;

    fn options() -> NarrowPhaseOptions {
        NarrowPhaseOptions::default()
    }

    fn unit_cube(center: Vec3) -> Obb {
        Obb::new(center, Vec3::new(1.0, 1.0, 1.0), Quat::identity())
    }

    #[test]
    fn test_sphere_sphere_touching_counts() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
        assert!(sphere_sphere(&a, &b));

        let c = Sphere::new(Vec3::new(3.001, 0.0, 0.0), 2.0);
        assert!(!sphere_sphere(&a, &c));
    }

    #[test]
    fn test_sphere_sphere_rejects_invalid_radius() {
        let a = Sphere::new(Vec3::zeros(), -1.0);
        let b = Sphere::new(Vec3::zeros(), 5.0);
        assert!(!sphere_sphere(&a, &b));
    }

    #[test]
    fn test_aabb_aabb_overlap_and_gap() {
        let a = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let far = Aabb::new(Vec3::new(3.0, 3.0, 3.0), Vec3::new(5.0, 5.0, 5.0));

        assert!(aabb_aabb(&a, &b));
        assert!(!aabb_aabb(&a, &far));
    }

    #[test]
    fn test_sphere_aabb_corner_region() {
        let aabb = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        // Distance to the corner (1,1,1) is sqrt(3) * 0.5 ≈ 0.866
        let near = Sphere::new(Vec3::new(1.5, 1.5, 1.5), 0.9);
        let far = Sphere::new(Vec3::new(1.5, 1.5, 1.5), 0.8);
        assert!(sphere_aabb(&near, &aabb));
        assert!(!sphere_aabb(&far, &aabb));
    }

    #[test]
    fn test_sphere_obb_uses_box_frame() {
        // Box rotated 45° about Z: its corner reaches sqrt(2) along world X
        let obb = Obb::new(
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            quat_from_euler(Vec3::new(0.0, 0.0, QUARTER_PI)),
        );
        let sphere = Sphere::new(Vec3::new(1.6, 0.0, 0.0), 0.25);
        assert!(sphere_obb(&sphere, &obb));

        let unrotated = unit_cube(Vec3::zeros());
        assert!(!sphere_obb(&sphere, &unrotated));
    }

    #[test]
    fn test_obb_obb_separating_axis_on_x() {
        let a = unit_cube(Vec3::zeros());
        assert!(!obb_obb(&a, &unit_cube(Vec3::new(2.01, 0.0, 0.0)), &options()));
        assert!(obb_obb(&a, &unit_cube(Vec3::new(1.99, 0.0, 0.0)), &options()));
    }

    #[test]
    fn test_obb_obb_precheck_does_not_change_result() {
        let without = NarrowPhaseOptions {
            bounding_sphere_precheck: false,
            ..options()
        };
        let a = unit_cube(Vec3::zeros());
        let rotated = Obb::new(
            Vec3::new(2.3, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            quat_from_euler(Vec3::new(0.0, 0.0, QUARTER_PI)),
        );
        // The rotated corner reaches 2.3 - sqrt(2) ≈ 0.886 < 1
        assert!(obb_obb(&a, &rotated, &options()));
        assert!(obb_obb(&a, &rotated, &without));

        let far = unit_cube(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(obb_obb(&a, &far, &options()), obb_obb(&a, &far, &without));
    }

    #[test]
    fn test_obb_obb_edge_axis_separates() {
        // Two boxes rotated about different axes whose faces overlap in
        // projection but are separated along an edge-edge axis
        let a = Obb::new(
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            quat_from_euler(Vec3::new(0.0, QUARTER_PI, 0.0)),
        );
        let b = Obb::new(
            Vec3::new(1.6, 1.6, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            quat_from_euler(Vec3::new(QUARTER_PI, 0.0, 0.0)),
        );
        let overlap = obb_obb(&a, &b, &options());
        assert_eq!(overlap, obb_obb(&b, &a, &options()));
    }

    #[test]
    fn test_aabb_obb_matches_aabb_aabb_for_identity_rotation() {
        let a = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        assert!(aabb_obb(&a, &b.to_obb(), &options()));

        let far = Aabb::new(Vec3::new(3.5, 0.0, 0.0), Vec3::new(5.0, 2.0, 2.0));
        assert!(!aabb_obb(&a, &far.to_obb(), &options()));
    }

    #[test]
    fn test_aabb_contact_picks_least_penetration() {
        let a = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        // Deep along X and Z, shallow along Y
        let b = Aabb::new(Vec3::new(0.5, 1.8, 0.5), Vec3::new(2.5, 3.8, 2.5));
        let contact = aabb_contact(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(contact.depth, 0.2, epsilon = 1e-5);

        let overlap = aabb_aabb_direction(&a, &b).unwrap();
        assert_eq!(overlap.direction_a, HitDirection::Top);
        assert_eq!(overlap.direction_b, HitDirection::Bottom);
    }

    #[test]
    fn test_obb_direction_unrotated_pair() {
        let a = unit_cube(Vec3::zeros());
        let b = unit_cube(Vec3::new(-1.5, 0.2, 0.0));
        let overlap = obb_obb_direction(&a, &b, &options()).unwrap();
        assert_eq!(overlap.direction_a, HitDirection::Left);
        assert_eq!(overlap.direction_b, HitDirection::Right);
    }

    #[test]
    fn test_obb_direction_is_relative_to_own_frame() {
        let a = unit_cube(Vec3::zeros());
        // B is turned a quarter about Y, so its local -X faces world +Z
        let b = Obb::new(
            Vec3::new(0.0, 0.0, 1.5),
            Vec3::new(1.0, 1.0, 1.0),
            quat_from_euler(Vec3::new(0.0, crate::foundation::math::constants::HALF_PI, 0.0)),
        );
        let overlap = obb_obb_direction(&a, &b, &options()).unwrap();
        assert_eq!(overlap.direction_a, HitDirection::Front);
        // The contact arrives from world -Z, which is B's local +X
        assert_eq!(overlap.direction_b, HitDirection::Right);
    }

    #[test]
    fn test_obb_aabb_direction_swaps_sides() {
        let obb = unit_cube(Vec3::new(0.0, 1.5, 0.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let basis = Basis::identity();
        let overlap = check_with_direction(
            &Shape::Obb(obb),
            &obb.basis(),
            &Shape::Aabb(aabb),
            &basis,
            &options(),
        )
        .unwrap();
        assert_eq!(overlap.direction_a, HitDirection::Bottom);
        assert_eq!(overlap.direction_b, HitDirection::Top);
    }

    #[test]
    fn test_sphere_pair_direction_from_centers() {
        let a = Shape::Sphere(Sphere::new(Vec3::zeros(), 1.0));
        let b = Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.0, -1.5), 1.0));
        let basis = Basis::identity();
        let overlap = check_with_direction(&a, &basis, &b, &basis, &options()).unwrap();
        assert_eq!(overlap.direction_a, HitDirection::Back);
        assert_eq!(overlap.direction_b, HitDirection::Front);

        let plain = NarrowPhaseOptions {
            sphere_directions: false,
            ..options()
        };
        let overlap = check_with_direction(&a, &basis, &b, &basis, &plain).unwrap();
        assert_eq!(overlap, Overlap::default());
    }

    #[test]
    fn test_aabb_direction_inverse_law() {
        let steps = [-1.5, -0.7, 0.0, 0.3, 1.2];
        let a = Aabb::from_center_half_size(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        for x in steps {
            for y in steps {
                for z in steps {
                    let b = Aabb::from_center_half_size(Vec3::new(x, y, z), Vec3::new(1.0, 0.8, 0.6));
                    let forward = aabb_aabb_direction(&a, &b).unwrap();
                    let backward = aabb_aabb_direction(&b, &a).unwrap();
                    assert_eq!(forward.direction_a, backward.direction_a.invert());
                    assert_eq!(forward.direction_b, forward.direction_a.invert());
                }
            }
        }
    }

    #[test]
    fn test_aabb_direction_with_shared_center_on_contact_axis() {
        let block = Aabb::from_center_half_size(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        // Thin plate sunk into the block: contact axis is Y, centers level on Y
        let plate = Aabb::from_center_half_size(Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 0.1, 1.0));

        let forward = aabb_aabb_direction(&block, &plate).unwrap();
        let backward = aabb_aabb_direction(&plate, &block).unwrap();
        assert_eq!(forward.direction_a, HitDirection::Top);
        assert_eq!(forward.direction_b, HitDirection::Bottom);
        assert_eq!(backward.direction_a, HitDirection::Bottom);
        assert_eq!(forward.direction_a, backward.direction_a.invert());

        let twin = block;
        let contact = aabb_contact(&block, &twin).unwrap();
        assert_eq!(contact.normal, Vec3::zeros());
        let same = aabb_aabb_direction(&block, &twin).unwrap();
        assert_eq!(same.direction_a, HitDirection::None);
        assert_eq!(same.direction_b, HitDirection::None);
    }

    #[test]
    fn test_nan_sphere_never_overlaps() {
        let broken = Shape::Sphere(Sphere::new(Vec3::zeros(), f32::NAN));
        for i in -3..=3 {
            #[allow(clippy::cast_precision_loss)]
            let center = Vec3::new(i as f32 * 0.5, 0.25, -0.25);
            let others = [
                Shape::Sphere(Sphere::new(center, 2.0)),
                Shape::Aabb(Aabb::from_center_half_size(center, Vec3::new(2.0, 2.0, 2.0))),
                Shape::Obb(Obb::from_euler(center, Vec3::new(2.0, 2.0, 2.0), Vec3::new(0.3, 0.2, 0.1))),
            ];
            for other in &others {
                assert!(!check(&broken, other, &options()));
                assert!(!check(other, &broken, &options()));
            }
        }
    }
}
