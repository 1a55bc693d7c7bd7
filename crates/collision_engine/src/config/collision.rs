//! Collision world settings

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::physics::direction::DEFAULT_DIRECTION_THRESHOLD;
use crate::physics::narrow_phase::NarrowPhaseOptions;
use crate::physics::type_filter::TypeFilter;

/// Tunables for a `CollisionWorld`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Minimum dot product for the single-best simple direction query
    pub direction_threshold: f32,
    /// Default minimum dot product for the bitset direction query
    pub flags_threshold: f32,
    /// Reject oriented-box pairs by enclosing spheres before the full test
    pub bounding_sphere_precheck: bool,
    /// Report center-to-center directions for pairs involving a sphere
    pub sphere_directions: bool,
    /// Type-id pairs that never interact
    pub ignored_type_pairs: Vec<(u32, u32)>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            flags_threshold: DEFAULT_DIRECTION_THRESHOLD,
            bounding_sphere_precheck: true,
            sphere_directions: true,
            ignored_type_pairs: Vec::new(),
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Builder pattern: Never test colliders of types `a` and `b` against each other
    pub fn with_ignored_pair(mut self, a: u32, b: u32) -> Self {
        self.ignored_type_pairs.push((a, b));
        self
    }

    /// Builder pattern: Set the simple-query threshold
    pub fn with_direction_threshold(mut self, threshold: f32) -> Self {
        self.direction_threshold = threshold;
        self
    }

    /// Check that thresholds are usable dot-product limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("direction_threshold", self.direction_threshold),
            ("flags_threshold", self.flags_threshold),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [-1, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Narrow-phase switches derived from this config
    pub fn narrow_phase(&self) -> NarrowPhaseOptions {
        NarrowPhaseOptions {
            bounding_sphere_precheck: self.bounding_sphere_precheck,
            sphere_directions: self.sphere_directions,
        }
    }

    /// Type filter derived from this config
    pub fn type_filter(&self) -> TypeFilter {
        TypeFilter::from_ignored(&self.ignored_type_pairs)
    }
}
