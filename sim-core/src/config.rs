//! Growth parameters with validation and RON persistence.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{envelope::default_crown_curve, error::GrowthError, tropism::Tropism};

/// Largest accepted [`GrowthConfig::attraction_points`].
pub const MAX_ATTRACTION_POINTS: usize = 1_000_000;

/// All tunables of one growth run.
///
/// Missing fields fall back to [`GrowthConfig::default`] when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Fixed length of every new branch step (dp).
    pub internode_length: f32,
    /// Max distance at which a point pulls its nearest node (ri).
    pub influence_radius: f32,
    /// Points this close to any node are consumed (dk).
    pub kill_distance: f32,
    /// Number of attraction points sampled inside the envelope.
    pub attraction_points: usize,
    /// Pipe-model exponent combining child radii at a junction (k).
    pub allometric_exponent: f32,
    /// Radius of every leaf segment.
    pub leaf_radius: f32,
    /// Dot-product threshold above which a chain is considered straight.
    pub collinearity_threshold: f32,
    /// Direction bias applied to every sprouting node.
    pub tropism: Tropism,
    /// Tropism blend weight in `[0, 1]`.
    pub tropism_strength: f32,
    /// Rejection-sampling budget, per requested point.
    pub sampling_attempts_per_point: usize,
    /// Upper bound on ticks for a batch run.
    pub max_iterations: usize,
    /// Where the root node is planted.
    pub root_position: Vec3,
    /// `(radius, height)` envelope profile, apex first.
    pub envelope: Vec<Vec2>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            internode_length: 0.2,
            influence_radius: 3.0,
            kill_distance: 0.4,
            attraction_points: 400,
            allometric_exponent: 2.3,
            leaf_radius: 0.02,
            collinearity_threshold: 0.98,
            tropism: Tropism::None,
            tropism_strength: 0.2,
            sampling_attempts_per_point: 1000,
            max_iterations: 2000,
            root_position: Vec3::ZERO,
            envelope: default_crown_curve(),
        }
    }
}

impl GrowthConfig {
    /// Checks every parameter range.
    ///
    /// The envelope curve itself is validated by
    /// [`crate::envelope::Envelope::from_curve`].
    pub fn validate(&self) -> Result<(), GrowthError> {
        let finite = [
            ("internode_length", self.internode_length),
            ("influence_radius", self.influence_radius),
            ("kill_distance", self.kill_distance),
            ("allometric_exponent", self.allometric_exponent),
            ("leaf_radius", self.leaf_radius),
            ("collinearity_threshold", self.collinearity_threshold),
            ("tropism_strength", self.tropism_strength),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(GrowthError::invalid_config(field, "must be finite"));
            }
        }
        if !self.root_position.is_finite() {
            return Err(GrowthError::invalid_config("root_position", "must be finite"));
        }

        if self.internode_length <= 0.0 {
            return Err(GrowthError::invalid_config(
                "internode_length",
                format!("must be > 0, got {}", self.internode_length),
            ));
        }
        if self.influence_radius <= self.internode_length {
            return Err(GrowthError::invalid_config(
                "influence_radius",
                format!(
                    "must exceed internode_length {}, got {}",
                    self.internode_length, self.influence_radius
                ),
            ));
        }
        if self.kill_distance <= 0.0 || self.kill_distance >= self.influence_radius {
            return Err(GrowthError::invalid_config(
                "kill_distance",
                format!(
                    "must lie in (0, {}), got {}",
                    self.influence_radius, self.kill_distance
                ),
            ));
        }
        if self.attraction_points == 0 || self.attraction_points > MAX_ATTRACTION_POINTS {
            return Err(GrowthError::invalid_config(
                "attraction_points",
                format!(
                    "must lie in 1..={MAX_ATTRACTION_POINTS}, got {}",
                    self.attraction_points
                ),
            ));
        }
        if self.allometric_exponent <= 1.0 {
            return Err(GrowthError::invalid_config(
                "allometric_exponent",
                format!("must be > 1, got {}", self.allometric_exponent),
            ));
        }
        if self.leaf_radius <= 0.0 {
            return Err(GrowthError::invalid_config("leaf_radius", "must be > 0"));
        }
        if self.collinearity_threshold <= 0.0 || self.collinearity_threshold > 1.0 {
            return Err(GrowthError::invalid_config(
                "collinearity_threshold",
                "must lie in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.tropism_strength) {
            return Err(GrowthError::invalid_config(
                "tropism_strength",
                "must lie in [0, 1]",
            ));
        }
        if self.sampling_attempts_per_point == 0 {
            return Err(GrowthError::invalid_config(
                "sampling_attempts_per_point",
                "must be > 0",
            ));
        }
        if self.max_iterations == 0 {
            return Err(GrowthError::invalid_config("max_iterations", "must be > 0"));
        }
        Ok(())
    }

    /// Parses a config from RON text.
    pub fn from_ron_str(s: &str) -> Result<Self, GrowthError> {
        ron::from_str(s).map_err(GrowthError::ConfigParse)
    }

    /// Loads a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, GrowthError> {
        let contents = std::fs::read_to_string(path).map_err(GrowthError::ConfigRead)?;
        Self::from_ron_str(&contents)
    }

    /// Serializes to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, GrowthError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(GrowthError::ConfigSerialize)
    }

    /// Writes the config to `path` as RON.
    pub fn save(&self, path: &Path) -> Result<(), GrowthError> {
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents).map_err(GrowthError::ConfigWrite)
    }
}
