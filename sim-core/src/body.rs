//! Branch thickness and renderable cylinder descriptors.
//!
//! Thickness follows the pipe model: a leaf segment has a fixed radius, a
//! straight continuation inherits its child's radius, and a junction combines
//! its children as `(Σ rᵢ^k)^(1/k)`.

use glam::{Mat3, Quat, Vec3};
use tracing::warn;

use crate::{config::GrowthConfig, error::GrowthError, tree::Tree};

/// Segments shorter than this are treated as zero-length.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;
/// Above this `|dot|` with the reference axis the alternate reference is used.
const PARALLEL_LIMIT: f32 = 0.99;

/// One renderable branch piece.
///
/// A unit cylinder along local `+Y`, centred on the origin, becomes this
/// segment after scaling by `(radius, length, radius)`, rotating by
/// `orientation` and translating to `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySegment {
    /// Segment midpoint.
    pub position: Vec3,
    pub orientation: Quat,
    pub radius: f32,
    pub length: f32,
    /// `true` for a zero-length segment drawn as a unit-scaled marker.
    pub marker: bool,
}

/// Computes per-node radii and emits one [`BodySegment`] per branch.
#[derive(Clone, Copy, Debug)]
pub struct BodyBuilder {
    pub leaf_radius: f32,
    pub exponent: f32,
}

impl BodyBuilder {
    pub fn new(leaf_radius: f32, exponent: f32) -> Self {
        Self {
            leaf_radius,
            exponent,
        }
    }

    pub fn from_config(cfg: &GrowthConfig) -> Self {
        Self::new(cfg.leaf_radius, cfg.allometric_exponent)
    }

    /// Radius of the segment ending at each node, indexed by node id.
    ///
    /// Computed bottom-up over the arena, which stores every parent before
    /// its children.
    pub fn radii(&self, tree: &Tree) -> Vec<f32> {
        let mut radii = vec![self.leaf_radius; tree.len()];

        for id in (0..tree.len()).rev() {
            let children = &tree.node(id).children;
            radii[id] = match children.as_slice() {
                [] => self.leaf_radius,
                &[only] => radii[only],
                many => many
                    .iter()
                    .map(|&c| radii[c].powf(self.exponent))
                    .sum::<f32>()
                    .powf(self.exponent.recip()),
            };
        }

        radii
    }

    /// One descriptor per `(parent, child)` pair, radius taken from the child.
    pub fn build(&self, tree: &Tree) -> Vec<BodySegment> {
        let radii = self.radii(tree);

        tree.nodes()
            .iter()
            .enumerate()
            .filter_map(|(id, node)| {
                let parent = tree.node(node.parent?).pos;
                Some(segment(parent, node.pos, radii[id]))
            })
            .collect()
    }
}

fn segment(from: Vec3, to: Vec3, radius: f32) -> BodySegment {
    let delta = to - from;
    let length = delta.length();

    if length < MIN_SEGMENT_LENGTH {
        let err = GrowthError::DegenerateSegment { position: from };
        warn!(%err, "substituting unit marker");
        return BodySegment {
            position: from,
            orientation: Quat::IDENTITY,
            radius: 1.0,
            length: 1.0,
            marker: true,
        };
    }

    BodySegment {
        position: from + delta * 0.5,
        orientation: orientation_along(delta / length),
        radius,
        length,
        marker: false,
    }
}

/// Rotation taking local `+Y` onto unit `dir`.
///
/// The frame's x axis comes from crossing `dir` with a reference axis; the
/// reference swaps from X to Z when `dir` is nearly parallel to X.
fn orientation_along(dir: Vec3) -> Quat {
    let reference = if dir.dot(Vec3::X).abs() > PARALLEL_LIMIT {
        Vec3::Z
    } else {
        Vec3::X
    };
    let x = dir.cross(reference).normalize();
    let z = x.cross(dir);
    Quat::from_mat3(&Mat3::from_cols(x, dir, z)).normalize()
}
