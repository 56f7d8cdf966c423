use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::{envelope::Envelope, error::GrowthError};

/// Upper bound on the up-front reservation made by [`AttractionField::populate`].
const PREALLOCATE_LIMIT: usize = 1 << 16;

/// The live set of attraction points.
///
/// Points only ever leave the set: once [`AttractionField::remove_within`]
/// drops a point it is never resurrected.
#[derive(Clone, Debug, Default)]
pub struct AttractionField {
    points: Vec<Vec3>,
}

impl AttractionField {
    pub fn from_positions(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Rejection-samples `count` points uniformly inside `envelope`.
    ///
    /// Candidates are drawn from the envelope's bounding cylinder box and
    /// discarded when [`Envelope::contains`] rejects them. At most
    /// `count * attempts_per_point` candidates are drawn in total; running
    /// out fails with [`GrowthError::SamplingExhausted`].
    pub fn populate(
        envelope: &Envelope,
        count: usize,
        attempts_per_point: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, GrowthError> {
        let bounds = envelope.sample_bounding_box();
        let extent = bounds.horizontal_extent;
        let budget = count.saturating_mul(attempts_per_point);

        let mut points = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
        let mut attempts = 0;

        while points.len() < count {
            if attempts == budget {
                return Err(GrowthError::SamplingExhausted {
                    requested: count,
                    sampled: points.len(),
                    attempts,
                });
            }
            attempts += 1;

            let candidate = Vec3::new(
                rng.random_range(-extent..=extent),
                rng.random_range(bounds.min_height..=bounds.max_height),
                rng.random_range(-extent..=extent),
            );
            if envelope.contains(candidate) {
                points.push(candidate);
            }
        }

        debug!(count, attempts, "populated attraction field");
        Ok(Self { points })
    }

    /// Read-only view of the live points.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Removes every point with `distance_of(point) <= distance`.
    ///
    /// Returns the number of removed points. Afterwards every remaining point
    /// satisfies `distance_of(point) > distance`.
    pub fn remove_within(
        &mut self,
        distance: f32,
        mut distance_of: impl FnMut(Vec3) -> f32,
    ) -> usize {
        let before = self.points.len();
        self.points.retain(|&p| distance_of(p) > distance);
        before - self.points.len()
    }
}
