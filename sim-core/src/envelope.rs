//! Volume-of-revolution envelope bounding where attraction points may live.
//!
//! The envelope is described by a 2-D profile of `(radius, height)` samples
//! laid out top to bottom, rotated around the vertical (y) axis.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::{error::GrowthError, types::Segment};

/// Number of profile copies drawn around the axis by [`Envelope::to_segments`].
const MERIDIANS: usize = 8;
/// Number of chords per horizontal ring drawn by [`Envelope::to_segments`].
const RING_SEGMENTS: usize = 32;

/// Axis-aligned sampling box around an [`Envelope`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeBounds {
    /// Largest radius of the profile; the box spans `-extent..=extent` in x and z.
    pub horizontal_extent: f32,
    /// Lowest height (the base ring).
    pub min_height: f32,
    /// Highest height (the apex).
    pub max_height: f32,
}

/// A validated envelope curve.
///
/// Invariants, checked by [`Envelope::from_curve`]:
/// - at least two samples;
/// - every value finite and non-negative;
/// - the first sample is the apex (radius `0`);
/// - heights strictly decrease with index;
/// - the full width `2 * max radius` is finite.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    curve: Vec<Vec2>,
    bounds: EnvelopeBounds,
}

impl Envelope {
    /// Builds an envelope from `(radius, height)` samples, apex first.
    pub fn from_curve(curve: Vec<Vec2>) -> Result<Self, GrowthError> {
        if curve.len() < 2 {
            return Err(GrowthError::invalid_envelope(format!(
                "need at least 2 samples, got {}",
                curve.len()
            )));
        }

        for (i, p) in curve.iter().enumerate() {
            if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
                return Err(GrowthError::invalid_envelope(format!(
                    "sample {i} ({}, {}) must be finite and non-negative",
                    p.x, p.y
                )));
            }
        }

        if curve[0].x != 0.0 {
            return Err(GrowthError::invalid_envelope(format!(
                "apex radius must be 0, got {}",
                curve[0].x
            )));
        }

        if let Some(i) = curve.windows(2).position(|w| w[1].y >= w[0].y) {
            return Err(GrowthError::invalid_envelope(format!(
                "heights must strictly decrease, sample {} ({}) is not below sample {} ({})",
                i + 1,
                curve[i + 1].y,
                i,
                curve[i].y
            )));
        }

        let envelope = Self::with_bounds(curve);
        let width = 2.0 * envelope.bounds.horizontal_extent;
        if !width.is_finite() {
            return Err(GrowthError::invalid_envelope(format!(
                "radius {} is too large to sample across",
                envelope.bounds.horizontal_extent
            )));
        }
        Ok(envelope)
    }

    /// The default crown-shaped profile: 8 units tall, 2.5 wide at its widest.
    pub fn default_crown() -> Self {
        Self::with_bounds(default_crown_curve())
    }

    fn with_bounds(curve: Vec<Vec2>) -> Self {
        let horizontal_extent = curve.iter().map(|p| p.x).fold(0.0, f32::max);
        let bounds = EnvelopeBounds {
            horizontal_extent,
            min_height: curve[curve.len() - 1].y,
            max_height: curve[0].y,
        };
        Self { curve, bounds }
    }

    /// The profile samples, apex first.
    pub fn curve(&self) -> &[Vec2] {
        &self.curve
    }

    /// Height of the apex sample.
    pub fn apex_height(&self) -> f32 {
        self.bounds.max_height
    }

    /// Returns the box used to rejection-sample points inside the envelope.
    pub fn sample_bounding_box(&self) -> EnvelopeBounds {
        self.bounds
    }

    /// Returns `true` if `point` lies inside the volume of revolution.
    ///
    /// Points above the apex or below the base are always outside. Otherwise
    /// the first bracketing pair scanning from the apex is used to linearly
    /// interpolate the envelope radius at the point's height.
    pub fn contains(&self, point: Vec3) -> bool {
        if point.y > self.bounds.max_height || point.y < self.bounds.min_height {
            return false;
        }

        for w in self.curve.windows(2) {
            let (upper, lower) = (w[0], w[1]);
            if point.y >= lower.y {
                let alpha = (point.y - lower.y) / (upper.y - lower.y);
                let radius = lower.x + (upper.x - lower.x) * alpha;
                return point.x.hypot(point.z) <= radius;
            }
        }

        false
    }

    /// Line segments outlining the envelope surface.
    ///
    /// The profile is drawn at evenly spaced angles around the axis, plus one
    /// horizontal ring per curve sample.
    pub fn to_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(
            MERIDIANS * (self.curve.len() - 1) + RING_SEGMENTS * self.curve.len(),
        );

        for m in 0..MERIDIANS {
            let angle = m as f32 / MERIDIANS as f32 * TAU;
            for w in self.curve.windows(2) {
                segments.push((revolve(w[0], angle), revolve(w[1], angle)));
            }
        }

        for sample in self.curve.iter().filter(|s| s.x > 0.0) {
            for i in 0..RING_SEGMENTS {
                let a0 = i as f32 / RING_SEGMENTS as f32 * TAU;
                let a1 = (i + 1) as f32 / RING_SEGMENTS as f32 * TAU;
                segments.push((revolve(*sample, a0), revolve(*sample, a1)));
            }
        }

        segments
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::default_crown()
    }
}

/// The `(radius, height)` samples of [`Envelope::default_crown`].
pub fn default_crown_curve() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 8.0),
        Vec2::new(0.6, 7.8),
        Vec2::new(1.2, 7.4),
        Vec2::new(1.8, 6.9),
        Vec2::new(2.2, 6.2),
        Vec2::new(2.5, 5.3),
        Vec2::new(2.4, 4.5),
        Vec2::new(2.0, 4.0),
        Vec2::new(1.7, 3.5),
        Vec2::new(1.3, 3.0),
        Vec2::new(0.9, 2.5),
    ]
}

/// Rotates a profile sample around the y axis.
fn revolve(sample: Vec2, angle: f32) -> Vec3 {
    Vec3::new(sample.x * angle.cos(), sample.y, sample.x * angle.sin())
}
