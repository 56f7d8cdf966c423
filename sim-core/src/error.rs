//! Error types for envelope construction, sampling and configuration.

use glam::Vec3;

/// Errors raised by the growth core.
///
/// Every variant is local to one growth run; none of them is fatal to the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    /// The envelope curve is under-specified or not strictly descending.
    #[error("invalid envelope: {reason}")]
    InvalidEnvelope { reason: String },

    /// Rejection sampling ran out of attempts before filling the field.
    #[error(
        "sampling exhausted: {sampled} of {requested} attraction points after {attempts} attempts"
    )]
    SamplingExhausted {
        requested: usize,
        sampled: usize,
        attempts: usize,
    },

    /// A parent/child pair with coincident positions.
    ///
    /// Only reported through logging: the body builder substitutes a marker.
    #[error("degenerate zero-length segment at {position}")]
    DegenerateSegment { position: Vec3 },

    /// A configuration value is out of its valid range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ConfigRead(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    ConfigWrite(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[source] ron::Error),
}

impl GrowthError {
    pub(crate) fn invalid_envelope(reason: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
