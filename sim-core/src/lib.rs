//! Core 3-D space-colonization growth library.
//!
//! A cloud of attraction points sampled inside an [`envelope`] pulls the
//! nearest branch tips of a growing node [`tree`] toward it, one discrete
//! tick at a time.
//!
//! Main components:
//! - [`envelope`]: volume-of-revolution boundary, containment and outline.
//! - [`attractor`]: the attraction field and its rejection sampler.
//! - [`tree`]: node arena, nearest-node search and simplification.
//! - [`tropism`]: direction-bias policies.
//! - [`phases`]: the attraction / growth / idle / kill phases of a tick.
//! - [`growth`]: the growth state machine.
//! - [`body`]: pipe-model thickness and cylinder descriptors.
//! - [`controller`]: single-step and run-to-completion driver.
//! - [`config`]: validated, RON-persisted parameters.
//! - [`influence_buffer`]: per-tick accumulated directions.
//! - [`error`] / [`types`]: shared error and id types.

pub mod attractor;
pub mod body;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod growth;
pub mod influence_buffer;
pub mod phases;
pub mod tree;
pub mod tropism;
pub mod types;

pub use attractor::AttractionField;
pub use body::{BodyBuilder, BodySegment};
pub use config::GrowthConfig;
pub use controller::GrowthController;
pub use envelope::{Envelope, EnvelopeBounds};
pub use error::GrowthError;
pub use growth::{GrowthPhase, GrowthState, GrowthTree, TickReport};
pub use tree::Tree;
pub use tropism::Tropism;
