//! Tick-driven owner of one growth run.

use rand::Rng;
use tracing::{info, warn};

use crate::{
    attractor::AttractionField,
    body::{BodyBuilder, BodySegment},
    config::GrowthConfig,
    envelope::Envelope,
    error::GrowthError,
    growth::{GrowthPhase, GrowthTree, TickReport},
    tree::Tree,
    types::Segment,
};

/// Owns the envelope, the attraction field and the growing tree.
///
/// Growth only advances when [`GrowthController::step`] or
/// [`GrowthController::run_to_completion`] is called; stopping is simply a
/// matter of no longer calling them.
#[derive(Debug)]
pub struct GrowthController {
    config: GrowthConfig,
    envelope: Envelope,
    field: AttractionField,
    growth: GrowthTree,
    ticks: usize,
}

impl GrowthController {
    /// Validates `config`, builds its envelope and samples the field.
    pub fn new(config: GrowthConfig, rng: &mut impl Rng) -> Result<Self, GrowthError> {
        config.validate()?;
        let envelope = Envelope::from_curve(config.envelope.clone())?;
        let field = AttractionField::populate(
            &envelope,
            config.attraction_points,
            config.sampling_attempts_per_point,
            rng,
        )?;
        info!(
            points = field.len(),
            tropism = config.tropism.label(),
            "growth run initialized"
        );
        Ok(Self::assemble(config, envelope, field))
    }

    /// Like [`GrowthController::new`] but with a caller-supplied field.
    ///
    /// `config.attraction_points` is not consulted.
    pub fn with_field(config: GrowthConfig, field: AttractionField) -> Result<Self, GrowthError> {
        config.validate()?;
        let envelope = Envelope::from_curve(config.envelope.clone())?;
        Ok(Self::assemble(config, envelope, field))
    }

    fn assemble(config: GrowthConfig, envelope: Envelope, field: AttractionField) -> Self {
        let growth = GrowthTree::new(config.root_position, envelope.apex_height());
        Self {
            config,
            envelope,
            field,
            growth,
            ticks: 0,
        }
    }

    /// Restarts from a single root with a freshly sampled field.
    ///
    /// On error the current run is left as it was.
    pub fn reset(&mut self, rng: &mut impl Rng) -> Result<(), GrowthError> {
        let field = AttractionField::populate(
            &self.envelope,
            self.config.attraction_points,
            self.config.sampling_attempts_per_point,
            rng,
        )?;
        self.field = field;
        self.growth = GrowthTree::new(self.config.root_position, self.envelope.apex_height());
        self.ticks = 0;
        Ok(())
    }

    /// Advances exactly one tick. Returns `true` if the tree changed.
    pub fn step(&mut self) -> bool {
        self.tick().changed()
    }

    /// Advances one tick and reports what it did.
    pub fn tick(&mut self) -> TickReport {
        if self.growth.is_finished() {
            return TickReport::default();
        }
        self.ticks += 1;
        self.growth.colonize_once(&mut self.field, &self.config)
    }

    /// Ticks until growth finishes. Returns the number of ticks run.
    ///
    /// Stops after `config.max_iterations` ticks at the latest, forcing the
    /// tree into the finished state.
    pub fn run_to_completion(&mut self) -> usize {
        let start = self.ticks;

        while !self.growth.is_finished() {
            if self.ticks - start >= self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    points = self.field.len(),
                    "iteration cap reached, stopping growth"
                );
                self.growth.finish();
                break;
            }
            self.tick();
        }

        let ran = self.ticks - start;
        info!(ticks = ran, nodes = self.growth.tree().len(), "growth run complete");
        ran
    }

    /// Post-growth simplification. Returns the number of removed nodes.
    pub fn reduce(&mut self) -> usize {
        self.growth.reduce(self.config.collinearity_threshold)
    }

    /// Cylinder descriptors for the current tree.
    pub fn body(&self) -> Vec<BodySegment> {
        BodyBuilder::from_config(&self.config).build(self.growth.tree())
    }

    pub fn state(&self) -> GrowthPhase {
        self.growth.state()
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.growth.segments()
    }

    pub fn tree(&self) -> &Tree {
        self.growth.tree()
    }

    pub fn growth(&self) -> &GrowthTree {
        &self.growth
    }

    pub fn field(&self) -> &AttractionField {
        &self.field
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Ticks run since construction or the last reset.
    pub fn ticks(&self) -> usize {
        self.ticks
    }
}
