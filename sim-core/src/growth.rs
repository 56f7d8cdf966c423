//! The growth state machine driving the node tree toward the point cloud.

use glam::Vec3;
use tracing::{debug, info};

use crate::{
    attractor::AttractionField,
    config::GrowthConfig,
    influence_buffer::InfluenceBuffer,
    phases,
    tree::Tree,
    types::{NodeId, Segment},
};

/// Coarse lifecycle of a [`GrowthTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPhase {
    Growing,
    Finished,
}

/// Termination flags of one growth run.
///
/// `made_progress_last_tick` is the fallback latch: it is `true` until a
/// tick grows nothing, at which point the single trunk extension is spent
/// and the flag drops to `false`. A second idle tick in a row finishes
/// growth. Any tick that grows re-arms the latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthState {
    pub finished: bool,
    pub made_progress_last_tick: bool,
}

impl Default for GrowthState {
    fn default() -> Self {
        Self {
            finished: false,
            made_progress_last_tick: true,
        }
    }
}

/// What one call to [`GrowthTree::colonize_once`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Nodes sprouted toward attraction points, in insertion order.
    pub grown: Vec<NodeId>,
    /// The vertical fallback child, if this was the first idle tick.
    pub extension: Option<NodeId>,
    /// Attraction points consumed at the end of the tick.
    pub killed: usize,
}

impl TickReport {
    /// `true` if the tick added any node.
    pub fn changed(&self) -> bool {
        !self.grown.is_empty() || self.extension.is_some()
    }
}

/// The node tree plus its growth state.
#[derive(Debug)]
pub struct GrowthTree {
    tree: Tree,
    state: GrowthState,
    acc: InfluenceBuffer,
    apex_height: f32,
}

impl GrowthTree {
    /// A single root at `root` that stops growing past `apex_height`.
    pub fn new(root: Vec3, apex_height: f32) -> Self {
        let tree = Tree::new(root);
        let acc = InfluenceBuffer::with_len(tree.len());
        Self {
            tree,
            state: GrowthState::default(),
            acc,
            apex_height,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn growth_state(&self) -> GrowthState {
        self.state
    }

    pub fn state(&self) -> GrowthPhase {
        if self.state.finished {
            GrowthPhase::Finished
        } else {
            GrowthPhase::Growing
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Forces the tree into the finished state.
    pub fn finish(&mut self) {
        self.state.finished = true;
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.tree.segments()
    }

    /// Runs one colonization tick against `field`.
    ///
    /// A finished tree is left untouched. An empty field latches the tree
    /// as finished without touching geometry. Otherwise the tick runs the
    /// attraction, growth, idle and kill phases in that order and the whole
    /// tick is applied before returning.
    pub fn colonize_once(&mut self, field: &mut AttractionField, cfg: &GrowthConfig) -> TickReport {
        if self.state.finished {
            return TickReport::default();
        }
        if field.is_empty() {
            info!(nodes = self.tree.len(), "attraction field exhausted, growth finished");
            self.state.finished = true;
            return TickReport::default();
        }

        phases::attraction_phase(&self.tree, field, cfg, &mut self.acc);
        let grown = phases::growth_phase(&mut self.tree, &self.acc, cfg);

        let extension = if grown.is_empty() {
            phases::idle_phase(&mut self.tree, &mut self.state, cfg, self.apex_height)
        } else {
            self.state.made_progress_last_tick = true;
            None
        };

        let killed = phases::kill_phase(&self.tree, field, cfg);

        debug!(
            grown = grown.len(),
            extended = extension.is_some(),
            killed,
            nodes = self.tree.len(),
            points = field.len(),
            "colonization tick"
        );
        if self.state.finished {
            info!(nodes = self.tree.len(), points = field.len(), "growth finished");
        }

        TickReport {
            grown,
            extension,
            killed,
        }
    }

    /// Collapses collinear single-child chains, see [`Tree::reduce`].
    pub fn reduce(&mut self, threshold: f32) -> usize {
        self.tree.reduce(threshold)
    }
}
