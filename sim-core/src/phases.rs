//! The phases of one colonization tick.
//!
//! A tick runs, in order:
//! 1. [`attraction_phase`]: each live point pulls on its nearest node,
//!    accumulating directions in an [`InfluenceBuffer`].
//! 2. [`growth_phase`]: every pulled node sprouts one child along its
//!    normalized, tropism-biased direction.
//! 3. [`idle_phase`]: only when nothing grew; extends the trunk once or
//!    finishes growth.
//! 4. [`kill_phase`]: points within kill distance of any node are removed.

use glam::Vec3;

use crate::{
    attractor::AttractionField, config::GrowthConfig, growth::GrowthState,
    influence_buffer::InfluenceBuffer, tree::Tree, types::NodeId,
};

/// Accumulates the pull of every live point onto its nearest node.
///
/// The buffer is resized and cleared to `tree.len()` first, which resets
/// every node's accumulated direction to zero. A point at or within
/// `cfg.influence_radius` of its nearest node adds the unit vector from that
/// node toward itself. Points closer to some other node never pull a node
/// that is not their nearest.
pub fn attraction_phase(
    tree: &Tree,
    field: &AttractionField,
    cfg: &GrowthConfig,
    acc: &mut InfluenceBuffer,
) {
    let r2 = cfg.influence_radius * cfg.influence_radius;

    acc.ensure_len(tree.len());

    for p in field.points() {
        if let Some((id, d2)) = tree.find_nearest_node(p)
            && d2 <= r2
        {
            let dir = (p - tree.node(id).pos).normalize_or_zero();
            acc.add(id, dir);
        }
    }
}

/// Grows one child per influenced node.
///
/// For each node with a nonzero accumulated direction:
///
/// 1. Normalize the direction and bias it with `cfg.tropism`.
/// 2. Propose `new_pos = pos + dir * cfg.internode_length`.
/// 3. Skip if the node already has a child at exactly `new_pos`.
///
/// All proposals are computed against the tree as it was at the start of
/// the phase, then committed together. Returns the new ids in insertion
/// order.
pub fn growth_phase(tree: &mut Tree, acc: &InfluenceBuffer, cfg: &GrowthConfig) -> Vec<NodeId> {
    let mut to_add = Vec::with_capacity(16);

    for id in acc.influenced_indices() {
        let pos = tree.node(id).pos;
        let dir = cfg.tropism.bias(acc.direction(id), pos, cfg.tropism_strength);
        if dir == Vec3::ZERO {
            continue;
        }

        let new_pos = pos + dir * cfg.internode_length;
        if tree.has_child_at(id, new_pos) {
            continue;
        }

        to_add.push((id, new_pos));
    }

    to_add
        .into_iter()
        .map(|(parent, pos)| tree.add_child(parent, pos))
        .collect()
}

/// Handles a tick in which [`growth_phase`] added nothing.
///
/// - If the highest node is already above `apex_height`, growth finishes.
/// - Otherwise, if the previous tick made progress, one vertical child is
///   added above the highest node and the latch is armed.
/// - If the latch is already armed (the fallback was tried and still
///   nothing grew), growth finishes.
///
/// Returns the id of the fallback child, if one was added.
pub fn idle_phase(
    tree: &mut Tree,
    state: &mut GrowthState,
    cfg: &GrowthConfig,
    apex_height: f32,
) -> Option<NodeId> {
    let (top, height) = tree.highest_node();

    if height > apex_height || !state.made_progress_last_tick {
        state.finished = true;
        return None;
    }

    state.made_progress_last_tick = false;
    let pos = tree.node(top).pos + Vec3::Y * cfg.internode_length;
    Some(tree.add_child(top, pos))
}

/// Removes every point within `cfg.kill_distance` of any node.
///
/// Uses the distance to the nearest node, which is within the kill distance
/// exactly when some node is. Returns the number of removed points.
pub fn kill_phase(tree: &Tree, field: &mut AttractionField, cfg: &GrowthConfig) -> usize {
    field.remove_within(cfg.kill_distance, |p| tree.distance_to_nearest(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tropism::Tropism;

    fn cfg() -> GrowthConfig {
        GrowthConfig {
            internode_length: 2.0,
            influence_radius: 5.0,
            kill_distance: 1.0,
            ..GrowthConfig::default()
        }
    }

    #[test]
    fn attraction_phase_accumulates_unit_pulls_on_nearest_node() {
        let tree = Tree::new(Vec3::ZERO);
        let field = AttractionField::from_positions(vec![
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ]);
        let mut acc = InfluenceBuffer::with_len(0);

        attraction_phase(&tree, &field, &cfg(), &mut acc);

        assert_eq!(acc.len(), tree.len());
        assert_eq!(acc.accumulated(0), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn attraction_phase_ignores_points_outside_radius() {
        let tree = Tree::new(Vec3::ZERO);
        let field = AttractionField::from_positions(vec![Vec3::new(100.0, 0.0, 0.0)]);
        let mut acc = InfluenceBuffer::with_len(0);

        attraction_phase(&tree, &field, &cfg(), &mut acc);

        assert_eq!(acc.len(), 1);
        assert!(acc.influenced_indices().next().is_none());
    }

    #[test]
    fn attraction_phase_only_pulls_nearest_node() {
        let mut tree = Tree::new(Vec3::ZERO);
        tree.add_child(Tree::ROOT, Vec3::new(0.0, 1.0, 0.0));
        let field = AttractionField::from_positions(vec![Vec3::new(0.0, 3.0, 0.0)]);
        let mut acc = InfluenceBuffer::with_len(0);

        attraction_phase(&tree, &field, &cfg(), &mut acc);

        assert_eq!(acc.accumulated(0), Vec3::ZERO);
        assert_eq!(acc.accumulated(1), Vec3::Y);
    }

    #[test]
    fn growth_phase_creates_child_along_direction() {
        let mut tree = Tree::new(Vec3::ZERO);
        let mut acc = InfluenceBuffer::with_len(1);
        acc.add(0, Vec3::X);
        acc.add(0, Vec3::X);

        let new_ids = growth_phase(&mut tree, &acc, &cfg());

        assert_eq!(new_ids, vec![1]);
        assert_eq!(tree.node(1).pos, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(tree.root().children, vec![1]);
    }

    #[test]
    fn growth_phase_skips_duplicate_child() {
        let mut tree = Tree::new(Vec3::ZERO);
        tree.add_child(Tree::ROOT, Vec3::new(2.0, 0.0, 0.0));
        let mut acc = InfluenceBuffer::with_len(2);
        acc.add(0, Vec3::X);

        let new_ids = growth_phase(&mut tree, &acc, &cfg());

        assert!(new_ids.is_empty());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn growth_phase_applies_tropism() {
        let mut tree = Tree::new(Vec3::new(1.0, 0.0, 0.0));
        let mut acc = InfluenceBuffer::with_len(1);
        acc.add(0, Vec3::Y);

        let cfg = GrowthConfig {
            tropism: Tropism::Gravity,
            tropism_strength: 0.25,
            ..cfg()
        };
        let new_ids = growth_phase(&mut tree, &acc, &cfg);

        let child = tree.node(new_ids[0]).pos;
        assert!(child.y < 2.0);
        assert!((child.distance(tree.root().pos) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn idle_phase_extends_once_then_finishes() {
        let mut tree = Tree::new(Vec3::ZERO);
        let mut state = GrowthState::default();

        let id = idle_phase(&mut tree, &mut state, &cfg(), 10.0);
        assert_eq!(id, Some(1));
        assert_eq!(tree.node(1).pos, Vec3::new(0.0, 2.0, 0.0));
        assert!(!state.finished);
        assert!(!state.made_progress_last_tick);

        assert_eq!(idle_phase(&mut tree, &mut state, &cfg(), 10.0), None);
        assert!(state.finished);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn idle_phase_finishes_above_apex() {
        let mut tree = Tree::new(Vec3::new(0.0, 11.0, 0.0));
        let mut state = GrowthState::default();

        assert_eq!(idle_phase(&mut tree, &mut state, &cfg(), 10.0), None);
        assert!(state.finished);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn kill_phase_uses_any_node_within_distance() {
        let mut tree = Tree::new(Vec3::ZERO);
        tree.add_child(Tree::ROOT, Vec3::new(5.0, 0.0, 0.0));
        let mut field = AttractionField::from_positions(vec![
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::new(2.5, 0.0, 0.0),
        ]);

        let killed = kill_phase(&tree, &mut field, &cfg());

        assert_eq!(killed, 2);
        assert_eq!(field.points().collect::<Vec<_>>(), vec![Vec3::new(2.5, 0.0, 0.0)]);
    }
}
