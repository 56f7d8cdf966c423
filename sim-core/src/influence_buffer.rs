use crate::types::NodeId;
use glam::Vec3;

/// Per-node accumulated growth directions for a single colonization tick.
///
/// Slot `i` holds the `accumulated_direction` of node `i`: the vector sum
/// of the unit vectors pointing from that node toward every attraction
/// point it is nearest to. The buffer is cleared at the start of every
/// tick, so nothing carries over between ticks.
#[derive(Debug, Default)]
pub struct InfluenceBuffer {
    dir: Vec<Vec3>,
}

impl InfluenceBuffer {
    /// Creates a new [`InfluenceBuffer`] with `len` zeroed slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            dir: vec![Vec3::ZERO; len],
        }
    }

    pub fn len(&self) -> usize {
        self.dir.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dir.is_empty()
    }

    /// Resizes the buffer to `len` slots and zeroes every slot.
    pub fn ensure_len(&mut self, len: usize) {
        if self.dir.len() != len {
            self.dir.resize(len, Vec3::ZERO);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        self.dir.fill(Vec3::ZERO);
    }

    /// Adds one unit pull onto node `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: NodeId, dir: Vec3) {
        self.dir[id] += dir;
    }

    /// The raw vector sum for node `id`.
    #[inline]
    pub fn accumulated(&self, id: NodeId) -> Vec3 {
        self.dir[id]
    }

    /// The accumulated direction of node `id` normalized to unit length,
    /// or `Vec3::ZERO` if nothing (or a cancelling set of pulls) was added.
    #[inline]
    pub fn direction(&self, id: NodeId) -> Vec3 {
        self.dir[id].normalize_or_zero()
    }

    /// Node ids whose accumulated direction is nonzero, in id order.
    pub fn influenced_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dir
            .iter()
            .enumerate()
            .filter_map(|(i, d)| (*d != Vec3::ZERO).then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_len_resizes_and_clears() {
        let mut buf = InfluenceBuffer::with_len(2);
        buf.add(0, Vec3::X);

        buf.ensure_len(4);
        assert_eq!(buf.len(), 4);
        assert!(buf.influenced_indices().next().is_none());

        buf.add(3, Vec3::Y);
        buf.ensure_len(4);
        assert_eq!(buf.accumulated(3), Vec3::ZERO);
    }

    #[test]
    fn add_sums_instead_of_overwriting() {
        let mut buf = InfluenceBuffer::with_len(1);
        buf.add(0, Vec3::X);
        buf.add(0, Vec3::Y);

        assert_eq!(buf.accumulated(0), Vec3::new(1.0, 1.0, 0.0));
        let d = buf.direction(0);
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - d.y).abs() < 1e-6);
    }

    #[test]
    fn cancelling_pulls_leave_node_uninfluenced() {
        let mut buf = InfluenceBuffer::with_len(3);
        buf.add(1, Vec3::X);
        buf.add(1, -Vec3::X);
        buf.add(2, Vec3::Z);

        assert_eq!(buf.direction(1), Vec3::ZERO);
        let ids: Vec<NodeId> = buf.influenced_indices().collect();
        assert_eq!(ids, vec![2]);
    }
}
