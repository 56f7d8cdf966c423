use glam::Vec3;

/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance. [`crate::tree::Tree::reduce`]
/// compacts the arena, so ids taken before a reduce are invalidated by it.
pub type NodeId = usize;

/// A `(parent_position, child_position)` pair describing one branch.
pub type Segment = (Vec3, Vec3);
