use crate::types::{NodeId, Segment};
use glam::Vec3;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub pos: Vec3,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena of branch nodes with a single root.
///
/// Parents always come before their children in `nodes`, both while growing
/// (children are appended) and after [`Tree::reduce`] (which rebuilds the
/// arena in pre-order). Walking the arena front to back is therefore a
/// valid top-down traversal, and back to front a bottom-up one.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new_root(pos: Vec3) -> Self {
        Self {
            pos,
            parent: None,
            children: Vec::with_capacity(4),
        }
    }

    pub fn new_child(pos: Vec3, parent: NodeId) -> Self {
        Self {
            pos,
            parent: Some(parent),
            children: Vec::with_capacity(4),
        }
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root_pos: Vec3) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_pos)],
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree owns at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn add_child(&mut self, parent: NodeId, pos: Vec3) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode::new_child(pos, parent));
        self.nodes[parent].children.push(id);
        id
    }

    /// Returns `true` if `parent` already has a child at exactly `pos`.
    pub fn has_child_at(&self, parent: NodeId, pos: Vec3) -> bool {
        self.nodes[parent]
            .children
            .iter()
            .any(|&c| self.nodes[c].pos == pos)
    }

    /// Exhaustive nearest-node search.
    ///
    /// Returns the node id and the *squared* distance. Ties go to the node
    /// visited first in arena order; which of several exactly equidistant
    /// nodes wins is otherwise unspecified.
    pub fn find_nearest_node(&self, pos: Vec3) -> Option<(NodeId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (id, n) in self.nodes.iter().enumerate() {
            let d2 = n.pos.distance_squared(pos);
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    /// Euclidean distance from `pos` to the closest node.
    pub fn distance_to_nearest(&self, pos: Vec3) -> f32 {
        self.find_nearest_node(pos)
            .map_or(f32::INFINITY, |(_, d2)| d2.sqrt())
    }

    /// The node with the greatest height, first found on ties.
    pub fn highest_node(&self) -> (NodeId, f32) {
        let mut best = Self::ROOT;
        for (id, n) in self.nodes.iter().enumerate() {
            if n.pos.y > self.nodes[best].pos.y {
                best = id;
            }
        }
        (best, self.nodes[best].pos.y)
    }

    /// All `(parent, child)` position pairs, one per non-root node.
    pub fn segments(&self) -> Vec<Segment> {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| (self.nodes[p].pos, n.pos)))
            .collect()
    }

    /// Collapses straight runs of single-child nodes.
    ///
    /// A node `c` is spliced out when its parent has `c` as its only child,
    /// `c` itself has exactly one child `g`, and the unit directions
    /// parent→`c` and `c`→`g` have a dot product above `threshold`. Nodes are
    /// visited bottom-up and each parent keeps splicing until its chain bends,
    /// so an arbitrarily long collinear run collapses in a single call. The
    /// root and every node with two or more children survive.
    ///
    /// Node ids are reassigned. Returns the number of removed nodes.
    pub fn reduce(&mut self, threshold: f32) -> usize {
        let mut count = 0;

        for id in (0..self.nodes.len()).rev() {
            while let Some(mid) = self.collinear_single_child(id, threshold) {
                let grandchild = self.nodes[mid].children[0];
                self.nodes[id].children[0] = grandchild;
                self.nodes[grandchild].parent = Some(id);
                self.nodes[mid].children.clear();
                count += 1;
            }
        }

        if count > 0 {
            self.compact();
            info!(removed = count, remaining = self.nodes.len(), "simplified tree");
        }
        count
    }

    /// The only child of `id` if it sits on a straight line between `id` and
    /// its own only child.
    fn collinear_single_child(&self, id: NodeId, threshold: f32) -> Option<NodeId> {
        let node = &self.nodes[id];
        let &[child] = node.children.as_slice() else {
            return None;
        };
        let &[grandchild] = self.nodes[child].children.as_slice() else {
            return None;
        };

        let a = (self.nodes[child].pos - node.pos).normalize_or_zero();
        let b = (self.nodes[grandchild].pos - self.nodes[child].pos).normalize_or_zero();
        (a.dot(b) > threshold).then_some(child)
    }

    /// Rebuilds the arena in pre-order from the root, dropping unreachable
    /// nodes.
    fn compact(&mut self) {
        let old = std::mem::take(&mut self.nodes);
        let mut stack = vec![(Self::ROOT, None)];

        while let Some((old_id, parent)) = stack.pop() {
            let new_id = self.nodes.len();
            let node = &old[old_id];
            self.nodes.push(TreeNode {
                pos: node.pos,
                parent,
                children: Vec::with_capacity(node.children.len()),
            });
            if let Some(p) = parent {
                self.nodes[p].children.push(new_id);
            }
            // Reverse so children pop in their original order.
            for &c in node.children.iter().rev() {
                stack.push((c, Some(new_id)));
            }
        }
    }
}
