use crate::{
    attractor::AttractorSet,
    error::{GenError, Result},
    types::NodeId,
};
use glam::Vec3;

/// A branch sample point.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub pos: Vec3,
    /// Unit growth heading.
    pub direction: Vec3,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena of branch nodes; node 0 is the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new_root(pos: Vec3) -> Self {
        Self {
            pos,
            direction: Vec3::Y,
            parent: None,
            children: Vec::with_capacity(4),
        }
    }

    pub fn new_child(pos: Vec3, direction: Vec3, parent: NodeId) -> Self {
        Self {
            pos,
            direction,
            parent: Some(parent),
            children: Vec::with_capacity(4),
        }
    }
}

impl Tree {
    pub fn new(root_pos: Vec3) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_pos)],
        }
    }

    pub fn add_child(&mut self, parent: NodeId, pos: Vec3, direction: Vec3) -> NodeId {
        let id: usize = self.nodes.len();
        self.nodes.push(TreeNode::new_child(pos, direction, parent));
        self.nodes[parent].children.push(id);
        id
    }

    /// Nearest node to `pos` and the squared distance to it.
    pub fn find_nearest_node(&self, pos: Vec3) -> Option<(NodeId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (id, n) in self.nodes.iter().enumerate() {
            let d2 = (n.pos - pos).length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    /// Nearest node whose squared distance lies strictly inside `(min_d2, max_d2)`.
    pub fn find_nearest_in_band(&self, pos: Vec3, min_d2: f32, max_d2: f32) -> Option<(NodeId, f32)> {
        let mut best = None;
        let mut best_d2 = max_d2;
        for (id, n) in self.nodes.iter().enumerate() {
            let d2 = (n.pos - pos).length_squared();
            if d2 > min_d2 && d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    /// Whether `parent` already has a child within `eps` of `pos`.
    pub fn has_child_near(&self, parent: NodeId, pos: Vec3, eps: f32) -> bool {
        let eps2 = eps * eps;
        self.nodes[parent]
            .children
            .iter()
            .any(|&c| (self.nodes[c].pos - pos).length_squared() < eps2)
    }

    /// Number of nodes without a parent.
    pub fn root_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.parent.is_none()).count()
    }
}

/// A tree in progress: its branch nodes plus the attraction points that
/// have not been reached yet.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSkeleton {
    pub tree: Tree,
    pub attractors: AttractorSet,
}

impl TreeSkeleton {
    pub fn new(origin: Vec3, attractors: AttractorSet) -> Self {
        Self {
            tree: Tree::new(origin),
            attractors,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.tree.nodes[0]
    }

    pub fn node_count(&self) -> usize {
        self.tree.nodes.len()
    }

    /// `true` if nothing grew beyond the root.
    pub fn is_bare(&self) -> bool {
        self.tree.nodes.len() <= 1
    }

    /// Fails with [`GenError::EmptyTree`] when only the root exists; callers
    /// use this to skip mesh building.
    pub fn ensure_grown(&self) -> Result<()> {
        if self.is_bare() {
            Err(GenError::EmptyTree)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_points_up_without_parent() {
        let tree = Tree::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].direction, Vec3::Y);
        assert!(tree.nodes[0].parent.is_none());
        assert_eq!(tree.root_count(), 1);
    }

    #[test]
    fn add_child_links_both_ways() {
        let mut tree = Tree::new(Vec3::ZERO);
        let id = tree.add_child(0, Vec3::Y, Vec3::Y);
        assert_eq!(id, 1);
        assert_eq!(tree.nodes[1].parent, Some(0));
        assert_eq!(tree.nodes[0].children, vec![1]);
        assert_eq!(tree.root_count(), 1);
    }

    #[test]
    fn band_search_excludes_both_edges() {
        let mut tree = Tree::new(Vec3::ZERO);
        tree.add_child(0, Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        tree.add_child(1, Vec3::new(0.0, 3.0, 0.0), Vec3::Y);

        let p = Vec3::new(0.0, 4.0, 0.0);
        // Node 2 sits at exactly d2 = 1, which is the lower edge.
        assert_eq!(tree.find_nearest_in_band(p, 1.0, 100.0), Some((1, 9.0)));
        // Node 1 at d2 = 9 is the upper edge, node 0 at 16 is beyond it.
        assert_eq!(tree.find_nearest_in_band(p, 1.0, 9.0), None);
        assert_eq!(tree.find_nearest_node(p), Some((2, 1.0)));
    }

    #[test]
    fn has_child_near_checks_only_children() {
        let mut tree = Tree::new(Vec3::ZERO);
        tree.add_child(0, Vec3::X, Vec3::X);
        assert!(tree.has_child_near(0, Vec3::new(1.05, 0.0, 0.0), 0.1));
        assert!(!tree.has_child_near(0, Vec3::new(1.5, 0.0, 0.0), 0.1));
        assert!(!tree.has_child_near(1, Vec3::X, 0.1));
    }

    #[test]
    fn bare_skeleton_is_reported_empty() {
        let mut skeleton = TreeSkeleton::new(Vec3::ZERO, AttractorSet::default());
        assert!(skeleton.is_bare());
        assert_eq!(skeleton.ensure_grown(), Err(GenError::EmptyTree));

        skeleton.tree.add_child(0, Vec3::Y, Vec3::Y);
        assert!(skeleton.ensure_grown().is_ok());
        assert_eq!(skeleton.node_count(), 2);
    }
}
