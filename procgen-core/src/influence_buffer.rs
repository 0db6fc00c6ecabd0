use crate::types::NodeId;
use glam::Vec3;

/// Growth directions gathered for every node during one iteration.
///
/// Slot `i` belongs to node `i` of the tree arena and holds a running vector
/// sum plus the number of attraction points that pulled on the node. A slot
/// may start from a seeded heading; the heading takes part in the average
/// but does not by itself make the node grow.
#[derive(Debug)]
pub struct InfluenceBuffer {
    sum: Vec<Vec3>,
    pulls: Vec<u32>,
}

impl InfluenceBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            sum: vec![Vec3::ZERO; len],
            pulls: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.pulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulls.is_empty()
    }

    /// Matches the buffer to a tree of `len` nodes and empties every slot.
    pub fn ensure_len(&mut self, len: usize) {
        self.sum.resize(len, Vec3::ZERO);
        self.pulls.resize(len, 0);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.sum.fill(Vec3::ZERO);
        self.pulls.fill(0);
    }

    /// Starts node `id`'s sum from `heading`, replacing whatever was there.
    /// The pull count is left alone.
    #[inline]
    pub fn seed(&mut self, id: NodeId, heading: Vec3) {
        self.sum[id] = heading;
    }

    /// Records one attraction point pulling node `id` along `dir`.
    #[inline]
    pub fn add(&mut self, id: NodeId, dir: Vec3) {
        self.sum[id] += dir;
        self.pulls[id] += 1;
    }

    /// Number of points that pulled on node `id` this iteration.
    #[inline]
    pub fn contributions(&self, id: NodeId) -> u32 {
        self.pulls[id]
    }

    /// Sum divided by the pull count; zero for a node nothing pulled on,
    /// whatever its seed.
    #[inline]
    pub fn avg_dir(&self, id: NodeId) -> Vec3 {
        match self.pulls[id] {
            0 => Vec3::ZERO,
            n => self.sum[id] / n as f32,
        }
    }

    #[inline]
    pub fn is_influenced(&self, id: NodeId) -> bool {
        self.pulls[id] > 0
    }

    /// Nodes that at least one point pulled on, in id order.
    pub fn influenced_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pulls
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(id, _)| id)
    }
}
