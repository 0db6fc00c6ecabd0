use crate::types::NodeId;
use glam::Vec3;
use rand::Rng;

/// A growth target ("leaf") for the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct AttractionPoint {
    pub pos: Vec3,
    /// Nearest node inside the influence band as of the last attraction phase.
    pub closest_node: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttractorSet {
    pub points: Vec<AttractionPoint>,
}

impl AttractorSet {
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let points = positions
            .into_iter()
            .map(|pos| AttractionPoint {
                pos,
                closest_node: None,
            })
            .collect();

        Self { points }
    }

    /// Scatters `count` points uniformly in the box `centre ± size / 2`.
    pub fn random_in_box(centre: Vec3, size: Vec3, count: usize, rng: &mut impl Rng) -> Self {
        let half = size / 2.0;
        let positions = (0..count)
            .map(|_| {
                let x = rng.random_range(-half.x..=half.x);
                let y = rng.random_range(-half.y..=half.y);
                let z = rng.random_range(-half.z..=half.z);
                centre + Vec3::new(x, y, z)
            })
            .collect();

        Self::from_positions(positions)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
