//! Simulation phases for the tree–attractor system.
//!
//! One growth iteration runs:
//! 1. [`attraction_phase`] — each attraction point pulls on the nearest node
//!    inside the influence band, accumulating unit directions in an
//!    [`InfluenceBuffer`].
//! 2. [`growth_phase`] — every influenced node spawns a child along its
//!    averaged direction, or forks towards its points when that fails.
//! 3. [`kill_phase`] — attraction points within the kill distance of any
//!    node are removed.

use crate::{
    attractor::{AttractionPoint, AttractorSet},
    config::TreeSettings,
    influence_buffer::InfluenceBuffer,
    tree::Tree,
    types::NodeId,
};
use glam::Vec3;

/// Children of one parent closer than this fraction of `node_size` are
/// treated as the same child.
const DUPLICATE_CHILD_FRACTION: f32 = 0.1;

/// Accumulates attraction from every point onto its nearest node.
///
/// A node is a candidate for a point when
/// `kill_range < distance < influence_distance`; the nearest candidate
/// becomes the point's `closest_node` and receives the unit vector towards
/// the point. Points with no candidate get `closest_node = None`.
///
/// The buffer is resized and cleared to `tree.nodes.len()` first. With
/// `cfg.carry_heading` each node's sum starts at its current direction.
///
/// ### Returns
/// The number of points that found an influencing node.
pub fn attraction_phase(
    tree: &Tree,
    attractors: &mut AttractorSet,
    cfg: &TreeSettings,
    acc: &mut InfluenceBuffer,
) -> usize {
    let kill2 = cfg.kill_range() * cfg.kill_range();
    let r2 = cfg.influence_distance() * cfg.influence_distance();

    acc.ensure_len(tree.nodes.len());
    if cfg.carry_heading {
        for (id, node) in tree.nodes.iter().enumerate() {
            acc.seed(id, node.direction);
        }
    }

    let mut influenced = 0;
    for a in attractors.points.iter_mut() {
        a.closest_node = tree
            .find_nearest_in_band(a.pos, kill2, r2)
            .map(|(id, _d2)| id);

        if let Some(id) = a.closest_node {
            let dir = (a.pos - tree.nodes[id].pos).normalize_or_zero();
            acc.add(id, dir);
            influenced += 1;
        }
    }
    influenced
}

/// Grows the tree by one node per influenced node.
///
/// For each node with at least one contribution:
///
/// 1. `dir = normalize(avg_dir)`, then the [`TreeSettings::tropism`] bias is
///    added and the result renormalized.
/// 2. The node forks instead, with one candidate towards each point it
///    attracted, when that direction is degenerate (the influences cancel)
///    or would land on a child the node already has.
/// 3. Each candidate child sits at `pos + dir * node_size` and is skipped
///    if the node already has, or is about to get, a child there.
///
/// Children are appended after all candidates are computed, so this phase
/// only reads the influences of the nodes that existed when it started.
///
/// ### Returns
/// The ids of the new nodes in the order they were added.
pub fn growth_phase(
    tree: &mut Tree,
    attractors: &AttractorSet,
    acc: &InfluenceBuffer,
    cfg: &TreeSettings,
) -> Vec<NodeId> {
    let eps = cfg.node_size * DUPLICATE_CHILD_FRACTION;
    let mut to_add: Vec<(NodeId, Vec3, Vec3)> = Vec::with_capacity(16);

    for id in acc.influenced_indices() {
        let origin = tree.nodes[id].pos;
        let taken = |to_add: &[(NodeId, Vec3, Vec3)], dir: Vec3| {
            let pos = origin + dir * cfg.node_size;
            tree.has_child_near(id, pos, eps)
                || to_add
                    .iter()
                    .any(|&(p, q, _)| p == id && (q - pos).length_squared() < eps * eps)
        };

        let averaged = steer(acc.avg_dir(id), cfg.tropism).filter(|&dir| !taken(&to_add, dir));
        let candidates: Vec<Vec3> = match averaged {
            Some(dir) => vec![dir],
            None => attractors
                .points
                .iter()
                .filter(|a| a.closest_node == Some(id))
                .filter_map(|a| steer(a.pos - origin, cfg.tropism))
                .collect(),
        };

        for dir in candidates {
            if !taken(&to_add, dir) {
                to_add.push((id, origin + dir * cfg.node_size, dir));
            }
        }
    }

    to_add
        .into_iter()
        .map(|(parent, pos, dir)| tree.add_child(parent, pos, dir))
        .collect()
}

/// Removes every attraction point within `kill_range` (inclusive) of any node.
///
/// ### Returns
/// The removed points.
pub fn kill_phase(
    tree: &Tree,
    attractors: &mut AttractorSet,
    cfg: &TreeSettings,
) -> Vec<AttractionPoint> {
    let kill2 = cfg.kill_range() * cfg.kill_range();
    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut attractors.points)
        .into_iter()
        .partition(|a| {
            tree.find_nearest_node(a.pos)
                .is_some_and(|(_id, d2)| d2 <= kill2)
        });
    attractors.points = kept;
    removed
}

/// Normalizes `dir`, applies `tropism` and renormalizes; `None` when the
/// result has no length.
fn steer(dir: Vec3, tropism: Vec3) -> Option<Vec3> {
    let dir = dir.try_normalize()?;
    (dir + tropism).try_normalize()
}
