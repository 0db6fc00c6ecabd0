//! Tessellation of a grown skeleton into renderable geometry.
//!
//! [`build_branch_mesh`] turns every parent→child segment into an open tube
//! made of two vertex rings; [`skeleton_lines`] emits the bare skeleton as a
//! line list for debug drawing.

use crate::{
    error::{GenError, Result},
    orientation::rotation_between,
    tree::TreeSkeleton,
    types::{Index, MeshBuffers},
};
use glam::{Quat, Vec3};
use std::f32::consts::TAU;
use tracing::{info, warn};

/// Builds one tube per non-root node.
///
/// Ring offsets start on a circle of radius `node_size / 2` perpendicular to
/// `+Y`. The bottom ring is that circle turned onto the parent's heading and
/// centred on the parent; the top ring is the bottom ring turned by the
/// rotation from the parent's heading to the node's heading and centred on
/// the node. Side `i` becomes the triangles `(b_i, t_i, b_i+1)` and
/// `(b_i+1, t_i, t_i+1)`, wound counter-clockwise seen from outside.
///
/// A bare skeleton yields empty buffers.
///
/// ### Errors
/// - [`GenError::InvalidSettings`] if `branch_sides < 3`.
/// - [`GenError::IndexOverflow`] if the vertices do not fit `u16` indices.
pub fn build_branch_mesh(
    skeleton: &TreeSkeleton,
    branch_sides: usize,
    node_size: f32,
) -> Result<MeshBuffers<Vec3>> {
    if branch_sides < 3 {
        return Err(GenError::InvalidSettings(format!(
            "branch_sides must be at least 3, got {branch_sides}"
        )));
    }

    let nodes = &skeleton.tree.nodes;
    let segments = nodes.len().saturating_sub(1);
    let vertex_count = segments
        .checked_mul(2)
        .and_then(|n| n.checked_mul(branch_sides))
        .filter(|&n| n <= Index::MAX as usize)
        .ok_or(GenError::IndexOverflow {
            vertices: segments.saturating_mul(2).saturating_mul(branch_sides),
        })?;

    let radius = node_size / 2.0;
    let circle: Vec<Vec3> = (0..branch_sides)
        .map(|i| {
            let t = i as f32 / branch_sides as f32 * TAU;
            Vec3::new(t.cos(), 0.0, t.sin()) * radius
        })
        .collect();

    let mut mesh = MeshBuffers {
        vertices: Vec::with_capacity(vertex_count),
        indices: Vec::with_capacity(segments * 6 * branch_sides),
    };

    for node in nodes.iter() {
        let Some(parent_id) = node.parent else {
            continue;
        };
        let parent = &nodes[parent_id];

        let base = orient(Vec3::Y, parent.direction);
        let bend = orient(parent.direction, node.direction);

        let first = mesh.vertices.len();
        for &offset in &circle {
            mesh.vertices.push(parent.pos + base * offset);
        }
        for &offset in &circle {
            mesh.vertices.push(node.pos + bend * (base * offset));
        }

        let n = branch_sides;
        for i in 0..n {
            let j = (i + 1) % n;
            let (b0, b1) = (first + i, first + j);
            let (t0, t1) = (first + n + i, first + n + j);
            mesh.indices
                .extend([b0, t0, b1, b1, t0, t1].map(|v| v as Index));
        }
    }

    info!(
        segments,
        vertices = mesh.vertices.len(),
        indices = mesh.indices.len(),
        "built branch mesh"
    );
    Ok(mesh)
}

/// Skeleton as a line list: one vertex per node, one index pair per
/// parent→child edge.
///
/// ### Errors
/// [`GenError::IndexOverflow`] if the nodes do not fit `u16` indices.
pub fn skeleton_lines(skeleton: &TreeSkeleton) -> Result<MeshBuffers<Vec3>> {
    let nodes = &skeleton.tree.nodes;
    if nodes.len() > Index::MAX as usize {
        return Err(GenError::IndexOverflow {
            vertices: nodes.len(),
        });
    }

    let vertices = nodes.iter().map(|n| n.pos).collect();
    let indices = nodes
        .iter()
        .enumerate()
        .filter_map(|(id, n)| n.parent.map(|p| [p as Index, id as Index]))
        .flatten()
        .collect();

    Ok(MeshBuffers { vertices, indices })
}

/// [`rotation_between`], falling back to no rotation for degenerate input.
fn orient(from: Vec3, to: Vec3) -> Quat {
    rotation_between(from, to).unwrap_or_else(|err| {
        warn!(%err, "using identity rotation for branch ring");
        Quat::IDENTITY
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attractor::AttractorSet, config::TreeSettings, config::make_rng, grower::grow};
    use glam::Vec3Swizzles;

    fn skeleton_with(children: &[(usize, Vec3, Vec3)]) -> TreeSkeleton {
        let mut skeleton = TreeSkeleton::new(Vec3::ZERO, AttractorSet::default());
        for &(parent, pos, dir) in children {
            skeleton.tree.add_child(parent, pos, dir);
        }
        skeleton
    }

    #[test]
    fn bare_skeleton_gives_empty_buffers() {
        let skeleton = skeleton_with(&[]);
        let mesh = build_branch_mesh(&skeleton, 6, 0.5).unwrap();
        assert!(mesh.is_empty());
        let lines = skeleton_lines(&skeleton).unwrap();
        assert_eq!(lines.vertices.len(), 1);
        assert!(lines.indices.is_empty());
    }

    #[test]
    fn vertical_segment_is_a_straight_tube() {
        let skeleton = skeleton_with(&[(0, Vec3::new(0.0, 0.5, 0.0), Vec3::Y)]);
        let mesh = build_branch_mesh(&skeleton, 4, 0.5).unwrap();

        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 24);
        for v in &mesh.vertices[..4] {
            assert!(v.y.abs() < 1e-6);
            assert!((v.xz().length() - 0.25).abs() < 1e-6);
        }
        for v in &mesh.vertices[4..] {
            assert!((v.y - 0.5).abs() < 1e-6);
            assert!((v.xz().length() - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn triangles_face_outwards() {
        let skeleton = skeleton_with(&[(0, Vec3::new(0.0, 1.0, 0.0), Vec3::Y)]);
        let mesh = build_branch_mesh(&skeleton, 8, 0.5).unwrap();
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            let outward = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(normal.dot(outward) > 0.0);
        }
    }

    #[test]
    fn top_ring_is_perpendicular_to_node_heading() {
        let skeleton = skeleton_with(&[(0, Vec3::new(0.5, 0.0, 0.0), Vec3::X)]);
        let mesh = build_branch_mesh(&skeleton, 6, 0.5).unwrap();
        let node = Vec3::new(0.5, 0.0, 0.0);
        for v in &mesh.vertices[6..] {
            let offset = *v - node;
            assert!(offset.dot(Vec3::X).abs() < 1e-5);
            assert!((offset.length() - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn reversed_heading_stays_finite() {
        let skeleton = skeleton_with(&[
            (0, Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
            (1, Vec3::new(0.0, 0.0, 0.0), -Vec3::Y),
        ]);
        let mesh = build_branch_mesh(&skeleton, 5, 0.5).unwrap();
        assert_eq!(mesh.vertices.len(), 2 * 2 * 5);
        assert!(mesh.vertices.iter().all(|v| v.is_finite()));
        for v in &mesh.vertices[15..] {
            assert!(v.y.abs() < 1e-5);
        }
    }

    #[test]
    fn zero_heading_falls_back_without_nan() {
        let skeleton = skeleton_with(&[(0, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO)]);
        let mesh = build_branch_mesh(&skeleton, 3, 0.5).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn indices_reference_own_segment_only() {
        let cfg = TreeSettings {
            attraction_point_count: 150,
            seed: Some(23),
            ..TreeSettings::default()
        };
        let skeleton = grow(&cfg, Vec3::ZERO, &mut make_rng(cfg.seed)).unwrap();
        skeleton.ensure_grown().unwrap();

        let sides = cfg.branch_sides;
        let mesh = build_branch_mesh(&skeleton, sides, cfg.node_size).unwrap();
        let segments = skeleton.node_count() - 1;
        assert_eq!(mesh.vertices.len(), segments * 2 * sides);
        assert_eq!(mesh.indices.len(), segments * 6 * sides);

        for (seg, tris) in mesh.indices.chunks(6 * sides).enumerate() {
            let lo = seg * 2 * sides;
            let hi = lo + 2 * sides;
            assert!(tris.iter().all(|&i| (lo..hi).contains(&(i as usize))));
        }
    }

    #[test]
    fn too_few_sides_is_rejected() {
        let skeleton = skeleton_with(&[(0, Vec3::Y, Vec3::Y)]);
        assert!(matches!(
            build_branch_mesh(&skeleton, 2, 0.5),
            Err(GenError::InvalidSettings(_))
        ));
    }

    #[test]
    fn too_many_vertices_is_an_overflow_error() {
        let skeleton = skeleton_with(&[(0, Vec3::Y, Vec3::Y)]);
        assert_eq!(
            build_branch_mesh(&skeleton, usize::MAX / 2 + 1, 0.5),
            Err(GenError::IndexOverflow {
                vertices: usize::MAX
            })
        );
        // One segment needs 2 * sides vertices; 32768 sides is one too many.
        assert_eq!(
            build_branch_mesh(&skeleton, 32_768, 0.5),
            Err(GenError::IndexOverflow { vertices: 65_536 })
        );
        assert!(build_branch_mesh(&skeleton, 32_767, 0.5).is_ok());
    }

    #[test]
    fn skeleton_lines_pair_parents_with_children() {
        let skeleton = skeleton_with(&[
            (0, Vec3::Y, Vec3::Y),
            (1, Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
            (1, Vec3::new(1.0, 1.0, 0.0), Vec3::X),
        ]);
        let lines = skeleton_lines(&skeleton).unwrap();
        assert_eq!(lines.vertices.len(), 4);
        assert_eq!(lines.indices, vec![0, 1, 1, 2, 1, 3]);
    }
}
