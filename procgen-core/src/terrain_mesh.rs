//! Triangle-strip index generation for a finished heightfield.

use crate::{
    error::{GenError, Result},
    heightfield::HeightfieldGrid,
    types::{Index, Vertex},
};
use tracing::info;

/// Renderable terrain: vertices, a triangle-strip index buffer and the
/// height range the shader uses for texture blending.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    /// Side length of the source grid; vertex `(x, z)` is at `z * size + x`.
    pub size: usize,
    pub vertices: Vec<Vertex>,
    /// Indices for a single triangle strip; rows are joined by degenerate
    /// triangles.
    pub indices: Vec<Index>,
    pub min_height: f32,
    pub max_height: f32,
}

impl TerrainMesh {
    /// Expands the strip into an indexed triangle list.
    ///
    /// Degenerate stitching triangles are dropped and every odd strip
    /// triangle has its first two indices swapped, so all triangles share
    /// the winding of the first one.
    pub fn triangles(&self) -> impl Iterator<Item = [Index; 3]> + '_ {
        self.indices
            .windows(3)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1] && w[1] != w[2] && w[0] != w[2])
            .map(|(i, w)| {
                if i % 2 == 0 {
                    [w[0], w[1], w[2]]
                } else {
                    [w[1], w[0], w[2]]
                }
            })
    }
}

/// Builds the triangle-strip mesh for `grid`.
///
/// Each row pair contributes `2 * size` indices, followed by two degenerate
/// indices (the row's last index and the next row's first) that stitch the
/// rows into one strip. The two trailing degenerates are trimmed.
///
/// ### Errors
/// [`GenError::IndexOverflow`] if `size * size` exceeds the 16-bit range.
/// [`HeightfieldGrid`] refuses such sizes on construction.
pub fn build_terrain_mesh(grid: &HeightfieldGrid) -> Result<TerrainMesh> {
    let grid_size = grid.size();
    let vertex_count = grid_size
        .checked_mul(grid_size)
        .filter(|&n| n <= Index::MAX as usize)
        .ok_or(GenError::IndexOverflow {
            vertices: grid.vertices().len(),
        })?;

    let size = grid_size as Index;
    let mut indices = Vec::with_capacity(2 * size as usize * (size as usize - 1) + 2);
    for z in 0..size - 1 {
        for x in 0..size {
            indices.push(z * size + x);
            indices.push(z * size + x + size);
        }
        indices.push(z * size + size + size - 1);
        indices.push(z * size + size);
    }
    indices.truncate(indices.len() - 2);

    info!(
        vertices = vertex_count,
        indices = indices.len(),
        "built terrain strip"
    );

    Ok(TerrainMesh {
        size: grid_size,
        vertices: grid.vertices().to_vec(),
        indices,
        min_height: grid.min_height(),
        max_height: grid.max_height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TerrainSettings, config::make_rng, diamond_square::generate_heightfield};

    fn terrain(size: usize) -> TerrainMesh {
        let s = TerrainSettings {
            size,
            seed: Some(3),
            ..TerrainSettings::default()
        };
        let grid = generate_heightfield(&s, &mut make_rng(s.seed)).unwrap();
        build_terrain_mesh(&grid).unwrap()
    }

    #[test]
    fn three_by_three_strip_layout() {
        let grid = HeightfieldGrid::flat(3).unwrap();
        let mesh = build_terrain_mesh(&grid).unwrap();
        assert_eq!(
            mesh.indices,
            vec![0, 3, 1, 4, 2, 5, 5, 3, 3, 6, 4, 7, 5, 8]
        );
    }

    #[test]
    fn indices_stay_inside_vertex_buffer() {
        for size in [3, 5, 17, 65, 129] {
            let mesh = terrain(size);
            assert_eq!(mesh.vertices.len(), size * size);
            let expected = 2 * size * (size - 1) + 2 * (size - 2);
            assert_eq!(mesh.indices.len(), expected);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < size * size));
        }
    }

    #[test]
    fn only_stitching_triangles_are_degenerate() {
        let mesh = terrain(17);
        for w in mesh.indices.windows(3) {
            let repeated = w[0] == w[1] || w[1] == w[2] || w[0] == w[2];
            if repeated {
                continue;
            }
            let [a, b, c] = [w[0], w[1], w[2]].map(|i| mesh.vertices[i as usize].position);
            let area = (b - a).cross(c - a).length();
            assert!(area > 1e-6, "zero-area triangle {w:?}");
        }
    }

    #[test]
    fn triangle_list_has_two_triangles_per_quad_with_upward_winding() {
        let grid = HeightfieldGrid::flat(5).unwrap();
        let mesh = build_terrain_mesh(&grid).unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris.len(), 2 * 4 * 4);

        let first = {
            let [a, b, c] = tris[0].map(|i| mesh.vertices[i as usize].position);
            (b - a).cross(c - a).y.signum()
        };
        for t in &tris {
            let [a, b, c] = t.map(|i| mesh.vertices[i as usize].position);
            assert_eq!((b - a).cross(c - a).y.signum(), first);
        }
    }

    #[test]
    fn height_range_is_carried_over() {
        let s = TerrainSettings {
            size: 9,
            seed: Some(11),
            ..TerrainSettings::default()
        };
        let grid = generate_heightfield(&s, &mut make_rng(s.seed)).unwrap();
        let mesh = build_terrain_mesh(&grid).unwrap();
        assert_eq!(mesh.min_height, grid.min_height());
        assert_eq!(mesh.max_height, grid.max_height());
        assert!(mesh.min_height <= mesh.max_height);
    }

    #[test]
    fn oversized_grid_never_reaches_the_mesher() {
        // 257² vertices would overflow u16 indices.
        assert_eq!(HeightfieldGrid::flat(257), Err(GenError::InvalidSize(257)));
        let largest = HeightfieldGrid::flat(129).unwrap();
        let mesh = build_terrain_mesh(&largest).unwrap();
        assert_eq!(mesh.size, 129);
        assert_eq!(mesh.indices.iter().copied().max(), Some(129 * 129 - 1));
    }
}
