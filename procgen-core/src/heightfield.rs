//! Square vertex grid backing a terrain surface.

use crate::error::{GenError, Result};
use crate::types::{Index, Vertex};
use glam::Vec3;

/// Checks that `size` is `2^k + 1` for some `k >= 1` and that a
/// `size × size` grid stays addressable with 16-bit indices.
pub fn validate_size(size: usize) -> Result<()> {
    let shape_ok = size >= 3 && (size - 1).is_power_of_two();
    let fits = size
        .checked_mul(size)
        .is_some_and(|n| n <= Index::MAX as usize);
    if shape_ok && fits {
        Ok(())
    } else {
        Err(GenError::InvalidSize(size))
    }
}

/// A `size × size` grid of terrain vertices.
///
/// Cell `(x, z)` lives at `z * size + x` in [`HeightfieldGrid::vertices`] and
/// its position starts out as `(x, 0, z)`; generators only ever change the
/// height component.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightfieldGrid {
    size: usize,
    vertices: Vec<Vertex>,
    min_height: f32,
    max_height: f32,
}

impl HeightfieldGrid {
    /// Creates a flat grid with zeroed normals and UVs.
    pub fn flat(size: usize) -> Result<Self> {
        validate_size(size)?;
        let mut vertices = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                vertices.push(Vertex {
                    position: Vec3::new(x as f32, 0.0, z as f32),
                    ..Vertex::default()
                });
            }
        }

        Ok(Self {
            size,
            vertices,
            min_height: 0.0,
            max_height: 0.0,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Lowest height, valid once [`HeightfieldGrid::refresh_height_range`] has run.
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn get(&self, x: usize, z: usize) -> Option<&Vertex> {
        if x < self.size && z < self.size {
            self.vertices.get(z * self.size + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> Option<&mut Vertex> {
        if x < self.size && z < self.size {
            self.vertices.get_mut(z * self.size + x)
        } else {
            None
        }
    }

    /// Height at `(x, z)`.
    ///
    /// ### Panics
    /// Panics if either coordinate is outside the grid.
    #[inline]
    pub fn height(&self, x: usize, z: usize) -> f32 {
        assert!(x < self.size && z < self.size, "({x}, {z}) outside grid");
        self.vertices[z * self.size + x].position.y
    }

    /// Sets the height at `(x, z)`.
    ///
    /// ### Panics
    /// Panics if either coordinate is outside the grid.
    #[inline]
    pub fn set_height(&mut self, x: usize, z: usize, height: f32) {
        assert!(x < self.size && z < self.size, "({x}, {z}) outside grid");
        self.vertices[z * self.size + x].position.y = height;
    }

    /// Recomputes the cached min/max heights.
    pub fn refresh_height_range(&mut self) {
        let (min, max) = self
            .vertices
            .iter()
            .map(|v| v.position.y)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });
        self.min_height = min;
        self.max_height = max;
    }

    /// Assigns UVs running linearly from 0 to `size * tex_scale` on both axes.
    pub fn assign_uvs(&mut self, tex_scale: f32) {
        let span = self.size as f32 * tex_scale;
        let last = (self.size - 1) as f32;
        for z in 0..self.size {
            for x in 0..self.size {
                let v = &mut self.vertices[z * self.size + x];
                v.uv.x = span * (x as f32 / last);
                v.uv.y = span * (z as f32 / last);
            }
        }
    }

    /// Rebuilds every vertex normal from the faces around it.
    ///
    /// Each quad `(x, z)` is split into `T0 = (v(x,z), v(x,z+1), v(x+1,z))`
    /// and `T1 = (v(x+1,z+1), v(x+1,z), v(x,z+1))`. A face normal is the plain
    /// sum of the three corner cross products, so larger triangles weigh more.
    /// A vertex sums the triangles that touch it; border vertices simply see
    /// fewer quads.
    pub fn compute_normals(&mut self) {
        let n = self.size;
        let quads = n - 1;
        let pos = |x: usize, z: usize| self.vertices[z * n + x].position;

        let mut faces = vec![[Vec3::ZERO; 2]; quads * quads];
        for z in 0..quads {
            for x in 0..quads {
                faces[z * quads + x] = [
                    face_normal(pos(x, z), pos(x, z + 1), pos(x + 1, z)),
                    face_normal(pos(x + 1, z + 1), pos(x + 1, z), pos(x, z + 1)),
                ];
            }
        }

        let face = |x: usize, z: usize| faces[z * quads + x];
        for z in 0..n {
            for x in 0..n {
                let mut normal = Vec3::ZERO;
                if z > 0 {
                    if x > 0 {
                        normal += face(x - 1, z - 1)[1];
                    }
                    if x < quads {
                        let [a, b] = face(x, z - 1);
                        normal += a + b;
                    }
                }
                if z < quads {
                    if x > 0 {
                        let [a, b] = face(x - 1, z);
                        normal += a + b;
                    }
                    if x < quads {
                        normal += face(x, z)[0];
                    }
                }
                self.vertices[z * n + x].normal = normal.normalize_or(Vec3::Y);
            }
        }
    }
}

fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (a - b).cross(a - c) + (b - c).cross(b - a) + (c - a).cross(c - b)
}
