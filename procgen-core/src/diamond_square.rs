//! Diamond-Square fractal heightfield generation.
//!
//! [`generate_heightfield`] runs the whole pipeline:
//! 1. [`seed_corners`] — draw the four corner heights.
//! 2. [`diamond_square`] — alternate diamond and square passes, halving the
//!    step and shrinking the random offset by `2^-h` each level.
//! 3. UVs, the height range and vertex normals on the finished grid.

use crate::{config::TerrainSettings, error::Result, heightfield::HeightfieldGrid};
use rand::Rng;
use tracing::{debug, info};

/// Generates a complete terrain grid from `settings`.
///
/// All randomness comes from `rng`, so a seeded generator reproduces the
/// same grid bit for bit.
pub fn generate_heightfield(
    settings: &TerrainSettings,
    rng: &mut impl Rng,
) -> Result<HeightfieldGrid> {
    settings.validate()?;

    let mut grid = HeightfieldGrid::flat(settings.size)?;
    seed_corners(&mut grid, settings.amplitude, rng);
    diamond_square(
        &mut grid,
        settings.amplitude,
        settings.roughness,
        settings.displace_edges,
        rng,
    );

    grid.assign_uvs(settings.tex_scale);
    grid.refresh_height_range();
    grid.compute_normals();

    info!(
        size = settings.size,
        min_height = grid.min_height(),
        max_height = grid.max_height(),
        "generated heightfield"
    );
    Ok(grid)
}

/// Draws the four corner heights from `uniform(-amplitude, amplitude)`.
///
/// Draw order is `(0, 0)`, `(0, S-1)`, `(S-1, S-1)`, `(S-1, 0)` as `(x, z)`.
pub fn seed_corners(grid: &mut HeightfieldGrid, amplitude: f32, rng: &mut impl Rng) {
    let last = grid.size() - 1;
    for (x, z) in [(0, 0), (0, last), (last, last), (last, 0)] {
        grid.set_height(x, z, offset(amplitude, rng));
    }
}

/// Fills every non-corner cell of `grid`.
///
/// ### Parameters
/// - `amplitude` - Maximum random offset for the first level.
/// - `roughness` - Exponent `h`; each level multiplies the offset by `2^-h`.
/// - `displace_edges` - Whether the square pass adds a random offset too.
pub fn diamond_square(
    grid: &mut HeightfieldGrid,
    amplitude: f32,
    roughness: f32,
    displace_edges: bool,
    rng: &mut impl Rng,
) {
    let size = grid.size();
    let decay = 2f32.powf(-roughness);
    let mut step = size - 1;
    let mut amplitude = amplitude;

    while step > 1 {
        let half = step / 2;
        debug!(step, amplitude, "diamond-square level");

        for x in (half..size - 1).step_by(step) {
            for z in (half..size - 1).step_by(step) {
                let h = diamond_average(grid, x, z, half) + offset(amplitude, rng);
                grid.set_height(x, z, h);
            }
        }

        // Columns alternate between starting at `half` and at 0, which
        // visits exactly the edge midpoints of every sub-square.
        let mut offset_column = false;
        for x in (0..size).step_by(half) {
            offset_column = !offset_column;
            let start = if offset_column { half } else { 0 };
            for z in (start..size).step_by(step) {
                let mut h = square_average(grid, x, z, half);
                if displace_edges {
                    h += offset(amplitude, rng);
                }
                grid.set_height(x, z, h);
            }
        }

        amplitude *= decay;
        step = half;
    }
}

fn offset(amplitude: f32, rng: &mut impl Rng) -> f32 {
    rng.random_range(-amplitude..=amplitude)
}

/// Average of the four diagonal corners at distance `half`.
fn diamond_average(grid: &HeightfieldGrid, x: usize, z: usize, half: usize) -> f32 {
    let (x0, x1, z0, z1) = (x - half, x + half, z - half, z + half);
    (grid.height(x0, z0) + grid.height(x0, z1) + grid.height(x1, z0) + grid.height(x1, z1))
        / 4.0
}

/// Average of the four axis neighbours at distance `half`, wrapping around
/// the grid edges.
fn square_average(grid: &HeightfieldGrid, x: usize, z: usize, half: usize) -> f32 {
    let size = grid.size();
    let (x, z, half) = (x as isize, z as isize, half as isize);
    let left = wrap(x - half, size);
    let right = wrap(x + half, size);
    let top = wrap(z - half, size);
    let bottom = wrap(z + half, size);
    let (x, z) = (x as usize, z as usize);
    (grid.height(left, z) + grid.height(right, z) + grid.height(x, top) + grid.height(x, bottom))
        / 4.0
}

/// Toroidal wrap: `c < 0 → S - |c|`, `c ≥ S → c - S`.
///
/// This does not map onto a seamless torus for `S = 2^k + 1`, since the first
/// and last rows coincide in position; the offset by one is kept as is.
#[inline]
fn wrap(coord: isize, size: usize) -> usize {
    let size = size as isize;
    let wrapped = if coord < 0 {
        size - coord.abs()
    } else if coord >= size {
        coord - size
    } else {
        coord
    };
    wrapped as usize
}
