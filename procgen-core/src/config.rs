use crate::error::{GenError, Result};
use glam::Vec3;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Builds the random source for a generator run.
///
/// A fixed seed gives bit-identical output across calls; `None` draws a
/// fresh seed from the operating system.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Parameters for the Diamond-Square heightfield.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Grid side length, must be `2^k + 1`.
    pub size: usize,
    /// Initial maximum random offset.
    pub amplitude: f32,
    /// Roughness exponent `h`; the offset shrinks by `2^-h` per level.
    pub roughness: f32,
    /// Texture repeats per grid cell along each axis.
    pub tex_scale: f32,
    /// Also displace the square-pass midpoints by a random offset.
    pub displace_edges: bool,
    pub seed: Option<u64>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            size: 33,
            amplitude: 7.0,
            roughness: 1.0,
            tex_scale: 0.75,
            displace_edges: false,
            seed: None,
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<()> {
        crate::heightfield::validate_size(self.size)?;
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(GenError::InvalidSettings(format!(
                "amplitude must be finite and non-negative, got {}",
                self.amplitude
            )));
        }
        if !self.roughness.is_finite() {
            return Err(GenError::InvalidSettings(format!(
                "roughness must be finite, got {}",
                self.roughness
            )));
        }
        if !self.tex_scale.is_finite() {
            return Err(GenError::InvalidSettings(format!(
                "tex_scale must be finite, got {}",
                self.tex_scale
            )));
        }
        Ok(())
    }
}

/// Parameters for the space-colonization tree.
///
/// Distances (`influence_radius`, `kill_distance`) are expressed in units of
/// `node_size`. The crown box is positioned relative to the tree origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    pub crown_centre: Vec3,
    /// Full box extents of the crown.
    pub crown_size: Vec3,
    pub attraction_point_count: usize,
    pub influence_radius: f32,
    pub kill_distance: f32,
    /// Segment length and branch diameter.
    pub node_size: f32,
    /// Vertices per branch ring.
    pub branch_sides: usize,
    pub max_iterations: usize,
    /// Constant bias added to every growth direction (e.g. gravity).
    pub tropism: Vec3,
    /// Seed each node's influence sum with its current heading.
    pub carry_heading: bool,
    pub seed: Option<u64>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            crown_centre: Vec3::new(0.0, 6.0, 0.0),
            crown_size: Vec3::new(8.0, 6.0, 8.0),
            attraction_point_count: 400,
            influence_radius: 12.0,
            kill_distance: 2.0,
            node_size: 0.5,
            branch_sides: 6,
            max_iterations: 200,
            tropism: Vec3::ZERO,
            carry_heading: true,
            seed: None,
        }
    }
}

impl TreeSettings {
    /// Influence band in world units.
    pub fn influence_distance(&self) -> f32 {
        self.influence_radius * self.node_size
    }

    /// Kill band in world units.
    pub fn kill_range(&self) -> f32 {
        self.kill_distance * self.node_size
    }

    pub fn validate(&self) -> Result<()> {
        if !self.node_size.is_finite() || self.node_size <= 0.0 {
            return Err(GenError::InvalidSettings(format!(
                "node_size must be positive, got {}",
                self.node_size
            )));
        }
        if !self.kill_distance.is_finite() || self.kill_distance < 0.0 {
            return Err(GenError::InvalidSettings(format!(
                "kill_distance must be finite and non-negative, got {}",
                self.kill_distance
            )));
        }
        if !self.influence_radius.is_finite() || self.influence_radius <= self.kill_distance {
            return Err(GenError::InvalidSettings(format!(
                "influence_radius ({}) must exceed kill_distance ({})",
                self.influence_radius, self.kill_distance
            )));
        }
        if self.branch_sides < 3 {
            return Err(GenError::InvalidSettings(format!(
                "branch_sides must be at least 3, got {}",
                self.branch_sides
            )));
        }
        if !self.crown_size.is_finite() || self.crown_size.min_element() < 0.0 {
            return Err(GenError::InvalidSettings(format!(
                "crown_size must be finite and non-negative, got {}",
                self.crown_size
            )));
        }
        if !self.crown_centre.is_finite() || !self.tropism.is_finite() {
            return Err(GenError::InvalidSettings(
                "crown_centre and tropism must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for the animated water sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSettings {
    pub enabled: bool,
    /// Height of the sheet's rest plane.
    pub level: f32,
    pub surface: TerrainSettings,
    /// Phase speed of the surface animation, in radians per second.
    pub wave_speed: f32,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: -1.0,
            surface: TerrainSettings {
                amplitude: 0.2,
                ..TerrainSettings::default()
            },
            wave_speed: 1.0,
        }
    }
}
