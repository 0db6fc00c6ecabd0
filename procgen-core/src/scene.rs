//! Demo scene assembly: terrain, an animated water sheet and a tree standing
//! on the terrain, each paired with the plain data a renderer needs to place
//! and shade it.

use crate::{
    branch_mesh::{build_branch_mesh, skeleton_lines},
    config::{TerrainSettings, TreeSettings, WaterSettings, make_rng},
    diamond_square::generate_heightfield,
    error::{GenError, Result},
    grower::grow,
    terrain_mesh::{TerrainMesh, build_terrain_mesh},
    tree::TreeSkeleton,
    types::MeshBuffers,
};
use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Placement of a mesh in world space.
///
/// `rotation` holds Euler angles in radians, composed as `Rx * Ry * Rz`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale)
    }

    /// Inverse-transpose of the model matrix's upper 3×3, for normals.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix()).inverse().transpose()
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.model_matrix().transform_point3(p)
    }
}

/// Phong material constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emissive: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            emissive: Vec3::ZERO,
            shininess: 0.0,
        }
    }
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.5, 10.0, 2.5),
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }
}

/// Time input for an animated surface, consumed by the renderer rather than
/// the generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceAnimation {
    pub speed: f32,
}

impl SurfaceAnimation {
    /// Value for the surface's `time` uniform after `elapsed` seconds.
    pub fn phase(&self, elapsed: f32) -> f32 {
        elapsed * self.speed
    }
}

/// Everything needed to build a [`Scene`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainSettings,
    pub water: WaterSettings,
    pub tree: TreeSettings,
    pub terrain_material: Material,
    pub light: Light,
    pub global_ambient: GlobalAmbient,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalAmbient(pub Vec3);

impl Default for GlobalAmbient {
    fn default() -> Self {
        Self(Vec3::splat(0.2))
    }
}

#[derive(Clone, Debug)]
pub struct TerrainLayer {
    pub mesh: TerrainMesh,
    pub transform: Transform,
    pub material: Material,
}

#[derive(Clone, Debug)]
pub struct WaterLayer {
    pub mesh: TerrainMesh,
    pub transform: Transform,
    pub animation: SurfaceAnimation,
}

#[derive(Clone, Debug)]
pub struct TreeLayer {
    pub skeleton: TreeSkeleton,
    /// Tessellated branches; `None` when nothing grew past the root.
    pub branches: Option<MeshBuffers<Vec3>>,
    pub lines: MeshBuffers<Vec3>,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub terrain: TerrainLayer,
    pub water: Option<WaterLayer>,
    pub tree: TreeLayer,
    pub light: Light,
    pub global_ambient: Vec3,
}

/// Generates every part of the demo scene.
///
/// Each part draws from its own random source built from its settings'
/// seed. The tree is rooted on the terrain surface at the centre cell.
pub fn build_scene(config: &SceneConfig) -> Result<Scene> {
    let grid = generate_heightfield(&config.terrain, &mut make_rng(config.terrain.seed))?;
    let terrain_transform = Transform::default();

    let centre = grid.size() / 2;
    let root = grid
        .get(centre, centre)
        .map(|v| terrain_transform.transform_point(v.position))
        .unwrap_or(Vec3::ZERO);

    let terrain = TerrainLayer {
        mesh: build_terrain_mesh(&grid)?,
        transform: terrain_transform,
        material: config.terrain_material,
    };

    let water = if config.water.enabled {
        let surface = &config.water.surface;
        let sheet = generate_heightfield(surface, &mut make_rng(surface.seed))?;
        Some(WaterLayer {
            mesh: build_terrain_mesh(&sheet)?,
            transform: Transform::from_translation(Vec3::new(0.0, config.water.level, 0.0)),
            animation: SurfaceAnimation {
                speed: config.water.wave_speed,
            },
        })
    } else {
        None
    };

    let skeleton = grow(&config.tree, root, &mut make_rng(config.tree.seed))?;
    let branches = match skeleton.ensure_grown() {
        Ok(()) => Some(build_branch_mesh(
            &skeleton,
            config.tree.branch_sides,
            config.tree.node_size,
        )?),
        Err(GenError::EmptyTree) => {
            warn!("tree did not grow past its root; skipping branch mesh");
            None
        }
        Err(err) => return Err(err),
    };
    let lines = skeleton_lines(&skeleton)?;

    info!(
        terrain_vertices = terrain.mesh.vertices.len(),
        water = water.is_some(),
        tree_nodes = skeleton.node_count(),
        "scene built"
    );

    Ok(Scene {
        terrain,
        water,
        tree: TreeLayer {
            skeleton,
            branches,
            lines,
        },
        light: config.light,
        global_ambient: config.global_ambient.0,
    })
}
