//! Procedural terrain and tree generation library.
//!
//! Main components:
//! - [`diamond_square`] — fractal heightfield generation.
//! - [`heightfield`] — the square vertex grid, its normals and UVs.
//! - [`terrain_mesh`] — triangle-strip indexing of a heightfield.
//! - [`attractor`] — attraction points that pull branches.
//! - [`tree`] — tree nodes, topology and nearest-node queries.
//! - [`influence_buffer`] — per-iteration accumulated growth directions.
//! - [`phases`] — the attraction / growth / kill passes.
//! - [`grower`] — drives the passes until growth ends.
//! - [`orientation`] — shortest-arc rotations for branch rings.
//! - [`branch_mesh`] — branch tubes and skeleton lines.
//! - [`scene`] — assembles terrain, water and tree with placement data.
//! - [`config`] — generator settings and random sources.
//! - [`error`] — the crate error type.
//! - [`types`] — shared vertex layout, buffers and IDs.

pub mod attractor;
pub mod branch_mesh;
pub mod config;
pub mod diamond_square;
pub mod error;
pub mod grower;
pub mod heightfield;
pub mod influence_buffer;
pub mod orientation;
pub mod phases;
pub mod scene;
pub mod terrain_mesh;
pub mod tree;
pub mod types;

pub use error::{GenError, Result};
