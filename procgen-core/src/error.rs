//! Error taxonomy shared by the generators and mesh builders.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("grid size {0} is not of the form 2^k + 1 with k >= 1")]
    InvalidSize(usize),

    #[error("{vertices} vertices do not fit a 16-bit index buffer")]
    IndexOverflow { vertices: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("degenerate direction vector {0:?} in branch orientation")]
    DegenerateGeometry(glam::Vec3),

    #[error("tree skeleton contains only its root node")]
    EmptyTree,
}

pub type Result<T> = std::result::Result<T, GenError>;
