use crate::error::{GenError, Result};
use glam::{Quat, Vec3};
use std::f32::consts::PI;

const PARALLEL_EPS: f32 = 1e-6;

/// Smallest rotation taking direction `from` onto direction `to`.
///
/// Inputs need not be normalized. When the two directions are exactly
/// opposite the rotation axis is undefined; a half turn around
/// `cross(+Z, from)` is used instead, or around `cross(+X, from)` if `from`
/// is (anti)parallel to `+Z`.
///
/// ### Errors
/// [`GenError::DegenerateGeometry`] if either input has zero length or is
/// not finite.
pub fn rotation_between(from: Vec3, to: Vec3) -> Result<Quat> {
    let from = from
        .try_normalize()
        .ok_or(GenError::DegenerateGeometry(from))?;
    let to = to.try_normalize().ok_or(GenError::DegenerateGeometry(to))?;

    let cos_theta = from.dot(to);
    if cos_theta >= 1.0 - PARALLEL_EPS {
        return Ok(Quat::IDENTITY);
    }
    if cos_theta <= -1.0 + PARALLEL_EPS {
        let mut axis = Vec3::Z.cross(from);
        if axis.length_squared() < 0.01 {
            axis = Vec3::X.cross(from);
        }
        return Ok(Quat::from_axis_angle(axis.normalize(), PI));
    }

    let axis = from.cross(to);
    let s = ((1.0 + cos_theta) * 2.0).sqrt();
    let inv = 1.0 / s;
    Ok(Quat::from_xyzw(axis.x * inv, axis.y * inv, axis.z * inv, s * 0.5).normalize())
}
