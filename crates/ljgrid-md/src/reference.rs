//! Sequential CPU reference for the all-pairs force computation.
//!
//! Walks the same upper-triangle pair set as the GPU kernel, in dispatch
//! order, accumulating equal-and-opposite contributions. Used to validate
//! the GPU path and as a fallback where no adapter exists.

use crate::forcefield::{LjParams, R2_MIN};
use crate::{pairs, LjError, ParticleSet, Result, Vec3};

/// Compute net Lennard-Jones forces on every particle.
///
/// Each unordered pair (i, j) contributes once: `+f·d` to i and `−f·d` to j.
/// Coincident pairs are a validation error, not a NaN in the output.
pub fn compute_forces(set: &ParticleSet, params: LjParams) -> Result<Vec<Vec3>> {
    let n = set.len();
    let mut forces = vec![Vec3::zeros(); n];

    for (i, j) in pairs::upper_pairs(n) {
        let d = set.position(i) - set.position(j);
        let r2 = d.norm_squared();
        if r2 < R2_MIN {
            return Err(LjError::CoincidentParticles {
                i,
                j,
                r2,
                min: R2_MIN,
            });
        }
        let f = params.force_coefficient(r2) * d;
        forces[i] += f;
        forces[j] -= f;
    }

    Ok(forces)
}
