//! Particle positions for the all-pairs force computation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::forcefield::R2_MIN;
use crate::{pairs, LjError, Result, Vec3};

/// An ordered set of point-particle positions.
///
/// Positions are immutable during a force pass; forces are returned as a
/// separate per-particle array by the CPU reference and GPU paths.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    positions: Vec<Vec3>,
}

impl ParticleSet {
    /// Create a set from explicit positions.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Create a set from three equal-length coordinate slices.
    ///
    /// This is the host-orchestration boundary: external callers hand over
    /// x/y/z arrays and get x/y/z force arrays back.
    pub fn from_coords(x: &[f64], y: &[f64], z: &[f64]) -> Result<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(LjError::MismatchedLengths {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        let positions = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&x, &y), &z)| Vec3::new(x, y, z))
            .collect();
        Ok(Self { positions })
    }

    /// Generate `n` particles uniformly distributed in a cubic box with the
    /// given edge length, using a seeded RNG for reproducibility.
    pub fn random(n: usize, box_size: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = (0..n)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(0.0..box_size),
                    rng.gen_range(0.0..box_size),
                    rng.gen_range(0.0..box_size),
                )
            })
            .collect();
        Self { positions }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the set holds no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of particle `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        self.positions[i]
    }

    /// All positions in particle order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Reject coincident particle pairs before a force pass.
    ///
    /// A pair closer than [`R2_MIN`] (squared) makes the Lennard-Jones
    /// formula divide by (near-)zero, so it is reported as a validation
    /// error rather than propagated as NaN/Inf through the accumulators.
    /// The GPU path runs this check host-side before dispatch.
    pub fn validate(&self) -> Result<()> {
        for (i, j) in pairs::upper_pairs(self.len()) {
            let r2 = (self.positions[i] - self.positions[j]).norm_squared();
            if r2 < R2_MIN {
                return Err(LjError::CoincidentParticles {
                    i,
                    j,
                    r2,
                    min: R2_MIN,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coords() {
        let set = ParticleSet::from_coords(&[0.0, 1.0], &[0.0, 2.0], &[0.0, 3.0]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.position(1), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_coords_mismatched() {
        let err = ParticleSet::from_coords(&[0.0, 1.0], &[0.0], &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            LjError::MismatchedLengths { x: 2, y: 1, z: 1 }
        ));
    }

    #[test]
    fn test_random_is_seeded() {
        let a = ParticleSet::random(16, 10.0, 42);
        let b = ParticleSet::random(16, 10.0, 42);
        assert_eq!(a.positions(), b.positions());

        let c = ParticleSet::random(16, 10.0, 43);
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn test_random_stays_in_box() {
        let set = ParticleSet::random(64, 5.0, 7);
        for p in set.positions() {
            assert!(p.x >= 0.0 && p.x < 5.0);
            assert!(p.y >= 0.0 && p.y < 5.0);
            assert!(p.z >= 0.0 && p.z < 5.0);
        }
    }

    #[test]
    fn test_validate_rejects_coincident() {
        let set = ParticleSet::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ]);
        let err = set.validate().unwrap_err();
        assert!(matches!(err, LjError::CoincidentParticles { i: 0, j: 2, .. }));
    }

    #[test]
    fn test_validate_accepts_separated() {
        let set = ParticleSet::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]);
        assert!(set.validate().is_ok());
    }
}
