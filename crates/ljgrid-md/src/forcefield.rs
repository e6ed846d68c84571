//! Lennard-Jones parameters and pair force evaluation.

use crate::Vec3;

/// Squared-separation floor below which a pair counts as coincident.
///
/// The force coefficient divides by r² (and r⁶, r¹²); below this threshold
/// the result is no longer meaningful and validation rejects the input.
pub const R2_MIN: f64 = 1e-12;

/// Lennard-Jones interaction parameters.
///
/// σ is the characteristic distance (the potential crosses zero at r = σ)
/// and ε the well depth. Passed explicitly into every force evaluation
/// rather than baked in as globals, so per-species parameters stay possible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LjParams {
    pub sigma: f64,
    pub epsilon: f64,
}

impl Default for LjParams {
    /// Reduced units: σ = 1, ε = 1.
    fn default() -> Self {
        Self {
            sigma: 1.0,
            epsilon: 1.0,
        }
    }
}

impl LjParams {
    pub fn new(sigma: f64, epsilon: f64) -> Self {
        Self { sigma, epsilon }
    }

    /// Argon: σ = 3.4 Å, ε = 0.0104 eV.
    pub fn argon() -> Self {
        Self {
            sigma: 3.4,
            epsilon: 0.0104,
        }
    }

    /// Distance of the potential minimum, 2^(1/6)·σ.
    ///
    /// Below this the force is repulsive, beyond it attractive and decaying.
    pub fn equilibrium_distance(&self) -> f64 {
        2f64.powf(1.0 / 6.0) * self.sigma
    }

    /// Scalar coefficient `f` such that the force on particle i is
    /// `f · (x_i − x_j)` for squared separation `r2`:
    ///
    /// ```text
    /// f = 24·ε·(2·σ¹²/r¹² − σ⁶/r⁶) / r²
    /// ```
    ///
    /// Precondition: `r2 >= R2_MIN`. Callers are expected to have validated
    /// the particle set; a smaller r2 divides by near-zero.
    #[inline]
    pub fn force_coefficient(&self, r2: f64) -> f64 {
        let sr2 = self.sigma * self.sigma / r2;
        let sr6 = sr2 * sr2 * sr2;
        let sr12 = sr6 * sr6;
        24.0 * self.epsilon * (2.0 * sr12 - sr6) / r2
    }

    /// Force on particle i for displacement `d = x_i − x_j`.
    ///
    /// The force on j is the negation (Newton's third law).
    #[inline]
    pub fn pair_force(&self, d: Vec3) -> Vec3 {
        self.force_coefficient(d.norm_squared()) * d
    }
}
