//! Brute-force pairwise Lennard-Jones forces for point particles.
//!
//! Implements the host-side half of an all-pairs non-bonded force
//! computation:
//! - particle positions and seeded random generation
//! - Lennard-Jones parameters and pair force evaluation
//! - the linear work-item → (i, j) pair mapping used by the GPU kernel
//! - a sequential CPU reference pass for validation
//!
//! # Example
//!
//! ```
//! use ljgrid_md::{compute_forces, LjParams, ParticleSet, Vec3};
//!
//! // Two atoms one σ apart along x.
//! let set = ParticleSet::new(vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//! ]);
//!
//! let forces = compute_forces(&set, LjParams::default()).unwrap();
//!
//! // At r = σ the pair repels with magnitude 24·ε/σ.
//! assert!((forces[0].x + 24.0).abs() < 1e-12);
//! assert!((forces[1].x - 24.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod forcefield;
pub mod pairs;
pub mod particle;
pub mod reference;

pub use error::{LjError, Result};
pub use forcefield::{LjParams, R2_MIN};
pub use particle::ParticleSet;
pub use reference::compute_forces;

use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
