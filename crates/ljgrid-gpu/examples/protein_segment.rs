//! Pairwise Lennard-Jones forces on a small segment of atoms.
//!
//! Builds a jittered cubic lattice (a stand-in for e.g. a protein segment),
//! runs one GPU force pass, and prints the net force on every atom. Falls
//! back to the CPU reference when no GPU adapter is available.

use ljgrid_gpu::{GpuError, PairForceGpu};
use ljgrid_md::{compute_forces, LjParams, ParticleSet, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = LjParams::default();
    let n_side = 3;
    let spacing = 1.3 * params.sigma;

    // Cubic lattice with a little positional noise so forces are nontrivial.
    let mut rng = StdRng::seed_from_u64(7);
    let mut positions = Vec::new();
    for ix in 0..n_side {
        for iy in 0..n_side {
            for iz in 0..n_side {
                positions.push(Vec3::new(
                    ix as f64 * spacing + rng.gen_range(-0.05..0.05),
                    iy as f64 * spacing + rng.gen_range(-0.05..0.05),
                    iz as f64 * spacing + rng.gen_range(-0.05..0.05),
                ));
            }
        }
    }
    let set = ParticleSet::new(positions);
    println!("{} atoms, σ = {}, ε = {}\n", set.len(), params.sigma, params.epsilon);

    let forces = match PairForceGpu::new(set.len(), params) {
        Ok(kernel) => kernel.compute_forces(&set)?,
        Err(GpuError::NoAdapter) => {
            log::warn!("no GPU adapter found, using CPU reference");
            compute_forces(&set, params)?
        }
        Err(e) => return Err(e.into()),
    };

    for (i, f) in forces.iter().enumerate() {
        println!("Force on atom {}: ({}, {}, {})", i, f.x, f.y, f.z);
    }

    Ok(())
}
