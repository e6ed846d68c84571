//! GPU all-pairs Lennard-Jones forces using wgpu compute shaders.
//!
//! One work item is dispatched per slot of the full n×n index grid; each
//! item derives its pair as `i = id / n`, `j = id % n`, discards everything
//! at or below the diagonal, and atomically accumulates the pair force into
//! both particles' accumulators. Accumulators are fixed-point `atomic<i32>`
//! storage (wgpu has no float atomic-add), converted back to f64 on readback.

pub mod error;
pub mod gpu_state;
pub mod pair_kernel;
pub mod shaders;

pub use error::{GpuError, Result};
pub use pair_kernel::{PairForceGpu, FIXED_POINT_SCALE, MAX_PARTICLES, WORKGROUP_SIZE};
