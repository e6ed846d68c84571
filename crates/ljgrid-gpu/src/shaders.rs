//! WGSL compute shaders for the all-pairs pair kernel.

/// WGSL shader for the Lennard-Jones pair-force scatter.
///
/// Dispatched over the full n×n grid; each work item derives (i, j) from its
/// linear id and only the upper-triangle representative of each unordered
/// pair does any work. Force components are scaled to fixed point and added
/// with `atomicAdd` (wgpu only supports integer atomics, and the i32
/// encoding makes concurrent accumulation both lossless and order
/// independent). The conversion to i32 saturates, so even a clamped
/// near-coincident pair produces a large finite value, never NaN.
///
/// `SCALE` must match [`crate::pair_kernel::FIXED_POINT_SCALE`].
pub const LJ_FORCE_SHADER: &str = r#"
struct PairParams {
    n: u32,
    sigma: f32,
    epsilon: f32,
    r2_min: f32,
}

@group(0) @binding(0) var<uniform> params: PairParams;
@group(0) @binding(1) var<storage, read> pos_x: array<f32>;
@group(0) @binding(2) var<storage, read> pos_y: array<f32>;
@group(0) @binding(3) var<storage, read> pos_z: array<f32>;
@group(0) @binding(4) var<storage, read_write> force_x: array<atomic<i32>>;
@group(0) @binding(5) var<storage, read_write> force_y: array<atomic<i32>>;
@group(0) @binding(6) var<storage, read_write> force_z: array<atomic<i32>>;

const SCALE: f32 = 1000000.0;

@compute @workgroup_size(256)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let id = gid.x;
    let n = params.n;

    if (id >= n * n) {
        return;
    }

    let i = id / n;
    let j = id % n;

    // Keep only the upper-triangle representative of each unordered pair;
    // this also drops self-pairs.
    if (i >= j) {
        return;
    }

    let dx = pos_x[i] - pos_x[j];
    let dy = pos_y[i] - pos_y[j];
    let dz = pos_z[i] - pos_z[j];
    // Host validation rejects coincident pairs; the clamp keeps a misused
    // kernel finite instead of writing NaN into the accumulators.
    let r2 = max(dx * dx + dy * dy + dz * dz, params.r2_min);

    let s2 = params.sigma * params.sigma;
    let sr2 = s2 / r2;
    let sr6 = sr2 * sr2 * sr2;
    let f = 24.0 * params.epsilon * (2.0 * sr6 * sr6 - sr6) / r2;

    let fx = i32(f * dx * SCALE);
    let fy = i32(f * dy * SCALE);
    let fz = i32(f * dz * SCALE);

    atomicAdd(&force_x[i], fx);
    atomicAdd(&force_y[i], fy);
    atomicAdd(&force_z[i], fz);
    atomicAdd(&force_x[j], -fx);
    atomicAdd(&force_y[j], -fy);
    atomicAdd(&force_z[j], -fz);
}
"#;

/// WGSL shader for the instrumented pair-visit count.
///
/// Same id → (i, j) mapping and filter as the force shader, but increments a
/// per-particle counter instead of accumulating forces. After a full pass
/// every counter must read n − 1: each pair touched exactly once.
pub const PAIR_COUNT_SHADER: &str = r#"
struct PairParams {
    n: u32,
    sigma: f32,
    epsilon: f32,
    r2_min: f32,
}

@group(0) @binding(0) var<uniform> params: PairParams;
@group(0) @binding(1) var<storage, read_write> visits: array<atomic<u32>>;

@compute @workgroup_size(256)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let id = gid.x;
    let n = params.n;

    if (id >= n * n) {
        return;
    }

    let i = id / n;
    let j = id % n;
    if (i >= j) {
        return;
    }

    atomicAdd(&visits[i], 1u);
    atomicAdd(&visits[j], 1u);
}
"#;
