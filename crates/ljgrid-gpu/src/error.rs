//! Error types for ljgrid-gpu.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("too many particles for a single dispatch: {n} (max {max})")]
    TooManyParticles { n: usize, max: usize },

    #[error("particle set has {got} particles but kernel was sized for {expected}")]
    WrongParticleCount { expected: usize, got: usize },

    #[error("mapping {buffer} staging buffer failed: {source}")]
    BufferMap {
        buffer: &'static str,
        source: wgpu::BufferAsyncError,
    },

    #[error("{buffer} staging readback channel closed before completion")]
    MapChannelClosed { buffer: &'static str },

    #[error(transparent)]
    Validation(#[from] ljgrid_md::LjError),
}

pub type Result<T> = std::result::Result<T, GpuError>;
