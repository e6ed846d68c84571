//! GPU buffer management for the pair kernel.
//!
//! Owns the position storage buffers, the atomic force accumulators, the
//! instrumentation counters, and the staging buffers used for readback.

use bytemuck::Pod;
use ljgrid_md::ParticleSet;
use std::sync::Arc;

use crate::{GpuError, Result};

/// GPU-resident state for one kernel instance sized to `n` particles.
///
/// Positions are read-only during a dispatch; the force accumulators are the
/// only shared mutable resource and are written exclusively with `atomicAdd`.
pub struct GpuState {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub n: usize,

    // Position storage buffers (f32, read-only in the shader)
    pub pos_x: wgpu::Buffer,
    pub pos_y: wgpu::Buffer,
    pub pos_z: wgpu::Buffer,

    // Force accumulators (fixed-point atomic<i32>)
    pub force_x: wgpu::Buffer,
    pub force_y: wgpu::Buffer,
    pub force_z: wgpu::Buffer,

    // Pair-visit counters (atomic<u32>, instrumentation only)
    pub visits: wgpu::Buffer,

    // Staging buffers for readback
    force_x_staging: wgpu::Buffer,
    force_y_staging: wgpu::Buffer,
    force_z_staging: wgpu::Buffer,
    visits_staging: wgpu::Buffer,
}

impl GpuState {
    /// Allocate all buffers for `n` particles.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, n: usize) -> Self {
        // wgpu rejects zero-sized buffers; keep one element's worth around
        // for the n = 0 edge case.
        let size = (n * std::mem::size_of::<f32>()).max(4) as u64;

        let storage_in = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let accumulator = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        };
        let staging = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        log::debug!("allocating pair-kernel buffers: n = {n}, {size} B per array");

        Self {
            pos_x: storage_in("pos_x"),
            pos_y: storage_in("pos_y"),
            pos_z: storage_in("pos_z"),
            force_x: accumulator("force_x"),
            force_y: accumulator("force_y"),
            force_z: accumulator("force_z"),
            visits: accumulator("visits"),
            force_x_staging: staging("force_x_staging"),
            force_y_staging: staging("force_y_staging"),
            force_z_staging: staging("force_z_staging"),
            visits_staging: staging("visits_staging"),
            device,
            queue,
            n,
        }
    }

    /// Upload positions as three f32 coordinate arrays.
    pub fn upload_positions(&self, set: &ParticleSet) {
        let xs: Vec<f32> = set.positions().iter().map(|p| p.x as f32).collect();
        let ys: Vec<f32> = set.positions().iter().map(|p| p.y as f32).collect();
        let zs: Vec<f32> = set.positions().iter().map(|p| p.z as f32).collect();

        self.queue
            .write_buffer(&self.pos_x, 0, bytemuck::cast_slice(&xs));
        self.queue
            .write_buffer(&self.pos_y, 0, bytemuck::cast_slice(&ys));
        self.queue
            .write_buffer(&self.pos_z, 0, bytemuck::cast_slice(&zs));
    }

    /// Zero the force accumulators.
    ///
    /// Queued writes execute before any later-submitted dispatch, so the
    /// zeroing is complete and visible before accumulation starts.
    pub fn zero_forces(&self) {
        let zeros = vec![0u8; self.n * std::mem::size_of::<i32>()];
        if zeros.is_empty() {
            return;
        }
        self.queue.write_buffer(&self.force_x, 0, &zeros);
        self.queue.write_buffer(&self.force_y, 0, &zeros);
        self.queue.write_buffer(&self.force_z, 0, &zeros);
    }

    /// Zero the pair-visit counters.
    pub fn zero_visits(&self) {
        let zeros = vec![0u8; self.n * std::mem::size_of::<u32>()];
        if zeros.is_empty() {
            return;
        }
        self.queue.write_buffer(&self.visits, 0, &zeros);
    }

    /// Read back the fixed-point force accumulators.
    pub async fn download_forces(&self) -> Result<(Vec<i32>, Vec<i32>, Vec<i32>)> {
        let size = (self.n * std::mem::size_of::<i32>()) as u64;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("force_readback_encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.force_x, 0, &self.force_x_staging, 0, size);
        encoder.copy_buffer_to_buffer(&self.force_y, 0, &self.force_y_staging, 0, size);
        encoder.copy_buffer_to_buffer(&self.force_z, 0, &self.force_z_staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let fx = self.read_staging::<i32>(&self.force_x_staging, "force_x").await?;
        let fy = self.read_staging::<i32>(&self.force_y_staging, "force_y").await?;
        let fz = self.read_staging::<i32>(&self.force_z_staging, "force_z").await?;
        Ok((fx, fy, fz))
    }

    /// Read back the pair-visit counters.
    pub async fn download_visits(&self) -> Result<Vec<u32>> {
        let size = (self.n * std::mem::size_of::<u32>()) as u64;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("visits_readback_encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.visits, 0, &self.visits_staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        self.read_staging::<u32>(&self.visits_staging, "visits").await
    }

    /// Map a staging buffer and copy its contents out.
    ///
    /// `device.poll(Maintain::Wait)` plus the map callback form the full
    /// completion barrier: the map only resolves once every previously
    /// submitted dispatch has finished, so partial reads are impossible.
    async fn read_staging<T: Pod>(
        &self,
        staging: &wgpu::Buffer,
        name: &'static str,
    ) -> Result<Vec<T>> {
        let slice = staging.slice(..(self.n * std::mem::size_of::<T>()).max(4) as u64);

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });

        self.device.poll(wgpu::Maintain::Wait);

        rx.receive()
            .await
            .ok_or(GpuError::MapChannelClosed { buffer: name })?
            .map_err(|source| GpuError::BufferMap {
                buffer: name,
                source,
            })?;

        let data = slice.get_mapped_range();
        let out: Vec<T> = bytemuck::cast_slice(&data)[..self.n].to_vec();

        drop(data);
        staging.unmap();

        Ok(out)
    }
}
