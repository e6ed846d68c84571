//! All-pairs Lennard-Jones force kernel.
//!
//! Orchestrates device setup, the n×n grid dispatch, and readback.

use bytemuck::{Pod, Zeroable};
use ljgrid_md::{LjParams, ParticleSet, Vec3};
use std::sync::Arc;

use crate::gpu_state::GpuState;
use crate::shaders::{LJ_FORCE_SHADER, PAIR_COUNT_SHADER};
use crate::{GpuError, Result};

/// Work items per workgroup; the kernel's one dispatch-shape tuning knob.
pub const WORKGROUP_SIZE: u32 = 256;

/// Fixed-point scale for the atomic force accumulators (matches the shader).
pub const FIXED_POINT_SCALE: f32 = 1_000_000.0;

/// Largest particle count a single one-dimensional dispatch can cover:
/// ceil(n²/256) workgroups must stay within wgpu's 65535 per-dimension limit.
pub const MAX_PARTICLES: usize = 4095;

/// f32 analogue of [`ljgrid_md::R2_MIN`] used by the shader-side clamp.
const R2_MIN_F32: f32 = 1e-6;

/// Uniform parameters passed to both shaders.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PairParams {
    n: u32,
    sigma: f32,
    epsilon: f32,
    r2_min: f32,
}

/// GPU all-pairs force kernel sized to a fixed particle count.
///
/// Dispatches one work item per slot of the n×n index grid; valid items
/// (i < j) accumulate equal-and-opposite force contributions with atomic
/// adds. Construction performs all device and pipeline setup; a setup
/// failure identifies the step that failed.
pub struct PairForceGpu {
    state: GpuState,
    n: usize,

    force_pipeline: wgpu::ComputePipeline,
    count_pipeline: wgpu::ComputePipeline,
    force_bind_group: wgpu::BindGroup,
    count_bind_group: wgpu::BindGroup,

    _params_buffer: wgpu::Buffer,
}

impl PairForceGpu {
    /// Create a kernel instance for `n` particles.
    pub fn new(n: usize, params: LjParams) -> Result<Self> {
        if n > MAX_PARTICLES {
            return Err(GpuError::TooManyParticles {
                n,
                max: MAX_PARTICLES,
            });
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("pair kernel on {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ljgrid-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let state = GpuState::new(device.clone(), queue.clone(), n);

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pair_params"),
            size: std::mem::size_of::<PairParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(
            &params_buffer,
            0,
            bytemuck::bytes_of(&PairParams {
                n: n as u32,
                sigma: params.sigma as f32,
                epsilon: params.epsilon as f32,
                r2_min: R2_MIN_F32,
            }),
        );

        let force_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lj_force_shader"),
            source: wgpu::ShaderSource::Wgsl(LJ_FORCE_SHADER.into()),
        });
        let count_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pair_count_shader"),
            source: wgpu::ShaderSource::Wgsl(PAIR_COUNT_SHADER.into()),
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let storage_entry = |binding, read_only| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let force_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("force_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, true),
                storage_entry(4, false),
                storage_entry(5, false),
                storage_entry(6, false),
            ],
        });
        let count_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("count_bind_group_layout"),
            entries: &[uniform_entry(0), storage_entry(1, false)],
        });

        let force_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("force_pipeline_layout"),
                bind_group_layouts: &[&force_layout],
                push_constant_ranges: &[],
            });
        let force_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("force_pipeline"),
            layout: Some(&force_pipeline_layout),
            module: &force_module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let count_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("count_pipeline_layout"),
                bind_group_layouts: &[&count_layout],
                push_constant_ranges: &[],
            });
        let count_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("count_pipeline"),
            layout: Some(&count_pipeline_layout),
            module: &count_module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let force_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("force_bind_group"),
            layout: &force_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: state.pos_x.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: state.pos_y.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: state.pos_z.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: state.force_x.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: state.force_y.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: state.force_z.as_entire_binding(),
                },
            ],
        });
        let count_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("count_bind_group"),
            layout: &count_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: state.visits.as_entire_binding(),
                },
            ],
        });

        Ok(Self {
            state,
            n,
            force_pipeline,
            count_pipeline,
            force_bind_group,
            count_bind_group,
            _params_buffer: params_buffer,
        })
    }

    /// Particle count this kernel was sized for.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True if sized for zero particles.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Compute net forces for the given particle set.
    ///
    /// Validates the set host-side (coincident pairs are an error), uploads
    /// positions, zeroes the accumulators, runs one n×n dispatch, and reads
    /// the accumulated forces back after the completion barrier.
    pub fn compute_forces(&self, set: &ParticleSet) -> Result<Vec<Vec3>> {
        if set.len() != self.n {
            return Err(GpuError::WrongParticleCount {
                expected: self.n,
                got: set.len(),
            });
        }
        if self.n == 0 {
            return Ok(Vec::new());
        }
        set.validate()?;

        self.state.upload_positions(set);
        self.state.zero_forces();
        self.dispatch(&self.force_pipeline, &self.force_bind_group, "force_pass");

        let (fx, fy, fz) = pollster::block_on(self.state.download_forces())?;
        let scale = FIXED_POINT_SCALE as f64;
        Ok(fx
            .iter()
            .zip(&fy)
            .zip(&fz)
            .map(|((&x, &y), &z)| Vec3::new(x as f64 / scale, y as f64 / scale, z as f64 / scale))
            .collect())
    }

    /// Run the instrumented counting variant of the kernel.
    ///
    /// Returns the per-particle pair-visit counters; a correct pass leaves
    /// every counter at n − 1.
    pub fn count_pair_visits(&self) -> Result<Vec<u32>> {
        if self.n == 0 {
            return Ok(Vec::new());
        }

        self.state.zero_visits();
        self.dispatch(&self.count_pipeline, &self.count_bind_group, "count_pass");

        pollster::block_on(self.state.download_visits())
    }

    /// Submit one compute pass covering all n² work items.
    fn dispatch(&self, pipeline: &wgpu::ComputePipeline, bind_group: &wgpu::BindGroup, label: &str) {
        let items = (self.n * self.n) as u32;
        let workgroups = items.div_ceil(WORKGROUP_SIZE);
        log::debug!("{label}: {items} work items in {workgroups} workgroups");

        let mut encoder = self
            .state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pair_dispatch_encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        self.state.queue.submit(Some(encoder.finish()));
    }
}
