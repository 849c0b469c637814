//! Headless GPU renderer.
//!
//! Draws the pattern backdrop and the particle splats into an offscreen
//! texture and reads the pixels back, no window or surface involved. The
//! fragment shaders mirror the CPU compositor; this path exists to run the
//! same frame at interactive rates and resolutions the brute-force CPU loop
//! cannot reach.
//!
//! The render target is `Rgba8UnormSrgb`, so gamma encoding happens in the
//! texture write instead of in shader code.

pub mod shaders;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::params::FrameParams;
use crate::particle::ParticleInstance;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Uniform block uploaded once per frame.
///
/// Field order and size must match the `Uniforms` struct in
/// [`shaders::UNIFORMS_WGSL`]: one vec2 plus ten scalars, 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GpuUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub delta_time: f32,
    pub color_shift: f32,
    pub complexity: f32,
    pub symmetry_count: f32,
    pub golden_ratio: f32,
    pub breathing_phase: f32,
    pub tap_intensity: f32,
    pub swipe_effect: f32,
    pub motion_effect: f32,
}

impl GpuUniforms {
    /// Snapshot the per-frame parameters into the GPU layout.
    pub fn from_params(params: &FrameParams) -> Self {
        Self {
            resolution: params.resolution.to_array(),
            time: params.time,
            delta_time: params.delta_time,
            color_shift: params.color_shift,
            complexity: params.complexity,
            symmetry_count: params.symmetry_count as f32,
            golden_ratio: params.golden_ratio,
            breathing_phase: params.breathing_phase,
            tap_intensity: params.tap_intensity,
            swipe_effect: params.swipe_effect,
            motion_effect: params.motion_effect,
        }
    }
}

/// Bytes per readback row, padded to the copy alignment wgpu requires.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    unpadded.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

/// Offscreen two-pass renderer: fullscreen pattern, then additive splats.
pub struct HeadlessRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    width: u32,
    height: u32,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    pattern_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
}

impl HeadlessRenderer {
    /// Create a renderer for a fixed target size and particle capacity.
    ///
    /// Fails with [`RenderError::NoAdapter`] when the system has no usable
    /// GPU; callers are expected to fall back to the CPU compositor.
    pub async fn new(width: u32, height: u32, max_particles: u32) -> Result<Self, RenderError> {
        let width = width.max(1);
        let height = height.max(1);
        let instance_capacity = max_particles.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        log::debug!("adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("kaleida device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("composite target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback buffer"),
            size: padded_bytes_per_row(width) as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform buffer"),
            contents: bytemuck::bytes_of(&GpuUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance buffer"),
            size: instance_capacity as u64 * std::mem::size_of::<ParticleInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("composite layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pattern_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pattern shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::pattern_shader().into()),
        });

        let pattern_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pattern pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &pattern_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &pattern_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let particle_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::particle_shader().into()),
        });

        const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

        let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &particle_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &particle_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    // Pure additive, same accumulation as the CPU compositor
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            width,
            height,
            target,
            target_view,
            readback,
            uniform_buffer,
            uniform_bind_group,
            pattern_pipeline,
            particle_pipeline,
            instance_buffer,
            instance_capacity,
        })
    }

    /// Blocking constructor for callers without an async runtime.
    pub fn new_blocking(width: u32, height: u32, max_particles: u32) -> Result<Self, RenderError> {
        pollster::block_on(Self::new(width, height, max_particles))
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render one frame and read it back as an RGBA image.
    ///
    /// Instances beyond the construction-time capacity are dropped, matching
    /// the non-fatal degradation everywhere else in the crate.
    pub fn render(
        &self,
        params: &FrameParams,
        instances: &[ParticleInstance],
    ) -> Result<image::RgbaImage, RenderError> {
        let count = instances.len().min(self.instance_capacity as usize);
        if count < instances.len() {
            log::debug!(
                "instance buffer full: drawing {count} of {} particles",
                instances.len()
            );
        }

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&GpuUniforms::from_params(params)),
        );
        if count > 0 {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..count]),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("composite encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.pattern_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.draw(0..3, 0..1);

            if count > 0 {
                pass.set_pipeline(&self.particle_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                pass.draw(0..6, 0..count as u32);
            }
        }

        let padded = padded_bytes_per_row(self.width);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(Some(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RenderError::BufferMapping("map callback never ran".into()))?
            .map_err(|e| RenderError::BufferMapping(e.to_string()))?;

        let pixels = {
            let data = slice.get_mapped_range();
            let row_bytes = (self.width * 4) as usize;
            let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
            for row in data.chunks_exact(padded as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
            pixels
        };
        self.readback.unmap();

        image::RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| RenderError::BufferMapping("readback size mismatch".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_are_48_bytes() {
        assert_eq!(std::mem::size_of::<GpuUniforms>(), 48);
        assert_eq!(std::mem::align_of::<GpuUniforms>(), 4);
    }

    #[test]
    fn test_uniforms_snapshot_params() {
        let mut params = FrameParams::new(800, 600);
        params.time = 3.5;
        params.symmetry_count = 9;
        params.tap_intensity = 0.4;

        let uniforms = GpuUniforms::from_params(&params);
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
        assert_eq!(uniforms.time, 3.5);
        assert_eq!(uniforms.symmetry_count, 9.0);
        assert_eq!(uniforms.tap_intensity, 0.4);
    }

    #[test]
    fn test_row_padding_alignment() {
        // 100 px * 4 bytes = 400, padded up to 512
        assert_eq!(padded_bytes_per_row(100), 512);
        // Already aligned stays put
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(1), wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    }
}
