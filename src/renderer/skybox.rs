use std::mem;
use std::num::NonZeroU64;

use glam::Mat4;

use crate::frame::{PassDescriptor, PassMode};
use crate::renderer::cubemap::GpuCubemap;
use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::renderer::uniforms::SkyboxUniform;
use crate::renderer::SurfaceTarget;

/// Full-screen quad at the far plane sampling the cubemap along the
/// reconstructed view direction. Needs no vertex buffer.
pub struct SkyboxPass {
    _cubemap: GpuCubemap,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl SkyboxPass {
    const VERTEX_COUNT: u32 = 6;

    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        cubemap: GpuCubemap,
        descriptor: &PassDescriptor,
    ) -> Self {
        let uniform_size = mem::size_of::<SkyboxUniform>() as u64;
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SkyboxUniformBuffer"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("SkyboxLayout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(uniform_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SkyboxBindGroup"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("SkyboxShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader/skybox.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("SkyboxPipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = PipelineBuilder::new(device, &pipeline_layout, &shader)
            .with_label("SkyboxPipeline")
            .with_color_target(color_format)
            .for_pass(descriptor, depth_format)
            .build();

        Self {
            _cubemap: cubemap,
            uniform_buffer,
            bind_group,
            pipeline,
        }
    }

    /// Skipped when the frame has no invertible skybox matrix; the previous
    /// contents stay in the buffer but are never drawn.
    pub fn update(&self, queue: &wgpu::Queue, inverse_view_proj: Option<Mat4>) {
        if let Some(inverse) = inverse_view_proj {
            let uniform = SkyboxUniform::new(inverse);
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        descriptor: &PassDescriptor,
        mode: PassMode,
        target: &SurfaceTarget<'_>,
    ) {
        let mut pass = target.begin(encoder, descriptor);
        if mode == PassMode::ClearOnly {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..Self::VERTEX_COUNT, 0..1);
    }
}
