use std::mem;
use std::num::NonZeroU64;

use crate::frame::{LightingModel, PassDescriptor, PassMode};
use crate::renderer::objects::ObjectBindings;
use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::renderer::shadow::ShadowMap;
use crate::renderer::uniforms::LightingUniform;
use crate::renderer::{Draw, SurfaceTarget, Vertex};
use crate::scene::SceneState;

/// Forward pass shading every object against the shadow map.
pub struct LightingPass {
    model: LightingModel,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl LightingPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        objects: &ObjectBindings,
        shadow_map: &ShadowMap,
        model: LightingModel,
        descriptor: &PassDescriptor,
    ) -> Self {
        let uniform_size = mem::size_of::<LightingUniform>() as u64;
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("LightingUniformBuffer"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("LightingLayout"),
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
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("LightingBindGroup"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("LightingShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader/lighting.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("LightingPipelineLayout"),
            bind_group_layouts: &[&objects.layout, &layout],
            push_constant_ranges: &[],
        });

        let pipeline = PipelineBuilder::new(device, &pipeline_layout, &shader)
            .with_label("LightingPipeline")
            .with_vertex_buffer(Vertex::layout())
            .with_color_target(color_format)
            .for_pass(descriptor, depth_format)
            .build();

        Self {
            model,
            uniform_buffer,
            bind_group,
            pipeline,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, scene: &SceneState) {
        let uniform =
            LightingUniform::new(&self.model, scene.light.position, scene.camera.position());
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        descriptor: &PassDescriptor,
        mode: PassMode,
        target: &SurfaceTarget<'_>,
        draws: &[Draw<'_>],
    ) {
        let mut pass = target.begin(encoder, descriptor);
        if mode == PassMode::ClearOnly {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        for draw in draws {
            pass.set_bind_group(0, draw.bind_group, &[]);
            draw.mesh.draw(&mut pass);
        }
    }
}
