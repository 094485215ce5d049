// src/renderer/pipeline_builder.rs

use crate::error::SetupError;
use crate::frame::PassDescriptor;

/// Builder for the render pipelines of the frame plan.
///
/// Depth and culling state come from the pass's [`PassDescriptor`], so the
/// pipeline always agrees with what the plan declares.
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<&'a str>,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vertex_entry: &'a str,
    fragment_entry: Option<&'a str>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    color_targets: Vec<Option<wgpu::ColorTargetState>>,
    depth_stencil: Option<wgpu::DepthStencilState>,
    primitive: wgpu::PrimitiveState,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        layout: &'a wgpu::PipelineLayout,
        shader: &'a wgpu::ShaderModule,
    ) -> Self {
        Self {
            device,
            label: None,
            layout,
            shader,
            vertex_entry: "vs_main",
            fragment_entry: Some("fs_main"),
            vertex_buffers: Vec::new(),
            color_targets: Vec::new(),
            depth_stencil: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
        }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Create a depth-only pipeline (no fragment shader)
    pub fn depth_only(mut self) -> Self {
        self.fragment_entry = None;
        self
    }

    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    pub fn with_color_target(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_targets.push(Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        }));
        self
    }

    /// Depth test, depth write and face culling of `pass`.
    pub fn for_pass(mut self, pass: &PassDescriptor, depth_format: wgpu::TextureFormat) -> Self {
        self.primitive.cull_mode = pass.cull;
        self.depth_stencil = Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: pass.depth.write,
            depth_compare: pass.depth.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });
        self
    }

    pub fn build(self) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: self.label,
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: Some(self.vertex_entry),
                buffers: &self.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: self.fragment_entry.map(|entry| wgpu::FragmentState {
                module: self.shader,
                entry_point: Some(entry),
                targets: &self.color_targets,
                compilation_options: Default::default(),
            }),
            primitive: self.primitive,
            depth_stencil: self.depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Runs `create` inside validation and out-of-memory error scopes so a bad
/// resource becomes a [`SetupError`] naming `resource` instead of an
/// uncaptured error.
pub async fn validated<T>(
    device: &wgpu::Device,
    resource: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T, SetupError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let validation = device.pop_error_scope().await;
    let out_of_memory = device.pop_error_scope().await;
    match validation.or(out_of_memory) {
        Some(err) => Err(SetupError::resource(resource, err)),
        None => Ok(value),
    }
}

/// Rejects a square texture whose edge exceeds the device's 2D limit.
pub fn check_texture_size(
    resource: &'static str,
    size: u32,
    limits: &wgpu::Limits,
) -> Result<(), SetupError> {
    let max = limits.max_texture_dimension_2d;
    if size > max {
        return Err(SetupError::resource(
            resource,
            format!("{size}px exceeds the device limit of {max}px"),
        ));
    }
    Ok(())
}

pub fn check_buffer_size(
    resource: &'static str,
    bytes: u64,
    limits: &wgpu::Limits,
) -> Result<(), SetupError> {
    let max = limits.max_buffer_size;
    if bytes > max {
        return Err(SetupError::resource(
            resource,
            format!("{bytes} bytes exceeds the device limit of {max} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_skybox_is_a_setup_error() {
        let limits = wgpu::Limits::default();
        assert!(check_texture_size("skybox cubemap", 2048, &limits).is_ok());
        assert!(check_texture_size("skybox cubemap", limits.max_texture_dimension_2d, &limits).is_ok());

        let err = check_texture_size("skybox cubemap", 16384, &limits).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Resource {
                resource: "skybox cubemap",
                ..
            }
        ));
        assert!(err.to_string().contains("16384px"), "{err}");
    }

    #[test]
    fn oversized_mesh_buffer_is_a_setup_error() {
        let limits = wgpu::Limits {
            max_buffer_size: 1024,
            ..wgpu::Limits::default()
        };
        assert!(check_buffer_size("cube mesh buffers", 1024, &limits).is_ok());
        let err = check_buffer_size("cube mesh buffers", 1025, &limits).unwrap_err();
        assert!(err.to_string().contains("cube mesh buffers"), "{err}");
    }
}
