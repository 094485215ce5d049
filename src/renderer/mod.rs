pub mod context;
pub mod cubemap;
pub mod depth;
pub mod lighting;
pub mod mesh;
pub mod objects;
pub mod pipeline_builder;
#[allow(clippy::module_inception)]
pub mod renderer;
pub mod shadow;
pub mod skybox;
pub mod uniforms;
pub mod vertex;

pub use context::RenderContext;
pub use depth::Depth;
pub use mesh::GpuMesh;
pub use renderer::Renderer;
pub use vertex::Vertex;

use crate::frame::PassDescriptor;

/// One object ready to be drawn: its mesh and its uniform bind group.
pub struct Draw<'a> {
    pub mesh: &'a GpuMesh,
    pub bind_group: &'a wgpu::BindGroup,
    pub casts_shadows: bool,
}

/// Swapchain view plus the main depth buffer.
pub struct SurfaceTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

impl SurfaceTarget<'_> {
    const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

    /// Begins a pass on the surface, clearing color and depth if the pass
    /// descriptor asks for it.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        descriptor: &PassDescriptor,
    ) -> wgpu::RenderPass<'e> {
        let (color_load, depth_load) = if descriptor.clears {
            (
                wgpu::LoadOp::Clear(Self::CLEAR_COLOR),
                wgpu::LoadOp::Clear(1.0),
            )
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(descriptor.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}
