use bytemuck::{Pod, Zeroable};
use std::mem;

use crate::asset::MeshData;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2
    ];

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Interleaves the separate attribute arrays of a mesh.
    pub fn interleave(mesh: &MeshData) -> Vec<Vertex> {
        (0..mesh.vertex_count())
            .map(|i| Vertex {
                pos: mesh.position(i),
                normal: mesh.normal(i),
                uv: mesh.uv(i),
            })
            .collect()
    }
}
