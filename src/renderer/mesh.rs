use std::mem;

use crate::asset::MeshData;
use crate::renderer::Vertex;
use wgpu::util::DeviceExt;

/// Vertex and index buffers of one mesh, uploaded once at startup.
pub struct GpuMesh {
    pub vbuf: wgpu::Buffer,
    pub ibuf: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    /// Byte sizes of the vertex and index buffers `upload` would create.
    pub fn buffer_sizes(mesh: &MeshData) -> [u64; 2] {
        let vertex_bytes = (mesh.vertex_count() * mem::size_of::<Vertex>()) as u64;
        let index_bytes = (mesh.index_count() * mem::size_of::<u32>()) as u64;
        [vertex_bytes, index_bytes]
    }

    pub fn upload(device: &wgpu::Device, name: &str, mesh: &MeshData) -> Self {
        let vertices = Vertex::interleave(mesh);
        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}.VertexBuffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}.IndexBuffer")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "Uploaded mesh {}: {} vertices, {} indices",
            name,
            vertices.len(),
            mesh.index_count()
        );
        Self {
            vbuf,
            ibuf,
            index_count: mesh.index_count() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vbuf.slice(..));
        pass.set_index_buffer(self.ibuf.slice(..), Self::INDEX_FORMAT);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::primitives;

    #[test]
    fn buffer_sizes_match_interleaved_upload() {
        let cube = primitives::cube();
        let [vertex_bytes, index_bytes] = GpuMesh::buffer_sizes(&cube);
        let interleaved = Vertex::interleave(&cube);
        assert_eq!(vertex_bytes as usize, mem::size_of_val(interleaved.as_slice()));
        assert_eq!(index_bytes, cube.index_count() as u64 * 4);
    }
}
