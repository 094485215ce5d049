// renderer/objects.rs
use std::mem;
use std::num::NonZeroU64;

use crate::frame::ObjectMatrices;
use crate::renderer::uniforms::ObjectUniform;

const OBJECT_UNIFORM_SIZE: u64 = mem::size_of::<ObjectUniform>() as u64;

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One uniform buffer and bind group per scene object, grown on demand.
///
/// Bound at group 0 by both the shadow and the lighting pipeline.
pub struct ObjectBindings {
    pub layout: wgpu::BindGroupLayout,
    slots: Vec<ObjectSlot>,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device, initial: usize) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ObjectUniformLayout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(OBJECT_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let mut bindings = Self {
            layout,
            slots: Vec::with_capacity(initial),
        };
        bindings.ensure(device, initial);
        bindings
    }

    fn ensure(&mut self, device: &wgpu::Device, count: usize) {
        while self.slots.len() < count {
            let index = self.slots.len();
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("ObjectUniformBuffer{index}")),
                size: OBJECT_UNIFORM_SIZE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("ObjectBindGroup{index}")),
                layout: &self.layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.slots.push(ObjectSlot { buffer, bind_group });
        }
    }

    /// Uploads this frame's matrices, one slot per object in scene order.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, objects: &[ObjectMatrices]) {
        if objects.len() > self.slots.len() {
            log::debug!("Growing object bindings to {}", objects.len());
            self.ensure(device, objects.len());
        }
        for (slot, matrices) in self.slots.iter().zip(objects) {
            let uniform = ObjectUniform::new(matrices);
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    pub fn bind_group(&self, index: usize) -> Option<&wgpu::BindGroup> {
        self.slots.get(index).map(|slot| &slot.bind_group)
    }
}
