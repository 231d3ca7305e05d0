//! Buffered geometry: the vertex-buffer wrapper.
//!
//! [`GeometryBuffer`] is the single place where mesh data crosses to the GPU.
//! Scene nodes hold the wrapper (buffer handles plus element counts), never
//! raw buffers, and push it to the pipeline through [`DrawGeometry`].

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{data_structures::geometry::MeshData, resources::Material};

/// GPU vertex/index buffers for one mesh, with their element counts.
#[derive(Debug)]
pub struct GeometryBuffer {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub num_indices: u32,
}

impl GeometryBuffer {
    /// Upload `data` into freshly created VERTEX/INDEX buffers.
    pub fn new(device: &wgpu::Device, name: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_vertices: data.vertices.len() as u32,
            num_indices: data.indices.len() as u32,
        }
    }
}

/// Render-pass extension for drawing buffered geometry.
pub trait DrawGeometry<'a> {
    fn draw_geometry_instanced(
        &mut self,
        geometry: &'a GeometryBuffer,
        material: &'a Material,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );

    /// Draw without a material, for the emissive light marker.
    fn draw_light_marker(
        &mut self,
        geometry: &'a GeometryBuffer,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawGeometry<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_geometry_instanced(
        &mut self,
        geometry: &'b GeometryBuffer,
        material: &'b Material,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        self.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..geometry.num_indices, 0, instances);
    }

    fn draw_light_marker(
        &mut self,
        geometry: &'b GeometryBuffer,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        self.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, light_bind_group, &[]);
        self.draw_indexed(0..geometry.num_indices, 0, 0..1);
    }
}
