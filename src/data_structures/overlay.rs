//! 2D HUD overlay objects.
//!
//! An [`OverlayNode`] is a screen-space textured quad drawn on top of the 3D
//! scene. Content arrives as a texture (an `image::RgbaImage` rendered
//! elsewhere, or a solid fill); there is no glyph shaping here.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::geometry::Vertex,
    render::{Flat, Render},
    resources::Material,
};

/// Overlay vertex: 2D clip-space position plus texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex for OverlayVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Placement of an overlay in normalized device coordinates: `(x, y)` is the
/// bottom-left corner, both axes in `[-1, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct OverlayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OverlayRect {
    fn vertices(&self) -> [OverlayVertex; 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            OverlayVertex {
                position: [x0, y0],
                tex_coords: [0.0, 1.0],
            },
            OverlayVertex {
                position: [x1, y0],
                tex_coords: [1.0, 1.0],
            },
            OverlayVertex {
                position: [x1, y1],
                tex_coords: [1.0, 0.0],
            },
            OverlayVertex {
                position: [x0, y1],
                tex_coords: [0.0, 0.0],
            },
        ]
    }
}

/// A screen-space textured quad (HUD element).
pub struct OverlayNode {
    pub rect: OverlayRect,
    pub visible: bool,
    material: Material,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl OverlayNode {
    pub fn new(device: &wgpu::Device, rect: OverlayRect, material: Material) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(&rect.vertices()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            rect,
            visible: true,
            material,
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Move or resize the overlay; re-uploads the four vertices in place.
    pub fn set_rect(&mut self, queue: &wgpu::Queue, rect: OverlayRect) {
        self.rect = rect;
        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&rect.vertices()),
        );
    }

    /// Swap the displayed texture (e.g. a freshly rendered HUD image).
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

impl<'a> From<&'a OverlayNode> for Render<'a> {
    fn from(overlay: &'a OverlayNode) -> Self {
        if !overlay.visible {
            return Render::None;
        }
        Render::Overlay(Flat {
            vertex: &overlay.vertex_buffer,
            index: &overlay.index_buffer,
            group: &overlay.material.bind_group,
            amount: overlay.num_indices,
        })
    }
}
