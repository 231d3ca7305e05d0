//! CPU-side mesh data and procedural geometry.
//!
//! [`MeshData`] is the plain vertex/index payload a mesh node is built from.
//! Since asset parsing is out of scope for this framework, demo geometry is
//! generated procedurally (cubes, UV spheres, planes). Bounding volumes are
//! computed here so scene nodes never have to touch raw vertex data again.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::bounds::{Aabb, BoundingSphere};

/// Anything with a describable GPU vertex-buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// The standard mesh vertex: position, texture coordinates, normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// CPU-side mesh payload, ready to be uploaded through
/// [`crate::data_structures::buffer::GeometryBuffer`].
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Bounding box over all vertex positions.
    pub fn compute_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.position.into()))
    }

    /// Sphere around the AABB center covering every vertex. Tighter than the
    /// circumscribed sphere of the box for flat or elongated meshes.
    pub fn compute_bounding_sphere(&self) -> BoundingSphere {
        let center = self.compute_aabb().center();
        let radius = self
            .vertices
            .iter()
            .map(|v| (Vector3::from(v.position) - center).magnitude())
            .fold(0.0_f32, f32::max);
        BoundingSphere::new(center, radius)
    }
}

/// An axis-aligned cube with per-face normals and full-face UVs.
pub fn cube(half_extent: f32) -> MeshData {
    let h = half_extent;
    // (normal, up) pairs for the six faces; `right = up x normal` spans the face
    // with counter-clockwise winding seen from outside
    let faces: [(Vector3<f32>, Vector3<f32>); 6] = [
        (Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_z(), Vector3::unit_y()),
    ];

    let mut data = MeshData::default();
    for (normal, up) in faces {
        let right = up.cross(normal);
        let base = data.vertices.len() as u32;
        let corners = [
            (-1.0_f32, -1.0_f32, [0.0_f32, 1.0_f32]),
            (1.0, -1.0, [1.0, 1.0]),
            (1.0, 1.0, [1.0, 0.0]),
            (-1.0, 1.0, [0.0, 0.0]),
        ];
        for (u, v, tex_coords) in corners {
            let position = normal * h + right * (u * h) + up * (v * h);
            data.vertices.push(MeshVertex {
                position: position.into(),
                tex_coords,
                normal: normal.into(),
            });
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

/// A UV sphere with `stacks` latitude rings and `slices` longitude segments.
/// Normals are exact (position over radius).
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut data = MeshData::default();

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * std::f32::consts::PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * std::f32::consts::TAU;
            let normal = Vector3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            data.vertices.push(MeshVertex {
                position: (normal * radius).into(),
                tex_coords: [u, v],
                normal: normal.into(),
            });
        }
    }

    let ring = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * ring + slice;
            let b = a + ring;
            // counter-clockwise seen from outside the sphere
            data.indices
                .extend_from_slice(&[a, a + 1, b + 1, a, b + 1, b]);
        }
    }
    data
}

/// A flat square in the XZ plane facing +Y.
pub fn plane(half_extent: f32) -> MeshData {
    let h = half_extent;
    let normal = [0.0, 1.0, 0.0];
    MeshData {
        vertices: vec![
            MeshVertex {
                position: [-h, 0.0, -h],
                tex_coords: [0.0, 0.0],
                normal,
            },
            MeshVertex {
                position: [-h, 0.0, h],
                tex_coords: [0.0, 1.0],
                normal,
            },
            MeshVertex {
                position: [h, 0.0, h],
                tex_coords: [1.0, 1.0],
                normal,
            },
            MeshVertex {
                position: [h, 0.0, -h],
                tex_coords: [1.0, 0.0],
                normal,
            },
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
