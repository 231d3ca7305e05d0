//! Object pose data for scene nodes and GPU rendering.
//!
//! Every scene object holds a [`Pose`] (position, orientation, scale). Poses
//! compose hierarchically (parent * local) and are packed into a GPU buffer
//! as a [`PoseRaw`] for the vertex stage.

use std::ops::Mul;

use cgmath::{One, Quaternion, Vector3};

use crate::data_structures::geometry::Vertex;

/// Position, orientation (as quaternion) and non-uniform scale.
#[derive(Clone, Debug)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Pose {
    /// Identity pose (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Apply scale, rotation and translation to a point, in that order.
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let scaled = Vector3::new(
            self.scale.x * point.x,
            self.scale.y * point.y,
            self.scale.z * point.z,
        );
        self.position + self.rotation * scaled
    }

    pub fn to_raw(&self) -> PoseRaw {
        PoseRaw {
            model: self.to_matrix().into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
        }
    }
}

impl Mul<Pose> for Pose {
    type Output = Self;

    fn mul(self, rhs: Pose) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b Pose> for &'a Pose {
    type Output = Pose;

    /// Parent * local composition: the local position is scaled and rotated
    /// into the parent frame, rotations multiply, scales multiply
    /// component-wise.
    ///
    /// A pose has no shear term, so this matches matrix composition only for
    /// uniform parent scale. A non-uniform parent scale is applied along the
    /// child's local axes (the shear-free approximation) instead of the
    /// parent's, keeping the result a valid TRS pose.
    fn mul(self, rhs: &'b Pose) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Pose {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl From<Vector3<f32>> for Pose {
    fn from(position: Vector3<f32>) -> Self {
        Pose {
            position,
            ..Default::default()
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw pose is the actual data stored on the GPU: the model matrix plus
 * a 3x3 normal matrix for lighting.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PoseRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

/**
 * As pose data lives directly in GPU memory we need to tell what the bytes
 * refer to. The stride covers one pose; the step mode is `Instance` so the
 * shader advances to the next pose per drawn object, not per vertex.
 *
 * A mat4 takes up four vertex slots (four vec4 attributes), the normal
 * matrix another three vec3 slots.
 */
impl Vertex for PoseRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PoseRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    // corresponds to the @location in the shader file.
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
