use crate::{
    data_structures::{
        geometry::{MeshVertex, Vertex},
        pose::PoseRaw,
        texture::Texture,
    },
    pipelines::basic::mk_render_pipeline,
    resources::diffuse_layout,
};

/**
 * Pipeline for alpha-blended meshes.
 *
 * Shares the mesh shader with the opaque pipeline but blends against the
 * framebuffer and leaves the depth buffer untouched, so transparent objects
 * are still occluded by opaque geometry without occluding each other.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Transparent Pipeline Layout"),
        bind_group_layouts: &[
            &diffuse_layout(device),
            camera_bind_group_layout,
            light_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh_shader.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        false,
        &[MeshVertex::desc(), PoseRaw::desc()],
        shader,
    )
}
