//! Render pipelines: opaque, transparent, light marker and HUD overlay.

pub mod basic;
pub mod light;
pub mod overlay;
pub mod transparent;

/// All pipelines the frame loop switches between.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub light: wgpu::RenderPipeline,
    pub overlay: wgpu::RenderPipeline,
}
