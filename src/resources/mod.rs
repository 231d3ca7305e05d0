/**
 * This module contains the logic for loading textures from external files and
 * turning them into material bind groups the mesh and overlay pipelines
 * consume.
 */
pub mod texture;

pub use texture::{diffuse_layout, load_texture};

use crate::data_structures::texture::Texture;

/// A material: a named diffuse texture bound for the fragment stage.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub diffuse_texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        diffuse_texture: Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let sampler = diffuse_texture
            .sampler
            .clone()
            .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some(name),
        });

        Self {
            name: name.to_string(),
            diffuse_texture,
            bind_group,
        }
    }

    /// An untextured material in a single colour.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        rgba: [u8; 4],
    ) -> Self {
        let texture = Texture::create_solid(rgba, 2, 2, device, queue);
        let layout = diffuse_layout(device);
        Self::new(device, name, texture, &layout)
    }
}
