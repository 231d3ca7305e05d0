//! GPU context: surface, device, queue and the shared frame resources.

use std::sync::Arc;

use anyhow::anyhow;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{self, CameraResources, CameraUniform, Projection},
    data_structures::texture,
    pipelines::{
        Pipelines,
        basic::mk_basic_pipeline,
        light::{self, LightResources, LightUniform},
        overlay::mk_overlay_pipeline,
        transparent::mk_transparent_pipeline,
    },
};

/// Which mouse button is currently held, for gating mouse-look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButtonState {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct MouseState {
    pub coords: PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
}

impl MouseState {
    /// Cursor position in normalized device coordinates (y up), e.g. for
    /// building a picking ray via [`camera::Camera::ray_through_ndc`].
    pub fn ndc(&self, width: u32, height: u32) -> (f32, f32) {
        let x = 2.0 * self.coords.x as f32 / width.max(1) as f32 - 1.0;
        let y = 1.0 - 2.0 * self.coords.y as f32 / height.max(1) as f32;
        (x, y)
    }
}

/// Everything the frame loop needs: the surface and device, per-frame
/// uniforms (camera, light), the depth buffer and the pipelines.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub mouse: MouseState,
}

/// The subset of the context flow constructors get for resource loading.
/// Device and queue are internally reference counted, so this is cheap.
#[derive(Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            config: ctx.config.clone(),
        }
    }
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        log::warn!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::warn!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        log::warn!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an Srgb surface texture; a linear format would
        // come out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(
                *surface_caps
                    .formats
                    .first()
                    .ok_or_else(|| anyhow!("surface reports no supported formats"))?,
            );
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = camera::Camera::new((0.0, 5.0, 10.0), cgmath::Deg(-90.0), cgmath::Deg(-20.0));
        let projection =
            camera::Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 500.0);
        let camera_controller = camera::CameraController::new(10.0, 0.4);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light_uniform = LightUniform::new([8.0, 10.0, 8.0], [1.0, 1.0, 1.0]);
        let light_buffer = light::mk_buffer(&device, light_uniform);
        let light_bind_group_layout = light::mk_bind_group_layout(&device);
        let light_bind_group = light::mk_bind_group(&device, &light_bind_group_layout, &light_buffer);

        let pipelines = Pipelines {
            basic: mk_basic_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &light_bind_group_layout,
            ),
            transparent: mk_transparent_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &light_bind_group_layout,
            ),
            light: light::mk_light_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &light_bind_group_layout,
            ),
            overlay: mk_overlay_pipeline(&device, &config),
        };

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let light = LightResources {
            uniform: light_uniform,
            buffer: light_buffer,
            bind_group: light_bind_group,
            bind_group_layout: light_bind_group_layout,
            marker: None,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            clear_colour: wgpu::Color {
                r: 0.05,
                g: 0.06,
                b: 0.1,
                a: 1.0,
            },
            mouse: MouseState::default(),
            window,
            depth_texture,
        })
    }

    /// Move the light and push the new uniform to the GPU.
    pub fn set_light_position(&mut self, position: [f32; 3]) {
        self.light.uniform.set_position(position);
        self.queue.write_buffer(
            &self.light.buffer,
            0,
            bytemuck::cast_slice(&[self.light.uniform]),
        );
    }

    /// Frustum for the current camera and projection.
    pub fn frustum(&self) -> crate::data_structures::bounds::Frustum {
        self.camera.camera.frustum(&self.projection)
    }
}
