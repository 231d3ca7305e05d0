//! Flow control and application event loop.
//!
//! A "flow" is a scene or application state that handles input, updates its
//! scene graph, and hands renderable objects to the engine each frame.
//!
//! # Lifecycle
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window/device events and distribute them to all flows
//! 2. Extract each flow's [`Render`] (culled against the camera frustum)
//! 3. Render to the frame buffer using batched pipelines
//! 4. Update the camera and call the flows' `on_update`
//! 5. Present the frame

use std::{
    iter,
    pin::Pin,
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext, MouseButtonState},
    data_structures::{bounds::Frustum, buffer::DrawGeometry, texture::Texture},
    render::{Flat, Instanced, Render},
};

/// Trait for implementing a renderable scene or application state.
///
/// A `SceneFlow` manages a self-contained portion of the application:
/// rendering, input handling, animations, and state updates. The engine
/// coordinates multiple flows, passes events to them, and composes their
/// renders.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the GPU context exists; configure the
///    context (camera start pose, clear colour, light) here
/// 2. `on_window_events()` / `on_device_events()` are called per input event
/// 3. `on_update()` is called every frame with the elapsed time
/// 4. `on_render()` is called each frame and returns the flow's render tree
pub trait SceneFlow<S> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S);

    /// Handle window events (keyboard, mouse, resizing, etc.).
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) {}

    /// Handle raw device events (mouse motion deltas and the like).
    fn on_device_events(&mut self, _ctx: &Context, _state: &mut S, _event: &DeviceEvent) {}

    /// Update state every frame: animate poses, propagate transforms and
    /// push them to the GPU via the queue on `ctx`.
    fn on_update(&mut self, ctx: &mut Context, state: &mut S, dt: Duration);

    /// Return renderable objects for this flow.
    ///
    /// `frustum` is the camera frustum for the frame; pass it down to
    /// scene-graph extraction so off-screen subtrees get culled.
    fn on_render(&self, frustum: &Frustum) -> Render<'_>;
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an [`InitContext`] and asynchronously returns a
/// boxed [`SceneFlow`]. This allows lazy initialization and resource loading.
pub type FlowConstructor<S> =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = Box<dyn SceneFlow<S>>>>>>;

/// Application state bundle: GPU context, app state, and surface status.
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(
        &mut self,
        scene_flows: &mut Vec<Box<dyn SceneFlow<State>>>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frustum = self.ctx.frustum();

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Actual rendering:
            if let Some(marker) = &self.ctx.light.marker {
                render_pass.set_pipeline(&self.ctx.pipelines.light);
                render_pass.draw_light_marker(
                    marker,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            let mut basics: Vec<Instanced> = Vec::new();
            let mut trans: Vec<Instanced> = Vec::new();
            let mut overlays: Vec<Flat> = Vec::new();
            scene_flows.iter().for_each(|flow| {
                flow.on_render(&frustum)
                    .set_pipelines(&mut basics, &mut trans, &mut overlays);
            });

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            for instanced in basics {
                if instanced.amount == 0 {
                    log::warn!("you attempted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.pose.slice(..));
                render_pass.draw_geometry_instanced(
                    instanced.geometry,
                    instanced.material,
                    0..instanced.amount,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.ctx.pipelines.transparent);
            for instanced in trans {
                if instanced.amount == 0 {
                    log::warn!("you attempted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.pose.slice(..));
                render_pass.draw_geometry_instanced(
                    instanced.geometry,
                    instanced.material,
                    0..instanced.amount,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.ctx.pipelines.overlay);
            for overlay in overlays {
                render_pass.set_bind_group(0, overlay.group, &[]);
                render_pass.set_vertex_buffer(0, overlay.vertex.slice(..));
                render_pass.set_index_buffer(overlay.index.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..overlay.amount, 0, 0..1);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    scene_flows: Vec<Box<dyn SceneFlow<State>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
}

impl<State: 'static> App<State> {
    fn new(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            state: None,
            scene_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
        })
    }
}

impl<State: 'static + Default> ApplicationHandler for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes();
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let constructors = match self.constructors.take() {
            Some(constructors) => constructors,
            None => return,
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // InitContext clones only the internal Arcs of Device and Queue
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows: Vec<_> = futures::future::join_all(flow_futures).await;
            anyhow::Ok((app_state, flows))
        };

        let (mut app_state, flows) = match self.async_runtime.block_on(init_future) {
            Ok(initialized) => initialized,
            Err(e) => {
                log::error!("App initialization failed: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.scene_flows = flows;
        self.scene_flows.iter_mut().for_each(|flow| {
            flow.on_init(&mut app_state.ctx, &mut app_state.state);
        });

        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        app_state.ctx.window.request_redraw();
        self.state = Some(app_state);
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            // Mouse-look only while the right button is held
            if let MouseButtonState::Right = state.ctx.mouse.pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
        self.scene_flows.iter_mut().for_each(|f| {
            f.on_device_events(&state.ctx, &mut state.state, &event);
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        if let WindowEvent::CursorMoved { position, .. } = event {
            state.ctx.mouse.coords = position;
        };

        self.scene_flows.iter_mut().for_each(|f| {
            f.on_window_events(&state.ctx, &mut state.state, &event);
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                state.ctx.mouse.pressed = match (button, button_state.is_pressed()) {
                    (MouseButton::Left, true) => MouseButtonState::Left,
                    (MouseButton::Right, true) => MouseButtonState::Right,
                    _ => MouseButtonState::None,
                };
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(&mut self.scene_flows) {
                    Ok(_) => {
                        // Update the camera
                        state
                            .ctx
                            .camera
                            .controller
                            .update(&mut state.ctx.camera.camera, dt);
                        state
                            .ctx
                            .camera
                            .uniform
                            .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                        state.ctx.queue.write_buffer(
                            &state.ctx.camera.buffer,
                            0,
                            bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                        );
                        // Update the flows
                        self.scene_flows.iter_mut().for_each(|f| {
                            f.on_update(&mut state.ctx, &mut state.state, dt);
                        });
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Build the event loop and run `constructors`' flows until exit.
pub fn run<State: 'static + Default>(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app: App<State> = App::new(constructors)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
