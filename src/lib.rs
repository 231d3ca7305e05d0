//! simple-scene
//!
//! A small real-time 3D scene-graph rendering framework. Scenes are built
//! from hierarchical nodes (groups, meshes, 2D overlays) with bounding-volume
//! support for conservative frustum culling, and meshes reach the GPU through
//! a buffered-geometry wrapper. Rendering is done with wgpu; winit drives
//! the window and input events.
//!
//! High-level modules
//! - `camera`: camera types, controllers and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene data models (bounds, poses, geometry, nodes)
//! - `app`: high level application control (scene flows / update loops)
//! - `pipelines`: definitions for the render pipelines (basic, light, overlay)
//! - `resources`: helpers to load textures and create material bind groups
//! - `render`: render composition for efficient pipeline reuse
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::{DeviceEvent, ElementState, WindowEvent};
pub use winit::keyboard::{KeyCode, PhysicalKey};
