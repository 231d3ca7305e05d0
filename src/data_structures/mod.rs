//! Engine data structures: bounds, poses, geometry, nodes and textures.
//!
//! This module contains the core data types for scene representation:
//!
//! - `bounds` contains AABB/sphere/frustum math for culling and picking
//! - `pose` holds object transformation data (position, rotation, scale)
//! - `geometry` contains CPU-side mesh data and procedural generators
//! - `buffer` is the buffered-geometry wrapper that pushes meshes to the GPU
//! - `scene_graph` enables hierarchical scene organization
//! - `overlay` holds 2D HUD objects drawn on top of the scene
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod bounds;
pub mod buffer;
pub mod geometry;
pub mod overlay;
pub mod pose;
pub mod scene_graph;
pub mod texture;
