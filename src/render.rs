//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which is used by scene nodes and
//! flows to specify how they should be rendered. The engine uses `Render` to
//! sort objects into batches for the different pipelines (basic, transparent,
//! overlay) so pipeline switches happen once per frame, not once per object.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for posed 3D geometry (buffers + counts)
//! - [`Flat<'a>`] contains data for flat (2D / HUD) rendering
//!

use crate::{data_structures::buffer::GeometryBuffer, resources::Material};

/// Data for rendering posed 3D geometry: a geometry buffer, its material and
/// the pose buffer holding per-object transforms.
pub struct Instanced<'a> {
    pub pose: &'a wgpu::Buffer,
    pub geometry: &'a GeometryBuffer,
    pub material: &'a Material,
    pub amount: u32,
}

/// Data for flat (2D / HUD) rendering: vertex and index buffers with the
/// texture bind group of the overlay.
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: u32,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Opaque(Instanced)` renders a single opaque object
/// - `Opaques(Vec<Instanced>)` renders a batch of opaque objects
/// - `Transparent(Instanced)` renders a single alpha-blended object
/// - `Transparents(Vec<Instanced>)` renders a batch of alpha-blended objects
/// - `Overlay(Flat)` renders a 2D HUD element on top of the scene
/// - `Composed(Vec<Render>)` recursively renders a composition
///
pub enum Render<'a> {
    None,
    Opaque(Instanced<'a>),
    Opaques(Vec<Instanced<'a>>),
    Transparent(Instanced<'a>),
    Transparents(Vec<Instanced<'a>>),
    Overlay(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Sort this render tree into the per-pipeline buckets the frame loop
    /// draws in order: opaque, transparent, overlay.
    pub(crate) fn set_pipelines(
        self,
        basics: &mut Vec<Instanced<'a>>,
        trans: &mut Vec<Instanced<'a>>,
        overlays: &mut Vec<Flat<'a>>,
    ) {
        match self {
            Render::Opaque(instanced) => basics.push(instanced),
            Render::Opaques(mut vec) => basics.append(&mut vec),
            Render::Transparent(instanced) => trans.push(instanced),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::Overlay(flat) => overlays.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, trans, overlays)),
            Render::None => (),
        }
    }

    /// Number of draw payloads in this tree. Mostly useful for assertions.
    pub fn len(&self) -> usize {
        match self {
            Render::None => 0,
            Render::Opaque(_) | Render::Transparent(_) | Render::Overlay(_) => 1,
            Render::Opaques(vec) | Render::Transparents(vec) => vec.len(),
            Render::Composed(renders) => renders.iter().map(Render::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
