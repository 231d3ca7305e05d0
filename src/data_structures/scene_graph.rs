//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`SceneNode`] trait and the node types scenes are composed
//! of: [`GroupNode`] (a GPU-free container) and [`MeshNode`] (posed buffered
//! geometry with a material and a local bounding box). World transforms
//! propagate top-down as `parent_world * local`, and world-space AABBs roll
//! up bottom-up so any subtree can be culled or ray-tested as a unit.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        bounds::{Aabb, BoundingSphere, Frustum, Ray},
        buffer::GeometryBuffer,
        geometry::MeshData,
        pose::Pose,
    },
    render::{Instanced, Render},
};

/// A node in the scene graph.
///
/// Nodes own their children, a local pose relative to the parent, and the
/// world pose computed by the last [`update_world_transforms`] pass.
///
/// [`update_world_transforms`]: SceneNode::update_world_transforms
pub trait SceneNode {
    fn children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn local_pose(&self) -> &Pose;

    fn set_local_pose(&mut self, pose: Pose);

    /// Mutate the local pose in place (for per-frame animation).
    fn update_local_pose(&mut self, mutation: &mut dyn FnMut(&mut Pose));

    /// World pose as of the last transform propagation.
    fn world_pose(&self) -> &Pose;

    /// Invisible nodes are skipped by render extraction (whole subtree) but
    /// still take part in transform propagation.
    fn visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Recompute this node's world pose from `parent_world` and recurse into
    /// the children. Every node is visited exactly once per pass.
    fn update_world_transforms(&mut self, parent_world: &Pose);

    /// World-space bounding box of this node and everything below it.
    /// Pure containers with no geometry report [`Aabb::EMPTY`].
    fn world_aabb(&self) -> Aabb;

    /// Sphere around the rolled-up world AABB.
    fn world_bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_aabb(&self.world_aabb())
    }

    /// Distance to the first hit on the subtree's world AABB, if any.
    /// Coarse picking only; precise tests are up to the caller.
    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_aabb(&self.world_aabb())
    }

    /// Push the current world poses into GPU buffers.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue);

    /// Collect render payloads for this subtree. Subtrees failing the
    /// (optional) frustum test are culled conservatively.
    fn get_render(&self, frustum: Option<&Frustum>) -> Render<'_>;
}

/// A GPU-free container node: pose and children, nothing to draw.
pub struct GroupNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Pose,
    world: Pose,
    visible: bool,
}

impl GroupNode {
    pub fn new() -> Self {
        Self {
            children: vec![],
            local: Pose::default(),
            world: Pose::default(),
            visible: true,
        }
    }

    pub fn with_pose(pose: Pose) -> Self {
        Self {
            local: pose,
            ..Self::new()
        }
    }
}

impl Default for GroupNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for GroupNode {
    fn children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn local_pose(&self) -> &Pose {
        &self.local
    }

    fn set_local_pose(&mut self, pose: Pose) {
        self.local = pose;
    }

    fn update_local_pose(&mut self, mutation: &mut dyn FnMut(&mut Pose)) {
        mutation(&mut self.local);
    }

    fn world_pose(&self) -> &Pose {
        &self.world
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn update_world_transforms(&mut self, parent_world: &Pose) {
        self.world = parent_world * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn world_aabb(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        for child in &self.children {
            aabb.expand_aabb(&child.world_aabb());
        }
        aabb
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self, frustum: Option<&Frustum>) -> Render<'_> {
        if !self.visible {
            return Render::None;
        }
        Render::Composed(
            self.children
                .iter()
                .map(|child| child.get_render(frustum))
                .collect(),
        )
    }
}

/// A renderable node: buffered geometry, a material, a local bounding box
/// and a pose buffer the shader reads per drawn object.
pub struct MeshNode {
    children: Vec<Box<dyn SceneNode>>,
    local: Pose,
    world: Pose,
    visible: bool,
    /// Routes the node into the alpha-blended pipeline.
    pub transparent: bool,
    geometry: GeometryBuffer,
    material: crate::resources::Material,
    local_aabb: Aabb,
    pose_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        data: &MeshData,
        material: crate::resources::Material,
    ) -> Self {
        let geometry = GeometryBuffer::new(device, name, data);
        let local_aabb = data.compute_aabb();

        let pose_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Pose Buffer"),
            contents: bytemuck::cast_slice(&[Pose::default().to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            children: vec![],
            local: Pose::default(),
            world: Pose::default(),
            visible: true,
            transparent: false,
            geometry,
            material,
            local_aabb,
            pose_buffer,
        }
    }

    /// Bounding box of this node's own geometry, in local space.
    pub fn local_aabb(&self) -> &Aabb {
        &self.local_aabb
    }

    /// Bounding box of this node's own geometry in world space, ignoring
    /// children. The render extraction culls against this box.
    pub fn geometry_world_aabb(&self) -> Aabb {
        self.local_aabb.transformed(&self.world)
    }
}

impl SceneNode for MeshNode {
    fn children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn local_pose(&self) -> &Pose {
        &self.local
    }

    fn set_local_pose(&mut self, pose: Pose) {
        self.local = pose;
    }

    fn update_local_pose(&mut self, mutation: &mut dyn FnMut(&mut Pose)) {
        mutation(&mut self.local);
    }

    fn world_pose(&self) -> &Pose {
        &self.world
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn update_world_transforms(&mut self, parent_world: &Pose) {
        self.world = parent_world * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn world_aabb(&self) -> Aabb {
        let mut aabb = self.geometry_world_aabb();
        for child in &self.children {
            aabb.expand_aabb(&child.world_aabb());
        }
        aabb
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.pose_buffer,
            0,
            bytemuck::cast_slice(&[self.world.to_raw()]),
        );
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self, frustum: Option<&Frustum>) -> Render<'_> {
        if !self.visible {
            return Render::None;
        }
        let mut renders: Vec<Render<'_>> = self
            .children
            .iter()
            .map(|child| child.get_render(frustum))
            .collect();

        let culled = match frustum {
            Some(frustum) => !frustum.intersects_aabb(&self.geometry_world_aabb()),
            None => false,
        };
        if !culled {
            let instanced = Instanced {
                pose: &self.pose_buffer,
                geometry: &self.geometry,
                material: &self.material,
                amount: 1,
            };
            renders.push(if self.transparent {
                Render::Transparent(instanced)
            } else {
                Render::Opaque(instanced)
            });
        }
        Render::Composed(renders)
    }
}
