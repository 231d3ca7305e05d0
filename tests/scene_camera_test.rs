use std::time::Duration;

use cgmath::{Deg, InnerSpace, Point3, Quaternion, Rad, Rotation3, Vector3};
use simple_scene::camera::{Camera, FollowCamera, Projection};
use simple_scene::context::MouseState;
use simple_scene::data_structures::bounds::{Aabb, Frustum};
use simple_scene::data_structures::pose::Pose;
use simple_scene::data_structures::scene_graph::{GroupNode, SceneNode};
use simple_scene::render::Render;
use winit::dpi::PhysicalPosition;

/// A renderless stand-in for mesh geometry: fixed local bounds and no GPU
/// buffers, so picking can be exercised without a device.
struct BlockNode {
    children: Vec<Box<dyn SceneNode>>,
    local: Pose,
    world: Pose,
    visible: bool,
    local_aabb: Aabb,
}

impl BlockNode {
    fn with_pose(half_extent: f32, pose: Pose) -> Self {
        Self {
            children: vec![],
            local: pose,
            world: Pose::default(),
            visible: true,
            local_aabb: Aabb::from_center_extents(
                vec3(0.0, 0.0, 0.0),
                vec3(half_extent, half_extent, half_extent),
            ),
        }
    }
}

impl SceneNode for BlockNode {
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
        let mut aabb = self.local_aabb.transformed(&self.world);
        for child in &self.children {
            aabb.expand_aabb(&child.world_aabb());
        }
        aabb
    }

    fn write_to_buffers(&mut self, _queue: &wgpu::Queue) {}

    fn get_render(&self, _frustum: Option<&Frustum>) -> Render<'_> {
        Render::None
    }
}

fn vec3(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}

fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!(
        (a - b).magnitude() < 1e-4,
        "expected {:?} to be close to {:?}",
        a,
        b
    );
}

#[test]
fn should_propagate_world_transforms_down_the_tree() {
    let mut child = GroupNode::new();
    child.set_local_pose(Pose::from(vec3(0.0, 2.0, 0.0)));

    let mut grandchild = GroupNode::new();
    grandchild.set_local_pose(Pose::from(vec3(1.0, 0.0, 0.0)));
    child.add_child(Box::new(grandchild));

    let mut root = GroupNode::with_pose(Pose::from(vec3(10.0, 0.0, 0.0)));
    root.add_child(Box::new(child));

    root.update_world_transforms(&Pose::default());

    assert_vec_close(root.world_pose().position, vec3(10.0, 0.0, 0.0));
    let child = &root.children()[0];
    assert_vec_close(child.world_pose().position, vec3(10.0, 2.0, 0.0));
    let grandchild = &child.children()[0];
    assert_vec_close(grandchild.world_pose().position, vec3(11.0, 2.0, 0.0));
}

#[test]
fn should_rotate_child_offsets_through_the_parent() {
    let mut child = GroupNode::new();
    child.set_local_pose(Pose::from(vec3(5.0, 0.0, 0.0)));

    let mut root = GroupNode::with_pose(Pose {
        rotation: Quaternion::from_angle_y(Deg(90.0)),
        ..Pose::default()
    });
    root.add_child(Box::new(child));

    root.update_world_transforms(&Pose::default());
    assert_vec_close(root.children()[0].world_pose().position, vec3(0.0, 0.0, -5.0));
}

#[test]
fn should_animate_via_local_pose_mutation() {
    let mut root = GroupNode::new();
    root.update_local_pose(&mut |pose| {
        pose.position.x += 1.0;
    });
    root.update_local_pose(&mut |pose| {
        pose.position.x += 1.0;
    });
    assert_vec_close(root.local_pose().position, vec3(2.0, 0.0, 0.0));
}

#[test]
fn should_render_nothing_for_empty_or_invisible_groups() {
    let mut root = GroupNode::new();
    root.add_child(Box::new(GroupNode::new()));
    assert!(root.get_render(None).is_empty());

    root.set_visible(false);
    assert!(matches!(
        root.get_render(None),
        simple_scene::render::Render::None
    ));
}

#[test]
fn should_report_empty_bounds_for_geometry_free_groups() {
    let mut root = GroupNode::new();
    root.add_child(Box::new(GroupNode::new()));
    root.update_world_transforms(&Pose::default());
    assert!(root.world_aabb().is_empty());
}

#[test]
fn should_converge_follow_camera_on_static_target() {
    let mut camera = Camera::new((20.0, 0.0, 0.0), Deg(180.0), Deg(0.0));
    let follow = FollowCamera::new(5.0, 2.0, 6.0);
    let target = Point3::new(0.0, 0.0, 0.0);

    for _ in 0..300 {
        follow.update(&mut camera, target, Duration::from_millis(16));
    }

    // Camera settles at the configured distance and height on the original
    // horizontal approach direction (+X).
    assert_vec_close(
        camera.position - target,
        vec3(5.0, 2.0, 0.0),
    );
    // And it looks at the target
    let look = (target - camera.position).normalize();
    assert!(camera.forward().dot(look) > 0.999);
}

#[test]
fn should_reduce_distance_monotonically_while_following() {
    let mut camera = Camera::new((50.0, 30.0, 0.0), Deg(180.0), Deg(0.0));
    let follow = FollowCamera::new(5.0, 2.0, 4.0);
    let target = Point3::new(0.0, 0.0, 0.0);
    let desired = Point3::new(5.0, 2.0, 0.0);

    let mut last = (camera.position - desired).magnitude();
    for _ in 0..50 {
        follow.update(&mut camera, target, Duration::from_millis(16));
        let now = (camera.position - desired).magnitude();
        assert!(now <= last + 1e-5);
        last = now;
    }
}

#[test]
fn should_clamp_follow_camera_pitch() {
    // Target directly below: pitch must stay shy of straight down
    let mut camera = Camera::new((0.0, 100.0, 0.0), Deg(0.0), Deg(0.0));
    let follow = FollowCamera::new(0.1, 50.0, 100.0);
    follow.update(
        &mut camera,
        Point3::new(0.0, -100.0, 0.0),
        Duration::from_millis(16),
    );
    assert!(camera.pitch > Rad(-std::f32::consts::FRAC_PI_2));
    assert!(camera.pitch < Rad(std::f32::consts::FRAC_PI_2));
}

#[test]
fn should_update_aspect_on_resize() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    assert!((projection.aspect() - 800.0 / 600.0).abs() < 1e-6);
    projection.resize(1000, 500);
    assert!((projection.aspect() - 2.0).abs() < 1e-6);
    // Degenerate sizes never divide by zero
    projection.resize(100, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn should_cast_picking_rays_through_the_view_center() {
    let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let ray = camera
        .ray_through_ndc(0.0, 0.0, &projection)
        .expect("view-proj should be invertible");

    // The center ray runs along the camera's forward axis
    assert!(ray.direction.dot(camera.forward()) > 0.999);
    // And originates on the near plane in front of the camera
    assert!(ray.origin.z < 10.0);
}

#[test]
fn should_convert_cursor_position_to_ndc() {
    let mut mouse = MouseState::default();

    mouse.coords = PhysicalPosition::new(400.0, 300.0);
    assert_eq!(mouse.ndc(800, 600), (0.0, 0.0));

    mouse.coords = PhysicalPosition::new(0.0, 0.0);
    assert_eq!(mouse.ndc(800, 600), (-1.0, 1.0));

    mouse.coords = PhysicalPosition::new(800.0, 600.0);
    assert_eq!(mouse.ndc(800, 600), (1.0, -1.0));

    // Degenerate window sizes never divide by zero
    let (x, y) = mouse.ndc(0, 0);
    assert!(x.is_finite() && y.is_finite());
}

#[test]
fn should_pick_posed_node_under_the_cursor() {
    let block = BlockNode::with_pose(1.0, Pose::from(vec3(2.0, 0.0, 0.0)));
    let mut root = GroupNode::with_pose(Pose::from(vec3(3.0, 0.0, 0.0)));
    root.add_child(Box::new(block));
    root.update_world_transforms(&Pose::default());

    // The block's world bounds end up centered at (5, 0, 0); the camera sits
    // in front of it looking down -Z, with the cursor in the window center.
    let camera = Camera::new((5.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mouse = MouseState {
        coords: PhysicalPosition::new(400.0, 300.0),
        ..MouseState::default()
    };
    let (ndc_x, ndc_y) = mouse.ndc(800, 600);
    let ray = camera
        .ray_through_ndc(ndc_x, ndc_y, &projection)
        .expect("view-proj should be invertible");

    // The rolled-up group bounds and the block itself both report the hit,
    // entering through the block's front face at z = 1.
    let distance = root.intersect_ray(&ray).expect("group should be hit");
    let entry = ray.origin + ray.direction * distance;
    assert!((entry - vec3(5.0, 0.0, 1.0)).magnitude() < 1e-2);
    assert!(root.children()[0].intersect_ray(&ray).is_some());
}

#[test]
fn should_miss_nodes_away_from_the_cursor() {
    let mut block = BlockNode::with_pose(1.0, Pose::from(vec3(5.0, 0.0, 0.0)));
    block.update_world_transforms(&Pose::default());

    let camera = Camera::new((5.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);

    // A cursor near the window corner unprojects to a ray passing the block.
    let mouse = MouseState {
        coords: PhysicalPosition::new(790.0, 10.0),
        ..MouseState::default()
    };
    let (ndc_x, ndc_y) = mouse.ndc(800, 600);
    let ray = camera
        .ray_through_ndc(ndc_x, ndc_y, &projection)
        .expect("view-proj should be invertible");
    assert!(block.intersect_ray(&ray).is_none());
}

#[test]
fn should_wrap_rolled_up_bounds_in_a_sphere() {
    let mut block = BlockNode::with_pose(1.0, Pose::from(vec3(5.0, 0.0, 0.0)));
    block.update_world_transforms(&Pose::default());

    let sphere = block.world_bounding_sphere();
    assert_vec_close(sphere.center, vec3(5.0, 0.0, 0.0));
    assert!((sphere.radius - 3.0_f32.sqrt()).abs() < 1e-4);
    assert!(sphere.contains_point(vec3(5.9, 0.9, 0.9)));
    assert!(!sphere.contains_point(vec3(5.0, 0.0, 2.0)));
}
