use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use simple_scene::camera::{Camera, Projection};
use simple_scene::data_structures::bounds::{Aabb, BoundingSphere, Frustum, Ray};
use simple_scene::data_structures::pose::Pose;

fn vec3(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "expected {} to be close to {}", a, b);
}

#[test]
fn should_union_two_boxes() {
    let a = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let b = Aabb::new(vec3(0.0, 0.0, 0.0), vec3(3.0, 2.0, 1.0));
    let u = a.union(&b);
    assert_eq!(u.min, vec3(-1.0, -1.0, -1.0));
    assert_eq!(u.max, vec3(3.0, 2.0, 1.0));
}

#[test]
fn should_treat_empty_box_as_union_identity() {
    let a = Aabb::new(vec3(-2.0, 0.0, 1.0), vec3(4.0, 5.0, 6.0));
    let u = a.union(&Aabb::EMPTY);
    assert_eq!(u.min, a.min);
    assert_eq!(u.max, a.max);

    let u = Aabb::EMPTY.union(&a);
    assert_eq!(u.min, a.min);
    assert_eq!(u.max, a.max);
}

#[test]
fn should_report_empty_box() {
    assert!(Aabb::EMPTY.is_empty());
    assert!(Aabb::default().is_empty());
    assert!(!Aabb::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0)).is_empty());
}

#[test]
fn should_contain_boundary_points() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    assert!(aabb.contains_point(vec3(1.0, 1.0, 1.0)));
    assert!(aabb.contains_point(vec3(0.0, 0.0, 0.0)));
    assert!(!aabb.contains_point(vec3(1.0001, 0.0, 0.0)));
}

#[test]
fn should_detect_box_overlap() {
    let a = Aabb::new(vec3(0.0, 0.0, 0.0), vec3(2.0, 2.0, 2.0));
    let touching = Aabb::new(vec3(2.0, 0.0, 0.0), vec3(3.0, 1.0, 1.0));
    let apart = Aabb::new(vec3(2.1, 0.0, 0.0), vec3(3.0, 1.0, 1.0));
    assert!(a.intersects(&touching));
    assert!(!a.intersects(&apart));
    assert!(!a.intersects(&Aabb::EMPTY));
    assert!(!Aabb::EMPTY.intersects(&a));
}

#[test]
fn should_expand_to_contain_points() {
    let mut aabb = Aabb::EMPTY;
    aabb.expand_point(vec3(1.0, 2.0, 3.0));
    aabb.expand_point(vec3(-1.0, 0.0, 5.0));
    assert_eq!(aabb.min, vec3(-1.0, 0.0, 3.0));
    assert_eq!(aabb.max, vec3(1.0, 2.0, 5.0));
    assert_eq!(aabb.center(), vec3(0.0, 1.0, 4.0));
    assert_eq!(aabb.size(), vec3(2.0, 2.0, 2.0));
}

#[test]
fn should_stay_conservative_under_rotation() {
    // A unit cube rotated 45 degrees around Y still fits in the transformed
    // box, whose half-width grows to sqrt(2).
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let pose = Pose {
        rotation: Quaternion::from_angle_y(Deg(45.0)),
        ..Pose::default()
    };
    let world = aabb.transformed(&pose);
    let expected = 2.0_f32.sqrt();
    assert_close(world.max.x, expected);
    assert_close(world.min.x, -expected);
    assert_close(world.max.y, 1.0);
}

#[test]
fn should_translate_and_scale_boxes() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let pose = Pose {
        position: vec3(10.0, 0.0, 0.0),
        scale: vec3(2.0, 3.0, 1.0),
        ..Pose::default()
    };
    let world = aabb.transformed(&pose);
    assert_close(world.min.x, 8.0);
    assert_close(world.max.x, 12.0);
    assert_close(world.min.y, -3.0);
    assert_close(world.max.y, 3.0);
}

#[test]
fn should_keep_empty_box_empty_under_transform() {
    let pose = Pose {
        position: vec3(5.0, 5.0, 5.0),
        ..Pose::default()
    };
    assert!(Aabb::EMPTY.transformed(&pose).is_empty());
}

#[test]
fn should_circumscribe_box_with_sphere() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let sphere = BoundingSphere::from_aabb(&aabb);
    assert_eq!(sphere.center, vec3(0.0, 0.0, 0.0));
    assert_close(sphere.radius, 3.0_f32.sqrt());
    assert!(sphere.contains_point(vec3(1.0, 1.0, 1.0)));
}

#[test]
fn should_intersect_sphere_with_box() {
    let aabb = Aabb::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0));
    assert!(aabb.intersects_sphere(&BoundingSphere::new(vec3(2.0, 0.5, 0.5), 1.0)));
    assert!(!aabb.intersects_sphere(&BoundingSphere::new(vec3(2.5, 0.5, 0.5), 1.0)));
}

#[test]
fn should_hit_box_with_ray() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let ray = Ray::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
    let t = ray.intersect_aabb(&aabb).expect("ray should hit");
    assert_close(t, 4.0);
}

#[test]
fn should_miss_box_behind_ray() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let ray = Ray::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, -1.0));
    assert!(ray.intersect_aabb(&aabb).is_none());
}

#[test]
fn should_report_zero_distance_from_inside_box() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let ray = Ray::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
    assert_eq!(ray.intersect_aabb(&aabb), Some(0.0));
}

#[test]
fn should_handle_axis_parallel_rays() {
    let aabb = Aabb::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    // Parallel to the X slab, offset outside it
    let ray = Ray::new(vec3(5.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
    assert!(ray.intersect_aabb(&aabb).is_none());
    // Parallel to the X slab, inside it
    let ray = Ray::new(vec3(0.5, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
    assert!(ray.intersect_aabb(&aabb).is_some());
}

#[test]
fn should_hit_sphere_with_ray() {
    let sphere = BoundingSphere::new(vec3(0.0, 0.0, 0.0), 1.0);
    let ray = Ray::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
    let t = ray.intersect_sphere(&sphere).expect("ray should hit");
    assert_close(t, 4.0);
    let miss = Ray::new(vec3(0.0, 2.0, -5.0), vec3(0.0, 0.0, 1.0));
    assert!(miss.intersect_sphere(&sphere).is_none());
}

#[test]
fn should_accept_visible_point_in_frustum() {
    let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let frustum = camera.frustum(&projection);

    // Straight ahead of the camera (looking down -Z)
    assert!(frustum.contains_point(vec3(0.0, 0.0, 0.0)));
    // Behind the camera
    assert!(!frustum.contains_point(vec3(0.0, 0.0, 20.0)));
    // Beyond the far plane
    assert!(!frustum.contains_point(vec3(0.0, 0.0, -200.0)));
}

#[test]
fn should_cull_boxes_outside_frustum() {
    let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let frustum = camera.frustum(&projection);

    let visible = Aabb::from_center_extents(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0));
    let behind = Aabb::from_center_extents(vec3(0.0, 0.0, 30.0), vec3(1.0, 1.0, 1.0));
    let far_left = Aabb::from_center_extents(vec3(-100.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0));
    assert!(frustum.intersects_aabb(&visible));
    assert!(!frustum.intersects_aabb(&behind));
    assert!(!frustum.intersects_aabb(&far_left));
    assert!(!frustum.intersects_aabb(&Aabb::EMPTY));
}

#[test]
fn should_keep_straddling_boxes_visible() {
    let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let frustum = camera.frustum(&projection);

    // Center is outside the left plane but the box reaches into view
    let straddling = Aabb::from_center_extents(vec3(-6.0, 0.0, 0.0), vec3(4.0, 1.0, 1.0));
    assert!(frustum.intersects_aabb(&straddling));
}

#[test]
fn should_test_spheres_against_frustum() {
    let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let frustum = camera.frustum(&projection);

    assert!(frustum.intersects_sphere(&BoundingSphere::new(vec3(0.0, 0.0, 0.0), 1.0)));
    assert!(!frustum.intersects_sphere(&BoundingSphere::new(vec3(0.0, 0.0, 30.0), 1.0)));
}
