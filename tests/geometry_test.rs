use cgmath::{InnerSpace, Vector3};
use simple_scene::data_structures::geometry::{MeshData, cube, plane, uv_sphere};

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "expected {} to be close to {}", a, b);
}

fn assert_indices_in_range(data: &MeshData) {
    let len = data.vertices.len() as u32;
    assert!(data.indices.iter().all(|&i| i < len));
    assert_eq!(data.indices.len() % 3, 0);
}

#[test]
fn should_generate_cube_with_six_faces() {
    let data = cube(1.0);
    assert_eq!(data.vertices.len(), 24);
    assert_eq!(data.indices.len(), 36);
    assert_indices_in_range(&data);
}

#[test]
fn should_generate_cube_with_unit_normals_and_tight_bounds() {
    let data = cube(2.0);
    for v in &data.vertices {
        assert_close(Vector3::from(v.normal).magnitude(), 1.0);
    }
    let aabb = data.compute_aabb();
    assert_eq!(aabb.min, Vector3::new(-2.0, -2.0, -2.0));
    assert_eq!(aabb.max, Vector3::new(2.0, 2.0, 2.0));
}

#[test]
fn should_wind_cube_faces_outward() {
    let data = cube(1.0);
    for triangle in data.indices.chunks(3) {
        let a = Vector3::from(data.vertices[triangle[0] as usize].position);
        let b = Vector3::from(data.vertices[triangle[1] as usize].position);
        let c = Vector3::from(data.vertices[triangle[2] as usize].position);
        let face_normal = (b - a).cross(c - a);
        let stated: Vector3<f32> = data.vertices[triangle[0] as usize].normal.into();
        // Counter-clockwise seen from outside means the geometric normal
        // agrees with the stored face normal.
        assert!(face_normal.dot(stated) > 0.0);
    }
}

#[test]
fn should_generate_sphere_on_the_radius() {
    let data = uv_sphere(3.0, 12, 24);
    for v in &data.vertices {
        assert_close(Vector3::from(v.position).magnitude(), 3.0);
        assert_close(Vector3::from(v.normal).magnitude(), 1.0);
    }
    assert_indices_in_range(&data);
}

#[test]
fn should_bound_sphere_by_its_radius_cube() {
    // Even stacks and slices divisible by four sample the extreme points on
    // every axis, so the box is [-r, r] cubed up to float noise.
    let aabb = uv_sphere(3.0, 12, 24).compute_aabb();
    for axis in 0..3 {
        assert_close(aabb.min[axis], -3.0);
        assert_close(aabb.max[axis], 3.0);
    }
}

#[test]
fn should_wind_sphere_triangles_outward() {
    let data = uv_sphere(1.0, 8, 12);
    for triangle in data.indices.chunks(3) {
        let a = Vector3::from(data.vertices[triangle[0] as usize].position);
        let b = Vector3::from(data.vertices[triangle[1] as usize].position);
        let c = Vector3::from(data.vertices[triangle[2] as usize].position);
        let face_normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        // Degenerate pole triangles have a zero face normal; skip those.
        if face_normal.magnitude2() > 1e-8 {
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }
}

#[test]
fn should_clamp_sphere_tessellation() {
    // Below-minimum parameters still give a valid mesh
    let data = uv_sphere(1.0, 0, 0);
    assert!(!data.vertices.is_empty());
    assert_indices_in_range(&data);
}

#[test]
fn should_generate_plane_facing_up() {
    let data = plane(5.0);
    assert_eq!(data.vertices.len(), 4);
    assert_eq!(data.indices.len(), 6);
    for v in &data.vertices {
        assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        assert_eq!(v.position[1], 0.0);
    }
    let aabb = data.compute_aabb();
    assert_eq!(aabb.min, Vector3::new(-5.0, 0.0, -5.0));
    assert_eq!(aabb.max, Vector3::new(5.0, 0.0, 5.0));
}

#[test]
fn should_cover_vertices_with_bounding_sphere() {
    let data = uv_sphere(2.0, 10, 20);
    let sphere = data.compute_bounding_sphere();
    assert_close(sphere.radius, 2.0);
    for v in &data.vertices {
        // Allow for float noise on the boundary
        let distance = (Vector3::from(v.position) - sphere.center).magnitude();
        assert!(distance <= sphere.radius + 1e-4);
    }
}

#[test]
fn should_give_empty_bounds_for_empty_mesh() {
    let data = MeshData::default();
    assert!(data.compute_aabb().is_empty());
    assert_eq!(data.compute_bounding_sphere().radius, 0.0);
}
