use cgmath::{Deg, InnerSpace, Matrix4, Quaternion, Rotation3, Vector3, Vector4};
use simple_scene::data_structures::pose::Pose;

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
fn should_compose_with_identity() {
    let pose = Pose {
        position: vec3(1.0, 2.0, 3.0),
        rotation: Quaternion::from_angle_y(Deg(30.0)),
        scale: vec3(2.0, 2.0, 2.0),
    };
    let composed = &Pose::default() * &pose;
    assert_vec_close(composed.position, pose.position);
    assert_vec_close(composed.scale, pose.scale);

    let composed = &pose * &Pose::default();
    assert_vec_close(composed.position, pose.position);
    assert_vec_close(composed.scale, pose.scale);
}

#[test]
fn should_translate_child_into_parent_frame() {
    // Parent rotated 90 degrees around Y turns the child's +X offset into -Z.
    let parent = Pose {
        rotation: Quaternion::from_angle_y(Deg(90.0)),
        ..Pose::default()
    };
    let child = Pose::from(vec3(5.0, 0.0, 0.0));
    let world = &parent * &child;
    assert_vec_close(world.position, vec3(0.0, 0.0, -5.0));
}

#[test]
fn should_apply_parent_scale_to_child_position() {
    let parent = Pose {
        scale: vec3(2.0, 1.0, 1.0),
        ..Pose::default()
    };
    let child = Pose::from(vec3(3.0, 0.0, 0.0));
    let world = &parent * &child;
    assert_vec_close(world.position, vec3(6.0, 0.0, 0.0));
    assert_vec_close(world.scale, vec3(2.0, 1.0, 1.0));
}

#[test]
fn should_match_matrix_composition() {
    let parent = Pose {
        position: vec3(1.0, -2.0, 0.5),
        rotation: Quaternion::from_angle_z(Deg(40.0)),
        scale: vec3(2.0, 2.0, 2.0),
    };
    let child = Pose {
        position: vec3(0.0, 3.0, -1.0),
        rotation: Quaternion::from_angle_x(Deg(-25.0)),
        scale: vec3(0.5, 0.5, 0.5),
    };

    // Composing poses and composing their matrices must transform points the
    // same way (uniform scales, so no shear is lost).
    let composed = &parent * &child;
    let matrix: Matrix4<f32> = parent.to_matrix() * child.to_matrix();

    let point = vec3(0.3, -0.7, 1.1);
    let via_pose = composed.transform_point(point);
    let via_matrix = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    assert_vec_close(via_pose, vec3(via_matrix.x, via_matrix.y, via_matrix.z));
}

#[test]
fn should_stay_shear_free_under_non_uniform_parent_scale() {
    // A non-uniform parent scale over a rotated child would shear in matrix
    // form. Pose composition stays a TRS: the combined scale applies along
    // the child's local axes, so the composed pose maps (0,1,0) onto the
    // rotated unit circle instead of the sheared ellipse.
    let parent = Pose {
        scale: vec3(3.0, 1.0, 1.0),
        ..Pose::default()
    };
    let child = Pose {
        rotation: Quaternion::from_angle_z(Deg(45.0)),
        ..Pose::default()
    };

    let composed = &parent * &child;
    assert_vec_close(composed.scale, vec3(3.0, 1.0, 1.0));

    let inv_sqrt2 = 1.0 / 2.0f32.sqrt();
    let via_pose = composed.transform_point(vec3(0.0, 1.0, 0.0));
    assert_vec_close(via_pose, vec3(-inv_sqrt2, inv_sqrt2, 0.0));
}

#[test]
fn should_transform_points_scale_rotate_translate() {
    let pose = Pose {
        position: vec3(10.0, 0.0, 0.0),
        rotation: Quaternion::from_angle_y(Deg(90.0)),
        scale: vec3(2.0, 1.0, 1.0),
    };
    // (1,0,0) scales to (2,0,0), rotates to (0,0,-2), translates to (10,0,-2)
    let result = pose.transform_point(vec3(1.0, 0.0, 0.0));
    assert_vec_close(result, vec3(10.0, 0.0, -2.0));
}
