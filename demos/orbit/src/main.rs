//! Orbit demo: a spinning planet with a translucent atmosphere and an
//! orbiting moon, tracked by a smoothed follow camera.
//!
//! Keys: F toggles the follow camera (WASD free-flight otherwise, mouse-look
//! while the right button is held), H toggles the HUD, P pauses the orbit.

use std::time::Duration;

use simple_scene::{
    Deg, EuclideanSpace, KeyCode, PhysicalKey, Point3, Quaternion, Rad, Rotation3, Vector3,
    WindowEvent,
    app::{FlowConstructor, SceneFlow},
    camera::FollowCamera,
    context::{Context, InitContext},
    data_structures::{
        bounds::Frustum,
        buffer::GeometryBuffer,
        geometry,
        overlay::{OverlayNode, OverlayRect},
        pose::Pose,
        scene_graph::{GroupNode, MeshNode, SceneNode},
    },
    render::Render,
    resources::Material,
};

// Child slots under the scene root (planet, atmosphere, moon pivot).
const PLANET: usize = 0;
const MOON_PIVOT: usize = 2;

#[derive(Default)]
struct State {
    paused: bool,
}

struct OrbitScene {
    root: GroupNode,
    hud: OverlayNode,
    follow: FollowCamera,
    follow_enabled: bool,
    planet_angle: f32,
    orbit_angle: f32,
}

impl OrbitScene {
    async fn new(init: &InitContext) -> OrbitScene {
        let device = &init.device;
        let queue = &init.queue;

        let planet = MeshNode::new(
            device,
            "planet",
            &geometry::uv_sphere(2.0, 24, 48),
            Material::solid(device, queue, "planet", [140, 110, 70, 255]),
        );

        let mut atmosphere = MeshNode::new(
            device,
            "atmosphere",
            &geometry::uv_sphere(2.3, 24, 48),
            Material::solid(device, queue, "atmosphere", [90, 160, 255, 80]),
        );
        atmosphere.transparent = true;

        let mut moon = MeshNode::new(
            device,
            "moon",
            &geometry::uv_sphere(0.5, 16, 32),
            Material::solid(device, queue, "moon", [200, 200, 210, 255]),
        );
        moon.set_local_pose(Pose::from(Vector3::new(6.0, 0.0, 0.0)));

        let mut moon_pivot = GroupNode::new();
        moon_pivot.add_child(Box::new(moon));

        let mut root = GroupNode::new();
        root.add_child(Box::new(planet));
        root.add_child(Box::new(atmosphere));
        root.add_child(Box::new(moon_pivot));

        let hud = OverlayNode::new(
            device,
            OverlayRect {
                x: -0.95,
                y: -0.95,
                width: 0.5,
                height: 0.12,
            },
            Material::solid(device, queue, "hud", [20, 20, 30, 180]),
        );

        OrbitScene {
            root,
            hud,
            follow: FollowCamera::new(8.0, 3.0, 4.0),
            follow_enabled: true,
            planet_angle: 0.0,
            orbit_angle: 0.0,
        }
    }

    fn moon_position(&self) -> Point3<f32> {
        let pivot = &self.root.children()[MOON_PIVOT];
        let moon = &pivot.children()[0];
        Point3::from_vec(moon.world_pose().position)
    }
}

impl SceneFlow<State> for OrbitScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut State) {
        ctx.set_light_position([12.0, 10.0, 12.0]);
        ctx.light.marker = Some(GeometryBuffer::new(
            &ctx.device,
            "light marker",
            &geometry::cube(0.5),
        ));
        ctx.camera.camera.position = (0.0, 4.0, 12.0).into();
        ctx.camera.camera.yaw = Deg(-90.0).into();
        ctx.camera.camera.pitch = Deg(-15.0).into();
    }

    fn on_window_events(&mut self, _: &Context, state: &mut State, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if !event.state.is_pressed() {
                return;
            }
            match event.physical_key {
                PhysicalKey::Code(KeyCode::KeyF) => self.follow_enabled = !self.follow_enabled,
                PhysicalKey::Code(KeyCode::KeyH) => self.hud.visible = !self.hud.visible,
                PhysicalKey::Code(KeyCode::KeyP) => state.paused = !state.paused,
                _ => (),
            }
        }
    }

    fn on_update(&mut self, ctx: &mut Context, state: &mut State, dt: Duration) {
        if !state.paused {
            self.planet_angle += 0.25 * dt.as_secs_f32();
            self.orbit_angle += 0.6 * dt.as_secs_f32();

            let children = self.root.children_mut();
            children[PLANET].set_local_pose(Pose {
                rotation: Quaternion::from_angle_y(Rad(self.planet_angle)),
                ..Pose::default()
            });
            children[MOON_PIVOT].set_local_pose(Pose {
                rotation: Quaternion::from_angle_y(Rad(self.orbit_angle)),
                ..Pose::default()
            });
        }

        self.root.update_world_transforms(&Pose::default());
        self.root.write_to_buffers(&ctx.queue);

        if self.follow_enabled {
            self.follow
                .update(&mut ctx.camera.camera, self.moon_position(), dt);
        }
    }

    fn on_render(&self, frustum: &Frustum) -> Render<'_> {
        Render::Composed(vec![
            self.root.get_render(Some(frustum)),
            Render::from(&self.hud),
        ])
    }
}

fn main() {
    let scene: FlowConstructor<State> = Box::new(|init| {
        Box::pin(async move { Box::new(OrbitScene::new(&init).await) as Box<dyn SceneFlow<_>> })
    });

    if let Err(e) = simple_scene::app::run(vec![scene]) {
        eprintln!("orbit demo failed: {}", e);
    }
}
