//! Full-window field of slowly floating wireframe shapes.

use std::ops::Range;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::camera::Camera;
use super::mesh::{Geometry, Material, Mesh, MeshId, Transform};
use crate::color::Hsl;
use crate::config::SceneConfig;
use crate::controller::Simulation;
use crate::error::{RenderError, Result};
use crate::particles::sample;
use crate::surface::SceneRenderer;
use crate::viewport::Viewport;

const CAMERA_DISTANCE: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingObject {
    pub mesh: Mesh,
    pub transform: Transform,
    /// Rest position the float motion oscillates around.
    pub origin: Vec3,
    /// Radians added to each rotation axis per frame.
    pub spin: Vec3,
    pub float_speed: f32,
    pub float_range: f32,
}

/// Randomization ranges for one family of shapes.
struct Family {
    count: usize,
    spread: Vec3,
    spin: f32,
    float_speed: Range<f32>,
    float_range: Range<f32>,
    hue_turns: Range<f32>,
    saturation: f32,
    lightness: f32,
    opacity: f32,
    wireframe_chance: f32,
}

const SPHERES: Family = Family {
    count: 8,
    spread: Vec3::new(20.0, 20.0, 10.0),
    spin: 0.01,
    float_speed: 0.005..0.015,
    float_range: 1.0..3.0,
    hue_turns: 0.5..0.8,
    saturation: 0.7,
    lightness: 0.6,
    opacity: 0.6,
    wireframe_chance: 0.5,
};

const RINGS: Family = Family {
    count: 5,
    spread: Vec3::new(25.0, 25.0, 8.0),
    spin: 0.0075,
    float_speed: 0.003..0.011,
    float_range: 0.5..2.0,
    hue_turns: 0.7..0.9,
    saturation: 0.8,
    lightness: 0.5,
    opacity: 0.4,
    wireframe_chance: 1.0,
};

const CUBES: Family = Family {
    count: 6,
    spread: Vec3::new(22.0, 22.0, 6.0),
    spin: 0.0125,
    float_speed: 0.006..0.018,
    float_range: 1.0..3.5,
    hue_turns: 0.15..0.3,
    saturation: 0.7,
    lightness: 0.6,
    opacity: 0.5,
    wireframe_chance: 0.7,
};

impl Family {
    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, id: MeshId, geometry: Geometry) -> FloatingObject {
        let color = Hsl::from_turns(sample(rng, &self.hue_turns), self.saturation, self.lightness);
        let material = Material {
            color: color.to_rgb(),
            opacity: self.opacity,
            wireframe: rng.gen::<f32>() < self.wireframe_chance,
        };
        let origin = Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.spread.x,
            (rng.gen::<f32>() - 0.5) * self.spread.y,
            (rng.gen::<f32>() - 0.5) * self.spread.z,
        );
        let spin_range = -self.spin..self.spin;
        let spin = Vec3::new(
            sample(rng, &spin_range),
            sample(rng, &spin_range),
            sample(rng, &spin_range),
        );
        FloatingObject {
            mesh: Mesh { id, geometry, material },
            transform: Transform::at(origin),
            origin,
            spin,
            float_speed: sample(rng, &self.float_speed),
            float_range: sample(rng, &self.float_range),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FloatingScene {
    objects: Vec<FloatingObject>,
    camera: Camera,
    time: f32,
    /// Pointer projected into world units on the z = 0 plane.
    pointer_target: Vec2,
    influence: f32,
    decay_per_frame: f32,
    config: SceneConfig,
}

impl FloatingScene {
    pub fn new<R: Rng + ?Sized>(viewport: &Viewport, config: SceneConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let mut objects = Vec::with_capacity(SPHERES.count + RINGS.count + CUBES.count);
        let mut next_id = 0;
        let mut id = || {
            next_id += 1;
            MeshId(next_id - 1)
        };

        for _ in 0..SPHERES.count {
            let geometry = Geometry::sphere(0.3 + rng.gen::<f32>() * 0.4, 16, 16);
            objects.push(SPHERES.spawn(rng, id(), geometry));
        }
        for _ in 0..RINGS.count {
            let geometry = Geometry::torus(0.8 + rng.gen::<f32>() * 0.5, 0.2, 8, 20);
            objects.push(RINGS.spawn(rng, id(), geometry));
        }
        for _ in 0..CUBES.count {
            let geometry = Geometry::cube(0.4 + rng.gen::<f32>() * 0.6);
            objects.push(CUBES.spawn(rng, id(), geometry));
        }

        let camera = Camera::new(&config, viewport.aspect()).with_position(Vec3::new(0.0, 0.0, CAMERA_DISTANCE));
        Ok(Self {
            objects,
            camera,
            time: 0.0,
            pointer_target: Vec2::ZERO,
            influence: 0.0,
            decay_per_frame: config.influence_decay_per_frame(),
            config,
        })
    }

    pub fn objects(&self) -> &[FloatingObject] {
        &self.objects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn influence(&self) -> f32 {
        self.influence
    }

    pub fn pointer_target(&self) -> Vec2 {
        self.pointer_target
    }

    /// Point the pointer at a world-space location on the z = 0 plane with
    /// full influence.
    pub fn set_pointer_target(&mut self, target: Vec2) {
        self.pointer_target = target;
        self.influence = 1.0;
    }

    pub fn update(&mut self) {
        self.time += self.config.time_step;
        let time = self.time;
        let radius = self.config.pointer_radius;
        let active = self.influence > self.config.influence_floor;

        for (index, object) in self.objects.iter_mut().enumerate() {
            let phase = index as f32;
            object.transform.rotation += object.spin;

            let position = &mut object.transform.position;
            position.y = object.origin.y + (time * object.float_speed + phase).sin() * object.float_range;
            position.x =
                object.origin.x + (time * object.float_speed * 0.7 + phase).cos() * object.float_range * 0.5;

            if active {
                let delta = self.pointer_target - position.truncate();
                let distance = delta.length();
                if distance < radius {
                    let force = (radius - distance) / radius * self.influence;
                    position.x += delta.x * force * 0.02;
                    position.y += delta.y * force * 0.02;
                    object.transform.rotation.x += force * 0.05;
                    object.transform.rotation.z += force * 0.03;
                }
            }
        }

        self.camera.position.x = (time * 0.2).sin() * 2.0;
        self.camera.position.y = (time * 0.15).cos();
        self.camera.look_at(Vec3::ZERO);

        self.influence *= self.decay_per_frame;
    }

    pub fn draw<C: SceneRenderer + ?Sized>(&self, surface: &mut C) -> Result<(), RenderError> {
        surface.begin_frame(self.camera.view_projection())?;
        for object in &self.objects {
            surface.draw_mesh(&object.mesh, object.transform.matrix())?;
        }
        Ok(())
    }
}

impl<C: SceneRenderer> Simulation<C> for FloatingScene {
    fn step(&mut self) {
        self.update();
    }

    fn render(&self, surface: &mut C) -> Result<(), RenderError> {
        self.draw(surface)
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.camera.set_aspect(viewport.aspect());
    }

    fn pointer_moved(&mut self, position: Vec2, viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let ndc = Vec2::new(
            position.x / viewport.width * 2.0 - 1.0,
            -(position.y / viewport.height) * 2.0 + 1.0,
        );
        self.set_pointer_target(ndc * self.config.pointer_scale);
    }

    fn element_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingScene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> FloatingScene {
        let mut rng = StdRng::seed_from_u64(11);
        FloatingScene::new(&Viewport::new(1600.0, 900.0), SceneConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn builds_nineteen_objects_with_unique_ids() {
        let scene = scene();
        assert_eq!(scene.objects().len(), 19);
        let mut ids: Vec<_> = scene.objects().iter().map(|o| o.mesh.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 19);
        assert!(scene.objects()[8..13].iter().all(|o| o.mesh.material.wireframe));
    }

    #[test]
    fn objects_float_around_their_origin() {
        let mut scene = scene();
        for _ in 0..500 {
            scene.update();
        }
        for object in scene.objects() {
            let offset = object.transform.position - object.origin;
            assert!(offset.y.abs() <= object.float_range + 1e-4);
            assert!(offset.x.abs() <= object.float_range * 0.5 + 1e-4);
            assert_eq!(offset.z, 0.0);
        }
    }

    #[test]
    fn pointer_maps_to_world_plane() {
        let mut scene = scene();
        let viewport = Viewport::new(1600.0, 900.0);
        Simulation::<RecordingScene>::pointer_moved(&mut scene, Vec2::new(1600.0, 0.0), &viewport);
        assert_eq!(scene.pointer_target(), Vec2::new(10.0, 10.0));
        assert_eq!(scene.influence(), 1.0);
    }

    #[test]
    fn influence_decays_each_frame() {
        let mut scene = scene();
        scene.set_pointer_target(Vec2::ZERO);
        let start = scene.influence();
        for _ in 0..3 {
            scene.update();
        }
        assert!((scene.influence() - start * 0.95).abs() < 1e-3);
    }

    #[test]
    fn pointer_pulls_nearby_object() {
        let mut scene = scene();
        let mut calm = scene.clone();
        let target = {
            let object = &scene.objects()[0];
            object.origin.truncate() + Vec2::new(1.0, 0.0)
        };
        scene.set_pointer_target(target);
        scene.update();
        calm.update();

        let pulled = scene.objects()[0].transform.position;
        let free = calm.objects()[0].transform.position;
        assert!(pulled.distance(target.extend(0.0)) < free.distance(target.extend(0.0)));
        assert!(scene.objects()[0].transform.rotation.x > calm.objects()[0].transform.rotation.x);
    }

    #[test]
    fn resize_updates_camera_aspect_only() {
        let mut scene = scene();
        let before: Vec<_> = scene.objects().iter().map(|o| o.transform).collect();
        Simulation::<RecordingScene>::resize(&mut scene, &Viewport::new(800.0, 800.0));
        assert_eq!(scene.camera().aspect, 1.0);
        let after: Vec<_> = scene.objects().iter().map(|o| o.transform).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn draws_every_object_once_per_frame() {
        let scene = scene();
        let mut renderer = RecordingScene::new();
        scene.draw(&mut renderer).unwrap();
        let frame = renderer.last_frame().unwrap();
        assert_eq!(frame.draws.len(), 19);
        assert_eq!(frame.view_projection, scene.camera().view_projection());
    }
}
