//! Hero banner: a pulsing icosahedron with small tetrahedra in orbit.

use std::f32::consts::TAU;

use glam::Vec3;

use super::camera::Camera;
use super::mesh::{Geometry, Material, Mesh, MeshId, Transform};
use crate::color::{rgb_hex, Hsl};
use crate::config::SceneConfig;
use crate::controller::Simulation;
use crate::error::{RenderError, Result};
use crate::surface::SceneRenderer;
use crate::viewport::Viewport;

const CAMERA_DISTANCE: f32 = 6.0;
const ORBITERS: usize = 4;
const ORBIT_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Orbiter {
    pub mesh: Mesh,
    pub transform: Transform,
    pub angle: f32,
    pub radius: f32,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct HeroScene {
    core: Mesh,
    core_transform: Transform,
    orbiters: Vec<Orbiter>,
    camera: Camera,
    time: f32,
    config: SceneConfig,
}

impl HeroScene {
    pub fn new(viewport: &Viewport, config: SceneConfig) -> Result<Self> {
        config.validate()?;
        let core = Mesh {
            id: MeshId(0),
            geometry: Geometry::icosahedron(1.2, 1),
            material: Material {
                color: rgb_hex(0x28a745),
                opacity: 0.8,
                wireframe: true,
            },
        };

        let orbiters = (0..ORBITERS)
            .map(|i| Orbiter {
                mesh: Mesh {
                    id: MeshId(i as u32 + 1),
                    geometry: Geometry::tetrahedron(0.3),
                    material: Material {
                        color: Hsl::from_turns(0.3 + i as f32 * 0.1, 0.8, 0.6).to_rgb(),
                        opacity: 0.6,
                        wireframe: false,
                    },
                },
                transform: Transform::default(),
                angle: i as f32 / ORBITERS as f32 * TAU,
                radius: ORBIT_RADIUS,
                speed: 0.02 + i as f32 * 0.005,
            })
            .collect();

        let camera = Camera::new(&config, viewport.aspect()).with_position(Vec3::new(0.0, 0.0, CAMERA_DISTANCE));
        Ok(Self {
            core,
            core_transform: Transform::default(),
            orbiters,
            camera,
            time: 0.0,
            config,
        })
    }

    pub fn core_transform(&self) -> &Transform {
        &self.core_transform
    }

    pub fn orbiters(&self) -> &[Orbiter] {
        &self.orbiters
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn update(&mut self) {
        self.time += self.config.time_step;
        let time = self.time;

        self.core_transform.rotation.x += 0.01;
        self.core_transform.rotation.y += 0.015;
        self.core_transform.scale = 1.0 + (time * 2.0).sin() * 0.1;

        for orbiter in &mut self.orbiters {
            orbiter.angle += orbiter.speed;
            let a = orbiter.angle;
            orbiter.transform.position = Vec3::new(
                a.cos() * orbiter.radius,
                a.sin() * orbiter.radius * 0.5,
                (a * 2.0).sin(),
            );
            orbiter.transform.rotation.x += 0.02;
            orbiter.transform.rotation.y += 0.025;
        }

        self.camera.position.x = (time * 0.5).sin() * 0.5;
        self.camera.position.y = (time * 0.3).cos() * 0.3;
        self.camera.look_at(Vec3::ZERO);
    }

    pub fn draw<C: SceneRenderer + ?Sized>(&self, surface: &mut C) -> Result<(), RenderError> {
        surface.begin_frame(self.camera.view_projection())?;
        surface.draw_mesh(&self.core, self.core_transform.matrix())?;
        for orbiter in &self.orbiters {
            surface.draw_mesh(&orbiter.mesh, orbiter.transform.matrix())?;
        }
        Ok(())
    }
}

impl<C: SceneRenderer> Simulation<C> for HeroScene {
    fn step(&mut self) {
        self.update();
    }

    fn render(&self, surface: &mut C) -> Result<(), RenderError> {
        self.draw(surface)
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.camera.set_aspect(viewport.aspect());
    }

    fn element_count(&self) -> usize {
        1 + self.orbiters.len()
    }
}
