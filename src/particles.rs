//! Connected-particle network drawn on a 2D canvas.

use glam::Vec2;
use rand::Rng;

use crate::color::Hsl;
use crate::config::ParticleConfig;
use crate::controller::Simulation;
use crate::error::{RenderError, Result};
use crate::surface::Canvas2d;
use crate::viewport::{SizeClass, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub color: Hsl,
}

impl Particle {
    pub fn at(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            size: 2.0,
            opacity: 0.5,
            color: Hsl::new(220.0, 0.7, 0.6),
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, config: &ParticleConfig) -> Self {
        Self {
            position: Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y),
            velocity: Vec2::new(sample(rng, &config.velocity), sample(rng, &config.velocity)),
            size: sample(rng, &config.size),
            opacity: sample(rng, &config.opacity),
            color: Hsl::new(sample(rng, &config.hue), config.saturation, config.lightness),
        }
    }
}

/// Uniform sample from `range`; an empty range yields its start.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, range: &std::ops::Range<f32>) -> f32 {
    range.start + rng.gen::<f32>() * (range.end - range.start)
}

/// Particles bouncing inside the surface, pulled toward the pointer, with
/// connectors between close pairs.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    pointer: Option<Vec2>,
    config: ParticleConfig,
}

impl ParticleField {
    /// Populate a field sized for `viewport`, with the element count chosen by
    /// the startup size class.
    pub fn new<R: Rng + ?Sized>(
        viewport: &Viewport,
        class: SizeClass,
        config: ParticleConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let bounds = Vec2::new(viewport.width, viewport.height);
        let count = config.count_for(class);
        let particles = (0..count).map(|_| Particle::random(rng, bounds, &config)).collect();
        Ok(Self {
            particles,
            bounds,
            pointer: None,
            config,
        })
    }

    /// Field with explicitly placed particles.
    pub fn with_particles(bounds: Vec2, particles: Vec<Particle>, config: ParticleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            particles,
            bounds,
            pointer: None,
            config,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Pairs closer than the interaction radius with their connector opacity.
    pub fn connections(&self) -> Vec<(usize, usize, f32)> {
        let radius = self.config.interaction_radius;
        let mut edges = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let distance = a.position.distance(b.position);
                if distance < radius {
                    let alpha = (radius - distance) / radius * self.config.edge_opacity;
                    edges.push((i, j, alpha));
                }
            }
        }
        edges
    }

    /// One integration step: move, pull toward the pointer, bounce off walls.
    pub fn update(&mut self) {
        let radius = self.config.interaction_radius;
        let gain = self.config.pointer_gain;
        let bounds = self.bounds;

        for particle in &mut self.particles {
            particle.position += particle.velocity;

            if let Some(pointer) = self.pointer {
                let delta = pointer - particle.position;
                let distance = delta.length();
                if distance > 0.0 && distance < radius {
                    // unit direction scaled by gain / distance
                    particle.velocity += delta / distance * (gain / distance.max(1.0));
                }
            }

            if particle.position.x < 0.0 || particle.position.x > bounds.x {
                particle.velocity.x = -particle.velocity.x;
            }
            if particle.position.y < 0.0 || particle.position.y > bounds.y {
                particle.velocity.y = -particle.velocity.y;
            }
            particle.position = particle.position.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO));
        }
    }

    pub fn draw<C: Canvas2d + ?Sized>(&self, surface: &mut C) -> Result<(), RenderError> {
        surface.clear()?;
        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.size, particle.color, particle.opacity)?;
        }
        for (i, j, alpha) in self.connections() {
            let a = &self.particles[i];
            let b = &self.particles[j];
            surface.stroke_line(a.position, b.position, self.config.edge_width, a.color, alpha)?;
        }
        Ok(())
    }
}

impl<C: Canvas2d> Simulation<C> for ParticleField {
    fn step(&mut self) {
        self.update();
    }

    fn render(&self, surface: &mut C) -> Result<(), RenderError> {
        self.draw(surface)
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.bounds = Vec2::new(viewport.width, viewport.height);
    }

    fn pointer_moved(&mut self, position: Vec2, _viewport: &Viewport) {
        self.pointer = Some(position);
    }

    fn element_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(particles: Vec<Particle>) -> ParticleField {
        ParticleField::with_particles(Vec2::new(800.0, 600.0), particles, ParticleConfig::default()).unwrap()
    }

    #[test]
    fn random_field_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = ParticleConfig::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let field = ParticleField::new(&viewport, SizeClass::Large, config.clone(), &mut rng).unwrap();
        assert_eq!(field.particles().len(), 60);
        for p in field.particles() {
            assert!((0.0..=1280.0).contains(&p.position.x));
            assert!((0.0..=720.0).contains(&p.position.y));
            assert!(config.velocity.contains(&p.velocity.x));
            assert!(config.velocity.contains(&p.velocity.y));
            assert!(config.size.contains(&p.size));
            assert!(config.opacity.contains(&p.opacity));
            assert!(config.hue.contains(&p.color.hue));
        }
    }

    #[test]
    fn small_viewport_gets_fewer_particles() {
        let mut rng = StdRng::seed_from_u64(1);
        let viewport = Viewport::new(375.0, 812.0);
        let field = ParticleField::new(&viewport, SizeClass::Small, ParticleConfig::default(), &mut rng).unwrap();
        assert_eq!(field.particles().len(), 30);
    }

    #[test]
    fn count_switches_at_exact_threshold_width() {
        let config = ParticleConfig::default();
        for (width, expected) in [(767.0, 30), (768.0, 60)] {
            let mut rng = StdRng::seed_from_u64(1);
            let class = config.size_class(width);
            let field = ParticleField::new(&Viewport::new(width, 600.0), class, config.clone(), &mut rng).unwrap();
            assert_eq!(field.particles().len(), expected, "width {width}");
        }
    }

    #[test]
    fn pointer_pull_is_stronger_when_closer() {
        let mut near = field(vec![Particle::at(Vec2::new(410.0, 300.0), Vec2::ZERO)]);
        let mut far = field(vec![Particle::at(Vec2::new(490.0, 300.0), Vec2::ZERO)]);
        near.set_pointer(Some(Vec2::new(400.0, 300.0)));
        far.set_pointer(Some(Vec2::new(400.0, 300.0)));
        near.update();
        far.update();

        let near_v = near.particles()[0].velocity;
        let far_v = far.particles()[0].velocity;
        assert!(near_v.x < 0.0 && far_v.x < 0.0);
        assert!(near_v.x.abs() > far_v.x.abs());
        assert_eq!(near_v.y, 0.0);
    }

    #[test]
    fn pointer_outside_radius_has_no_effect() {
        let mut f = field(vec![Particle::at(Vec2::new(100.0, 100.0), Vec2::new(0.1, 0.1))]);
        f.set_pointer(Some(Vec2::new(300.0, 100.0)));
        f.update();
        assert_eq!(f.particles()[0].velocity, Vec2::new(0.1, 0.1));
    }

    #[test]
    fn bounces_off_top_left_corner() {
        let mut f = field(vec![Particle::at(Vec2::new(0.5, 0.5), Vec2::new(-1.0, -1.0))]);
        f.update();
        let p = &f.particles()[0];
        assert_eq!(p.position, Vec2::ZERO);
        assert_eq!(p.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn resize_keeps_particles() {
        let original = vec![
            Particle::at(Vec2::new(10.0, 20.0), Vec2::new(0.1, 0.2)),
            Particle::at(Vec2::new(30.0, 40.0), Vec2::new(-0.1, 0.0)),
        ];
        let mut f = field(original.clone());
        Simulation::<RecordingCanvas>::resize(&mut f, &Viewport::new(400.0, 300.0));
        assert_eq!(f.bounds(), Vec2::new(400.0, 300.0));
        assert_eq!(f.particles(), original.as_slice());
    }

    #[test]
    fn draw_clears_then_circles_then_lines() {
        let f = field(vec![
            Particle::at(Vec2::new(100.0, 100.0), Vec2::ZERO),
            Particle::at(Vec2::new(130.0, 140.0), Vec2::ZERO),
        ]);
        let mut canvas = RecordingCanvas::new();
        f.draw(&mut canvas).unwrap();
        let commands = canvas.commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));
        match &commands[3] {
            DrawCommand::Line { width, alpha, .. } => {
                assert_eq!(*width, 0.5);
                assert!((alpha - 0.1).abs() < 1e-6);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }
}
