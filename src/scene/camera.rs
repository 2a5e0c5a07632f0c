use glam::{Mat4, Vec3};

use crate::config::SceneConfig;

/// Perspective camera that always looks at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            fov_y_degrees: config.fov_y_degrees,
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_centre() {
        let camera = Camera::new(&SceneConfig::default(), 16.0 / 9.0).with_position(Vec3::new(0.0, 0.0, 8.0));
        let ndc = camera.view_projection().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn wider_aspect_compresses_x() {
        let mut camera = Camera::new(&SceneConfig::default(), 1.0).with_position(Vec3::new(0.0, 0.0, 5.0));
        let square = camera.view_projection().project_point3(Vec3::new(1.0, 1.0, 0.0));
        camera.set_aspect(2.0);
        let wide = camera.view_projection().project_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((wide.x - square.x / 2.0).abs() < 1e-5);
        assert!((wide.y - square.y).abs() < 1e-5);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut camera = Camera::new(&SceneConfig::default(), 1.5);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 1.5);
    }
}
