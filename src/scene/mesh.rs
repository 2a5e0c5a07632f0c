//! Procedural geometry for the decorative scenes.

use std::collections::{BTreeSet, HashMap};
use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Identifies a mesh so renderers can cache uploaded buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Geometry {
    /// Unique undirected edges of every triangle, for wireframe drawing.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges = BTreeSet::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a != b {
                    edges.insert([a.min(b), a.max(b)]);
                }
            }
        }
        edges.into_iter().collect()
    }

    /// UV sphere.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut positions = Vec::new();
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                positions.push(Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                ));
            }
        }

        let row = width_segments + 1;
        let mut triangles = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    triangles.push([a, b, d]);
                }
                if iy != height_segments - 1 {
                    triangles.push([b, c, d]);
                }
            }
        }
        Self { positions, triangles }
    }

    /// Ring around the Z axis.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);
        let mut positions = Vec::new();
        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let v = j as f32 / radial_segments as f32 * TAU;
                positions.push(Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                ));
            }
        }

        let row = tubular_segments + 1;
        let mut triangles = Vec::new();
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                triangles.push([a, b, d]);
                triangles.push([b, c, d]);
            }
        }
        Self { positions, triangles }
    }

    /// Axis-aligned cube centred on the origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self { positions, triangles }
    }

    /// Icosahedron, each face split into four `detail` times and pushed back
    /// onto the sphere.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let positions = vec![
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ];
        let triangles = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        let mut geometry = Self { positions, triangles };
        for _ in 0..detail {
            geometry = geometry.subdivided();
        }
        geometry.project_to_sphere(radius);
        geometry
    }

    pub fn tetrahedron(radius: f32) -> Self {
        let mut geometry = Self {
            positions: vec![
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
            ],
            triangles: vec![[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]],
        };
        geometry.project_to_sphere(radius);
        geometry
    }

    fn subdivided(&self) -> Self {
        let mut positions = self.positions.clone();
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (positions[a as usize] + positions[b as usize]) * 0.5;
                positions.push(mid);
                (positions.len() - 1) as u32
            })
        };

        let mut triangles = Vec::with_capacity(self.triangles.len() * 4);
        for &[a, b, c] in &self.triangles {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            triangles.push([a, ab, ca]);
            triangles.push([b, bc, ab]);
            triangles.push([c, ca, bc]);
            triangles.push([ab, bc, ca]);
        }
        Self { positions, triangles }
    }

    fn project_to_sphere(&mut self, radius: f32) {
        for p in &mut self.positions {
            *p = p.normalize_or_zero() * radius;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// sRGB components in `[0, 1]`.
    pub color: [f32; 3],
    pub opacity: f32,
    pub wireframe: bool,
}

/// Geometry and material of one scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    pub geometry: Geometry,
    pub material: Material,
}

/// Position, Euler rotation (XYZ order) and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on_sphere(geometry: &Geometry, radius: f32) -> bool {
        geometry
            .positions
            .iter()
            .all(|p| (p.length() - radius).abs() < 1e-4)
    }

    fn indices_in_range(geometry: &Geometry) -> bool {
        let n = geometry.positions.len() as u32;
        geometry.triangles.iter().flatten().all(|&i| i < n)
    }

    #[test]
    fn icosahedron_counts() {
        let base = Geometry::icosahedron(1.0, 0);
        assert_eq!(base.positions.len(), 12);
        assert_eq!(base.triangles.len(), 20);
        assert_eq!(base.edges().len(), 30);
        assert!(all_on_sphere(&base, 1.0));

        let detailed = Geometry::icosahedron(1.2, 1);
        assert_eq!(detailed.positions.len(), 42);
        assert_eq!(detailed.triangles.len(), 80);
        assert_eq!(detailed.edges().len(), 120);
        assert!(all_on_sphere(&detailed, 1.2));
    }

    #[test]
    fn tetrahedron_and_cube_edges() {
        let tetra = Geometry::tetrahedron(0.3);
        assert_eq!(tetra.edges().len(), 6);
        assert!(all_on_sphere(&tetra, 0.3));

        let cube = Geometry::cube(2.0);
        // 12 box edges plus one diagonal per face
        assert_eq!(cube.edges().len(), 18);
        assert!(cube.positions.iter().all(|p| p.abs().max_element() == 1.0));
    }

    #[test]
    fn torus_stays_within_radii() {
        let torus = Geometry::torus(1.0, 0.2, 8, 20);
        assert_eq!(torus.positions.len(), 9 * 21);
        assert_eq!(torus.triangles.len(), 2 * 8 * 20);
        assert!(indices_in_range(&torus));
        for p in &torus.positions {
            let ring = (p.x * p.x + p.y * p.y).sqrt();
            assert!(ring >= 0.8 - 1e-4 && ring <= 1.2 + 1e-4);
            assert!(p.z.abs() <= 0.2 + 1e-4);
        }
    }

    #[test]
    fn sphere_skips_pole_slivers() {
        let sphere = Geometry::sphere(0.5, 16, 16);
        assert!(indices_in_range(&sphere));
        assert!(all_on_sphere(&sphere, 0.5));
        // two triangles per quad, minus one per quad on each pole row
        assert_eq!(sphere.triangles.len(), 16 * 16 * 2 - 2 * 16);
    }

    #[test]
    fn transform_matrix_applies_scale_then_translation() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: 2.0,
        };
        let p = transform.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
