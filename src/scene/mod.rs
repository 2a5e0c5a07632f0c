//! Decorative 3D scenes rendered behind the page content.

pub mod background;
pub mod camera;
pub mod hero;
pub mod mesh;

pub use background::{FloatingObject, FloatingScene};
pub use camera::Camera;
pub use hero::{HeroScene, Orbiter};
pub use mesh::{Geometry, Material, Mesh, MeshId, Transform};
