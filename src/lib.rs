//! Whitted-style Ray Tracing Library

use nalgebra::Vector3;

pub mod cameras;
pub mod config;
pub mod environment;
pub mod error;
pub mod lights;
pub mod materials;
pub mod objects;
pub mod render;
pub mod tracer;
pub mod utils;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;

/// Prelude
pub mod prelude {
    pub use crate::cameras::{Camera, CameraBasis};
    pub use crate::config::{RenderSettings, SceneFile};
    pub use crate::environment::{Environment, Skybox};
    pub use crate::lights::Light;
    pub use crate::materials::Material;
    pub use crate::objects::{Cube, Intersection, Primitive, Scene, Sphere};
    pub use crate::render::{render_frame, ImageBuffer, PixelSink};
    pub use crate::tracer::{ShadowMode, Tracer, BIAS, MAX_RECURSION};
    pub use crate::{Color, Point, Ray, Vec3};
}

/// The ray in ray tracing
///
/// `dir` is expected to be unit length; intersection routines do not renormalize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}
