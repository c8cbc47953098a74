//! What a ray sees when it leaves the scene

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SkyboxError;
use crate::utils::{color_from_bytes, SerdeVector};
use crate::{Color, Vec3};

/// Background lookup used for misses and for rays cut off at the recursion limit
#[derive(Debug, Clone)]
pub enum Environment {
    /// Equirectangular image
    Skybox(Skybox),
    /// Linear blend from `horizon` (straight down) to `zenith` (straight up)
    Gradient { horizon: Color, zenith: Color },
    Solid(Color),
}
impl Environment {
    /// Background color in `direction`, which should be unit length
    pub fn sample(&self, direction: &Vec3) -> Color {
        match self {
            Environment::Skybox(skybox) => skybox.sample(direction),
            Environment::Gradient { horizon, zenith } => {
                let t = 0.5 * (direction[1].clamp(-1.0, 1.0) + 1.0);
                horizon * (1.0 - t) + zenith * t
            }
            Environment::Solid(color) => *color,
        }
    }
}
impl Default for Environment {
    fn default() -> Self {
        Environment::Gradient {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

/// Image-backed environment
#[derive(Debug, Clone)]
pub struct Skybox {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}
impl Skybox {
    /// Decode an image file (any format the `image` crate reads)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkyboxError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| SkyboxError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| color_from_bytes(p[0], p[1], p[2]))
            .collect();
        log::info!("loaded skybox {} ({width}x{height})", path.display());
        Self::from_pixels(width, height, pixels)
    }

    /// Row-major pixels, row 0 at the top
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, SkyboxError> {
        if width == 0 || height == 0 {
            return Err(SkyboxError::Empty);
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SkyboxError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map a direction to texture coordinates in `[0, 1]`
    ///
    /// `u` wraps around the vertical axis, `v` runs from straight up (0) to straight
    /// down (1).
    pub fn direction_to_uv(direction: &Vec3) -> (f64, f64) {
        let u = 0.5 + direction[2].atan2(direction[0]) / (2.0 * PI);
        let v = 0.5 - direction[1].clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }

    /// Nearest-pixel lookup
    pub fn sample(&self, direction: &Vec3) -> Color {
        let (u, v) = Self::direction_to_uv(direction);
        if !u.is_finite() || !v.is_finite() {
            return self.pixels[0];
        }
        let x = ((u * self.width as f64).floor() as i64).rem_euclid(self.width as i64) as usize;
        let y = ((v * self.height as f64).floor() as i64).clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

/// Environment config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvironmentConfig {
    Skybox { path: String },
    Gradient { horizon: SerdeVector, zenith: SerdeVector },
    Solid { color: SerdeVector },
}
impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::Gradient {
            horizon: SerdeVector([1.0, 1.0, 1.0]),
            zenith: SerdeVector([0.5, 0.7, 1.0]),
        }
    }
}
impl EnvironmentConfig {
    /// Build the environment, resolving a relative skybox path against `base_dir`
    pub fn build(&self, base_dir: &Path) -> Result<Environment, SkyboxError> {
        Ok(match self {
            EnvironmentConfig::Skybox { path } => {
                Environment::Skybox(Skybox::load(base_dir.join(path))?)
            }
            EnvironmentConfig::Gradient { horizon, zenith } => Environment::Gradient {
                horizon: (*horizon).into(),
                zenith: (*zenith).into(),
            },
            EnvironmentConfig::Solid { color } => Environment::Solid((*color).into()),
        })
    }
}
