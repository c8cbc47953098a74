//! Phong-style surface materials

use serde::{Deserialize, Serialize};

use crate::{utils::SerdeVector, Color};

/// Shading parameters attached to every primitive
///
/// `reflectivity + transparency` is expected to stay at or below 1. It is not clamped: the
/// local-illumination weight `1 - reflectivity - transparency` simply goes negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base (diffuse) color
    pub diffuse: Color,
    /// Diffuse albedo coefficient
    pub albedo: f64,
    /// Specular albedo coefficient
    pub specular_albedo: f64,
    /// Phong specular exponent
    pub specular_coefficient: f64,
    /// Weight of the reflected ray, in [0, 1]
    pub reflectivity: f64,
    /// Weight of the refracted ray, in [0, 1]
    pub transparency: f64,
    /// Ratio passed straight to refraction
    pub refraction_index: f64,
}
impl Material {
    pub fn new(
        diffuse: Color,
        albedo: f64,
        specular_albedo: f64,
        specular_coefficient: f64,
        reflectivity: f64,
        transparency: f64,
        refraction_index: f64,
    ) -> Self {
        Self {
            diffuse,
            albedo,
            specular_albedo,
            specular_coefficient,
            reflectivity,
            transparency,
            refraction_index,
        }
    }

    /// Purely diffuse, no specular highlight and no secondary rays
    pub fn matte(diffuse: Color) -> Self {
        Self::new(diffuse, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0)
    }

    pub fn mirror(reflectivity: f64) -> Self {
        Self::new(Color::new(1.0, 1.0, 1.0), 0.0, 1.0, 1425.0, reflectivity, 0.0, 1.0)
    }

    pub fn glass(transparency: f64, refraction_index: f64) -> Self {
        Self::new(
            Color::new(1.0, 1.0, 1.0),
            0.0,
            1.0,
            125.0,
            0.1,
            transparency,
            refraction_index,
        )
    }

    /// Weight given to the local diffuse + specular terms
    pub fn local_weight(&self) -> f64 {
        1.0 - self.reflectivity - self.transparency
    }

    /// Every way this material falls outside the intended parameter ranges
    ///
    /// An empty list means the material is physically plausible. Callers decide whether a
    /// problem is fatal; the tracer shades whatever it is given.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [
            ("albedo", self.albedo),
            ("specular_albedo", self.specular_albedo),
            ("specular_coefficient", self.specular_coefficient),
        ] {
            if value < 0.0 {
                problems.push(format!("{name} is negative ({value})"));
            }
        }
        if !(0.0..=1.0).contains(&self.reflectivity) {
            problems.push(format!("reflectivity {} outside [0, 1]", self.reflectivity));
        }
        if !(0.0..=1.0).contains(&self.transparency) {
            problems.push(format!("transparency {} outside [0, 1]", self.transparency));
        }
        if self.local_weight() < 0.0 {
            problems.push(format!(
                "reflectivity + transparency = {} exceeds 1",
                self.reflectivity + self.transparency
            ));
        }
        problems
    }
}
impl Default for Material {
    fn default() -> Self {
        Self::matte(Color::new(1.0, 1.0, 1.0))
    }
}

/// Config for materials
///
/// Colors may be written as bytes (`[255, 0, 0]`) or as linear floats (`[1.0, 0.0, 0.0]`).
/// Without a `color_scale`, any channel above 1 marks the whole color as bytes, so a dark
/// byte color such as `[1, 1, 1]` reads as white. Set `color_scale: 255` to force bytes or
/// `color_scale: 1` to force floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: SerdeVector,
    /// Divisor applied to `color`
    pub color_scale: Option<f64>,
    pub albedo: f64,
    pub specular_albedo: f64,
    pub specular_coefficient: f64,
    pub reflectivity: f64,
    pub transparency: f64,
    pub refraction_index: f64,
}
impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: SerdeVector([1.0, 1.0, 1.0]),
            color_scale: None,
            albedo: 1.0,
            specular_albedo: 0.0,
            specular_coefficient: 9.0,
            reflectivity: 0.0,
            transparency: 0.0,
            refraction_index: 1.0,
        }
    }
}
impl From<MaterialConfig> for Material {
    fn from(config: MaterialConfig) -> Self {
        let raw: Color = config.color.into();
        let diffuse = match config.color_scale {
            Some(scale) => raw / scale,
            None if raw.iter().any(|c| *c > 1.0) => raw / 255.0,
            None => raw,
        };
        Material::new(
            diffuse,
            config.albedo,
            config.specular_albedo,
            config.specular_coefficient,
            config.reflectivity,
            config.transparency,
            config.refraction_index,
        )
    }
}
