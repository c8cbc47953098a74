//! Point light

use serde::{Deserialize, Serialize};

use crate::{utils::SerdeVector, Color, Point};

/// The single point light the scene is shaded with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point,
    pub intensity: f64,
    pub color: Color,
}
impl Light {
    pub fn new(position: Point, intensity: f64, color: Color) -> Self {
        Self {
            position,
            intensity,
            color,
        }
    }
}
impl Default for Light {
    fn default() -> Self {
        Self::new(Point::new(-1.0, 0.0, 10.0), 1.5, Color::new(1.0, 1.0, 1.0))
    }
}

/// Light Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: SerdeVector,
    pub intensity: f64,
    pub color: SerdeVector,
}
impl Default for LightConfig {
    fn default() -> Self {
        let light = Light::default();
        Self {
            position: light.position.into(),
            intensity: light.intensity,
            color: light.color.into(),
        }
    }
}
impl From<LightConfig> for Light {
    fn from(config: LightConfig) -> Self {
        Light::new(config.position.into(), config.intensity, config.color.into())
    }
}
