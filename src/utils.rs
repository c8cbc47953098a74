//! Utils

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::{Color, Vec3};

/// Three-component vector as it appears in scene files: `[x, y, z]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerdeVector(pub [f64; 3]);
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.0[0], v.0[1], v.0[2])
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self([v[0], v[1], v[2]])
    }
}

/// Mirror `incident` about `normal`
///
/// `normal` must be unit length.
pub fn reflect(incident: &Vec3, normal: &Vec3) -> Vec3 {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Bend `incident` through a surface with the given ratio of indices of refraction
///
/// Returns the zero vector on total internal reflection. `eta` is used as given, with no
/// inside/outside flip.
pub fn refract(incident: &Vec3, normal: &Vec3, eta: f64) -> Vec3 {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta.powi(2) * (1.0 - cos_i.powi(2));
    if k < 0.0 {
        Vec3::zeros()
    } else {
        incident * eta - normal * (eta * cos_i + k.sqrt())
    }
}

/// Quantize a linear color to 8 bits per channel
///
/// This is where out-of-range channels are clamped; nothing upstream does it.
pub fn get_pixel(color: &Color) -> Rgb<u8> {
    Rgb([
        scale_color(color[0]),
        scale_color(color[1]),
        scale_color(color[2]),
    ])
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    if val.is_nan() {
        return 0;
    }
    (255.0 * val.clamp(0.0, 1.0)).round() as u8
}

/// Convert an 8-bit color into the linear range used by the tracer
pub fn color_from_bytes(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f64, g as f64, b as f64) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflect_flips_normal_component() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(&incident, &Vec3::y());
        assert_relative_eq!(reflected, Vec3::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn refract_with_unit_eta_passes_straight_through() {
        let incident = Vec3::new(0.3, -1.0, 0.2).normalize();
        let refracted = refract(&incident, &Vec3::y(), 1.0);
        assert_relative_eq!(refracted, incident, epsilon = 1e-12);
    }

    #[test]
    fn refract_total_internal_reflection_is_zero() {
        let grazing = Vec3::new(1.0, -0.05, 0.0).normalize();
        assert_eq!(refract(&grazing, &Vec3::y(), 1.5), Vec3::zeros());
    }

    #[test]
    fn get_pixel_clamps_out_of_range_channels() {
        let px = get_pixel(&Color::new(-0.5, 0.5, 3.0));
        assert_eq!(px, Rgb([0, 128, 255]));
    }

    #[test]
    fn get_pixel_maps_nan_to_black() {
        assert_eq!(get_pixel(&Color::new(f64::NAN, 1.0, 0.0)), Rgb([0, 255, 0]));
    }
}
