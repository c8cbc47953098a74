//! Objects
use serde::{Deserialize, Serialize};

use crate::{
    materials::{Material, MaterialConfig},
    utils::SerdeVector,
    Point, Ray, Vec3,
};

/// Hits closer than this to the ray origin are ignored so rays never re-hit their own origin
pub const EPSILON: f64 = 1e-6;

/// Represents a hit
///
/// Only lives for the duration of one query.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Distance along the ray
    pub dist: f64,
    /// Point of intersection
    pub point: Point,
    /// Outward unit normal
    pub normal: Vec3,
    /// Material of the primitive that was hit
    pub material: &'a Material,
}

/// The closed set of shapes a scene can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Cube(Cube),
}
impl Primitive {
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray),
            Primitive::Cube(c) => c.intersect(ray),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Primitive::Sphere(s) => &s.material,
            Primitive::Cube(c) => &c.material,
        }
    }

    pub fn from_config(config: PrimitiveConfig) -> Self {
        match config {
            PrimitiveConfig::Sphere(c) => Primitive::Sphere(Sphere::from_config(c)),
            PrimitiveConfig::Cube(c) => Primitive::Cube(Cube::from_config(c)),
        }
    }
}
impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}
impl From<Cube> for Primitive {
    fn from(c: Cube) -> Self {
        Primitive::Cube(c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn from_config(config: SphereConfig) -> Self {
        Self::new(config.center.into(), config.radius, config.material.into())
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        // ray.dir is unit length, so the quadratic's `a` term is 1
        let oc = ray.orig - self.center;
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - c;
        if discriminant < 0.0 {
            return None;
        }

        // Find the nearest root past the origin
        let sqrtd = discriminant.sqrt();
        let mut root = -half_b - sqrtd;
        if root <= EPSILON {
            root = -half_b + sqrtd;
            if root <= EPSILON {
                return None;
            }
        }
        let point = ray.get(root);
        Some(Intersection {
            dist: root,
            point,
            normal: (point - self.center).normalize(),
            material: &self.material,
        })
    }
}

/// Axis-aligned cube
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub center: Point,
    pub half_extent: f64,
    pub material: Material,
}
impl Cube {
    pub fn new(center: Point, half_extent: f64, material: Material) -> Self {
        Self {
            center,
            half_extent,
            material,
        }
    }

    pub fn from_config(config: CubeConfig) -> Self {
        Self::new(config.center.into(), config.half_extent, config.material.into())
    }

    pub fn min(&self) -> Point {
        self.center.add_scalar(-self.half_extent)
    }

    pub fn max(&self) -> Point {
        self.center.add_scalar(self.half_extent)
    }

    /// Slab test
    ///
    /// The normal belongs to whichever slab set the near distance; on ties the earlier axis
    /// (x, then y, then z) wins. A ray starting inside the cube has a negative near distance
    /// and misses.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let (min, max) = (self.min(), self.max());
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        let mut near_axis = None;

        for a in 0..3 {
            if ray.dir[a] == 0.0 {
                // Parallel to this slab: either always inside it or never
                if ray.orig[a] < min[a] || ray.orig[a] > max[a] {
                    return None;
                }
                continue;
            }
            let inv_d = 1.0 / ray.dir[a];
            let mut t0 = (min[a] - ray.orig[a]) * inv_d;
            let mut t1 = (max[a] - ray.orig[a]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = Some(a);
            }
            t_far = t_far.min(t1);
        }

        let axis = near_axis?;
        if t_near > t_far || t_near <= EPSILON {
            return None;
        }

        let mut normal = Vec3::zeros();
        normal[axis] = -ray.dir[axis].signum();
        Some(Intersection {
            dist: t_near,
            point: ray.get(t_near),
            normal,
            material: &self.material,
        })
    }
}

/// An ordered, append-only collection of primitives
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Primitive>,
}
impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(object.into())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// Nearest hit over every primitive, with the index of the primitive that produced it
    ///
    /// Always scans the whole list.
    pub fn closest_hit(&self, ray: &Ray) -> Option<(usize, Intersection<'_>)> {
        let mut closest: Option<(usize, Intersection<'_>)> = None;
        for (index, obj) in self.objects.iter().enumerate() {
            if let Some(hit) = obj.intersect(ray) {
                if closest.map_or(true, |(_, c)| hit.dist < c.dist) {
                    closest = Some((index, hit));
                }
            }
        }
        closest
    }
}
impl FromIterator<Primitive> for Scene {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

/// Primitive config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveConfig {
    Sphere(SphereConfig),
    Cube(CubeConfig),
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    #[serde(default)]
    pub material: MaterialConfig,
}

/// Cube config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeConfig {
    pub center: SerdeVector,
    pub half_extent: f64,
    #[serde(default)]
    pub material: MaterialConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sphere() -> Sphere {
        Sphere::new(Point::zeros(), 1.0, Material::default())
    }

    #[test]
    fn sphere_hit_toward_center() {
        let sphere = unit_sphere();
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&ray).expect("ray aimed at the center must hit");
        assert_relative_eq!(hit.dist, 4.0, epsilon = 1e-9);
        assert_relative_eq!(hit.normal.dot(&ray.dir).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point, Point::new(0.0, 0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn sphere_hit_from_off_axis_origin() {
        let sphere = Sphere::new(Point::new(1.0, 2.0, 3.0), 0.5, Material::default());
        let orig = Point::new(4.0, 6.0, 3.0);
        let dir = (sphere.center - orig).normalize();
        let hit = sphere.intersect(&Ray::new(orig, dir)).unwrap();
        assert_relative_eq!(hit.dist, 5.0 - 0.5, epsilon = 1e-9);
    }

    #[test]
    fn sphere_miss() {
        let ray = Ray::new(Point::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn sphere_from_inside_returns_far_root() {
        let ray = Ray::new(Point::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let sphere = unit_sphere();
        let hit = sphere.intersect(&ray).unwrap();
        assert_relative_eq!(hit.dist, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn sphere_does_not_rehit_its_surface_origin() {
        // Leaving the surface outward: both roots are at or behind the origin
        let ray = Ray::new(Point::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn cube_face_normals() {
        let cube = Cube::new(Point::zeros(), 1.0, Material::default());
        let cases = [
            (Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            (Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
            (Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
            (Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0)),
        ];
        for (orig, face) in cases {
            let ray = Ray::new(orig, -orig.normalize());
            let hit = cube.intersect(&ray).expect("ray at face center must hit");
            assert_eq!(hit.normal, face, "from {orig:?}");
            assert_relative_eq!(hit.dist, 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cube_miss_beside() {
        let cube = Cube::new(Point::zeros(), 1.0, Material::default());
        let ray = Ray::new(Point::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(cube.intersect(&ray).is_none());
    }

    #[test]
    fn cube_from_inside_misses() {
        let cube = Cube::new(Point::zeros(), 1.0, Material::default());
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(cube.intersect(&ray).is_none());
    }

    #[test]
    fn cube_edge_tie_prefers_x() {
        let cube = Cube::new(Point::zeros(), 1.0, Material::default());
        // Aimed exactly at the +x/+y edge: both slabs enter at the same distance
        let orig = Point::new(3.0, 3.0, 0.0);
        let dir = (Point::new(1.0, 1.0, 0.0) - orig).normalize();
        let hit = cube.intersect(&Ray::new(orig, dir)).unwrap();
        assert_eq!(hit.normal, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn scene_closest_hit_picks_nearest_regardless_of_order() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(Point::new(0.0, 0.0, -10.0), 1.0, Material::default()));
        scene.add(Cube::new(Point::new(0.0, 0.0, -3.0), 0.5, Material::default()));
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (index, hit) = scene.closest_hit(&ray).unwrap();
        assert_eq!(index, 1);
        assert_relative_eq!(hit.dist, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn primitive_config_is_tagged() {
        let yaml = "type: cube\ncenter: [0.0, 1.0, 0.0]\nhalf_extent: 0.1\n";
        let config: PrimitiveConfig = serde_yaml::from_str(yaml).unwrap();
        match Primitive::from_config(config) {
            Primitive::Cube(c) => {
                assert_eq!(c.center, Point::new(0.0, 1.0, 0.0));
                assert_eq!(c.half_extent, 0.1);
            }
            other => panic!("expected cube, got {other:?}"),
        }
    }
}
