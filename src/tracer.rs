//! Recursive Whitted-style ray tracer
//!
//! A [`Tracer`] borrows everything a render pass reads: the scene, the light and the
//! environment. Nothing it borrows is mutated while rays are in flight.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::lights::Light;
use crate::objects::Scene;
use crate::utils::{reflect, refract};
use crate::{Color, Point, Ray, Vec3};

/// Default recursion limit for secondary rays
pub const MAX_RECURSION: u32 = 3;
/// Offset along the normal applied to secondary ray origins
pub const BIAS: f64 = 1e-4;

/// How occluders between a surface point and the light are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMode {
    /// Use the first occluder in scene order, even if a nearer one comes later
    #[default]
    FirstHit,
    /// Use the occluder closest to the shaded point
    NearestHit,
}

/// Ray counts for one or more render passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub primary_rays: u64,
    pub secondary_rays: u64,
    pub shadow_rays: u64,
}

/// Render-pass context
pub struct Tracer<'a> {
    scene: &'a Scene,
    light: &'a Light,
    environment: &'a Environment,
    max_depth: u32,
    shadow_mode: ShadowMode,
    stats: Cell<TraceStats>,
}
impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, light: &'a Light, environment: &'a Environment) -> Self {
        Self {
            scene,
            light,
            environment,
            max_depth: MAX_RECURSION,
            shadow_mode: ShadowMode::default(),
            stats: Cell::new(TraceStats::default()),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_shadow_mode(mut self, shadow_mode: ShadowMode) -> Self {
        self.shadow_mode = shadow_mode;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn stats(&self) -> TraceStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(TraceStats::default());
    }

    fn record(&self, f: impl FnOnce(&mut TraceStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    /// Trace a primary ray
    pub fn trace(&self, ray: &Ray) -> Color {
        self.cast_ray(&ray.orig, &ray.dir, 0)
    }

    /// Color seen along `direction` from `origin`, `depth` bounces below the primary ray
    ///
    /// Misses and rays at the depth limit both return the environment color. The result is
    /// not clamped and may leave `[0, 1]`.
    pub fn cast_ray(&self, origin: &Point, direction: &Vec3, depth: u32) -> Color {
        self.record(|s| {
            if depth == 0 {
                s.primary_rays += 1
            } else {
                s.secondary_rays += 1
            }
        });

        let ray = Ray::new(*origin, *direction);
        let Some((index, hit)) = self.scene.closest_hit(&ray) else {
            return self.environment.sample(direction);
        };
        if depth >= self.max_depth {
            return self.environment.sample(direction);
        }

        let mat = hit.material;
        let light_dir = (self.light.position - hit.point).normalize();
        let view_dir = (origin - hit.point).normalize();
        let light_reflect = reflect(&-light_dir, &hit.normal);

        // The shadow ray starts on the surface itself; only secondary rays are biased
        let shadow = self.shadow_factor(&hit.point, &light_dir, Some(index));

        let diffuse_intensity = hit.normal.dot(&light_dir).max(0.0);
        let specular_intensity = view_dir
            .dot(&light_reflect)
            .max(0.0)
            .powf(mat.specular_coefficient);

        let diffuse =
            mat.diffuse * self.light.intensity * diffuse_intensity * mat.albedo * shadow;
        let specular = self.light.color
            * self.light.intensity
            * specular_intensity
            * mat.specular_albedo
            * shadow;

        let reflected = if mat.reflectivity > 0.0 {
            let bounce = reflect(direction, &hit.normal);
            self.cast_ray(&(hit.point + hit.normal * BIAS), &bounce, depth + 1)
        } else {
            Color::zeros()
        };

        let refracted = if mat.transparency > 0.0 {
            let bend = refract(direction, &hit.normal, mat.refraction_index);
            let (start, bend) = if bend == Vec3::zeros() {
                // Total internal reflection: leave from the outer side like a reflected ray
                (
                    hit.point + hit.normal * BIAS,
                    reflect(direction, &hit.normal),
                )
            } else {
                (hit.point - hit.normal * BIAS, bend)
            };
            self.cast_ray(&start, &bend, depth + 1)
        } else {
            Color::zeros()
        };

        (diffuse + specular) * mat.local_weight()
            + reflected * mat.reflectivity
            + refracted * mat.transparency
    }

    /// Fraction of the light reaching `shadow_origin`, in `[0, 1]`
    ///
    /// The primitive at `excluded` (the one being shaded) is skipped. An occluder at
    /// distance `d` along `light_dir` lets through `1 - min(1, d / distance_to_light)`, so
    /// occluders near the surface block little and occluders near the light block a lot.
    /// Occluders beyond the light still count and block fully.
    pub fn shadow_factor(
        &self,
        shadow_origin: &Point,
        light_dir: &Vec3,
        excluded: Option<usize>,
    ) -> f64 {
        self.record(|s| s.shadow_rays += 1);

        let ray = Ray::new(*shadow_origin, *light_dir);
        let mut candidates = self
            .scene
            .objects()
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluded)
            .filter_map(|(_, obj)| obj.intersect(&ray))
            .map(|hit| hit.dist)
            .filter(|dist| *dist > 0.0);

        let occluder = match self.shadow_mode {
            ShadowMode::FirstHit => candidates.next(),
            ShadowMode::NearestHit => candidates.min_by(|a, b| a.total_cmp(b)),
        };

        match occluder {
            Some(dist) => {
                let light_distance = (self.light.position - shadow_origin).norm();
                1.0 - (dist / light_distance).min(1.0)
            }
            None => 1.0,
        }
    }
}
