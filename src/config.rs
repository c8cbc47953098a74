//! YAML scene files
//!
//! Every section is optional; missing values fall back to a camera at `(0, 0, 5)` looking
//! at the origin, a white point light at `(-1, 0, 10)` with intensity 1.5, an 800x600 image
//! with a 60 degree field of view and three levels of recursion.
//!
//! ```yaml
//! render: { width: 400, height: 300 }
//! environment: { type: skybox, path: sky.jpg }
//! objects:
//!   - type: sphere
//!     center: [0.0, 0.0, 0.0]
//!     radius: 1.0
//!     material: { color: [255, 0, 0], specular_albedo: 0.5 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cameras::{Camera, CameraConfig};
use crate::environment::{Environment, EnvironmentConfig};
use crate::error::{Result, SceneError};
use crate::lights::{Light, LightConfig};
use crate::materials::Material;
use crate::objects::{Primitive, PrimitiveConfig, Scene};
use crate::tracer::{ShadowMode, Tracer, MAX_RECURSION};

/// Image size, projection and recursion limit for a render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fov_deg: f64,
    pub max_depth: u32,
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_deg: 60.0,
            max_depth: MAX_RECURSION,
        }
    }
}
impl RenderSettings {
    /// Field of view in radians
    pub fn fov(&self) -> f64 {
        self.fov_deg.to_radians()
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidSettings(format!(
                "image size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(SceneError::InvalidSettings(format!(
                "field of view {} must be between 0 and 180 degrees",
                self.fov_deg
            )));
        }
        Ok(())
    }
}

/// Scene file contents before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub render: RenderSettings,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub environment: EnvironmentConfig,
    pub objects: Vec<PrimitiveConfig>,
    pub shadow_mode: ShadowMode,
    /// Reject materials whose parameters are out of range instead of warning
    pub strict_materials: bool,
}
impl SceneFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("reading scene {}", path.display());
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Read, validate and build a scene; relative asset paths resolve next to the file
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedScene> {
        let path = path.as_ref();
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_path(path)?.build(base_dir)
    }

    pub fn build(self, base_dir: &Path) -> Result<LoadedScene> {
        self.render.validate()?;

        let camera = Camera::from_config(self.camera);
        validate_camera(&camera)?;

        let mut scene = Scene::new();
        for (index, config) in self.objects.into_iter().enumerate() {
            let object = Primitive::from_config(config);
            validate_primitive(index, &object, self.strict_materials)?;
            scene.add(object);
        }

        let environment = self.environment.build(base_dir)?;
        log::info!("built scene with {} primitives", scene.len());

        Ok(LoadedScene {
            settings: self.render,
            camera,
            light: self.light.into(),
            environment,
            scene,
            shadow_mode: self.shadow_mode,
        })
    }
}

fn validate_camera(camera: &Camera) -> Result<()> {
    let view = camera.target - camera.position;
    if view.norm() < f64::EPSILON {
        return Err(SceneError::InvalidCamera(
            "position and target coincide".to_string(),
        ));
    }
    if view.normalize().cross(&camera.up).norm() < 1e-9 {
        return Err(SceneError::InvalidCamera(
            "up vector is parallel to the view direction".to_string(),
        ));
    }
    Ok(())
}

fn validate_primitive(index: usize, object: &Primitive, strict: bool) -> Result<()> {
    let size = match object {
        Primitive::Sphere(s) => ("radius", s.radius),
        Primitive::Cube(c) => ("half_extent", c.half_extent),
    };
    if !(size.1 > 0.0) {
        return Err(SceneError::InvalidObject {
            index,
            reason: format!("{} must be positive, got {}", size.0, size.1),
        });
    }

    let problems = Material::validate(object.material());
    if !problems.is_empty() {
        if strict {
            return Err(SceneError::InvalidMaterial { index, problems });
        }
        log::warn!("object {index}: {}", problems.join(", "));
    }
    Ok(())
}

/// A validated scene ready to render
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub settings: RenderSettings,
    pub camera: Camera,
    pub light: Light,
    pub environment: Environment,
    pub scene: Scene,
    pub shadow_mode: ShadowMode,
}
impl LoadedScene {
    /// Render-pass context over this scene
    pub fn tracer(&self) -> Tracer<'_> {
        Tracer::new(&self.scene, &self.light, &self.environment)
            .with_max_depth(self.settings.max_depth)
            .with_shadow_mode(self.shadow_mode)
    }
}
