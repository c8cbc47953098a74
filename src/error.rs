//! Error types for loading scenes and environment assets.
//!
//! Tracing itself never fails; everything here happens before the first ray is cast.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a skybox image.
#[derive(Error, Debug)]
pub enum SkyboxError {
    #[error("failed to read skybox {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("skybox image is empty")]
    Empty,

    #[error("skybox pixel buffer has {actual} pixels, expected {expected}")]
    PixelCount { expected: usize, actual: usize },
}

/// Errors that can occur while loading or validating a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Skybox(#[from] SkyboxError),

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("object {index}: invalid material: {}", .problems.join(", "))]
    InvalidMaterial { index: usize, problems: Vec<String> },
}

/// Result type for scene loading.
pub type Result<T> = std::result::Result<T, SceneError>;
