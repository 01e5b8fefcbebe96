//! Viewer settings: compiled-in defaults, optionally overridden by a `scop.toml` file.

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::assets::obj::SplitPolicy;
use crate::scene::DEFAULT_CLEAR_COLOR;

/// Looked up in the working directory
pub const CONFIG_FILE: &str = "scop.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid configuration in `{path}`: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,

    pub model: PathBuf,
    pub split_policy: SplitPolicy,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// Textures that must load for the viewer to start
    pub textures: Vec<PathBuf>,
    /// Flip images vertically on load, OpenGL samples the bottom row first
    pub flip_textures: bool,
    pub clear_color: [f32; 4],

    /// Number of camera slots, all starting at `camera_position`
    pub camera_count: usize,
    pub camera_position: [f32; 3],
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Scop".into(),
            width: 800,
            height: 600,
            model: "resources/models/cube.obj".into(),
            split_policy: SplitPolicy::default(),
            vertex_shader: "shaders/vertex.glsl".into(),
            fragment_shader: "shaders/fragment.glsl".into(),
            textures: Vec::new(),
            flip_textures: true,
            clear_color: DEFAULT_CLEAR_COLOR,
            camera_count: 2,
            camera_position: [0.0, 0.0, 3.0],
            camera_speed: crate::core::camera::SPEED,
            mouse_sensitivity: crate::core::camera::SENSITIVITY,
        }
    }
}

impl ViewerConfig {
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = toml::from_slice(&data).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        Ok(config)
    }

    /// Parses `path` if it exists, otherwise returns the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        info!("Loading configuration: {}", path.display());
        Self::parse(path)
    }
}
