use std::path::PathBuf;

use glam::Vec3;

/// Surface description read from a `.mtl` library.
///
/// The diffuse texture itself is not stored here; the scene's texture cache creates it on first
/// use, keyed by [`Material::diffuse_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Diffuse texture, already resolved against the material library's directory
    pub diffuse_map: Option<PathBuf>,
}

impl Material {
    pub const DEFAULT_SHININESS: f32 = 32.0;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            shininess: Self::DEFAULT_SHININESS,
            diffuse_map: None,
        }
    }
}
