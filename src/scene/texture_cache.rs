use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::warn;

use crate::graphics::texture::Texture;
use crate::graphics::RenderDevice;

/// Diffuse textures created on first use, keyed by resolved file path.
///
/// A path that failed to load is remembered as `None` and not retried.
#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<PathBuf, Option<Rc<Texture>>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `path`, decoding and uploading it on the first lookup
    pub fn get_or_load(
        &mut self,
        device: &Rc<dyn RenderDevice>,
        path: &Path,
        flip_vertically: bool,
    ) -> Option<Rc<Texture>> {
        if let Some(entry) = self.entries.get(path) {
            return entry.clone();
        }

        let entry = match Texture::from_file(device.clone(), path, flip_vertically) {
            Ok(texture) => Some(Rc::new(texture)),
            Err(e) => {
                warn!("Texture `{}` unavailable: {}", path.display(), e);
                None
            }
        };
        self.entries.insert(path.to_owned(), entry.clone());
        entry
    }

    /// Registers an already loaded texture for `path`, replacing any earlier entry
    pub fn insert(&mut self, path: PathBuf, texture: Rc<Texture>) {
        self.entries.insert(path, Some(texture));
    }

    /// Looks up `path` without loading it
    pub fn get(&self, path: &Path) -> Option<Rc<Texture>> {
        self.entries.get(path).cloned().flatten()
    }

    /// Whether `path` was looked up before, successfully or not
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
