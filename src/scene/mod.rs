pub mod material;
pub mod mesh;
pub mod texture_cache;

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::core::camera::Camera;
use crate::graphics::shader::Shader;
use crate::graphics::texture::Texture;
use crate::graphics::RenderDevice;

use self::mesh::Mesh;
use self::texture_cache::TextureCache;

/// Texture unit the diffuse map is bound to
pub const DIFFUSE_UNIT: u32 = 0;

pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.4, 1.0];

/// Everything that gets drawn, and the cameras to draw it with.
///
/// All collections keep insertion order. The first shader is used for every mesh.
pub struct Scene {
    device: Rc<dyn RenderDevice>,
    meshes: Vec<Rc<RefCell<Mesh>>>,
    textures: Vec<Rc<Texture>>,
    shaders: Vec<Rc<Shader>>,
    cameras: Vec<Rc<RefCell<Camera>>>,
    /// Always a valid index while `cameras` is not empty
    active_camera: Option<usize>,
    texture_cache: TextureCache,
    clear_color: [f32; 4],
    flip_textures: bool,
}

impl Scene {
    pub fn new(device: Rc<dyn RenderDevice>) -> Self {
        Self {
            device,
            meshes: Vec::new(),
            textures: Vec::new(),
            shaders: Vec::new(),
            cameras: Vec::new(),
            active_camera: None,
            texture_cache: TextureCache::new(),
            clear_color: DEFAULT_CLEAR_COLOR,
            flip_textures: true,
        }
    }

    pub fn device(&self) -> &Rc<dyn RenderDevice> {
        &self.device
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> Rc<RefCell<Mesh>> {
        let mesh = Rc::new(RefCell::new(mesh));
        self.meshes.push(mesh.clone());
        mesh
    }

    /// Adds a texture; textures loaded from a file also serve materials referencing that file
    pub fn add_texture(&mut self, texture: Texture) -> Rc<Texture> {
        let texture = Rc::new(texture);
        if let Some(path) = texture.path() {
            self.texture_cache.insert(path.to_owned(), texture.clone());
        }
        self.textures.push(texture.clone());
        texture
    }

    pub fn add_shader(&mut self, shader: Shader) -> Rc<Shader> {
        let shader = Rc::new(shader);
        self.shaders.push(shader.clone());
        shader
    }

    /// Adds a camera; the first camera added becomes the active one
    pub fn add_camera(&mut self, camera: Camera) -> Rc<RefCell<Camera>> {
        let camera = Rc::new(RefCell::new(camera));
        self.cameras.push(camera.clone());
        if self.active_camera.is_none() {
            self.active_camera = Some(0);
        }
        camera
    }

    pub fn meshes(&self) -> &[Rc<RefCell<Mesh>>] {
        &self.meshes
    }

    pub fn textures(&self) -> &[Rc<Texture>] {
        &self.textures
    }

    pub fn shaders(&self) -> &[Rc<Shader>] {
        &self.shaders
    }

    pub fn cameras(&self) -> &[Rc<RefCell<Camera>>] {
        &self.cameras
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.texture_cache
    }

    /// Selects camera `index`; out of range indices are ignored
    pub fn set_active_camera(&mut self, index: usize) {
        if index < self.cameras.len() {
            self.active_camera = Some(index);
        } else {
            trace!(
                "No camera {} (have {}), keeping the active one",
                index,
                self.cameras.len()
            );
        }
    }

    pub fn next_camera(&mut self) {
        if let Some(active) = self.active_camera {
            self.active_camera = Some((active + 1) % self.cameras.len());
        }
    }

    pub fn previous_camera(&mut self) {
        if let Some(active) = self.active_camera {
            let count = self.cameras.len();
            self.active_camera = Some((active + count - 1) % count);
        }
    }

    pub fn active_camera(&self) -> Option<Rc<RefCell<Camera>>> {
        self.active_camera.map(|i| self.cameras[i].clone())
    }

    pub fn active_camera_index(&self) -> Option<usize> {
        self.active_camera
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, clear_color: [f32; 4]) {
        self.clear_color = clear_color;
    }

    /// Whether diffuse maps are flipped vertically when first loaded
    pub fn set_flip_textures(&mut self, flip: bool) {
        self.flip_textures = flip;
    }

    /// Clears the frame and draws every mesh with the first shader and the active camera.
    ///
    /// Without a camera or a shader only the clear happens.
    pub fn render(&mut self) {
        self.device.begin_frame(self.clear_color);

        let camera = match self.active_camera() {
            Some(camera) => camera,
            None => return,
        };
        let shader = match self.shaders.first() {
            Some(shader) => shader,
            None => {
                trace!("No shader registered, skipping {} meshes", self.meshes.len());
                return;
            }
        };

        let camera = camera.borrow();
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        for mesh in &self.meshes {
            let mesh = mesh.borrow();
            let material = mesh.material();

            shader.use_program();
            shader.set_mat4("view", view);
            shader.set_mat4("projection", projection);
            shader.set_mat4("model", mesh.model_matrix());
            shader.set_vec3("material.ambient", material.ambient);
            shader.set_vec3("material.diffuse", material.diffuse);
            shader.set_vec3("material.specular", material.specular);
            shader.set_float("material.shininess", material.shininess);
            shader.set_vec3("viewPosition", camera.position());

            let texture = material.diffuse_map.as_deref().and_then(|path| {
                self.texture_cache
                    .get_or_load(&self.device, path, self.flip_textures)
            });
            shader.set_bool("material.hasDiffuseMap", texture.is_some());
            if let Some(texture) = texture {
                texture.bind(DIFFUSE_UNIT);
                shader.set_int("material.diffuseMap", DIFFUSE_UNIT as i32);
            }

            mesh.draw();
        }
    }
}
