//! The narrow set of GPU operations the scene needs.
//!
//! Everything above this module talks to a [`RenderDevice`] trait object, so meshes, shaders
//! and textures can be created against the OpenGL backend at runtime and against a recording
//! device in tests.

pub mod error;
pub mod gl;
pub mod shader;
pub mod texture;

#[cfg(test)]
pub(crate) mod testing;

use std::num::NonZeroU32;

use glam::{Mat4, Vec3};

use crate::assets::image::DecodedImage;
use crate::format::Vertex;

pub use self::error::{GraphicsError, GraphicsResult};

/// Opaque name of a GPU object (buffer, vertex array, program or texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuHandle(NonZeroU32);

impl GpuHandle {
    pub fn new(raw: NonZeroU32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> NonZeroU32 {
        self.0
    }
}

/// The buffers backing one indexed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    pub vertex_array: GpuHandle,
    pub vertex_buffer: GpuHandle,
    pub index_buffer: GpuHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A value uploaded to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Maps a decoded channel count to a pixel format; only 1, 3 and 4 channels are supported
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::Red),
            3 => Some(PixelFormat::Rgb),
            4 => Some(PixelFormat::Rgba),
            _ => None,
        }
    }
}

/// Immediate-mode GPU operations.
///
/// Release functions are only ever called once per handle; the owning wrappers
/// ([`crate::scene::mesh::Mesh`], [`shader::Shader`], [`texture::Texture`]) guarantee that.
pub trait RenderDevice {
    /// Clears color and depth and enables depth testing
    fn begin_frame(&self, clear_color: [f32; 4]);
    fn set_viewport(&self, width: u32, height: u32);

    fn create_mesh_buffers(&self, vertices: &[Vertex], indices: &[u32])
        -> GraphicsResult<MeshBuffers>;
    fn destroy_mesh_buffers(&self, buffers: MeshBuffers);
    /// Draws `index_count` indices as a triangle list with whatever program is bound
    fn draw_indexed(&self, buffers: &MeshBuffers, index_count: u32);

    fn create_program(&self, sources: &[(ShaderStage, &str)]) -> GraphicsResult<GpuHandle>;
    fn destroy_program(&self, program: GpuHandle);
    fn use_program(&self, program: GpuHandle);
    /// Uploads a uniform by name; names the program does not declare are ignored
    fn set_uniform(&self, program: GpuHandle, name: &str, value: Uniform);

    fn create_texture(&self, image: &DecodedImage) -> GraphicsResult<GpuHandle>;
    fn bind_texture(&self, texture: GpuHandle, unit: u32);
    fn destroy_texture(&self, texture: GpuHandle);
}
