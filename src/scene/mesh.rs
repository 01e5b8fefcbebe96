use std::rc::Rc;

use glam::Mat4;

use crate::format::Vertex;
use crate::graphics::{GraphicsError, GraphicsResult, MeshBuffers, RenderDevice};

use super::material::Material;

/// GPU buffers for one submesh together with its model transform and material.
///
/// The vertex pool may be shared with the other submeshes of the same object; the index list
/// is uploaded once and not kept on the CPU side.
pub struct Mesh {
    device: Rc<dyn RenderDevice>,
    buffers: Option<MeshBuffers>,
    vertices: Rc<[Vertex]>,
    index_count: u32,
    model_matrix: Mat4,
    material: Material,
}

impl Mesh {
    pub fn new(
        device: Rc<dyn RenderDevice>,
        vertices: Rc<[Vertex]>,
        indices: &[u32],
        material: Material,
    ) -> GraphicsResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(GraphicsError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(GraphicsError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }

        let buffers = device.create_mesh_buffers(&vertices, indices)?;

        Ok(Self {
            device,
            buffers: Some(buffers),
            vertices,
            index_count: indices.len() as u32,
            model_matrix: Mat4::IDENTITY,
            material,
        })
    }

    /// Issues one indexed draw with whatever program and uniforms are currently bound
    pub fn draw(&self) {
        if let Some(buffers) = &self.buffers {
            self.device.draw_indexed(buffers, self.index_count);
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.model_matrix = model_matrix;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn vertices(&self) -> &Rc<[Vertex]> {
        &self.vertices
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_released(&self) -> bool {
        self.buffers.is_none()
    }

    /// Frees the GPU buffers; drawing afterwards does nothing
    pub fn release(&mut self) {
        if let Some(buffers) = self.buffers.take() {
            self.device.destroy_mesh_buffers(buffers);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        self.release();
    }
}
