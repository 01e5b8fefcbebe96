//! Plain geometry structures produced by the asset parsers and consumed by the GPU meshes.

use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Byte offset of the position attribute (location 0)
    pub const POSITION_OFFSET: i32 = 0;
    /// Byte offset of the normal attribute (location 1)
    pub const NORMAL_OFFSET: i32 = size_of::<[f32; 3]>() as i32;
    /// Byte offset of the texture coordinate attribute (location 2)
    pub const TEX_COORDS_OFFSET: i32 = size_of::<[f32; 6]>() as i32;
    pub const STRIDE: i32 = size_of::<Vertex>() as i32;
}

/// A run of triangles inside an [`Object`] that share one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
    /// Pure triangle list, always a multiple of three
    pub indices: Vec<u32>,
    /// Material that was active (`usemtl`) when the indices were emitted
    pub material_name: Option<String>,
}

impl SubMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One parsed unit of geometry: a deduplicated vertex pool plus the submeshes indexing into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub submeshes: Vec<SubMesh>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(|sm| sm.indices.len()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 32);
        assert_eq!(Vertex::NORMAL_OFFSET, 12);
        assert_eq!(Vertex::TEX_COORDS_OFFSET, 24);

        let vertices = [Vertex::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 64);
    }
}
