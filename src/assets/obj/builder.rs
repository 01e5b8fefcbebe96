use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use crate::assets::mtl::MaterialMap;
use crate::format::{Object, SubMesh, Vertex};

use super::{ObjError, ObjResult};

/// Decides where one [`Object`] ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitPolicy {
    /// The whole file is one object, split into submeshes on `usemtl`
    #[default]
    Material,
    /// A `v` statement following a face starts a new object
    VertexBlock,
}

/// Which attribute pool a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    TexCoord,
    Normal,
}

/// One corner of a face statement, e.g. `12/4/7`, `5//9` or `-1`.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ObjFaceIndex {
    pub(crate) position: i64,
    pub(crate) tex_coord: Option<i64>,
    pub(crate) normal: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ObjFace {
    pub(crate) face_i: Vec<ObjFaceIndex>,
}

/// Pool indices of one corner, after negative references are resolved
type VertexKey = (usize, Option<usize>, Option<usize>);

/// Accumulates statements into objects while the file is read.
#[derive(Debug, Default)]
pub(crate) struct ObjBuilder {
    policy: SplitPolicy,
    /// Base name for the objects of this file
    stem: String,

    // attribute pools, indexed by the face statements of the whole file
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,

    pub(crate) objects: Vec<Object>,
    pub(crate) materials: MaterialMap,
    curr_object: Object,
    curr_submesh: SubMesh,
    /// Resolved (position, tex coord, normal) -> index into `curr_object.vertices`
    vertex_cache: HashMap<VertexKey, u32>,
    /// Whether the current object has seen a face statement yet
    face_seen: bool,
}

impl ObjBuilder {
    pub(crate) fn new(stem: impl Into<String>, policy: SplitPolicy) -> Self {
        let stem = stem.into();
        Self {
            policy,
            curr_object: Object::new(stem.clone()),
            stem,
            ..Default::default()
        }
    }

    pub(crate) fn push_position(&mut self, position: [f32; 3]) {
        if self.policy == SplitPolicy::VertexBlock && self.face_seen {
            self.start_object();
        }
        self.positions.push(position);
    }

    pub(crate) fn push_tex_coord(&mut self, tex_coord: [f32; 2]) {
        self.tex_coords.push(tex_coord);
    }

    pub(crate) fn push_normal(&mut self, normal: [f32; 3]) {
        self.normals.push(normal);
    }

    pub(crate) fn add_materials(&mut self, materials: MaterialMap) {
        self.materials.extend(materials);
    }

    /// Closes the current submesh (if it has triangles) and tags the next one with `name`
    pub(crate) fn use_material(&mut self, name: &str) {
        self.flush_submesh();
        self.curr_submesh.material_name = Some(name.into());
    }

    /// Resolves the corners of `face` into vertices and emits its triangles as a fan around
    /// the first corner. The fan is only correct for convex, planar polygons.
    pub(crate) fn push_face(&mut self, face: &ObjFace, line: usize) -> ObjResult<()> {
        let mut corners = Vec::with_capacity(face.face_i.len());
        for face_index in &face.face_i {
            // negative references point at different attributes as the pools grow
            let key = self.resolve_key(face_index, line)?;
            let index = match self.vertex_cache.get(&key) {
                Some(&index) => index,
                None => {
                    let vertex = self.vertex(key);
                    let index = self.curr_object.vertices.len() as u32;
                    self.curr_object.vertices.push(vertex);
                    self.vertex_cache.insert(key, index);
                    index
                }
            };
            corners.push(index);
        }
        self.face_seen = true;

        if corners.len() < 3 {
            warn!(
                "Face on line {} has {} corner(s), no triangle emitted",
                line,
                corners.len()
            );
            return Ok(());
        }

        for i in 1..corners.len() - 1 {
            self.curr_submesh
                .indices
                .extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
        }

        Ok(())
    }

    /// Flushes what is still open and returns the finished objects
    pub(crate) fn finish(mut self) -> (Vec<Object>, MaterialMap) {
        self.flush_object();
        (self.objects, self.materials)
    }

    fn resolve_key(&self, face_index: &ObjFaceIndex, line: usize) -> ObjResult<VertexKey> {
        let position = resolve_index(
            face_index.position,
            self.positions.len(),
            IndexKind::Position,
            line,
        )?;
        let tex_coord = face_index
            .tex_coord
            .map(|i| resolve_index(i, self.tex_coords.len(), IndexKind::TexCoord, line))
            .transpose()?;
        let normal = face_index
            .normal
            .map(|i| resolve_index(i, self.normals.len(), IndexKind::Normal, line))
            .transpose()?;
        Ok((position, tex_coord, normal))
    }

    // absent attributes default to zero
    fn vertex(&self, (position, tex_coord, normal): VertexKey) -> Vertex {
        Vertex {
            position: self.positions[position],
            normal: normal.map_or([0.0; 3], |i| self.normals[i]),
            tex_coords: tex_coord.map_or([0.0; 2], |i| self.tex_coords[i]),
        }
    }

    fn flush_submesh(&mut self) {
        if self.curr_submesh.is_empty() {
            return;
        }
        // the material stays active for whatever comes next
        let next = SubMesh {
            material_name: self.curr_submesh.material_name.clone(),
            ..SubMesh::default()
        };
        let submesh = std::mem::replace(&mut self.curr_submesh, next);
        debug!(
            "Submesh {:?}: {} triangles",
            submesh.material_name,
            submesh.triangle_count()
        );
        self.curr_object.submeshes.push(submesh);
    }

    fn flush_object(&mut self) {
        self.flush_submesh();
        let mut object = std::mem::replace(&mut self.curr_object, Object::new(self.stem.clone()));
        // objects without a single triangle are dropped, along with their vertices
        if object.submeshes.is_empty() {
            return;
        }
        if !self.objects.is_empty() {
            object.name = format!("{}.{}", self.stem, self.objects.len());
        }
        debug!(
            "Object `{}`: {} vertices, {} submeshes",
            object.name,
            object.vertices.len(),
            object.submeshes.len()
        );
        self.objects.push(object);
    }

    fn start_object(&mut self) {
        self.flush_object();
        self.vertex_cache.clear();
        self.face_seen = false;
    }
}

/// Turns a 1-based (or negative, relative to the end) OBJ index into a pool index.
///
/// Negative indices count back from the pool size at the time the face is read.
pub(crate) fn resolve_index(
    index: i64,
    len: usize,
    kind: IndexKind,
    line: usize,
) -> ObjResult<usize> {
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index - 1
    };

    if resolved < 0 || resolved >= len as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            len,
        });
    }
    Ok(resolved as usize)
}
