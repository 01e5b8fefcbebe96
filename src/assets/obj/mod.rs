//! Parses Wavefront `.obj` files (https://en.wikipedia.org/wiki/Wavefront_.obj_file).
//!
//! Positions, texture coordinates and normals are collected into file wide pools. Every distinct
//! face reference (`pos/tex/norm`, compared as written) becomes one vertex of the current object,
//! and polygons are triangulated as a fan around their first corner.

mod builder;
mod parser;

use std::fs;
use std::io::{self, BufReader};
use std::num;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};
use thiserror::Error;

use crate::format::{Object, Vertex};
use crate::graphics::{GraphicsResult, RenderDevice};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;

use super::mtl::MaterialMap;
use super::utils;

pub use self::builder::{IndexKind, SplitPolicy};
use self::builder::ObjBuilder;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Could not open model `{path}`: {source}")]
    FileNotFound { path: PathBuf, source: io::Error },
    #[error("Failed to read model: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: failed to parse float: {source}")]
    ParseFloat {
        line: usize,
        source: num::ParseFloatError,
    },
    #[error("Line {line}: failed to parse index: {source}")]
    ParseInt {
        line: usize,
        source: num::ParseIntError,
    },
    #[error("Line {line}: `{statement}` is missing components")]
    MissingComponents { line: usize, statement: String },
    #[error("Line {line}: face reference without a position index")]
    EmptyReference { line: usize },
    #[error("Line {line}: {kind:?} index {index} is out of range for {len} entries")]
    IndexOutOfRange {
        line: usize,
        kind: IndexKind,
        index: i64,
        len: usize,
    },
}

pub type ObjResult<T> = ::std::result::Result<T, ObjError>;

/// Everything read from one model file and the material libraries it references.
#[derive(Debug, Default)]
pub struct ObjModel {
    pub objects: Vec<Object>,
    pub materials: MaterialMap,
}

impl ObjModel {
    /// Loads `path` with the default [`SplitPolicy`]
    pub fn load(path: impl AsRef<Path>) -> ObjResult<Self> {
        Self::load_with_policy(path, SplitPolicy::default())
    }

    /// Loads `path`; any error aborts the whole load, no partial model is returned.
    pub fn load_with_policy(path: impl AsRef<Path>, policy: SplitPolicy) -> ObjResult<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| ObjError::FileNotFound {
            path: path.to_owned(),
            source,
        })?;
        info!("Loading model: {}", path.display());

        let mut builder = ObjBuilder::new(utils::file_stem(path), policy);
        parser::parse_lines(BufReader::new(file), path, &mut builder)?;
        let (objects, materials) = builder.finish();

        debug!(
            "Loaded `{}`: {} objects, {} materials",
            path.display(),
            objects.len(),
            materials.len()
        );
        Ok(Self { objects, materials })
    }

    /// The material called `name`, or the default material
    pub fn material(&self, name: Option<&str>) -> Material {
        match name.and_then(|name| self.materials.get(name)) {
            Some(material) => material.clone(),
            None => {
                debug!("No material `{:?}`, using the default", name);
                Material::default()
            }
        }
    }

    /// Uploads one [`Mesh`] per submesh. Submeshes of the same object share its vertex pool.
    pub fn create_meshes(&self, device: &Rc<dyn RenderDevice>) -> GraphicsResult<Vec<Mesh>> {
        let mut meshes = Vec::new();
        for object in &self.objects {
            let vertices: Rc<[Vertex]> = object.vertices.as_slice().into();
            for submesh in &object.submeshes {
                let material = self.material(submesh.material_name.as_deref());
                meshes.push(Mesh::new(
                    device.clone(),
                    vertices.clone(),
                    &submesh.indices,
                    material,
                )?);
            }
        }
        Ok(meshes)
    }
}
