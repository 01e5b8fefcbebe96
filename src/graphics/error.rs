use std::path::PathBuf;

use thiserror::Error;

use crate::assets::image::ImageError;

use super::ShaderStage;

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("OpenGL context creation failed: {0}")]
    ContextCreation(String),
    #[error("Window creation failed: {0}")]
    Window(String),
    #[error("Could not create GPU resource: {0}")]
    ResourceCreation(String),
    #[error("Could not read shader source `{path}`: {source}")]
    ShaderSource {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{stage:?} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("Shader program failed to link:\n{0}")]
    ProgramLink(String),
    #[error("Index {index} is out of bounds for a vertex pool of {vertex_count}")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
    #[error("Index count {0} is not a multiple of three")]
    IncompleteTriangle(usize),
    #[error("Texture image error: {0}")]
    Image(#[from] ImageError),
}

pub type GraphicsResult<T> = ::std::result::Result<T, GraphicsError>;
