use std::fs;
use std::path::Path;

use log::debug;

use crate::graphics::{GraphicsError, GraphicsResult};

/// Reads a GLSL source file
pub fn load_source(path: &Path) -> GraphicsResult<String> {
    let source = fs::read_to_string(path).map_err(|source| GraphicsError::ShaderSource {
        path: path.to_owned(),
        source,
    })?;
    debug!("Read shader `{}` ({} bytes)", path.display(), source.len());
    Ok(source)
}
