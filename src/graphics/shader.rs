use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use log::info;

use crate::assets;

use super::{GpuHandle, GraphicsResult, RenderDevice, ShaderStage, Uniform};

/// A linked vertex + fragment program.
pub struct Shader {
    device: Rc<dyn RenderDevice>,
    program: Option<GpuHandle>,
}

impl Shader {
    pub fn from_sources(
        device: Rc<dyn RenderDevice>,
        vertex: &str,
        fragment: &str,
    ) -> GraphicsResult<Self> {
        let program = device.create_program(&[
            (ShaderStage::Vertex, vertex),
            (ShaderStage::Fragment, fragment),
        ])?;
        Ok(Self {
            device,
            program: Some(program),
        })
    }

    pub fn from_files(
        device: Rc<dyn RenderDevice>,
        vertex: &Path,
        fragment: &Path,
    ) -> GraphicsResult<Self> {
        info!(
            "Loading shader: {} + {}",
            vertex.display(),
            fragment.display()
        );
        let vertex = assets::shader::load_source(vertex)?;
        let fragment = assets::shader::load_source(fragment)?;
        Self::from_sources(device, &vertex, &fragment)
    }

    pub fn use_program(&self) {
        if let Some(program) = self.program {
            self.device.use_program(program);
        }
    }

    pub fn set_mat4(&self, name: &str, value: Mat4) {
        self.set(name, Uniform::Mat4(value));
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        self.set(name, Uniform::Vec3(value));
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set(name, Uniform::Float(value));
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set(name, Uniform::Int(value));
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set(name, Uniform::Bool(value));
    }

    fn set(&self, name: &str, value: Uniform) {
        if let Some(program) = self.program {
            self.device.set_uniform(program, name, value);
        }
    }

    /// Deletes the program; later calls are no-ops
    pub fn release(&mut self) {
        if let Some(program) = self.program.take() {
            self.device.destroy_program(program);
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::testing::{Call, RecordingDevice};
    use crate::graphics::GraphicsError;

    #[test]
    fn test_uniforms_and_release() {
        let recording = RecordingDevice::new();
        let mut shader = Shader::from_sources(recording.clone(), "vs", "fs").unwrap();

        shader.use_program();
        shader.set_float("material.shininess", 8.0);
        shader.release();
        shader.set_int("ignored", 1);
        drop(shader);

        let calls = recording.calls();
        assert!(matches!(calls[0], Call::CreateProgram(_)));
        assert!(matches!(calls[1], Call::UseProgram(_)));
        assert_eq!(
            calls[2],
            Call::SetUniform("material.shininess".into(), Uniform::Float(8.0))
        );
        assert_eq!(
            recording.count(|c| matches!(c, Call::DestroyProgram(_))),
            1
        );
        assert_eq!(calls.len(), 4);
    }

    #[test]
    fn test_compile_failure() {
        let recording = RecordingDevice::new();
        recording.fail_compile.set(true);

        let result = Shader::from_sources(recording.clone(), "vs", "fs");
        assert!(matches!(
            result,
            Err(GraphicsError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let recording = RecordingDevice::new();
        let result = Shader::from_files(
            recording,
            Path::new("missing/vertex.glsl"),
            Path::new("missing/fragment.glsl"),
        );
        assert!(matches!(result, Err(GraphicsError::ShaderSource { .. })));
    }
}
