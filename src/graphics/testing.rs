//! A [`RenderDevice`] that records every call, used by the unit tests instead of a GPU.

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::rc::Rc;

use crate::assets::image::DecodedImage;
use crate::format::Vertex;

use super::{
    GpuHandle, GraphicsError, GraphicsResult, MeshBuffers, RenderDevice, ShaderStage, Uniform,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    BeginFrame([f32; 4]),
    Viewport(u32, u32),
    CreateMeshBuffers { vertices: usize, indices: usize },
    DestroyMeshBuffers(MeshBuffers),
    Draw { vertex_array: GpuHandle, index_count: u32 },
    CreateProgram(GpuHandle),
    DestroyProgram(GpuHandle),
    UseProgram(GpuHandle),
    SetUniform(String, Uniform),
    CreateTexture { width: u32, height: u32, channels: u8 },
    BindTexture(GpuHandle, u32),
    DestroyTexture(GpuHandle),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    /// Makes the next `create_program` fail with a compile error
    pub(crate) fail_compile: Cell<bool>,
}

impl RecordingDevice {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn allocate(&self) -> GpuHandle {
        let next = self.next_handle.get() + 1;
        self.next_handle.set(next);
        GpuHandle::new(NonZeroU32::new(next).expect("handle counter starts at one"))
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// The uniforms uploaded so far, in order
    pub(crate) fn uniforms(&self) -> Vec<(String, Uniform)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::SetUniform(name, value) => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }
}

impl RenderDevice for RecordingDevice {
    fn begin_frame(&self, clear_color: [f32; 4]) {
        self.record(Call::BeginFrame(clear_color));
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn create_mesh_buffers(
        &self,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> GraphicsResult<MeshBuffers> {
        self.record(Call::CreateMeshBuffers {
            vertices: vertices.len(),
            indices: indices.len(),
        });
        Ok(MeshBuffers {
            vertex_array: self.allocate(),
            vertex_buffer: self.allocate(),
            index_buffer: self.allocate(),
        })
    }

    fn destroy_mesh_buffers(&self, buffers: MeshBuffers) {
        self.record(Call::DestroyMeshBuffers(buffers));
    }

    fn draw_indexed(&self, buffers: &MeshBuffers, index_count: u32) {
        self.record(Call::Draw {
            vertex_array: buffers.vertex_array,
            index_count,
        });
    }

    fn create_program(&self, sources: &[(ShaderStage, &str)]) -> GraphicsResult<GpuHandle> {
        if self.fail_compile.replace(false) {
            return Err(GraphicsError::ShaderCompile {
                stage: sources[0].0,
                log: "syntax error".into(),
            });
        }
        let handle = self.allocate();
        self.record(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn destroy_program(&self, program: GpuHandle) {
        self.record(Call::DestroyProgram(program));
    }

    fn use_program(&self, program: GpuHandle) {
        self.record(Call::UseProgram(program));
    }

    fn set_uniform(&self, _program: GpuHandle, name: &str, value: Uniform) {
        self.record(Call::SetUniform(name.into(), value));
    }

    fn create_texture(&self, image: &DecodedImage) -> GraphicsResult<GpuHandle> {
        self.record(Call::CreateTexture {
            width: image.width,
            height: image.height,
            channels: image.channels,
        });
        Ok(self.allocate())
    }

    fn bind_texture(&self, texture: GpuHandle, unit: u32) {
        self.record(Call::BindTexture(texture, unit));
    }

    fn destroy_texture(&self, texture: GpuHandle) {
        self.record(Call::DestroyTexture(texture));
    }
}
