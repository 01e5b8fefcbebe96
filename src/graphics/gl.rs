//! OpenGL 3.3 core implementation of [`RenderDevice`] on top of `glow`.

use glow::HasContext;
use log::{debug, info, trace};

use crate::assets::image::{DecodedImage, ImageError};
use crate::format::Vertex;

use super::{
    GpuHandle, GraphicsError, GraphicsResult, MeshBuffers, PixelFormat, RenderDevice,
    ShaderStage, Uniform,
};

pub struct GlDevice {
    gl: glow::Context,
}

impl GlDevice {
    pub fn new(gl: glow::Context) -> Self {
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        let renderer = unsafe { gl.get_parameter_string(glow::RENDERER) };
        info!("OpenGL {} on {}", version, renderer);
        Self { gl }
    }
}

fn buffer(handle: GpuHandle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle.raw())
}

fn vertex_array(handle: GpuHandle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle.raw())
}

fn program(handle: GpuHandle) -> glow::NativeProgram {
    glow::NativeProgram(handle.raw())
}

fn texture(handle: GpuHandle) -> glow::NativeTexture {
    glow::NativeTexture(handle.raw())
}

impl ShaderStage {
    fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl PixelFormat {
    fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Red => glow::RED,
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }
}

impl RenderDevice for GlDevice {
    fn begin_frame(&self, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.gl.enable(glow::DEPTH_TEST);
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn create_mesh_buffers(
        &self,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> GraphicsResult<MeshBuffers> {
        let gl = &self.gl;
        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(GraphicsError::ResourceCreation)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(GraphicsError::ResourceCreation(e));
                }
            };
            let ebo = match gl.create_buffer() {
                Ok(ebo) => ebo,
                Err(e) => {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    return Err(GraphicsError::ResourceCreation(e));
                }
            };

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            let attributes = [
                (0, 3, Vertex::POSITION_OFFSET),
                (1, 3, Vertex::NORMAL_OFFSET),
                (2, 2, Vertex::TEX_COORDS_OFFSET),
            ];
            for (location, size, offset) in attributes {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(
                    location,
                    size,
                    glow::FLOAT,
                    false,
                    Vertex::STRIDE,
                    offset,
                );
            }

            // the element buffer binding is recorded in the vertex array, so only unbind the array
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            trace!(
                "Uploaded {} vertices and {} indices",
                vertices.len(),
                indices.len()
            );

            Ok(MeshBuffers {
                vertex_array: GpuHandle::new(vao.0),
                vertex_buffer: GpuHandle::new(vbo.0),
                index_buffer: GpuHandle::new(ebo.0),
            })
        }
    }

    fn destroy_mesh_buffers(&self, buffers: MeshBuffers) {
        unsafe {
            self.gl.delete_vertex_array(vertex_array(buffers.vertex_array));
            self.gl.delete_buffer(buffer(buffers.vertex_buffer));
            self.gl.delete_buffer(buffer(buffers.index_buffer));
        }
    }

    fn draw_indexed(&self, buffers: &MeshBuffers, index_count: u32) {
        unsafe {
            self.gl
                .bind_vertex_array(Some(vertex_array(buffers.vertex_array)));
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    fn create_program(&self, sources: &[(ShaderStage, &str)]) -> GraphicsResult<GpuHandle> {
        let gl = &self.gl;
        unsafe {
            let program = gl
                .create_program()
                .map_err(GraphicsError::ResourceCreation)?;

            let mut shaders = Vec::with_capacity(sources.len());
            for (stage, source) in sources {
                let shader = match gl.create_shader(stage.gl_kind()) {
                    Ok(shader) => shader,
                    Err(e) => {
                        shaders.into_iter().for_each(|s| gl.delete_shader(s));
                        gl.delete_program(program);
                        return Err(GraphicsError::ResourceCreation(e));
                    }
                };
                gl.shader_source(shader, source);
                gl.compile_shader(shader);

                if !gl.get_shader_compile_status(shader) {
                    let log = gl.get_shader_info_log(shader);
                    gl.delete_shader(shader);
                    shaders.into_iter().for_each(|s| gl.delete_shader(s));
                    gl.delete_program(program);
                    return Err(GraphicsError::ShaderCompile { stage: *stage, log });
                }

                gl.attach_shader(program, shader);
                shaders.push(shader);
            }

            gl.link_program(program);
            let linked = gl.get_program_link_status(program);

            // shader objects are not needed once the program is linked (or failed to)
            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }

            if !linked {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(GraphicsError::ProgramLink(log));
            }

            debug!("Linked shader program {}", program.0);
            Ok(GpuHandle::new(program.0))
        }
    }

    fn destroy_program(&self, handle: GpuHandle) {
        unsafe { self.gl.delete_program(program(handle)) };
    }

    fn use_program(&self, handle: GpuHandle) {
        unsafe { self.gl.use_program(Some(program(handle))) };
    }

    fn set_uniform(&self, handle: GpuHandle, name: &str, value: Uniform) {
        let gl = &self.gl;
        unsafe {
            let location = match gl.get_uniform_location(program(handle), name) {
                Some(location) => location,
                None => {
                    trace!("Uniform `{}` is not active, skipping", name);
                    return;
                }
            };
            let location = Some(&location);

            match value {
                Uniform::Bool(b) => gl.uniform_1_i32(location, b as i32),
                Uniform::Int(i) => gl.uniform_1_i32(location, i),
                Uniform::Float(f) => gl.uniform_1_f32(location, f),
                Uniform::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                Uniform::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_texture(&self, image: &DecodedImage) -> GraphicsResult<GpuHandle> {
        let format = PixelFormat::from_channels(image.channels)
            .ok_or(ImageError::UnsupportedChannels(image.channels))?;
        let format = format.gl_format();

        let gl = &self.gl;
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(GraphicsError::ResourceCreation)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            // rows of single channel and rgb images are not 4 byte aligned
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                image.width as i32,
                image.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(&image.pixels),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );

            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(GpuHandle::new(texture.0))
        }
    }

    fn bind_texture(&self, handle: GpuHandle, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture(handle)));
        }
    }

    fn destroy_texture(&self, handle: GpuHandle) {
        unsafe { self.gl.delete_texture(texture(handle)) };
    }
}
