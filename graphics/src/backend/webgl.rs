//! WebGL2 rendering backend.
//!
//! Thin mapping of [`RenderContext`] onto `web_sys::WebGl2RenderingContext`.
//! Only usable on `wasm32` targets inside a browser; the context is obtained
//! from a canvas by the embedding application.

use glimmer_core::mesh::{IndexFormat, PrimitiveTopology};
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlTexture};

use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, BufferTarget, BufferUsage, VertexPointer};

use super::{GpuBuffer, GpuProgram, GpuTexture, RenderContext};

/// WebGL2 rendering backend.
#[derive(Debug, Clone)]
pub struct WebGlBackend {
    gl: Gl,
}

impl WebGlBackend {
    /// Wrap a context obtained from `canvas.getContext("webgl2")`.
    pub fn new(gl: Gl) -> Self {
        log::info!("Using WebGL2 backend");
        Self { gl }
    }

    /// The wrapped context.
    pub fn gl(&self) -> &Gl {
        &self.gl
    }
}

fn gl_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => Gl::ARRAY_BUFFER,
        BufferTarget::Index => Gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_usage(usage: BufferUsage) -> u32 {
    if usage.contains(BufferUsage::DYNAMIC) {
        Gl::DYNAMIC_DRAW
    } else {
        Gl::STATIC_DRAW
    }
}

fn gl_mode(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::PointList => Gl::POINTS,
        PrimitiveTopology::LineList => Gl::LINES,
        PrimitiveTopology::LineStrip => Gl::LINE_STRIP,
        PrimitiveTopology::LineLoop => Gl::LINE_LOOP,
        PrimitiveTopology::TriangleList => Gl::TRIANGLES,
        PrimitiveTopology::TriangleStrip => Gl::TRIANGLE_STRIP,
        PrimitiveTopology::TriangleFan => Gl::TRIANGLE_FAN,
    }
}

fn gl_index_type(format: IndexFormat) -> u32 {
    match format {
        IndexFormat::Uint16 => Gl::UNSIGNED_SHORT,
        IndexFormat::Uint32 => Gl::UNSIGNED_INT,
    }
}

fn webgl_buffer(buffer: &GpuBuffer) -> Option<&WebGlBuffer> {
    match buffer {
        GpuBuffer::WebGl(buffer) => Some(buffer),
        GpuBuffer::Dummy { .. } => None,
    }
}

fn webgl_program(program: &GpuProgram) -> Option<&WebGlProgram> {
    match program {
        GpuProgram::WebGl(program) => Some(program),
        GpuProgram::Dummy { .. } => None,
    }
}

fn webgl_texture(texture: &GpuTexture) -> Option<&WebGlTexture> {
    match texture {
        GpuTexture::WebGl(texture) => Some(texture),
        GpuTexture::Dummy { .. } => None,
    }
}

impl RenderContext for WebGlBackend {
    fn name(&self) -> &'static str {
        "WebGL2 Backend"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, GraphicsError> {
        log::trace!("WebGlBackend: creating buffer {:?}", descriptor.label);
        self.gl.create_buffer().map(GpuBuffer::WebGl).ok_or_else(|| {
            GraphicsError::ResourceCreationFailed(format!(
                "createBuffer returned null for {:?}",
                descriptor.label
            ))
        })
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        self.gl.delete_buffer(webgl_buffer(buffer));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&GpuBuffer>) {
        self.gl
            .bind_buffer(gl_target(target), buffer.and_then(webgl_buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.gl
            .buffer_data_with_u8_array(gl_target(target), data, gl_usage(usage));
    }

    fn allocate_buffer(&self, target: BufferTarget, size: u64, usage: BufferUsage) {
        self.gl
            .buffer_data_with_i32(gl_target(target), size as i32, gl_usage(usage));
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: u64, data: &[u8]) {
        self.gl
            .buffer_sub_data_with_i32_and_u8_array(gl_target(target), offset as i32, data);
    }

    fn vertex_attrib_pointer(&self, pointer: &VertexPointer) {
        self.gl.enable_vertex_attrib_array(pointer.location);
        self.gl.vertex_attrib_pointer_with_i32(
            pointer.location,
            pointer.components as i32,
            Gl::FLOAT,
            false,
            pointer.stride as i32,
            pointer.offset as i32,
        );
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        self.gl.disable_vertex_attrib_array(location);
    }

    fn use_program(&self, program: Option<&GpuProgram>) {
        self.gl.use_program(program.and_then(webgl_program));
    }

    fn set_uniform_matrix4(&self, program: &GpuProgram, name: &str, value: &[f32; 16]) {
        let Some(program) = webgl_program(program) else {
            return;
        };
        match self.gl.get_uniform_location(program, name) {
            Some(location) => self
                .gl
                .uniform_matrix4fv_with_f32_array(Some(&location), false, value),
            None => log::trace!("WebGlBackend: program has no active uniform {name:?}"),
        }
    }

    fn set_uniform_sampler(&self, program: &GpuProgram, name: &str, unit: u32) {
        let Some(program) = webgl_program(program) else {
            return;
        };
        match self.gl.get_uniform_location(program, name) {
            Some(location) => self.gl.uniform1i(Some(&location), unit as i32),
            None => log::trace!("WebGlBackend: program has no active sampler {name:?}"),
        }
    }

    fn bind_texture(&self, unit: u32, texture: Option<&GpuTexture>) {
        self.gl.active_texture(Gl::TEXTURE0 + unit);
        self.gl
            .bind_texture(Gl::TEXTURE_2D, texture.and_then(webgl_texture));
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.gl
            .draw_arrays(gl_mode(topology), first as i32, count as i32);
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    ) {
        self.gl.draw_elements_with_i32(
            gl_mode(topology),
            count as i32,
            gl_index_type(format),
            offset as i32,
        );
    }
}
