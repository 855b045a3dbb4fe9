//! Rendering context abstraction.
//!
//! Meshes and builders talk to the GPU through the [`RenderContext`] trait, a
//! narrow slice of the WebGL2 API: buffer management, float vertex pointers,
//! program and texture binding, and the two draw calls.
//!
//! # Available Backends
//!
//! - `dummy` (always compiled): records every call, for tests and headless runs
//! - `webgl`: maps the trait onto `web_sys::WebGl2RenderingContext` (wasm32)
//!
//! Handles are backend enums; passing a handle created by one backend to
//! another is ignored by the receiving backend.

pub mod dummy;

#[cfg(feature = "webgl")]
pub mod webgl;

use glimmer_core::mesh::{IndexFormat, PrimitiveTopology};

use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, BufferTarget, BufferUsage, VertexPointer};

pub use dummy::{DummyBackend, RecordedCommand};
#[cfg(feature = "webgl")]
pub use webgl::WebGlBackend;

/// Handle to a GPU buffer object.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuBuffer {
    /// Dummy backend buffer id
    Dummy { id: u64 },
    /// WebGL2 buffer object
    #[cfg(feature = "webgl")]
    WebGl(web_sys::WebGlBuffer),
}

/// Handle to a linked shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuProgram {
    /// Dummy backend program id
    Dummy { id: u64 },
    /// WebGL2 program object
    #[cfg(feature = "webgl")]
    WebGl(web_sys::WebGlProgram),
}

/// Handle to a 2D texture.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuTexture {
    /// Dummy backend texture id
    Dummy { id: u64 },
    /// WebGL2 texture object
    #[cfg(feature = "webgl")]
    WebGl(web_sys::WebGlTexture),
}

/// A rendering context that meshes and builders draw through.
///
/// All methods take `&self`: contexts are shared as `Arc<dyn RenderContext>`
/// between every builder and mesh of a renderer. Calls that operate on "the
/// bound buffer" follow GL semantics and act on whatever was last passed to
/// [`bind_buffer`](Self::bind_buffer) for that target.
pub trait RenderContext {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Create an empty buffer object.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, GraphicsError>;

    /// Delete a buffer object.
    fn destroy_buffer(&self, buffer: &GpuBuffer);

    /// Bind `buffer` to `target`, or unbind with `None`.
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&GpuBuffer>);

    /// Replace the contents of the bound buffer.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Reallocate the bound buffer to `size` bytes of undefined content.
    fn allocate_buffer(&self, target: BufferTarget, size: u64, usage: BufferUsage);

    /// Overwrite part of the bound buffer starting at `offset`.
    fn buffer_sub_data(&self, target: BufferTarget, offset: u64, data: &[u8]);

    /// Enable a float attribute and point it into the bound vertex buffer.
    fn vertex_attrib_pointer(&self, pointer: &VertexPointer);

    /// Disable the attribute array at `location`.
    ///
    /// Enabled arrays outlive the buffer they point into, so a draw must
    /// disable every location its program could read but it does not feed.
    fn disable_vertex_attrib_array(&self, location: u32);

    /// Make `program` current, or clear it with `None`.
    fn use_program(&self, program: Option<&GpuProgram>);

    /// Upload a column-major 4x4 matrix uniform by name.
    fn set_uniform_matrix4(&self, program: &GpuProgram, name: &str, value: &[f32; 16]);

    /// Point a sampler uniform at a texture unit.
    fn set_uniform_sampler(&self, program: &GpuProgram, name: &str, unit: u32);

    /// Bind a 2D texture to `unit`, or unbind with `None`.
    fn bind_texture(&self, unit: u32, texture: Option<&GpuTexture>);

    /// Draw `count` vertices starting at `first` from the enabled arrays.
    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32);

    /// Draw `count` indices from the bound index buffer starting at byte `offset`.
    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    );
}

impl GpuBuffer {
    /// The dummy backend id, if this is a dummy handle.
    pub fn dummy_id(&self) -> Option<u64> {
        match self {
            Self::Dummy { id } => Some(*id),
            #[cfg(feature = "webgl")]
            Self::WebGl(_) => None,
        }
    }
}

impl GpuProgram {
    /// The dummy backend id, if this is a dummy handle.
    pub fn dummy_id(&self) -> Option<u64> {
        match self {
            Self::Dummy { id } => Some(*id),
            #[cfg(feature = "webgl")]
            Self::WebGl(_) => None,
        }
    }
}

impl GpuTexture {
    /// The dummy backend id, if this is a dummy handle.
    pub fn dummy_id(&self) -> Option<u64> {
        match self {
            Self::Dummy { id } => Some(*id),
            #[cfg(feature = "webgl")]
            Self::WebGl(_) => None,
        }
    }
}
