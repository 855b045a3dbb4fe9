//! # Glimmer Graphics
//!
//! Immediate-mode mesh submission over WebGL-style rendering contexts.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderContext`] - Trait for rendering backends, with a recording
//!   [`DummyBackend`] and a WebGL2 backend behind the `webgl` feature
//! - [`ImmediateMeshBuilder`] - `begin`/`vertex`/`end` streaming in one of
//!   three vertex layouts
//! - [`StaticMesh`] - Upload-once geometry with optional indices
//! - [`ShaderProgram`] and [`Texture`] - Shared handles that may still be loading
//!
//! ## Example
//!
//! ```ignore
//! use glimmer_graphics::{ImmediateMeshBuilder, ImmediateMeshDescriptor};
//!
//! let mut builder = ImmediateMeshBuilder::new(
//!     context,
//!     ImmediateMeshDescriptor::new(AttributeSet::POSITION_COLOR).with_program(program),
//! )?;
//! builder.begin(PrimitiveTopology::LineList);
//! builder.color3(1.0, 0.0, 0.0).vertex(0.0, 0.0, 0.0).vertex(1.0, 0.0, 0.0);
//! builder.end_with(&stack)?;
//! ```

pub mod backend;
pub mod error;
pub mod immediate;
pub mod mesh;
pub mod resources;
pub mod types;

// Re-export main types for convenience
pub use backend::{
    DummyBackend, GpuBuffer, GpuProgram, GpuTexture, RecordedCommand, RenderContext,
};
#[cfg(feature = "webgl")]
pub use backend::WebGlBackend;
pub use error::GraphicsError;
pub use immediate::{ImmediateMeshBuilder, ImmediateMeshDescriptor};
pub use mesh::{StaticMesh, StaticMeshDescriptor};
pub use resources::{Buffer, IndexBuffer, ShaderProgram, Texture, UniformNames};
pub use types::{BufferDescriptor, BufferTarget, BufferUsage, VertexPointer};

// Re-export core types used throughout the API
pub use glimmer_core::mesh::{
    Attribute, AttributeSet, IndexFormat, Indices, LayoutOffsetMap, PrimitiveTopology,
    VertexLayout,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("Glimmer Graphics v{} initialized", VERSION);
}
