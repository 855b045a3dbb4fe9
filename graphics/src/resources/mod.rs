//! GPU resources.
//!
//! This module contains the resource wrappers meshes and builders draw with:
//! - [`Buffer`] - Buffer object owned by one mesh, destroyed on drop
//! - [`IndexBuffer`] - Buffer of u16/u32 indices plus its count and format
//! - [`ShaderProgram`] - Shared program handle that may still be compiling
//! - [`Texture`] - Shared texture handle that may still be loading
//!
//! Each resource holds the [`RenderContext`] it was created through.
//!
//! [`RenderContext`]: crate::backend::RenderContext

mod buffer;
mod program;
mod texture;

pub use buffer::{Buffer, IndexBuffer};
pub use program::{ShaderProgram, UniformNames};
pub use texture::Texture;
