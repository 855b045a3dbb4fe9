//! Common types and descriptors for graphics resources.
//!
//! This module contains usage flags, bind targets and descriptor structs
//! used throughout the graphics system.

mod buffer;

pub use buffer::{BufferDescriptor, BufferTarget, BufferUsage, VertexPointer};
