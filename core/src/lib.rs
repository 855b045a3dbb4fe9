//! # Glimmer Core
//!
//! GPU-agnostic building blocks for immediate-mode mesh submission:
//!
//! - [`math`] - nalgebra type aliases and GL-convention projection helpers
//! - [`transform`] - [`TransformStack`] with model-view, projection and texture stacks
//! - [`mesh`] - attribute sets, layout planning, growable staging buffers and generators
//!
//! Nothing in this crate talks to a rendering context; `glimmer-graphics` builds
//! on these types.

pub mod error;
pub mod math;
pub mod mesh;
pub mod transform;

pub use error::CoreError;
pub use mesh::{
    Attribute, AttributeSet, GrowableBuffer, IndexFormat, Indices, LayoutOffsetMap,
    PrimitiveTopology, VertexLayout,
};
pub use transform::{MatrixMode, MatrixScope, MatrixStack, TransformStack};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core library version.
pub fn init() {
    log::info!("Glimmer Core v{} initialized", VERSION);
}
