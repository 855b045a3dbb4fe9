//! CPU-side mesh types.
//!
//! This module provides GPU-agnostic building blocks for vertex streaming:
//!
//! - [`Attribute`] / [`AttributeSet`] - Which per-vertex quantities a mesh carries
//! - [`LayoutOffsetMap`] and the `plan_*` functions - Where each attribute lives
//! - [`GrowableBuffer`] - Reusable staging storage
//! - [`PrimitiveTopology`], [`IndexFormat`], [`Indices`] - Draw parameters
//! - Generators for common shapes (quad, cube, sphere)
//!
//! These types are re-exported by `glimmer-graphics` for convenience.

mod attribute;
mod data;
pub mod generators;
mod growable;
mod layout;

pub use attribute::{Attribute, AttributeSet};
pub use data::{IndexFormat, Indices, PrimitiveTopology};
pub use generators::GeneratedMesh;
pub use growable::GrowableBuffer;
pub use layout::{
    plan_interleaved, plan_sequenced, plan_separated, vertex_byte_stride, LayoutOffsetMap,
    VertexLayout,
};
