//! Immediate-mode mesh submission.
//!
//! An [`ImmediateMeshBuilder`] accepts vertices one at a time between
//! `begin` and `end`, the way legacy `glBegin`/`glEnd` code does, and turns
//! each frame into one buffer upload plus one draw call:
//!
//! ```ignore
//! let mut builder = ImmediateMeshBuilder::new(context, ImmediateMeshDescriptor::new(
//!     AttributeSet::POSITION_COLOR,
//! ).with_program(program))?;
//!
//! builder.begin(PrimitiveTopology::TriangleList);
//! builder.color(1.0, 0.0, 0.0, 1.0).vertex(-0.5, 0.0, 0.0);
//! builder.color(0.0, 1.0, 0.0, 1.0).vertex(0.5, 0.0, 0.0);
//! builder.color(0.0, 0.0, 1.0, 1.0).vertex(0.0, 0.5, 0.0);
//! builder.end(&stack.model_view_projection_matrix());
//! ```
//!
//! The physical arrangement of the staged attributes is chosen once with
//! [`VertexLayout`](glimmer_core::mesh::VertexLayout).

mod builder;
mod descriptor;
mod strategy;

pub use builder::ImmediateMeshBuilder;
pub use descriptor::ImmediateMeshDescriptor;

pub(crate) use strategy::{
    disable_absent_attributes, interleaved_pointers, validate_attributes,
};
