//! Debug drawing utilities for Glimmer.
//!
//! Provides immediate-mode debug line drawing on top of an
//! [`ImmediateMeshBuilder`](glimmer_graphics::ImmediateMeshBuilder) that
//! carries the Color attribute.
//!
//! # Architecture
//!
//! - [`LinePainter`] - Borrows a builder for one line-list batch
//! - [`draw_branches`] - Recursive segment drawing driven by a
//!   [`TransformStack`](glimmer_core::TransformStack)
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let mut lines = ImmediateMeshBuilder::new(
//!     context,
//!     ImmediateMeshDescriptor::new(AttributeSet::POSITION_COLOR).with_program(program),
//! )?;
//!
//! // Each frame:
//! let mut painter = LinePainter::begin(&mut lines)?;
//! painter.draw_grid([0.0; 3], 1.0, 10, [0.5, 0.5, 0.5, 1.0]);
//! painter.draw_axes([0.0; 3], 2.0);
//! painter.finish(&stack.model_view_projection_matrix());
//! ```

mod branches;
mod draw_api;
mod painter;

pub use branches::{draw_branches, BRANCH_SHRINK, BRANCH_SPREAD_DEGREES};
pub use painter::LinePainter;

/// Debug drawer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the debug drawer version.
pub fn init() {
    log::info!("Glimmer Debug Drawer v{} initialized", VERSION);
}
