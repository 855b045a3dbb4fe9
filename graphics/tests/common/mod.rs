//! Common utilities for integration tests.
//!
//! Every test runs against the recording [`DummyBackend`] and inspects the
//! commands and buffer contents it captured.

#![allow(dead_code)]

use std::sync::Arc;

use glimmer_graphics::{
    AttributeSet, DummyBackend, GpuBuffer, ImmediateMeshBuilder, ImmediateMeshDescriptor,
    RecordedCommand, RenderContext, ShaderProgram, VertexLayout,
};

/// Initialize logging for test output.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A dummy backend plus a ready program to draw with.
pub struct TestContext {
    pub backend: Arc<DummyBackend>,
    pub context: Arc<dyn RenderContext>,
    pub program: Arc<ShaderProgram>,
}

impl TestContext {
    pub fn new() -> Self {
        init_logging();
        let backend = Arc::new(DummyBackend::new());
        let context: Arc<dyn RenderContext> = backend.clone();
        let program = Arc::new(ShaderProgram::new(
            context.clone(),
            "flat",
            backend.create_program("flat"),
        ));
        Self {
            backend,
            context,
            program,
        }
    }

    /// A builder with the test program already attached.
    pub fn builder(&self, attributes: AttributeSet, layout: VertexLayout) -> ImmediateMeshBuilder {
        ImmediateMeshBuilder::new(
            self.context.clone(),
            ImmediateMeshDescriptor::new(attributes)
                .with_layout(layout)
                .with_program(self.program.clone()),
        )
        .expect("builder creation")
    }

    /// Handle of the live buffer labelled `label`.
    pub fn buffer(&self, label: &str) -> GpuBuffer {
        self.backend
            .find_buffer(label)
            .unwrap_or_else(|| panic!("no buffer labelled {label:?}"))
    }

    /// Current contents of the buffer created with `label`, as floats.
    pub fn buffer_floats(&self, label: &str) -> Vec<f32> {
        let bytes = self
            .backend
            .buffer_contents(&self.buffer(label))
            .expect("buffer alive");
        floats(&bytes)
    }
}

/// Reinterpret uploaded bytes as `f32`s.
pub fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// The vertex pointers recorded, in order.
pub fn pointers(commands: &[RecordedCommand]) -> Vec<glimmer_graphics::VertexPointer> {
    commands
        .iter()
        .filter_map(|command| match command {
            RecordedCommand::VertexAttribPointer(pointer) => Some(*pointer),
            _ => None,
        })
        .collect()
}

/// Emit the reference triangle: three vertices with distinct colors.
pub fn emit_triangle(builder: &mut ImmediateMeshBuilder) {
    builder.begin(glimmer_graphics::PrimitiveTopology::TriangleList);
    builder.color(1.0, 0.0, 0.0, 1.0).vertex(-0.5, 0.0, 0.0);
    builder.color(0.0, 1.0, 0.0, 1.0).vertex(0.5, 0.0, 0.0);
    builder.color(0.0, 0.0, 1.0, 1.0).vertex(0.0, 0.5, 0.0);
}

/// Positions of the reference triangle.
pub const TRIANGLE_POSITIONS: [f32; 9] = [-0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5, 0.0];

/// Colors of the reference triangle.
pub const TRIANGLE_COLORS: [f32; 12] = [
    1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0,
];
