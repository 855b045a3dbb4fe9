use glimmer_core::math::Mat4;
use glimmer_core::TransformStack;
use glimmer_graphics::{Attribute, GraphicsError, ImmediateMeshBuilder, PrimitiveTopology};

/// One line-list batch on a borrowed builder.
///
/// Every line becomes two vertices with the same color. The batch is drawn
/// by [`finish`](Self::finish); dropping the painter without finishing
/// leaves the vertices staged until the builder's next `begin`.
pub struct LinePainter<'a> {
    builder: &'a mut ImmediateMeshBuilder,
}

impl<'a> LinePainter<'a> {
    /// Start a line-list batch on `builder`.
    ///
    /// Fails with [`GraphicsError::Configuration`] if the builder has no
    /// Color attribute, since every line is colored.
    pub fn begin(builder: &'a mut ImmediateMeshBuilder) -> Result<Self, GraphicsError> {
        if !builder.attributes().has(Attribute::Color) {
            return Err(GraphicsError::Configuration(format!(
                "line painter needs Color, builder {:?} has {:?}",
                builder.label(),
                builder.attributes()
            )));
        }
        builder.begin(PrimitiveTopology::LineList);
        Ok(Self { builder })
    }

    /// Append a line segment.
    pub fn push_line(&mut self, start: [f32; 3], end: [f32; 3], color: [f32; 4]) {
        let [r, g, b, a] = color;
        self.builder
            .color(r, g, b, a)
            .vertex(start[0], start[1], start[2])
            .vertex(end[0], end[1], end[2]);
    }

    /// Number of lines staged so far.
    pub fn line_count(&self) -> u32 {
        self.builder.vertex_count() / 2
    }

    /// Draw the batch with `model_view_projection`.
    pub fn finish(self, model_view_projection: &Mat4) {
        log::trace!("LinePainter: drawing {} lines", self.line_count());
        self.builder.end(model_view_projection);
    }

    /// Draw the batch with the matrices of `stack`.
    pub fn finish_with(self, stack: &TransformStack) -> Result<(), GraphicsError> {
        log::trace!("LinePainter: drawing {} lines", self.line_count());
        self.builder.end_with(stack)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use glimmer_graphics::{
        AttributeSet, DummyBackend, ImmediateMeshDescriptor, RecordedCommand, RenderContext,
        ShaderProgram,
    };

    use super::*;

    pub(crate) fn line_builder(backend: &Arc<DummyBackend>) -> ImmediateMeshBuilder {
        let context: Arc<dyn RenderContext> = backend.clone();
        let program = Arc::new(ShaderProgram::new(
            context.clone(),
            "lines",
            backend.create_program("lines"),
        ));
        ImmediateMeshBuilder::new(
            context,
            ImmediateMeshDescriptor::new(AttributeSet::POSITION_COLOR).with_program(program),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_color() {
        let backend = Arc::new(DummyBackend::new());
        let context: Arc<dyn RenderContext> = backend.clone();
        let mut builder =
            ImmediateMeshBuilder::new(context, ImmediateMeshDescriptor::new(AttributeSet::POSITION))
                .unwrap();
        assert!(matches!(
            LinePainter::begin(&mut builder),
            Err(GraphicsError::Configuration(_))
        ));
        assert!(!builder.is_accumulating());
    }

    #[test]
    fn test_finish_draws_line_list() {
        let backend = Arc::new(DummyBackend::new());
        let mut builder = line_builder(&backend);
        let mut painter = LinePainter::begin(&mut builder).unwrap();
        painter.push_line([0.0; 3], [1.0; 3], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(painter.line_count(), 1);
        painter.finish(&Mat4::identity());

        assert_eq!(
            backend.draw_calls(),
            vec![RecordedCommand::DrawArrays {
                topology: PrimitiveTopology::LineList,
                first: 0,
                count: 2,
            }]
        );
        assert_eq!(
            builder.staged(Attribute::Color),
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]
        );
    }
}
