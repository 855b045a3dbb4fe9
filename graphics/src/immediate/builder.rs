//! The immediate-mode builder.

use std::sync::Arc;

use glimmer_core::math::Mat4;
use glimmer_core::mesh::{
    Attribute, AttributeSet, Indices, LayoutOffsetMap, PrimitiveTopology, VertexLayout,
};
use glimmer_core::TransformStack;

use crate::backend::RenderContext;
use crate::error::GraphicsError;
use crate::resources::{IndexBuffer, ShaderProgram, Texture, UniformNames};

use super::descriptor::ImmediateMeshDescriptor;
use super::strategy::{
    create_strategy, disable_absent_attributes, validate_attributes, LayoutStrategy,
    PendingVertex,
};

/// Streams vertices between `begin` and `end` into GPU buffers and draws them.
///
/// The attribute set and layout are fixed at construction. Attribute setters
/// update the pending vertex and stick until changed, across vertices and
/// across frames; setters for attributes outside the set are no-ops.
/// `vertex` commits the pending values with the given position.
///
/// Calls made outside `begin`/`end` are ignored.
pub struct ImmediateMeshBuilder {
    context: Arc<dyn RenderContext>,
    label: String,
    attributes: AttributeSet,
    strategy: Box<dyn LayoutStrategy>,
    program: Option<Arc<ShaderProgram>>,
    texture: Option<Arc<Texture>>,
    uniforms: UniformNames,
    index_buffer: Option<IndexBuffer>,
    pending: PendingVertex,
    topology: PrimitiveTopology,
    vertex_count: u32,
    accumulating: bool,
}

impl ImmediateMeshBuilder {
    /// Create a builder and its GPU buffers.
    ///
    /// Fails with [`GraphicsError::ResourceCreationFailed`] if any buffer
    /// cannot be created; buffers created before the failure are released.
    pub fn new(
        context: Arc<dyn RenderContext>,
        descriptor: ImmediateMeshDescriptor,
    ) -> Result<Self, GraphicsError> {
        let attributes = descriptor.attributes | AttributeSet::POSITION;
        validate_attributes(attributes)?;

        let label = descriptor
            .label
            .unwrap_or_else(|| "immediate_mesh".to_string());
        let strategy = create_strategy(
            descriptor.layout,
            &context,
            attributes,
            descriptor.initial_capacity,
            &label,
        )?;
        log::debug!(
            "Created immediate mesh {:?}: {:?} layout, {} attributes, {} buffers",
            label,
            descriptor.layout,
            attributes.attribute_count(),
            strategy.buffer_count()
        );

        Ok(Self {
            context,
            label,
            attributes,
            strategy,
            program: descriptor.program,
            texture: descriptor.texture,
            uniforms: descriptor.uniforms,
            index_buffer: None,
            pending: PendingVertex::default(),
            topology: PrimitiveTopology::default(),
            vertex_count: 0,
            accumulating: false,
        })
    }

    // ------------------------------------------------------------------------
    // Accumulation
    // ------------------------------------------------------------------------

    /// Start a new primitive batch, discarding anything staged before.
    pub fn begin(&mut self, topology: PrimitiveTopology) -> &mut Self {
        if self.accumulating {
            log::debug!(
                "Immediate mesh {:?}: begin while accumulating, dropping {} vertices",
                self.label,
                self.vertex_count
            );
        }
        self.strategy.clear();
        self.vertex_count = 0;
        self.topology = topology;
        self.accumulating = true;
        self
    }

    /// Set the pending color.
    pub fn color(&mut self, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        if self.attributes.has(Attribute::Color) {
            self.pending.color = [r, g, b, a];
        }
        self
    }

    /// Set the pending color with alpha 1.
    pub fn color3(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.color(r, g, b, 1.0)
    }

    /// Set the pending first texture coordinate.
    pub fn tex_coordinate(&mut self, u: f32, v: f32) -> &mut Self {
        if self.attributes.has(Attribute::TexCoord0) {
            self.pending.tex_coord0 = [u, v];
        }
        self
    }

    /// Set the pending second texture coordinate.
    pub fn tex_coordinate1(&mut self, u: f32, v: f32) -> &mut Self {
        if self.attributes.has(Attribute::TexCoord1) {
            self.pending.tex_coord1 = [u, v];
        }
        self
    }

    /// Set the pending normal.
    pub fn normal(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if self.attributes.has(Attribute::Normal) {
            self.pending.normal = [x, y, z];
        }
        self
    }

    /// Set the pending tangent.
    pub fn tangent(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if self.attributes.has(Attribute::Tangent) {
            self.pending.tangent = [x, y, z];
        }
        self
    }

    /// Commit a vertex at `(x, y, z)` with the pending attribute values.
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if !self.accumulating {
            log::debug!("Immediate mesh {:?}: vertex outside begin/end ignored", self.label);
            return self;
        }
        self.pending.position = [x, y, z];
        self.strategy.stage(&self.pending);
        self.vertex_count += 1;
        self
    }

    /// Finish the batch and draw it with `model_view_projection`.
    ///
    /// Draws nothing when no program is set, the program is still pending,
    /// or no vertices were staged. A batch whose index buffer addresses
    /// vertices past the staged ones is dropped with a warning.
    pub fn end(&mut self, model_view_projection: &Mat4) {
        if let Err(error) = self.finish(model_view_projection, None) {
            log::warn!("Immediate mesh {:?}: batch dropped: {error}", self.label);
        }
    }

    /// Finish the batch and draw it with the matrices of `stack`.
    ///
    /// Besides the model-view-projection matrix this writes the model-view
    /// and normal matrices when their uniform names are configured. A
    /// singular model-view matrix or an index past the staged vertices
    /// aborts the draw with an error; the builder is idle afterwards either
    /// way.
    pub fn end_with(&mut self, stack: &TransformStack) -> Result<(), GraphicsError> {
        self.finish(&stack.model_view_projection_matrix(), Some(stack))
    }

    fn finish(
        &mut self,
        model_view_projection: &Mat4,
        stack: Option<&TransformStack>,
    ) -> Result<(), GraphicsError> {
        if !std::mem::replace(&mut self.accumulating, false) {
            log::debug!("Immediate mesh {:?}: end without begin ignored", self.label);
            return Ok(());
        }
        let Some(program) = self.program.as_deref() else {
            log::trace!("Immediate mesh {:?}: no program, nothing drawn", self.label);
            return Ok(());
        };
        if self.vertex_count == 0 {
            log::trace!("Immediate mesh {:?}: empty batch, nothing drawn", self.label);
            return Ok(());
        }
        if let Some(indices) = &self.index_buffer {
            if !indices.fits(self.vertex_count) {
                return Err(GraphicsError::InvalidParameter(format!(
                    "index {} out of range for {} staged vertices",
                    indices.max_index().unwrap_or_default(),
                    self.vertex_count
                )));
            }
        }
        let extra = match stack {
            Some(stack) => self.uniforms.stack_matrices(stack)?,
            None => Vec::new(),
        };
        if !program.prepare_draw(
            &self.uniforms,
            self.texture.as_deref(),
            model_view_projection,
            &extra,
        ) {
            return Ok(());
        }

        self.strategy.upload(self.vertex_count);
        self.strategy
            .bind_pointers(self.context.as_ref(), self.vertex_count);
        disable_absent_attributes(self.context.as_ref(), self.attributes);
        match &self.index_buffer {
            Some(indices) => indices.draw(self.topology),
            None => self
                .context
                .draw_arrays(self.topology, 0, self.vertex_count),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Indices
    // ------------------------------------------------------------------------

    /// Draw with `indices` from now on, reusing the index buffer if one exists.
    ///
    /// An empty index list clears the index buffer.
    pub fn set_index_buffer<'a>(
        &mut self,
        indices: impl Into<Indices<'a>>,
    ) -> Result<(), GraphicsError> {
        let indices = indices.into();
        if indices.is_empty() {
            self.clear_index_buffer();
            return Ok(());
        }
        match &mut self.index_buffer {
            Some(index_buffer) => index_buffer.update(indices),
            None => {
                self.index_buffer = Some(IndexBuffer::new(
                    self.context.clone(),
                    indices,
                    Some(&self.label),
                )?);
            }
        }
        Ok(())
    }

    /// Return to array draws, releasing the index buffer.
    pub fn clear_index_buffer(&mut self) {
        self.index_buffer = None;
    }

    /// Number of indices drawn per batch, if an index buffer is set.
    pub fn index_count(&self) -> Option<u32> {
        self.index_buffer.as_ref().map(IndexBuffer::count)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Vertices committed since the last `begin`.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// The attribute set, Position included.
    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    /// The vertex layout.
    pub fn layout(&self) -> VertexLayout {
        self.strategy.layout()
    }

    /// Topology of the current or last batch.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Whether the builder is between `begin` and `end`.
    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    /// Attribute offsets for the vertices staged so far.
    pub fn offsets(&self) -> LayoutOffsetMap {
        self.strategy.plan_offsets(self.vertex_count)
    }

    /// Number of GPU vertex buffers owned.
    pub fn buffer_count(&self) -> usize {
        self.strategy.buffer_count()
    }

    /// Staged values of `attribute`, vertex after vertex.
    ///
    /// Empty when the attribute is not in the set.
    pub fn staged(&self, attribute: Attribute) -> Vec<f32> {
        self.strategy.staged(attribute)
    }

    /// The staged interleaved stream (interleaved layout only).
    pub fn staged_stream(&self) -> Option<&[f32]> {
        self.strategy.stream()
    }

    /// Get the debug label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the rendering context.
    pub fn context(&self) -> &Arc<dyn RenderContext> {
        &self.context
    }

    /// Get the shader program.
    pub fn program(&self) -> Option<&Arc<ShaderProgram>> {
        self.program.as_ref()
    }

    /// Replace the shader program.
    pub fn set_program(&mut self, program: Option<Arc<ShaderProgram>>) {
        self.program = program;
    }

    /// Get the texture.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    /// Replace the texture.
    pub fn set_texture(&mut self, texture: Option<Arc<Texture>>) {
        self.texture = texture;
    }

    /// Get the uniform names.
    pub fn uniforms(&self) -> &UniformNames {
        &self.uniforms
    }

    /// Replace the uniform names.
    pub fn set_uniforms(&mut self, uniforms: UniformNames) {
        self.uniforms = uniforms;
    }
}

impl std::fmt::Debug for ImmediateMeshBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmediateMeshBuilder")
            .field("label", &self.label)
            .field("attributes", &self.attributes)
            .field("layout", &self.strategy.layout())
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertex_count)
            .field("accumulating", &self.accumulating)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    fn builder(attributes: AttributeSet) -> ImmediateMeshBuilder {
        let context: Arc<dyn RenderContext> = Arc::new(DummyBackend::new());
        ImmediateMeshBuilder::new(context, ImmediateMeshDescriptor::new(attributes)).unwrap()
    }

    #[test]
    fn test_position_is_forced() {
        let builder = builder(AttributeSet::COLOR);
        assert_eq!(builder.attributes(), AttributeSet::POSITION_COLOR);
    }

    #[test]
    fn test_vertex_outside_begin_is_ignored() {
        let mut builder = builder(AttributeSet::POSITION);
        builder.vertex(1.0, 2.0, 3.0);
        assert_eq!(builder.vertex_count(), 0);
        assert!(builder.staged(Attribute::Position).is_empty());
    }

    #[test]
    fn test_pending_values_stick() {
        let mut builder = builder(AttributeSet::POSITION_COLOR);
        builder.begin(PrimitiveTopology::LineList);
        builder.color3(1.0, 0.0, 0.0).vertex(0.0, 0.0, 0.0).vertex(1.0, 0.0, 0.0);
        assert_eq!(
            builder.staged(Attribute::Color),
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]
        );
        builder.end(&Mat4::identity());

        // the color survives into the next frame
        builder.begin(PrimitiveTopology::PointList).vertex(0.0, 0.0, 0.0);
        assert_eq!(builder.staged(Attribute::Color), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_begin_discards_unfinished_batch() {
        let mut builder = builder(AttributeSet::POSITION);
        builder.begin(PrimitiveTopology::TriangleList).vertex(0.0, 0.0, 0.0);
        builder.begin(PrimitiveTopology::LineStrip);
        assert_eq!(builder.vertex_count(), 0);
        assert_eq!(builder.topology(), PrimitiveTopology::LineStrip);
        assert!(builder.is_accumulating());
    }

    #[test]
    fn test_end_returns_to_idle_without_program() {
        let mut builder = builder(AttributeSet::POSITION);
        builder.begin(PrimitiveTopology::TriangleList).vertex(0.0, 0.0, 0.0);
        builder.end(&Mat4::identity());
        assert!(!builder.is_accumulating());
        assert_eq!(builder.vertex_count(), 1);
    }

    #[test]
    fn test_debug() {
        let builder = builder(AttributeSet::POSITION);
        let debug = format!("{builder:?}");
        assert!(debug.contains("immediate_mesh"));
        assert!(debug.contains("Interleaved"));
    }
}
