//! Per-layout staging, upload and pointer binding.
//!
//! Each [`VertexLayout`] maps to one [`LayoutStrategy`] chosen when the
//! builder is created. Strategies own the CPU staging buffers and the GPU
//! vertex buffers for their layout.

use std::sync::Arc;

use glimmer_core::mesh::{
    plan_interleaved, plan_sequenced, plan_separated, vertex_byte_stride, Attribute,
    AttributeSet, GrowableBuffer, LayoutOffsetMap, VertexLayout,
};

use crate::backend::RenderContext;
use crate::error::GraphicsError;
use crate::resources::Buffer;
use crate::types::{BufferDescriptor, BufferUsage, VertexPointer};

/// Attribute values set since the last vertex, plus the position being committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord0: [f32; 2],
    pub tex_coord1: [f32; 2],
    pub color: [f32; 4],
    pub tangent: [f32; 3],
}

impl Default for PendingVertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            tex_coord0: [0.0; 2],
            tex_coord1: [0.0; 2],
            color: [1.0; 4],
            tangent: [1.0, 0.0, 0.0],
        }
    }
}

impl PendingVertex {
    pub fn values(&self, attribute: Attribute) -> &[f32] {
        match attribute {
            Attribute::Position => &self.position,
            Attribute::TexCoord0 => &self.tex_coord0,
            Attribute::TexCoord1 => &self.tex_coord1,
            Attribute::Normal => &self.normal,
            Attribute::Tangent => &self.tangent,
            Attribute::Color => &self.color,
        }
    }
}

/// Fail unless `attributes` can describe a drawable vertex.
pub(crate) fn validate_attributes(attributes: AttributeSet) -> Result<(), GraphicsError> {
    if !attributes.has(Attribute::Position) {
        return Err(GraphicsError::Configuration(format!(
            "attribute set {attributes:?} lacks Position"
        )));
    }
    if vertex_byte_stride(attributes) == 0 {
        return Err(GraphicsError::Configuration(
            "vertex stride computed as 0".to_string(),
        ));
    }
    Ok(())
}

/// Pointers for an interleaved record described by `offsets`.
pub(crate) fn interleaved_pointers(offsets: &LayoutOffsetMap) -> Vec<VertexPointer> {
    offsets
        .iter()
        .map(|(attribute, offset)| {
            VertexPointer::for_attribute(attribute, offsets.stride(), offset)
        })
        .collect()
}

/// Disable the arrays of every attribute outside `attributes`.
pub(crate) fn disable_absent_attributes(context: &dyn RenderContext, attributes: AttributeSet) {
    for attribute in Attribute::ALL {
        if !attributes.has(attribute) {
            context.disable_vertex_attrib_array(attribute.location());
        }
    }
}

/// Layout-specific half of an immediate mesh builder.
pub(crate) trait LayoutStrategy {
    fn layout(&self) -> VertexLayout;

    /// Number of GPU vertex buffers owned.
    fn buffer_count(&self) -> usize;

    /// Offsets for a frame of `vertex_count` vertices.
    fn plan_offsets(&self, vertex_count: u32) -> LayoutOffsetMap;

    /// Drop staged vertices, keeping capacity.
    fn clear(&mut self);

    /// Append one vertex.
    fn stage(&mut self, vertex: &PendingVertex);

    /// Staged floats of one attribute, vertex after vertex.
    fn staged(&self, attribute: Attribute) -> Vec<f32>;

    /// The interleaved stream, for layouts that keep one.
    fn stream(&self) -> Option<&[f32]> {
        None
    }

    /// Upload the staged vertices.
    fn upload(&mut self, vertex_count: u32);

    /// Bind the vertex buffers and point every attribute into them.
    fn bind_pointers(&self, context: &dyn RenderContext, vertex_count: u32);
}

/// Create the strategy for `layout`, allocating its GPU buffers.
pub(crate) fn create_strategy(
    layout: VertexLayout,
    context: &Arc<dyn RenderContext>,
    attributes: AttributeSet,
    initial_capacity: usize,
    label: &str,
) -> Result<Box<dyn LayoutStrategy>, GraphicsError> {
    let strategy: Box<dyn LayoutStrategy> = match layout {
        VertexLayout::Interleaved => Box::new(InterleavedStrategy::new(
            context,
            attributes,
            initial_capacity,
            label,
        )?),
        VertexLayout::Sequenced => Box::new(SequencedStrategy::new(
            context,
            attributes,
            initial_capacity,
            label,
        )?),
        VertexLayout::Separated => Box::new(SeparatedStrategy::new(
            context,
            attributes,
            initial_capacity,
            label,
        )?),
    };
    Ok(strategy)
}

fn vertex_buffer(
    context: &Arc<dyn RenderContext>,
    label: String,
) -> Result<Buffer, GraphicsError> {
    Buffer::new(
        context.clone(),
        BufferDescriptor::new(0, BufferUsage::VERTEX | BufferUsage::DYNAMIC).with_label(label),
    )
}

// ============================================================================
// Interleaved
// ============================================================================

/// One staging stream, one buffer, pointers fixed at construction.
struct InterleavedStrategy {
    offsets: LayoutOffsetMap,
    pointers: Vec<VertexPointer>,
    attributes: AttributeSet,
    staging: GrowableBuffer<f32>,
    buffer: Buffer,
}

impl InterleavedStrategy {
    fn new(
        context: &Arc<dyn RenderContext>,
        attributes: AttributeSet,
        initial_capacity: usize,
        label: &str,
    ) -> Result<Self, GraphicsError> {
        let offsets = plan_interleaved(attributes);
        let floats = initial_capacity * attributes.components_per_vertex() as usize;
        Ok(Self {
            pointers: interleaved_pointers(&offsets),
            offsets,
            attributes,
            staging: GrowableBuffer::with_capacity(floats),
            buffer: vertex_buffer(context, format!("{label}_interleaved"))?,
        })
    }
}

impl LayoutStrategy for InterleavedStrategy {
    fn layout(&self) -> VertexLayout {
        VertexLayout::Interleaved
    }

    fn buffer_count(&self) -> usize {
        1
    }

    fn plan_offsets(&self, _vertex_count: u32) -> LayoutOffsetMap {
        self.offsets
    }

    fn clear(&mut self) {
        self.staging.clear();
    }

    fn stage(&mut self, vertex: &PendingVertex) {
        for attribute in self.attributes.attributes() {
            self.staging.extend_from_slice(vertex.values(attribute));
        }
    }

    fn staged(&self, attribute: Attribute) -> Vec<f32> {
        let Some(offset) = self.offsets.offset(attribute) else {
            return Vec::new();
        };
        let stride = (self.offsets.stride() / 4) as usize;
        let start = (offset / 4) as usize;
        let end = start + attribute.component_count() as usize;
        self.staging
            .as_slice()
            .chunks_exact(stride)
            .flat_map(|record| record[start..end].iter().copied())
            .collect()
    }

    fn stream(&self) -> Option<&[f32]> {
        Some(self.staging.as_slice())
    }

    fn upload(&mut self, _vertex_count: u32) {
        self.buffer.upload(self.staging.as_bytes());
    }

    fn bind_pointers(&self, context: &dyn RenderContext, _vertex_count: u32) {
        self.buffer.bind();
        for pointer in &self.pointers {
            context.vertex_attrib_pointer(pointer);
        }
    }
}

// ============================================================================
// Sequenced
// ============================================================================

/// One staging region per attribute, packed back to back into one buffer.
///
/// Region offsets depend on the vertex count, so the buffer is reallocated
/// and the pointers recomputed every frame.
struct SequencedStrategy {
    attributes: AttributeSet,
    regions: Vec<(Attribute, GrowableBuffer<f32>)>,
    buffer: Buffer,
}

impl SequencedStrategy {
    fn new(
        context: &Arc<dyn RenderContext>,
        attributes: AttributeSet,
        initial_capacity: usize,
        label: &str,
    ) -> Result<Self, GraphicsError> {
        let regions = attributes
            .attributes()
            .map(|attribute| {
                let floats = initial_capacity * attribute.component_count() as usize;
                (attribute, GrowableBuffer::with_capacity(floats))
            })
            .collect();
        Ok(Self {
            attributes,
            regions,
            buffer: vertex_buffer(context, format!("{label}_sequenced"))?,
        })
    }
}

impl LayoutStrategy for SequencedStrategy {
    fn layout(&self) -> VertexLayout {
        VertexLayout::Sequenced
    }

    fn buffer_count(&self) -> usize {
        1
    }

    fn plan_offsets(&self, vertex_count: u32) -> LayoutOffsetMap {
        plan_sequenced(self.attributes, vertex_count)
    }

    fn clear(&mut self) {
        for (_, region) in &mut self.regions {
            region.clear();
        }
    }

    fn stage(&mut self, vertex: &PendingVertex) {
        for (attribute, region) in &mut self.regions {
            region.extend_from_slice(vertex.values(*attribute));
        }
    }

    fn staged(&self, attribute: Attribute) -> Vec<f32> {
        self.regions
            .iter()
            .find(|(candidate, _)| *candidate == attribute)
            .map(|(_, region)| region.as_slice().to_vec())
            .unwrap_or_default()
    }

    fn upload(&mut self, vertex_count: u32) {
        let offsets = self.plan_offsets(vertex_count);
        self.buffer.allocate(offsets.byte_length() as u64);
        for (attribute, region) in &self.regions {
            if let Some(offset) = offsets.offset(*attribute) {
                self.buffer.upload_at(offset as u64, region.as_bytes());
            }
        }
    }

    fn bind_pointers(&self, context: &dyn RenderContext, vertex_count: u32) {
        let offsets = self.plan_offsets(vertex_count);
        self.buffer.bind();
        for (attribute, offset) in offsets.iter() {
            let pointer = VertexPointer::for_attribute(attribute, attribute.byte_size(), offset);
            context.vertex_attrib_pointer(&pointer);
        }
    }
}

// ============================================================================
// Separated
// ============================================================================

struct AttributeStream {
    pointer: VertexPointer,
    attribute: Attribute,
    staging: GrowableBuffer<f32>,
    buffer: Buffer,
}

/// One staging buffer and one GPU buffer per attribute.
struct SeparatedStrategy {
    attributes: AttributeSet,
    streams: Vec<AttributeStream>,
}

impl SeparatedStrategy {
    fn new(
        context: &Arc<dyn RenderContext>,
        attributes: AttributeSet,
        initial_capacity: usize,
        label: &str,
    ) -> Result<Self, GraphicsError> {
        let offsets = plan_separated(attributes);
        let mut streams = Vec::with_capacity(offsets.len());
        for (attribute, offset) in offsets.iter() {
            let floats = initial_capacity * attribute.component_count() as usize;
            streams.push(AttributeStream {
                pointer: VertexPointer::for_attribute(attribute, attribute.byte_size(), offset),
                attribute,
                staging: GrowableBuffer::with_capacity(floats),
                buffer: vertex_buffer(context, format!("{label}_{}", attribute.name()))?,
            });
        }
        Ok(Self {
            attributes,
            streams,
        })
    }
}

impl LayoutStrategy for SeparatedStrategy {
    fn layout(&self) -> VertexLayout {
        VertexLayout::Separated
    }

    fn buffer_count(&self) -> usize {
        self.streams.len()
    }

    fn plan_offsets(&self, _vertex_count: u32) -> LayoutOffsetMap {
        plan_separated(self.attributes)
    }

    fn clear(&mut self) {
        for stream in &mut self.streams {
            stream.staging.clear();
        }
    }

    fn stage(&mut self, vertex: &PendingVertex) {
        for stream in &mut self.streams {
            stream
                .staging
                .extend_from_slice(vertex.values(stream.attribute));
        }
    }

    fn staged(&self, attribute: Attribute) -> Vec<f32> {
        self.streams
            .iter()
            .find(|stream| stream.attribute == attribute)
            .map(|stream| stream.staging.as_slice().to_vec())
            .unwrap_or_default()
    }

    fn upload(&mut self, _vertex_count: u32) {
        for stream in &mut self.streams {
            stream.buffer.upload(stream.staging.as_bytes());
        }
    }

    fn bind_pointers(&self, context: &dyn RenderContext, _vertex_count: u32) {
        for stream in &self.streams {
            stream.buffer.bind();
            context.vertex_attrib_pointer(&stream.pointer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    fn context() -> Arc<dyn RenderContext> {
        Arc::new(DummyBackend::new())
    }

    fn stage_triangle(strategy: &mut dyn LayoutStrategy) {
        let mut vertex = PendingVertex::default();
        for (i, x) in [-0.5f32, 0.5, 0.0].into_iter().enumerate() {
            vertex.position = [x, i as f32, 0.0];
            vertex.color = [i as f32, 0.0, 0.0, 1.0];
            strategy.stage(&vertex);
        }
    }

    #[test]
    fn test_pending_defaults() {
        let vertex = PendingVertex::default();
        assert_eq!(vertex.values(Attribute::Color), &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(vertex.values(Attribute::Normal), &[0.0, 0.0, 1.0]);
        assert_eq!(vertex.values(Attribute::Tangent), &[1.0, 0.0, 0.0]);
        assert_eq!(vertex.values(Attribute::TexCoord1), &[0.0, 0.0]);
    }

    #[test]
    fn test_validate_attributes() {
        assert!(validate_attributes(AttributeSet::POSITION).is_ok());
        assert!(matches!(
            validate_attributes(AttributeSet::COLOR),
            Err(GraphicsError::Configuration(_))
        ));
        assert!(validate_attributes(AttributeSet::empty()).is_err());
    }

    #[test]
    fn test_staged_matches_across_layouts() {
        let context = context();
        let attributes = AttributeSet::POSITION_COLOR;
        for layout in [
            VertexLayout::Interleaved,
            VertexLayout::Sequenced,
            VertexLayout::Separated,
        ] {
            let mut strategy = create_strategy(layout, &context, attributes, 4, "test").unwrap();
            stage_triangle(strategy.as_mut());
            assert_eq!(
                strategy.staged(Attribute::Color),
                vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 1.0],
                "{layout:?}"
            );
            assert_eq!(strategy.staged(Attribute::Position).len(), 9, "{layout:?}");
            assert!(strategy.staged(Attribute::Normal).is_empty(), "{layout:?}");
        }
    }

    #[test]
    fn test_buffer_counts() {
        let context = context();
        let attributes = AttributeSet::POSITION_NORMAL_UV;
        let interleaved =
            create_strategy(VertexLayout::Interleaved, &context, attributes, 0, "a").unwrap();
        let sequenced =
            create_strategy(VertexLayout::Sequenced, &context, attributes, 0, "b").unwrap();
        let separated =
            create_strategy(VertexLayout::Separated, &context, attributes, 0, "c").unwrap();
        assert_eq!(interleaved.buffer_count(), 1);
        assert_eq!(sequenced.buffer_count(), 1);
        assert_eq!(separated.buffer_count(), 3);
        assert_eq!(
            separated.buffer_count(),
            VertexLayout::Separated.buffer_count(attributes)
        );
    }

    #[test]
    fn test_clear_keeps_layout() {
        let context = context();
        let mut strategy = create_strategy(
            VertexLayout::Interleaved,
            &context,
            AttributeSet::POSITION,
            0,
            "clear",
        )
        .unwrap();
        stage_triangle(strategy.as_mut());
        assert_eq!(strategy.stream().map(<[f32]>::len), Some(9));
        strategy.clear();
        assert_eq!(strategy.stream().map(<[f32]>::len), Some(0));
    }
}
