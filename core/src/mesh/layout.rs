//! Vertex layout planning.
//!
//! Given an [`AttributeSet`], these functions compute where each attribute
//! lives in memory for one of three layouts:
//!
//! - **Interleaved**: one buffer, all attributes of a vertex stored together.
//!   `stride == byte_length` of one vertex record.
//! - **Sequenced**: one buffer, one contiguous region per attribute covering
//!   every vertex. Offsets depend on the vertex count.
//! - **Separated**: one buffer per attribute, every offset is 0.
//!
//! Attributes are always visited in [`Attribute::LAYOUT_ORDER`].
//!
//! # Example
//!
//! ```
//! use glimmer_core::mesh::{plan_interleaved, Attribute, AttributeSet};
//!
//! let offsets = plan_interleaved(AttributeSet::POSITION | AttributeSet::COLOR);
//! assert_eq!(offsets.offset(Attribute::Position), Some(0));
//! assert_eq!(offsets.offset(Attribute::Color), Some(12));
//! assert_eq!(offsets.stride(), 28);
//! ```

use super::attribute::{Attribute, AttributeSet};

/// Physical arrangement of vertex attributes in GPU buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexLayout {
    /// All attributes of one vertex contiguous, vertex after vertex.
    #[default]
    Interleaved,
    /// One region per attribute, region after region, in a single buffer.
    Sequenced,
    /// One buffer per attribute.
    Separated,
}

impl VertexLayout {
    /// Plan offsets for this layout.
    ///
    /// `vertex_count` only matters for [`VertexLayout::Sequenced`].
    pub fn plan(self, attributes: AttributeSet, vertex_count: u32) -> LayoutOffsetMap {
        match self {
            Self::Interleaved => plan_interleaved(attributes),
            Self::Sequenced => plan_sequenced(attributes, vertex_count),
            Self::Separated => plan_separated(attributes),
        }
    }

    /// Number of GPU vertex buffers the layout needs.
    pub fn buffer_count(self, attributes: AttributeSet) -> usize {
        match self {
            Self::Interleaved | Self::Sequenced => 1,
            Self::Separated => attributes.attribute_count(),
        }
    }
}

/// Byte offset of each present attribute plus the synthetic stride and total length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayoutOffsetMap {
    offsets: [Option<u32>; Attribute::COUNT],
    stride: u32,
    byte_length: u32,
}

impl LayoutOffsetMap {
    /// Offset of `attribute`, or `None` if it is not part of the layout.
    pub fn offset(&self, attribute: Attribute) -> Option<u32> {
        self.offsets[attribute.index()]
    }

    /// Byte distance between consecutive vertices.
    ///
    /// Zero for separated layouts, where each buffer is tightly packed.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Total bytes described by the map (zero for separated layouts).
    pub fn byte_length(&self) -> u32 {
        self.byte_length
    }

    /// Present attributes and their offsets, in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u32)> + '_ {
        Attribute::LAYOUT_ORDER
            .into_iter()
            .filter_map(move |attribute| self.offset(attribute).map(|offset| (attribute, offset)))
    }

    /// Number of attributes in the map.
    pub fn len(&self) -> usize {
        self.offsets.iter().filter(|offset| offset.is_some()).count()
    }

    /// Whether the map holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bytes of one vertex across every present attribute.
pub fn vertex_byte_stride(attributes: AttributeSet) -> u32 {
    attributes.attributes().map(Attribute::byte_size).sum()
}

/// Offsets for an interleaved vertex record.
pub fn plan_interleaved(attributes: AttributeSet) -> LayoutOffsetMap {
    let mut map = LayoutOffsetMap::default();
    let mut offset = 0;
    for attribute in attributes.attributes() {
        map.offsets[attribute.index()] = Some(offset);
        offset += attribute.byte_size();
    }
    map.stride = offset;
    map.byte_length = offset;
    map
}

/// Offsets for a sequenced buffer holding `vertex_count` vertices.
pub fn plan_sequenced(attributes: AttributeSet, vertex_count: u32) -> LayoutOffsetMap {
    let mut map = LayoutOffsetMap::default();
    let mut offset = 0;
    for attribute in attributes.attributes() {
        map.offsets[attribute.index()] = Some(offset);
        offset += attribute.byte_size() * vertex_count;
    }
    // byte_length / vertex_count, without dividing by zero for empty frames
    map.stride = vertex_byte_stride(attributes);
    map.byte_length = offset;
    map
}

/// Offsets for separated buffers (all zero).
pub fn plan_separated(attributes: AttributeSet) -> LayoutOffsetMap {
    let mut map = LayoutOffsetMap::default();
    for attribute in attributes.attributes() {
        map.offsets[attribute.index()] = Some(0);
    }
    map
}
