//! Buffer types and descriptors.

use bitflags::bitflags;
use glimmer_core::mesh::Attribute;

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be used as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be used as an index buffer.
        const INDEX = 1 << 1;
        /// Contents are respecified often (every frame for immediate meshes).
        const DYNAMIC = 1 << 2;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::VERTEX
    }
}

impl BufferUsage {
    /// The bind point a buffer with these flags is attached to.
    pub fn target(self) -> BufferTarget {
        if self.contains(Self::INDEX) {
            BufferTarget::Index
        } else {
            BufferTarget::Vertex
        }
    }
}

/// Binding point for a buffer (`ARRAY_BUFFER` / `ELEMENT_ARRAY_BUFFER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferTarget {
    /// Vertex attribute data.
    #[default]
    Vertex,
    /// Element indices.
    Index,
}

/// Descriptor for creating a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BufferDescriptor {
    /// Debug label for the buffer.
    pub label: Option<String>,
    /// Size in bytes hint; the real size follows the uploads.
    pub size: u64,
    /// Usage flags.
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// Create a new buffer descriptor.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The bind point derived from the usage flags.
    pub fn target(&self) -> BufferTarget {
        self.usage.target()
    }
}

/// Float vertex attribute pointer into the currently bound vertex buffer.
///
/// Values are never normalized; all attributes are `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexPointer {
    /// Shader attribute location.
    pub location: u32,
    /// Number of `f32` components (1 to 4).
    pub components: u32,
    /// Byte distance between consecutive values.
    pub stride: u32,
    /// Byte offset of the first value.
    pub offset: u32,
}

impl VertexPointer {
    /// Pointer for `attribute` at `offset` with the given `stride`.
    pub fn for_attribute(attribute: Attribute, stride: u32, offset: u32) -> Self {
        Self {
            location: attribute.location(),
            components: attribute.component_count(),
            stride,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_descriptor() {
        let desc = BufferDescriptor::new(1024, BufferUsage::VERTEX | BufferUsage::DYNAMIC)
            .with_label("immediate_vertices");
        assert_eq!(desc.size, 1024);
        assert_eq!(desc.label.as_deref(), Some("immediate_vertices"));
        assert_eq!(desc.target(), BufferTarget::Vertex);
    }

    #[test]
    fn test_usage_target() {
        assert_eq!(BufferUsage::INDEX.target(), BufferTarget::Index);
        assert_eq!(BufferUsage::default().target(), BufferTarget::Vertex);
    }

    #[test]
    fn test_pointer_for_attribute() {
        let pointer = VertexPointer::for_attribute(Attribute::Color, 28, 12);
        assert_eq!(
            pointer,
            VertexPointer {
                location: 5,
                components: 4,
                stride: 28,
                offset: 12,
            }
        );
    }
}
