//! GPU buffer resources.

use std::sync::Arc;

use glimmer_core::mesh::{IndexFormat, Indices, PrimitiveTopology};

use crate::backend::{GpuBuffer, RenderContext};
use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, BufferTarget, BufferUsage};

/// A GPU buffer object.
///
/// A buffer is owned by exactly one mesh or builder and destroyed through its
/// context when dropped. Every upload binds it to its target first.
///
/// # Example
///
/// ```ignore
/// let mut buffer = Buffer::new(context, BufferDescriptor::new(0, BufferUsage::VERTEX))?;
/// buffer.upload(bytemuck::cast_slice(&[0.0f32, 1.0, 2.0]));
/// assert_eq!(buffer.size(), 12);
/// ```
pub struct Buffer {
    context: Arc<dyn RenderContext>,
    gpu: GpuBuffer,
    descriptor: BufferDescriptor,
}

impl Buffer {
    /// Create an empty buffer through `context`.
    pub fn new(
        context: Arc<dyn RenderContext>,
        descriptor: BufferDescriptor,
    ) -> Result<Self, GraphicsError> {
        let gpu = context.create_buffer(&descriptor)?;
        log::debug!("Created buffer {:?} on {}", descriptor.label, context.name());
        Ok(Self {
            context,
            gpu,
            descriptor,
        })
    }

    /// Get the context the buffer lives in.
    pub fn context(&self) -> &Arc<dyn RenderContext> {
        &self.context
    }

    /// Get the backend handle.
    pub fn gpu(&self) -> &GpuBuffer {
        &self.gpu
    }

    /// Get the buffer descriptor.
    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    /// Size in bytes of the last upload or allocation.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Get the buffer label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// The bind point for this buffer.
    pub fn target(&self) -> BufferTarget {
        self.descriptor.target()
    }

    /// Bind to the buffer's target.
    pub fn bind(&self) {
        self.context.bind_buffer(self.target(), Some(&self.gpu));
    }

    /// Replace the whole contents with `data`.
    pub fn upload(&mut self, data: &[u8]) {
        self.bind();
        self.context
            .buffer_data(self.target(), data, self.descriptor.usage);
        self.descriptor.size = data.len() as u64;
    }

    /// Reallocate to `size` bytes, discarding the contents.
    pub fn allocate(&mut self, size: u64) {
        self.bind();
        self.context
            .allocate_buffer(self.target(), size, self.descriptor.usage);
        self.descriptor.size = size;
    }

    /// Overwrite `data.len()` bytes at `offset` without reallocating.
    pub fn upload_at(&self, offset: u64, data: &[u8]) {
        if offset + data.len() as u64 > self.descriptor.size {
            log::warn!(
                "Buffer {:?}: write {}..{} past size {}",
                self.descriptor.label,
                offset,
                offset + data.len() as u64,
                self.descriptor.size
            );
        }
        self.bind();
        self.context.buffer_sub_data(self.target(), offset, data);
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        log::debug!("Destroying buffer {:?}", self.descriptor.label);
        self.context.destroy_buffer(&self.gpu);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

/// An index buffer together with the count and format it was filled with.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: Buffer,
    count: u32,
    format: IndexFormat,
    max_index: Option<u32>,
}

impl IndexBuffer {
    /// Create an index buffer and upload `indices` into it.
    pub fn new(
        context: Arc<dyn RenderContext>,
        indices: Indices<'_>,
        label: Option<&str>,
    ) -> Result<Self, GraphicsError> {
        let size = indices.as_bytes().len() as u64;
        let mut descriptor = BufferDescriptor::new(size, BufferUsage::INDEX);
        descriptor.label = label.map(|label| format!("{label}_indices"));
        let mut index_buffer = Self {
            buffer: Buffer::new(context, descriptor)?,
            count: 0,
            format: indices.format(),
            max_index: None,
        };
        index_buffer.update(indices);
        Ok(index_buffer)
    }

    /// Replace the indices, switching format if needed.
    pub fn update(&mut self, indices: Indices<'_>) {
        self.buffer.upload(indices.as_bytes());
        self.count = indices.len() as u32;
        self.format = indices.format();
        self.max_index = indices.max_index();
    }

    /// Number of indices recorded at the last upload.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Index format recorded at the last upload.
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// Largest index recorded at the last upload.
    pub fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    /// Whether every index addresses one of `vertex_count` vertices.
    pub fn fits(&self, vertex_count: u32) -> bool {
        self.max_index.map_or(true, |max| max < vertex_count)
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Bind and issue an indexed draw over every recorded index.
    pub fn draw(&self, topology: PrimitiveTopology) {
        self.buffer.bind();
        self.buffer
            .context()
            .draw_elements(topology, self.count, self.format, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    fn dummy() -> (Arc<DummyBackend>, Arc<dyn RenderContext>) {
        let backend = Arc::new(DummyBackend::new());
        let context: Arc<dyn RenderContext> = backend.clone();
        (backend, context)
    }

    #[test]
    fn test_buffer_debug() {
        let (_, context) = dummy();
        let desc = BufferDescriptor::new(1024, BufferUsage::VERTEX).with_label("quad");
        let buffer = Buffer::new(context, desc).unwrap();
        let debug = format!("{:?}", buffer);
        assert!(debug.contains("Buffer"));
        assert!(debug.contains("1024"));
        assert!(debug.contains("quad"));
    }

    #[test]
    fn test_buffer_destroyed_on_drop() {
        let (backend, context) = dummy();
        let buffer = Buffer::new(context, BufferDescriptor::new(0, BufferUsage::VERTEX)).unwrap();
        assert_eq!(backend.live_buffer_count(), 1);
        drop(buffer);
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn test_upload_tracks_size() {
        let (backend, context) = dummy();
        let mut buffer =
            Buffer::new(context, BufferDescriptor::new(0, BufferUsage::VERTEX)).unwrap();
        buffer.upload(&[1, 2, 3]);
        assert_eq!(buffer.size(), 3);
        assert_eq!(backend.buffer_contents(buffer.gpu()), Some(vec![1, 2, 3]));

        buffer.allocate(8);
        buffer.upload_at(4, &[5, 6]);
        assert_eq!(buffer.size(), 8);
        assert_eq!(
            backend.buffer_contents(buffer.gpu()),
            Some(vec![0, 0, 0, 0, 5, 6, 0, 0])
        );
    }

    #[test]
    fn test_index_buffer() {
        let (backend, context) = dummy();
        let mut indices =
            IndexBuffer::new(context, Indices::U16(&[0, 1, 2]), Some("tri")).unwrap();
        assert_eq!(indices.count(), 3);
        assert_eq!(indices.max_index(), Some(2));
        assert!(indices.fits(3));
        assert!(!indices.fits(2));
        assert_eq!(indices.format(), IndexFormat::Uint16);
        assert_eq!(indices.buffer().label(), Some("tri_indices"));
        assert_eq!(indices.buffer().target(), BufferTarget::Index);

        indices.update(Indices::U32(&[0, 1, 2, 2, 3, 0]));
        assert_eq!(indices.count(), 6);
        assert_eq!(indices.format(), IndexFormat::Uint32);
        assert_eq!(indices.buffer().size(), 24);
        assert_eq!(indices.max_index(), Some(3));

        indices.draw(PrimitiveTopology::TriangleList);
        assert_eq!(backend.draw_calls().len(), 1);
    }
}
