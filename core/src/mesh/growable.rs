//! Append-only staging buffers for per-frame vertex streaming.
//!
//! A [`GrowableBuffer`] keeps its backing storage across frames: `clear` only
//! resets the logical length, and growth doubles the capacity, so a builder
//! that streams a similar number of vertices every frame stops allocating
//! after the first few frames.

use std::ops::Range;

use bytemuck::Pod;

use crate::error::CoreError;

/// A typed, append-only buffer with doubling growth.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowableBuffer<T: Pod> {
    /// Backing storage; `storage.len()` is the capacity.
    storage: Vec<T>,
    len: usize,
}

impl<T: Pod> GrowableBuffer<T> {
    /// Smallest capacity allocated on first growth.
    pub const MIN_CAPACITY: usize = 8;

    /// Create an empty buffer without allocating.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty buffer with `capacity` zeroed slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![T::zeroed(); capacity],
            len: 0,
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements that fit before the next growth.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Append one value, doubling the capacity when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.storage.len() {
            self.grow();
        }
        self.storage[self.len] = value;
        self.len += 1;
    }

    /// Append every value of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        for value in values {
            self.push(*value);
        }
    }

    fn grow(&mut self) {
        let new_capacity = (self.storage.len() * 2).max(Self::MIN_CAPACITY);
        log::trace!(
            "GrowableBuffer: growing {} -> {} elements",
            self.storage.len(),
            new_capacity
        );
        self.storage.resize(new_capacity, T::zeroed());
    }

    /// Reset the logical length to zero, keeping the storage.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Bounds-checked read.
    pub fn at(&self, index: usize) -> Result<T, CoreError> {
        if index >= self.len {
            return Err(CoreError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.storage[index])
    }

    /// The live region.
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.len]
    }

    /// A window into the live region, clamped to its end.
    pub fn view(&self, range: Range<usize>) -> &[T] {
        let end = range.end.min(self.len);
        let start = range.start.min(end);
        &self.storage[start..end]
    }

    /// The live region reinterpreted as bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}

impl<T: Pod> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(GrowableBuffer<f32>: Send, Sync);
