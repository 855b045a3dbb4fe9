//! Primitive and index types shared by immediate and static meshes.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format (u16 or u32)
//! - [`Indices`] - Borrowed index data of either format

/// Primitive topology describing how vertices are assembled into primitives.
///
/// These are the GL primitive modes, including the loop and fan variants
/// legacy immediate-mode code relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// A line strip closed back to the first vertex.
    LineLoop,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Triangles sharing the first vertex.
    TriangleFan,
}

impl PrimitiveTopology {
    /// Number of primitives `count` vertices (or indices) assemble into.
    pub fn primitive_count(&self, count: u32) -> u32 {
        match self {
            Self::PointList => count,
            Self::LineList => count / 2,
            Self::LineStrip => count.saturating_sub(1),
            Self::LineLoop => {
                if count < 2 {
                    0
                } else {
                    count
                }
            }
            Self::TriangleList => count / 3,
            Self::TriangleStrip | Self::TriangleFan => count.saturating_sub(2),
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Borrowed index data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indices<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl Indices<'_> {
    /// The index format.
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    /// Whether there are no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }

    /// Largest index value, if any.
    pub fn max_index(&self) -> Option<u32> {
        match self {
            Self::U16(indices) => indices.iter().max().map(|&i| i as u32),
            Self::U32(indices) => indices.iter().max().copied(),
        }
    }
}

impl<'a> From<&'a [u16]> for Indices<'a> {
    fn from(indices: &'a [u16]) -> Self {
        Self::U16(indices)
    }
}

impl<'a> From<&'a [u32]> for Indices<'a> {
    fn from(indices: &'a [u32]) -> Self {
        Self::U32(indices)
    }
}

impl<'a> From<&'a Vec<u16>> for Indices<'a> {
    fn from(indices: &'a Vec<u16>) -> Self {
        Self::U16(indices)
    }
}

impl<'a> From<&'a Vec<u32>> for Indices<'a> {
    fn from(indices: &'a Vec<u32>) -> Self {
        Self::U32(indices)
    }
}

impl<'a, const N: usize> From<&'a [u16; N]> for Indices<'a> {
    fn from(indices: &'a [u16; N]) -> Self {
        Self::U16(indices)
    }
}

impl<'a, const N: usize> From<&'a [u32; N]> for Indices<'a> {
    fn from(indices: &'a [u32; N]) -> Self {
        Self::U32(indices)
    }
}
