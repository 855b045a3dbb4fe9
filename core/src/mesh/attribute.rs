//! Vertex attributes and attribute sets.
//!
//! An [`AttributeSet`] is a bitmask of [`Attribute`]s. The bit values, component
//! counts and binding locations are fixed so that shaders can bind attributes
//! by location without reflection.

use bitflags::bitflags;

/// A per-vertex quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    /// Vertex position (3 floats). Always present.
    Position,
    /// First texture coordinate set (2 floats).
    TexCoord0,
    /// Second texture coordinate set (2 floats).
    TexCoord1,
    /// Vertex normal (3 floats).
    Normal,
    /// Vertex tangent (3 floats).
    Tangent,
    /// Vertex color, RGBA (4 floats).
    Color,
}

impl Attribute {
    /// Number of attribute kinds.
    pub const COUNT: usize = 6;

    /// All attributes in bit order.
    pub const ALL: [Attribute; Self::COUNT] = [
        Self::Position,
        Self::TexCoord0,
        Self::TexCoord1,
        Self::Normal,
        Self::Tangent,
        Self::Color,
    ];

    /// The order attributes are packed in every layout.
    pub const LAYOUT_ORDER: [Attribute; Self::COUNT] = [
        Self::Position,
        Self::Normal,
        Self::TexCoord0,
        Self::TexCoord1,
        Self::Color,
        Self::Tangent,
    ];

    /// Dense index, also the shader binding location.
    pub fn index(self) -> usize {
        match self {
            Self::Position => 0,
            Self::TexCoord0 => 1,
            Self::TexCoord1 => 2,
            Self::Normal => 3,
            Self::Tangent => 4,
            Self::Color => 5,
        }
    }

    /// Fixed shader binding location.
    pub fn location(self) -> u32 {
        self.index() as u32
    }

    /// The single-bit set for this attribute.
    pub fn flag(self) -> AttributeSet {
        AttributeSet::from_bits_retain(1 << self.index())
    }

    /// Number of f32 components.
    pub fn component_count(self) -> u32 {
        match self {
            Self::Position | Self::Normal | Self::Tangent => 3,
            Self::TexCoord0 | Self::TexCoord1 => 2,
            Self::Color => 4,
        }
    }

    /// Size in bytes of one value of this attribute.
    pub fn byte_size(self) -> u32 {
        self.component_count() * std::mem::size_of::<f32>() as u32
    }

    /// Canonical shader input name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "aPosition",
            Self::TexCoord0 => "aTexCoord0",
            Self::TexCoord1 => "aTexCoord1",
            Self::Normal => "aNormal",
            Self::Tangent => "aTangent",
            Self::Color => "aColor",
        }
    }
}

bitflags! {
    /// A set of vertex attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeSet: u32 {
        const POSITION = 1 << 0;
        const TEX_COORD0 = 1 << 1;
        const TEX_COORD1 = 1 << 2;
        const NORMAL = 1 << 3;
        const TANGENT = 1 << 4;
        const COLOR = 1 << 5;
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::POSITION
    }
}

impl From<Attribute> for AttributeSet {
    fn from(attribute: Attribute) -> Self {
        attribute.flag()
    }
}

impl AttributeSet {
    /// Position + color, the usual set for unlit line and triangle drawing.
    pub const POSITION_COLOR: Self = Self::POSITION.union(Self::COLOR);

    /// Position + normal + first texcoord.
    pub const POSITION_NORMAL_UV: Self = Self::POSITION.union(Self::NORMAL).union(Self::TEX_COORD0);

    /// Interpret raw bits, dropping unknown ones.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Check whether `attribute` is in the set.
    pub fn has(self, attribute: Attribute) -> bool {
        self.contains(attribute.flag())
    }

    /// Return the set with `attribute` added.
    pub fn with(self, attribute: Attribute) -> Self {
        self | attribute.flag()
    }

    /// Present attributes in layout order.
    pub fn attributes(self) -> impl Iterator<Item = Attribute> {
        Attribute::LAYOUT_ORDER
            .into_iter()
            .filter(move |attribute| self.has(*attribute))
    }

    /// Number of present attributes.
    pub fn attribute_count(self) -> usize {
        self.attributes().count()
    }

    /// Total f32 components per vertex.
    pub fn components_per_vertex(self) -> u32 {
        self.attributes().map(Attribute::component_count).sum()
    }
}
