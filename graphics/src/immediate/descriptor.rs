//! Immediate mesh configuration.

use std::sync::Arc;

use glimmer_core::mesh::{AttributeSet, VertexLayout};

use crate::resources::{ShaderProgram, Texture, UniformNames};

/// Descriptor for creating an [`ImmediateMeshBuilder`](super::ImmediateMeshBuilder).
#[derive(Debug, Clone, Default)]
pub struct ImmediateMeshDescriptor {
    /// Debug label, used as a prefix for the buffer labels.
    pub label: Option<String>,
    /// Attributes carried per vertex; Position is always added.
    pub attributes: AttributeSet,
    /// Physical arrangement of the staged attributes.
    pub layout: VertexLayout,
    /// Program bound by `end`; without one nothing is drawn.
    pub program: Option<Arc<ShaderProgram>>,
    /// Texture bound to unit 0 by `end`.
    pub texture: Option<Arc<Texture>>,
    /// Uniform names written by `end`.
    pub uniforms: UniformNames,
    /// Vertices preallocated in the staging buffers.
    pub initial_capacity: usize,
}

impl ImmediateMeshDescriptor {
    /// Create a descriptor for `attributes` with an interleaved layout.
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the vertex layout.
    pub fn with_layout(mut self, layout: VertexLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the shader program.
    pub fn with_program(mut self, program: Arc<ShaderProgram>) -> Self {
        self.program = Some(program);
        self
    }

    /// Set the texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the uniform names.
    pub fn with_uniforms(mut self, uniforms: UniformNames) -> Self {
        self.uniforms = uniforms;
        self
    }

    /// Preallocate staging space for `vertices` vertices.
    pub fn with_initial_capacity(mut self, vertices: usize) -> Self {
        self.initial_capacity = vertices;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let desc = ImmediateMeshDescriptor::new(AttributeSet::POSITION_COLOR);
        assert_eq!(desc.layout, VertexLayout::Interleaved);
        assert!(desc.program.is_none());
        assert!(desc.texture.is_none());
        assert_eq!(desc.uniforms, UniformNames::default());
        assert_eq!(desc.initial_capacity, 0);
    }

    #[test]
    fn test_descriptor_builder() {
        let desc = ImmediateMeshDescriptor::new(AttributeSet::POSITION)
            .with_label("grid")
            .with_layout(VertexLayout::Separated)
            .with_initial_capacity(256);
        assert_eq!(desc.label.as_deref(), Some("grid"));
        assert_eq!(desc.layout, VertexLayout::Separated);
        assert_eq!(desc.initial_capacity, 256);
    }
}
