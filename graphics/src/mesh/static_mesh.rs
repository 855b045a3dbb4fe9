//! Static mesh with prebuilt vertex and index buffers.

use std::sync::Arc;

use glimmer_core::math::Mat4;
use glimmer_core::mesh::{plan_interleaved, AttributeSet, Indices, PrimitiveTopology};
use glimmer_core::TransformStack;

use crate::backend::RenderContext;
use crate::error::GraphicsError;
use crate::immediate::{disable_absent_attributes, interleaved_pointers, validate_attributes};
use crate::resources::{Buffer, IndexBuffer, ShaderProgram, Texture, UniformNames};
use crate::types::{BufferDescriptor, BufferUsage, VertexPointer};

/// Descriptor for creating a [`StaticMesh`].
#[derive(Debug, Clone, Default)]
pub struct StaticMeshDescriptor {
    /// Debug label for the mesh and its buffers.
    pub label: Option<String>,
    /// Attributes present in each interleaved vertex record.
    pub attributes: AttributeSet,
    /// How vertices (or indices) assemble into primitives.
    pub topology: PrimitiveTopology,
    /// Program bound by `draw`; without one nothing is drawn.
    pub program: Option<Arc<ShaderProgram>>,
    /// Texture bound to unit 0 by `draw`.
    pub texture: Option<Arc<Texture>>,
    /// Uniform names written by `draw`.
    pub uniforms: UniformNames,
}

impl StaticMeshDescriptor {
    /// Create a triangle-list descriptor for `attributes`.
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

    /// Set the primitive topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
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
}

/// A mesh whose vertices and indices are uploaded once.
///
/// # Example
///
/// ```ignore
/// let cube = generators::cube(AttributeSet::POSITION_COLOR, 0.5);
/// let mesh = StaticMesh::new(
///     context,
///     StaticMeshDescriptor::new(cube.attributes()).with_program(program),
///     cube.as_bytes(),
///     Some(cube.indices()),
/// )?;
/// mesh.draw(&stack.model_view_projection_matrix());
/// ```
pub struct StaticMesh {
    context: Arc<dyn RenderContext>,
    descriptor: StaticMeshDescriptor,
    vertex_buffer: Buffer,
    index_buffer: Option<IndexBuffer>,
    pointers: Vec<VertexPointer>,
    vertex_count: u32,
}

impl StaticMesh {
    /// Validate and upload interleaved `vertices` and optional `indices`.
    ///
    /// `vertices` must be laid out per
    /// [`plan_interleaved`](glimmer_core::mesh::plan_interleaved) for the
    /// descriptor's attributes. Fails with [`GraphicsError::Configuration`]
    /// when Position is missing or the data is empty or not a whole number of
    /// vertices, and with [`GraphicsError::InvalidParameter`] when an index
    /// points past the last vertex.
    pub fn new(
        context: Arc<dyn RenderContext>,
        descriptor: StaticMeshDescriptor,
        vertices: &[u8],
        indices: Option<Indices<'_>>,
    ) -> Result<Self, GraphicsError> {
        validate_attributes(descriptor.attributes)?;
        let offsets = plan_interleaved(descriptor.attributes);
        let stride = offsets.stride() as usize;
        if vertices.is_empty() {
            return Err(GraphicsError::Configuration(
                "static mesh vertex data is empty".to_string(),
            ));
        }
        if vertices.len() % stride != 0 {
            return Err(GraphicsError::Configuration(format!(
                "vertex data of {} bytes is not a multiple of the {stride}-byte stride",
                vertices.len()
            )));
        }
        let vertex_count = (vertices.len() / stride) as u32;

        let indices = indices.filter(|indices| !indices.is_empty());
        if let Some(max) = indices.as_ref().and_then(Indices::max_index) {
            if max >= vertex_count {
                return Err(GraphicsError::InvalidParameter(format!(
                    "index {max} out of range for {vertex_count} vertices"
                )));
            }
        }

        let label = descriptor
            .label
            .clone()
            .unwrap_or_else(|| "static_mesh".to_string());
        let mut vertex_buffer = Buffer::new(
            context.clone(),
            BufferDescriptor::new(vertices.len() as u64, BufferUsage::VERTEX)
                .with_label(format!("{label}_vertices")),
        )?;
        vertex_buffer.upload(vertices);
        let index_buffer = indices
            .map(|indices| IndexBuffer::new(context.clone(), indices, Some(&label)))
            .transpose()?;

        log::debug!(
            "Created static mesh {:?}: {} vertices, {} indices",
            label,
            vertex_count,
            index_buffer.as_ref().map_or(0, IndexBuffer::count)
        );

        Ok(Self {
            context,
            descriptor,
            vertex_buffer,
            index_buffer,
            pointers: interleaved_pointers(&offsets),
            vertex_count,
        })
    }

    /// Draw the mesh with `model_view_projection`.
    ///
    /// Draws nothing while no program is set or the program is pending.
    pub fn draw(&self, model_view_projection: &Mat4) {
        self.draw_with_extra(model_view_projection, &[]);
    }

    /// Draw the mesh with the matrices of `stack`.
    ///
    /// Writes the model-view and normal matrices when their uniform names are
    /// configured. Fails without drawing when the normal matrix is requested
    /// and the model-view matrix is singular.
    pub fn draw_with(&self, stack: &TransformStack) -> Result<(), GraphicsError> {
        let extra = self.descriptor.uniforms.stack_matrices(stack)?;
        self.draw_with_extra(&stack.model_view_projection_matrix(), &extra);
        Ok(())
    }

    fn draw_with_extra(&self, model_view_projection: &Mat4, extra: &[(&str, Mat4)]) {
        let Some(program) = self.descriptor.program.as_deref() else {
            log::trace!("Static mesh {:?}: no program, nothing drawn", self.label());
            return;
        };
        if !program.prepare_draw(
            &self.descriptor.uniforms,
            self.descriptor.texture.as_deref(),
            model_view_projection,
            extra,
        ) {
            return;
        }

        self.vertex_buffer.bind();
        for pointer in &self.pointers {
            self.context.vertex_attrib_pointer(pointer);
        }
        disable_absent_attributes(self.context.as_ref(), self.descriptor.attributes);
        match &self.index_buffer {
            Some(indices) => indices.draw(self.descriptor.topology),
            None => self
                .context
                .draw_arrays(self.descriptor.topology, 0, self.vertex_count),
        }
    }

    /// Get the attribute set.
    pub fn attributes(&self) -> AttributeSet {
        self.descriptor.attributes
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.descriptor.topology
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Get the number of indices (0 when not indexed).
    pub fn index_count(&self) -> u32 {
        self.index_buffer.as_ref().map_or(0, IndexBuffer::count)
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Get the number of primitives based on topology and vertex/index count.
    pub fn primitive_count(&self) -> u32 {
        let count = if self.is_indexed() {
            self.index_count()
        } else {
            self.vertex_count
        };
        self.descriptor.topology.primitive_count(count)
    }

    /// Get the mesh label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Replace the shader program.
    pub fn set_program(&mut self, program: Option<Arc<ShaderProgram>>) {
        self.descriptor.program = program;
    }

    /// Replace the texture.
    pub fn set_texture(&mut self, texture: Option<Arc<Texture>>) {
        self.descriptor.texture = texture;
    }
}

impl std::fmt::Debug for StaticMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticMesh")
            .field("label", &self.descriptor.label)
            .field("attributes", &self.descriptor.attributes)
            .field("topology", &self.descriptor.topology)
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count())
            .finish()
    }
}
