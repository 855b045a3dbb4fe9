//! Shader program resource.
//!
//! Compiling and linking happen outside this crate. A [`ShaderProgram`] is a
//! shared slot that starts either ready or pending and is fulfilled once the
//! program is linked; meshes skip their draw while it is pending.

use std::sync::Arc;

use glimmer_core::math::{mat4_to_array, Mat4};
use glimmer_core::{CoreError, TransformStack};
use parking_lot::Mutex;

use crate::backend::{GpuProgram, RenderContext};

use super::Texture;

/// Uniform names a mesh writes before each draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniformNames {
    /// The model-view-projection matrix (`mat4`).
    pub model_view_projection: String,
    /// The sampler bound to texture unit 0.
    pub sampler: String,
    /// Optional model-view matrix, written by `end_with`.
    pub model_view: Option<String>,
    /// Optional normal matrix (`mat4`), written by `end_with`.
    pub normal_matrix: Option<String>,
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            model_view_projection: "uMVPMatrix".to_string(),
            sampler: "uSampler".to_string(),
            model_view: None,
            normal_matrix: None,
        }
    }
}

impl UniformNames {
    /// Set the model-view-projection uniform name.
    pub fn with_model_view_projection(mut self, name: impl Into<String>) -> Self {
        self.model_view_projection = name.into();
        self
    }

    /// Set the sampler uniform name.
    pub fn with_sampler(mut self, name: impl Into<String>) -> Self {
        self.sampler = name.into();
        self
    }

    /// Also write the model-view matrix under `name`.
    pub fn with_model_view(mut self, name: impl Into<String>) -> Self {
        self.model_view = Some(name.into());
        self
    }

    /// Also write the normal matrix under `name`.
    pub fn with_normal_matrix(mut self, name: impl Into<String>) -> Self {
        self.normal_matrix = Some(name.into());
        self
    }

    /// The optional matrices `stack` supplies for the configured names.
    ///
    /// Fails with [`CoreError::SingularMatrix`] when a normal matrix is
    /// requested and the model-view matrix cannot be inverted.
    pub(crate) fn stack_matrices(
        &self,
        stack: &TransformStack,
    ) -> Result<Vec<(&str, Mat4)>, CoreError> {
        let mut matrices = Vec::new();
        if let Some(name) = &self.model_view {
            matrices.push((name.as_str(), stack.model_view_matrix()));
        }
        if let Some(name) = &self.normal_matrix {
            matrices.push((name.as_str(), stack.normal_matrix4()?));
        }
        Ok(matrices)
    }
}

/// A shader program that may not be linked yet.
pub struct ShaderProgram {
    context: Arc<dyn RenderContext>,
    label: String,
    handle: Mutex<Option<GpuProgram>>,
}

impl ShaderProgram {
    /// Wrap an already linked program.
    pub fn new(
        context: Arc<dyn RenderContext>,
        label: impl Into<String>,
        program: GpuProgram,
    ) -> Self {
        Self {
            context,
            label: label.into(),
            handle: Mutex::new(Some(program)),
        }
    }

    /// Create a slot for a program that is still compiling.
    pub fn pending(context: Arc<dyn RenderContext>, label: impl Into<String>) -> Self {
        Self {
            context,
            label: label.into(),
            handle: Mutex::new(None),
        }
    }

    /// Store the linked program, making the slot ready.
    pub fn fulfill(&self, program: GpuProgram) {
        log::debug!("Shader program {:?} ready", self.label);
        *self.handle.lock() = Some(program);
    }

    /// Whether the program is linked.
    pub fn is_ready(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Get the program label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the backend handle, if ready.
    pub fn handle(&self) -> Option<GpuProgram> {
        self.handle.lock().clone()
    }

    /// Make the program current. Returns `false` while pending.
    pub fn bind(&self) -> bool {
        match self.handle.lock().as_ref() {
            Some(program) => {
                self.context.use_program(Some(program));
                true
            }
            None => false,
        }
    }

    /// Clear the current program.
    pub fn unbind(&self) {
        self.context.use_program(None);
    }

    /// Write a 4x4 matrix uniform. Ignored while pending.
    pub fn set_matrix4(&self, name: &str, matrix: &Mat4) {
        if let Some(program) = self.handle.lock().as_ref() {
            self.context
                .set_uniform_matrix4(program, name, &mat4_to_array(matrix));
        }
    }

    /// Point a sampler uniform at `unit`. Ignored while pending.
    pub fn set_sampler(&self, name: &str, unit: u32) {
        if let Some(program) = self.handle.lock().as_ref() {
            self.context.set_uniform_sampler(program, name, unit);
        }
    }

    /// Bind the program, its matrices and an optional texture for a draw.
    ///
    /// Returns `false` without touching any state while the program is
    /// pending. A pending texture does not block the draw; its unit is
    /// cleared so nothing bound by an earlier draw is sampled.
    pub(crate) fn prepare_draw(
        &self,
        uniforms: &UniformNames,
        texture: Option<&Texture>,
        model_view_projection: &Mat4,
        extra: &[(&str, Mat4)],
    ) -> bool {
        if !self.bind() {
            log::trace!("Shader program {:?} pending, skipping draw", self.label);
            return false;
        }
        self.set_matrix4(&uniforms.model_view_projection, model_view_projection);
        for (name, matrix) in extra {
            self.set_matrix4(name, matrix);
        }
        if let Some(texture) = texture {
            if texture.bind(0) {
                self.set_sampler(&uniforms.sampler, 0);
            } else {
                texture.unbind(0);
            }
        }
        true
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("label", &self.label)
            .field("ready", &self.is_ready())
            .finish()
    }
}
