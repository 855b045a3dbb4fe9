//! Hierarchical transform stacks.
//!
//! A [`TransformStack`] keeps three independent [`MatrixStack`]s (model-view,
//! projection and texture) in the style of the legacy fixed-function matrix
//! modes. Each stack holds an identity sentinel at index 0 that can never be
//! popped, so the stack is never empty.
//!
//! # Example
//!
//! ```
//! use glimmer_core::math::Vec3;
//! use glimmer_core::TransformStack;
//!
//! let mut stack = TransformStack::new();
//! stack.push_matrix();
//! stack.translate(Vec3::new(1.0, 0.0, 0.0));
//! stack.rotate(90.0, Vec3::z());
//! // ... draw ...
//! stack.pop_matrix().unwrap();
//! assert_eq!(stack.depth(), 1);
//! ```

use std::ops::{Deref, DerefMut};

use crate::error::CoreError;
use crate::math::{self, Mat3, Mat4, Vec3};

/// Which matrix stack mutating operations apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatrixMode {
    /// Object-to-eye transform (primary stack).
    #[default]
    ModelView,
    /// Eye-to-clip transform.
    Projection,
    /// Texture coordinate transform.
    Texture,
}

/// A stack of 4x4 matrices whose top is the current transform.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixStack {
    entries: Vec<Mat4>,
}

impl MatrixStack {
    /// Create a stack holding only the identity sentinel.
    pub fn new() -> Self {
        Self {
            entries: vec![Mat4::identity()],
        }
    }

    /// Number of entries, including the sentinel.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// The current (top) matrix.
    pub fn top(&self) -> &Mat4 {
        // The sentinel is never removed.
        &self.entries[self.entries.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Duplicate the top entry.
    pub fn push(&mut self) {
        let top = *self.top();
        self.entries.push(top);
    }

    /// Remove the top entry.
    ///
    /// Fails with [`CoreError::StackUnderflow`] when only the sentinel remains.
    pub fn pop(&mut self, mode: MatrixMode) -> Result<(), CoreError> {
        if self.entries.len() <= 1 {
            return Err(CoreError::StackUnderflow { mode });
        }
        self.entries.pop();
        Ok(())
    }

    /// Drop entries until the stack is `depth` deep (never below the sentinel).
    pub fn truncate(&mut self, depth: usize) {
        self.entries.truncate(depth.max(1));
    }

    /// Replace the top with the identity.
    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::identity();
    }

    /// Replace the top with `m`.
    pub fn load_matrix(&mut self, m: &Mat4) {
        *self.top_mut() = *m;
    }

    /// Post-multiply the top by `m` (`top = top * m`).
    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top_mut();
        *top = *top * m;
    }

    /// Post-multiply by a translation.
    pub fn translate(&mut self, v: Vec3) {
        self.multiply(&math::mat4_from_translation(v));
    }

    /// Post-multiply by a rotation of `degrees` around `axis`.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.rotate_radians(degrees.to_radians(), axis);
    }

    /// Post-multiply by a rotation of `radians` around `axis`.
    ///
    /// The axis does not need to be normalized. A zero-length axis leaves the
    /// stack unchanged.
    pub fn rotate_radians(&mut self, radians: f32, axis: Vec3) {
        match math::mat4_from_axis_angle(axis, radians) {
            Some(rotation) => self.multiply(&rotation),
            None => log::warn!("ignoring rotation around degenerate axis {:?}", axis),
        }
    }

    /// Post-multiply by a (possibly non-uniform) scale.
    pub fn scale(&mut self, v: Vec3) {
        self.multiply(&Mat4::new_nonuniform_scaling(&v));
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Model-view, projection and texture stacks plus the current matrix mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformStack {
    mode: MatrixMode,
    model_view: MatrixStack,
    projection: MatrixStack,
    texture: MatrixStack,
}

impl TransformStack {
    /// Create a transform stack with identity sentinels in every mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current matrix mode.
    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    /// Select which stack subsequent operations apply to.
    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    /// Access a stack by mode.
    pub fn stack(&self, mode: MatrixMode) -> &MatrixStack {
        match mode {
            MatrixMode::ModelView => &self.model_view,
            MatrixMode::Projection => &self.projection,
            MatrixMode::Texture => &self.texture,
        }
    }

    /// Mutable access to a stack by mode.
    pub fn stack_mut(&mut self, mode: MatrixMode) -> &mut MatrixStack {
        match mode {
            MatrixMode::ModelView => &mut self.model_view,
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::Texture => &mut self.texture,
        }
    }

    fn current(&mut self) -> &mut MatrixStack {
        self.stack_mut(self.mode)
    }

    /// Depth of the current stack, including the sentinel.
    pub fn depth(&self) -> usize {
        self.stack(self.mode).depth()
    }

    /// Duplicate the top of the current stack.
    pub fn push_matrix(&mut self) {
        self.current().push();
    }

    /// Discard the top of the current stack.
    ///
    /// Fails with [`CoreError::StackUnderflow`] when only the sentinel is left.
    pub fn pop_matrix(&mut self) -> Result<(), CoreError> {
        let mode = self.mode;
        self.current().pop(mode)
    }

    /// Replace the top of the current stack with identity.
    pub fn load_identity(&mut self) {
        self.current().load_identity();
    }

    /// Replace the top of the current stack with `m`.
    pub fn load_matrix(&mut self, m: &Mat4) {
        self.current().load_matrix(m);
    }

    /// Post-multiply the top of the current stack by `m`.
    pub fn multiply(&mut self, m: &Mat4) {
        self.current().multiply(m);
    }

    /// Translate the current stack by `v`.
    pub fn translate(&mut self, v: Vec3) {
        self.current().translate(v);
    }

    /// Rotate by `degrees` around `axis`.
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.current().rotate(degrees, axis);
    }

    /// Rotate by `radians` around `axis`.
    pub fn rotate_radians(&mut self, radians: f32, axis: Vec3) {
        self.current().rotate_radians(radians, axis);
    }

    /// Scale the current stack by `v`.
    pub fn scale(&mut self, v: Vec3) {
        self.current().scale(v);
    }

    /// Multiply the current stack by a perspective projection.
    ///
    /// `fovy` is in degrees, like `gluPerspective`.
    pub fn perspective(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) {
        self.multiply(&math::perspective_gl(fovy.to_radians(), aspect, near, far));
    }

    /// Multiply the current stack by an orthographic projection.
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.multiply(&math::orthographic_gl(left, right, bottom, top, near, far));
    }

    /// Multiply the current stack by a look-at view transform.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.multiply(&math::look_at_rh(&eye, &target, &up));
    }

    /// Top of the model-view stack.
    pub fn model_view_matrix(&self) -> Mat4 {
        *self.model_view.top()
    }

    /// Top of the projection stack.
    pub fn projection_matrix(&self) -> Mat4 {
        *self.projection.top()
    }

    /// Top of the texture stack.
    pub fn texture_matrix(&self) -> Mat4 {
        *self.texture.top()
    }

    /// `projection * model_view`.
    pub fn model_view_projection_matrix(&self) -> Mat4 {
        self.projection.top() * self.model_view.top()
    }

    /// Inverse-transpose of the model-view rotation/scale block.
    pub fn normal_matrix(&self) -> Result<Mat3, CoreError> {
        math::mat4_upper_3x3(self.model_view.top())
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .ok_or(CoreError::SingularMatrix)
    }

    /// Inverse-transpose of the full model-view matrix.
    pub fn normal_matrix4(&self) -> Result<Mat4, CoreError> {
        self.model_view
            .top()
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .ok_or(CoreError::SingularMatrix)
    }

    /// Push the current stack and return a guard that restores its depth on drop.
    pub fn scoped(&mut self) -> MatrixScope<'_> {
        let mode = self.mode;
        let depth = self.depth();
        self.push_matrix();
        MatrixScope {
            stack: self,
            mode,
            depth,
        }
    }
}

/// Guard returned by [`TransformStack::scoped`].
///
/// Dereferences to the [`TransformStack`]. On drop the stack that was current
/// when the scope opened is truncated back to its entry depth, which also
/// discards any pushes the body forgot to pop.
pub struct MatrixScope<'a> {
    stack: &'a mut TransformStack,
    mode: MatrixMode,
    depth: usize,
}

impl Deref for MatrixScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for MatrixScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for MatrixScope<'_> {
    fn drop(&mut self) {
        let stack = self.stack.stack_mut(self.mode);
        if stack.depth() < self.depth + 1 {
            log::warn!(
                "{:?} stack popped below its scope (depth {} < {})",
                self.mode,
                stack.depth(),
                self.depth + 1
            );
        }
        stack.truncate(self.depth);
    }
}

static_assertions::assert_impl_all!(TransformStack: Send, Sync, Clone);
