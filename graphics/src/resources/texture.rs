//! Texture resource.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{GpuTexture, RenderContext};

/// A 2D texture that may still be loading.
///
/// Image decoding and upload happen outside this crate; the slot is
/// fulfilled once the texture object exists. Meshes drawing with a pending
/// texture clear their unit first, so they draw untextured until it arrives.
pub struct Texture {
    context: Arc<dyn RenderContext>,
    label: String,
    handle: Mutex<Option<GpuTexture>>,
}

impl Texture {
    /// Wrap an already uploaded texture.
    pub fn new(
        context: Arc<dyn RenderContext>,
        label: impl Into<String>,
        texture: GpuTexture,
    ) -> Self {
        Self {
            context,
            label: label.into(),
            handle: Mutex::new(Some(texture)),
        }
    }

    /// Create a slot for a texture that is still loading.
    pub fn pending(context: Arc<dyn RenderContext>, label: impl Into<String>) -> Self {
        Self {
            context,
            label: label.into(),
            handle: Mutex::new(None),
        }
    }

    /// Store the uploaded texture, making the slot ready.
    pub fn fulfill(&self, texture: GpuTexture) {
        log::debug!("Texture {:?} ready", self.label);
        *self.handle.lock() = Some(texture);
    }

    /// Whether the texture has been uploaded.
    pub fn is_ready(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Get the texture label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the backend handle, if ready.
    pub fn handle(&self) -> Option<GpuTexture> {
        self.handle.lock().clone()
    }

    /// Bind to texture `unit`. Returns `false` while pending.
    pub fn bind(&self, unit: u32) -> bool {
        match self.handle.lock().as_ref() {
            Some(texture) => {
                self.context.bind_texture(unit, Some(texture));
                true
            }
            None => false,
        }
    }

    /// Unbind whatever is bound to `unit`.
    pub fn unbind(&self, unit: u32) {
        self.context.bind_texture(unit, None);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, RecordedCommand};

    #[test]
    fn test_pending_texture_does_not_bind() {
        let backend = Arc::new(DummyBackend::new());
        let texture = Texture::pending(backend.clone(), "crate.png");
        assert!(!texture.bind(0));
        assert!(backend.commands().is_empty());

        let handle = backend.create_texture("crate.png");
        let id = handle.dummy_id();
        texture.fulfill(handle);
        assert!(texture.bind(0));
        assert_eq!(
            backend.commands(),
            vec![RecordedCommand::BindTexture { unit: 0, id }]
        );
    }
}
