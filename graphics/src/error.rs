//! Graphics error types.

use glimmer_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// A builder or mesh was configured with data it cannot draw.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Failed to create a resource.
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A math or staging operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
