//! Upload-once meshes.
//!
//! A [`StaticMesh`] is the counterpart of the immediate builder for geometry
//! that never changes: the interleaved vertex bytes and optional indices are
//! uploaded at construction, and every [`StaticMesh::draw`] reuses them.

mod static_mesh;

pub use static_mesh::{StaticMesh, StaticMeshDescriptor};
