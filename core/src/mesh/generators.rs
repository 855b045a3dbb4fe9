//! Mesh generators for common shapes.
//!
//! Generators write interleaved float data laid out per
//! [`plan_interleaved`](super::plan_interleaved) for the requested attribute
//! set, so the result can be handed straight to a static mesh. Attributes not
//! in the set are skipped; Position is always written.

use std::f32::consts::PI;

use super::attribute::{Attribute, AttributeSet};
use super::data::Indices;

/// Full vertex description before it is packed for an attribute set.
#[derive(Debug, Clone, Copy)]
struct ShapeVertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    color: [f32; 4],
    tangent: [f32; 3],
}

/// Interleaved vertex data with u32 indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMesh {
    attributes: AttributeSet,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl GeneratedMesh {
    fn new(attributes: AttributeSet) -> Self {
        Self {
            attributes: attributes | AttributeSet::POSITION,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn push_vertex(&mut self, vertex: &ShapeVertex) {
        for attribute in self.attributes.attributes() {
            let values: &[f32] = match attribute {
                Attribute::Position => &vertex.position,
                Attribute::Normal => &vertex.normal,
                // both texcoord sets share the shape's single parameterization
                Attribute::TexCoord0 | Attribute::TexCoord1 => &vertex.uv,
                Attribute::Color => &vertex.color,
                Attribute::Tangent => &vertex.tangent,
            };
            self.vertices.extend_from_slice(values);
        }
    }

    /// The attribute set the data is packed for.
    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    /// Interleaved floats.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Interleaved bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle-list indices.
    pub fn indices(&self) -> Indices<'_> {
        Indices::U32(&self.indices)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        let components = self.attributes.components_per_vertex() as usize;
        self.vertices.len() / components
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Generate a quad on the XY plane facing +Z.
///
/// UV coordinates go from (0,0) at bottom-left to (1,1) at top-right.
pub fn quad(attributes: AttributeSet, half_width: f32, half_height: f32) -> GeneratedMesh {
    let mut mesh = GeneratedMesh::new(attributes);
    let corners = [
        ([-half_width, -half_height], [0.0, 0.0]),
        ([half_width, -half_height], [1.0, 0.0]),
        ([half_width, half_height], [1.0, 1.0]),
        ([-half_width, half_height], [0.0, 1.0]),
    ];
    for ([x, y], uv) in corners {
        mesh.push_vertex(&ShapeVertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
            tangent: [1.0, 0.0, 0.0],
        });
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 2, 3, 0]);
    mesh
}

/// Generate an axis-aligned cube centered at the origin.
///
/// Each face has its own four vertices (24 total) so normals stay flat, and a
/// distinct color so faces are told apart without lighting.
pub fn cube(attributes: AttributeSet, half_extent: f32) -> GeneratedMesh {
    // (normal, tangent, bitangent, color)
    let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 4]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 1.0, 1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0, 1.0]),
    ];

    let mut mesh = GeneratedMesh::new(attributes);
    for (face, (normal, tangent, bitangent, color)) in faces.iter().enumerate() {
        for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                (normal[0] + tangent[0] * s + bitangent[0] * t) * half_extent,
                (normal[1] + tangent[1] * s + bitangent[1] * t) * half_extent,
                (normal[2] + tangent[2] * s + bitangent[2] * t) * half_extent,
            ];
            mesh.push_vertex(&ShapeVertex {
                position,
                normal: *normal,
                uv: [(s + 1.0) * 0.5, (t + 1.0) * 0.5],
                color: *color,
                tangent: *tangent,
            });
        }
        let base = face as u32 * 4;
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// Generate a UV sphere.
///
/// `segments` is the number of longitudinal segments (around the equator),
/// `rings` the number of latitudinal rings (pole to pole).
pub fn uv_sphere(
    attributes: AttributeSet,
    radius: f32,
    segments: u32,
    rings: u32,
) -> GeneratedMesh {
    let mut mesh = GeneratedMesh::new(attributes);

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            mesh.push_vertex(&ShapeVertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                uv: [segment as f32 / segments as f32, ring as f32 / rings as f32],
                color: [1.0, 1.0, 1.0, 1.0],
                tangent: [-sin_phi, 0.0, cos_phi],
            });
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            mesh.indices
                .extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }

    mesh
}
