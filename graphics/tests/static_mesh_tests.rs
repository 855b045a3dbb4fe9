//! Integration tests for upload-once meshes.

mod common;

use rstest::rstest;

use common::{floats, pointers, TestContext};
use glimmer_core::math::{Mat4, Vec3};
use glimmer_core::mesh::generators::{cube, quad, uv_sphere};
use glimmer_core::TransformStack;
use glimmer_graphics::{
    AttributeSet, GraphicsError, IndexFormat, Indices, PrimitiveTopology, RecordedCommand,
    StaticMesh, StaticMeshDescriptor, UniformNames,
};

fn descriptor(ctx: &TestContext, attributes: AttributeSet) -> StaticMeshDescriptor {
    StaticMeshDescriptor::new(attributes).with_program(ctx.program.clone())
}

#[test]
fn test_cube_indexed_draw() {
    let ctx = TestContext::new();
    let shape = cube(AttributeSet::POSITION_COLOR, 0.5);
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, shape.attributes()).with_label("cube"),
        shape.as_bytes(),
        Some(shape.indices()),
    )
    .unwrap();

    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.index_count(), 36);
    assert!(mesh.is_indexed());
    assert_eq!(mesh.primitive_count(), 12);

    mesh.draw(&Mat4::identity());
    assert_eq!(
        ctx.backend.draw_calls(),
        vec![RecordedCommand::DrawElements {
            topology: PrimitiveTopology::TriangleList,
            count: 36,
            format: IndexFormat::Uint32,
            offset: 0,
        }]
    );
    assert_eq!(
        floats(&ctx.backend.buffer_contents(&ctx.buffer("cube_vertices")).unwrap()),
        shape.vertices().to_vec()
    );
}

#[test]
fn test_uploads_once() {
    let ctx = TestContext::new();
    let shape = quad(AttributeSet::POSITION_NORMAL_UV, 1.0, 1.0);
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, shape.attributes()),
        shape.as_bytes(),
        Some(shape.indices()),
    )
    .unwrap();
    ctx.backend.take_commands();

    for _ in 0..3 {
        mesh.draw(&Mat4::identity());
    }
    let commands = ctx.backend.commands();
    assert!(!commands
        .iter()
        .any(|command| matches!(command, RecordedCommand::BufferData { .. })));
    assert_eq!(ctx.backend.draw_calls().len(), 3);
    // position, normal, uv per draw
    assert_eq!(pointers(&commands).len(), 9);
}

#[test]
fn test_array_draw_without_indices() {
    let ctx = TestContext::new();
    let vertices: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, AttributeSet::POSITION).with_topology(PrimitiveTopology::LineLoop),
        bytemuck::cast_slice(&vertices),
        None,
    )
    .unwrap();
    mesh.draw(&Mat4::identity());
    assert_eq!(
        ctx.backend.draw_calls(),
        vec![RecordedCommand::DrawArrays {
            topology: PrimitiveTopology::LineLoop,
            first: 0,
            count: 3,
        }]
    );
}

#[test]
fn test_draw_disables_arrays_it_does_not_feed() {
    let ctx = TestContext::new();
    let lit = uv_sphere(AttributeSet::all(), 1.0, 8, 4);
    let sphere = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, lit.attributes()),
        lit.as_bytes(),
        Some(lit.indices()),
    )
    .unwrap();
    sphere.draw(&Mat4::identity());
    assert_eq!(ctx.backend.enabled_attributes(), vec![0, 1, 2, 3, 4, 5]);
    drop(sphere);

    let flat = quad(AttributeSet::POSITION, 1.0, 1.0);
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, flat.attributes()),
        flat.as_bytes(),
        Some(flat.indices()),
    )
    .unwrap();
    mesh.draw(&Mat4::identity());
    assert_eq!(ctx.backend.enabled_attributes(), vec![0]);
    assert!(!ctx.backend.has_stale_arrays());
}

#[rstest]
#[case::empty(AttributeSet::POSITION, 0)]
#[case::misaligned(AttributeSet::POSITION_COLOR, 27)]
#[case::partial_vertex(AttributeSet::POSITION, 16)]
#[case::no_position(AttributeSet::COLOR, 16)]
fn test_rejects_bad_vertex_data(#[case] attributes: AttributeSet, #[case] len: usize) {
    let ctx = TestContext::new();
    let bytes = vec![0u8; len];
    let result = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, attributes),
        &bytes,
        None,
    );
    assert!(matches!(result, Err(GraphicsError::Configuration(_))));
    assert_eq!(ctx.backend.live_buffer_count(), 0);
}

#[test]
fn test_rejects_out_of_range_index() {
    let ctx = TestContext::new();
    let vertices = [0.0f32; 9];
    let result = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, AttributeSet::POSITION),
        bytemuck::cast_slice(&vertices),
        Some(Indices::U16(&[0, 1, 3])),
    );
    assert!(matches!(result, Err(GraphicsError::InvalidParameter(_))));
}

#[test]
fn test_creation_failure_propagates() {
    let ctx = TestContext::new();
    ctx.backend.set_fail_buffer_creation(true);
    let shape = cube(AttributeSet::POSITION, 1.0);
    let result = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, shape.attributes()),
        shape.as_bytes(),
        Some(shape.indices()),
    );
    assert!(matches!(
        result,
        Err(GraphicsError::ResourceCreationFailed(_))
    ));
}

#[test]
fn test_no_program_draws_nothing() {
    let ctx = TestContext::new();
    let shape = quad(AttributeSet::POSITION, 1.0, 1.0);
    let mut mesh = StaticMesh::new(
        ctx.context.clone(),
        StaticMeshDescriptor::new(shape.attributes()),
        shape.as_bytes(),
        Some(shape.indices()),
    )
    .unwrap();
    mesh.draw(&Mat4::identity());
    assert!(ctx.backend.draw_calls().is_empty());

    mesh.set_program(Some(ctx.program.clone()));
    mesh.draw(&Mat4::identity());
    assert_eq!(ctx.backend.draw_calls().len(), 1);
}

#[test]
fn test_draw_with_lit_sphere() {
    let ctx = TestContext::new();
    let shape = uv_sphere(AttributeSet::POSITION_NORMAL_UV, 1.0, 16, 8);
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, shape.attributes()).with_uniforms(
            UniformNames::default()
                .with_model_view("uMVMatrix")
                .with_normal_matrix("uNormalMatrix"),
        ),
        shape.as_bytes(),
        Some(shape.indices()),
    )
    .unwrap();

    let mut stack = TransformStack::new();
    stack.rotate(30.0, Vec3::new(0.0, 1.0, 0.0));
    mesh.draw_with(&stack).unwrap();

    let names: Vec<String> = ctx
        .backend
        .commands()
        .into_iter()
        .filter_map(|command| match command {
            RecordedCommand::SetUniformMatrix4 { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["uMVPMatrix", "uMVMatrix", "uNormalMatrix"]);
    assert_eq!(ctx.backend.draw_calls().len(), 1);
}

#[test]
fn test_drop_releases_buffers() {
    let ctx = TestContext::new();
    let shape = cube(AttributeSet::POSITION, 1.0);
    let mesh = StaticMesh::new(
        ctx.context.clone(),
        descriptor(&ctx, shape.attributes()),
        shape.as_bytes(),
        Some(shape.indices()),
    )
    .unwrap();
    assert_eq!(ctx.backend.live_buffer_count(), 2);
    drop(mesh);
    assert_eq!(ctx.backend.live_buffer_count(), 0);
}
