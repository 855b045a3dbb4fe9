use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glimmer_core::math::Mat4;
use glimmer_core::mesh::generators::uv_sphere;
use glimmer_graphics::{
    AttributeSet, DummyBackend, ImmediateMeshBuilder, ImmediateMeshDescriptor,
    PrimitiveTopology, RenderContext, ShaderProgram, StaticMesh, StaticMeshDescriptor,
    VertexLayout,
};

fn setup() -> (Arc<DummyBackend>, Arc<dyn RenderContext>, Arc<ShaderProgram>) {
    let backend = Arc::new(DummyBackend::new());
    let context: Arc<dyn RenderContext> = backend.clone();
    let program = Arc::new(ShaderProgram::new(
        context.clone(),
        "bench",
        backend.create_program("bench"),
    ));
    (backend, context, program)
}

// ---------------------------------------------------------------------------
// Immediate streaming
// ---------------------------------------------------------------------------

fn bench_immediate_layout(c: &mut Criterion, layout: VertexLayout, name: &str) {
    let (backend, context, program) = setup();
    let mut builder = ImmediateMeshBuilder::new(
        context,
        ImmediateMeshDescriptor::new(AttributeSet::POSITION_COLOR | AttributeSet::NORMAL)
            .with_layout(layout)
            .with_program(program)
            .with_initial_capacity(1000),
    )
    .unwrap();

    c.bench_function(name, |b| {
        b.iter(|| {
            builder.begin(PrimitiveTopology::TriangleList);
            for i in 0..1000 {
                let x = black_box(i as f32);
                builder.color(1.0, 0.5, 0.25, 1.0).normal(0.0, 1.0, 0.0).vertex(x, 0.0, 0.0);
            }
            builder.end(&Mat4::identity());
            backend.take_commands();
        });
    });
}

fn bench_immediate_interleaved(c: &mut Criterion) {
    bench_immediate_layout(c, VertexLayout::Interleaved, "immediate_interleaved_1000");
}

fn bench_immediate_sequenced(c: &mut Criterion) {
    bench_immediate_layout(c, VertexLayout::Sequenced, "immediate_sequenced_1000");
}

fn bench_immediate_separated(c: &mut Criterion) {
    bench_immediate_layout(c, VertexLayout::Separated, "immediate_separated_1000");
}

// ---------------------------------------------------------------------------
// Static meshes
// ---------------------------------------------------------------------------

fn bench_static_upload(c: &mut Criterion) {
    let (backend, context, program) = setup();
    let sphere = uv_sphere(AttributeSet::POSITION_NORMAL_UV, 1.0, 32, 16);
    c.bench_function("static_mesh_upload_sphere_32x16", |b| {
        b.iter(|| {
            let mesh = StaticMesh::new(
                context.clone(),
                StaticMeshDescriptor::new(sphere.attributes()).with_program(program.clone()),
                black_box(sphere.as_bytes()),
                Some(sphere.indices()),
            )
            .unwrap();
            black_box(mesh.vertex_count());
            drop(mesh);
            backend.take_commands();
        });
    });
}

fn bench_static_draw(c: &mut Criterion) {
    let (backend, context, program) = setup();
    let sphere = uv_sphere(AttributeSet::POSITION_NORMAL_UV, 1.0, 32, 16);
    let mesh = StaticMesh::new(
        context,
        StaticMeshDescriptor::new(sphere.attributes()).with_program(program),
        sphere.as_bytes(),
        Some(sphere.indices()),
    )
    .unwrap();
    c.bench_function("static_mesh_draw", |b| {
        b.iter(|| {
            mesh.draw(black_box(&Mat4::identity()));
            backend.take_commands();
        });
    });
}

criterion_group!(
    benches,
    bench_immediate_interleaved,
    bench_immediate_sequenced,
    bench_immediate_separated,
    bench_static_upload,
    bench_static_draw,
);
criterion_main!(benches);
