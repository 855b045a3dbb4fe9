use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glimmer_core::math::Vec3;
use glimmer_core::mesh::generators::{cube, uv_sphere};
use glimmer_core::mesh::{plan_interleaved, plan_sequenced, AttributeSet, GrowableBuffer};
use glimmer_core::TransformStack;

// ---------------------------------------------------------------------------
// Mesh generation
// ---------------------------------------------------------------------------

fn bench_generate_sphere(c: &mut Criterion) {
    c.bench_function("uv_sphere_64x32", |b| {
        b.iter(|| {
            uv_sphere(
                black_box(AttributeSet::POSITION_NORMAL_UV),
                black_box(1.0),
                black_box(64),
                black_box(32),
            )
        });
    });
}

fn bench_generate_cube(c: &mut Criterion) {
    c.bench_function("cube_all_attributes", |b| {
        b.iter(|| cube(black_box(AttributeSet::all()), black_box(0.5)));
    });
}

// ---------------------------------------------------------------------------
// Layout planning
// ---------------------------------------------------------------------------

fn bench_plan_interleaved(c: &mut Criterion) {
    c.bench_function("plan_interleaved_all", |b| {
        b.iter(|| plan_interleaved(black_box(AttributeSet::all())));
    });
}

fn bench_plan_sequenced(c: &mut Criterion) {
    c.bench_function("plan_sequenced_all_1000", |b| {
        b.iter(|| plan_sequenced(black_box(AttributeSet::all()), black_box(1000)));
    });
}

// ---------------------------------------------------------------------------
// Staging and transforms
// ---------------------------------------------------------------------------

fn bench_growable_refill(c: &mut Criterion) {
    let mut buffer = GrowableBuffer::<f32>::new();
    c.bench_function("growable_buffer_refill_7000", |b| {
        b.iter(|| {
            buffer.clear();
            for i in 0..7000 {
                buffer.push(black_box(i as f32));
            }
            black_box(buffer.len());
        });
    });
}

fn bench_transform_nesting(c: &mut Criterion) {
    let mut stack = TransformStack::new();
    c.bench_function("transform_stack_push_rotate_pop_x16", |b| {
        b.iter(|| {
            for _ in 0..16 {
                stack.push_matrix();
                stack.rotate(black_box(15.0), Vec3::new(0.0, 1.0, 0.0));
                stack.translate(Vec3::new(0.0, 1.0, 0.0));
            }
            black_box(stack.model_view_projection_matrix());
            for _ in 0..16 {
                stack.pop_matrix().unwrap();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_generate_sphere,
    bench_generate_cube,
    bench_plan_interleaved,
    bench_plan_sequenced,
    bench_growable_refill,
    bench_transform_nesting,
);
criterion_main!(benches);
