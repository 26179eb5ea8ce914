//! Slice dispatch benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polychora_render::{
    dispatch, GpuTetrahedron, Hyperplane, SliceBuffers, SliceKernel, Transform4D, Vec4,
};

/// Deterministic tetrahedra scattered around the origin, so roughly half
/// of them straddle the w = 0 hyperplane.
fn scattered_tetrahedra(count: usize) -> Vec<GpuTetrahedron> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
    };
    (0..count)
        .map(|_| {
            let centre = Vec4::new(next(), next(), next(), next());
            GpuTetrahedron::new([(); 4].map(|_| {
                centre + Vec4::new(next(), next(), next(), next()) * 0.2
            }))
        })
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let kernel = SliceKernel::new(Hyperplane::w_axis(0.0), Transform4D::identity());

    for count in [1_000, 10_000, 100_000] {
        let tetrahedra = scattered_tetrahedra(count);
        let mut buffers = SliceBuffers::new(count);
        group.bench_with_input(BenchmarkId::new("w_axis", count), &tetrahedra, |b, tets| {
            b.iter(|| dispatch(black_box(&kernel), black_box(tets), &mut buffers).unwrap());
        });
    }

    group.finish();
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    let hyperplane = Hyperplane::new(Vec4::new(0.3, -0.2, 0.5, 1.0), 0.05).unwrap();
    let kernel = SliceKernel::new(hyperplane, Transform4D::identity());
    let tetrahedra = scattered_tetrahedra(1_000);

    group.bench_function("intersect", |b| {
        b.iter(|| {
            tetrahedra
                .iter()
                .map(|t| kernel.intersect(black_box(t.to_vec4s())).points().len())
                .sum::<usize>()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_kernel);
criterion_main!(benches);
