//! Benchmarks for the CPU simulation and compositing paths.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kaleida::{pattern, Compositor, FrameParams, SimConfig, Simulation, Vec2};

/// A simulation stepped once with a long delta so the pool sits at capacity.
fn flooded_simulation(capacity: usize) -> Simulation {
    let config = SimConfig::default()
        .with_capacity(capacity)
        .with_emission_rate(capacity as f32 * 10.0)
        .with_life_range(1_000.0..1_000.0);
    let mut sim = Simulation::from_config(config);
    sim.step(1.0);
    sim
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for count in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let mut sim = flooded_simulation(count);
            b.iter(|| {
                sim.step(black_box(1.0 / 60.0));
            })
        });
    }

    group.finish();
}

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");
    let coord = Vec2::new(0.37, -0.21);

    group.bench_function("pattern_color", |b| {
        let params = FrameParams::new(960, 540);
        b.iter(|| black_box(pattern::pattern_color(black_box(coord), black_box(2.5), &params)))
    });

    // Complexity drives fractal iteration depth
    for complexity in [0.0f32, 0.5, 1.0] {
        group.bench_with_input(
            BenchmarkId::new("combined", complexity),
            &complexity,
            |b, &complexity| {
                let mut params = FrameParams::new(960, 540);
                params.complexity = complexity;
                b.iter(|| {
                    black_box(pattern::combined_pattern(
                        black_box(coord),
                        black_box(2.5),
                        &params,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    group.sample_size(10);

    let mut sim = flooded_simulation(500);
    sim.step(1.0 / 60.0);
    sim.set_resolution(160, 90);
    let compositor = Compositor::new();

    group.bench_function("cpu_160x90_500p", |b| {
        b.iter(|| black_box(compositor.render(sim.particles(), sim.params())))
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_pattern, bench_composite);
criterion_main!(benches);
