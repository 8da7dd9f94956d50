use criterion::{criterion_group, criterion_main, Criterion};
use physics::{AntConfig, PhysicsSim};

fn bench_ant_frame(c: &mut Criterion) {
    let mut sim = PhysicsSim::ant(&AntConfig::default()).expect("ant model");
    let ctrl = [0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5];
    c.bench_function("ant_frame", |b| b.iter(|| sim.step(&ctrl, 1).expect("step")));
}

criterion_group!(benches, bench_ant_frame);
criterion_main!(benches);
