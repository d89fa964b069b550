use criterion::{criterion_group, criterion_main, Criterion};
use fs_shellext::registry::MemoryRegistry;
use fs_shellext::Registrar;

fn fresh() {
    let store = MemoryRegistry::new();
    Registrar::new(&store)
        .with_working_dir("C:\\project")
        .register();
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("register .fs", |b| b.iter(fresh));

    let store = MemoryRegistry::new();
    let registrar = Registrar::new(&store).with_working_dir("C:\\project");
    registrar.register();
    c.bench_function("already registered", |b| b.iter(|| registrar.register()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
