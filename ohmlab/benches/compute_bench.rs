//! Benchmarks for the calculation engine at the element cap.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ohmlab::{compute, Circuit, Topology, MAX_ELEMENTS};

fn full_circuit(topology: Topology) -> Circuit {
    let mut circuit = Circuit::new(12.0, topology);
    for i in 0..MAX_ELEMENTS {
        let (next, id) = circuit.add_element().expect("under capacity");
        circuit = next.set_resistance(id, 10.0 + i as f64 * 5.0);
    }
    circuit
}

fn bench_compute(c: &mut Criterion) {
    let series = full_circuit(Topology::Series);
    c.bench_function("compute_series_full", |b| {
        b.iter(|| compute(black_box(&series)))
    });

    let parallel = full_circuit(Topology::Parallel);
    c.bench_function("compute_parallel_full", |b| {
        b.iter(|| compute(black_box(&parallel)))
    });
}

fn bench_mutation_chain(c: &mut Criterion) {
    c.bench_function("build_full_circuit", |b| {
        b.iter(|| full_circuit(black_box(Topology::Series)))
    });
}

criterion_group!(benches, bench_compute, bench_mutation_chain);
criterion_main!(benches);
