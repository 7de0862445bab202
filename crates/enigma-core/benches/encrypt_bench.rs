//! Benchmarks for machine encryption and configuration.
//!
//! Run with: `cargo bench --package enigma-core --bench encrypt_bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use enigma_core::Enigma;
use std::hint::black_box;

/// Pangram repeated to roughly the given number of symbols.
fn generate_text(target_size: usize) -> String {
    const BASE: &str = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
    BASE.repeat((target_size / BASE.len()).max(1))
}

fn configured_machine() -> Enigma {
    let mut machine = Enigma::m3();
    machine.set_rotor_order("IV-II-V").unwrap();
    machine.set_ring_setting("BUL").unwrap();
    machine.set_plugboard("AV BS CG DL FU HZ IN KM OW RX").unwrap();
    machine
}

fn bench_encrypt_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_message");

    for size in [100, 1_000, 10_000] {
        let text = generate_text(size);
        group.throughput(Throughput::Elements(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("m3", size), &text, |b, text| {
            let mut machine = configured_machine();
            b.iter(|| {
                machine.set_indicator("BLA").unwrap();
                machine.encrypt_message(black_box(text)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_single_symbol(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_symbol");
    let mut machine = configured_machine();

    group.bench_function("step_and_encrypt", |b| {
        b.iter(|| machine.step_and_encrypt_single(black_box('E')).unwrap());
    });
    group.bench_function("encrypt_no_step", |b| {
        b.iter(|| machine.encrypt_single_no_step(black_box('E')).unwrap());
    });

    group.finish();
}

fn bench_configuration(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration");
    let mut machine = configured_machine();

    group.bench_function("set_rotor_order", |b| {
        b.iter(|| machine.set_rotor_order(black_box("VI-VII-VIII")).unwrap());
    });
    group.bench_function("set_plugboard", |b| {
        b.iter(|| {
            machine
                .set_plugboard(black_box("AV BS CG DL FU HZ IN KM OW RX"))
                .unwrap()
        });
    });
    group.bench_function("save_and_load_state", |b| {
        b.iter(|| {
            let state = machine.save_state();
            machine.load_state(black_box(&state))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_encrypt_message,
    bench_single_symbol,
    bench_configuration
);
criterion_main!(benches);
