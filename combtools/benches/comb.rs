#[allow(unused_imports)]
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use combtools::engine::{CaptureConfig, Engine, Mode};
use combtools::Tag;

mod common;

fn assemble(c: &mut Criterion) {
    let tags = common::synthetic_tags(500_000);

    c.bench_function("assemble", |b| {
        b.iter(|| {
            let mut e = Engine::with_fifo_depth(
                16,
                CaptureConfig {
                    window: 100,
                    filter_min: 1,
                    filter_max: 16,
                    mode: Mode::Histogram,
                },
                1 << 16,
            );
            e.start_capture();
            for batch in black_box(&tags).chunks(4) {
                e.process(batch);
            }
        })
    });
}

fn readout(c: &mut Criterion) {
    let tags = common::synthetic_tags(500_000);
    let mut e = Engine::new(16, CaptureConfig::default());
    e.start_capture();
    e.process(&tags);

    c.bench_function("readout", |b| {
        b.iter(|| {
            e.request_readout(false);
            let mut total = 0u64;
            while let Some((_, count)) = e.read_next_bin() {
                total += count as u64;
            }
            black_box(total);
        })
    });
}

criterion_group!(benches, assemble, readout);
criterion_main!(benches);
