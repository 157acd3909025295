//! Microbenchmarks for the version DSL: tokenization and comparison cost
//! over the kind of strings real package metadata uses.

use anvil_core::version;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLES: &[&str] = &["1.2.3", "1.2.3-beta4", "2024.03.15-rc1+build99", "10.0.0", "1.0.0-alpha.1.2.3"];

fn bench_compare(c: &mut Criterion) {
    c.bench_function("version_compare_mixed_samples", |b| {
        b.iter(|| {
            for a in SAMPLES {
                for b_str in SAMPLES {
                    black_box(version::compare(black_box(a), black_box(b_str)));
                }
            }
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("version_parse_mixed_samples", |b| {
        b.iter(|| {
            for s in SAMPLES {
                black_box(version::Version::parse(black_box(s)));
            }
        });
    });
}

criterion_group!(benches, bench_compare, bench_parse);
criterion_main!(benches);
