//! Benchmarks loading a large available-package tree from disk, the cost
//! every invocation of `anvil` pays before it can plan anything.

use anvil_core::Package;
use anvil_test_utils::DbFixture;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn populated_fixture(package_count: usize) -> DbFixture {
    let fixture = DbFixture::new();
    let packages: Vec<Package> = (0..package_count).map(|i| Package::new(format!("pkg{i}"), "1.0", "amd64")).collect();
    fixture.add_available("main", "amd64", packages);
    fixture
}

fn bench_load_available(c: &mut Criterion) {
    let fixture = populated_fixture(2_000);
    c.bench_function("load_available_2000_packages", |b| {
        b.iter(|| {
            let set = anvil_registry::load_available(black_box(fixture.db())).unwrap();
            black_box(set.len());
        });
    });
}

criterion_group!(benches, bench_load_available);
criterion_main!(benches);
