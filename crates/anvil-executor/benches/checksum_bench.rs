//! Benchmarks for streaming SHA-1 verification.

use anvil_executor::checksum;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::io::Write;

fn bench_sha1_file(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.tar.gz");
    let mut file = std::fs::File::create(&path).unwrap();
    let chunk = vec![0xabu8; 64 * 1024];
    for _ in 0..32 {
        file.write_all(&chunk).unwrap();
    }
    drop(file);

    c.bench_function("sha1_file_2mb", |b| {
        b.iter(|| {
            let digest = checksum::sha1_file(black_box(&path)).unwrap();
            black_box(digest);
        });
    });
}

criterion_group!(benches, bench_sha1_file);
criterion_main!(benches);
