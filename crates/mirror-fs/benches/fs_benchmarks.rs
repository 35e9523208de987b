use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mirror_fs::{ContentDigest, io, walk_tree};
use std::fs;
use tempfile::tempdir;

fn digest_benchmark(c: &mut Criterion) {
    let content = vec![0xABu8; 1024 * 1024];
    c.bench_function("ContentDigest::of (1 MiB)", |b| {
        b.iter(|| ContentDigest::of(black_box(&content)))
    });
}

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_file.txt");
        let content = "hello world".as_bytes();

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content)).unwrap();
        })
    });
}

fn walk_benchmark(c: &mut Criterion) {
    c.bench_function("walk_tree (10 dirs x 50 files)", |b| {
        let dir = tempdir().unwrap();
        for d in 0..10 {
            let sub = dir.path().join(format!("dir{d}"));
            fs::create_dir_all(&sub).unwrap();
            for f in 0..50 {
                fs::write(sub.join(format!("file{f}.txt")), "x").unwrap();
            }
        }

        b.iter(|| {
            let count = walk_tree(black_box(dir.path())).count();
            assert_eq!(count, 510);
        })
    });
}

criterion_group!(
    benches,
    digest_benchmark,
    write_atomic_benchmark,
    walk_benchmark
);
criterion_main!(benches);
