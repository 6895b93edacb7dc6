use bplsm_core::{BPTree, LeveledIndex};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("BPTree", size), &size, |b, &size| {
            b.iter(|| {
                let mut tree = BPTree::new(32).unwrap();
                for i in 0..size {
                    tree.insert_or_update(black_box(i), black_box(i * 2));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("LeveledIndex", size), &size, |b, &size| {
            b.iter(|| {
                let mut index = LeveledIndex::new(256, 4, 32).unwrap();
                for i in 0..size {
                    index.insert(black_box(i), black_box(i * 2));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for i in 0..size {
                    map.insert(black_box(i), black_box(i * 2));
                }
            });
        });
    }

    group.finish();
}

fn get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let mut tree = BPTree::new(32).unwrap();
        let mut index = LeveledIndex::new(256, 4, 32).unwrap();
        let mut map = BTreeMap::new();
        for i in 0..size {
            tree.insert_or_update(i, i * 2);
            index.insert(i, i * 2);
            map.insert(i, i * 2);
        }

        group.bench_with_input(BenchmarkId::new("BPTree", size), &size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(tree.get(&i));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("LeveledIndex", size), &size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(index.get(&i));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(map.get(&i));
                }
            });
        });
    }

    group.finish();
}

fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [1000, 10000] {
        group.bench_with_input(BenchmarkId::new("BPTree", size), &size, |b, &size| {
            b.iter(|| {
                let mut tree = BPTree::new(32).unwrap();
                for i in 0..size {
                    tree.insert_or_update(i, i);
                }
                for i in 0..size {
                    black_box(tree.remove(&i));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, insert, get, remove);
criterion_main!(benches);
