// Copyright 2025 the VESS Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use vess_tree_map::{FixupStats, TreeMap};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

fn random_keys(n: u32, seed: u64) -> Vec<u32> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_u32()).collect()
}

fn build(keys: &[u32]) -> TreeMap<u32, u32> {
    let mut map = TreeMap::with_capacity(keys.len());
    for &key in keys {
        map.insert(key, key);
    }
    map
}

fn bench_tree_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("vess_tree_map");
    group.sample_size(50);

    for &n in &[256_u32, 4_096, 65_536] {
        let ascending: Vec<u32> = (0..n).collect();
        let random = random_keys(n, 0x7EE0_0000_0000_0001);

        group.bench_function(format!("insert_ascending(n={n})"), |b| {
            b.iter(|| black_box(build(&ascending)));
        });

        group.bench_function(format!("insert_random(n={n})"), |b| {
            b.iter(|| black_box(build(&random)));
        });

        group.bench_function(format!("btreemap_insert_random(n={n})"), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &key in &random {
                    map.entry(key).or_insert(key);
                }
                black_box(map)
            });
        });

        let map = build(&random);
        let probes = random_keys(n, 0x7EE0_0000_0000_0002);
        group.bench_function(format!("get_hit_and_miss(n={n})"), |b| {
            b.iter(|| {
                let hits = random
                    .iter()
                    .chain(&probes)
                    .filter(|key| map.get(key).is_some())
                    .count();
                black_box(hits)
            });
        });

        group.bench_function(format!("iterate(n={n})"), |b| {
            b.iter(|| black_box(map.values().fold(0_u64, |acc, &v| acc + u64::from(v))));
        });

        group.bench_function(format!("remove_random(n={n})"), |b| {
            b.iter_batched(
                || map.clone(),
                |mut map| {
                    for key in &random {
                        map.remove(key);
                    }
                    black_box(map);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("remove_random_traced(n={n})"), |b| {
            b.iter_batched(
                || (map.clone(), FixupStats::new()),
                |(mut map, mut stats)| {
                    for key in &random {
                        map.remove_with_trace(key, &mut stats);
                    }
                    black_box(stats.rotations());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tree_map);
criterion_main!(benches);
