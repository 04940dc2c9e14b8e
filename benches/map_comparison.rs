use core::hash::BuildHasher;
use core::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use criterion::Throughput;
use hopscotch_map::HopscotchMap;
use rand::rngs::OsRng;
use rand::TryRngCore;
use siphasher::sip::SipHasher;

#[derive(Clone)]
struct SipHashBuilder {
    k1: u64,
    k2: u64,
}

impl BuildHasher for SipHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

impl Default for SipHashBuilder {
    fn default() -> Self {
        let mut rng = OsRng;
        Self {
            k1: rng.try_next_u64().unwrap_or(0),
            k2: rng.try_next_u64().unwrap_or(0),
        }
    }
}

const SIZES: &[usize] = &[
    ((1 << 10) as f32 * 0.87) as usize,
    ((1 << 15) as f32 * 0.87) as usize,
    ((1 << 19) as f32 * 0.87) as usize,
];

fn make_items(size: usize) -> Vec<(String, u64)> {
    (0..size)
        .map(|i| (format!("key_{}", i), i as u64))
        .collect()
}

fn bench_insert_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_sequential");

    for &size in SIZES {
        let items = make_items(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("hopscotch_map/{}", size), |b| {
            b.iter(|| {
                let mut map = HopscotchMap::with_hasher(SipHashBuilder::default());
                for (key, value) in items.iter().cloned() {
                    map.insert(key, value);
                }
                black_box(map)
            })
        });
        group.bench_function(format!("hopscotch_map_preallocated/{}", size), |b| {
            b.iter(|| {
                let mut map =
                    HopscotchMap::with_capacity_and_hasher(size, SipHashBuilder::default());
                for (key, value) in items.iter().cloned() {
                    map.insert(key, value);
                }
                black_box(map)
            })
        });
        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                let mut map = hashbrown::HashMap::with_hasher(SipHashBuilder::default());
                for (key, value) in items.iter().cloned() {
                    map.insert(key, value);
                }
                black_box(map)
            })
        });
        group.bench_function(format!("std/{}", size), |b| {
            b.iter(|| {
                let mut map = std::collections::HashMap::with_hasher(SipHashBuilder::default());
                for (key, value) in items.iter().cloned() {
                    map.insert(key, value);
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn bench_lookup_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_hit");

    for &size in SIZES {
        let items = make_items(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut hop = HopscotchMap::with_capacity_and_hasher(size, SipHashBuilder::default());
        let mut brown = hashbrown::HashMap::with_hasher(SipHashBuilder::default());
        let mut std_map = std::collections::HashMap::with_hasher(SipHashBuilder::default());
        for (key, value) in items.iter().cloned() {
            hop.insert(key.clone(), value);
            brown.insert(key.clone(), value);
            std_map.insert(key, value);
        }

        group.bench_function(format!("hopscotch_map/{}", size), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for (key, _) in items.iter() {
                    sum = sum.wrapping_add(*hop.get(black_box(key)).unwrap());
                }
                black_box(sum)
            })
        });
        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for (key, _) in items.iter() {
                    sum = sum.wrapping_add(*brown.get(black_box(key)).unwrap());
                }
                black_box(sum)
            })
        });
        group.bench_function(format!("std/{}", size), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for (key, _) in items.iter() {
                    sum = sum.wrapping_add(*std_map.get(black_box(key)).unwrap());
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_lookup_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_miss");

    for &size in SIZES {
        let items = make_items(size);
        let missing: Vec<String> = (0..size).map(|i| format!("missing_{}", i)).collect();
        group.throughput(Throughput::Elements(size as u64));

        let mut hop = HopscotchMap::with_capacity_and_hasher(size, SipHashBuilder::default());
        for (key, value) in items.iter().cloned() {
            hop.insert(key, value);
        }

        group.bench_function(format!("hopscotch_map/{}", size), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in missing.iter() {
                    hits += usize::from(hop.get(black_box(key)).is_some());
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_reinsert");

    for &size in SIZES {
        let items = make_items(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut hop = HopscotchMap::with_capacity_and_hasher(size, SipHashBuilder::default());
        for (key, value) in items.iter().cloned() {
            hop.insert(key, value);
        }

        group.bench_function(format!("hopscotch_map/{}", size), |b| {
            b.iter(|| {
                for (key, value) in items.iter() {
                    let removed = hop.remove(black_box(key)).unwrap();
                    hop.insert(key.clone(), removed.wrapping_add(*value));
                }
                black_box(hop.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sequential,
    bench_lookup_hit,
    bench_lookup_miss,
    bench_remove_reinsert
);
criterion_main!(benches);
