use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};

use identity_normalizer::{equal, extract, mask_for_logging, normalize};

fn gen_oids(n: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let u = uuid::Uuid::from_u128(rng.gen::<u128>()).hyphenated().to_string();
            // every fourth value uppercase, every seventh malformed
            if i % 7 == 0 { u[1..].to_string() } else if i % 4 == 0 { u.to_uppercase() } else { u }
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let ns = [1_000usize, 10_000usize];
    let mut group = c.benchmark_group("oid");
    group.sample_size(30);

    for &n in &ns {
        let oids = gen_oids(n, 0xBEEF_CAFE);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("normalize", n), &oids, |b, oids| {
            b.iter(|| {
                let ok = oids.iter().filter(|s| normalize(s.as_str()).is_some()).count();
                criterion::black_box(ok);
            });
        });

        group.bench_with_input(BenchmarkId::new("equal_pairwise", n), &oids, |b, oids| {
            b.iter(|| {
                let hits = oids.windows(2).filter(|w| equal(w[0].as_str(), w[1].as_str())).count();
                criterion::black_box(hits);
            });
        });

        let docs: Vec<Value> = oids.iter().map(|o| json!({ "oid": "not-a-guid", "sub": o, "id": 1 })).collect();
        group.bench_with_input(BenchmarkId::new("extract_fallthrough", n), &docs, |b, docs| {
            b.iter(|| {
                let ok = docs.iter().filter(|d| extract(*d).is_some()).count();
                criterion::black_box(ok);
            });
        });

        group.bench_with_input(BenchmarkId::new("mask", n), &oids, |b, oids| {
            b.iter(|| {
                for s in oids { criterion::black_box(mask_for_logging(s.as_str())); }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
