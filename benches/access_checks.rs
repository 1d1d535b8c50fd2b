use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use poolgate::{AllowList, Deployment, DeploymentSettings, PoolSettings, Principal};

fn gen_principals(n: usize, seed: u64) -> Vec<Principal> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Principal::new(format!("0x{:016x}", rng.gen::<u64>()))).collect()
}

fn deployment() -> Deployment {
    let mut settings = DeploymentSettings::new(Principal::new("0xoperator"));
    settings.terms_of_service = Some("https://terms.example".into());
    match Deployment::provision(&settings) {
        Ok(d) => d,
        Err(e) => panic!("provision: {e:#}"),
    }
}

fn bench_access(c: &mut Criterion) {
    let ns = [1_000usize, 10_000usize];
    let mut group = c.benchmark_group("allow_list");
    group.sampling_mode(SamplingMode::Flat);
    group.sample_size(20);

    for &n in &ns {
        group.throughput(Throughput::Elements(n as u64));

        // Plain list: operator check + insert + event
        group.bench_with_input(BenchmarkId::new("allow_plain", n.to_string()), &n, |b, &n| {
            let principals = gen_principals(n, 0xBEEF_CAFE);
            b.iter(|| {
                let d = deployment();
                let op = d.operator().clone();
                for p in &principals { let _ = d.pool_managers.allow(&op, p); }
                criterion::black_box(d.pool_managers.members().len());
            });
        });

        // ToS-gated list: adds the registry lookup per call
        group.bench_with_input(BenchmarkId::new("allow_gated", n.to_string()), &n, |b, &n| {
            let principals = gen_principals(n, 0xDEAD_BEEF);
            b.iter(|| {
                let d = deployment();
                let op = d.operator().clone();
                for p in &principals {
                    let _ = d.tos_registry.accept_terms_of_service(p);
                    let _ = d.pool_admins.allow(&op, p);
                }
                criterion::black_box(d.pool_admins.members().len());
            });
        });

        // Build once for lookups
        let d = deployment();
        let op = d.operator().clone();
        let members = gen_principals(n, 0x9E37_79B9);
        for p in &members {
            let _ = d.tos_registry.accept_terms_of_service(p);
            let _ = d.pool_admins.allow(&op, p);
        }
        let probes = gen_principals(n, 0xFACE_FEED);

        // Mixed hits and misses
        group.bench_with_input(BenchmarkId::new("is_allowed", n.to_string()), &n, |b, _| {
            let list: &AllowList = &d.pool_admins;
            b.iter(|| {
                let mut hits = 0usize;
                for (m, p) in members.iter().zip(&probes) {
                    if list.is_allowed(m) { hits += 1; }
                    if list.is_allowed(p) { hits += 1; }
                }
                criterion::black_box(hits);
            });
        });

        // Factory gate only; controllers are cheap
        group.bench_with_input(BenchmarkId::new("create_pool", n.to_string()), &n, |b, _| {
            b.iter(|| {
                for m in members.iter().take(100) {
                    let r = d.factory.create_pool(m, "0xusdc".into(), &d.withdraw_controllers, &d.pool_controllers, PoolSettings::default());
                    criterion::black_box(r.is_ok());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_access);
criterion_main!(benches);
