// Multiscalar multiplication benchmark
//
// Run with: cargo bench --bench msm

#[macro_use]
extern crate criterion;
use criterion::{BenchmarkId, Criterion};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaChaRng;

use verkle_ipa::{multi_scalar_mul, Element, Fr, IpaConfig, ProverQuery, Transcript, VerkleProof};

fn random_scalar(rng: &mut ChaChaRng) -> Fr {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    Fr::from_bytes_le_reduced(&bytes)
}

fn bench_msm(c: &mut Criterion) {
    let mut rng = ChaChaRng::seed_from_u64(1);
    let mut group = c.benchmark_group("multi_scalar_mul");
    for &n in &[16usize, 64, 256, 1024] {
        let scalars: Vec<Fr> = (0..n).map(|_| random_scalar(&mut rng)).collect();
        let points: Vec<Element> = (0..n)
            .map(|_| Element::generator().mul_scalar(&random_scalar(&mut rng)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| multi_scalar_mul(&points, &scalars))
        });
    }
    group.finish();
}

fn bench_multiproof(c: &mut Criterion) {
    let mut rng = ChaChaRng::seed_from_u64(2);
    let config = IpaConfig::verkle();

    let queries: Vec<ProverQuery> = (0..16)
        .map(|i| {
            let poly: Vec<Fr> = (0..256).map(|_| random_scalar(&mut rng)).collect();
            let point = (i * 17) % 256;
            ProverQuery {
                commitment: config.commit(&poly),
                result: poly[point],
                poly,
                point,
            }
        })
        .collect();

    c.bench_function("multiproof create 16 queries", |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"bench");
            VerkleProof::create(&mut transcript, &config, &queries)
        })
    });

    let mut transcript = Transcript::new(b"bench");
    let proof = VerkleProof::create(&mut transcript, &config, &queries);
    let verifier_queries: Vec<_> = queries.iter().map(|q| q.into()).collect();

    c.bench_function("multiproof verify 16 queries", |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"bench");
            proof.verify(&mut transcript, &config, &verifier_queries)
        })
    });
}

criterion_group! {
    name = msm;
    config = Criterion::default().sample_size(10);
    targets = bench_msm, bench_multiproof
}
criterion_main!(msm);
