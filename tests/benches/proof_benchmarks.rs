//! # State Validator Benchmarks
//!
//! | Operation | Input |
//! |-----------|-------|
//! | Proof replay | 1..256 claimed leaves in a 10k-leaf tree |
//! | Proof generation | same |
//! | Full validation | sum script through `StateValidatorService` |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_state_validator::prelude::*;
use qc_tests::fixtures::{random_leaves, World};
use std::time::Duration;

const TREE_SIZE: usize = 10_000;

// ============================================================================
// PROOF REPLAY
// ============================================================================

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-proof-verification");
    group.measurement_time(Duration::from_secs(5));

    let leaves = random_leaves(7, TREE_SIZE);
    let tree = SparseMerkleTree::from_leaves(leaves.clone());
    let root = tree.root();
    let verifier = MerkleProofVerifier::default();

    for claimed in [1usize, 16, 64, 256] {
        let claims: Vec<(H256, H256)> = leaves.iter().step_by(TREE_SIZE / claimed).take(claimed).copied().collect();
        let keys: Vec<H256> = claims.iter().map(|(k, _)| *k).collect();
        let proof = tree.merkle_proof(&keys).encode();

        group.throughput(Throughput::Elements(claimed as u64));
        group.bench_with_input(
            BenchmarkId::new("verify", claimed),
            &(claims, proof),
            |b, (claims, proof)| b.iter(|| black_box(verifier.verify(&root, claims, proof).is_ok())),
        );
    }

    group.finish();
}

// ============================================================================
// PROOF GENERATION
// ============================================================================

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-proof-generation");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let leaves = random_leaves(11, TREE_SIZE);
    let tree = SparseMerkleTree::from_leaves(leaves.clone());

    for claimed in [1usize, 64] {
        let keys: Vec<H256> = leaves.iter().take(claimed).map(|(k, _)| *k).collect();
        group.bench_with_input(BenchmarkId::new("merkle_proof", claimed), &keys, |b, keys| {
            b.iter(|| black_box(tree.merkle_proof(keys).len()))
        });
    }

    group.bench_function("root", |b| b.iter(|| black_box(tree.root())));
    group.finish();
}

// ============================================================================
// END TO END
// ============================================================================

fn bench_service_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-service");

    let world = World::new();
    let request = world
        .honest_request(world.alice, world.counter, 1u64.to_le_bytes().to_vec())
        .expect("honest request");
    let encoded = request.encode().expect("encodable request");

    group.bench_function("validate_sum", |b| {
        b.iter(|| black_box(world.service.validate(&request).is_ok()))
    });
    group.bench_function("validate_encoded_sum", |b| {
        b.iter(|| black_box(world.service.validate_encoded(&encoded).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_proof_verification,
    bench_proof_generation,
    bench_service_validation
);
criterion_main!(benches);
