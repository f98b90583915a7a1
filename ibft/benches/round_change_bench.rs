// Round-change benchmarks for NOVA IBFT.
//
// Covers message signing and verification, full validation of a round
// change carrying a prepared certificate, and collecting a quorum through
// the manager for several validator-set sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use nova_ibft::crypto::NodeKey;
use nova_ibft::messages::{
    ConsensusRoundIdentifier, PreparePayload, PreparedCertificate, RoundChangePayload, SignedData,
};
use nova_ibft::statemachine::RoundChangeManager;
use nova_ibft::validation::{Ed25519ValidatorFactory, HeightContext, MessageValidator, ValidatorFactory};

const HEIGHT: u64 = 1;

fn keys(n: usize) -> Vec<NodeKey> {
    (0..n).map(|_| NodeKey::generate()).collect()
}

fn round_change(key: &NodeKey, round: u32) -> SignedData<RoundChangePayload> {
    let target = ConsensusRoundIdentifier::new(HEIGHT, round);
    SignedData::sign(RoundChangePayload::new(target, None), key).unwrap()
}

fn bench_round_change_sign(c: &mut Criterion) {
    let key = NodeKey::generate();

    c.bench_function("round_change/sign", |b| {
        b.iter(|| round_change(&key, 1));
    });
}

fn bench_round_change_verify(c: &mut Criterion) {
    let key = NodeKey::generate();
    let msg = round_change(&key, 1);

    c.bench_function("round_change/verify_signature", |b| {
        b.iter(|| msg.verify_signature());
    });
}

fn bench_prepared_certificate_validation(c: &mut Criterion) {
    let keys = keys(7);
    let digest = [0x5Au8; 32];
    let prepared_round = ConsensusRoundIdentifier::new(HEIGHT, 0);
    // Quorum for 7 is 5, so 4 prepares.
    let prepares = keys[1..5]
        .iter()
        .map(|k| SignedData::sign(PreparePayload::new(prepared_round, digest), k).unwrap())
        .collect();
    let cert = PreparedCertificate::new(prepared_round, digest, prepares);
    let msg = SignedData::sign(
        RoundChangePayload::new(ConsensusRoundIdentifier::new(HEIGHT, 1), Some(cert)),
        &keys[0],
    )
    .unwrap();

    let context = HeightContext {
        sequence_number: HEIGHT,
        validators: keys.iter().map(NodeKey::address).collect(),
        required_prepare_count: 4,
    };
    let validator = Ed25519ValidatorFactory.create_validator(&context);

    c.bench_function("round_change/validate_with_prepared_certificate", |b| {
        b.iter(|| assert!(validator.validate(&msg)));
    });
}

fn bench_collect_quorum(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_change/collect_quorum");

    for validator_count in [4, 7, 13, 21] {
        let keys = keys(validator_count);
        let votes: Vec<_> = keys.iter().map(|k| round_change(k, 1)).collect();

        group.throughput(Throughput::Elements(validator_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(validator_count),
            &votes,
            |b, votes| {
                b.iter_with_setup(
                    || {
                        let manager = RoundChangeManager::new(
                            HEIGHT,
                            keys.iter().map(NodeKey::address),
                            Ed25519ValidatorFactory,
                        );
                        (manager, votes.clone())
                    },
                    |(mut manager, votes)| {
                        let minted = votes
                            .into_iter()
                            .filter_map(|v| manager.append_round_change_message(v))
                            .count();
                        assert_eq!(minted, 1);
                    },
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_round_change_sign,
    bench_round_change_verify,
    bench_prepared_certificate_validation,
    bench_collect_quorum,
);
criterion_main!(benches);
