// Signing & verification benchmarks for the NOVA EVM envelope.
//
// Covers secp256k1 keypair generation, RLP encoding and decoding, sign hash
// computation, transaction signing, and sender recovery across payload sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigInt;

use nova_evm::crypto::{generate_address, EthKeypair};
use nova_evm::transaction::MsgEthereumTx;

fn transfer(payload_len: usize) -> MsgEthereumTx {
    MsgEthereumTx::new(
        42,
        Some(generate_address()),
        Some(BigInt::from(1_000_000_000_000_000_000u64)),
        21_000,
        Some(BigInt::from(20_000_000_000u64)),
        vec![0xAB; payload_len],
    )
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("secp256k1/keypair_generate", |b| {
        b.iter(EthKeypair::generate);
    });
}

fn bench_sign_hash(c: &mut Criterion) {
    let msg = transfer(0);

    c.bench_function("evm/sign_hash", |b| {
        b.iter(|| msg.sign_hash(1).unwrap());
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let keypair = EthKeypair::generate();
    let template = transfer(0);

    c.bench_function("evm/sign_transaction", |b| {
        b.iter(|| {
            let mut msg = template.clone();
            msg.sign(1, &keypair).unwrap();
        });
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let keypair = EthKeypair::generate();
    let mut msg = transfer(0);
    msg.sign(1, &keypair).unwrap();

    c.bench_function("evm/verify_signature", |b| {
        b.iter(|| msg.verify_signature(1).unwrap());
    });
}

fn bench_rlp_roundtrip(c: &mut Criterion) {
    let keypair = EthKeypair::generate();
    let mut group = c.benchmark_group("evm/rlp_roundtrip");

    for size in [0usize, 128, 1024, 16 * 1024] {
        let mut msg = transfer(size);
        msg.sign(1, &keypair).unwrap();
        let wire = msg.rlp_bytes().unwrap();

        group.throughput(Throughput::Bytes(wire.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &msg, |b, msg| {
            b.iter(|| MsgEthereumTx::decode_rlp(&msg.rlp_bytes().unwrap()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_hash,
    bench_sign_transaction,
    bench_verify_signature,
    bench_rlp_roundtrip,
);
criterion_main!(benches);
