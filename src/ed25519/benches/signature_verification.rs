use criterion::{criterion_group, BatchSize, Criterion};
use rand::{thread_rng, Rng};
use ridgeline_cryptography::ed25519::{self, KeyPair};
use std::hint::black_box;

fn benchmark_signature_verification(c: &mut Criterion) {
    let mut msg = [0u8; 32];
    thread_rng().fill(&mut msg);
    c.bench_function(&format!("{}/msg_len={}", module_path!(), msg.len()), |b| {
        b.iter_batched(
            || {
                let key_pair = KeyPair::generate(&mut thread_rng());
                let signature = ed25519::sign(&key_pair, &msg).unwrap();
                (key_pair, signature)
            },
            |(key_pair, signature)| {
                black_box(ed25519::verify(key_pair.public_key(), &msg, &signature));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_signature_verification
}
