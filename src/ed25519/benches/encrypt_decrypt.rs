use criterion::{criterion_group, BatchSize, Criterion};
use rand::thread_rng;
use ridgeline_cryptography::{
    ed25519::{Cipher, KeyPair},
    BlockCipher,
};
use std::hint::black_box;

fn benchmark_encrypt_decrypt(c: &mut Criterion) {
    let plaintext = vec![0xABu8; 1024];
    c.bench_function(
        &format!("{}/msg_len={}", module_path!(), plaintext.len()),
        |b| {
            b.iter_batched(
                || {
                    let sender = KeyPair::generate(&mut thread_rng());
                    let recipient = KeyPair::generate(&mut thread_rng());
                    Cipher::new(sender, recipient)
                },
                |cipher| {
                    let blob = cipher.encrypt(&mut thread_rng(), &plaintext).unwrap();
                    black_box(cipher.decrypt(&blob).unwrap());
                },
                BatchSize::SmallInput,
            );
        },
    );
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_encrypt_decrypt
}
