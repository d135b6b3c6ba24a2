use criterion::criterion_main;

mod encrypt_decrypt;
mod signature_verification;

criterion_main!(
    signature_generation::benches,
    signature_verification::benches,
    encrypt_decrypt::benches,
);
