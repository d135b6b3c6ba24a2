//! SHA3-flavored Ed25519: clamped key derivation, deterministic signatures
//! with canonical-S enforcement, and salted ECDH block encryption.
//!
//! This scheme is not RFC 8032 Ed25519: every hash invocation uses SHA3-512
//! (SHA3-256 for symmetric keys) instead of SHA-512, so keys and signatures
//! are not interchangeable with standard implementations. The curve math
//! itself is delegated to `curve25519-dalek`; secret-dependent scalar
//! multiplications run in constant time, while verification uses the
//! variable-time double-scalar path over public data.
//!
//! # Example
//! ```rust
//! use ridgeline_cryptography::ed25519::{self, KeyPair};
//! use rand::rngs::OsRng;
//!
//! // Generate a key pair
//! let key_pair = KeyPair::generate(&mut OsRng);
//!
//! // Sign a message
//! let msg = b"hello, world!";
//! let signature = ed25519::sign(&key_pair, msg).unwrap();
//!
//! // Verify the signature
//! assert!(ed25519::verify(key_pair.public_key(), msg, &signature));
//! ```

use crate::CryptoEngine;

mod cipher;
mod keys;
mod signer;

pub use cipher::{
    derive_shared_key, Cipher, SharedKey, IV_LENGTH, SALT_LENGTH, SHARED_KEY_LENGTH,
};
pub use keys::{
    derive_public_key, Analyzer, Generator, KeyPair, PrivateKey, PublicKey, PRIVATE_KEY_LENGTH,
    PUBLIC_KEY_LENGTH,
};
pub use signer::{
    is_canonical, make_canonical, sign, verify, Signature, Signer, SIGNATURE_LENGTH,
};

/// Capability bundle binding the SHA3 Ed25519 scheme to its engine components.
///
/// Stateless; construct once and share freely across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine;

impl CryptoEngine for Engine {
    type PrivateKey = PrivateKey;
    type PublicKey = PublicKey;
    type KeyPair = KeyPair;
    type Signature = Signature;

    type KeyGenerator = Generator;
    type DsaSigner = Signer;
    type BlockCipher = Cipher;
    type KeyAnalyzer = Analyzer;

    fn create_key_generator(&self) -> Generator {
        Generator
    }

    fn create_dsa_signer(&self, key_pair: &KeyPair) -> Signer {
        Signer::new(key_pair.clone())
    }

    fn create_block_cipher(&self, sender: &KeyPair, recipient: &KeyPair) -> Cipher {
        Cipher::new(sender.clone(), recipient.clone())
    }

    fn create_key_analyzer(&self) -> Analyzer {
        Analyzer
    }
}
