//! Generate SHA3-flavored Ed25519 keys, sign arbitrary messages, deterministically verify
//! signatures, and exchange confidential payloads.
//!
//! This crate combines an external curve implementation (via `curve25519-dalek`) with
//! SHA3-512/SHA3-256 hashing into a signing scheme, a salted ECDH shared-key derivation,
//! and an AES-256-CBC block cipher wrapper. It intentionally diverges from RFC 8032
//! (which hashes with SHA-512): all hashing here uses SHA3.
//!
//! Every component is a stateless value object. Operations that consume entropy take an
//! injected `Rng + CryptoRng`; signing itself is fully deterministic and never touches
//! the RNG.
//!
//! # Example
//! ```rust
//! use ridgeline_cryptography::{ed25519, BlockCipher, CryptoEngine, DsaSigner, KeyGenerator};
//! use rand::rngs::OsRng;
//!
//! let engine = ed25519::Engine;
//!
//! // Generate a key pair
//! let generator = engine.create_key_generator();
//! let key_pair = generator.generate_key_pair(&mut OsRng);
//!
//! // Sign and verify a message
//! let signer = engine.create_dsa_signer(&key_pair);
//! let msg = b"hello, world!";
//! let signature = signer.sign(msg).unwrap();
//! assert!(signer.verify(msg, &signature));
//!
//! // Exchange a confidential payload
//! let recipient = generator.generate_key_pair(&mut OsRng);
//! let cipher = engine.create_block_cipher(&key_pair, &recipient);
//! let blob = cipher.encrypt(&mut OsRng, b"secret").unwrap();
//! assert_eq!(cipher.decrypt(&blob).unwrap(), b"secret");
//! ```

use rand::{CryptoRng, Rng};
use thiserror::Error;

pub mod ed25519;

/// Errors that can occur when working with keys, signatures, and cipher blobs.
///
/// None of these are retryable: each is a deterministic outcome of malformed
/// input (or, for [Error::NonCanonicalSignature], a deterministic algorithmic
/// edge case). A `false` from verification is a normal outcome, not an error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("missing private key")]
    MissingPrivateKey,
    #[error("public key does not match private key")]
    KeyPairMismatch,
    #[error("invalid private key length")]
    InvalidPrivateKeyLength,
    #[error("invalid public key length")]
    InvalidPublicKeyLength,
    #[error("invalid signature length")]
    InvalidSignatureLength,
    #[error("invalid point encoding")]
    InvalidEncoding,
    #[error("produced non-canonical signature")]
    NonCanonicalSignature,
    #[error("input too short")]
    InputTooShort,
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("invalid hex")]
    InvalidHex,
}

/// Produces key pairs from injected randomness and derives public keys.
pub trait KeyGenerator: Clone + Send + Sync + 'static {
    /// The private key type produced by this generator.
    type PrivateKey;

    /// The corresponding public key type.
    type PublicKey;

    /// The key pair type bundling the two.
    type KeyPair;

    /// Draw a fresh private key seed from `rng` and return it together with
    /// its derived public key.
    fn generate_key_pair<R: Rng + CryptoRng>(&self, rng: &mut R) -> Self::KeyPair;

    /// Derive the public key for an existing private key. Pure and infallible
    /// for well-formed input.
    fn derive_public_key(&self, private_key: &Self::PrivateKey) -> Self::PublicKey;
}

/// Produces signatures over messages with a bound key pair and verifies them.
///
/// Signing is deterministic: the nonce is derived by hashing, never drawn from
/// an RNG, so signing the same message twice yields byte-identical signatures.
pub trait DsaSigner: Clone + Send + Sync + 'static {
    /// The public key type signatures are verified against.
    type PublicKey;

    /// The signature type produced by this signer.
    type Signature;

    /// Sign a message with the bound key pair's private key.
    ///
    /// Fails with [Error::MissingPrivateKey] if the bound pair is public-only,
    /// and with [Error::NonCanonicalSignature] if the deterministic computation
    /// produces an out-of-range S component. The latter is astronomically
    /// unlikely and unrecoverable: retrying with the same inputs must yield the
    /// same result.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, Error>;

    /// Verify a signature over a message against the bound pair's public key.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool;

    /// Whether the signature's S component is strictly within `(0, GroupOrder)`.
    fn is_canonical(&self, signature: &Self::Signature) -> bool;

    /// Return a signature with the same R and S reduced modulo the group order.
    ///
    /// Tooling only: neither signing nor verification ever reduces implicitly.
    fn make_canonical(&self, signature: &Self::Signature) -> Self::Signature;
}

/// Encrypts and decrypts payloads between two key pairs.
pub trait BlockCipher: Clone + Send + Sync + 'static {
    /// Encrypt a plaintext, drawing a fresh salt and IV from `rng`.
    fn encrypt<R: Rng + CryptoRng>(&self, rng: &mut R, plaintext: &[u8])
        -> Result<Vec<u8>, Error>;

    /// Decrypt a blob produced by [BlockCipher::encrypt].
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Inspects key material.
pub trait KeyAnalyzer: Clone + Send + Sync + 'static {
    /// The public key type this analyzer inspects.
    type PublicKey;

    /// Whether the public key is in compressed (32-byte) form.
    fn is_key_compressed(&self, public_key: &Self::PublicKey) -> bool;
}

/// Stateless capability bundle binding one curve implementation to factories
/// for its signer, key generator, block cipher, and key analyzer.
///
/// Constructed once and shared by all callers; contains no mutable state. Call
/// sites written against this trait keep working if the curve implementation
/// is swapped out.
pub trait CryptoEngine: Clone + Send + Sync + 'static {
    /// The private key type of the bound curve.
    type PrivateKey;

    /// The public key type of the bound curve.
    type PublicKey;

    /// The key pair type of the bound curve.
    type KeyPair;

    /// The signature type of the bound curve.
    type Signature;

    /// The key generator created by this engine.
    type KeyGenerator: KeyGenerator<
        PrivateKey = Self::PrivateKey,
        PublicKey = Self::PublicKey,
        KeyPair = Self::KeyPair,
    >;

    /// The signer created by this engine.
    type DsaSigner: DsaSigner<PublicKey = Self::PublicKey, Signature = Self::Signature>;

    /// The block cipher created by this engine.
    type BlockCipher: BlockCipher;

    /// The key analyzer created by this engine.
    type KeyAnalyzer: KeyAnalyzer<PublicKey = Self::PublicKey>;

    /// Create a key generator.
    fn create_key_generator(&self) -> Self::KeyGenerator;

    /// Create a signer bound to `key_pair`.
    fn create_dsa_signer(&self, key_pair: &Self::KeyPair) -> Self::DsaSigner;

    /// Create a block cipher bound to a sender and recipient pair.
    fn create_block_cipher(
        &self,
        sender: &Self::KeyPair,
        recipient: &Self::KeyPair,
    ) -> Self::BlockCipher;

    /// Create a key analyzer.
    fn create_key_analyzer(&self) -> Self::KeyAnalyzer;
}
