use crate::{Error, KeyAnalyzer, KeyGenerator};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use rand::{CryptoRng, Rng};
use sha3::{Digest, Sha3_512};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a private key seed in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 private key seed.
///
/// Treated as opaque bytes: never logged (`Debug`/`Display` are redacted),
/// compared in constant time, and zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    raw: [u8; PRIVATE_KEY_LENGTH],
}

impl PrivateKey {
    /// Parse a private key from its 64-character hex form.
    pub fn from_hex(encoded: &str) -> Result<Self, Error> {
        let raw = hex::decode(encoded).map_err(|_| Error::InvalidHex)?;
        Self::try_from(raw.as_slice())
    }

    /// The raw seed bytes. Callers must not persist or log these.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.raw
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.raw.ct_eq(&other.raw))
    }
}

impl Eq for PrivateKey {}

impl From<[u8; PRIVATE_KEY_LENGTH]> for PrivateKey {
    fn from(raw: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self { raw }
    }
}

impl TryFrom<&[u8]> for PrivateKey {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; PRIVATE_KEY_LENGTH] = value
            .try_into()
            .map_err(|_| Error::InvalidPrivateKeyLength)?;
        Ok(Self { raw })
    }
}

impl TryFrom<&Vec<u8>> for PrivateKey {
    type Error = Error;
    fn try_from(value: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl TryFrom<Vec<u8>> for PrivateKey {
    type Error = Error;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// Ed25519 public key: a 32-byte compressed curve point.
///
/// Construction validates length only. Decoding to a curve point happens
/// lazily at first curve use; an invalid encoding is a hard failure at that
/// point, not at construction.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PublicKey {
    raw: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Parse a public key from its 64-character hex form.
    pub fn from_hex(encoded: &str) -> Result<Self, Error> {
        let raw = hex::decode(encoded).map_err(|_| Error::InvalidHex)?;
        Self::try_from(raw.as_slice())
    }

    /// Decode the compressed encoding into a curve point.
    pub(crate) fn decode(&self) -> Result<EdwardsPoint, Error> {
        CompressedEdwardsY(self.raw)
            .decompress()
            .ok_or(Error::InvalidEncoding)
    }

    /// Constant-time check for the all-zero encoding.
    pub(crate) fn is_zero(&self) -> bool {
        bool::from(self.raw.ct_eq(&[0u8; PUBLIC_KEY_LENGTH]))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for PublicKey {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for PublicKey {
    fn from(raw: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { raw }
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; PUBLIC_KEY_LENGTH] =
            value.try_into().map_err(|_| Error::InvalidPublicKeyLength)?;
        Ok(Self { raw })
    }
}

impl TryFrom<&Vec<u8>> for PublicKey {
    type Error = Error;
    fn try_from(value: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = Error;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.raw))
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.raw))
    }
}

/// A public key with an optional private half.
///
/// Invariant: when the private half is present, the public key equals
/// [derive_public_key] of it. All constructors preserve this.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: Option<PrivateKey>,
    public: PublicKey,
}

impl KeyPair {
    /// Draw a fresh 32-byte seed from `rng` and derive its public key.
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; PRIVATE_KEY_LENGTH];
        rng.fill(&mut seed);
        Self::from_private(PrivateKey::from(seed))
    }

    /// Build a pair from a private key, deriving the public half.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = derive_public_key(&private);
        Self {
            private: Some(private),
            public,
        }
    }

    /// Build a verify-only pair holding no private key.
    pub fn from_public(public: PublicKey) -> Self {
        Self {
            private: None,
            public,
        }
    }

    /// Build a pair from both halves, rejecting a public key that does not
    /// match the private one.
    pub fn new(private: PrivateKey, public: PublicKey) -> Result<Self, Error> {
        if derive_public_key(&private) != public {
            return Err(Error::KeyPairMismatch);
        }
        Ok(Self {
            private: Some(private),
            public,
        })
    }

    /// Whether this pair can sign and decrypt.
    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// The private half, if present.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private.as_ref()
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn require_private(&self) -> Result<&PrivateKey, Error> {
        self.private.as_ref().ok_or(Error::MissingPrivateKey)
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("has_private", &self.private.is_some())
            .finish()
    }
}

/// Hashes a private key seed with SHA3-512 and clamps the first half into a
/// scalar ready for multiplication.
///
/// The clamp clears the low three bits (multiple of the cofactor, defeating
/// small-subgroup confinement), clears bit 255, and sets bit 254. This is the
/// only place seed bytes are hashed for scalar use; both signing and
/// shared-key derivation go through it.
pub(crate) fn prepare_scalar(private_key: &PrivateKey) -> [u8; 32] {
    let digest = Sha3_512::digest(private_key.as_bytes());
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&digest[..32]);
    scalar[0] &= 0xF8;
    scalar[31] &= 0x7F;
    scalar[31] |= 0x40;
    scalar
}

/// Derives the public key for a private key seed: the clamped scalar times
/// the basepoint, compressed. Pure and infallible.
pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    let point = EdwardsPoint::mul_base_clamped(prepare_scalar(private_key));
    PublicKey::from(point.compress().to_bytes())
}

/// Key generator for the SHA3 Ed25519 scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generator;

impl KeyGenerator for Generator {
    type PrivateKey = PrivateKey;
    type PublicKey = PublicKey;
    type KeyPair = KeyPair;

    fn generate_key_pair<R: Rng + CryptoRng>(&self, rng: &mut R) -> KeyPair {
        KeyPair::generate(rng)
    }

    fn derive_public_key(&self, private_key: &PrivateKey) -> PublicKey {
        derive_public_key(private_key)
    }
}

/// Key analyzer for the SHA3 Ed25519 scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analyzer;

impl Analyzer {
    /// Whether an externally supplied encoding is in compressed form.
    pub fn is_bytes_compressed(bytes: &[u8]) -> bool {
        bytes.len() == PUBLIC_KEY_LENGTH
    }
}

impl KeyAnalyzer for Analyzer {
    type PublicKey = PublicKey;

    fn is_key_compressed(&self, public_key: &PublicKey) -> bool {
        Self::is_bytes_compressed(public_key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_derive_public_key_vector() {
        // Fixed regression vector for the SHA3-512 seed hash.
        let private_key = PrivateKey::from_hex(
            "787225aaff3d2c71f4ffa32d4f19ec4922f3cd869747f267378f81f8e3fcb12d",
        )
        .unwrap();
        let public_key = derive_public_key(&private_key);
        assert_eq!(
            public_key.to_string(),
            "1026d70e1954775749c6811084d6450a3184d977383f0e4282cd47118af37755"
        );
    }

    #[test]
    fn test_derive_public_key_deterministic() {
        let seed = [7u8; PRIVATE_KEY_LENGTH];
        let first = derive_public_key(&PrivateKey::from(seed));
        let second = derive_public_key(&PrivateKey::from(seed));
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_public_keys_decode() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let key_pair = KeyPair::generate(&mut rng);
            assert!(key_pair.public_key().decode().is_ok());
        }
    }

    #[test]
    fn test_prepare_scalar_clamp_bits() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..32 {
            let mut seed = [0u8; PRIVATE_KEY_LENGTH];
            rng.fill(&mut seed);
            let scalar = prepare_scalar(&PrivateKey::from(seed));
            assert_eq!(scalar[0] & 0x07, 0);
            assert_eq!(scalar[31] & 0x80, 0);
            assert_eq!(scalar[31] & 0x40, 0x40);
        }
    }

    #[test]
    fn test_key_pair_new_enforces_match() {
        let mut rng = StdRng::seed_from_u64(2);
        let key_pair = KeyPair::generate(&mut rng);
        let other = KeyPair::generate(&mut rng);
        let private = key_pair.private_key().unwrap().clone();

        let rebuilt = KeyPair::new(private.clone(), key_pair.public_key().clone()).unwrap();
        assert_eq!(rebuilt.public_key(), key_pair.public_key());

        assert_eq!(
            KeyPair::new(private, other.public_key().clone()),
            Err(Error::KeyPairMismatch)
        );
    }

    #[test]
    fn test_key_pair_public_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let key_pair = KeyPair::generate(&mut rng);
        let public_only = KeyPair::from_public(key_pair.public_key().clone());
        assert!(!public_only.has_private());
        assert!(public_only.private_key().is_none());
        assert_eq!(
            public_only.require_private().unwrap_err(),
            Error::MissingPrivateKey
        );
    }

    #[test]
    fn test_private_key_hex_rejects_malformed() {
        assert_eq!(
            PrivateKey::from_hex("not hex at all"),
            Err(Error::InvalidHex)
        );
        assert_eq!(
            PrivateKey::from_hex("abcd"),
            Err(Error::InvalidPrivateKeyLength)
        );
    }

    #[test]
    fn test_public_key_length_validation() {
        assert_eq!(
            PublicKey::try_from(vec![0u8; 31]),
            Err(Error::InvalidPublicKeyLength)
        );
        assert_eq!(
            PublicKey::try_from(vec![0u8; 33]),
            Err(Error::InvalidPublicKeyLength)
        );
        assert!(PublicKey::try_from(vec![0u8; 32]).is_ok());
    }

    #[test]
    fn test_private_key_debug_redacted() {
        let private_key = PrivateKey::from([0xAB; PRIVATE_KEY_LENGTH]);
        let rendered = format!("{:?}", private_key);
        assert!(!rendered.contains("ab"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_public_key_hex_round_trip() {
        let mut rng = StdRng::seed_from_u64(4);
        let key_pair = KeyPair::generate(&mut rng);
        let encoded = key_pair.public_key().to_string();
        assert_eq!(
            &PublicKey::from_hex(&encoded).unwrap(),
            key_pair.public_key()
        );
    }

    #[test]
    fn test_analyzer() {
        let mut rng = StdRng::seed_from_u64(5);
        let key_pair = KeyPair::generate(&mut rng);
        assert!(Analyzer.is_key_compressed(key_pair.public_key()));
        assert!(Analyzer::is_bytes_compressed(&[0u8; 32]));
        assert!(!Analyzer::is_bytes_compressed(&[0u8; 33]));
    }
}
