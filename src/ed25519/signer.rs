use crate::{
    ed25519::keys::{prepare_scalar, KeyPair, PublicKey},
    DsaSigner, Error,
};
use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use sha3::{Digest, Sha3_512};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
};
use subtle::ConstantTimeEq;

/// Length of a signature in bytes: `R ‖ S`, 32 bytes each.
pub const SIGNATURE_LENGTH: usize = 64;

const COMPONENT_LENGTH: usize = 32;

/// Ed25519 signature.
///
/// Wire format is the 64-byte concatenation `R ‖ S`, both components
/// little-endian integers. R carries no range restriction beyond its length;
/// canonical signatures satisfy `0 < S < GroupOrder` (see [is_canonical]).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Signature {
    raw: [u8; SIGNATURE_LENGTH],
}

impl Signature {
    /// Assemble a signature from its two components.
    pub fn new(r: [u8; COMPONENT_LENGTH], s: [u8; COMPONENT_LENGTH]) -> Self {
        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw[..COMPONENT_LENGTH].copy_from_slice(&r);
        raw[COMPONENT_LENGTH..].copy_from_slice(&s);
        Self { raw }
    }

    /// Parse a signature from its 128-character hex form.
    pub fn from_hex(encoded: &str) -> Result<Self, Error> {
        let raw = hex::decode(encoded).map_err(|_| Error::InvalidHex)?;
        Self::try_from(raw.as_slice())
    }

    /// The R component (encoded curve point).
    pub fn r(&self) -> [u8; COMPONENT_LENGTH] {
        let mut r = [0u8; COMPONENT_LENGTH];
        r.copy_from_slice(&self.raw[..COMPONENT_LENGTH]);
        r
    }

    /// The S component (little-endian integer).
    pub fn s(&self) -> [u8; COMPONENT_LENGTH] {
        let mut s = [0u8; COMPONENT_LENGTH];
        s.copy_from_slice(&self.raw[COMPONENT_LENGTH..]);
        s
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for Signature {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(raw: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { raw }
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; SIGNATURE_LENGTH] = value
            .try_into()
            .map_err(|_| Error::InvalidSignatureLength)?;
        Ok(Self { raw })
    }
}

impl TryFrom<&Vec<u8>> for Signature {
    type Error = Error;
    fn try_from(value: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl TryFrom<Vec<u8>> for Signature {
    type Error = Error;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.raw))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.raw))
    }
}

/// The verification challenge `H512(R ‖ publicKey ‖ message)` reduced modulo
/// the group order.
fn challenge(big_r: &[u8; COMPONENT_LENGTH], public_key: &PublicKey, message: &[u8]) -> Scalar {
    let mut wide = [0u8; 64];
    wide.copy_from_slice(
        &Sha3_512::new()
            .chain_update(big_r)
            .chain_update(public_key)
            .chain_update(message)
            .finalize(),
    );
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Sign a message with the key pair's private key.
///
/// Deterministic: the nonce is `H512(H512(seed)[32..] ‖ message)` reduced
/// modulo the group order, so the same `(key, message)` always yields the
/// same signature. A non-canonical result fails with
/// [Error::NonCanonicalSignature]; callers must treat that as fatal, since
/// retrying a deterministic computation cannot change the outcome.
pub fn sign(key_pair: &KeyPair, message: &[u8]) -> Result<Signature, Error> {
    let private_key = key_pair.require_private()?;

    let mut seed_hash = [0u8; 64];
    seed_hash.copy_from_slice(&Sha3_512::digest(private_key.as_bytes()));

    let mut wide = [0u8; 64];
    wide.copy_from_slice(
        &Sha3_512::new()
            .chain_update(&seed_hash[32..])
            .chain_update(message)
            .finalize(),
    );
    let r = Scalar::from_bytes_mod_order_wide(&wide);
    let big_r = EdwardsPoint::mul_base(&r).compress().to_bytes();

    let k = challenge(&big_r, key_pair.public_key(), message);
    let a = Scalar::from_bytes_mod_order(prepare_scalar(private_key));
    let s = k * a + r;

    let signature = Signature::new(big_r, s.to_bytes());
    if !is_canonical(&signature) {
        // Defensive invariant check: a reduced scalar can only trip this as S = 0.
        return Err(Error::NonCanonicalSignature);
    }
    Ok(signature)
}

/// Verify a signature over a message.
///
/// Non-canonical signatures and the all-zero public key are rejected outright.
/// Returns `false` (never an error) on any failure.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let s = match canonical_scalar(signature) {
        Some(s) => s,
        None => return false,
    };
    // The all-zero encoding decompresses to a valid small-order point, so it
    // must be rejected explicitly.
    if public_key.is_zero() {
        return false;
    }
    let point = match public_key.decode() {
        Ok(point) => point,
        Err(_) => return false,
    };
    let k = challenge(&signature.r(), public_key, message);

    // S·B - k·A; variable time is fine, all inputs are public.
    let candidate = EdwardsPoint::vartime_double_scalar_mul_basepoint(&-k, &point, &s);
    bool::from(candidate.compress().as_bytes().ct_eq(&signature.r()))
}

/// The S component as a scalar, or `None` if it is zero or out of range.
/// Sole source of the canonicality rule for sign and verify.
fn canonical_scalar(signature: &Signature) -> Option<Scalar> {
    let s = signature.s();
    if bool::from(s.ct_eq(&[0u8; COMPONENT_LENGTH])) {
        return None;
    }
    Option::<Scalar>::from(Scalar::from_canonical_bytes(s))
}

/// Whether the signature's S component is a nonzero canonical scalar,
/// `0 < S < GroupOrder` as little-endian integers.
pub fn is_canonical(signature: &Signature) -> bool {
    canonical_scalar(signature).is_some()
}

/// Return a signature with the same R and S reduced modulo the group order,
/// computed over a zero-extended 64-byte buffer. Idempotent. Tooling only:
/// sign and verify never reduce implicitly.
pub fn make_canonical(signature: &Signature) -> Signature {
    let mut wide = [0u8; 64];
    wide[..COMPONENT_LENGTH].copy_from_slice(&signature.s());
    let reduced = Scalar::from_bytes_mod_order_wide(&wide);
    Signature::new(signature.r(), reduced.to_bytes())
}

/// Signer bound to a single key pair.
#[derive(Clone, Debug)]
pub struct Signer {
    key_pair: KeyPair,
}

impl Signer {
    /// Bind a signer to `key_pair`. Signing requires the pair to hold a
    /// private key; verification only needs the public half.
    pub fn new(key_pair: KeyPair) -> Self {
        Self { key_pair }
    }

    /// The public key signatures are verified against.
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }
}

impl DsaSigner for Signer {
    type PublicKey = PublicKey;
    type Signature = Signature;

    fn sign(&self, message: &[u8]) -> Result<Signature, Error> {
        sign(&self.key_pair, message)
    }

    fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        verify(self.key_pair.public_key(), message, signature)
    }

    fn is_canonical(&self, signature: &Signature) -> bool {
        is_canonical(signature)
    }

    fn make_canonical(&self, signature: &Signature) -> Signature {
        make_canonical(signature)
    }
}
