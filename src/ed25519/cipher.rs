use crate::{
    ed25519::keys::{prepare_scalar, KeyPair, PrivateKey, PublicKey, PUBLIC_KEY_LENGTH},
    BlockCipher, Error,
};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{CryptoRng, Rng};
use sha3::{Digest, Sha3_256};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the random salt mixed into shared-key derivation; equals the
/// recipient public key's raw length.
pub const SALT_LENGTH: usize = PUBLIC_KEY_LENGTH;

/// Length of the AES-CBC initialization vector.
pub const IV_LENGTH: usize = 16;

/// Length of a derived symmetric key.
pub const SHARED_KEY_LENGTH: usize = 32;

const BLOCK_LENGTH: usize = 16;

// Salt, IV, and at least one cipher block.
const MIN_BLOB_LENGTH: usize = SALT_LENGTH + IV_LENGTH + BLOCK_LENGTH;

/// Symmetric key derived from an ECDH agreement. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey {
    raw: [u8; SHARED_KEY_LENGTH],
}

impl SharedKey {
    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_KEY_LENGTH] {
        &self.raw
    }
}

impl std::fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedKey([REDACTED])")
    }
}

/// Derive the symmetric key shared between `local_private` and
/// `remote_public`: the remote point times the clamped local scalar, XORed
/// with `salt`, hashed with SHA3-256.
///
/// Scalar multiplication commutes in the exponent, so
/// `(sender private, recipient public, salt)` and
/// `(recipient private, sender public, salt)` derive the identical key. Fails
/// with [Error::InvalidEncoding] if the remote key is not a curve point.
pub fn derive_shared_key(
    local_private: &PrivateKey,
    remote_public: &PublicKey,
    salt: &[u8; SALT_LENGTH],
) -> Result<SharedKey, Error> {
    let point = remote_public.decode()?;
    let mut shared = point
        .mul_clamped(prepare_scalar(local_private))
        .compress()
        .to_bytes();
    for (byte, salt) in shared.iter_mut().zip(salt.iter()) {
        *byte ^= salt;
    }
    let mut raw = [0u8; SHARED_KEY_LENGTH];
    raw.copy_from_slice(&Sha3_256::digest(shared));
    shared.zeroize();
    Ok(SharedKey { raw })
}

/// Block cipher bound to a sender and recipient key pair.
///
/// Blobs are `salt(32) ‖ iv(16) ‖ ciphertext`, with the ciphertext produced by
/// AES-256-CBC under PKCS#7 padding and a key derived per blob from the salted
/// ECDH agreement.
///
/// # Warning
///
/// This scheme provides confidentiality only; there is no integrity tag, and
/// the wire format is fixed, so none can be added. A corrupted blob either
/// fails padding validation or silently decrypts to different plaintext.
#[derive(Clone, Debug)]
pub struct Cipher {
    sender: KeyPair,
    recipient: KeyPair,
}

impl Cipher {
    /// Bind a cipher to a sender and recipient pair. Encrypting requires the
    /// sender's private key; decrypting requires the recipient's.
    pub fn new(sender: KeyPair, recipient: KeyPair) -> Self {
        Self { sender, recipient }
    }
}

impl BlockCipher for Cipher {
    /// Encrypt a plaintext, consuming 48 bytes of entropy (salt and IV).
    fn encrypt<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let private = self.sender.require_private()?;

        let mut salt = [0u8; SALT_LENGTH];
        rng.fill(&mut salt);
        let key = derive_shared_key(private, self.recipient.public_key(), &salt)?;

        let mut iv = [0u8; IV_LENGTH];
        rng.fill(&mut iv);
        let cipher_bytes = Aes256CbcEnc::new(key.as_bytes().into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut blob = Vec::with_capacity(SALT_LENGTH + IV_LENGTH + cipher_bytes.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&cipher_bytes);
        Ok(blob)
    }

    /// Decrypt a blob. Fails with [Error::InputTooShort] below the 64-byte
    /// minimum and [Error::DecryptionFailed] on block-alignment or padding
    /// failure; never returns partial plaintext.
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        if blob.len() < MIN_BLOB_LENGTH {
            return Err(Error::InputTooShort);
        }
        let private = self.recipient.require_private()?;

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&blob[..SALT_LENGTH]);
        let mut iv = [0u8; IV_LENGTH];
        iv.copy_from_slice(&blob[SALT_LENGTH..SALT_LENGTH + IV_LENGTH]);
        let cipher_bytes = &blob[SALT_LENGTH + IV_LENGTH..];
        if cipher_bytes.len() % BLOCK_LENGTH != 0 {
            return Err(Error::DecryptionFailed);
        }

        let key = derive_shared_key(private, self.sender.public_key(), &salt)?;
        Aes256CbcDec::new(key.as_bytes().into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(cipher_bytes)
            .map_err(|_| Error::DecryptionFailed)
    }
}
