//! Passphrase to cipher key reduction.

use crate::error::CryptoError;
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a derived key in bytes.
///
/// The key is the leading run of the lowercase hex SHA-256 digest, taken as
/// ASCII bytes. Thirty-two hex characters carry 128 bits of the hash, which
/// is what containers written by earlier releases were keyed with.
pub const DERIVED_KEY_LEN: usize = 32;

/// Cipher key derived from a passphrase. Wiped on drop, never persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; DERIVED_KEY_LEN],
}

impl DerivedKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; present for symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Derive the cipher key for `passphrase`.
///
/// Deterministic: the same passphrase always yields the same key.
pub fn derive_key(passphrase: &str) -> Result<DerivedKey, CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::InvalidKeySize);
    }

    let digest = Sha256::digest(passphrase.as_bytes());
    let mut hex = hex::encode(digest);
    let mut bytes = [0u8; DERIVED_KEY_LEN];
    bytes.copy_from_slice(&hex.as_bytes()[..DERIVED_KEY_LEN]);
    hex.zeroize();

    Ok(DerivedKey { bytes })
}
