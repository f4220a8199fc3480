//! Whole-container encrypt and decrypt.

use super::Algorithm;
use super::cipher::CipherEngine;
use super::header::{ContainerHeader, HEADER_LEN, IV_LEN};
use super::kdf::derive_key;
use crate::error::CryptoError;
use rand::RngCore;
use rand::rngs::OsRng;
use std::path::Path;

/// Fresh random IV from the operating system RNG.
#[must_use]
pub fn random_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` into a container using the default algorithm.
pub fn encrypt(plaintext: &[u8], passphrase: &str, iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(Algorithm::default(), plaintext, passphrase, iv)
}

/// Encrypt with a freshly generated IV.
pub fn encrypt_with_random_iv(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    encrypt(plaintext, passphrase, &random_iv())
}

/// Encrypt `plaintext` into a container using `algorithm`.
pub fn encrypt_with(
    algorithm: Algorithm,
    plaintext: &[u8],
    passphrase: &str,
    iv: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::InvalidKeySize);
    }

    let key = derive_key(passphrase)?;
    let engine = CipherEngine::new(algorithm, &key, iv)?;
    let ciphertext = engine.encrypt(plaintext)?;

    let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| CryptoError::InvalidIvSize)?;
    let plaintext_len = u64::try_from(plaintext.len()).map_err(|_| CryptoError::InvalidDataSize)?;
    let header = ContainerHeader::new(algorithm, plaintext_len, iv);

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a container produced by [`encrypt`].
pub fn decrypt(container: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    if container.len() < HEADER_LEN {
        return Err(CryptoError::InvalidDataSize);
    }
    if passphrase.is_empty() {
        return Err(CryptoError::InvalidKeySize);
    }

    let (header, ciphertext) = ContainerHeader::decode(container)?;
    if header.plaintext_len == 0 {
        return Ok(Vec::new());
    }

    let plaintext_len =
        usize::try_from(header.plaintext_len).map_err(|_| CryptoError::InvalidDataSize)?;
    let key = derive_key(passphrase)?;
    CipherEngine::new(header.algorithm, &key, &header.iv)?.decrypt(ciphertext, plaintext_len)
}

/// Whether `passphrase` opens the container stored at `path`.
///
/// An unreadable file counts as a wrong key.
pub fn is_key_correct(passphrase: &str, path: impl AsRef<Path>) -> bool {
    std::fs::read(path)
        .map(|bytes| decrypt(&bytes, passphrase).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::padded_len;

    const KEY: &str = "somewhatlongkey";
    const IV: [u8; IV_LEN] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
        0x0F,
    ];

    #[test]
    fn round_trip() {
        let plaintext = b"The quick brown fox jumps over the lazy dog";
        let container = encrypt(plaintext, KEY, &IV).unwrap();
        assert_eq!(container.len(), HEADER_LEN + padded_len(plaintext.len()));
        assert_eq!(decrypt(&container, KEY).unwrap(), plaintext);
    }

    #[test]
    fn header_records_exact_length_and_iv() {
        let container = encrypt(b"abc", KEY, &IV).unwrap();
        let (header, ciphertext) = ContainerHeader::decode(&container).unwrap();
        assert_eq!(header.plaintext_len, 3);
        assert_eq!(header.iv, IV);
        assert_eq!(ciphertext.len(), 16);
    }

    #[test]
    fn encryption_is_deterministic_for_fixed_iv() {
        assert_eq!(
            encrypt(b"same", KEY, &IV).unwrap(),
            encrypt(b"same", KEY, &IV).unwrap()
        );
    }

    #[test]
    fn random_iv_changes_ciphertext() {
        let a = encrypt_with_random_iv(b"same", KEY).unwrap();
        let b = encrypt_with_random_iv(b"same", KEY).unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a, KEY).unwrap(), b"same");
        assert_eq!(decrypt(&b, KEY).unwrap(), b"same");
    }

    #[test]
    fn empty_passphrase_is_rejected_both_ways() {
        assert_eq!(encrypt(b"x", "", &IV), Err(CryptoError::InvalidKeySize));
        let container = encrypt(b"x", KEY, &IV).unwrap();
        assert_eq!(decrypt(&container, ""), Err(CryptoError::InvalidKeySize));
    }

    #[test]
    fn short_container_is_checked_before_passphrase() {
        assert_eq!(decrypt(b"ETTE", ""), Err(CryptoError::InvalidDataSize));
    }

    #[test]
    fn wrong_iv_length_is_rejected() {
        assert_eq!(encrypt(b"x", KEY, &IV[..15]), Err(CryptoError::InvalidIvSize));
    }

    #[test]
    fn empty_plaintext_skips_cipher() {
        let container = encrypt(b"", KEY, &IV).unwrap();
        assert_eq!(decrypt(&container, KEY).unwrap(), b"");
        // A bare header with zero length decodes even without ciphertext.
        let header = ContainerHeader::new(Algorithm::Aes256Cbc, 0, IV).encode();
        assert_eq!(decrypt(&header, "anything").unwrap(), b"");
    }

    #[test]
    fn wrong_passphrase_is_invalid_key() {
        let container = encrypt(b"hello\n", "test", &IV).unwrap();
        assert_eq!(decrypt(&container, "wrong"), Err(CryptoError::InvalidKey));
    }

    #[test]
    fn bad_magic_fails_before_decryption() {
        let mut container = encrypt(b"hello\n", KEY, &IV).unwrap();
        container[..4].copy_from_slice(b"NOPE");
        assert_eq!(
            decrypt(&container, KEY),
            Err(CryptoError::BadMagic(*b"NOPE"))
        );
    }

    #[test]
    fn truncated_ciphertext_is_invalid_data_size() {
        let container = encrypt(b"hello world, this spans blocks", KEY, &IV).unwrap();
        assert_eq!(
            decrypt(&container[..container.len() - 16], KEY),
            Err(CryptoError::InvalidDataSize)
        );
    }

    #[test]
    fn is_key_correct_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, encrypt(b"hello\n", "test", &IV).unwrap()).unwrap();

        assert!(is_key_correct("test", &path));
        assert!(!is_key_correct("wrong", &path));
        assert!(!is_key_correct("test", dir.path().join("missing.txt")));
    }
}
