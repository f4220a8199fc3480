//! CBC block cipher wrapper.

use super::Algorithm;
use super::header::IV_LEN;
use super::kdf::DerivedKey;
use crate::error::CryptoError;
use aes::Aes256;
use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroize;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Cipher block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Ciphertext length produced for a plaintext of `plaintext_len` bytes.
///
/// PKCS#7 always adds at least one byte, so an aligned plaintext grows by a
/// whole block.
#[must_use]
pub const fn padded_len(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// One encrypt or decrypt operation bound to a key and IV.
pub struct CipherEngine<'k> {
    algorithm: Algorithm,
    key: &'k DerivedKey,
    iv: [u8; IV_LEN],
}

impl<'k> CipherEngine<'k> {
    /// Bind `key` and `iv` for `algorithm`, validating both lengths.
    pub fn new(algorithm: Algorithm, key: &'k DerivedKey, iv: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != algorithm.key_len() {
            return Err(CryptoError::InvalidKeySize);
        }
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| CryptoError::InvalidIvSize)?;
        Ok(Self { algorithm, key, iv })
    }

    /// Encrypt with PKCS#7 padding.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self.algorithm {
            Algorithm::Aes256Cbc => {
                let encryptor = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &self.iv)
                    .map_err(|_| CryptoError::UnknownCipher)?;
                Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
            }
        }
    }

    /// Decrypt `ciphertext` whose unpadded length is `plaintext_len`.
    ///
    /// The bytes past `plaintext_len` must be exactly the padding the
    /// encoder wrote; anything else means the key was wrong.
    pub fn decrypt(&self, ciphertext: &[u8], plaintext_len: usize) -> Result<Vec<u8>, CryptoError> {
        let expected = (plaintext_len / BLOCK_LEN)
            .checked_add(1)
            .and_then(|blocks| blocks.checked_mul(BLOCK_LEN));
        if ciphertext.len() % BLOCK_LEN != 0 || Some(ciphertext.len()) != expected {
            return Err(CryptoError::InvalidDataSize);
        }

        let mut plaintext = match self.algorithm {
            Algorithm::Aes256Cbc => {
                let decryptor = Aes256CbcDec::new_from_slices(self.key.as_bytes(), &self.iv)
                    .map_err(|_| CryptoError::UnknownCipher)?;
                decryptor
                    .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
                    .map_err(|_| CryptoError::UnknownCipher)?
            }
        };

        let pad = plaintext.len() - plaintext_len;
        if plaintext[plaintext_len..]
            .iter()
            .any(|&byte| usize::from(byte) != pad)
        {
            plaintext.zeroize();
            return Err(CryptoError::InvalidKey);
        }

        plaintext.truncate(plaintext_len);
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;

    #[test]
    fn padded_len_always_adds_padding() {
        assert_eq!(padded_len(0), 16);
        assert_eq!(padded_len(1), 16);
        assert_eq!(padded_len(15), 16);
        assert_eq!(padded_len(16), 32);
        assert_eq!(padded_len(43), 48);
    }

    #[test]
    fn short_iv_is_rejected() {
        let key = derive_key("k").unwrap();
        assert!(matches!(
            CipherEngine::new(Algorithm::Aes256Cbc, &key, &[0u8; 8]),
            Err(CryptoError::InvalidIvSize)
        ));
    }

    #[test]
    fn encrypt_then_decrypt() {
        let key = derive_key("somewhatlongkey").unwrap();
        let engine = CipherEngine::new(Algorithm::Aes256Cbc, &key, &[3u8; 16]).unwrap();
        let plaintext = b"The quick brown fox jumps over the lazy dog";
        let ciphertext = engine.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext.len(), padded_len(plaintext.len()));
        assert_eq!(engine.decrypt(&ciphertext, plaintext.len()).unwrap(), plaintext);
    }

    #[test]
    fn misaligned_ciphertext_is_invalid_data_size() {
        let key = derive_key("k").unwrap();
        let engine = CipherEngine::new(Algorithm::Aes256Cbc, &key, &[0u8; 16]).unwrap();
        assert_eq!(
            engine.decrypt(&[0u8; 17], 1),
            Err(CryptoError::InvalidDataSize)
        );
        // Declared length does not fit the ciphertext.
        assert_eq!(
            engine.decrypt(&[0u8; 16], 40),
            Err(CryptoError::InvalidDataSize)
        );
        // Padded length of the declared size overflows.
        assert_eq!(engine.decrypt(&[], usize::MAX), Err(CryptoError::InvalidDataSize));
        assert_eq!(
            engine.decrypt(&[0u8; 16], usize::MAX - 3),
            Err(CryptoError::InvalidDataSize)
        );
    }

    #[test]
    fn wrong_key_fails_padding_check() {
        let right = derive_key("right").unwrap();
        let wrong = derive_key("wrong").unwrap();
        let iv = [9u8; 16];
        let ciphertext = CipherEngine::new(Algorithm::Aes256Cbc, &right, &iv)
            .unwrap()
            .encrypt(b"hello\n")
            .unwrap();
        let result = CipherEngine::new(Algorithm::Aes256Cbc, &wrong, &iv)
            .unwrap()
            .decrypt(&ciphertext, 6);
        assert_eq!(result, Err(CryptoError::InvalidKey));
    }
}
