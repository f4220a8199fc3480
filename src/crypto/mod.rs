//! Encrypted container codec.
//!
//! A container is a fixed 32-byte header followed by CBC ciphertext:
//!
//! ```text
//! offset  size  field
//! 0       4     magic "ETTE"
//! 4       1     algorithm id
//! 5       3     format version (major, minor, patch)
//! 8       8     plaintext length, big-endian
//! 16      16    initialization vector
//! 32      N     ciphertext, padded to the cipher block
//! ```
//!
//! The header's plaintext length is authoritative: the decoder checks the
//! padding bytes against it instead of trusting the padding alone.
//!
//! # Examples
//!
//! ```
//! use ette::crypto::{decrypt, encrypt};
//!
//! let iv = [7u8; 16];
//! let container = encrypt(b"hello\n", "test", &iv).unwrap();
//! assert_eq!(&container[..4], b"ETTE");
//! assert_eq!(decrypt(&container, "test").unwrap(), b"hello\n");
//! ```

mod cipher;
mod container;
mod header;
mod kdf;

pub use cipher::{BLOCK_LEN, CipherEngine, padded_len};
pub use container::{
    decrypt, encrypt, encrypt_with, encrypt_with_random_iv, is_key_correct, random_iv,
};
pub use header::{ContainerHeader, FORMAT_VERSION, HEADER_LEN, IV_LEN, MAGIC, Version};
pub use kdf::{DERIVED_KEY_LEN, DerivedKey, derive_key};

/// Filename marker that asks for an encrypted container.
pub const ENCRYPTED_SUFFIX: &str = ".aes256cbc";

/// Cipher algorithms a container header can name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-256 in CBC mode with PKCS#7 block padding.
    #[default]
    Aes256Cbc,
}

impl Algorithm {
    /// Byte written to the header's algorithm field.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Aes256Cbc => 1,
        }
    }

    /// Parse a header algorithm byte.
    ///
    /// Containers written by the first releases stored the id as the ASCII
    /// digit `'1'`; both spellings decode to the same algorithm.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 | b'1' => Some(Self::Aes256Cbc),
            _ => None,
        }
    }

    /// Key length the cipher expects, in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes256Cbc => 32,
        }
    }

    /// Algorithm a filename asks for, by its `.aes256cbc` marker.
    #[must_use]
    pub fn for_filename(filename: &str) -> Option<Self> {
        filename.contains(ENCRYPTED_SUFFIX).then_some(Self::Aes256Cbc)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes256Cbc => "AES-256-CBC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Algorithm;

    #[test]
    fn algorithm_ids_round_trip() {
        let algorithm = Algorithm::Aes256Cbc;
        assert_eq!(Algorithm::from_id(algorithm.id()), Some(algorithm));
    }

    #[test]
    fn legacy_ascii_id_is_accepted() {
        assert_eq!(Algorithm::from_id(b'1'), Some(Algorithm::Aes256Cbc));
        assert_eq!(Algorithm::from_id(0), None);
        assert_eq!(Algorithm::from_id(2), None);
    }

    #[test]
    fn key_len_matches_aes_256() {
        assert_eq!(Algorithm::Aes256Cbc.key_len(), 32);
        assert_eq!(Algorithm::Aes256Cbc.name(), "AES-256-CBC");
    }

    #[test]
    fn filename_marker_selects_cipher() {
        assert_eq!(
            Algorithm::for_filename("/tmp/notes.aes256cbc"),
            Some(Algorithm::Aes256Cbc)
        );
        assert_eq!(
            Algorithm::for_filename("diary.aes256cbc.txt"),
            Some(Algorithm::Aes256Cbc)
        );
        assert_eq!(Algorithm::for_filename("notes.txt"), None);
    }
}
