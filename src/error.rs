//! Error types for ette.

use std::fmt;
use std::io;

/// Result type alias for ette operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of the encrypted container codec.
///
/// Every variant is a plain value so callers can decide whether to
/// re-prompt for a passphrase or give up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Empty passphrase, or a derived key the cipher rejects by length.
    InvalidKeySize,
    /// Decryption produced bytes that do not match the encoder's padding.
    InvalidKey,
    /// Initialization vector is not exactly one cipher block.
    InvalidIvSize,
    /// Container too short for a header, or ciphertext inconsistent with it.
    InvalidDataSize,
    /// Container does not start with the expected magic bytes.
    BadMagic([u8; 4]),
    /// Header names an algorithm this build does not know.
    UnsupportedAlgorithm(u8),
    /// Any other failure reported by the cipher primitive.
    UnknownCipher,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKeySize => write!(f, "invalid key size"),
            Self::InvalidKey => write!(f, "key is incorrect"),
            Self::InvalidIvSize => write!(f, "IV is not 128 bits"),
            Self::InvalidDataSize => write!(f, "container is too small or malformed"),
            Self::BadMagic(magic) => write!(f, "unrecognized container magic {magic:02x?}"),
            Self::UnsupportedAlgorithm(id) => write!(f, "unsupported cipher algorithm id {id}"),
            Self::UnknownCipher => write!(f, "unknown cipher error"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Error type for ette operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading or writing a document.
    Io(io::Error),
    /// Encrypting or decrypting a container failed.
    Crypto(CryptoError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Crypto(e) => write!(f, "crypto error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Crypto(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Self::Crypto(e)
    }
}

impl Error {
    /// The codec failure behind this error, if any.
    #[must_use]
    pub fn crypto(&self) -> Option<CryptoError> {
        match self {
            Self::Crypto(e) => Some(*e),
            Self::Io(_) => None,
        }
    }
}
