//! Fixed-size container header.

use super::Algorithm;
use crate::error::CryptoError;

/// Magic bytes every container starts with.
pub const MAGIC: [u8; 4] = *b"ETTE";

/// Initialization vector length (one AES block).
pub const IV_LEN: usize = 16;

/// Encoded header length.
pub const HEADER_LEN: usize = MAGIC.len() + 1 + 3 + 8 + IV_LEN;

const ALGORITHM_OFFSET: usize = 4;
const VERSION_OFFSET: usize = 5;
const LENGTH_OFFSET: usize = 8;
const IV_OFFSET: usize = 16;

/// Container format version written by this build.
pub const FORMAT_VERSION: Version = Version {
    major: 0,
    minor: 0,
    patch: 1,
};

/// Three-part version stored in the header, one byte per component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    #[must_use]
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.major, self.minor, self.patch]
    }
}

/// Decoded container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub algorithm: Algorithm,
    pub version: Version,
    /// Exact plaintext length before padding.
    pub plaintext_len: u64,
    pub iv: [u8; IV_LEN],
}

impl ContainerHeader {
    /// Header for a fresh container written by this build.
    #[must_use]
    pub fn new(algorithm: Algorithm, plaintext_len: u64, iv: [u8; IV_LEN]) -> Self {
        Self {
            algorithm,
            version: FORMAT_VERSION,
            plaintext_len,
            iv,
        }
    }

    /// Encode to the on-disk layout.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..ALGORITHM_OFFSET].copy_from_slice(&MAGIC);
        out[ALGORITHM_OFFSET] = self.algorithm.id();
        out[VERSION_OFFSET..LENGTH_OFFSET].copy_from_slice(&self.version.to_bytes());
        out[LENGTH_OFFSET..IV_OFFSET].copy_from_slice(&self.plaintext_len.to_be_bytes());
        out[IV_OFFSET..HEADER_LEN].copy_from_slice(&self.iv);
        out
    }

    /// Decode a header from the front of `bytes`.
    ///
    /// Returns the header and the remaining bytes (the ciphertext). The
    /// magic is checked before anything else is interpreted.
    pub fn decode(bytes: &[u8]) -> Result<(Self, &[u8]), CryptoError> {
        let Some((head, rest)) = bytes.split_first_chunk::<HEADER_LEN>() else {
            return Err(CryptoError::InvalidDataSize);
        };

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[..ALGORITHM_OFFSET]);
        if magic != MAGIC {
            return Err(CryptoError::BadMagic(magic));
        }

        let id = head[ALGORITHM_OFFSET];
        let algorithm = Algorithm::from_id(id).ok_or(CryptoError::UnsupportedAlgorithm(id))?;

        let version = Version::new(
            head[VERSION_OFFSET],
            head[VERSION_OFFSET + 1],
            head[VERSION_OFFSET + 2],
        );

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&head[LENGTH_OFFSET..IV_OFFSET]);
        let plaintext_len = u64::from_be_bytes(len_bytes);

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&head[IV_OFFSET..HEADER_LEN]);

        Ok((
            Self {
                algorithm,
                version,
                plaintext_len,
                iv,
            },
            rest,
        ))
    }
}
