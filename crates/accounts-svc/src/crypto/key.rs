//! [`DataKey`]: the static AES-256 key used to encrypt account passwords.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::cipher::KEY_LEN;

/// Errors produced while decoding the configured data key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The configured value is not valid standard base64.
    #[error("data key is not valid base64")]
    InvalidBase64,

    /// The decoded key material has an unexpected length.
    #[error("data key has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
pub struct DataKey(Box<[u8; KEY_LEN]>);

impl DataKey {
    /// Decode a base64-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidBase64`] if `encoded` is not base64, or
    /// [`KeyError::InvalidLength`] if it does not decode to [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidBase64)?;
        let result = Self::from_slice(&decoded);
        decoded.iter_mut().for_each(|b| *b = 0);
        result
    }

    /// Copy raw key bytes into a new [`DataKey`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the slice has the wrong length.
    pub fn from_slice(key_bytes: &[u8]) -> Result<Self, KeyError> {
        if key_bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(key_bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(key_bytes);
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for DataKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("DataKey([REDACTED])")
    }
}
