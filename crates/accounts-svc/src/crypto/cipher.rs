//! AES-256-CBC encryption of individual string fields.
//!
//! Every call draws a fresh 16-byte IV from the configured [`RandomSource`];
//! the IV travels with the ciphertext in the `iv:ciphertext` string form.

use std::{fmt, sync::Arc};

use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use common::ServiceError;
use thiserror::Error;

use super::key::DataKey;
use super::random::{RandomError, RandomSource};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-CBC initialisation vector (one block).
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// An encrypted field value.
///
/// The string representation is `<hex(iv)>:<hex(ciphertext)>`. The service
/// only ever writes this form; parsing it back is left to tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedValue {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// PKCS#7-padded ciphertext bytes.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            hex::encode(self.iv),
            hex::encode(&self.ciphertext)
        )
    }
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// No data key was configured for this service.
    #[error("DATA_KEY is not configured")]
    KeyNotConfigured,

    /// The IV source failed.
    #[error("failed to generate IV: {0}")]
    Random(#[from] RandomError),

    /// The IV source returned the wrong number of bytes.
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),
}

impl From<CipherError> for ServiceError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::KeyNotConfigured => ServiceError::not_allowed(err.to_string()),
            CipherError::Random(_) | CipherError::InvalidIvLength(_) => {
                ServiceError::internal(err.to_string())
            }
        }
    }
}

/// Encrypt `plaintext` with `key` under the given IV.
///
/// # Errors
///
/// Returns [`CipherError::InvalidIvLength`] if `iv` is not [`IV_LEN`] bytes.
pub fn encrypt_with_iv(
    plaintext: &[u8],
    key: &DataKey,
    iv: &[u8],
) -> Result<EncryptedValue, CipherError> {
    let iv: [u8; IV_LEN] = iv
        .try_into()
        .map_err(|_| CipherError::InvalidIvLength(iv.len()))?;
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|_| CipherError::InvalidIvLength(iv.len()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    Ok(EncryptedValue { iv, ciphertext })
}

/// Encrypts single string fields with the configured data key.
///
/// Cheap to clone: the key and the random source are shared.
#[derive(Clone)]
pub struct FieldEncryptor {
    key: Option<Arc<DataKey>>,
    random: Arc<dyn RandomSource>,
}

impl FieldEncryptor {
    pub fn new(key: Option<DataKey>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            key: key.map(Arc::new),
            random,
        }
    }

    /// Returns `true` if a data key is available.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Encrypt `plaintext` under a freshly generated IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::KeyNotConfigured`] if no data key is set, and
    /// propagates IV generation failures.
    pub async fn encrypt(&self, plaintext: &str) -> Result<EncryptedValue, CipherError> {
        let key = self.key.as_ref().ok_or(CipherError::KeyNotConfigured)?;
        let iv = self.random.generate(IV_LEN).await?;
        encrypt_with_iv(plaintext.as_bytes(), key, &iv)
    }
}

impl fmt::Debug for FieldEncryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEncryptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
