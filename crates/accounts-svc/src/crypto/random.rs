//! Sources of cryptographically secure random bytes for IV generation.
//!
//! [`KmsRandom`] is used when an AWS region is configured; [`OsRandom`] is the
//! local fallback. Neither retries: a KMS failure propagates to the caller.

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Errors produced by a [`RandomSource`].
#[derive(Debug, Error)]
pub enum RandomError {
    /// The KMS `GenerateRandom` call failed.
    #[error("KMS GenerateRandom failed: {0}")]
    Kms(String),

    /// KMS answered without any plaintext bytes.
    #[error("KMS GenerateRandom response contained no plaintext")]
    EmptyResponse,

    /// The source returned a different number of bytes than requested.
    #[error("requested {requested} random bytes, got {actual}")]
    LengthMismatch { requested: usize, actual: usize },

    /// The requested length cannot be expressed in a KMS request.
    #[error("cannot request {0} random bytes")]
    InvalidLength(usize),
}

/// A generator of `len` cryptographically secure random bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RandomSource: Send + Sync {
    /// Generate exactly `len` random bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`RandomError`] if the underlying source fails.
    async fn generate(&self, len: usize) -> Result<Vec<u8>, RandomError>;
}

/// Local OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

#[async_trait]
impl RandomSource for OsRandom {
    async fn generate(&self, len: usize) -> Result<Vec<u8>, RandomError> {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

/// AWS KMS `GenerateRandom`.
#[derive(Debug, Clone)]
pub struct KmsRandom {
    client: aws_sdk_kms::Client,
}

impl KmsRandom {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RandomSource for KmsRandom {
    async fn generate(&self, len: usize) -> Result<Vec<u8>, RandomError> {
        let number_of_bytes = i32::try_from(len).map_err(|_| RandomError::InvalidLength(len))?;

        let resp = self
            .client
            .generate_random()
            .number_of_bytes(number_of_bytes)
            .send()
            .await
            .map_err(|e| {
                RandomError::Kms(aws_sdk_kms::error::DisplayErrorContext(&e).to_string())
            })?;

        let plaintext = resp.plaintext().ok_or(RandomError::EmptyResponse)?;
        let bytes = plaintext.as_ref().to_vec();
        if bytes.len() != len {
            return Err(RandomError::LengthMismatch {
                requested: len,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }
}
