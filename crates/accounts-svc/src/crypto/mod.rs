//! AES-256-CBC field encryption for account passwords.
//!
//! This module is free of HTTP dependencies. The only AWS dependency is the
//! optional KMS-backed [`RandomSource`] used to generate IVs.
//!
//! # Ciphertext format
//!
//! ```text
//! <hex(iv)>:<hex(ciphertext)>
//! ```
//!
//! The IV is 16 bytes; the ciphertext is PKCS#7-padded. There is no decrypt
//! path in the service: stored passwords are write-only from the API's side.

pub mod cipher;
pub mod key;
pub mod random;

pub use cipher::FieldEncryptor;
pub use key::DataKey;
pub use random::{KmsRandom, OsRandom, RandomSource};
