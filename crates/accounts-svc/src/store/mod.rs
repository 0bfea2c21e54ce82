//! Persistence of the accounts document in an object store.
//!
//! # Responsibilities
//!
//! - [`ObjectStore`]: the raw head/get/put seam, implemented for S3.
//! - [`DocumentStore`]: the whole-document client bound to one bucket + key.
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** Passwords arrive here already encrypted.
//! - Every write replaces the whole document and is conditional on the ETag
//!   of the snapshot it was derived from, when one is known.

pub mod document;
#[cfg(test)]
pub mod memory;
pub mod object;

pub use document::DocumentStore;
pub use object::S3ObjectStore;
