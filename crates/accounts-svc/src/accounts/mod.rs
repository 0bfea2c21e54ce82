//! Account CRUD over the shared accounts document.
//!
//! Each operation is a single read-modify-write of the whole document:
//! snapshot, check the account ID precondition, mutate one key, upload
//! against the snapshot's ETag.

pub mod service;
pub mod validate;

pub use service::AccountService;
pub use validate::AccountInput;
