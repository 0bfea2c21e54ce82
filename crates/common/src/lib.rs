//! Common types, protocol definitions, and errors shared across `accounts-svc` crates.

pub mod error;
pub mod protocol;

pub use error::{ErrorKind, ServiceError};
