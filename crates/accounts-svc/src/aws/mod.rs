//! AWS SDK client initialisation for S3 and KMS.
//!
//! S3 holds the accounts document. KMS is only used as a remote random-byte
//! generator, and only when an AWS region is configured.

pub mod clients;

pub use clients::AwsClients;
