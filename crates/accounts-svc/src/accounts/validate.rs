//! Shallow type checks on create/update request bodies.

use common::ServiceError;
use serde_json::{Number, Value};

pub(crate) const INVALID_SCHEMA: &str = "Invalid request type or schema";

/// A validated create/update request body.
///
/// Only these three fields are kept; anything else in the body is dropped.
#[derive(Clone, PartialEq)]
pub struct AccountInput {
    pub account_type: Number,
    pub api_key: String,
    pub api_password: String,
}

impl AccountInput {
    /// Check that `body` is an object whose `accountType` is a number and whose
    /// `apiKey` and `apiPassword` are strings.
    ///
    /// # Errors
    ///
    /// Returns a BadRequest [`ServiceError`] on any mismatch.
    pub fn from_json(body: &Value) -> Result<Self, ServiceError> {
        let invalid = || ServiceError::bad_request(INVALID_SCHEMA);

        let fields = body.as_object().ok_or_else(invalid)?;
        let account_type = match fields.get("accountType") {
            Some(Value::Number(n)) => n.clone(),
            _ => return Err(invalid()),
        };
        let api_key = fields
            .get("apiKey")
            .and_then(Value::as_str)
            .ok_or_else(invalid)?;
        let api_password = fields
            .get("apiPassword")
            .and_then(Value::as_str)
            .ok_or_else(invalid)?;

        Ok(Self {
            account_type,
            api_key: api_key.to_owned(),
            api_password: api_password.to_owned(),
        })
    }
}

impl std::fmt::Debug for AccountInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountInput")
            .field("account_type", &self.account_type)
            .field("api_key", &self.api_key)
            .field("api_password", &"[REDACTED]")
            .finish()
    }
}
