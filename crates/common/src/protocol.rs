//! Request and response types exchanged with callers and with the object store.
//!
//! The same [`Account`] shape is used for the stored document and for API
//! responses; the only difference is whether `apiPassword` is present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Accounts document
// ---------------------------------------------------------------------------

/// A single credential pair.
///
/// At rest `api_password` holds an `ivHex:cipherHex` string. On read paths it
/// is stripped, so it is optional here and omitted from JSON when absent.
///
/// `account_type` and `api_key` are required. A stored entry missing either
/// makes the whole document unreadable; entries are never skipped or
/// repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_type: serde_json::Number,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_password: Option<String>,
}

impl Account {
    /// Return a copy of this account without its password.
    pub fn redacted(&self) -> Self {
        Self {
            api_password: None,
            ..self.clone()
        }
    }
}

/// The whole stored document: account ID → [`Account`].
pub type AccountsDocument = BTreeMap<String, Account>;

// ---------------------------------------------------------------------------
// Account endpoints
// ---------------------------------------------------------------------------

/// Successful response body for every account endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountsDocument>,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AccountResponse {
    pub fn new(status_code: u16, account: AccountsDocument, message: impl Into<String>) -> Self {
        Self {
            account: Some(account),
            status_code,
            message: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Mirrors the HTTP status of the response.
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Whether a data key is available for encrypting passwords.
    pub data_key_configured: bool,
    /// Whether the API document was loaded at startup.
    pub api_docs_loaded: bool,
}
