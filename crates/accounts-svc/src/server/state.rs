//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::accounts::AccountService;

use super::docs::ApiDocs;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Account CRUD over the shared document.
    pub accounts: AccountService,
    /// The API document, if it could be loaded at startup.
    pub api_docs: Option<Arc<ApiDocs>>,
    /// Path prefix of every account route (e.g. `"/identrust"`).
    pub base_path: Arc<str>,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(accounts: AccountService, api_docs: Option<ApiDocs>, base_path: &str) -> Self {
        Self {
            accounts,
            api_docs: api_docs.map(Arc::new),
            base_path: base_path.into(),
        }
    }
}
