//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Translate [`common::ServiceError`] into JSON error responses.
//! - Serve the API document and its Swagger UI page.
//! - Inject shared application state (`AppState`) into handlers.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
