//! API documentation: the OpenAPI document and a Swagger UI page.
//!
//! The document is read and validated once at startup. "Try it out" is
//! disabled in the UI for every method.

use std::path::Path;

use anyhow::{Context, Result};
use axum::{
    extract::{Path as UrlPath, State},
    response::{Html, IntoResponse, Response},
};
use bytes::Bytes;
use common::ServiceError;
use openapiv3::OpenAPI;

use super::{error::ApiError, middleware::NO_CACHE_HEADERS, state::AppState};

/// The loaded API document, ready to serve.
#[derive(Debug, Clone)]
pub struct ApiDocs {
    /// File name the document is served under (e.g. `"swagger.json"`).
    pub file_name: String,
    pub content_type: &'static str,
    pub title: String,
    pub body: Bytes,
}

impl ApiDocs {
    /// Read `path` and check that it parses as an OpenAPI 3 document.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid OpenAPI
    /// document.
    pub async fn load(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("API document path has no file name: {}", path.display()))?
            .to_owned();

        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read API document {}", path.display()))?;

        let is_yaml = is_yaml(&file_name);
        let api: OpenAPI = if is_yaml {
            serde_yaml::from_slice(&raw)
                .with_context(|| format!("{file_name} is not a valid OpenAPI YAML document"))?
        } else {
            serde_json::from_slice(&raw)
                .with_context(|| format!("{file_name} is not a valid OpenAPI JSON document"))?
        };

        Ok(Self {
            file_name,
            content_type: if is_yaml { "text/yaml" } else { "application/json" },
            title: api.info.title,
            body: Bytes::from(raw),
        })
    }
}

fn is_yaml(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

/// `GET {base}/swagger/:file_name`: the raw API document.
pub async fn document(
    State(state): State<AppState>,
    UrlPath(file_name): UrlPath<String>,
) -> Result<Response, ApiError> {
    let docs = loaded(&state)?;
    if file_name != docs.file_name {
        return Err(ServiceError::not_found("Invalid Request").into());
    }

    Ok((
        NO_CACHE_HEADERS,
        [("content-type", docs.content_type)],
        docs.body.clone(),
    )
        .into_response())
}

/// `GET {base}/swagger`: Swagger UI pointing at the API document.
pub async fn ui(State(state): State<AppState>) -> Result<Response, ApiError> {
    let docs = loaded(&state)?;
    let spec_url = format!("{}/swagger/{}", state.base_path, docs.file_name);
    let page = render_ui(&docs.title, &spec_url);
    Ok((NO_CACHE_HEADERS, Html(page)).into_response())
}

fn loaded(state: &AppState) -> Result<&ApiDocs, ApiError> {
    state
        .api_docs
        .as_deref()
        .ok_or_else(|| ServiceError::not_found("API documentation is not available").into())
}

fn render_ui(title: &str, spec_url: &str) -> String {
    let title = escape_html(title);
    let spec_url = escape_html(spec_url);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  <style>.swagger-ui .topbar {{ display: none }}</style>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{
      url: "{spec_url}",
      dom_id: "#swagger-ui",
      deepLinking: true,
      supportedSubmitMethods: []
    }});
  </script>
</body>
</html>
"##
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
