//! Axum router construction.

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{docs, handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// Account routes live under `state.base_path`; `/health` and the 404
/// fallback are global. A known path hit with an unsupported method gets the
/// same 404 body as an unknown path.
pub fn build(state: AppState) -> Router {
    let base = state.base_path.to_string();

    let mut router = Router::new()
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route(
            &format!("{base}/swagger"),
            get(docs::ui).fallback(handlers::not_found),
        )
        .route(
            &format!("{base}/swagger/:file_name"),
            get(docs::document).fallback(handlers::not_found),
        )
        .route(
            &format!("{base}/:account_id"),
            get(handlers::get_account)
                .post(handlers::create_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account)
                .fallback(handlers::not_found),
        )
        .route(&format!("{base}/"), list_route());
    if !base.is_empty() {
        router = router.route(&base, list_route());
    }

    router
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn list_route() -> MethodRouter<AppState> {
    get(handlers::list_accounts).fallback(handlers::not_found)
}
