use std::sync::Arc;

use axum::{routing::post, Router};

use shared_database::AppState;

use crate::handlers;

/// The chat proxy is open: visitors can talk to the assistant before they
/// have an account.
pub fn chat_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .with_state(state)
}
