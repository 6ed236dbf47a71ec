use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use catalog_cell::router::catalog_routes;
use chat_cell::router::chat_routes;
use notification_cell::router::notification_routes;
use payment_cell::router::payment_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(auth_routes(state.clone()))
        .merge(catalog_routes(state.clone()))
        .merge(booking_routes(state.clone()))
        .merge(notification_routes(state.clone()))
        .merge(payment_routes(state.clone()))
        .merge(chat_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { "MindCare API is running!" }))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
}
