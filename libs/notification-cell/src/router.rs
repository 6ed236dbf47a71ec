use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::policy::{self, Policy};

use crate::handlers;

pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/notifications/my", get(handlers::my_notifications))
        .route(
            "/notifications/{id}/read",
            post(handlers::mark_notification_read),
        )
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Authenticated, req, next)
        }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::auth_middleware,
        ))
        .with_state(state)
}
