use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_models::auth::Role;
use shared_utils::policy::{self, Policy};

use crate::handlers;

/// Catalog routes. Browsing is public; all mutation is admin-only.
pub fn catalog_routes(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/specialists", get(handlers::list_specialists))
        .route("/podcasts", get(handlers::list_podcasts))
        .route("/podcasts/{id}", get(handlers::get_podcast));

    let admin = Router::new()
        .route("/specialists", post(handlers::create_specialist))
        .route("/specialists/{id}", put(handlers::update_specialist))
        .route("/specialists/{id}", delete(handlers::delete_specialist))
        .route("/podcasts", post(handlers::create_podcast))
        .route("/podcasts/{id}", put(handlers::update_podcast))
        .route("/podcasts/{id}", delete(handlers::delete_podcast))
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Role(Role::Admin), req, next)
        }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::auth_middleware,
        ));

    Router::new().merge(public).merge(admin).with_state(state)
}
