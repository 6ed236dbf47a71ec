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

/// Account routes. Registration and login are public; everything under
/// `/users` is admin-only.
pub fn auth_routes(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let admin = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/doctors-available", get(handlers::doctors_available))
        .route("/users/{id}/role", put(handlers::update_user_role))
        .route("/users/{id}", delete(handlers::delete_user))
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Role(Role::Admin), req, next)
        }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::auth_middleware,
        ));

    Router::new().merge(public).merge(admin).with_state(state)
}
