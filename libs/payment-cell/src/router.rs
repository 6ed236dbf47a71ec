use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_database::AppState;
use shared_utils::policy::{self, Policy};

use crate::handlers;

/// Payment routes. The webhook stays open: the gateway authenticates by
/// event shape, not by bearer token.
pub fn payment_routes(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/appointments/{id}/pay-with-omise",
            post(handlers::pay_with_omise),
        )
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Authenticated, req, next)
        }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::auth_middleware,
        ));

    let public = Router::new().route("/omise-webhook", post(handlers::omise_webhook));

    Router::new().merge(protected).merge(public).with_state(state)
}
