use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_models::auth::Role;
use shared_utils::policy::{self, Policy};

use crate::handlers;

/// Booking routes. Everyone authenticated can book and see their own rows;
/// status transitions are split between the admin and doctor surfaces.
pub fn booking_routes(state: Arc<AppState>) -> Router {
    let user = Router::new()
        .route("/appointments", post(handlers::book_appointment))
        .route("/my-appointments", get(handlers::my_appointments))
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Authenticated, req, next)
        }));

    let admin = Router::new()
        .route("/appointments/all", get(handlers::all_appointments))
        .route(
            "/appointments/{id}/status",
            put(handlers::update_status_admin),
        )
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Role(Role::Admin), req, next)
        }));

    let doctor = Router::new()
        .route(
            "/appointments/my-doctor",
            get(handlers::my_doctor_appointments),
        )
        .route(
            "/appointments/{id}/status-doctor",
            put(handlers::update_status_doctor),
        )
        .layer(middleware::from_fn(|req, next| {
            policy::enforce(Policy::Role(Role::Doctor), req, next)
        }));

    Router::new()
        .merge(user)
        .merge(admin)
        .merge(doctor)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            policy::auth_middleware,
        ))
        .with_state(state)
}
