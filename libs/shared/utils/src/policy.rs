use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_database::AppState;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Access requirement for a route group. Evaluated uniformly by `enforce`
/// after `auth_middleware` has attached the caller identity.
#[derive(Debug, Clone, Copy)]
pub enum Policy {
    /// Any verified identity.
    Authenticated,
    /// Verified identity holding exactly this role.
    Role(Role),
}

impl Policy {
    pub fn allows(&self, user: &AuthUser) -> Result<(), AppError> {
        match self {
            Policy::Authenticated => Ok(()),
            Policy::Role(required) if user.role == *required => Ok(()),
            Policy::Role(required) => Err(AppError::Forbidden(format!(
                "Access denied: {} role required",
                required
            ))),
        }
    }
}

/// Middleware for authentication: verifies the bearer token and attaches the
/// decoded identity to the request before any engine logic runs.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let user = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Middleware for role enforcement. Runs after `auth_middleware`, so the
/// identity is already in the request extensions.
pub async fn enforce(
    policy: Policy,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))?;

    policy.allows(&user)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with_role(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_authenticated_accepts_any_role() {
        for role in [Role::User, Role::Admin, Role::Doctor] {
            assert!(Policy::Authenticated.allows(&user_with_role(role)).is_ok());
        }
    }

    #[test]
    fn test_role_policy_is_exact() {
        let admin_only = Policy::Role(Role::Admin);
        assert!(admin_only.allows(&user_with_role(Role::Admin)).is_ok());

        let err = admin_only
            .allows(&user_with_role(Role::Doctor))
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Admin does not imply doctor either; route groups are disjoint.
        let doctor_only = Policy::Role(Role::Doctor);
        assert!(doctor_only.allows(&user_with_role(Role::Admin)).is_err());
    }
}
