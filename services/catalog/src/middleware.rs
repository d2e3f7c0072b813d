//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: u64,
    pub username: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Reject requests without a valid, unrevoked bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, bearer, req, next).await
}

/// Require a token for mutating requests when the service is configured to
///
/// Safe methods always pass through.
pub async fn write_guard(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.require_auth_for_writes || is_safe(req.method()) {
        return Ok(next.run(req).await);
    }

    authorize(&state, bearer, req, next).await
}

async fn authorize(
    state: &AppState,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state
        .auth_service
        .authenticate(bearer.token())
        .await
        .map_err(|e| {
            warn!("Rejected token on {} {}: {}", req.method(), req.uri().path(), e);
            ApiError::from(e)
        })?;

    let user = AuthUser {
        id: claims.user_id,
        username: state
            .auth_service
            .user(&claims)
            .map(|user| user.username.clone()),
        expires_at: claims.expires_at(),
    };

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn is_safe(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}
