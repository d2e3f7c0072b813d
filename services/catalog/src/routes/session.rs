//! Login, logout and token introspection handlers

use auth::LoginCredentials;
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::{
    TypedHeader,
    extract::WithRejection,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CurrentUserResponse, TokenResponse},
    state::AppState,
};

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(credentials), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let auth_service = state.auth_service.clone();
    let issued = tokio::task::spawn_blocking(move || auth_service.login(&credentials))
        .await
        .map_err(|e| ApiError::internal("Login failed", e))??;

    let response = TokenResponse {
        token: issued.token,
        expires_in: state.auth_service.token_ttl_secs(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
///
/// Always acknowledges; a valid bearer token, if presented, is revoked.
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> impl IntoResponse {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    state.auth_service.logout(token).await;

    (
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// Describe the token the request was authenticated with
pub async fn current_user(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    Json(CurrentUserResponse {
        success: true,
        user_id: user.id,
        username: user.username,
        expires_at: user.expires_at,
    })
}
