//! Catalog service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    middleware::{auth_middleware, write_guard},
    state::AppState,
    uploads::PUBLIC_PREFIX,
};

pub mod films;
pub mod session;

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.upload_store.max_bytes();
    let uploads_dir = state.upload_store.dir().to_path_buf();

    let film_routes = Router::new()
        .route("/films", get(films::list_films).post(films::create_film))
        .route("/api/v1/films", get(films::list_films))
        .route("/films/search", get(films::search_films))
        .route("/films/sortByYear", get(films::sort_films_by_year))
        .route(
            "/films/:id",
            get(films::get_film)
                .put(films::update_film)
                .delete(films::delete_film),
        )
        .route(
            "/films/:id/upload-image",
            post(films::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), write_guard));

    let session_routes = Router::new()
        .route("/me", get(session::current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .merge(film_routes)
        .merge(session_routes)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog"
    }))
}
