//! Film catalog handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        FilmListResponse, FilmResponse, FilmsResponse, MessageResponse,
        film::{FilmId, FilmListQuery, FilmPatch, NewFilm, SearchQuery},
    },
    state::AppState,
    store::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT},
};

/// Multipart field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// List all films, optionally one page at a time
pub async fn list_films(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FilmListQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let response = if query.page.is_some() || query.limit.is_some() {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let (films, total) = state.film_store.page(page, limit).await;

        FilmListResponse {
            films,
            message: "List films".to_string(),
            success: true,
            total,
            page: Some(page),
            limit: Some(limit),
        }
    } else {
        let films = state.film_store.list().await;

        FilmListResponse {
            total: films.len(),
            films,
            message: "List films".to_string(),
            success: true,
            page: None,
            limit: None,
        }
    };

    Ok(Json(response))
}

/// Get a film by ID
pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let film = state.film_store.get(&FilmId::from(id)).await?;

    Ok(Json(FilmResponse::new("Film found", film)))
}

/// Append a new film
pub async fn create_film(
    State(state): State<AppState>,
    WithRejection(Json(new_film), _): WithRejection<Json<NewFilm>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let film = state.film_store.append(new_film).await;

    Ok((
        StatusCode::CREATED,
        Json(FilmResponse::new("New film added to the list", film)),
    ))
}

/// Shallow-merge the body into an existing film
pub async fn update_film(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<FilmPatch>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let id = FilmId::from(id);
    let film = state.film_store.update(&id, patch).await.map_err(|e| {
        warn!("Update of film {} failed: {}", id, e);
        e
    })?;

    Ok(Json(FilmResponse::new("Film information updated", film)))
}

/// Remove a film
pub async fn delete_film(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = FilmId::from(id);
    state.film_store.remove(&id).await.map_err(|e| {
        warn!("Removal of film {} failed: {}", id, e);
        e
    })?;

    Ok(Json(MessageResponse::ok("Film removed from the list")))
}

/// Search films by name
pub async fn search_films(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let films = state
        .film_store
        .search_by_name(query.keyword.as_deref())
        .await?;

    Ok(Json(FilmsResponse { films }))
}

/// List films by ascending year
pub async fn sort_films_by_year(State(state): State<AppState>) -> impl IntoResponse {
    let films = state.film_store.sort_by_year().await;

    Json(FilmsResponse { films })
}

/// Store the `image` field of a multipart body and attach it to a film
///
/// The written file is discarded on every failure path.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(mut multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let id = FilmId::from(id);
    if !state.film_store.contains(&id).await {
        warn!("Upload for unknown film {}", id);
        return Err(ApiError::NotFound("Film not found".to_string()));
    }

    let mut pending = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        let upload = state
            .upload_store
            .save(file_name.as_deref(), &bytes)
            .await
            .map_err(|e| ApiError::internal("Error while updating", e))?;
        pending = Some(upload);
        break;
    }

    let pending = pending.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing '{}' file field", IMAGE_FIELD))
    })?;

    let film = state
        .film_store
        .attach_image(&id, pending.public_path().to_string())
        .await?;
    pending.keep();
    info!("Image attached to film {}", id);

    Ok(Json(FilmResponse::new("Image updated successfully", film)))
}
