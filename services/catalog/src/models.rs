//! API models for request and response payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod film;

use film::Film;

/// Response for the full film listing
#[derive(Debug, Serialize)]
pub struct FilmListResponse {
    pub films: Vec<Film>,
    pub message: String,
    pub success: bool,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Response for search and ordering endpoints
#[derive(Debug, Serialize)]
pub struct FilmsResponse {
    pub films: Vec<Film>,
}

/// Response carrying a single film
#[derive(Debug, Serialize)]
pub struct FilmResponse {
    pub success: bool,
    pub message: String,
    pub data: Film,
}

impl FilmResponse {
    pub fn new(message: impl Into<String>, data: Film) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Response for operations without a payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Response describing the caller's token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub expires_at: DateTime<Utc>,
}
