//! Application state shared across handlers

use anyhow::Result;
use auth::AuthService;
use common::config::AppConfig;
use tracing::info;

use crate::{store::FilmStore, uploads::UploadStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub film_store: FilmStore,
    pub auth_service: AuthService,
    pub upload_store: UploadStore,
    pub require_auth_for_writes: bool,
}

impl AppState {
    /// Build the state from configuration: user directory, signing key,
    /// optional film seed and the upload directory
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let auth_service = AuthService::from_config(config)?;

        let film_store = match &config.films_file {
            Some(path) => FilmStore::load(path)?,
            None => FilmStore::new(),
        };

        tokio::fs::create_dir_all(&config.uploads_dir).await?;
        let upload_store = UploadStore::new(config.uploads_dir.clone(), config.max_upload_bytes);
        info!("Storing uploads in {}", config.uploads_dir.display());

        if config.require_auth_for_writes {
            info!("Film mutations require a bearer token");
        }

        Ok(Self {
            film_store,
            auth_service,
            upload_store,
            require_auth_for_writes: config.require_auth_for_writes,
        })
    }
}
