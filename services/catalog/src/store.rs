//! In-memory film store
//!
//! The store is a single ordered collection guarded by a reader-writer lock.
//! Mutations hold the write half for their whole read-modify-write, so
//! readers never see a partially applied change.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::film::{Film, FilmId, FilmPatch, NewFilm};

/// Default page size when only a page number is given
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest accepted page size
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Errors reported by film store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No film has the requested identifier
    #[error("Film not found")]
    NotFound(FilmId),

    /// A name search was requested without a keyword
    #[error("Please enter a search keyword")]
    MissingKeyword,
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to the film collection
#[derive(Debug, Clone, Default)]
pub struct FilmStore {
    films: Arc<RwLock<Vec<Film>>>,
}

impl FilmStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `films` in the given order
    pub fn with_films(films: Vec<Film>) -> Self {
        Self {
            films: Arc::new(RwLock::new(films)),
        }
    }

    /// Seed a store from a JSON array of films
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read films file {}", path.display()))?;
        let films: Vec<NewFilm> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse films file {}", path.display()))?;

        info!("Loaded {} films from {}", films.len(), path.display());
        Ok(Self::with_films(
            films.into_iter().map(NewFilm::into_film).collect(),
        ))
    }

    /// All films in their current order
    pub async fn list(&self) -> Vec<Film> {
        self.films.read().await.clone()
    }

    /// One page of films and the total number of films
    ///
    /// `page` is 1-based; out of range values are clamped.
    pub async fn page(&self, page: u32, limit: u32) -> (Vec<Film>, usize) {
        let page = page.max(1) as usize;
        let limit = limit.clamp(1, MAX_PAGE_LIMIT) as usize;
        let offset = (page - 1).saturating_mul(limit);

        let films = self.films.read().await;
        let items = films.iter().skip(offset).take(limit).cloned().collect();
        (items, films.len())
    }

    /// Number of films
    pub async fn len(&self) -> usize {
        self.films.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether a film with this identifier exists
    pub async fn contains(&self, id: &FilmId) -> bool {
        self.films.read().await.iter().any(|film| &film.id == id)
    }

    /// First film with the given identifier
    pub async fn get(&self, id: &FilmId) -> StoreResult<Film> {
        self.films
            .read()
            .await
            .iter()
            .find(|film| &film.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Append a film at the end of the collection
    pub async fn append(&self, new_film: NewFilm) -> Film {
        let film = new_film.into_film();
        self.films.write().await.push(film.clone());

        info!("Added film {} ({})", film.id, film.name);
        film
    }

    /// Shallow-merge `patch` into the first film with the given identifier
    pub async fn update(&self, id: &FilmId, patch: FilmPatch) -> StoreResult<Film> {
        let mut films = self.films.write().await;
        let film = films
            .iter_mut()
            .find(|film| &film.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        film.merge(patch);
        info!("Updated film {}", id);
        Ok(film.clone())
    }

    /// Remove the first film with the given identifier
    pub async fn remove(&self, id: &FilmId) -> StoreResult<Film> {
        let mut films = self.films.write().await;
        let index = films
            .iter()
            .position(|film| &film.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let film = films.remove(index);
        info!("Removed film {}", id);
        Ok(film)
    }

    /// Films whose name contains `keyword`, ignoring case
    pub async fn search_by_name(&self, keyword: Option<&str>) -> StoreResult<Vec<Film>> {
        let keyword = keyword
            .filter(|k| !k.is_empty())
            .ok_or(StoreError::MissingKeyword)?
            .to_lowercase();

        let films = self.films.read().await;
        let matches: Vec<Film> = films
            .iter()
            .filter(|film| film.name.to_lowercase().contains(&keyword))
            .cloned()
            .collect();

        debug!("Search '{}' matched {} films", keyword, matches.len());
        Ok(matches)
    }

    /// Films ordered by ascending year
    ///
    /// The sort is stable and films without a year come last. The store
    /// itself keeps its order.
    pub async fn sort_by_year(&self) -> Vec<Film> {
        let mut films = self.list().await;
        films.sort_by_key(|film| (film.year.is_none(), film.year));
        films
    }

    /// Set the image path of the film with the given identifier
    pub async fn attach_image(&self, id: &FilmId, path: String) -> StoreResult<Film> {
        let mut films = self.films.write().await;
        let film = films
            .iter_mut()
            .find(|film| &film.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        film.set_image(path);
        info!("Attached image to film {}", id);
        Ok(film.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune_store() -> FilmStore {
        FilmStore::with_films(vec![
            Film::new("1", "Dune").with_year(2021),
            Film::new("2", "Dune Part Two").with_year(2024),
        ])
    }

    fn ids(films: &[Film]) -> Vec<&str> {
        films.iter().map(|film| film.id.as_str()).collect()
    }

    fn patch(value: serde_json::Value) -> FilmPatch {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_append_adds_to_the_end() {
        let store = dune_store();
        let new_film: NewFilm = serde_json::from_value(json!({"ID": 3, "name": "Arrival"})).unwrap();

        let added = store.append(new_film).await;
        let films = store.list().await;

        assert_eq!(films.len(), 3);
        assert_eq!(films.last().unwrap(), &added);
        assert_eq!(added.id.as_str(), "3");
    }

    #[tokio::test]
    async fn test_update_changes_only_the_target() {
        let store = dune_store();
        let before = store.list().await;

        let updated = store
            .update(&FilmId::from("1"), patch(json!({"year": 1984})))
            .await
            .unwrap();

        assert_eq!(updated.year, Some(1984));
        assert_eq!(updated.name, "Dune");

        let after = store.list().await;
        assert_eq!(after[0], Film { year: Some(1984), ..before[0].clone() });
        assert_eq!(after[1], before[1]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_store_untouched() {
        let store = dune_store();
        let before = store.list().await;

        let result = store.update(&FilmId::from("9"), patch(json!({"year": 1}))).await;

        assert_eq!(result, Err(StoreError::NotFound(FilmId::from("9"))));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_remove_then_remove_again() {
        let store = dune_store();

        store.remove(&FilmId::from("1")).await.unwrap();
        assert_eq!(ids(&store.list().await), vec!["2"]);

        let again = store.remove(&FilmId::from("1")).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let store = FilmStore::with_films(vec![
            Film::new("1", "The Matrix"),
            Film::new("2", "Arrival"),
            Film::new("3", "The Matrix Reloaded"),
        ]);

        for keyword in ["matrix", "MATRIX", "mAtRiX"] {
            let found = store.search_by_name(Some(keyword)).await.unwrap();
            assert_eq!(ids(&found), vec!["1", "3"]);
        }

        let dune = dune_store().search_by_name(Some("dune")).await.unwrap();
        assert_eq!(ids(&dune), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_search_requires_keyword() {
        let store = dune_store();

        assert_eq!(store.search_by_name(None).await, Err(StoreError::MissingKeyword));
        assert_eq!(store.search_by_name(Some("")).await, Err(StoreError::MissingKeyword));
    }

    #[tokio::test]
    async fn test_load_seeds_films_in_file_order() {
        let path = std::env::temp_dir().join(format!("films-{}.json", uuid::Uuid::new_v4()));
        let seed = json!([
            {"ID": 1, "name": "Dune", "year": 2021, "duration": 155},
            {"name": "Arrival", "year": "2016"},
            {"id": "x", "name": "Enemy", "studio": "A24"}
        ]);
        std::fs::write(&path, seed.to_string()).unwrap();

        let store = FilmStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let films = store.list().await;
        assert_eq!(films.len(), 3);
        assert_eq!(films[0].id.as_str(), "1");
        assert_eq!(films[0].duration, Some(155));
        assert_eq!(films[1].name, "Arrival");
        assert_eq!(films[1].extra["year"], "2016");
        assert_eq!(films[2].extra["studio"], "A24");

        assert!(FilmStore::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_non_array_file() {
        let path = std::env::temp_dir().join(format!("films-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"name": "Dune"}"#).unwrap();

        let result = FilmStore::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_sort_by_year_is_stable_and_non_mutating() {
        let store = FilmStore::with_films(vec![
            Film::new("a", "Blade Runner 2049").with_year(2017),
            Film::new("b", "Unknown"),
            Film::new("c", "Arrival").with_year(2016),
            Film::new("d", "Sicario").with_year(2015),
            Film::new("e", "Enemy").with_year(2016),
        ]);

        let sorted = store.sort_by_year().await;
        assert_eq!(ids(&sorted), vec!["d", "c", "e", "a", "b"]);
        assert_eq!(ids(&store.list().await), vec!["a", "b", "c", "d", "e"]);

        let already_sorted = dune_store().sort_by_year().await;
        assert_eq!(ids(&already_sorted), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_attach_image_uses_same_id_matching() {
        let store = dune_store();

        let film = store
            .attach_image(&FilmId::from(2u64), "/uploads/poster.png".to_string())
            .await
            .unwrap();
        assert_eq!(film.image.as_deref(), Some("/uploads/poster.png"));
        assert_eq!(
            store.get(&FilmId::from("2")).await.unwrap().image,
            film.image
        );

        let missing = store.attach_image(&FilmId::from("7"), "x".to_string()).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_page_slices_and_clamps() {
        let films = (1..=5).map(|i| Film::new(i.to_string(), format!("Film {i}"))).collect();
        let store = FilmStore::with_films(films);

        let (second, total) = store.page(2, 2).await;
        assert_eq!(ids(&second), vec!["3", "4"]);
        assert_eq!(total, 5);

        let (first, _) = store.page(0, 0).await;
        assert_eq!(ids(&first), vec!["1"]);

        let (beyond, _) = store.page(10, 2).await;
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = FilmStore::new();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let new_film = NewFilm {
                        id: Some(FilmId::from(i as u64)),
                        name: format!("Film {i}"),
                        ..NewFilm::default()
                    };
                    store.append(new_film).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 50);
    }
}
