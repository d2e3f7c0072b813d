//! Film models for the catalog service
//!
//! Film bodies are free-form JSON objects. The known fields are read
//! leniently: a value of an unexpected type is kept verbatim under its own
//! key instead of rejecting the body.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap,
};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

const ID_KEYS: [&str; 2] = ["id", "ID"];
const NAME_KEY: &str = "name";
const YEAR_KEY: &str = "year";
const DURATION_KEYS: [&str; 2] = ["time", "duration"];
const IMAGE_KEY: &str = "image";

/// Film identifier
///
/// Identifiers are compared as strings everywhere. Clients may send them as
/// JSON strings or integers; integers are kept in their decimal form so that
/// `7` in a body and `/films/7` in a path name the same film.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FilmId(String);

impl FilmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random identifier for films appended without one
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier carried by an arbitrary JSON value
    ///
    /// Strings are taken as they are, any other value by its compact JSON
    /// text. `null` carries no identifier.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(id) => Some(Self(id)),
            other => Some(Self(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FilmId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FilmId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for FilmId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for FilmId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        FilmId::from_value(Value::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("film identifier is null"))
    }
}

/// Film record
///
/// Fields beyond the known ones, and known fields sent with an unexpected
/// type, are kept verbatim in `extra`. A raw entry in `extra` takes the
/// place of the typed field of the same name when serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub year: Option<i32>,
    /// Duration in minutes
    pub duration: Option<u32>,
    pub image: Option<String>,
    pub extra: Map<String, Value>,
}

impl Film {
    pub fn new(id: impl Into<FilmId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            year: None,
            duration: None,
            image: None,
            extra: Map::new(),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the served path of the film's image
    pub fn set_image(&mut self, path: String) {
        self.extra.remove(IMAGE_KEY);
        self.image = Some(path);
    }

    /// Shallow merge: every field present in the patch replaces the current
    /// value. The identifier never changes.
    pub fn merge(&mut self, patch: FilmPatch) {
        if let Some(id) = patch.id.filter(|id| id != &self.id) {
            debug!("Ignoring identifier change {} -> {}", self.id, id);
        }
        if let Some(name) = patch.name {
            self.extra.remove(NAME_KEY);
            self.name = name;
        }
        if let Some(year) = patch.year {
            self.extra.remove(YEAR_KEY);
            self.year = Some(year);
        }
        if let Some(duration) = patch.duration {
            for key in DURATION_KEYS {
                self.extra.remove(key);
            }
            self.duration = Some(duration);
        }
        if let Some(image) = patch.image {
            self.set_image(image);
        }
        for (key, value) in patch.extra {
            self.clear_typed(&key);
            self.extra.insert(key, value);
        }
    }

    /// Drop the typed value that a raw entry under `key` replaces
    fn clear_typed(&mut self, key: &str) {
        match key {
            NAME_KEY => self.name.clear(),
            YEAR_KEY => self.year = None,
            IMAGE_KEY => self.image = None,
            key if DURATION_KEYS.contains(&key) => self.duration = None,
            _ => {}
        }
    }
}

impl Serialize for Film {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = |key: &str| self.extra.contains_key(key);

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_KEYS[0], &self.id)?;
        if !raw(NAME_KEY) {
            map.serialize_entry(NAME_KEY, &self.name)?;
        }
        if let Some(year) = self.year.filter(|_| !raw(YEAR_KEY)) {
            map.serialize_entry(YEAR_KEY, &year)?;
        }
        if let Some(duration) = self.duration.filter(|_| !raw(DURATION_KEYS[0])) {
            map.serialize_entry(DURATION_KEYS[0], &duration)?;
        }
        if let Some(image) = self.image.as_ref().filter(|_| !raw(IMAGE_KEY)) {
            map.serialize_entry(IMAGE_KEY, image)?;
        }
        for (key, value) in self.extra.iter().filter(|(key, _)| *key != ID_KEYS[0]) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Film {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        NewFilm::deserialize(deserializer).map(NewFilm::into_film)
    }
}

/// Known fields read out of a JSON object
///
/// `null` counts as absent. A value that does not fit its field is left in
/// `extra` under the key it came with.
struct FilmFields {
    id: Option<FilmId>,
    name: Option<String>,
    year: Option<i32>,
    duration: Option<u32>,
    image: Option<String>,
    extra: Map<String, Value>,
}

impl FilmFields {
    fn from_map(mut map: Map<String, Value>) -> Self {
        let mut id = None;
        for key in ID_KEYS {
            if let Some(value) = map.remove(key) {
                id = id.or_else(|| FilmId::from_value(value));
            }
        }

        Self {
            id,
            name: take_typed(&mut map, &[NAME_KEY]),
            year: take_typed(&mut map, &[YEAR_KEY]),
            duration: take_typed(&mut map, &DURATION_KEYS),
            image: take_typed(&mut map, &[IMAGE_KEY]),
            extra: map,
        }
    }
}

fn take_typed<T: DeserializeOwned>(map: &mut Map<String, Value>, keys: &[&str]) -> Option<T> {
    let key = keys.iter().find(|key| map.contains_key(**key))?;
    let value = map.remove(*key)?;
    if value.is_null() {
        return None;
    }

    match T::deserialize(&value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Keeping '{}' as sent: {}", key, e);
            map.insert(key.to_string(), value);
            None
        }
    }
}

/// Payload for appending a film; the identifier is optional
///
/// Any JSON object is accepted.
#[derive(Debug, Clone, Default)]
pub struct NewFilm {
    pub id: Option<FilmId>,
    pub name: String,
    pub year: Option<i32>,
    pub duration: Option<u32>,
    pub image: Option<String>,
    pub extra: Map<String, Value>,
}

impl NewFilm {
    /// Turn the payload into a record, generating an identifier if needed
    pub fn into_film(self) -> Film {
        Film {
            id: self.id.unwrap_or_else(FilmId::generate),
            name: self.name,
            year: self.year,
            duration: self.duration,
            image: self.image,
            extra: self.extra,
        }
    }
}

impl<'de> Deserialize<'de> for NewFilm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = FilmFields::from_map(Map::deserialize(deserializer)?);

        Ok(Self {
            id: fields.id,
            name: fields.name.unwrap_or_default(),
            year: fields.year,
            duration: fields.duration,
            image: fields.image,
            extra: fields.extra,
        })
    }
}

/// Partial update of a film
#[derive(Debug, Clone, Default)]
pub struct FilmPatch {
    pub id: Option<FilmId>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<u32>,
    pub image: Option<String>,
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for FilmPatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = FilmFields::from_map(Map::deserialize(deserializer)?);

        Ok(Self {
            id: fields.id,
            name: fields.name,
            year: fields.year,
            duration: fields.duration,
            image: fields.image,
            extra: fields.extra,
        })
    }
}

/// Query parameters for film listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilmListQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

/// Query parameters for name search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}
