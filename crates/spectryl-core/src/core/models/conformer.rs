use super::genre::GenreValue;
use std::collections::HashMap;

/// One molecular structural variant with its extracted property values.
///
/// A conformer owns a mapping from genre name to the value extracted for it.
/// Keys are the canonical `&'static str` names from the genre catalog, so a
/// conformer can never hold an unregistered genre.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    key: String,
    genres: HashMap<&'static str, GenreValue>,
}

impl Conformer {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            genres: HashMap::new(),
        }
    }

    /// The stable identifier this conformer was ingested under, typically
    /// derived from the source file name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Retrieves the value extracted for `genre`, if present.
    pub fn get(&self, genre: &str) -> Option<&GenreValue> {
        self.genres.get(genre)
    }

    pub fn has(&self, genre: &str) -> bool {
        self.genres.contains_key(genre)
    }

    /// Returns an iterator over all `(genre, value)` pairs of this conformer.
    pub fn genres_iter(&self) -> impl Iterator<Item = (&'static str, &GenreValue)> {
        self.genres.iter().map(|(name, value)| (*name, value))
    }

    /// Number of genres present on this conformer.
    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    pub(crate) fn insert(&mut self, genre: &'static str, value: GenreValue) {
        self.genres.insert(genre, value);
    }

    pub(crate) fn remove_genre(&mut self, genre: &str) -> Option<GenreValue> {
        self.genres.remove(genre)
    }
}
