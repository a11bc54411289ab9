use super::conformer::Conformer;
use super::genre::{self, GenreShape, GenreValue};
use super::ids::ConformerId;
use super::index::ConsistencyIndex;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

/// Errors reported by the conformer store and the consistency index.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Conformer not found: '{0}'")]
    ConformerNotFound(String),

    #[error("Genre '{genre}' not present on conformer '{key}'")]
    MissingGenre { key: String, genre: String },

    #[error("Unknown genre: '{0}'")]
    UnknownGenre(String),

    #[error("Genre '{genre}' expects a {expected:?} value, but a {actual:?} value was given")]
    ShapeMismatch {
        genre: &'static str,
        expected: GenreShape,
        actual: GenreShape,
    },

    #[error("Genre '{0}' has no length: it is not a sequence-shaped genre")]
    NotVectorGenre(String),
}

/// Primary storage for a batch of conformers and their extracted genre values.
///
/// Conformers are addressed by their stable string key and enumerated in
/// first-seen insertion order. The store exclusively owns all genre values;
/// derived structures (the consistency index, trimmed views) hold only ids
/// and positions into it.
///
/// Every mutation bumps an internal generation counter, which derived
/// structures record at build time so freshness is always checkable.
#[derive(Debug, Clone, Default)]
pub struct ConformerStore {
    /// Primary storage using a slot map for efficient ID management.
    conformers: SlotMap<ConformerId, Conformer>,
    /// Insertion order of conformer ids.
    order: Vec<ConformerId>,
    /// Lookup map from conformer key to its id.
    key_map: HashMap<String, ConformerId>,
    /// Bumped on every mutating call.
    generation: u64,
}

impl ConformerStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a genre value for a conformer.
    ///
    /// The conformer is created on first sight, preserving first-seen order.
    /// The genre must be registered in the catalog and the value must match
    /// its declared shape.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownGenre`] for unregistered genre names and
    /// [`StoreError::ShapeMismatch`] when the value's shape disagrees with
    /// the catalog.
    pub fn add(&mut self, key: &str, genre: &str, value: GenreValue) -> Result<(), StoreError> {
        self.insert_record(key, genre, value)?;
        self.generation += 1;
        Ok(())
    }

    /// Ingests a batch of `(key, genre, value)` records with a single
    /// generation bump, the large-fan-in path for multi-file extraction.
    ///
    /// Records are applied in order; on the first invalid record the error is
    /// returned and records already applied remain in the store. The
    /// generation is bumped whenever at least one record was applied, so
    /// derived structures see a partially applied batch as a mutation.
    pub fn extend<I, K, G>(&mut self, records: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = (K, G, GenreValue)>,
        K: AsRef<str>,
        G: AsRef<str>,
    {
        let mut applied = 0;
        let mut failure = None;
        for (key, genre, value) in records {
            if let Err(err) = self.insert_record(key.as_ref(), genre.as_ref(), value) {
                failure = Some(err);
                break;
            }
            applied += 1;
        }
        if applied > 0 {
            self.generation += 1;
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    fn insert_record(&mut self, key: &str, genre: &str, value: GenreValue) -> Result<(), StoreError> {
        let (name, definition) =
            genre::lookup(genre).ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        if value.shape() != definition.shape {
            return Err(StoreError::ShapeMismatch {
                genre: name,
                expected: definition.shape,
                actual: value.shape(),
            });
        }
        let id = match self.key_map.get(key) {
            Some(&id) => id,
            None => {
                let id = self.conformers.insert(Conformer::new(key));
                self.order.push(id);
                self.key_map.insert(key.to_string(), id);
                id
            }
        };
        self.conformers[id].insert(name, value);
        Ok(())
    }

    /// Deletes a conformer and all its genre values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConformerNotFound`] if no conformer has `key`.
    pub fn remove(&mut self, key: &str) -> Result<Conformer, StoreError> {
        let id = self
            .key_map
            .remove(key)
            .ok_or_else(|| StoreError::ConformerNotFound(key.to_string()))?;
        self.order.retain(|&ordered| ordered != id);
        self.generation += 1;
        Ok(self
            .conformers
            .remove(id)
            .expect("key map and slot map must agree"))
    }

    /// Removes a single genre value from a conformer, leaving the conformer in place.
    pub fn remove_genre(&mut self, key: &str, genre: &str) -> Result<GenreValue, StoreError> {
        let id = self.id_of(key)?;
        let value = self.conformers[id].remove_genre(genre).ok_or_else(|| {
            StoreError::MissingGenre {
                key: key.to_string(),
                genre: genre.to_string(),
            }
        })?;
        self.generation += 1;
        Ok(value)
    }

    /// Retrieves the value of `genre` on the conformer identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConformerNotFound`] for an unknown key and
    /// [`StoreError::MissingGenre`] if the conformer lacks the genre.
    pub fn get(&self, key: &str, genre: &str) -> Result<&GenreValue, StoreError> {
        let id = self.id_of(key)?;
        self.conformers[id]
            .get(genre)
            .ok_or_else(|| StoreError::MissingGenre {
                key: key.to_string(),
                genre: genre.to_string(),
            })
    }

    /// Retrieves a conformer by key.
    pub fn conformer(&self, key: &str) -> Option<&Conformer> {
        self.key_map.get(key).map(|&id| &self.conformers[id])
    }

    /// Retrieves a conformer by its internal id.
    pub fn conformer_by_id(&self, id: ConformerId) -> Option<&Conformer> {
        self.conformers.get(id)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_map.contains_key(key)
    }

    /// Number of conformers in the store.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Conformer ids in insertion order.
    pub fn ids(&self) -> &[ConformerId] {
        &self.order
    }

    /// Returns an iterator over all conformers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Conformer> {
        self.order.iter().map(|&id| &self.conformers[id])
    }

    /// Current mutation generation. Derived structures record this value to
    /// make their freshness observable.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Recomputes the consistency index for the current store contents.
    pub fn build_index(&self) -> ConsistencyIndex {
        ConsistencyIndex::build(self)
    }

    fn id_of(&self, key: &str) -> Result<ConformerId, StoreError> {
        self.key_map
            .get(key)
            .copied()
            .ok_or_else(|| StoreError::ConformerNotFound(key.to_string()))
    }
}
