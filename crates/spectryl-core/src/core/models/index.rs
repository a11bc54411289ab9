use super::genre::{self, GenreShape};
use super::store::{ConformerStore, StoreError};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Derived audit structure over a [`ConformerStore`], answering "which
/// conformers have genre G, and at what array length" in O(1).
///
/// The index is a value object recomputed from the store
/// ([`ConsistencyIndex::build`]); it is never hand-edited. It records the
/// store generation it was built from, so callers can verify freshness with
/// [`ConsistencyIndex::is_current`] before relying on it.
#[derive(Debug, Clone)]
pub struct ConsistencyIndex {
    generation: u64,
    /// Conformer keys in store order, for deterministic query output.
    order: Vec<String>,
    /// Genres present per conformer key.
    genres_of: HashMap<String, BTreeSet<&'static str>>,
    /// Per genre: conformer key -> recorded sequence length (None for
    /// values without a length).
    per_genre: HashMap<&'static str, HashMap<String, Option<usize>>>,
}

impl ConsistencyIndex {
    /// Recomputes the index from the current store contents.
    pub fn build(store: &ConformerStore) -> Self {
        let mut order = Vec::with_capacity(store.len());
        let mut genres_of: HashMap<String, BTreeSet<&'static str>> = HashMap::new();
        let mut per_genre: HashMap<&'static str, HashMap<String, Option<usize>>> = HashMap::new();

        for conformer in store.iter() {
            let key = conformer.key().to_string();
            order.push(key.clone());
            let genres = genres_of.entry(key.clone()).or_default();
            for (name, value) in conformer.genres_iter() {
                genres.insert(name);
                per_genre
                    .entry(name)
                    .or_default()
                    .insert(key.clone(), value.vector_len());
            }
        }

        Self {
            generation: store.generation(),
            order,
            genres_of,
            per_genre,
        }
    }

    /// The store generation this index was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the index still reflects the store's current contents.
    pub fn is_current(&self, store: &ConformerStore) -> bool {
        self.generation == store.generation()
    }

    /// Set of genre names present on the conformer identified by `key`.
    pub fn genres_of(&self, key: &str) -> Result<&BTreeSet<&'static str>, StoreError> {
        self.genres_of
            .get(key)
            .ok_or_else(|| StoreError::ConformerNotFound(key.to_string()))
    }

    /// Recorded sequence length of `genre` on the conformer identified by `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotVectorGenre`] if the recorded value has no length
    /// (scalars, flags, text), [`StoreError::MissingGenre`] if the conformer
    /// lacks the genre, [`StoreError::UnknownGenre`] /
    /// [`StoreError::ConformerNotFound`] for unknown names.
    pub fn length_of(&self, key: &str, genre: &str) -> Result<usize, StoreError> {
        let (name, _) =
            genre::lookup(genre).ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        if !self.genres_of.contains_key(key) {
            return Err(StoreError::ConformerNotFound(key.to_string()));
        }
        let recorded = self
            .per_genre
            .get(name)
            .and_then(|entries| entries.get(key))
            .ok_or_else(|| StoreError::MissingGenre {
                key: key.to_string(),
                genre: genre.to_string(),
            })?;
        recorded.ok_or_else(|| StoreError::NotVectorGenre(genre.to_string()))
    }

    /// Keys of conformers lacking `genre`, in store order.
    pub fn conformers_missing(&self, genre: &str) -> Result<Vec<&str>, StoreError> {
        let (name, _) =
            genre::lookup(genre).ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        let present = self.per_genre.get(name);
        Ok(self
            .order
            .iter()
            .filter(|key| !present.is_some_and(|entries| entries.contains_key(key.as_str())))
            .map(String::as_str)
            .collect())
    }

    /// Groups conformers holding `genre` by recorded length, in store order
    /// within each group. A result with more than one entry reveals the
    /// majority/minority split the size-consistency filter acts on.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotVectorGenre`] if the genre is scalar-shaped,
    /// [`StoreError::UnknownGenre`] for unknown names.
    pub fn inconsistent_lengths(
        &self,
        genre: &str,
    ) -> Result<BTreeMap<usize, Vec<&str>>, StoreError> {
        let (name, definition) =
            genre::lookup(genre).ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        if definition.shape == GenreShape::Scalar {
            return Err(StoreError::NotVectorGenre(genre.to_string()));
        }
        let mut groups: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        if let Some(entries) = self.per_genre.get(name) {
            for key in &self.order {
                if let Some(Some(length)) = entries.get(key.as_str()) {
                    groups.entry(*length).or_default().push(key.as_str());
                }
            }
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::genre::GenreValue;

    fn store_with_lengths(lengths: &[usize]) -> ConformerStore {
        let mut store = ConformerStore::new();
        for (i, &n) in lengths.iter().enumerate() {
            let key = format!("c{i}");
            store
                .add(&key, "freq", GenreValue::Vector(vec![1.0; n]))
                .unwrap();
        }
        store
    }

    #[test]
    fn genres_of_lists_present_genres() {
        let mut store = ConformerStore::new();
        store.add("c1", "gib", GenreValue::Scalar(-1.0)).unwrap();
        store
            .add("c1", "freq", GenreValue::Vector(vec![1.0]))
            .unwrap();
        let index = store.build_index();
        let genres = index.genres_of("c1").unwrap();
        assert!(genres.contains("gib"));
        assert!(genres.contains("freq"));
        assert_eq!(genres.len(), 2);
    }

    #[test]
    fn length_of_returns_recorded_length() {
        let store = store_with_lengths(&[5]);
        let index = store.build_index();
        assert_eq!(index.length_of("c0", "freq").unwrap(), 5);
    }

    #[test]
    fn length_of_rejects_scalar_genre() {
        let mut store = ConformerStore::new();
        store.add("c1", "gib", GenreValue::Scalar(-1.0)).unwrap();
        let index = store.build_index();
        assert_eq!(
            index.length_of("c1", "gib").unwrap_err(),
            StoreError::NotVectorGenre("gib".to_string())
        );
    }

    #[test]
    fn conformers_missing_preserves_store_order() {
        let mut store = ConformerStore::new();
        store.add("c1", "gib", GenreValue::Scalar(-1.0)).unwrap();
        store
            .add("c2", "freq", GenreValue::Vector(vec![1.0]))
            .unwrap();
        store.add("c3", "gib", GenreValue::Scalar(-2.0)).unwrap();
        let index = store.build_index();
        assert_eq!(index.conformers_missing("freq").unwrap(), vec!["c1", "c3"]);
        assert_eq!(index.conformers_missing("dip").unwrap(), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn inconsistent_lengths_reveals_the_split() {
        let store = store_with_lengths(&[10, 10, 7, 10]);
        let index = store.build_index();
        let groups = index.inconsistent_lengths("freq").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&10], vec!["c0", "c1", "c3"]);
        assert_eq!(groups[&7], vec!["c2"]);
    }

    #[test]
    fn index_freshness_is_observable() {
        let mut store = store_with_lengths(&[3]);
        let index = store.build_index();
        assert!(index.is_current(&store));
        store.add("c9", "gib", GenreValue::Scalar(0.0)).unwrap();
        assert!(!index.is_current(&store));
    }
}
