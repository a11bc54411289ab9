use super::error::EngineError;
use crate::core::models::conformer::Conformer;
use crate::core::models::ids::ConformerId;
use crate::core::models::store::{ConformerStore, StoreError};

/// Read-only projection of the conformers a trimming mask kept, in store
/// order.
///
/// The view borrows the store, so the store cannot change underneath it;
/// a view is always consistent with the data it was built from. Positional
/// access is O(1) via the captured id list.
#[derive(Debug, Clone)]
pub struct TrimmedView<'a> {
    store: &'a ConformerStore,
    positions: Vec<ConformerId>,
}

impl<'a> TrimmedView<'a> {
    pub(crate) fn new(store: &'a ConformerStore, positions: Vec<ConformerId>) -> Self {
        Self { store, positions }
    }

    /// Number of conformers the view exposes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Conformer at view position `index`.
    pub fn at(&self, index: usize) -> Result<&'a Conformer, EngineError> {
        let id = *self
            .positions
            .get(index)
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.positions.len(),
            })?;
        self.store
            .conformer_by_id(id)
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.positions.len(),
            })
    }

    /// Iterates the kept conformers in store order. Each call starts a
    /// fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = &'a Conformer> + '_ {
        let store = self.store;
        self.positions
            .iter()
            .filter_map(move |&id| store.conformer_by_id(id))
    }

    /// Iterates the keys of kept conformers in store order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.iter().map(Conformer::key)
    }

    /// Collects the scalar values of `genre` across the view, one per
    /// conformer, in view order. Fails on the first conformer lacking the
    /// genre.
    pub fn scalars(&self, genre: &str) -> Result<Vec<f64>, EngineError> {
        self.iter()
            .map(|conformer| {
                conformer
                    .get(genre)
                    .and_then(|value| value.as_scalar())
                    .ok_or_else(|| {
                        StoreError::MissingGenre {
                            key: conformer.key().to_string(),
                            genre: genre.to_string(),
                        }
                        .into()
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::genre::GenreValue;
    use crate::engine::trimming::TrimmingEngine;

    fn three_conformer_store() -> ConformerStore {
        let mut store = ConformerStore::new();
        for (key, energy) in [("c1", -1.0), ("c2", -2.0), ("c3", -3.0)] {
            store.add(key, "gib", GenreValue::Scalar(energy)).unwrap();
        }
        store
    }

    #[test]
    fn view_preserves_store_order() {
        let store = three_conformer_store();
        let engine = TrimmingEngine::new(&store);
        let view = engine.view();
        let keys: Vec<&str> = view.keys().collect();
        assert_eq!(keys, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn view_length_matches_kept_count() {
        let mut store = three_conformer_store();
        store.add("c2", "freq", GenreValue::Vector(vec![1.0])).unwrap();
        let mut engine = TrimmingEngine::new(&store);
        engine.trim_incomplete(&["freq"]);
        let view = engine.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.at(0).unwrap().key(), "c2");
    }

    #[test]
    fn positional_access_past_the_end_reports_the_bound() {
        let store = three_conformer_store();
        let engine = TrimmingEngine::new(&store);
        let view = engine.view();
        let err = view.at(3).unwrap_err();
        assert_eq!(err, EngineError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn keys_iterator_restarts_on_each_call() {
        let store = three_conformer_store();
        let engine = TrimmingEngine::new(&store);
        let view = engine.view();
        assert_eq!(view.keys().count(), 3);
        assert_eq!(view.keys().count(), 3);
    }

    #[test]
    fn scalars_follow_view_order() {
        let store = three_conformer_store();
        let engine = TrimmingEngine::new(&store);
        let view = engine.view();
        assert_eq!(view.scalars("gib").unwrap(), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn scalars_fail_on_a_conformer_missing_the_genre() {
        let mut store = three_conformer_store();
        store.remove_genre("c2", "gib").unwrap();
        let engine = TrimmingEngine::new(&store);
        let err = engine.view().scalars("gib").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(StoreError::MissingGenre { .. })
        ));
    }
}
