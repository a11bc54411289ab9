use super::config::SizePolicy;
use super::error::EngineError;
use super::view::TrimmedView;
use crate::core::chem::stoichiometry::Stoichiometry;
use crate::core::models::genre::{self, GenreShape};
use crate::core::models::index::ConsistencyIndex;
use crate::core::models::store::{ConformerStore, StoreError};
use crate::core::spectra::vibrational::count_imaginary;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

/// Boolean kept-mask over the store, one entry per conformer in store order.
///
/// The mask never deletes data; it only marks conformers as excluded from
/// the current trimming configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    kept: Vec<bool>,
}

impl Mask {
    fn all_kept(len: usize) -> Self {
        Self {
            kept: vec![true; len],
        }
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn is_kept(&self, position: usize) -> bool {
        self.kept[position]
    }

    /// Number of conformers currently kept.
    pub fn kept_count(&self) -> usize {
        self.kept.iter().filter(|&&kept| kept).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.kept
    }
}

/// Why a trimming rule excluded a conformer. Diagnostics, not errors: an
/// excluded conformer is a normal, expected outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionReason {
    /// Required genres the conformer lacks.
    MissingGenres { missing: Vec<String> },
    /// The conformer's elemental composition differs from the majority.
    NonMatchingStoichiometry {
        found: Option<Stoichiometry>,
        majority: Stoichiometry,
    },
    /// The conformer's array length for the checked genre differs from the
    /// majority.
    InconsistentSize {
        genre: &'static str,
        length: usize,
        majority: usize,
    },
    /// The conformer reports one or more imaginary vibrational modes.
    ImaginaryFrequencies { count: usize },
    /// The calculation did not terminate normally.
    AbnormalTermination,
    /// The geometry optimization did not converge.
    NotOptimized,
    /// The conformer's scalar value falls outside the configured window.
    OutOfRange { genre: String, value: f64 },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::MissingGenres { missing } => {
                write!(f, "missing required genres: {}", missing.join(", "))
            }
            ExclusionReason::NonMatchingStoichiometry { found, majority } => match found {
                Some(found) => write!(f, "stoichiometry {found} differs from majority {majority}"),
                None => write!(f, "no structure to compare against majority {majority}"),
            },
            ExclusionReason::InconsistentSize {
                genre,
                length,
                majority,
            } => write!(
                f,
                "'{genre}' holds {length} values where the majority holds {majority}"
            ),
            ExclusionReason::ImaginaryFrequencies { count } => {
                write!(f, "{count} imaginary frequencies")
            }
            ExclusionReason::AbnormalTermination => write!(f, "calculation terminated abnormally"),
            ExclusionReason::NotOptimized => write!(f, "geometry optimization did not converge"),
            ExclusionReason::OutOfRange { genre, value } => {
                write!(f, "'{genre}' value {value} outside the configured window")
            }
        }
    }
}

/// One conformer excluded by a trimming rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub key: String,
    pub reason: ExclusionReason,
}

/// Applies declarative filtering rules over a conformer store, maintaining
/// the kept-mask and reporting every exclusion it makes.
///
/// Genre-presence and array-length queries go through the
/// [`ConsistencyIndex`] built at construction; the engine borrows the store,
/// so that index stays current for the engine's whole lifetime.
///
/// Filters compose by logical AND: a conformer excluded by any filter stays
/// excluded until [`TrimmingEngine::reset`]. Each filter returns the
/// conformers it newly excluded together with the rule that fired, so no
/// data disappears silently.
///
/// Majority decisions (stoichiometry, array sizes) break ties
/// deterministically in favor of the value first encountered in store order.
pub struct TrimmingEngine<'a> {
    store: &'a ConformerStore,
    index: ConsistencyIndex,
    mask: Mask,
    dropped_genres: BTreeSet<&'static str>,
}

impl<'a> TrimmingEngine<'a> {
    /// Creates an engine with an all-kept mask over the store's current
    /// contents. The store is borrowed for the engine's lifetime, so the
    /// mask can never go stale against it.
    pub fn new(store: &'a ConformerStore) -> Self {
        Self {
            store,
            index: store.build_index(),
            mask: Mask::all_kept(store.len()),
            dropped_genres: BTreeSet::new(),
        }
    }

    /// The current kept-mask.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// The consistency index the engine consults.
    pub fn index(&self) -> &ConsistencyIndex {
        &self.index
    }

    /// Genres excluded from calculations by [`SizePolicy::DropGenre`].
    pub fn dropped_genres(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dropped_genres.iter().copied()
    }

    pub fn is_genre_dropped(&self, genre: &str) -> bool {
        self.dropped_genres.contains(genre)
    }

    /// Restores the mask to all-kept and clears dropped genres.
    pub fn reset(&mut self) {
        self.mask = Mask::all_kept(self.store.len());
        self.dropped_genres.clear();
    }

    /// Builds the read-only projection over currently kept conformers.
    pub fn view(&self) -> TrimmedView<'a> {
        let positions = self
            .store
            .ids()
            .iter()
            .enumerate()
            .filter(|(position, _)| self.mask.is_kept(*position))
            .map(|(_, &id)| id)
            .collect();
        TrimmedView::new(self.store, positions)
    }

    /// Excludes every kept conformer missing at least one of `required`.
    ///
    /// An empty `required` set excludes nothing.
    pub fn trim_incomplete(&mut self, required: &[&str]) -> Vec<Exclusion> {
        if required.is_empty() {
            return Vec::new();
        }
        let index = &self.index;
        let flagged: Vec<(usize, Exclusion)> = self
            .kept_conformers()
            .filter_map(|(position, conformer)| {
                let present = index
                    .genres_of(conformer.key())
                    .expect("index mirrors the borrowed store");
                let missing: Vec<String> = required
                    .iter()
                    .filter(|genre| !present.contains(**genre))
                    .map(|genre| genre.to_string())
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                Some((
                    position,
                    Exclusion {
                        key: conformer.key().to_string(),
                        reason: ExclusionReason::MissingGenres { missing },
                    },
                ))
            })
            .collect();
        let exclusions = self.apply(flagged);
        self.log_outcome("incomplete", &exclusions);
        exclusions
    }

    /// Excludes kept conformers whose ordered elemental composition differs
    /// from the majority of the kept set.
    ///
    /// Conformers lacking the `atoms` genre cannot prove they belong to the
    /// majority molecule and are excluded with the same reason. When no kept
    /// conformer carries a structure at all, there is no majority to enforce
    /// and nothing is excluded.
    pub fn trim_non_matching_stoichiometry(&mut self) -> Vec<Exclusion> {
        let signatures: Vec<(usize, String, Option<Stoichiometry>)> = self
            .kept_conformers()
            .map(|(position, conformer)| {
                let signature = conformer
                    .get("atoms")
                    .and_then(|value| value.as_atomic_numbers())
                    .map(Stoichiometry::from);
                (position, conformer.key().to_string(), signature)
            })
            .collect();

        let Some(majority) = majority_value(
            signatures
                .iter()
                .filter_map(|(_, _, signature)| signature.clone()),
        ) else {
            return Vec::new();
        };

        let mut exclusions = Vec::new();
        for (position, key, signature) in signatures {
            if signature.as_ref() != Some(&majority) {
                exclusions.push(Exclusion {
                    key,
                    reason: ExclusionReason::NonMatchingStoichiometry {
                        found: signature,
                        majority: majority.clone(),
                    },
                });
                self.mask.kept[position] = false;
            }
        }
        self.log_outcome("stoichiometry", &exclusions);
        exclusions
    }

    /// Enforces a single array length for `genre` across the kept set.
    ///
    /// The majority length wins. Under [`SizePolicy::DropConformer`] the
    /// minority conformers are excluded; under [`SizePolicy::DropGenre`] the
    /// genre itself is recorded as excluded from calculations and every
    /// conformer stays. Conformers lacking the genre entirely are left for
    /// the incompleteness filter.
    pub fn trim_inconsistent_sizes(
        &mut self,
        genre: &str,
        policy: SizePolicy,
    ) -> Result<Vec<Exclusion>, EngineError> {
        let (name, _) = genre::lookup(genre)
            .ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        let groups = self.index.inconsistent_lengths(name)?;
        let position_of: HashMap<&str, usize> = self
            .kept_conformers()
            .map(|(position, conformer)| (conformer.key(), position))
            .collect();

        let mut lengths: Vec<(usize, String, usize)> = Vec::new();
        for (&length, keys) in &groups {
            for key in keys {
                if let Some(&position) = position_of.get(*key) {
                    lengths.push((position, (*key).to_string(), length));
                }
            }
        }
        // Majority ties break toward the length first seen in store order.
        lengths.sort_by_key(|&(position, _, _)| position);

        let Some(majority) = majority_value(lengths.iter().map(|(_, _, length)| *length)) else {
            return Ok(Vec::new());
        };
        let split_exists = lengths.iter().any(|(_, _, length)| *length != majority);
        if !split_exists {
            return Ok(Vec::new());
        }

        match policy {
            SizePolicy::DropGenre => {
                self.dropped_genres.insert(name);
                debug!(genre = name, "Genre excluded from calculations by size-consistency filter.");
                Ok(Vec::new())
            }
            SizePolicy::DropConformer => {
                let mut exclusions = Vec::new();
                for (position, key, length) in lengths {
                    if length != majority {
                        exclusions.push(Exclusion {
                            key,
                            reason: ExclusionReason::InconsistentSize {
                                genre: name,
                                length,
                                majority,
                            },
                        });
                        self.mask.kept[position] = false;
                    }
                }
                self.log_outcome("inconsistent-sizes", &exclusions);
                Ok(exclusions)
            }
        }
    }

    /// Excludes kept conformers reporting one or more imaginary frequencies.
    /// Conformers without a `freq` genre are untouched.
    pub fn trim_imaginary_frequencies(&mut self) -> Vec<Exclusion> {
        let flagged: Vec<(usize, Exclusion)> = self
            .kept_conformers()
            .filter_map(|(position, conformer)| {
                let frequencies = conformer.get("freq").and_then(|value| value.as_vector())?;
                let count = count_imaginary(frequencies);
                if count == 0 {
                    return None;
                }
                Some((
                    position,
                    Exclusion {
                        key: conformer.key().to_string(),
                        reason: ExclusionReason::ImaginaryFrequencies { count },
                    },
                ))
            })
            .collect();
        let exclusions = self.apply(flagged);
        self.log_outcome("imaginary-frequencies", &exclusions);
        exclusions
    }

    /// Excludes kept conformers whose calculation did not terminate
    /// normally; a conformer without the flag is treated as abnormal.
    pub fn trim_abnormal_termination(&mut self) -> Vec<Exclusion> {
        let flagged: Vec<(usize, Exclusion)> = self
            .kept_conformers()
            .filter_map(|(position, conformer)| {
                let terminated_normally = conformer
                    .get("normal_termination")
                    .and_then(|value| value.as_flag())
                    .unwrap_or(false);
                if terminated_normally {
                    return None;
                }
                Some((
                    position,
                    Exclusion {
                        key: conformer.key().to_string(),
                        reason: ExclusionReason::AbnormalTermination,
                    },
                ))
            })
            .collect();
        let exclusions = self.apply(flagged);
        self.log_outcome("abnormal-termination", &exclusions);
        exclusions
    }

    /// Excludes kept conformers whose geometry optimization did not
    /// converge. Conformers without the flag are kept: not every job is an
    /// optimization.
    pub fn trim_not_optimized(&mut self) -> Vec<Exclusion> {
        let flagged: Vec<(usize, Exclusion)> = self
            .kept_conformers()
            .filter_map(|(position, conformer)| {
                let converged = conformer
                    .get("optimization_completed")
                    .and_then(|value| value.as_flag())
                    .unwrap_or(true);
                if converged {
                    return None;
                }
                Some((
                    position,
                    Exclusion {
                        key: conformer.key().to_string(),
                        reason: ExclusionReason::NotOptimized,
                    },
                ))
            })
            .collect();
        let exclusions = self.apply(flagged);
        self.log_outcome("not-optimized", &exclusions);
        exclusions
    }

    /// Keeps only conformers whose scalar `genre` value lies within
    /// `[minimum, maximum]`. Conformers lacking the genre are untouched.
    pub fn trim_to_range(
        &mut self,
        genre: &str,
        minimum: f64,
        maximum: f64,
    ) -> Result<Vec<Exclusion>, EngineError> {
        let (name, definition) = genre::lookup(genre)
            .ok_or_else(|| StoreError::UnknownGenre(genre.to_string()))?;
        if definition.shape != GenreShape::Scalar {
            return Err(StoreError::ShapeMismatch {
                genre: name,
                expected: GenreShape::Scalar,
                actual: definition.shape,
            }
            .into());
        }

        let flagged: Vec<(usize, Exclusion)> = self
            .kept_conformers()
            .filter_map(|(position, conformer)| {
                let value = conformer.get(name).and_then(|value| value.as_scalar())?;
                if value >= minimum && value <= maximum {
                    return None;
                }
                Some((
                    position,
                    Exclusion {
                        key: conformer.key().to_string(),
                        reason: ExclusionReason::OutOfRange {
                            genre: genre.to_string(),
                            value,
                        },
                    },
                ))
            })
            .collect();
        let exclusions = self.apply(flagged);
        self.log_outcome("to-range", &exclusions);
        Ok(exclusions)
    }

    fn apply(&mut self, flagged: Vec<(usize, Exclusion)>) -> Vec<Exclusion> {
        flagged
            .into_iter()
            .map(|(position, exclusion)| {
                self.mask.kept[position] = false;
                exclusion
            })
            .collect()
    }

    fn kept_conformers(
        &self,
    ) -> impl Iterator<Item = (usize, &'a crate::core::models::conformer::Conformer)> + '_ {
        let store = self.store;
        let mask = &self.mask;
        store
            .ids()
            .iter()
            .enumerate()
            .filter(move |(position, _)| mask.is_kept(*position))
            .filter_map(move |(position, &id)| {
                store.conformer_by_id(id).map(|conformer| (position, conformer))
            })
    }

    fn log_outcome(&self, rule: &'static str, exclusions: &[Exclusion]) {
        if !exclusions.is_empty() {
            debug!(
                rule,
                excluded = exclusions.len(),
                kept = self.mask.kept_count(),
                "Trimming rule excluded conformers."
            );
        }
    }
}

/// Most frequent value in `items`, ties broken in favor of the value first
/// encountered.
fn majority_value<T>(items: impl Iterator<Item = T>) -> Option<T>
where
    T: Clone + Eq + std::hash::Hash,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (order, item) in items.enumerate() {
        let entry = counts.entry(item).or_insert((0, order));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::genre::GenreValue;

    fn vibrational_store() -> ConformerStore {
        let mut store = ConformerStore::new();
        for (key, modes) in [("c1", 10), ("c2", 10), ("c3", 10), ("c4", 7)] {
            store
                .add(key, "freq", GenreValue::Vector(vec![100.0; modes]))
                .unwrap();
            store
                .add(key, "dip", GenreValue::Vector(vec![1.0; modes]))
                .unwrap();
            store.add(key, "gib", GenreValue::Scalar(-100.0)).unwrap();
        }
        store
    }

    #[test]
    fn new_engine_keeps_everything() {
        let store = vibrational_store();
        let engine = TrimmingEngine::new(&store);
        assert_eq!(engine.mask().kept_count(), 4);
    }

    #[test]
    fn trim_incomplete_excludes_conformers_missing_required_genres() {
        let mut store = vibrational_store();
        store.remove_genre("c2", "gib").unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_incomplete(&["freq", "gib"]);

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "c2");
        assert_eq!(
            exclusions[0].reason,
            ExclusionReason::MissingGenres {
                missing: vec!["gib".to_string()],
            }
        );
        assert_eq!(engine.mask().kept_count(), 3);
    }

    #[test]
    fn incomplete_filter_agrees_with_index_presence() {
        let mut store = vibrational_store();
        store.remove_genre("c2", "gib").unwrap();
        store.remove_genre("c4", "gib").unwrap();
        let mut engine = TrimmingEngine::new(&store);

        assert!(engine.index().is_current(&store));
        let missing: Vec<String> = engine
            .index()
            .conformers_missing("gib")
            .unwrap()
            .iter()
            .map(|key| key.to_string())
            .collect();
        let excluded: Vec<String> = engine
            .trim_incomplete(&["gib"])
            .into_iter()
            .map(|exclusion| exclusion.key)
            .collect();
        assert_eq!(excluded, missing);
    }

    #[test]
    fn size_filter_excludes_exactly_the_index_minority_group() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);

        let minority: Vec<String> = engine.index().inconsistent_lengths("freq").unwrap()[&7]
            .iter()
            .map(|key| key.to_string())
            .collect();
        let excluded: Vec<String> = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap()
            .into_iter()
            .map(|exclusion| exclusion.key)
            .collect();
        assert_eq!(excluded, minority);
    }

    #[test]
    fn trim_incomplete_with_empty_required_set_excludes_nothing() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);
        assert!(engine.trim_incomplete(&[]).is_empty());
        assert_eq!(engine.mask().kept_count(), 4);
    }

    #[test]
    fn trim_inconsistent_sizes_excludes_the_minority_length() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "c4");
        assert_eq!(
            exclusions[0].reason,
            ExclusionReason::InconsistentSize {
                genre: "freq",
                length: 7,
                majority: 10,
            }
        );
        assert_eq!(engine.mask().kept_count(), 3);
    }

    #[test]
    fn trim_inconsistent_sizes_with_drop_genre_keeps_all_conformers() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropGenre)
            .unwrap();

        assert!(exclusions.is_empty());
        assert_eq!(engine.mask().kept_count(), 4);
        assert!(engine.is_genre_dropped("freq"));
    }

    #[test]
    fn trim_inconsistent_sizes_on_uniform_lengths_drops_nothing() {
        let mut store = ConformerStore::new();
        for key in ["c1", "c2"] {
            store
                .add(key, "freq", GenreValue::Vector(vec![1.0; 5]))
                .unwrap();
        }
        let mut engine = TrimmingEngine::new(&store);
        let exclusions = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropGenre)
            .unwrap();
        assert!(exclusions.is_empty());
        assert!(!engine.is_genre_dropped("freq"));
    }

    #[test]
    fn trim_inconsistent_sizes_rejects_scalar_genre() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);
        let err = engine
            .trim_inconsistent_sizes("gib", SizePolicy::DropConformer)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Store(StoreError::NotVectorGenre("gib".to_string()))
        );
    }

    #[test]
    fn trim_is_idempotent() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);

        let first = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap();
        let mask_after_first = engine.mask().clone();
        let second = engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(engine.mask(), &mask_after_first);
    }

    #[test]
    fn filters_compose_by_logical_and() {
        let mut store = vibrational_store();
        store.remove_genre("c1", "gib").unwrap();
        let mut engine = TrimmingEngine::new(&store);

        engine.trim_incomplete(&["gib"]);
        engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap();

        // c1 lost to incompleteness, c4 to the size check.
        assert_eq!(engine.mask().kept_count(), 2);
        let keys: Vec<&str> = engine.view().keys().collect();
        assert_eq!(keys, vec!["c2", "c3"]);
    }

    #[test]
    fn reset_restores_all_kept() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);
        engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropGenre)
            .unwrap();
        engine.trim_incomplete(&["raman1"]);
        assert_eq!(engine.mask().kept_count(), 0);

        engine.reset();

        assert_eq!(engine.mask().kept_count(), 4);
        assert!(!engine.is_genre_dropped("freq"));
    }

    #[test]
    fn stoichiometry_majority_wins() {
        let mut store = ConformerStore::new();
        let ethylene = vec![6u8, 6, 1, 1, 1, 1];
        let ethyl = vec![6u8, 6, 1, 1, 1, 1, 1];
        for (key, atoms) in [
            ("c1", ethylene.clone()),
            ("c2", ethylene.clone()),
            ("c3", ethyl),
        ] {
            store
                .add(key, "atoms", GenreValue::AtomicNumbers(atoms))
                .unwrap();
        }
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_non_matching_stoichiometry();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "c3");
        assert!(matches!(
            exclusions[0].reason,
            ExclusionReason::NonMatchingStoichiometry { .. }
        ));
        assert_eq!(engine.mask().kept_count(), 2);
    }

    #[test]
    fn stoichiometry_tie_break_is_deterministic_and_favors_first_encountered() {
        for _ in 0..10 {
            let mut store = ConformerStore::new();
            store
                .add("first", "atoms", GenreValue::AtomicNumbers(vec![6, 1]))
                .unwrap();
            store
                .add("second", "atoms", GenreValue::AtomicNumbers(vec![8, 1]))
                .unwrap();
            let mut engine = TrimmingEngine::new(&store);

            let exclusions = engine.trim_non_matching_stoichiometry();

            assert_eq!(exclusions.len(), 1);
            assert_eq!(exclusions[0].key, "second");
        }
    }

    #[test]
    fn stoichiometry_comparison_is_order_sensitive() {
        let mut store = ConformerStore::new();
        store
            .add("c1", "atoms", GenreValue::AtomicNumbers(vec![6, 8, 1]))
            .unwrap();
        store
            .add("c2", "atoms", GenreValue::AtomicNumbers(vec![6, 8, 1]))
            .unwrap();
        store
            .add("c3", "atoms", GenreValue::AtomicNumbers(vec![8, 6, 1]))
            .unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_non_matching_stoichiometry();
        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "c3");
    }

    #[test]
    fn conformer_without_structure_cannot_join_the_majority() {
        let mut store = ConformerStore::new();
        store
            .add("c1", "atoms", GenreValue::AtomicNumbers(vec![6, 1]))
            .unwrap();
        store
            .add("c2", "atoms", GenreValue::AtomicNumbers(vec![6, 1]))
            .unwrap();
        store.add("c3", "gib", GenreValue::Scalar(-1.0)).unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_non_matching_stoichiometry();
        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "c3");
        assert_eq!(
            exclusions[0].reason,
            ExclusionReason::NonMatchingStoichiometry {
                found: None,
                majority: Stoichiometry::new(vec![6, 1]),
            }
        );
    }

    #[test]
    fn trim_imaginary_frequencies_excludes_saddle_points() {
        let mut store = ConformerStore::new();
        store
            .add("minimum", "freq", GenreValue::Vector(vec![50.0, 100.0]))
            .unwrap();
        store
            .add("saddle", "freq", GenreValue::Vector(vec![-25.0, 100.0]))
            .unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_imaginary_frequencies();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "saddle");
        assert_eq!(
            exclusions[0].reason,
            ExclusionReason::ImaginaryFrequencies { count: 1 }
        );
    }

    #[test]
    fn trim_abnormal_termination_treats_missing_flag_as_abnormal() {
        let mut store = ConformerStore::new();
        store
            .add("ok", "normal_termination", GenreValue::Flag(true))
            .unwrap();
        store
            .add("crashed", "normal_termination", GenreValue::Flag(false))
            .unwrap();
        store.add("unknown", "gib", GenreValue::Scalar(-1.0)).unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_abnormal_termination();

        let excluded: Vec<&str> = exclusions.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(excluded, vec!["crashed", "unknown"]);
    }

    #[test]
    fn trim_not_optimized_keeps_conformers_without_the_flag() {
        let mut store = ConformerStore::new();
        store
            .add("converged", "optimization_completed", GenreValue::Flag(true))
            .unwrap();
        store
            .add("diverged", "optimization_completed", GenreValue::Flag(false))
            .unwrap();
        store
            .add("single_point", "gib", GenreValue::Scalar(-1.0))
            .unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_not_optimized();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "diverged");
        assert_eq!(engine.mask().kept_count(), 2);
    }

    #[test]
    fn trim_to_range_applies_a_scalar_window() {
        let mut store = ConformerStore::new();
        store.add("low", "gib", GenreValue::Scalar(-100.02)).unwrap();
        store.add("mid", "gib", GenreValue::Scalar(-100.01)).unwrap();
        store.add("high", "gib", GenreValue::Scalar(-99.5)).unwrap();
        let mut engine = TrimmingEngine::new(&store);

        let exclusions = engine.trim_to_range("gib", -100.03, -100.0).unwrap();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].key, "high");
    }

    #[test]
    fn trim_to_range_rejects_vector_genre() {
        let store = vibrational_store();
        let mut engine = TrimmingEngine::new(&store);
        let err = engine.trim_to_range("freq", 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(StoreError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn kept_count_always_matches_view_length() {
        let mut store = vibrational_store();
        store.remove_genre("c3", "dip").unwrap();
        let mut engine = TrimmingEngine::new(&store);
        engine.trim_incomplete(&["dip"]);
        engine
            .trim_inconsistent_sizes("freq", SizePolicy::DropConformer)
            .unwrap();
        assert_eq!(engine.mask().kept_count(), engine.view().len());
    }

    #[test]
    fn majority_value_prefers_higher_count_then_earlier_first_occurrence() {
        assert_eq!(majority_value([1, 2, 2, 3].into_iter()), Some(2));
        assert_eq!(majority_value([7, 8].into_iter()), Some(7));
        assert_eq!(majority_value(std::iter::empty::<u8>()), None);
    }
}
