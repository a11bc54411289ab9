use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::store::StoreError;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Trimmed view index {index} out of range: only {len} conformers kept")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Genre '{genre}' was excluded from calculations by the size-consistency filter")]
    GenreExcluded { genre: &'static str },

    #[error(
        "Conformer '{key}' holds {positions} bars in '{position_genre}' \
         but {intensities} in '{intensity_genre}'"
    )]
    InconsistentBars {
        key: String,
        position_genre: &'static str,
        intensity_genre: &'static str,
        positions: usize,
        intensities: usize,
    },

    #[error("Averaging requested over an empty dataset: no conformers are kept")]
    EmptyDataset,

    #[error(
        "Conformer '{key}' lacks the energy genre '{genre}'; \
         it should have been excluded by trimming"
    )]
    MissingEnergy { key: String, genre: String },
}
