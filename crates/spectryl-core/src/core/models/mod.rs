//! # Core Models Module
//!
//! Data structures representing a batch of extracted conformer data.
//!
//! The central type is the [`store::ConformerStore`], an insertion-order-preserving,
//! key-addressed container mapping each conformer to its extracted property values.
//! Property categories ("genres") are declared once in the static
//! [`genre::GENRE_CATALOG`]; every write into the store is validated against it.
//! The [`index::ConsistencyIndex`] is a derived, recomputable audit structure over
//! the store answering presence and array-length queries in O(1).

pub mod conformer;
pub mod genre;
pub mod ids;
pub mod index;
pub mod store;
