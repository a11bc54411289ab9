//! # Spectryl Core Library
//!
//! A library for turning batches of molecule conformer calculations into
//! population-weighted theoretical spectra (IR, VCD, UV, ECD, Raman, ROA).
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear separation of concerns,
//! making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`ConformerStore`,
//!   `ConsistencyIndex`, the genre catalog), pure spectral mathematics (`lineshape`,
//!   `intensities`) and Boltzmann statistics.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates dataset trimming and
//!   spectral calculation. It includes the `TrimmingEngine` with its auditable exclusion
//!   diagnostics, the O(1)-indexed `TrimmedView`, and the synthesis/averaging tasks.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer. It ties the
//!   `engine` and `core` together to execute complete procedures, such as computing a single
//!   Boltzmann-averaged spectrum from a raw conformer batch. It provides a simple and powerful
//!   entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
