//! # Workflows Module
//!
//! This module composes the engine's building blocks into complete,
//! end-to-end calculations: trim the conformer batch, synthesize
//! per-conformer spectra, and collapse them into one Boltzmann-averaged
//! result. Workflows own phase sequencing and progress reporting; all
//! numerical work lives in the engine and core layers.

pub mod average;
