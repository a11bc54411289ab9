//! # Core Module
//!
//! This module provides the fundamental building blocks for conformer dataset
//! management and spectral calculation in Spectryl, serving as the computational
//! core of the library.
//!
//! ## Overview
//!
//! The core module implements the essential data structures and pure algorithms
//! required to derive theoretical spectra from batches of quantum-chemistry
//! calculation results. It provides a complete framework for storing per-conformer
//! extracted properties, auditing their mutual consistency, and converting discrete
//! transitions into broadened spectra.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different aspects
//! of the data model and the spectral mathematics:
//!
//! - **Conformer Representation** ([`models`]) - The conformer store, the genre catalog, and the consistency index
//! - **Chemical Knowledge** ([`chem`]) - Element tables and stoichiometry signatures
//! - **Spectral Mathematics** ([`spectra`]) - Lineshape broadening and physical intensity conversions
//! - **Boltzmann Statistics** ([`energies`]) - Relative energies and population calculations
//!
//! ## Key Capabilities
//!
//! - **Order-preserving conformer storage** keyed by stable identifiers
//! - **Recomputable consistency auditing** of genre presence and array lengths
//! - **Gaussian and Lorentzian broadening** of transition bars into continuous spectra
//! - **Physical intensity conversions** for IR, VCD, UV, ECD, Raman, and ROA genres
//! - **Numerically stable Boltzmann populations** from relative conformer energies

pub mod chem;
pub mod energies;
pub mod models;
pub mod spectra;
