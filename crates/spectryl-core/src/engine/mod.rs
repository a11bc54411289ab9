//! # Engine Module
//!
//! This module implements the stateful calculation engine of Spectryl: the
//! auditable trimming layer that makes a real-world conformer batch behave as
//! a uniform dataset, and the tasks that synthesize and Boltzmann-average
//! spectra over the kept conformers.
//!
//! ## Overview
//!
//! Conformers extracted from real calculation batches routinely miss
//! properties, disagree on array lengths, or belong to a different molecule
//! entirely. The engine never deletes data to cope with this; it computes a
//! boolean kept-mask via composable filters, reports exactly which conformer
//! was excluded by which rule, and projects the store through an
//! O(1)-indexed [`view::TrimmedView`] for everything downstream.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - explicit, builder-validated settings for trimming,
//!   synthesis, and averaging; loadable from a TOML file
//! - **Trimming** ([`trimming`]) - filters, the kept-mask, and exclusion diagnostics
//! - **Projection** ([`view`]) - order-preserving, O(1)-indexed view over kept conformers
//! - **Tasks** ([`tasks`]) - per-conformer spectrum synthesis and population averaging
//! - **Progress Monitoring** ([`progress`]) - callback-based progress reporting
//! - **Error Handling** ([`error`]) - engine-specific error types

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
pub mod trimming;
pub mod view;
