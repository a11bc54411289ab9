//! # Chemical Knowledge Module
//!
//! Static element tables and the stoichiometry signature used to detect
//! conformers belonging to a different molecule than the rest of the batch.

pub mod elements;
pub mod stoichiometry;
