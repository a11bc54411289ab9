//! # Spectral Mathematics Module
//!
//! Pure functions and value objects for converting discrete transition bars
//! into continuous, broadened spectra:
//!
//! - [`lineshape`] - Gaussian and Lorentzian broadening functions
//! - [`intensities`] - spectrum genres, their bar-genre pairings, and physical intensity conversions
//! - [`spectrum`] - synthesized and averaged spectrum value objects
//! - [`vibrational`] - imaginary-frequency detection helpers
//! - [`alignment`] - cross-correlation alignment of spectra on a shared axis

pub mod alignment;
pub mod intensities;
pub mod lineshape;
pub mod spectrum;
pub mod vibrational;
