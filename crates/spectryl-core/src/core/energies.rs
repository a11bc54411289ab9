//! Boltzmann statistics over relative conformer energies.
//!
//! Energy genres are stored in hartree; all comparisons happen on energies
//! relative to the lowest conformer, converted to kcal/mol, so raw energies
//! are never exponentiated.

/// Boltzmann constant in kcal/(mol·K).
pub const BOLTZMANN: f64 = 0.0019872041;

/// Conversion factor from hartree to kcal/mol.
pub const HARTREE_TO_KCAL_PER_MOL: f64 = 627.5095;

/// Energies relative to the lowest value, converted from hartree to kcal/mol.
///
/// Returns an empty vector for empty input.
pub fn calculate_deltas(energies: &[f64]) -> Vec<f64> {
    let Some(min) = energies.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    energies
        .iter()
        .map(|&energy| (energy - min) * HARTREE_TO_KCAL_PER_MOL)
        .collect()
}

/// Boltzmann factors relative to the most stable conformer, at temperature
/// `t` in kelvin. The most stable conformer's factor is exactly 1.0.
pub fn calculate_min_factors(energies: &[f64], t: f64) -> Vec<f64> {
    calculate_deltas(energies)
        .into_iter()
        .map(|delta| (-delta / (t * BOLTZMANN)).exp())
        .collect()
}

/// Normalized Boltzmann populations at temperature `t` in kelvin.
///
/// Populations sum to 1.0 for non-empty input; a single conformer trivially
/// receives population 1.0.
pub fn calculate_populations(energies: &[f64], t: f64) -> Vec<f64> {
    let factors = calculate_min_factors(energies, t);
    let total: f64 = factors.iter().sum();
    factors.into_iter().map(|factor| factor / total).collect()
}
